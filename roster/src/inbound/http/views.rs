//! Message bodies shown to members.
//!
//! Pure renderers: each takes domain values and returns the embed,
//! components or modal the handlers send back.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::custom_id::{CHARACTER_NAME_INPUT, ConfirmAction, CustomId, WizardAction};
use super::response::{
    ButtonStyle, Embed, MessageBody, ModalBody, action_row, button, colour, short_text_input,
    string_select,
};
use crate::domain::{
    CHARACTER_NAME_MAX, CharacterName, GameClass, MemberProfile, Role, RoleSummarySnapshot,
    SelectionSubmission, StoredSelection,
};

pub const GENERIC_ERROR: &str = "❌ An error occurred. Please try again later.";
pub const STORE_UNAVAILABLE: &str = "❌ Database not available. Please try again later.";
pub const SUMMARY_UNAVAILABLE: &str = "❌ Summary data not available. Please try again later.";
pub const STATISTICS_FAILED: &str =
    "❌ An error occurred while retrieving statistics. Please try again later.";
pub const REFRESH_FAILED: &str =
    "❌ An error occurred while refreshing statistics. Please try again later.";
pub const NO_STATISTICS: &str =
    "📊 No role statistics available yet. Players need to set their classes first!";
pub const EXPIRED: &str = "This interaction has expired.";
pub const FOREIGN_SELECT: &str = "You can't use this dropdown!";
pub const FOREIGN_BUTTON: &str = "You can't use this button!";

const CLASS_PROMPT: &str = "Choose your World of Warcraft class from the dropdown below:";

fn cancel_button(session: Uuid) -> serde_json::Value {
    button(
        &CustomId::wizard(session, WizardAction::Cancel).to_string(),
        "✖️ Cancel",
        ButtonStyle::Danger,
    )
}

fn class_menu(session: Uuid) -> Vec<serde_json::Value> {
    let classes = GameClass::sorted_by_label();
    vec![
        action_row(vec![string_select(
            &CustomId::wizard(session, WizardAction::Class).to_string(),
            "Choose your class...",
            classes.iter().map(|class| class.label()),
        )]),
        action_row(vec![cancel_button(session)]),
    ]
}

/// First wizard step, posted by the set command.
pub fn class_step(session: Uuid) -> MessageBody {
    MessageBody::embed(
        Embed::new("🎮 WoW Class Selection", colour::BLUE)
            .description(CLASS_PROMPT)
            .footer("You can change your selection at any time by running this command again."),
    )
    .components(class_menu(session))
    .ephemeral()
}

/// Class step again, after "Back to Classes".
pub fn class_step_again(session: Uuid) -> MessageBody {
    MessageBody::replacement_embed(
        Embed::new("Select Your Class", colour::BLUE).description(CLASS_PROMPT),
    )
    .components(class_menu(session))
}

/// Character name form.
pub fn name_modal(session: Uuid) -> ModalBody {
    ModalBody::single_input(
        CustomId::wizard(session, WizardAction::Name).to_string(),
        "Enter Your In-Game Name",
        short_text_input(
            CHARACTER_NAME_INPUT,
            "In-Game Character Name",
            "Enter your WoW character name...",
            CHARACTER_NAME_MAX,
        ),
    )
}

/// Specialisation step for `class`.
pub fn spec_step(session: Uuid, class: GameClass, character: &CharacterName) -> MessageBody {
    let specs = class.specializations();
    MessageBody::replacement_embed(
        Embed::new("Select Specialization", colour::GREEN).description(format!(
            "You selected **{}** for character **{}**.\nNow choose your specialization:",
            class.label(),
            character.as_ref()
        )),
    )
    .components(vec![
        action_row(vec![string_select(
            &CustomId::wizard(session, WizardAction::Spec).to_string(),
            "Choose your specialization...",
            specs.iter().map(|spec| spec.label()),
        )]),
        action_row(vec![
            button(
                &CustomId::wizard(session, WizardAction::Back).to_string(),
                "🔙 Back to Classes",
                ButtonStyle::Secondary,
            ),
            cancel_button(session),
        ]),
    ])
}

/// Wizard abandoned before saving.
pub fn selection_cancelled() -> MessageBody {
    MessageBody::replacement_embed(
        Embed::new("❌ Cancelled", colour::GREY)
            .description("Class selection cancelled. Your saved selection is unchanged."),
    )
}

/// Saved selection.
pub fn saved(submission: &SelectionSubmission, now: DateTime<Utc>) -> MessageBody {
    MessageBody::replacement_embed(
        Embed::new("✅ Selection Saved!", colour::GREEN)
            .description(format!(
                "**Character:** {}\n**Class:** {} - {}",
                submission.character.as_ref(),
                submission.pick.class().label(),
                submission.pick.spec().label()
            ))
            .timestamp(now)
            .footer("Your selection has been saved to the database."),
    )
}

/// Save failed at both the in-place and fallback paths.
pub fn save_failed() -> MessageBody {
    MessageBody::replacement_embed(
        Embed::new("❌ Error", colour::RED)
            .description("There was an error saving your selection. Please try again later."),
    )
}

/// Caller's stored selection.
pub fn own_selection(stored: &StoredSelection) -> MessageBody {
    MessageBody::embed(
        Embed::new("📋 Your Current Selection", colour::GREEN)
            .field("Character Name", &stored.character, true)
            .field("Class", &stored.class, true)
            .field("Specialization", &stored.spec, true)
            .field("Last Updated", &stored.last_updated, false)
            .field("Times Updated", &stored.update_count, true)
            .footer("Use /setclass to change or /deleteclass to remove your selection"),
    )
    .ephemeral()
}

/// Caller has no stored selection.
pub fn no_selection() -> MessageBody {
    MessageBody::embed(
        Embed::new("📋 No Selection Found", colour::ORANGE).description(
            "You haven't set your class and specialization yet.\nUse `/setclass` to make your selection!",
        ),
    )
    .ephemeral()
}

/// Every class with its specialisations.
pub fn class_list() -> MessageBody {
    let embed = GameClass::ALL.iter().fold(
        Embed::new("📚 Available Classes & Specializations", colour::BLUE).description(
            "Here are all the available World of Warcraft classes and their specializations:",
        ),
        |embed, class| {
            let specs: Vec<&str> = class.specializations().iter().map(|spec| spec.label()).collect();
            embed.field(format!("⚔️ {}", class.label()), specs.join(", "), false)
        },
    );
    MessageBody::embed(embed.footer("Use /setclass to select your class and specialization"))
        .ephemeral()
}

fn role_emoji(role: Role) -> &'static str {
    match role {
        Role::Tank => "🛡️",
        Role::Healer => "💚",
        Role::MeleeDps => "⚔️",
        Role::RangedDps => "🏹",
        Role::Unknown => "❓",
    }
}

/// Stored role summary. Empty snapshots render the no-statistics notice.
pub fn role_statistics(snapshot: &RoleSummarySnapshot) -> MessageBody {
    if snapshot.is_empty() {
        return MessageBody::text(NO_STATISTICS).ephemeral();
    }
    let mut embed = Embed::new("📊 Role Distribution Statistics", colour::GREEN)
        .description("Current breakdown of player roles in the community:");
    for entry in &snapshot.entries {
        embed = embed.field(
            format!("{} {}", role_emoji(entry.role), entry.role.label()),
            format!(
                "**{}** players ({})\n*Popular:* {}\n*Top Spec:* {}",
                entry.count, entry.percentage, entry.popular_class, entry.popular_spec
            ),
            true,
        );
    }
    embed = embed.field(
        "👥 Total Players",
        format!("**{}** registered", snapshot.total),
        false,
    );
    if let Some(updated) = &snapshot.last_updated {
        embed = embed.footer(format!("Last updated: {updated}"));
    }
    MessageBody::embed(embed).ephemeral()
}

/// Manual recompute finished.
pub fn refreshed(now: DateTime<Utc>) -> MessageBody {
    MessageBody::replacement_embed(
        Embed::new("✅ Statistics Refreshed!", colour::GREEN)
            .description("Role distribution statistics have been updated.")
            .timestamp(now)
            .footer("Use /rolestats to view the updated statistics"),
    )
}

fn confirm_buttons(session: Uuid, confirm_label: &str) -> Vec<serde_json::Value> {
    vec![action_row(vec![
        button(
            &CustomId::confirm(session, ConfirmAction::Yes).to_string(),
            confirm_label,
            ButtonStyle::Danger,
        ),
        button(
            &CustomId::confirm(session, ConfirmAction::No).to_string(),
            "❌ Cancel",
            ButtonStyle::Secondary,
        ),
    ])]
}

/// Nothing to delete for the caller.
pub fn nothing_to_delete() -> MessageBody {
    MessageBody::embed(
        Embed::new("❌ No Selection Found", colour::RED)
            .description("You don't have any class selection to delete."),
    )
    .ephemeral()
}

/// Self-deletion prompt.
pub fn confirm_delete(session: Uuid) -> MessageBody {
    MessageBody::embed(
        Embed::new("⚠️ Confirm Deletion", colour::ORANGE).description(
            "Are you sure you want to delete your class selection?\n\n**This action cannot be undone.**",
        ),
    )
    .components(confirm_buttons(session, "✅ Yes, Delete"))
    .ephemeral()
}

/// Own selection removed.
pub fn deleted(now: DateTime<Utc>) -> MessageBody {
    MessageBody::replacement_embed(
        Embed::new("✅ Selection Deleted", colour::GREEN)
            .description("Your class selection has been successfully deleted.")
            .timestamp(now)
            .footer("You can set a new selection anytime with /setclass"),
    )
}

/// Self-deletion abandoned.
pub fn delete_cancelled() -> MessageBody {
    MessageBody::replacement_embed(
        Embed::new("❌ Cancelled", colour::GREY)
            .description("Deletion cancelled. Your selection remains unchanged."),
    )
}

/// Self-deletion failed.
pub fn delete_failed() -> MessageBody {
    MessageBody::replacement_embed(
        Embed::new("❌ Error", colour::RED)
            .description("Failed to delete your selection. Please try again later."),
    )
}

/// Target member has no row.
pub fn nothing_to_remove(target: &MemberProfile) -> MessageBody {
    MessageBody::embed(Embed::new("❌ User Not Found", colour::RED).description(format!(
        "{} doesn't have any class selection to remove.",
        target.display_name
    )))
    .ephemeral()
}

fn removed_data(stored: &StoredSelection) -> String {
    format!(
        "**Character:** {}\n**Class:** {} {}",
        stored.character, stored.class, stored.spec
    )
}

/// Admin removal prompt.
pub fn confirm_removal(session: Uuid, target: &MemberProfile, stored: &StoredSelection) -> MessageBody {
    MessageBody::embed(Embed::new("⚠️ Admin Confirmation", colour::ORANGE).description(format!(
        "Remove class selection for **{}**?\n\n{}\n\n**This action cannot be undone.**",
        target.display_name,
        removed_data(stored)
    )))
    .components(confirm_buttons(session, "✅ Remove User"))
    .ephemeral()
}

/// Target's row removed.
pub fn removed(display_name: &str, stored: &StoredSelection, now: DateTime<Utc>) -> MessageBody {
    MessageBody::replacement_embed(
        Embed::new("✅ User Removed", colour::GREEN)
            .description(format!(
                "Successfully removed {display_name}'s class selection."
            ))
            .field("Removed Data", removed_data(stored), false)
            .timestamp(now),
    )
}

/// Admin removal abandoned.
pub fn removal_cancelled() -> MessageBody {
    MessageBody::replacement_embed(
        Embed::new("❌ Cancelled", colour::GREY).description("User removal cancelled."),
    )
}

/// Admin removal failed.
pub fn removal_failed() -> MessageBody {
    MessageBody::replacement_embed(
        Embed::new("❌ Error", colour::RED)
            .description("Failed to remove user selection. Please try again later."),
    )
}
