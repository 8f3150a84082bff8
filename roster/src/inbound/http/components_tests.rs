//! Tests for component and modal handlers.

use std::time::Duration;

use mockable::Clock;
use rstest::rstest;
use serde_json::Value;

use super::*;
use crate::domain::ports::{
    MockMemberSelections, MockRoleStatistics, RowPosition, SaveOutcome,
};
use crate::domain::{
    AccessPolicy, GameClass, MemberId, Specialization, StoredSelection, WIZARD_TIMEOUT_SECS,
    recompute,
};
use crate::inbound::http::test_utils::{
    CALLER, Harness, component, custom_id_at, harness, name_submission,
};

fn json(response: &InteractionResponse) -> Value {
    serde_json::to_value(response).expect("response serialises")
}

fn owner() -> MemberProfile {
    MemberProfile::new(MemberId::new(CALLER).expect("id"), "user100", "User 100")
}

fn open_wizard(harness: &Harness) -> Uuid {
    let now = harness.clock.utc();
    harness
        .state
        .sessions
        .open(Session::Wizard(SelectionWizard::open(owner(), now)), now)
}

fn open_confirmation(harness: &Harness, subject: ConfirmationSubject) -> Uuid {
    let now = harness.clock.utc();
    harness.state.sessions.open(
        Session::Confirmation(PendingConfirmation::open(owner(), subject, now)),
        now,
    )
}

fn wizard_id(session: Uuid, action: WizardAction) -> String {
    CustomId::wizard(session, action).to_string()
}

fn confirm_id(session: Uuid, action: ConfirmAction) -> String {
    CustomId::confirm(session, action).to_string()
}

async fn press(harness: &Harness, interaction: &InteractionDto) -> InteractionResponse {
    handle_component(&harness.state, interaction)
        .await
        .expect("handled")
}

fn removed_row() -> StoredSelection {
    StoredSelection {
        position: RowPosition::from_data_index(1),
        character: "Garrosh".to_owned(),
        class: "Warrior".to_owned(),
        spec: "Fury".to_owned(),
        last_updated: "2024-04-01 12:00:00".to_owned(),
        update_count: "1".to_owned(),
    }
}

fn refreshing_statistics() -> MockRoleStatistics {
    let mut statistics = MockRoleStatistics::new();
    statistics
        .expect_refresh()
        .times(1)
        .returning(|| Ok(recompute(&[], "2024-05-01 18:30:00")));
    statistics
}

#[actix_web::test]
async fn wizard_walks_from_class_to_saved_selection() {
    let mut selections = MockMemberSelections::new();
    selections
        .expect_upsert()
        .withf(|submission| {
            submission.member.id.as_ref() == CALLER
                && submission.character.as_ref() == "Thrall"
                && submission.pick.class() == GameClass::Shaman
                && submission.pick.spec() == Specialization::Enhancement
        })
        .times(1)
        .returning(|_| SaveOutcome::Created);
    let harness = harness(
        Some(selections),
        Some(refreshing_statistics()),
        AccessPolicy::default(),
    );
    let session = open_wizard(&harness);

    let modal = press(
        &harness,
        &component(&wizard_id(session, WizardAction::Class), CALLER, &["Shaman"]),
    )
    .await;
    assert_eq!(modal.kind(), 9);
    assert_eq!(json(&modal)["data"]["custom_id"], wizard_id(session, WizardAction::Name));

    let spec_step = press(
        &harness,
        &name_submission(&wizard_id(session, WizardAction::Name), CALLER, " Thrall "),
    )
    .await;
    let spec_body = json(&spec_step);
    assert_eq!(spec_step.kind(), 7);
    assert_eq!(
        spec_body["data"]["components"][0]["components"][0]["options"][1]["label"],
        "Enhancement"
    );
    assert_eq!(
        custom_id_at(&spec_body["data"], 1, 0),
        wizard_id(session, WizardAction::Back)
    );

    let deferred = press(
        &harness,
        &component(&wizard_id(session, WizardAction::Spec), CALLER, &["Enhancement"]),
    )
    .await;
    assert_eq!(deferred.kind(), 6);

    let edits = harness.followup.wait_for(1, Duration::from_secs(5)).await;
    assert_eq!(edits[0].0, "component-token");
    assert_eq!(edits[0].1["embeds"][0]["title"], "✅ Selection Saved!");
    assert_eq!(
        edits[0].1["embeds"][0]["description"],
        "**Character:** Thrall\n**Class:** Shaman - Enhancement"
    );
    assert!(harness.state.sessions.get(session, harness.clock.utc()).is_none());
}

#[actix_web::test]
async fn failed_saves_report_an_error() {
    let mut selections = MockMemberSelections::new();
    selections.expect_upsert().returning(|_| SaveOutcome::Failed);
    let harness = harness(Some(selections), None, AccessPolicy::default());
    let session = open_wizard(&harness);
    press(&harness, &component(&wizard_id(session, WizardAction::Class), CALLER, &["Mage"])).await;
    press(
        &harness,
        &name_submission(&wizard_id(session, WizardAction::Name), CALLER, "Jaina"),
    )
    .await;

    press(&harness, &component(&wizard_id(session, WizardAction::Spec), CALLER, &["Frost"])).await;
    let edits = harness.followup.wait_for(1, Duration::from_secs(5)).await;

    assert_eq!(edits[0].1["embeds"][0]["title"], "❌ Error");
}

#[tokio::test]
async fn strangers_cannot_drive_a_wizard() {
    let harness = harness(None, None, AccessPolicy::default());
    let session = open_wizard(&harness);
    let before = harness.state.sessions.get(session, harness.clock.utc());

    let response = press(
        &harness,
        &component(&wizard_id(session, WizardAction::Class), "999", &["Mage"]),
    )
    .await;

    assert_eq!(
        response.message_body().and_then(MessageBody::content_text),
        Some(views::FOREIGN_SELECT)
    );
    assert_eq!(harness.state.sessions.get(session, harness.clock.utc()), before);
}

#[tokio::test]
async fn lapsed_wizards_render_the_expiry_notice() {
    let harness = harness(None, None, AccessPolicy::default());
    let session = open_wizard(&harness);
    harness.clock.advance_seconds(WIZARD_TIMEOUT_SECS);

    let response = press(
        &harness,
        &component(&wizard_id(session, WizardAction::Class), CALLER, &["Mage"]),
    )
    .await;
    let body = json(&response);

    assert_eq!(response.kind(), 7);
    assert_eq!(body["data"]["content"], views::EXPIRED);
    assert_eq!(body["data"]["components"], serde_json::json!([]));
}

#[tokio::test]
async fn back_returns_to_the_class_menu() {
    let harness = harness(None, None, AccessPolicy::default());
    let session = open_wizard(&harness);
    press(&harness, &component(&wizard_id(session, WizardAction::Class), CALLER, &["Monk"])).await;
    press(
        &harness,
        &name_submission(&wizard_id(session, WizardAction::Name), CALLER, "Chen"),
    )
    .await;

    let response = press(
        &harness,
        &component(&wizard_id(session, WizardAction::Back), CALLER, &[]),
    )
    .await;
    let body = json(&response);

    assert_eq!(body["data"]["embeds"][0]["title"], "Select Your Class");
    assert_eq!(
        custom_id_at(&body["data"], 0, 0),
        wizard_id(session, WizardAction::Class)
    );
}

#[tokio::test]
async fn cancel_closes_the_wizard_without_touching_the_store() {
    let harness = harness(
        Some(MockMemberSelections::new()),
        None,
        AccessPolicy::default(),
    );
    let session = open_wizard(&harness);
    press(&harness, &component(&wizard_id(session, WizardAction::Class), CALLER, &["Mage"])).await;
    press(
        &harness,
        &name_submission(&wizard_id(session, WizardAction::Name), CALLER, "Khadgar"),
    )
    .await;

    let response = press(
        &harness,
        &component(&wizard_id(session, WizardAction::Cancel), CALLER, &[]),
    )
    .await;
    let body = json(&response);

    assert_eq!(response.kind(), 7);
    assert_eq!(body["data"]["embeds"][0]["title"], "❌ Cancelled");
    assert_eq!(body["data"]["components"], serde_json::json!([]));
    assert!(harness.state.sessions.get(session, harness.clock.utc()).is_none());

    let late = press(
        &harness,
        &component(&wizard_id(session, WizardAction::Spec), CALLER, &["Arcane"]),
    )
    .await;
    assert_eq!(json(&late)["data"]["content"], views::EXPIRED);
}

#[tokio::test]
async fn strangers_cannot_cancel_a_wizard() {
    let harness = harness(None, None, AccessPolicy::default());
    let session = open_wizard(&harness);

    let response = press(
        &harness,
        &component(&wizard_id(session, WizardAction::Cancel), "999", &[]),
    )
    .await;

    assert_eq!(
        response.message_body().and_then(MessageBody::content_text),
        Some(views::FOREIGN_BUTTON)
    );
    assert!(harness.state.sessions.get(session, harness.clock.utc()).is_some());
}

#[rstest]
#[case::blank("   ")]
#[case::too_long("x".repeat(51))]
#[tokio::test]
async fn invalid_names_are_rejected_ephemerally(#[case] name: String) {
    let harness = harness(None, None, AccessPolicy::default());
    let session = open_wizard(&harness);
    press(&harness, &component(&wizard_id(session, WizardAction::Class), CALLER, &["Druid"])).await;

    let response = press(
        &harness,
        &name_submission(&wizard_id(session, WizardAction::Name), CALLER, &name),
    )
    .await;
    let body = json(&response);

    assert_eq!(body["data"]["flags"], 64);
    assert!(
        body["data"]["content"]
            .as_str()
            .is_some_and(|text| text.starts_with("❌ "))
    );
}

#[tokio::test]
async fn cancelling_a_deletion_leaves_the_row() {
    let harness = harness(
        Some(MockMemberSelections::new()),
        None,
        AccessPolicy::default(),
    );
    let session = open_confirmation(&harness, ConfirmationSubject::OwnSelection);

    let response = press(
        &harness,
        &component(&confirm_id(session, ConfirmAction::No), CALLER, &[]),
    )
    .await;

    assert_eq!(json(&response)["data"]["embeds"][0]["title"], "❌ Cancelled");
    assert!(harness.state.sessions.get(session, harness.clock.utc()).is_none());
}

#[actix_web::test]
async fn confirming_a_deletion_removes_the_row() {
    let mut selections = MockMemberSelections::new();
    selections
        .expect_delete()
        .withf(|member| member.as_ref() == CALLER)
        .times(1)
        .returning(|_| DeleteOutcome::Deleted {
            position: RowPosition::from_data_index(0),
            selection: removed_row(),
        });
    let harness = harness(
        Some(selections),
        Some(refreshing_statistics()),
        AccessPolicy::default(),
    );
    let session = open_confirmation(&harness, ConfirmationSubject::OwnSelection);

    let response = press(
        &harness,
        &component(&confirm_id(session, ConfirmAction::Yes), CALLER, &[]),
    )
    .await;
    let edits = harness.followup.wait_for(1, Duration::from_secs(5)).await;

    assert_eq!(response.kind(), 6);
    assert_eq!(edits[0].1["embeds"][0]["title"], "✅ Selection Deleted");
}

#[actix_web::test]
async fn admin_removal_targets_the_member_and_shows_removed_data() {
    let mut selections = MockMemberSelections::new();
    selections
        .expect_delete()
        .withf(|member| member.as_ref() == "200")
        .times(1)
        .returning(|_| DeleteOutcome::Deleted {
            position: RowPosition::from_data_index(1),
            selection: removed_row(),
        });
    let harness = harness(Some(selections), None, AccessPolicy::default());
    let session = open_confirmation(
        &harness,
        ConfirmationSubject::MemberSelection {
            target: MemberId::new("200").expect("id"),
            display_name: "Target".to_owned(),
        },
    );

    press(
        &harness,
        &component(&confirm_id(session, ConfirmAction::Yes), CALLER, &[]),
    )
    .await;
    let edits = harness.followup.wait_for(1, Duration::from_secs(5)).await;
    let embed = &edits[0].1["embeds"][0];

    assert_eq!(embed["title"], "✅ User Removed");
    assert_eq!(
        embed["description"],
        "Successfully removed Target's class selection."
    );
    assert_eq!(
        embed["fields"][0]["value"],
        "**Character:** Garrosh\n**Class:** Warrior Fury"
    );
}

#[tokio::test]
async fn strangers_cannot_answer_a_confirmation() {
    let harness = harness(
        Some(MockMemberSelections::new()),
        None,
        AccessPolicy::default(),
    );
    let session = open_confirmation(&harness, ConfirmationSubject::OwnSelection);

    let response = press(
        &harness,
        &component(&confirm_id(session, ConfirmAction::Yes), "999", &[]),
    )
    .await;

    assert_eq!(
        response.message_body().and_then(MessageBody::content_text),
        Some(views::FOREIGN_BUTTON)
    );
    assert!(harness.state.sessions.get(session, harness.clock.utc()).is_some());
}

#[tokio::test]
async fn mismatched_session_kinds_are_errors() {
    let harness = harness(None, None, AccessPolicy::default());
    let session = open_wizard(&harness);
    let raw = confirm_id(session, ConfirmAction::Yes);

    let result = handle_component(&harness.state, &component(&raw, CALLER, &[])).await;

    assert_eq!(
        result.map(|response| response.kind()),
        Err(InboundError::MalformedCustomId(raw))
    );
}
