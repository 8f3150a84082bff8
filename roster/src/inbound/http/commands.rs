//! Slash-command handlers.
//!
//! Every command passes the authorisation gate first. Refusals are audited
//! as security events and answered with the refusal text; the registry is
//! never touched for a refused command.

use tracing::{error, warn};

use super::dto::InteractionDto;
use super::error::InboundError;
use super::response::{InteractionResponse, MessageBody};
use super::sessions::Session;
use super::state::HttpState;
use super::views;
use crate::domain::audit::{self, AuditTarget};
use crate::domain::{
    CommandKind, ConfirmationSubject, MemberProfile, PendingConfirmation, SelectionWizard,
};

/// Answer a slash command.
///
/// # Errors
///
/// Returns [`InboundError`] when the payload lacks a caller, a command name
/// or a required option, or names a command the bot does not register.
pub async fn handle_command(
    state: &HttpState,
    interaction: &InteractionDto,
) -> Result<InteractionResponse, InboundError> {
    let caller = interaction.caller()?;
    let command: CommandKind = interaction.command_name()?.parse()?;

    if let Err(denial) = state.policy.authorize(command, &interaction.caller_context()) {
        audit::security_event(
            &caller,
            denial.audit_action(command),
            &format!("Tried to use {command}: {denial}"),
        );
        return Ok(InteractionResponse::ephemeral_text(denial.to_string()));
    }

    match command {
        CommandKind::SetSelection => Ok(open_wizard(state, caller)),
        CommandKind::ViewOwnSelection => Ok(view_own_selection(state, &caller).await),
        CommandKind::ListCategories => {
            audit::user_action(&caller, "VIEWED_CLASS_LIST", "Viewed available classes");
            Ok(InteractionResponse::message(views::class_list()))
        }
        CommandKind::ViewRoleStatistics => Ok(view_statistics(state).await),
        CommandKind::RecomputeStatistics => Ok(recompute_statistics(state, interaction)),
        CommandKind::DeleteOwnSelection => Ok(request_delete(state, caller).await),
        CommandKind::AdminRemoveSelection => {
            let target = interaction.user_option("user")?;
            Ok(request_removal(state, caller, target).await)
        }
    }
}

fn store_unavailable() -> InteractionResponse {
    InteractionResponse::ephemeral_text(views::STORE_UNAVAILABLE)
}

fn open_wizard(state: &HttpState, caller: MemberProfile) -> InteractionResponse {
    let now = state.clock.utc();
    audit::user_action(&caller, "STARTED_CLASS_SELECTION", "Opened class selection interface");
    let session = state
        .sessions
        .open(Session::Wizard(SelectionWizard::open(caller, now)), now);
    InteractionResponse::message(views::class_step(session))
}

async fn view_own_selection(state: &HttpState, caller: &MemberProfile) -> InteractionResponse {
    let Some(selections) = &state.selections else {
        return store_unavailable();
    };
    match selections.find(&caller.id).await {
        Ok(Some(stored)) => {
            audit::user_action(
                caller,
                "VIEWED_SELECTION",
                &format!(
                    "Character: {}, Class: {} {}",
                    stored.character, stored.class, stored.spec
                ),
            );
            InteractionResponse::message(views::own_selection(&stored))
        }
        Ok(None) => {
            audit::user_action(caller, "VIEWED_SELECTION", "No selection found");
            InteractionResponse::message(views::no_selection())
        }
        Err(err) => {
            error!(member_id = %caller.id, error = %err, "selection lookup failed");
            InteractionResponse::ephemeral_text(views::GENERIC_ERROR)
        }
    }
}

async fn view_statistics(state: &HttpState) -> InteractionResponse {
    let Some(statistics) = &state.statistics else {
        return InteractionResponse::ephemeral_text(views::SUMMARY_UNAVAILABLE);
    };
    match statistics.snapshot().await {
        Ok(snapshot) => InteractionResponse::message(views::role_statistics(&snapshot)),
        Err(err) => {
            error!(error = %err, "role summary read failed");
            InteractionResponse::ephemeral_text(views::STATISTICS_FAILED)
        }
    }
}

fn recompute_statistics(state: &HttpState, interaction: &InteractionDto) -> InteractionResponse {
    let Some(statistics) = state.statistics.clone() else {
        return store_unavailable();
    };
    let followup = state.followup.clone();
    let clock = state.clock.clone();
    let token = interaction.token.clone();

    super::spawn_traced(async move {
        let body = match statistics.refresh().await {
            Ok(_) => views::refreshed(clock.utc()),
            Err(err) => {
                error!(error = %err, "manual role summary refresh failed");
                MessageBody::replacement_text(views::REFRESH_FAILED)
            }
        };
        super::send_followup(followup.as_ref(), &token, &body).await;
    });
    InteractionResponse::deferred_ephemeral_message()
}

async fn request_delete(state: &HttpState, caller: MemberProfile) -> InteractionResponse {
    let Some(selections) = &state.selections else {
        return store_unavailable();
    };
    match selections.find(&caller.id).await {
        Ok(Some(_)) => {
            audit::user_action(&caller, "INITIATED_DELETE", "Started deletion confirmation process");
            let now = state.clock.utc();
            let pending = PendingConfirmation::open(caller, ConfirmationSubject::OwnSelection, now);
            let session = state.sessions.open(Session::Confirmation(pending), now);
            InteractionResponse::message(views::confirm_delete(session))
        }
        Ok(None) => {
            audit::user_action(&caller, "DELETE_ATTEMPT_FAILED", "No selection found to delete");
            InteractionResponse::message(views::nothing_to_delete())
        }
        Err(err) => {
            error!(member_id = %caller.id, error = %err, "selection lookup failed");
            InteractionResponse::ephemeral_text(views::GENERIC_ERROR)
        }
    }
}

async fn request_removal(
    state: &HttpState,
    admin: MemberProfile,
    target: MemberProfile,
) -> InteractionResponse {
    let Some(selections) = &state.selections else {
        return store_unavailable();
    };
    let audit_target = AuditTarget {
        id: &target.id,
        name: &target.handle,
    };
    match selections.find(&target.id).await {
        Ok(Some(stored)) => {
            audit::admin_action(
                &admin,
                "INITIATED_USER_REMOVAL",
                Some(audit_target),
                &format!(
                    "Character: {}, Class: {} {}",
                    stored.character, stored.class, stored.spec
                ),
            );
            let now = state.clock.utc();
            let pending = PendingConfirmation::open(
                admin,
                ConfirmationSubject::MemberSelection {
                    target: target.id.clone(),
                    display_name: target.display_name.clone(),
                },
                now,
            );
            let session = state.sessions.open(Session::Confirmation(pending), now);
            InteractionResponse::message(views::confirm_removal(session, &target, &stored))
        }
        Ok(None) => {
            audit::admin_action(
                &admin,
                "REMOVE_USER_FAILED",
                Some(audit_target),
                "No selection found for target user",
            );
            InteractionResponse::message(views::nothing_to_remove(&target))
        }
        Err(err) => {
            warn!(target_id = %target.id, error = %err, "selection lookup failed");
            InteractionResponse::ephemeral_text(views::GENERIC_ERROR)
        }
    }
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
