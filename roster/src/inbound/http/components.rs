//! Select menu, button and modal handlers.
//!
//! Components are routed to their session through the custom id. Foreign
//! actors get an ephemeral notice and leave the session untouched; lapsed
//! or unknown sessions replace the message with the expiry notice.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use mockable::Clock;
use tracing::warn;
use uuid::Uuid;

use super::custom_id::{CHARACTER_NAME_INPUT, ConfirmAction, CustomId, WizardAction};
use super::dto::InteractionDto;
use super::error::InboundError;
use super::response::{InteractionResponse, MessageBody};
use super::sessions::Session;
use super::state::HttpState;
use super::{refresh_summary, send_followup, spawn_traced, views};
use crate::domain::audit::{self, AuditTarget};
use crate::domain::ports::{
    DeleteOutcome, InteractionFollowup, MemberSelections, RoleStatistics,
};
use crate::domain::{
    ConfirmationError, ConfirmationSubject, MemberProfile, PendingConfirmation,
    SelectionSubmission, SelectionWizard, WizardError,
};

/// Answer a component press or modal submission.
///
/// # Errors
///
/// Returns [`InboundError`] when the payload lacks a caller, a custom id or
/// the value the component should carry, or the custom id was not issued
/// by this bot.
pub async fn handle_component(
    state: &HttpState,
    interaction: &InteractionDto,
) -> Result<InteractionResponse, InboundError> {
    let caller = interaction.caller()?;
    let raw_id = interaction.custom_id()?;
    let custom_id: CustomId = raw_id.parse()?;
    let now = state.clock.utc();

    let Some(session) = state.sessions.get(custom_id.session(), now) else {
        return Ok(expired());
    };

    match (custom_id, session) {
        (CustomId::Wizard { session, action }, Session::Wizard(wizard)) => {
            let event = WizardEvent {
                state,
                interaction,
                caller: &caller,
                session,
                now,
            };
            event.apply(action, wizard)
        }
        (CustomId::Confirm { session, action }, Session::Confirmation(pending)) => Ok(answer(
            state,
            interaction,
            &caller,
            session,
            action,
            &pending,
            now,
        )),
        _ => Err(InboundError::MalformedCustomId(raw_id.to_owned())),
    }
}

fn expired() -> InteractionResponse {
    InteractionResponse::update(MessageBody::replacement_text(views::EXPIRED))
}

struct WizardEvent<'a> {
    state: &'a HttpState,
    interaction: &'a InteractionDto,
    caller: &'a MemberProfile,
    session: Uuid,
    now: DateTime<Utc>,
}

impl WizardEvent<'_> {
    fn apply(
        &self,
        action: WizardAction,
        mut wizard: SelectionWizard,
    ) -> Result<InteractionResponse, InboundError> {
        let actor = &self.caller.id;
        let outcome = match action {
            WizardAction::Class => {
                let label = self.interaction.selected_value()?;
                wizard
                    .choose_class(actor, label, self.now)
                    .map(|_| InteractionResponse::modal(views::name_modal(self.session)))
            }
            WizardAction::Name => {
                let name = self.interaction.text_input(CHARACTER_NAME_INPUT)?;
                wizard
                    .submit_name(actor, name, self.now)
                    .map(|(class, character)| {
                        InteractionResponse::update(views::spec_step(
                            self.session,
                            class,
                            &character,
                        ))
                    })
            }
            WizardAction::Spec => {
                let label = self.interaction.selected_value()?;
                wizard
                    .choose_specialization(actor, label, self.now)
                    .map(|submission| self.save(submission))
            }
            WizardAction::Back => wizard
                .back(actor, self.now)
                .map(|()| InteractionResponse::update(views::class_step_again(self.session))),
            WizardAction::Cancel => wizard.cancel(actor, self.now).map(|()| {
                audit::user_action(
                    self.caller,
                    "CLASS_SELECTION_CANCELLED",
                    "User abandoned the class selection wizard",
                );
                InteractionResponse::update(views::selection_cancelled())
            }),
        };

        match outcome {
            Ok(response) => {
                self.state
                    .sessions
                    .save(self.session, Session::Wizard(wizard), self.now);
                Ok(response)
            }
            Err(err) => Ok(self.reject(action, &err)),
        }
    }

    fn reject(&self, action: WizardAction, err: &WizardError) -> InteractionResponse {
        match err {
            WizardError::ForeignActor => {
                audit::security_event(
                    self.caller,
                    "FOREIGN_COMPONENT_ATTEMPT",
                    "Tried to drive another member's class selection",
                );
                let notice = match action {
                    WizardAction::Back | WizardAction::Cancel => views::FOREIGN_BUTTON,
                    _ => views::FOREIGN_SELECT,
                };
                InteractionResponse::ephemeral_text(notice)
            }
            WizardError::Expired => {
                self.state.sessions.close(self.session);
                expired()
            }
            WizardError::InvalidName(_) | WizardError::InvalidChoice(_) => {
                InteractionResponse::ephemeral_text(format!("❌ {err}"))
            }
            WizardError::OutOfOrder { .. } => {
                warn!(session = %self.session, error = %err, "wizard event out of order");
                InteractionResponse::ephemeral_text(views::GENERIC_ERROR)
            }
        }
    }

    fn save(&self, submission: SelectionSubmission) -> InteractionResponse {
        let Some(selections) = self.state.selections.clone() else {
            return InteractionResponse::update(MessageBody::replacement_text(
                views::STORE_UNAVAILABLE,
            ));
        };
        let task = SaveTask {
            selections,
            statistics: self.state.statistics.clone(),
            followup: self.state.followup.clone(),
            clock: self.state.clock.clone(),
            token: self.interaction.token.clone(),
        };
        spawn_traced(task.run(submission));
        InteractionResponse::deferred_update()
    }
}

struct SaveTask {
    selections: Arc<dyn MemberSelections>,
    statistics: Option<Arc<dyn RoleStatistics>>,
    followup: Arc<dyn InteractionFollowup>,
    clock: Arc<dyn Clock>,
    token: String,
}

impl SaveTask {
    async fn run(self, submission: SelectionSubmission) {
        let details = format!(
            "Character: {}, Class: {}",
            submission.character.as_ref(),
            submission.pick
        );
        let outcome = self.selections.upsert(&submission).await;
        let body = if outcome.is_saved() {
            audit::user_action(&submission.member, "CLASS_SELECTION_SAVED", &details);
            refresh_summary(self.statistics.as_deref()).await;
            views::saved(&submission, self.clock.utc())
        } else {
            audit::user_action(&submission.member, "CLASS_SELECTION_FAILED", &details);
            views::save_failed()
        };
        send_followup(self.followup.as_ref(), &self.token, &body).await;
    }
}

fn answer(
    state: &HttpState,
    interaction: &InteractionDto,
    caller: &MemberProfile,
    session: Uuid,
    action: ConfirmAction,
    pending: &PendingConfirmation,
    now: DateTime<Utc>,
) -> InteractionResponse {
    let subject = match pending.answer(&caller.id, now) {
        Ok(subject) => subject.clone(),
        Err(ConfirmationError::ForeignActor) => {
            audit::security_event(
                caller,
                "FOREIGN_COMPONENT_ATTEMPT",
                "Tried to answer another member's confirmation",
            );
            return InteractionResponse::ephemeral_text(views::FOREIGN_BUTTON);
        }
        Err(ConfirmationError::Expired) => {
            state.sessions.close(session);
            return expired();
        }
    };
    state.sessions.close(session);
    let owner = pending.owner().clone();

    match action {
        ConfirmAction::No => InteractionResponse::update(cancelled(&owner, &subject)),
        ConfirmAction::Yes => {
            let Some(selections) = state.selections.clone() else {
                return InteractionResponse::update(MessageBody::replacement_text(
                    views::STORE_UNAVAILABLE,
                ));
            };
            let task = DeleteTask {
                selections,
                statistics: state.statistics.clone(),
                followup: state.followup.clone(),
                clock: state.clock.clone(),
                token: interaction.token.clone(),
            };
            spawn_traced(task.run(owner, subject));
            InteractionResponse::deferred_update()
        }
    }
}

fn cancelled(owner: &MemberProfile, subject: &ConfirmationSubject) -> MessageBody {
    match subject {
        ConfirmationSubject::OwnSelection => {
            audit::user_action(
                owner,
                "DELETION_CANCELLED",
                "User cancelled deletion of their class selection",
            );
            views::delete_cancelled()
        }
        ConfirmationSubject::MemberSelection {
            target,
            display_name,
        } => {
            audit::admin_action(
                owner,
                "USER_REMOVAL_CANCELLED",
                Some(AuditTarget {
                    id: target,
                    name: display_name,
                }),
                "Admin cancelled user removal",
            );
            views::removal_cancelled()
        }
    }
}

struct DeleteTask {
    selections: Arc<dyn MemberSelections>,
    statistics: Option<Arc<dyn RoleStatistics>>,
    followup: Arc<dyn InteractionFollowup>,
    clock: Arc<dyn Clock>,
    token: String,
}

impl DeleteTask {
    async fn run(self, owner: MemberProfile, subject: ConfirmationSubject) {
        let member = match &subject {
            ConfirmationSubject::OwnSelection => &owner.id,
            ConfirmationSubject::MemberSelection { target, .. } => target,
        };
        let outcome = self.selections.delete(member).await;
        if matches!(outcome, DeleteOutcome::Deleted { .. }) {
            refresh_summary(self.statistics.as_deref()).await;
        }
        let now = self.clock.utc();

        let body = match (&subject, &outcome) {
            (ConfirmationSubject::OwnSelection, DeleteOutcome::Deleted { .. }) => {
                audit::user_action(
                    &owner,
                    "SELECTION_DELETED",
                    "User deleted their own class selection",
                );
                views::deleted(now)
            }
            (ConfirmationSubject::OwnSelection, _) => {
                audit::user_action(&owner, "DELETION_FAILED", "Failed to delete class selection");
                views::delete_failed()
            }
            (
                ConfirmationSubject::MemberSelection {
                    target,
                    display_name,
                },
                DeleteOutcome::Deleted { selection, .. },
            ) => {
                audit::admin_action(
                    &owner,
                    "USER_REMOVED",
                    Some(AuditTarget {
                        id: target,
                        name: display_name,
                    }),
                    &format!(
                        "Character: {}, Class: {} {}",
                        selection.character, selection.class, selection.spec
                    ),
                );
                views::removed(display_name, selection, now)
            }
            (
                ConfirmationSubject::MemberSelection {
                    target,
                    display_name,
                },
                _,
            ) => {
                audit::admin_action(
                    &owner,
                    "USER_REMOVAL_FAILED",
                    Some(AuditTarget {
                        id: target,
                        name: display_name,
                    }),
                    "Failed to remove user selection",
                );
                views::removal_failed()
            }
        };
        send_followup(self.followup.as_ref(), &self.token, &body).await;
    }
}

#[cfg(test)]
#[path = "components_tests.rs"]
mod tests;
