//! Selection wizard state machine.
//!
//! A wizard walks one member through class, character name and
//! specialisation. Only the member who opened it may drive it, and it
//! lapses after [`WIZARD_TIMEOUT_SECS`] seconds without activity. The
//! wizard persists nothing; its terminal transition yields a
//! [`SelectionSubmission`] for the registry.

use chrono::{DateTime, TimeDelta, Utc};

use super::member::{CharacterName, MemberId, MemberProfile, MemberValidationError};
use super::selection::SelectionSubmission;
use super::vocabulary::{ClassSpec, GameClass, VocabularyError};

/// Inactivity window for a wizard, in seconds.
pub const WIZARD_TIMEOUT_SECS: i64 = 300;

fn wizard_timeout() -> TimeDelta {
    TimeDelta::seconds(WIZARD_TIMEOUT_SECS)
}

/// Current step of a wizard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardStep {
    /// Waiting for a class choice.
    AwaitingClass,
    /// Class chosen; waiting for the character name.
    AwaitingNickname {
        /// Chosen class.
        class: GameClass,
    },
    /// Waiting for a specialisation of the chosen class.
    AwaitingSpecialization {
        /// Chosen class.
        class: GameClass,
        /// Entered character name.
        character: CharacterName,
    },
    /// Completed with a valid submission.
    Confirmed,
    /// Abandoned by the owner.
    Cancelled,
}

impl WizardStep {
    fn name(&self) -> &'static str {
        match self {
            Self::AwaitingClass => "class",
            Self::AwaitingNickname { .. } => "nickname",
            Self::AwaitingSpecialization { .. } => "specialization",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether no further transitions are possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Confirmed | Self::Cancelled)
    }
}

/// Errors raised by wizard transitions. None of them mutate the wizard.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    /// Someone other than the owner tried to drive the wizard.
    #[error("wizard belongs to another member")]
    ForeignActor,
    /// The inactivity window elapsed.
    #[error("wizard expired")]
    Expired,
    /// The event does not fit the current step.
    #[error("unexpected {event} while at the {step} step")]
    OutOfOrder {
        /// Event received.
        event: &'static str,
        /// Step the wizard was at.
        step: &'static str,
    },
    /// The character name failed validation.
    #[error(transparent)]
    InvalidName(#[from] MemberValidationError),
    /// The class or specialisation is not in the vocabulary.
    #[error(transparent)]
    InvalidChoice(#[from] VocabularyError),
}

/// Per-member wizard instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionWizard {
    owner: MemberProfile,
    step: WizardStep,
    expires_at: DateTime<Utc>,
}

impl SelectionWizard {
    /// Open a wizard for `owner` at `now`.
    pub fn open(owner: MemberProfile, now: DateTime<Utc>) -> Self {
        Self {
            owner,
            step: WizardStep::AwaitingClass,
            expires_at: now + wizard_timeout(),
        }
    }

    /// Member who opened the wizard.
    pub fn owner(&self) -> &MemberProfile {
        &self.owner
    }

    /// Current step.
    pub fn step(&self) -> &WizardStep {
        &self.step
    }

    /// Whether the wizard has lapsed at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    fn guard(&self, actor: &MemberId, now: DateTime<Utc>) -> Result<(), WizardError> {
        if actor != &self.owner.id {
            return Err(WizardError::ForeignActor);
        }
        if self.is_expired(now) || self.step.is_terminal() {
            return Err(WizardError::Expired);
        }
        Ok(())
    }

    fn advance(&mut self, step: WizardStep, now: DateTime<Utc>) {
        self.step = step;
        self.expires_at = now + wizard_timeout();
    }

    fn out_of_order(&self, event: &'static str) -> WizardError {
        WizardError::OutOfOrder {
            event,
            step: self.step.name(),
        }
    }

    /// Record the class choice.
    ///
    /// Accepted while waiting for a class or a name, since the class menu
    /// stays visible while the name prompt is open.
    ///
    /// # Errors
    ///
    /// Returns [`WizardError`] for foreign actors, lapsed wizards, unknown
    /// classes and events at the wrong step.
    pub fn choose_class(
        &mut self,
        actor: &MemberId,
        label: &str,
        now: DateTime<Utc>,
    ) -> Result<GameClass, WizardError> {
        self.guard(actor, now)?;
        if !matches!(
            self.step,
            WizardStep::AwaitingClass | WizardStep::AwaitingNickname { .. }
        ) {
            return Err(self.out_of_order("class choice"));
        }
        let class = label.parse::<GameClass>()?;
        self.advance(WizardStep::AwaitingNickname { class }, now);
        Ok(class)
    }

    /// Record the character name.
    ///
    /// # Errors
    ///
    /// Returns [`WizardError`] for foreign actors, lapsed wizards, invalid
    /// names and events at the wrong step.
    pub fn submit_name(
        &mut self,
        actor: &MemberId,
        name: &str,
        now: DateTime<Utc>,
    ) -> Result<(GameClass, CharacterName), WizardError> {
        self.guard(actor, now)?;
        let WizardStep::AwaitingNickname { class } = self.step else {
            return Err(self.out_of_order("character name"));
        };
        let character = CharacterName::new(name)?;
        self.advance(
            WizardStep::AwaitingSpecialization {
                class,
                character: character.clone(),
            },
            now,
        );
        Ok((class, character))
    }

    /// Record the specialisation and complete the wizard.
    ///
    /// # Errors
    ///
    /// Returns [`WizardError`] for foreign actors, lapsed wizards,
    /// specialisations outside the chosen class and events at the wrong
    /// step.
    pub fn choose_specialization(
        &mut self,
        actor: &MemberId,
        label: &str,
        now: DateTime<Utc>,
    ) -> Result<SelectionSubmission, WizardError> {
        self.guard(actor, now)?;
        let WizardStep::AwaitingSpecialization { class, character } = &self.step else {
            return Err(self.out_of_order("specialization choice"));
        };
        let spec = class.specialization_named(label)?;
        let pick = ClassSpec::new(*class, spec)?;
        let submission = SelectionSubmission::new(self.owner.clone(), character.clone(), pick);
        self.advance(WizardStep::Confirmed, now);
        Ok(submission)
    }

    /// Return to the class step, discarding the class and name.
    ///
    /// # Errors
    ///
    /// Returns [`WizardError`] for foreign actors, lapsed wizards and
    /// events outside the specialisation step.
    pub fn back(&mut self, actor: &MemberId, now: DateTime<Utc>) -> Result<(), WizardError> {
        self.guard(actor, now)?;
        if !matches!(self.step, WizardStep::AwaitingSpecialization { .. }) {
            return Err(self.out_of_order("back"));
        }
        self.advance(WizardStep::AwaitingClass, now);
        Ok(())
    }

    /// Abandon the wizard.
    ///
    /// # Errors
    ///
    /// Returns [`WizardError`] for foreign actors and lapsed wizards.
    pub fn cancel(&mut self, actor: &MemberId, now: DateTime<Utc>) -> Result<(), WizardError> {
        self.guard(actor, now)?;
        self.step = WizardStep::Cancelled;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Specialization;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    #[fixture]
    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 20, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    fn owner() -> MemberProfile {
        MemberProfile::new(MemberId::new("1").expect("id"), "thrall", "Thrall")
    }

    fn stranger() -> MemberId {
        MemberId::new("2").expect("id")
    }

    #[rstest]
    fn walks_through_every_step(start: DateTime<Utc>) {
        let id = owner().id;
        let mut wizard = SelectionWizard::open(owner(), start);

        assert_eq!(wizard.choose_class(&id, "Shaman", start), Ok(GameClass::Shaman));
        let (_, name) = wizard.submit_name(&id, " Go'el ", start).expect("name accepted");
        assert_eq!(name.as_ref(), "Go'el");
        let submission = wizard
            .choose_specialization(&id, "Enhancement", start)
            .expect("spec accepted");

        assert_eq!(submission.pick.spec(), Specialization::Enhancement);
        assert_eq!(submission.member, owner());
        assert_eq!(wizard.step(), &WizardStep::Confirmed);
    }

    #[rstest]
    fn foreign_actor_is_rejected_without_mutation(start: DateTime<Utc>) {
        let mut wizard = SelectionWizard::open(owner(), start);
        let before = wizard.clone();

        let error = wizard
            .choose_class(&stranger(), "Mage", start)
            .expect_err("stranger rejected");

        assert_eq!(error, WizardError::ForeignActor);
        assert_eq!(wizard, before);
    }

    #[rstest]
    fn lapses_after_timeout(start: DateTime<Utc>) {
        let id = owner().id;
        let mut wizard = SelectionWizard::open(owner(), start);
        let late = start + wizard_timeout();

        assert_eq!(wizard.choose_class(&id, "Mage", late), Err(WizardError::Expired));
    }

    #[rstest]
    fn activity_extends_the_window(start: DateTime<Utc>) {
        let id = owner().id;
        let mut wizard = SelectionWizard::open(owner(), start);
        let later = start + TimeDelta::seconds(WIZARD_TIMEOUT_SECS - 1);
        wizard.choose_class(&id, "Mage", later).expect("class accepted");

        let still_open = later + TimeDelta::seconds(WIZARD_TIMEOUT_SECS - 1);
        assert!(wizard.submit_name(&id, "Khadgar", still_open).is_ok());
    }

    #[rstest]
    fn specialization_must_belong_to_class(start: DateTime<Utc>) {
        let id = owner().id;
        let mut wizard = SelectionWizard::open(owner(), start);
        wizard.choose_class(&id, "Mage", start).expect("class");
        wizard.submit_name(&id, "Jaina", start).expect("name");

        let error = wizard
            .choose_specialization(&id, "Holy", start)
            .expect_err("foreign spec rejected");

        assert!(matches!(error, WizardError::InvalidChoice(_)));
        assert!(matches!(wizard.step(), WizardStep::AwaitingSpecialization { .. }));
    }

    #[rstest]
    fn back_returns_to_class_step(start: DateTime<Utc>) {
        let id = owner().id;
        let mut wizard = SelectionWizard::open(owner(), start);
        wizard.choose_class(&id, "Rogue", start).expect("class");
        wizard.submit_name(&id, "Valeera", start).expect("name");

        wizard.back(&id, start).expect("back accepted");

        assert_eq!(wizard.step(), &WizardStep::AwaitingClass);
        assert!(matches!(
            wizard.submit_name(&id, "Valeera", start),
            Err(WizardError::OutOfOrder { .. })
        ));
    }

    #[rstest]
    fn class_can_be_rechosen_while_naming(start: DateTime<Utc>) {
        let id = owner().id;
        let mut wizard = SelectionWizard::open(owner(), start);
        wizard.choose_class(&id, "Rogue", start).expect("class");

        assert_eq!(wizard.choose_class(&id, "Monk", start), Ok(GameClass::Monk));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn blank_names_are_rejected(start: DateTime<Utc>, #[case] name: &str) {
        let id = owner().id;
        let mut wizard = SelectionWizard::open(owner(), start);
        wizard.choose_class(&id, "Druid", start).expect("class");

        assert!(matches!(
            wizard.submit_name(&id, name, start),
            Err(WizardError::InvalidName(_))
        ));
    }

    #[rstest]
    fn cancelled_wizard_accepts_nothing(start: DateTime<Utc>) {
        let id = owner().id;
        let mut wizard = SelectionWizard::open(owner(), start);
        wizard.cancel(&id, start).expect("cancel accepted");

        assert_eq!(wizard.choose_class(&id, "Mage", start), Err(WizardError::Expired));
    }
}
