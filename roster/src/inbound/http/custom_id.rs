//! Component identifiers issued by the bot.
//!
//! Every select menu, button and modal carries a `custom_id` of the form
//! `<kind>:<session uuid>:<action>` so the answering interaction can be
//! routed back to its session.

use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

use super::error::InboundError;

/// Modal text input holding the character name.
pub const CHARACTER_NAME_INPUT: &str = "character_name";

/// Wizard events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardAction {
    /// Class select menu.
    Class,
    /// Character name modal.
    Name,
    /// Specialisation select menu.
    Spec,
    /// "Back to Classes" button.
    Back,
    /// "Cancel" button.
    Cancel,
}

/// Confirmation answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    /// Proceed with the destructive action.
    Yes,
    /// Abandon it.
    No,
}

/// Parsed component identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomId {
    /// Belongs to a selection wizard.
    Wizard {
        /// Session key.
        session: Uuid,
        /// Event.
        action: WizardAction,
    },
    /// Belongs to a pending confirmation.
    Confirm {
        /// Session key.
        session: Uuid,
        /// Answer.
        action: ConfirmAction,
    },
}

impl CustomId {
    /// Wizard component identifier.
    pub fn wizard(session: Uuid, action: WizardAction) -> Self {
        Self::Wizard { session, action }
    }

    /// Confirmation button identifier.
    pub fn confirm(session: Uuid, action: ConfirmAction) -> Self {
        Self::Confirm { session, action }
    }

    /// Session key.
    pub fn session(self) -> Uuid {
        match self {
            Self::Wizard { session, .. } | Self::Confirm { session, .. } => session,
        }
    }
}

impl fmt::Display for CustomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wizard { session, action } => {
                let action = match action {
                    WizardAction::Class => "class",
                    WizardAction::Name => "name",
                    WizardAction::Spec => "spec",
                    WizardAction::Back => "back",
                    WizardAction::Cancel => "cancel",
                };
                write!(f, "wizard:{session}:{action}")
            }
            Self::Confirm { session, action } => {
                let action = match action {
                    ConfirmAction::Yes => "yes",
                    ConfirmAction::No => "no",
                };
                write!(f, "confirm:{session}:{action}")
            }
        }
    }
}

impl FromStr for CustomId {
    type Err = InboundError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let malformed = || InboundError::MalformedCustomId(value.to_owned());
        let mut parts = value.splitn(3, ':');
        let (Some(kind), Some(session), Some(action)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(malformed());
        };
        let session = Uuid::parse_str(session).map_err(|_| malformed())?;
        match (kind, action) {
            ("wizard", "class") => Ok(Self::wizard(session, WizardAction::Class)),
            ("wizard", "name") => Ok(Self::wizard(session, WizardAction::Name)),
            ("wizard", "spec") => Ok(Self::wizard(session, WizardAction::Spec)),
            ("wizard", "back") => Ok(Self::wizard(session, WizardAction::Back)),
            ("wizard", "cancel") => Ok(Self::wizard(session, WizardAction::Cancel)),
            ("confirm", "yes") => Ok(Self::confirm(session, ConfirmAction::Yes)),
            ("confirm", "no") => Ok(Self::confirm(session, ConfirmAction::No)),
            _ => Err(malformed()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::class(WizardAction::Class)]
    #[case::name(WizardAction::Name)]
    #[case::spec(WizardAction::Spec)]
    #[case::back(WizardAction::Back)]
    #[case::cancel(WizardAction::Cancel)]
    fn wizard_ids_survive_the_platform(#[case] action: WizardAction) {
        let id = CustomId::wizard(Uuid::new_v4(), action);

        assert_eq!(id.to_string().parse::<CustomId>(), Ok(id));
    }

    #[test]
    fn confirm_ids_carry_the_session() {
        let session = Uuid::new_v4();
        let parsed: CustomId = format!("confirm:{session}:no").parse().expect("parses");

        assert_eq!(parsed.session(), session);
        assert_eq!(parsed, CustomId::confirm(session, ConfirmAction::No));
    }

    #[rstest]
    #[case::empty("")]
    #[case::foreign_kind("poll:00000000-0000-0000-0000-000000000000:yes")]
    #[case::bad_uuid("wizard:nope:class")]
    #[case::bad_action("confirm:00000000-0000-0000-0000-000000000000:maybe")]
    fn foreign_ids_are_rejected(#[case] raw: &str) {
        assert_eq!(
            raw.parse::<CustomId>(),
            Err(InboundError::MalformedCustomId(raw.to_owned()))
        );
    }
}
