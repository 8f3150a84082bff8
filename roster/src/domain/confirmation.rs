//! Pending confirmations for destructive commands.

use chrono::{DateTime, TimeDelta, Utc};

use super::member::{MemberId, MemberProfile};

/// Window in which a confirmation may be answered, in seconds.
pub const CONFIRMATION_TIMEOUT_SECS: i64 = 60;

/// Row a confirmation would remove.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationSubject {
    /// The owner's own selection.
    OwnSelection,
    /// Another member's selection, removed by an administrator.
    MemberSelection {
        /// Member whose row is removed.
        target: MemberId,
        /// Name shown in messages about the target.
        display_name: String,
    },
}

/// Errors raised when answering a confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConfirmationError {
    /// Someone other than the requester answered.
    #[error("confirmation belongs to another member")]
    ForeignActor,
    /// The confirmation window elapsed.
    #[error("confirmation expired")]
    Expired,
}

/// A destructive action awaiting the requester's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingConfirmation {
    owner: MemberProfile,
    subject: ConfirmationSubject,
    expires_at: DateTime<Utc>,
}

impl PendingConfirmation {
    /// Open a confirmation for `owner` at `now`.
    pub fn open(owner: MemberProfile, subject: ConfirmationSubject, now: DateTime<Utc>) -> Self {
        Self {
            owner,
            subject,
            expires_at: now + TimeDelta::seconds(CONFIRMATION_TIMEOUT_SECS),
        }
    }

    /// Member who requested the action.
    pub fn owner(&self) -> &MemberProfile {
        &self.owner
    }

    /// What would be removed.
    pub fn subject(&self) -> &ConfirmationSubject {
        &self.subject
    }

    /// Whether the window has elapsed at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Check that `actor` may answer at `now`.
    ///
    /// The same check guards both confirming and cancelling.
    ///
    /// # Errors
    ///
    /// Returns [`ConfirmationError`] for foreign actors and elapsed windows.
    pub fn answer(
        &self,
        actor: &MemberId,
        now: DateTime<Utc>,
    ) -> Result<&ConfirmationSubject, ConfirmationError> {
        if actor != &self.owner.id {
            return Err(ConfirmationError::ForeignActor);
        }
        if self.is_expired(now) {
            return Err(ConfirmationError::Expired);
        }
        Ok(&self.subject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 2, 8, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    fn admin() -> MemberProfile {
        MemberProfile::new(MemberId::new("10").expect("id"), "admin", "Admin")
    }

    fn removal() -> ConfirmationSubject {
        ConfirmationSubject::MemberSelection {
            target: MemberId::new("20").expect("id"),
            display_name: "Target".to_owned(),
        }
    }

    #[test]
    fn owner_may_answer_within_window() {
        let pending = PendingConfirmation::open(admin(), removal(), now());
        let just_in_time = now() + TimeDelta::seconds(CONFIRMATION_TIMEOUT_SECS - 1);

        assert_eq!(pending.answer(&admin().id, just_in_time), Ok(&removal()));
    }

    #[test]
    fn answers_lapse_after_sixty_seconds() {
        let pending = PendingConfirmation::open(admin(), ConfirmationSubject::OwnSelection, now());
        let late = now() + TimeDelta::seconds(CONFIRMATION_TIMEOUT_SECS);

        assert_eq!(
            pending.answer(&admin().id, late),
            Err(ConfirmationError::Expired)
        );
    }

    #[test]
    fn target_cannot_answer_for_the_admin() {
        let pending = PendingConfirmation::open(admin(), removal(), now());

        assert_eq!(
            pending.answer(&MemberId::new("20").expect("id"), now()),
            Err(ConfirmationError::ForeignActor)
        );
    }
}
