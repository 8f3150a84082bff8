//! Per-command authorisation gate.
//!
//! Three independent predicates run before a command touches the registry:
//! the designated channel, the member role and, for the removal command, the
//! admin role. An unset restriction always passes. Denials are reported in
//! priority order: wrong channel, then missing role, then a generic refusal.

use std::fmt;
use std::str::FromStr;

/// Commands exposed to members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    /// Open the selection wizard.
    SetSelection,
    /// Show the caller's stored selection.
    ViewOwnSelection,
    /// List every class and specialisation.
    ListCategories,
    /// Show the stored role summary.
    ViewRoleStatistics,
    /// Recompute the role summary now.
    RecomputeStatistics,
    /// Delete the caller's selection after confirmation.
    DeleteOwnSelection,
    /// Remove another member's selection after confirmation.
    AdminRemoveSelection,
}

impl CommandKind {
    /// Every command in registration order.
    pub const ALL: [Self; 7] = [
        Self::SetSelection,
        Self::ViewOwnSelection,
        Self::ListCategories,
        Self::ViewRoleStatistics,
        Self::RecomputeStatistics,
        Self::DeleteOwnSelection,
        Self::AdminRemoveSelection,
    ];

    /// Slash-command name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::SetSelection => "setclass",
            Self::ViewOwnSelection => "myclass",
            Self::ListCategories => "classlist",
            Self::ViewRoleStatistics => "rolestats",
            Self::RecomputeStatistics => "refreshstats",
            Self::DeleteOwnSelection => "deleteclass",
            Self::AdminRemoveSelection => "removeuser",
        }
    }

    /// Short description shown by the chat client.
    pub const fn description(self) -> &'static str {
        match self {
            Self::SetSelection => "Set your WoW class and specialization",
            Self::ViewOwnSelection => "View your current class and specialization",
            Self::ListCategories => "View all available classes and specializations",
            Self::ViewRoleStatistics => "View role distribution statistics",
            Self::RecomputeStatistics => "Manually refresh role statistics",
            Self::DeleteOwnSelection => "Delete your class and specialization selection",
            Self::AdminRemoveSelection => "[ADMIN] Remove a user's class selection",
        }
    }

    /// Whether the admin role gates the command instead of the member role.
    pub const fn requires_admin(self) -> bool {
        matches!(self, Self::AdminRemoveSelection)
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.name())
    }
}

/// Error returned for unknown command names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown command: {0}")]
pub struct UnknownCommand(pub String);

impl FromStr for CommandKind {
    type Err = UnknownCommand;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|command| command.name() == value)
            .ok_or_else(|| UnknownCommand(value.to_owned()))
    }
}

/// Channel and role context of the invoking member.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallerContext {
    /// Channel the command was issued in.
    pub channel_id: Option<String>,
    /// Role identifiers the member holds.
    pub role_ids: Vec<String>,
}

impl CallerContext {
    fn holds(&self, role: &str) -> bool {
        self.role_ids.iter().any(|held| held == role)
    }
}

/// Reason a command was refused, in reporting priority order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Denial {
    /// Issued outside the designated channel.
    #[error("This command can only be used in <#{channel_id}>!")]
    WrongChannel {
        /// Designated channel.
        channel_id: String,
    },
    /// The member role is missing.
    #[error("You need the <@&{role_id}> role to use this command!")]
    MissingRole {
        /// Required role.
        role_id: String,
    },
    /// Any other refusal, including a missing admin role.
    #[error("You don't have permission to use this command!")]
    NoPermission,
}

impl Denial {
    /// Audit action name for the refusal.
    pub fn audit_action(&self, command: CommandKind) -> &'static str {
        match self {
            Self::WrongChannel { .. } => "WRONG_CHANNEL_ATTEMPT",
            _ if command.requires_admin() => "UNAUTHORIZED_ADMIN_ATTEMPT",
            Self::MissingRole { .. } => "UNAUTHORIZED_ACCESS_ATTEMPT",
            Self::NoPermission => "PERMISSION_DENIED",
        }
    }
}

/// Configured restrictions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessPolicy {
    /// Designated channel, if any.
    pub channel_id: Option<String>,
    /// Role required for member commands, if any.
    pub required_role: Option<String>,
    /// Role required for the removal command, if any.
    pub admin_role: Option<String>,
}

impl AccessPolicy {
    /// Decide whether `caller` may run `command`.
    ///
    /// # Errors
    ///
    /// Returns the highest-priority [`Denial`] when any predicate fails.
    ///
    /// # Examples
    /// ```
    /// use roster::domain::{AccessPolicy, CallerContext, CommandKind, Denial};
    ///
    /// let policy = AccessPolicy {
    ///     channel_id: Some("55".into()),
    ///     required_role: Some("7".into()),
    ///     admin_role: None,
    /// };
    /// let caller = CallerContext { channel_id: Some("56".into()), role_ids: vec![] };
    /// assert!(matches!(
    ///     policy.authorize(CommandKind::SetSelection, &caller),
    ///     Err(Denial::WrongChannel { .. })
    /// ));
    /// ```
    pub fn authorize(&self, command: CommandKind, caller: &CallerContext) -> Result<(), Denial> {
        if let Some(channel_id) = &self.channel_id {
            if caller.channel_id.as_ref() != Some(channel_id) {
                return Err(Denial::WrongChannel {
                    channel_id: channel_id.clone(),
                });
            }
        }

        if command.requires_admin() {
            return match &self.admin_role {
                Some(role) if !caller.holds(role) => Err(Denial::NoPermission),
                _ => Ok(()),
            };
        }

        match &self.required_role {
            Some(role) if !caller.holds(role) => Err(Denial::MissingRole {
                role_id: role.clone(),
            }),
            _ => Ok(()),
        }
    }
}
