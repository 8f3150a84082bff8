//! Errors raised while interpreting an interaction.
//!
//! None of these reach the platform as HTTP errors: the handler logs them
//! with the trace id and answers with the generic ephemeral notice.

use crate::domain::UnknownCommand;

/// Interaction could not be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InboundError {
    /// No member or user accompanied the interaction.
    #[error("interaction has no caller")]
    MissingCaller,
    /// A field required for the interaction kind is absent.
    #[error("interaction is missing {0}")]
    MissingData(&'static str),
    /// The component identifier is not one the bot issued.
    #[error("unrecognised custom id: {0}")]
    MalformedCustomId(String),
    /// The command is not registered by this bot.
    #[error(transparent)]
    UnknownCommand(#[from] UnknownCommand),
}
