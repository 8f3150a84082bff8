//! Driven port completing deferred chat interactions.
//!
//! The chat platform requires an answer within a few seconds. Slow work is
//! acknowledged with a deferred response and finished later by editing the
//! original response through this port.

use async_trait::async_trait;
use serde_json::Value;

use super::define_port_error;

define_port_error! {
    /// Errors surfaced by the chat platform REST adapter.
    pub enum ChatRestError {
        /// Network transport failed before a response arrived.
        Transport { message: String } retryable =>
            "chat platform transport failed: {message}",
        /// The platform answered with a non-success status.
        Rejected { status: u16, message: String } =>
            "chat platform rejected request with status {status}: {message}",
        /// The response body could not be decoded.
        Decode { message: String } =>
            "chat platform response decode failed: {message}",
    }
}

/// Port editing the original response of a deferred interaction.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InteractionFollowup: Send + Sync {
    /// Replace the original response identified by the interaction `token`
    /// with `message`, a rendered message body.
    async fn edit_original(&self, token: &str, message: Value) -> Result<(), ChatRestError>;
}
