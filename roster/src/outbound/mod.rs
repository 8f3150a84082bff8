//! Outbound adapters implementing domain ports for external services.
//!
//! - **sheets**: Google Sheets v4 row-store with Drive lookup and bootstrap
//! - **discord**: Discord REST follow-ups and command registration
//!
//! Adapters are thin translators between domain types and remote payloads.
//! They contain no business logic.

pub mod discord;
pub mod sheets;
