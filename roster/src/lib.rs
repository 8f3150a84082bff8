//! Roster library modules.
//!
//! Records each community member's class and specialisation selection in a
//! spreadsheet, maintains a role summary, and serves the chat platform's
//! interactions webhook.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Request tracing middleware attached to every route.
pub use middleware::Trace;
