//! Discord REST adapters.
//!
//! Implements the `InteractionFollowup` port and slash-command
//! registration.

mod rest;

pub use rest::{DISCORD_API_BASE, DiscordRest, command_definitions};
