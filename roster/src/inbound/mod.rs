//! Inbound adapters (HTTP interactions webhook).

pub mod http;
