//! HTTP inbound adapter receiving chat-platform interactions.

pub mod commands;
pub mod components;
pub mod custom_id;
pub mod dto;
pub mod error;
pub mod health;
pub mod interactions;
pub mod response;
pub mod sessions;
pub mod signature;
pub mod state;
#[cfg(test)]
pub mod test_utils;
mod views;

use std::future::Future;

use actix_web::rt;
use tracing::{Instrument, Span, error, warn};

use self::response::MessageBody;
use crate::domain::ports::{InteractionFollowup, RoleStatistics};
use crate::middleware::trace::TraceId;

pub use error::InboundError;

/// Run deferred work on the current worker, keeping the request's trace id
/// and span.
fn spawn_traced<F>(work: F)
where
    F: Future<Output = ()> + 'static,
{
    let work = work.instrument(Span::current());
    match TraceId::current() {
        Some(trace_id) => {
            rt::spawn(TraceId::scope(trace_id, work));
        }
        None => {
            rt::spawn(work);
        }
    }
}

/// Replace the deferred response with `body`. Failures are logged only.
async fn send_followup(followup: &dyn InteractionFollowup, token: &str, body: &MessageBody) {
    let message = match serde_json::to_value(body) {
        Ok(message) => message,
        Err(err) => {
            error!(error = %err, "follow-up body failed to serialise");
            return;
        }
    };
    if let Err(err) = followup.edit_original(token, message).await {
        warn!(error = %err, retryable = err.is_retryable(), "follow-up edit failed");
    }
}

/// Recompute the role summary after a mutation. Failures are logged only.
async fn refresh_summary(statistics: Option<&dyn RoleStatistics>) {
    let Some(statistics) = statistics else {
        return;
    };
    if let Err(err) = statistics.refresh().await {
        warn!(error = %err, "role summary refresh after mutation failed");
    }
}
