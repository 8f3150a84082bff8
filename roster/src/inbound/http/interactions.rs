//! Interaction webhook endpoint.
//!
//! ```text
//! POST /interactions
//! X-Signature-Ed25519: <hex>
//! X-Signature-Timestamp: <unix seconds>
//! ```
//!
//! Unsigned or forged requests get 401 and undecodable bodies 400. Every
//! accepted interaction is answered with 200 and an interaction response,
//! including failures, which become the generic ephemeral notice.

use actix_web::http::header::HeaderMap;
use actix_web::{HttpRequest, HttpResponse, post, web};
use tracing::{error, warn};

use super::commands::handle_command;
use super::components::handle_component;
use super::dto::{InteractionDto, InteractionKind};
use super::response::InteractionResponse;
use super::signature::{SIGNATURE_HEADER, TIMESTAMP_HEADER};
use super::state::HttpState;
use super::views;
use crate::middleware::trace::TraceId;

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

fn trace_label() -> String {
    TraceId::current().map_or_else(String::new, |id| id.to_string())
}

/// Receive one interaction from the chat platform.
#[post("/interactions")]
pub async fn interactions(
    state: web::Data<HttpState>,
    request: HttpRequest,
    body: web::Bytes,
) -> HttpResponse {
    let headers = request.headers();
    let (Some(signature), Some(timestamp)) = (
        header(headers, SIGNATURE_HEADER),
        header(headers, TIMESTAMP_HEADER),
    ) else {
        warn!(trace_id = %trace_label(), "interaction without signature headers");
        return HttpResponse::Unauthorized().finish();
    };
    if let Err(err) = state.verifier.verify(timestamp, &body, signature) {
        warn!(trace_id = %trace_label(), error = %err, "interaction signature rejected");
        return HttpResponse::Unauthorized().finish();
    }

    let interaction: InteractionDto = match serde_json::from_slice(&body) {
        Ok(interaction) => interaction,
        Err(err) => {
            warn!(trace_id = %trace_label(), error = %err, "undecodable interaction");
            return HttpResponse::BadRequest().finish();
        }
    };

    let outcome = match interaction.kind() {
        InteractionKind::Ping => Ok(InteractionResponse::pong()),
        InteractionKind::ApplicationCommand => handle_command(&state, &interaction).await,
        InteractionKind::MessageComponent | InteractionKind::ModalSubmit => {
            handle_component(&state, &interaction).await
        }
        InteractionKind::Unsupported(kind) => {
            warn!(trace_id = %trace_label(), kind, "unsupported interaction type");
            return HttpResponse::BadRequest().finish();
        }
    };

    let response = outcome.unwrap_or_else(|err| {
        error!(trace_id = %trace_label(), error = %err, "interaction failed");
        InteractionResponse::ephemeral_text(views::GENERIC_ERROR)
    });
    HttpResponse::Ok().json(response)
}
