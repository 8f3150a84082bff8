//! Test helpers for the interaction handlers.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use ed25519_dalek::SigningKey;
use serde_json::{Value, json};

use super::dto::InteractionDto;
use super::signature::InteractionVerifier;
use super::state::{HttpState, HttpStatePorts};
use crate::domain::AccessPolicy;
use crate::domain::ports::{MemberSelections, MockMemberSelections, MockRoleStatistics, RoleStatistics};
use crate::test_support::{MutableClock, RecordingFollowup};

/// Member id used for the caller in most tests.
pub const CALLER: &str = "100";

/// Instant every harness clock starts at.
pub fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 18, 30, 0)
        .single()
        .expect("valid timestamp")
}

/// Handler state plus the doubles tests inspect afterwards.
pub struct Harness {
    pub state: HttpState,
    pub followup: Arc<RecordingFollowup>,
    pub clock: Arc<MutableClock>,
}

/// Build handler state around optional port mocks.
pub fn harness(
    selections: Option<MockMemberSelections>,
    statistics: Option<MockRoleStatistics>,
    policy: AccessPolicy,
) -> Harness {
    let followup = Arc::new(RecordingFollowup::default());
    let clock = Arc::new(MutableClock::new(start()));
    let ports = HttpStatePorts {
        selections: selections.map(|mock| Arc::new(mock) as Arc<dyn MemberSelections>),
        statistics: statistics.map(|mock| Arc::new(mock) as Arc<dyn RoleStatistics>),
        followup: followup.clone(),
    };
    let verifier = InteractionVerifier::new(SigningKey::from_bytes(&[1_u8; 32]).verifying_key());
    Harness {
        state: HttpState::new(ports, policy, verifier, clock.clone()),
        followup,
        clock,
    }
}

fn member(id: &str, roles: &[&str]) -> Value {
    json!({
        "roles": roles,
        "user": { "id": id, "username": format!("user{id}"), "global_name": format!("User {id}") }
    })
}

/// Slash command issued by `caller` in channel `55`.
pub fn command(name: &str, caller: &str, roles: &[&str]) -> InteractionDto {
    decode(json!({
        "type": 2,
        "token": "command-token",
        "channel_id": "55",
        "member": member(caller, roles),
        "data": { "name": name }
    }))
}

/// Removal command targeting `target`.
pub fn removal(caller: &str, roles: &[&str], target: &str) -> InteractionDto {
    decode(json!({
        "type": 2,
        "token": "command-token",
        "channel_id": "55",
        "member": member(caller, roles),
        "data": {
            "name": "removeuser",
            "options": [{ "name": "user", "type": 6, "value": target }],
            "resolved": {
                "users": { target: { "id": target, "username": format!("user{target}") } },
                "members": { target: { "nick": "Target" } }
            }
        }
    }))
}

/// Select menu choice or button press.
pub fn component(custom_id: &str, caller: &str, values: &[&str]) -> InteractionDto {
    decode(json!({
        "type": 3,
        "token": "component-token",
        "channel_id": "55",
        "member": member(caller, &[]),
        "data": { "custom_id": custom_id, "component_type": 3, "values": values }
    }))
}

/// Name modal submission.
pub fn name_submission(custom_id: &str, caller: &str, name: &str) -> InteractionDto {
    decode(json!({
        "type": 5,
        "token": "modal-token",
        "channel_id": "55",
        "member": member(caller, &[]),
        "data": {
            "custom_id": custom_id,
            "components": [
                { "type": 1, "components": [
                    { "type": 4, "custom_id": "character_name", "value": name }
                ] }
            ]
        }
    }))
}

fn decode(value: Value) -> InteractionDto {
    serde_json::from_value(value).expect("interaction decodes")
}

/// Custom id of the component at `row`, `column` of a message body.
pub fn custom_id_at(body: &Value, row: usize, column: usize) -> String {
    body["components"][row]["components"][column]["custom_id"]
        .as_str()
        .expect("component custom id")
        .to_owned()
}
