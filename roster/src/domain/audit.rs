//! Structured audit events for member, admin and security actions.
//!
//! Events are emitted on the `roster::audit` target so a subscriber can
//! route them separately from operational logs.

use tracing::{info, warn};

use super::member::{MemberId, MemberProfile};

/// Record an action a member performed on their own data.
pub fn user_action(member: &MemberProfile, action: &str, details: &str) {
    info!(
        target: "roster::audit",
        member_id = %member.id,
        handle = %member.handle,
        action,
        details,
        "USER ACTION"
    );
}

/// Subject of an administrative action.
#[derive(Debug, Clone, Copy)]
pub struct AuditTarget<'a> {
    /// Identifier of the affected member.
    pub id: &'a MemberId,
    /// Handle or display name of the affected member.
    pub name: &'a str,
}

/// Record an action an administrator performed, optionally on another member.
pub fn admin_action(
    admin: &MemberProfile,
    action: &str,
    target: Option<AuditTarget<'_>>,
    details: &str,
) {
    match target {
        Some(target) => info!(
            target: "roster::audit",
            member_id = %admin.id,
            handle = %admin.handle,
            action,
            target_id = %target.id,
            target_name = target.name,
            details,
            "ADMIN ACTION"
        ),
        None => info!(
            target: "roster::audit",
            member_id = %admin.id,
            handle = %admin.handle,
            action,
            details,
            "ADMIN ACTION"
        ),
    }
}

/// Record a rejected or suspicious request.
pub fn security_event(member: &MemberProfile, action: &str, details: &str) {
    warn!(
        target: "roster::audit",
        member_id = %member.id,
        handle = %member.handle,
        action,
        details,
        "SECURITY EVENT"
    );
}
