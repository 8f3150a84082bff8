//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without network I/O.

use std::sync::Arc;

use mockable::Clock;

use super::sessions::SessionStore;
use super::signature::InteractionVerifier;
use crate::domain::AccessPolicy;
use crate::domain::ports::{InteractionFollowup, MemberSelections, RoleStatistics};

/// Parameter object bundling the port implementations for handlers.
///
/// The row-store ports are optional: when the spreadsheet could not be
/// opened at startup the bot still answers, reporting the store as
/// unavailable.
#[derive(Clone)]
pub struct HttpStatePorts {
    /// Selection registry, when the row-store is available.
    pub selections: Option<Arc<dyn MemberSelections>>,
    /// Role statistics, when the row-store is available.
    pub statistics: Option<Arc<dyn RoleStatistics>>,
    /// Completes deferred interactions.
    pub followup: Arc<dyn InteractionFollowup>,
}

/// Dependency bundle for interaction handlers.
#[derive(Clone)]
pub struct HttpState {
    pub selections: Option<Arc<dyn MemberSelections>>,
    pub statistics: Option<Arc<dyn RoleStatistics>>,
    pub followup: Arc<dyn InteractionFollowup>,
    pub policy: AccessPolicy,
    pub sessions: Arc<SessionStore>,
    pub clock: Arc<dyn Clock>,
    pub verifier: InteractionVerifier,
}

impl HttpState {
    /// Construct state from ports and request-handling settings.
    pub fn new(
        ports: HttpStatePorts,
        policy: AccessPolicy,
        verifier: InteractionVerifier,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let HttpStatePorts {
            selections,
            statistics,
            followup,
        } = ports;
        Self {
            selections,
            statistics,
            followup,
            policy,
            sessions: Arc::new(SessionStore::new()),
            clock,
            verifier,
        }
    }
}
