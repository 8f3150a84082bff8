//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`Worksheet`, `InteractionFollowup`) are implemented by
//! outbound adapters. Driving ports (`MemberSelections`, `RoleStatistics`)
//! are implemented by domain services and consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod interaction_followup;
mod member_selections;
mod role_statistics;
mod worksheet;

#[cfg(test)]
pub use interaction_followup::MockInteractionFollowup;
pub use interaction_followup::{ChatRestError, InteractionFollowup};
#[cfg(test)]
pub use member_selections::MockMemberSelections;
pub use member_selections::{DeleteOutcome, MemberSelections, SaveOutcome};
#[cfg(test)]
pub use role_statistics::MockRoleStatistics;
pub use role_statistics::RoleStatistics;
#[cfg(test)]
pub use worksheet::MockWorksheet;
pub use worksheet::{RowPosition, RowStoreError, Worksheet};
