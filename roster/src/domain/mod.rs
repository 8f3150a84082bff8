//! Domain primitives, services and ports.
//!
//! Purpose: Model the class/specialisation vocabulary, member selections and
//! the role summary independently of the chat platform and the spreadsheet
//! backend. Adapters meet the domain only through [`ports`].
//!
//! Public surface:
//! - `GameClass`, `Specialization`, `ClassSpec` — the closed vocabulary.
//! - `Role`, `classify` — fixed role buckets.
//! - `SelectionRegistry` — implements `ports::MemberSelections`.
//! - `RoleStatisticsService` — implements `ports::RoleStatistics`.
//! - `SelectionWizard`, `PendingConfirmation` — interaction state machines.
//! - `AccessPolicy` — per-command channel and role gate.

pub mod aggregation;
pub mod audit;
pub mod authorization;
pub mod confirmation;
pub mod member;
pub mod ports;
pub mod records;
pub mod registry;
pub mod role;
pub mod selection;
pub mod vocabulary;
pub mod wizard;

pub use self::aggregation::{
    PopularityCounter, RoleStatisticsService, RoleSummaryRow, RoleSummarySnapshot,
    RoleSummaryTable, SummaryEntry, TOTAL_MARKER, recompute,
};
pub use self::authorization::{AccessPolicy, CallerContext, CommandKind, Denial, UnknownCommand};
pub use self::confirmation::{
    CONFIRMATION_TIMEOUT_SECS, ConfirmationError, ConfirmationSubject, PendingConfirmation,
};
pub use self::member::{
    CHARACTER_NAME_MAX, CharacterName, MemberId, MemberProfile, MemberValidationError,
};
pub use self::records::{
    SELECTION_HEADERS, SUMMARY_HEADERS, SheetRecord, format_store_timestamp, records_from_values,
};
pub use self::registry::SelectionRegistry;
pub use self::role::{ParseRoleError, ROLE_BUCKETS, Role, classify};
pub use self::selection::{SelectionNote, SelectionSubmission, StoredSelection};
pub use self::vocabulary::{ClassSpec, GameClass, Specialization, VocabularyError};
pub use self::wizard::{SelectionWizard, WIZARD_TIMEOUT_SECS, WizardError, WizardStep};
