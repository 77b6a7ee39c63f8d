//! # Commit Services
//!
//! The aggregation core of the Commit application:
//!
//! - [`agreements`]: agreement lifecycle, signatures, and the optimistic
//!   delete/undo workflow
//! - [`deliverables`]: deliverable lifecycle, progress-derived status, and
//!   dependency-graph maintenance
//! - [`analytics`]: cross-cutting metrics computed from the raw collections
//! - [`undo`]: id-keyed countdown timers backing delete-with-undo
//! - [`state`]: the shared per-view list with functional updates and
//!   stale-load suppression
//! - [`current_user`]: the pluggable current-user resolver
//! - [`dto`]: validated request payloads

pub mod agreements;
pub mod analytics;
pub mod current_user;
pub mod deliverables;
pub mod dto;
pub mod state;
pub mod undo;

pub use agreements::{AgreementService, AgreementWithSignatures, SignatureDisplay};
pub use analytics::{compute_metrics, AnalyticsMetrics, AnalyticsService, RawAnalytics};
pub use current_user::{CurrentUserResolver, FirstTeamMember};
pub use deliverables::{derive_status, DeliverableService, DeliverableWithDetails};
pub use state::ViewState;
pub use undo::{PendingDeletion, UndoQueue};
