//! Active enum re-exports
//!
//! Convenience module mirroring the layout produced by entity generation.

pub use crate::{
    agreements::AgreementStatus,
    deliverables::DeliverableStatus,
    team_members::MemberRole,
};
