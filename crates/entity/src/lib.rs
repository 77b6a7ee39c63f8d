//! Entity definitions for Commit
//!
//! This crate contains Sea-ORM entity definitions for the database models.
//! Entities mirror the Postgres schema created by the `migration` crate.

pub mod agreement_signatures;
pub mod agreements;
pub mod deliverable_dependencies;
pub mod deliverables;
pub mod sea_orm_active_enums;
pub mod team_members;
pub mod update_reactions;
pub mod updates;

pub use agreement_signatures::Entity as AgreementSignatures;
pub use agreements::Entity as Agreements;
pub use deliverable_dependencies::Entity as DeliverableDependencies;
pub use deliverables::Entity as Deliverables;
pub use team_members::Entity as TeamMembers;
pub use update_reactions::Entity as UpdateReactions;
pub use updates::Entity as Updates;
