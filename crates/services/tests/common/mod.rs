//! # Common Test Utilities
//!
//! Shared fixtures and mock-database helpers for service tests. The mock
//! connection replays appended result sets in query order, so each test
//! appends exactly the sequence its service calls will consume.

#![allow(dead_code)]

use std::sync::Once;

use chrono::{DateTime, Duration, TimeZone, Utc};
use entity::{
    agreement_signatures, agreements,
    agreements::AgreementStatus,
    deliverable_dependencies, deliverables,
    deliverables::DeliverableStatus,
    team_members,
    team_members::MemberRole,
};
use uuid::Uuid;

/// Initialize test logging (run once per test session)
static INIT: Once = Once::new();

/// Initialize test environment including structured logging
pub fn init_test_env() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

/// A fixed "now" so fixtures are stable within a test.
pub fn fixed_now() -> DateTime<Utc> { Utc.with_ymd_and_hms(2026, 8, 7, 12, 0, 0).unwrap() }

/// Team member fixture. `age_days` staggers creation order.
pub fn member(name: &str, age_days: i64) -> team_members::Model {
    team_members::Model {
        id:         Uuid::new_v4(),
        name:       name.to_string(),
        email:      format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        avatar_url: None,
        role:       MemberRole::Member,
        created_at: fixed_now() - Duration::days(age_days),
    }
}

/// Agreement fixture. `age_days` staggers newest-first ordering.
pub fn agreement(title: &str, status: AgreementStatus, age_days: i64) -> agreements::Model {
    agreements::Model {
        id:          Uuid::new_v4(),
        title:       title.to_string(),
        description: Some(format!("{} description", title)),
        status,
        created_by:  None,
        created_at:  fixed_now() - Duration::days(age_days),
        updated_at:  fixed_now() - Duration::days(age_days),
    }
}

/// Signature fixture.
pub fn signature(agreement_id: Uuid, member_id: Uuid) -> agreement_signatures::Model {
    agreement_signatures::Model {
        id: Uuid::new_v4(),
        agreement_id,
        member_id,
        signed_at: fixed_now() - Duration::hours(1),
    }
}

/// Deliverable fixture.
pub fn deliverable(title: &str, owner_id: Option<Uuid>, status: DeliverableStatus) -> deliverables::Model {
    deliverables::Model {
        id: Uuid::new_v4(),
        title: title.to_string(),
        description: None,
        owner_id,
        deadline: None,
        progress: 0,
        status,
        created_at: fixed_now() - Duration::days(5),
        updated_at: fixed_now() - Duration::days(5),
    }
}

/// Dependency edge fixture.
pub fn dependency(deliverable_id: Uuid, depends_on_id: Uuid) -> deliverable_dependencies::Model {
    deliverable_dependencies::Model {
        id: Uuid::new_v4(),
        deliverable_id,
        depends_on_id,
        created_at: fixed_now() - Duration::days(1),
    }
}
