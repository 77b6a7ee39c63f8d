//! # Analytics Engine
//!
//! Fetches the five raw collections concurrently and computes the
//! cross-cutting metrics in one pure pass: agreement adoption, deliverable
//! status distribution, a rolling 84-day activity histogram, and
//! per-member workload ranking. `compute_metrics` is deterministic for a
//! fixed input and `now`; the histogram window is relative to "now", so
//! the same raw data legitimately produces different output on different
//! days.

use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use entity::{
    agreement_signatures, agreements,
    agreements::AgreementStatus,
    deliverables,
    deliverables::DeliverableStatus,
    team_members, updates,
};
use error::{AppError, Result};
use sea_orm::{DbConn, EntityTrait};
use serde::Serialize;

/// Days covered by the activity histogram (12 weeks).
const ACTIVITY_WINDOW_DAYS: i64 = 84;

/// Presentation color tokens per deliverable status; pass-through styling
/// concern, not interpreted here.
fn status_color(status: &DeliverableStatus) -> &'static str {
    match status {
        DeliverableStatus::Completed => "var(--color-success)",
        DeliverableStatus::InProgress => "var(--color-primary)",
        DeliverableStatus::AtRisk => "var(--color-error)",
        DeliverableStatus::Upcoming => "var(--color-muted)",
    }
}

/// Daily activity bucket for the contribution graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyActivity {
    /// Calendar date of the bucket
    pub date:  NaiveDate,
    /// Qualifying events on this day
    pub count: u64,
}

/// Deliverable status slice for ring charts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusDistribution {
    /// Display label
    pub status: String,
    /// Deliverables in this status
    pub count:  u64,
    /// Presentation color token
    pub color:  String,
}

/// Per-member workload summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberWorkload {
    /// Member id
    pub member_id:         uuid::Uuid,
    /// Member display name
    pub member_name:       String,
    /// Member role
    pub role:              String,
    /// Owned deliverables
    pub deliverable_count: u64,
    /// Owned deliverables currently at risk
    pub at_risk_count:     u64,
    /// Owned deliverables completed
    pub completed_count:   u64,
}

/// All computed analytics metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyticsMetrics {
    /// Percent of active agreements signed by the full current membership
    pub agreement_adoption_percent:      u64,
    /// Active agreements considered
    pub total_agreements:                u64,
    /// Active agreements with full signature coverage
    pub fully_signed_agreements:         u64,
    /// All deliverables
    pub total_deliverables:              u64,
    /// Deliverables at risk
    pub at_risk_count:                   u64,
    /// Deliverables completed
    pub completed_count:                 u64,
    /// Deliverables in progress
    pub in_progress_count:               u64,
    /// Deliverables upcoming
    pub upcoming_count:                  u64,
    /// Status histogram with presentation colors
    pub deliverable_status_distribution: Vec<StatusDistribution>,
    /// All updates ever posted
    pub total_updates:                   u64,
    /// Updates posted in the last 7 days
    pub updates_this_week:               u64,
    /// Updates flagged as help requests
    pub open_help_requests:              u64,
    /// Exactly 84 consecutive day-buckets ending today, oldest first
    pub daily_activity:                  Vec<DailyActivity>,
    /// Per-member workloads, descending by owned count
    pub member_workloads:                Vec<MemberWorkload>,
}

/// Raw collections snapshot the metrics are computed from.
#[derive(Debug, Clone, Default)]
pub struct RawAnalytics {
    /// All agreements
    pub agreements:   Vec<agreements::Model>,
    /// All signatures
    pub signatures:   Vec<agreement_signatures::Model>,
    /// All deliverables
    pub deliverables: Vec<deliverables::Model>,
    /// All updates
    pub updates:      Vec<updates::Model>,
    /// The member roster
    pub team_members: Vec<team_members::Model>,
}

/// Loads raw collections and computes metrics.
pub struct AnalyticsService {
    db: DbConn,
}

impl AnalyticsService {
    /// Creates an analytics service over the given connection.
    #[must_use]
    pub fn new(db: DbConn) -> Self {
        Self {
            db,
        }
    }

    /// Fetches all five collections concurrently. Any failing fetch
    /// surfaces as a labeled error.
    ///
    /// # Errors
    ///
    /// Returns a database error naming the collection that failed.
    pub async fn fetch_raw(&self) -> Result<RawAnalytics> {
        let (agreements, signatures, deliverables, updates, team_members) = tokio::try_join!(
            async {
                agreements::Entity::find()
                    .all(&self.db)
                    .await
                    .map_err(|e| AppError::database(format!("Agreements: {}", e)))
            },
            async {
                agreement_signatures::Entity::find()
                    .all(&self.db)
                    .await
                    .map_err(|e| AppError::database(format!("Signatures: {}", e)))
            },
            async {
                deliverables::Entity::find()
                    .all(&self.db)
                    .await
                    .map_err(|e| AppError::database(format!("Deliverables: {}", e)))
            },
            async {
                updates::Entity::find()
                    .all(&self.db)
                    .await
                    .map_err(|e| AppError::database(format!("Updates: {}", e)))
            },
            async {
                team_members::Entity::find()
                    .all(&self.db)
                    .await
                    .map_err(|e| AppError::database(format!("Team members: {}", e)))
            },
        )?;

        Ok(RawAnalytics {
            agreements,
            signatures,
            deliverables,
            updates,
            team_members,
        })
    }

    /// Full load: fetch raw data and compute metrics as of now.
    ///
    /// # Errors
    ///
    /// Returns a database error if any fetch fails.
    pub async fn load(&self) -> Result<AnalyticsMetrics> {
        let raw = self.fetch_raw().await?;
        Ok(compute_metrics(&raw, Utc::now()))
    }
}

/// Computes all metrics from a raw snapshot. Pure: no I/O, deterministic
/// for identical `data` and `now`.
#[must_use]
pub fn compute_metrics(data: &RawAnalytics, now: DateTime<Utc>) -> AnalyticsMetrics {
    let today = now.date_naive();

    // Agreement adoption, over active agreements only
    let active: Vec<&agreements::Model> = data
        .agreements
        .iter()
        .filter(|a| a.status == AgreementStatus::Active)
        .collect();
    let total_agreements = active.len() as u64;

    let mut sigs_by_agreement: HashMap<uuid::Uuid, u64> = HashMap::new();
    for signature in &data.signatures {
        *sigs_by_agreement.entry(signature.agreement_id).or_default() += 1;
    }

    let total_members = data.team_members.len() as u64;
    let fully_signed_agreements = active
        .iter()
        .filter(|a| sigs_by_agreement.get(&a.id).copied().unwrap_or(0) >= total_members)
        .count() as u64;

    let agreement_adoption_percent = if total_agreements > 0 {
        ((fully_signed_agreements as f64 / total_agreements as f64) * 100.0).round() as u64
    }
    else {
        0
    };

    // Deliverable health
    let count_status =
        |status: DeliverableStatus| data.deliverables.iter().filter(|d| d.status == status).count() as u64;
    let completed_count = count_status(DeliverableStatus::Completed);
    let in_progress_count = count_status(DeliverableStatus::InProgress);
    let at_risk_count = count_status(DeliverableStatus::AtRisk);
    let upcoming_count = count_status(DeliverableStatus::Upcoming);

    let deliverable_status_distribution = vec![
        StatusDistribution {
            status: "Completed".to_string(),
            count:  completed_count,
            color:  status_color(&DeliverableStatus::Completed).to_string(),
        },
        StatusDistribution {
            status: "In Progress".to_string(),
            count:  in_progress_count,
            color:  status_color(&DeliverableStatus::InProgress).to_string(),
        },
        StatusDistribution {
            status: "At Risk".to_string(),
            count:  at_risk_count,
            color:  status_color(&DeliverableStatus::AtRisk).to_string(),
        },
        StatusDistribution {
            status: "Upcoming".to_string(),
            count:  upcoming_count,
            color:  status_color(&DeliverableStatus::Upcoming).to_string(),
        },
    ];

    // Update activity and help requests
    let total_updates = data.updates.len() as u64;
    let one_week_ago = now - Duration::days(7);
    let updates_this_week = data.updates.iter().filter(|u| u.created_at > one_week_ago).count() as u64;
    let open_help_requests = data.updates.iter().filter(|u| u.is_help_request).count() as u64;

    // Daily activity over all event kinds
    let mut activity: HashMap<NaiveDate, u64> = HashMap::new();
    let mut add_activity = |date: NaiveDate| {
        *activity.entry(date).or_default() += 1;
    };

    for update in &data.updates {
        add_activity(update.created_at.date_naive());
    }
    for signature in &data.signatures {
        add_activity(signature.signed_at.date_naive());
    }
    for deliverable in &data.deliverables {
        add_activity(deliverable.created_at.date_naive());
        // Only count updated_at when it differs from created_at, so a
        // freshly created row is not double-counted
        if deliverable.updated_at != deliverable.created_at {
            add_activity(deliverable.updated_at.date_naive());
        }
    }

    // Exactly 84 consecutive buckets ending today, oldest first, zero-filled
    let daily_activity: Vec<DailyActivity> = (0..ACTIVITY_WINDOW_DAYS)
        .rev()
        .map(|days_back| {
            let date = today - Duration::days(days_back);
            DailyActivity {
                date,
                count: activity.get(&date).copied().unwrap_or(0),
            }
        })
        .collect();

    // Member workloads, descending by owned count (stable for ties)
    let mut member_workloads: Vec<MemberWorkload> = data
        .team_members
        .iter()
        .map(|member| {
            let owned: Vec<&deliverables::Model> = data
                .deliverables
                .iter()
                .filter(|d| d.owner_id == Some(member.id))
                .collect();
            MemberWorkload {
                member_id:         member.id,
                member_name:       member.name.clone(),
                role:              member.role.to_string(),
                deliverable_count: owned.len() as u64,
                at_risk_count:     owned.iter().filter(|d| d.status == DeliverableStatus::AtRisk).count() as u64,
                completed_count:   owned
                    .iter()
                    .filter(|d| d.status == DeliverableStatus::Completed)
                    .count() as u64,
            }
        })
        .collect();
    member_workloads.sort_by(|a, b| b.deliverable_count.cmp(&a.deliverable_count));

    AnalyticsMetrics {
        agreement_adoption_percent,
        total_agreements,
        fully_signed_agreements,
        total_deliverables: data.deliverables.len() as u64,
        at_risk_count,
        completed_count,
        in_progress_count,
        upcoming_count,
        deliverable_status_distribution,
        total_updates,
        updates_this_week,
        open_help_requests,
        daily_activity,
        member_workloads,
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use entity::team_members::MemberRole;
    use uuid::Uuid;

    use super::*;

    fn fixed_now() -> DateTime<Utc> { Utc.with_ymd_and_hms(2026, 8, 7, 12, 0, 0).unwrap() }

    fn member(name: &str) -> team_members::Model {
        team_members::Model {
            id:         Uuid::new_v4(),
            name:       name.to_string(),
            email:      format!("{}@example.com", name.to_lowercase()),
            avatar_url: None,
            role:       MemberRole::Member,
            created_at: fixed_now() - Duration::days(100),
        }
    }

    fn agreement(status: AgreementStatus) -> agreements::Model {
        agreements::Model {
            id:          Uuid::new_v4(),
            title:       "Agreement".to_string(),
            description: None,
            status,
            created_by:  None,
            created_at:  fixed_now() - Duration::days(30),
            updated_at:  fixed_now() - Duration::days(30),
        }
    }

    fn signature(agreement_id: Uuid, member_id: Uuid, signed_at: DateTime<Utc>) -> agreement_signatures::Model {
        agreement_signatures::Model {
            id: Uuid::new_v4(),
            agreement_id,
            member_id,
            signed_at,
        }
    }

    fn deliverable(owner: Option<Uuid>, status: DeliverableStatus) -> deliverables::Model {
        let created = fixed_now() - Duration::days(10);
        deliverables::Model {
            id: Uuid::new_v4(),
            title: "Deliverable".to_string(),
            description: None,
            owner_id: owner,
            deadline: None,
            progress: 50,
            status,
            created_at: created,
            updated_at: created,
        }
    }

    fn update(created_at: DateTime<Utc>, help: bool) -> updates::Model {
        updates::Model {
            id:              Uuid::new_v4(),
            content:         "Update".to_string(),
            author_id:       None,
            deliverable_id:  None,
            is_help_request: help,
            created_at,
        }
    }

    #[test]
    fn test_compute_is_deterministic() {
        let members = vec![member("Kai"), member("Elara")];
        let a = agreement(AgreementStatus::Active);
        let data = RawAnalytics {
            signatures: vec![signature(a.id, members[0].id, fixed_now() - Duration::days(1))],
            agreements: vec![a],
            deliverables: vec![deliverable(Some(members[0].id), DeliverableStatus::InProgress)],
            updates: vec![update(fixed_now() - Duration::days(2), false)],
            team_members: members,
        };

        let first = compute_metrics(&data, fixed_now());
        let second = compute_metrics(&data, fixed_now());
        assert_eq!(first, second);
    }

    #[test]
    fn test_adoption_counts_only_active() {
        let members = vec![member("Kai"), member("Elara")];
        let fully_signed = agreement(AgreementStatus::Active);
        let partially_signed = agreement(AgreementStatus::Active);
        let pending = agreement(AgreementStatus::Pending);

        let signatures = vec![
            signature(fully_signed.id, members[0].id, fixed_now()),
            signature(fully_signed.id, members[1].id, fixed_now()),
            signature(partially_signed.id, members[0].id, fixed_now()),
            // The pending agreement is fully signed but must not count
            signature(pending.id, members[0].id, fixed_now()),
            signature(pending.id, members[1].id, fixed_now()),
        ];

        let data = RawAnalytics {
            agreements: vec![fully_signed, partially_signed, pending],
            signatures,
            deliverables: Vec::new(),
            updates: Vec::new(),
            team_members: members,
        };

        let metrics = compute_metrics(&data, fixed_now());
        assert_eq!(metrics.total_agreements, 2);
        assert_eq!(metrics.fully_signed_agreements, 1);
        assert_eq!(metrics.agreement_adoption_percent, 50);
    }

    #[test]
    fn test_adoption_zero_when_no_active_agreements() {
        let data = RawAnalytics {
            agreements: vec![agreement(AgreementStatus::Pending)],
            ..Default::default()
        };

        let metrics = compute_metrics(&data, fixed_now());
        assert_eq!(metrics.agreement_adoption_percent, 0, "no divide-by-zero");
    }

    #[test]
    fn test_status_distribution_counts() {
        let data = RawAnalytics {
            deliverables: vec![
                deliverable(None, DeliverableStatus::Completed),
                deliverable(None, DeliverableStatus::Completed),
                deliverable(None, DeliverableStatus::AtRisk),
                deliverable(None, DeliverableStatus::Upcoming),
            ],
            ..Default::default()
        };

        let metrics = compute_metrics(&data, fixed_now());
        assert_eq!(metrics.total_deliverables, 4);
        assert_eq!(metrics.completed_count, 2);
        assert_eq!(metrics.at_risk_count, 1);
        assert_eq!(metrics.in_progress_count, 0);
        assert_eq!(metrics.upcoming_count, 1);

        let distribution = &metrics.deliverable_status_distribution;
        assert_eq!(distribution.len(), 4);
        assert_eq!(distribution[0].status, "Completed");
        assert_eq!(distribution[0].count, 2);
        assert_eq!(distribution[0].color, "var(--color-success)");
    }

    #[test]
    fn test_histogram_shape() {
        let metrics = compute_metrics(&RawAnalytics::default(), fixed_now());
        let histogram = &metrics.daily_activity;

        assert_eq!(histogram.len(), 84);
        assert_eq!(histogram.last().unwrap().date, fixed_now().date_naive());
        for pair in histogram.windows(2) {
            assert_eq!(pair[1].date - pair[0].date, Duration::days(1), "consecutive dates");
        }
        assert!(histogram.iter().all(|b| b.count == 0), "zero-filled with no events");
    }

    #[test]
    fn test_histogram_counts_all_event_kinds() {
        let members = vec![member("Kai")];
        let a = agreement(AgreementStatus::Active);
        let yesterday = fixed_now() - Duration::days(1);

        let mut d = deliverable(Some(members[0].id), DeliverableStatus::InProgress);
        d.created_at = yesterday;
        // A real update after creation counts a second event
        d.updated_at = fixed_now();

        let data = RawAnalytics {
            signatures: vec![signature(a.id, members[0].id, yesterday)],
            agreements: vec![a],
            deliverables: vec![d],
            updates: vec![update(yesterday, false)],
            team_members: members,
        };

        let metrics = compute_metrics(&data, fixed_now());
        let yesterday_bucket = metrics
            .daily_activity
            .iter()
            .find(|b| b.date == yesterday.date_naive())
            .unwrap();
        // update + signature + deliverable creation
        assert_eq!(yesterday_bucket.count, 3);

        let today_bucket = metrics.daily_activity.last().unwrap();
        assert_eq!(today_bucket.count, 1, "the deliverable update");
    }

    #[test]
    fn test_fresh_row_not_double_counted() {
        let d = deliverable(None, DeliverableStatus::Upcoming);
        let created_day = d.created_at.date_naive();
        let data = RawAnalytics {
            deliverables: vec![d],
            ..Default::default()
        };

        let metrics = compute_metrics(&data, fixed_now());
        let bucket = metrics
            .daily_activity
            .iter()
            .find(|b| b.date == created_day)
            .unwrap();
        assert_eq!(bucket.count, 1, "updated_at == created_at counts once");
    }

    #[test]
    fn test_member_workloads_sorted_descending() {
        let busy = member("Busy");
        let idle = member("Idle");

        let data = RawAnalytics {
            deliverables: vec![
                deliverable(Some(busy.id), DeliverableStatus::AtRisk),
                deliverable(Some(busy.id), DeliverableStatus::Completed),
                deliverable(Some(busy.id), DeliverableStatus::InProgress),
                deliverable(Some(idle.id), DeliverableStatus::Completed),
            ],
            team_members: vec![idle.clone(), busy.clone()],
            ..Default::default()
        };

        let metrics = compute_metrics(&data, fixed_now());
        assert_eq!(metrics.member_workloads.len(), 2);
        assert_eq!(metrics.member_workloads[0].member_id, busy.id);
        assert_eq!(metrics.member_workloads[0].deliverable_count, 3);
        assert_eq!(metrics.member_workloads[0].at_risk_count, 1);
        assert_eq!(metrics.member_workloads[0].completed_count, 1);
        assert_eq!(metrics.member_workloads[1].member_id, idle.id);
    }

    #[test]
    fn test_updates_this_week_window() {
        let data = RawAnalytics {
            updates: vec![
                update(fixed_now() - Duration::days(2), false),
                update(fixed_now() - Duration::days(8), true),
            ],
            ..Default::default()
        };

        let metrics = compute_metrics(&data, fixed_now());
        assert_eq!(metrics.total_updates, 2);
        assert_eq!(metrics.updates_this_week, 1);
        assert_eq!(metrics.open_help_requests, 1);
    }
}
