//! Deliverable fixtures: 30 synthetic tasks with status-correlated progress
//! and deadlines scattered around today.

use ::error::{AppError, SeedResult};
use chrono::{Duration, Utc};
use entity::{deliverables, team_members};
use rand::{seq::SliceRandom, Rng};
use sea_orm::{EntityTrait, Set};
use uuid::Uuid;

use super::SeedProvider;
use crate::SeaDb;

const TEMPLATES: [(&str, &str); 12] = [
    ("Q3 Financial Report", "completed"),
    ("Mobile App Redesign", "in-progress"),
    ("API Migration", "at-risk"),
    ("User Onboarding Flow", "in-progress"),
    ("Marketing Campaign Launch", "upcoming"),
    ("Security Audit", "completed"),
    ("Database Optimization", "in-progress"),
    ("Customer Feedback System", "upcoming"),
    ("Internal Tools Dashboard", "at-risk"),
    ("Website Accessibility Fixes", "completed"),
    ("Analytics Dashboard", "in-progress"),
    ("Payment Gateway Integration", "upcoming"),
];

const DELIVERABLE_COUNT: usize = 30;

fn parse_status(value: &str) -> deliverables::DeliverableStatus {
    match value {
        "completed" => deliverables::DeliverableStatus::Completed,
        "in-progress" => deliverables::DeliverableStatus::InProgress,
        "at-risk" => deliverables::DeliverableStatus::AtRisk,
        _ => deliverables::DeliverableStatus::Upcoming,
    }
}

/// Seeds synthetic deliverables.
pub struct DeliverableSeed;

#[async_trait::async_trait]
impl SeedProvider for DeliverableSeed {
    fn name(&self) -> &str { "deliverables" }

    async fn run(&self, db: &SeaDb) -> Result<SeedResult, AppError> {
        let started = std::time::Instant::now();
        let now = Utc::now();

        let members = team_members::Entity::find()
            .all(db)
            .await
            .map_err(|e| AppError::database(format!("Failed to fetch team members: {}", e)))?;

        if members.is_empty() {
            return Err(AppError::migration("Seed team members before deliverables"));
        }

        // Scope the non-Send RNG so it is dropped before any await; the future
        // must stay Send for the boxed async-trait signature.
        let models = {
        let mut rng = rand::thread_rng();
        let statuses = ["completed", "in-progress", "at-risk", "upcoming"];
        let mut models = Vec::with_capacity(DELIVERABLE_COUNT);

        for _ in 0..DELIVERABLE_COUNT {
            let (title, template_status) = TEMPLATES[rng.gen_range(0..TEMPLATES.len())];
            let owner = members.choose(&mut rng).expect("members is non-empty");

            // Mostly follow the template bias, with 30% fully random for variety
            let status_str = if rng.gen_bool(0.3) {
                statuses[rng.gen_range(0..statuses.len())]
            }
            else {
                template_status
            };
            let status = parse_status(status_str);

            let progress: i32 = match status {
                deliverables::DeliverableStatus::Completed => 100,
                deliverables::DeliverableStatus::Upcoming => 0,
                deliverables::DeliverableStatus::AtRisk => rng.gen_range(0..80),
                deliverables::DeliverableStatus::InProgress => rng.gen_range(10..100),
            };

            // Deadlines scattered from 10 days ago to 20 days out
            let deadline_offset = rng.gen_range(-10..=20i64);
            let deadline = (now + Duration::days(deadline_offset)).date_naive();

            models.push(deliverables::ActiveModel {
                id:          Set(Uuid::new_v4()),
                title:       Set(format!("{} - Phase {}", title, rng.gen_range(1..=3))),
                description: Set(Some(format!("Implementation tasks for {}", title))),
                owner_id:    Set(Some(owner.id)),
                deadline:    Set(Some(deadline)),
                progress:    Set(progress),
                status:      Set(status),
                created_at:  Set(now),
                updated_at:  Set(now),
            });
        }

        models
        };

        let count = models.len();
        deliverables::Entity::insert_many(models)
            .exec(db)
            .await
            .map_err(|e| AppError::database(format!("Failed to insert deliverables: {}", e)))?;

        Ok(SeedResult::success(
            self.name(),
            count,
            started.elapsed().as_millis() as u64,
        ))
    }
}
