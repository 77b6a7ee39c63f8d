//! Update-history fixtures: 150 status posts biased toward the last two
//! weeks so the activity histogram has visible recent density.

use ::error::{AppError, SeedResult};
use chrono::{Duration, Utc};
use entity::{deliverables, team_members, updates};
use rand::{seq::SliceRandom, Rng};
use sea_orm::{EntityTrait, Set};
use uuid::Uuid;

use super::SeedProvider;
use crate::SeaDb;

const UPDATE_COUNT: usize = 150;

/// Seeds historical status updates.
pub struct UpdateSeed;

#[async_trait::async_trait]
impl SeedProvider for UpdateSeed {
    fn name(&self) -> &str { "updates" }

    async fn run(&self, db: &SeaDb) -> Result<SeedResult, AppError> {
        let started = std::time::Instant::now();
        let now = Utc::now();

        let members = team_members::Entity::find()
            .all(db)
            .await
            .map_err(|e| AppError::database(format!("Failed to fetch team members: {}", e)))?;
        let deliverables = deliverables::Entity::find()
            .all(db)
            .await
            .map_err(|e| AppError::database(format!("Failed to fetch deliverables: {}", e)))?;

        if members.is_empty() || deliverables.is_empty() {
            return Err(AppError::migration("Seed members and deliverables before updates"));
        }

        // Scope the non-Send RNG so it is dropped before any await; the future
        // must stay Send for the boxed async-trait signature.
        let models = {
        let mut rng = rand::thread_rng();
        let mut models = Vec::with_capacity(UPDATE_COUNT);

        for _ in 0..UPDATE_COUNT {
            // 60% of updates land in the last 14 days, the rest 15-60 days back
            let days_ago: i64 = if rng.gen_bool(0.6) {
                rng.gen_range(0..14)
            }
            else {
                rng.gen_range(15..60)
            };
            let created_at = now - Duration::days(days_ago);

            let member = members.choose(&mut rng).expect("members is non-empty");
            let deliverable = deliverables.choose(&mut rng).expect("deliverables is non-empty");

            models.push(updates::ActiveModel {
                id:              Set(Uuid::new_v4()),
                content:         Set(format!(
                    "Update on {}: Making progress with the new components.",
                    deliverable.title
                )),
                author_id:       Set(Some(member.id)),
                deliverable_id:  Set(Some(deliverable.id)),
                is_help_request: Set(rng.gen_bool(0.1)),
                created_at:      Set(created_at),
            });
        }

        models
        };

        let count = models.len();
        updates::Entity::insert_many(models)
            .exec(db)
            .await
            .map_err(|e| AppError::database(format!("Failed to insert updates: {}", e)))?;

        Ok(SeedResult::success(
            self.name(),
            count,
            started.elapsed().as_millis() as u64,
        ))
    }
}
