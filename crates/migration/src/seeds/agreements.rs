//! Agreement fixtures with randomized signature coverage: active agreements
//! are nearly fully signed, pending ones sparsely.

use ::error::{AppError, SeedResult};
use chrono::Utc;
use entity::{agreement_signatures, agreements, team_members};
use rand::Rng;
use sea_orm::{EntityTrait, QueryOrder, Set};
use uuid::Uuid;

use super::SeedProvider;
use crate::SeaDb;

const AGREEMENTS: [(&str, &str, &str); 5] = [
    (
        "Core Working Hours",
        "We agree to be online and responsive between 10 AM and 3 PM EST.",
        "active",
    ),
    (
        "Code Review Response Time",
        "PRs should be reviewed within 24 hours of posting.",
        "active",
    ),
    (
        "No Meeting Fridays",
        "Fridays are preserved for deep work; no scheduled internal meetings.",
        "active",
    ),
    (
        "Documentation First",
        "All new features must include documentation before merging.",
        "pending",
    ),
    (
        "Slack Availability Status",
        "Update Slack status when OOO or in deep work mode.",
        "active",
    ),
];

/// Seeds agreements and their signatures.
pub struct AgreementSeed;

#[async_trait::async_trait]
impl SeedProvider for AgreementSeed {
    fn name(&self) -> &str { "agreements" }

    async fn run(&self, db: &SeaDb) -> Result<SeedResult, AppError> {
        let started = std::time::Instant::now();
        let now = Utc::now();

        let members = team_members::Entity::find()
            .order_by_asc(team_members::Column::CreatedAt)
            .all(db)
            .await
            .map_err(|e| AppError::database(format!("Failed to fetch team members: {}", e)))?;

        let creator = members
            .first()
            .ok_or_else(|| AppError::migration("Seed team members before agreements"))?;

        // Scope the non-Send RNG so it is dropped before any await; the future
        // must stay Send for the boxed async-trait signature.
        let (agreement_models, signature_models) = {
            let mut rng = rand::thread_rng();
            let mut agreement_models = Vec::new();
            let mut signature_models = Vec::new();

            for (title, description, status) in AGREEMENTS {
                let id = Uuid::new_v4();
                let status = match status {
                    "active" => agreements::AgreementStatus::Active,
                    "archived" => agreements::AgreementStatus::Archived,
                    _ => agreements::AgreementStatus::Pending,
                };

                // 90% signing rate for active agreements, 40% for pending
                let sign_rate = if status == agreements::AgreementStatus::Active {
                    0.9
                }
                else {
                    0.4
                };
                for member in &members {
                    if rng.gen_bool(sign_rate) {
                        signature_models.push(agreement_signatures::ActiveModel {
                            id:           Set(Uuid::new_v4()),
                            agreement_id: Set(id),
                            member_id:    Set(member.id),
                            signed_at:    Set(now),
                        });
                    }
                }

                agreement_models.push(agreements::ActiveModel {
                    id:          Set(id),
                    title:       Set(title.to_string()),
                    description: Set(Some(description.to_string())),
                    status:      Set(status),
                    created_by:  Set(Some(creator.id)),
                    created_at:  Set(now),
                    updated_at:  Set(now),
                });
            }

            (agreement_models, signature_models)
        };

        let count = agreement_models.len() + signature_models.len();

        agreements::Entity::insert_many(agreement_models)
            .exec(db)
            .await
            .map_err(|e| AppError::database(format!("Failed to insert agreements: {}", e)))?;

        if !signature_models.is_empty() {
            agreement_signatures::Entity::insert_many(signature_models)
                .exec(db)
                .await
                .map_err(|e| AppError::database(format!("Failed to insert signatures: {}", e)))?;
        }

        Ok(SeedResult::success(
            self.name(),
            count,
            started.elapsed().as_millis() as u64,
        ))
    }
}
