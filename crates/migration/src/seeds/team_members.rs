//! Team member fixtures: one lead and seven members with generated avatars.

use ::error::{AppError, SeedResult};
use chrono::Utc;
use entity::team_members;
use sea_orm::{EntityTrait, Set};
use uuid::Uuid;

use super::SeedProvider;
use crate::SeaDb;

const MEMBERS: [(&str, &str, &str, &str); 8] = [
    ("Kai Tanaka", "kai.t@example.com", "lead", "Kai"),
    ("Elara Vance", "elara.v@example.com", "member", "Elara"),
    ("Marcus Jenson", "marcus.j@example.com", "member", "Marcus"),
    ("Priya Patel", "priya.p@example.com", "member", "Priya"),
    ("Jordan Hayes", "jordan.h@example.com", "member", "Jordan"),
    ("Nina Rodriguez", "nina.r@example.com", "member", "Nina"),
    ("Liam O'Connor", "liam.o@example.com", "member", "Liam"),
    ("Sophie Chen", "sophie.c@example.com", "member", "Sophie"),
];

/// Seeds the team roster.
pub struct TeamMemberSeed;

#[async_trait::async_trait]
impl SeedProvider for TeamMemberSeed {
    fn name(&self) -> &str { "team_members" }

    async fn run(&self, db: &SeaDb) -> Result<SeedResult, AppError> {
        let started = std::time::Instant::now();
        let now = Utc::now();

        let models: Vec<team_members::ActiveModel> = MEMBERS
            .iter()
            .map(|(name, email, role, avatar_seed)| {
                let role = match *role {
                    "lead" => team_members::MemberRole::Lead,
                    _ => team_members::MemberRole::Member,
                };
                team_members::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    name: Set((*name).to_string()),
                    email: Set((*email).to_string()),
                    avatar_url: Set(Some(format!(
                        "https://api.dicebear.com/7.x/avataaars/svg?seed={}",
                        avatar_seed
                    ))),
                    role: Set(role),
                    created_at: Set(now),
                }
            })
            .collect();

        let count = models.len();
        team_members::Entity::insert_many(models)
            .exec(db)
            .await
            .map_err(|e| AppError::database(format!("Failed to insert team members: {}", e)))?;

        Ok(SeedResult::success(
            self.name(),
            count,
            started.elapsed().as_millis() as u64,
        ))
    }
}
