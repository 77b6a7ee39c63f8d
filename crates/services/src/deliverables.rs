//! # Deliverable Aggregator
//!
//! Loads deliverables with owner names and dependency adjacency lists,
//! derives status from progress and deadline, and maintains the directed
//! dependency graph. Cycle prevention is delegated to the database
//! trigger that owns the complete graph; the client performs only the
//! cheap self-loop and existence checks it can do against the loaded set.

use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, NaiveDate, Utc};
use entity::{
    deliverable_dependencies::{self, Column as DependencyColumn},
    deliverables::{self, DeliverableStatus},
    team_members,
};
use error::{AppError, Result};
use sea_orm::{ActiveModelTrait, ColumnTrait, DbConn, EntityTrait, QueryFilter, QueryOrder, Set, SqlErr};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{error, info};
use uuid::Uuid;
use validator::Validate;

use crate::{
    current_user::{CurrentUserResolver, FirstTeamMember},
    dto::{DeliverableCreateRequest, DeliverableUpdateRequest},
    state::ViewState,
};

/// Owner display name when the owner id does not resolve.
const UNKNOWN_OWNER: &str = "Unknown";
/// Owner display name when no owner is assigned.
const UNASSIGNED_OWNER: &str = "Unassigned";

/// A deliverable enriched with its owner's display name and the ids it
/// depends on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliverableWithDetails {
    /// Deliverable id
    pub id:             Uuid,
    /// Deliverable title
    pub title:          String,
    /// Deliverable description
    pub description:    Option<String>,
    /// Owning member, if assigned
    pub owner_id:       Option<Uuid>,
    /// Deadline calendar date
    pub deadline:       Option<NaiveDate>,
    /// Progress in percent (0-100)
    pub progress:       i32,
    /// Health status
    pub status:         DeliverableStatus,
    /// Creation timestamp
    pub created_at:     DateTime<Utc>,
    /// Last update timestamp
    pub updated_at:     DateTime<Utc>,
    /// Owner display name ("Unassigned" / "Unknown" fallbacks)
    pub owner_name:     String,
    /// Ids of deliverables this one depends on
    pub dependency_ids: Vec<Uuid>,
}

impl DeliverableWithDetails {
    fn from_model(model: deliverables::Model, owner_name: String, dependency_ids: Vec<Uuid>) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            owner_id: model.owner_id,
            deadline: model.deadline,
            progress: model.progress,
            status: model.status,
            created_at: model.created_at,
            updated_at: model.updated_at,
            owner_name,
            dependency_ids,
        }
    }
}

/// Derives the status a progress update implies.
///
/// 100 always completes. In-flight work near or past its deadline with
/// under 75% progress is at risk; otherwise it is in progress. Zero
/// progress returns `None`: the status set at creation stands.
#[must_use]
pub fn derive_status(progress: i32, deadline: Option<NaiveDate>, today: NaiveDate) -> Option<DeliverableStatus> {
    if progress == 100 {
        return Some(DeliverableStatus::Completed);
    }
    if progress <= 0 {
        return None;
    }

    match deadline {
        Some(deadline) => {
            let days_until = (deadline - today).num_days();
            if days_until < 0 || (days_until <= 3 && progress < 75) {
                Some(DeliverableStatus::AtRisk)
            }
            else {
                Some(DeliverableStatus::InProgress)
            }
        },
        None => Some(DeliverableStatus::InProgress),
    }
}

/// Aggregator for the deliverables view.
pub struct DeliverableService {
    db:              DbConn,
    resolver:        Arc<dyn CurrentUserResolver>,
    members:         RwLock<Vec<team_members::Model>>,
    current_user_id: RwLock<Option<Uuid>>,
    state:           ViewState<DeliverableWithDetails>,
}

impl DeliverableService {
    /// Creates a service with the placeholder current-user resolver.
    #[must_use]
    pub fn new(db: DbConn) -> Self { Self::with_resolver(db, Arc::new(FirstTeamMember)) }

    /// Creates a service with a custom current-user resolver.
    #[must_use]
    pub fn with_resolver(db: DbConn, resolver: Arc<dyn CurrentUserResolver>) -> Self {
        Self {
            db,
            resolver,
            members: RwLock::new(Vec::new()),
            current_user_id: RwLock::new(None),
            state: ViewState::new(),
        }
    }

    /// Snapshot of the loaded deliverables.
    pub async fn deliverables(&self) -> Vec<DeliverableWithDetails> { self.state.snapshot().await }

    /// Snapshot of the loaded roster.
    pub async fn team_members(&self) -> Vec<team_members::Model> { self.members.read().await.clone() }

    /// The resolved current user, if any.
    pub async fn current_user_id(&self) -> Option<Uuid> { *self.current_user_id.read().await }

    /// Invalidates in-flight loads; a load that resolves after this call
    /// will not write into the view.
    pub fn reset(&self) { self.state.invalidate(); }

    /// Loads deliverables and all dependency edges in two queries, groups
    /// the edges into adjacency lists, and joins owner display names.
    ///
    /// # Errors
    ///
    /// Returns an error if any fetch fails; the previous view is kept.
    pub async fn load(&self) -> Result<Vec<DeliverableWithDetails>> {
        let token = self.state.begin_load();

        let members = self.fetch_team_members().await?;
        let current_user = self.resolver.resolve(&self.db).await?;

        let deliverable_rows = deliverables::Entity::find()
            .all(&self.db)
            .await
            .map_err(|e| AppError::database(format!("Failed to fetch deliverables: {}", e)))?;

        let enriched = if deliverable_rows.is_empty() {
            Vec::new()
        }
        else {
            let edges = deliverable_dependencies::Entity::find()
                .all(&self.db)
                .await
                .map_err(|e| AppError::database(format!("Failed to fetch dependencies: {}", e)))?;

            // Group edges into adjacency lists keyed by the dependent side
            let mut adjacency: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
            for edge in &edges {
                adjacency.entry(edge.deliverable_id).or_default().push(edge.depends_on_id);
            }

            let lookup: HashMap<Uuid, &team_members::Model> = members.iter().map(|m| (m.id, m)).collect();

            deliverable_rows
                .into_iter()
                .map(|d| {
                    let owner_name = owner_display_name(d.owner_id, &lookup);
                    let dependency_ids = adjacency.remove(&d.id).unwrap_or_default();
                    DeliverableWithDetails::from_model(d, owner_name, dependency_ids)
                })
                .collect()
        };

        *self.members.write().await = members;
        *self.current_user_id.write().await = current_user;
        self.state.commit_if_current(token, enriched.clone()).await;

        Ok(enriched)
    }

    /// Creates a deliverable (status `upcoming`, progress 0) and inserts
    /// its requested dependency edges as a batch.
    ///
    /// There is no multi-statement transaction here: if the edge batch
    /// fails after the deliverable insert succeeded, the new deliverable
    /// is deleted again as a compensating action. That rollback is itself
    /// best-effort; its failure is logged, and the operation reports
    /// failure either way.
    ///
    /// # Errors
    ///
    /// Returns a validation error for bad payloads, or a database error if
    /// the insert or the edge batch fails.
    pub async fn create(&self, req: DeliverableCreateRequest) -> Result<Uuid> {
        req.validate().map_err(AppError::from)?;
        let deadline = req.parsed_deadline()?;

        let model = deliverables::ActiveModel {
            title: Set(req.title.clone()),
            description: Set(req.description.clone()),
            owner_id: Set(req.owner_id),
            deadline: Set(deadline),
            progress: Set(0),
            status: Set(DeliverableStatus::Upcoming),
            ..Default::default()
        };

        let created = model
            .insert(&self.db)
            .await
            .map_err(|e| AppError::database(format!("Failed to create deliverable: {}", e)))?;

        if !req.dependency_ids.is_empty() {
            let edges: Vec<deliverable_dependencies::ActiveModel> = req
                .dependency_ids
                .iter()
                .map(|depends_on| {
                    deliverable_dependencies::ActiveModel {
                        deliverable_id: Set(created.id),
                        depends_on_id: Set(*depends_on),
                        ..Default::default()
                    }
                })
                .collect();

            if let Err(edge_err) = deliverable_dependencies::Entity::insert_many(edges).exec(&self.db).await {
                error!(deliverable_id = %created.id, error = %edge_err, "Failed to insert dependencies");

                // Compensating delete so no half-created deliverable stays behind
                if let Err(rollback_err) = deliverables::Entity::delete_by_id(created.id).exec(&self.db).await {
                    error!(
                        deliverable_id = %created.id,
                        error = %rollback_err,
                        "Failed to roll back deliverable after dependency failure"
                    );
                }

                return Err(AppError::database(
                    "Deliverable could not be saved because adding its dependencies failed. Please try again.",
                ));
            }
        }

        let owner_name = {
            let members = self.members.read().await;
            let lookup: HashMap<Uuid, &team_members::Model> = members.iter().map(|m| (m.id, m)).collect();
            owner_display_name(created.owner_id, &lookup)
        };

        let enriched = DeliverableWithDetails::from_model(created, owner_name, req.dependency_ids.clone());
        let id = enriched.id;

        self.state
            .apply(move |prev| {
                let mut next = Vec::with_capacity(prev.len() + 1);
                next.push(enriched);
                next.extend_from_slice(prev);
                next
            })
            .await;

        info!(deliverable_id = %id, "Deliverable created");
        Ok(id)
    }

    /// Generic partial update. When the owner changes, the display name is
    /// recomputed from the loaded member set without a re-fetch.
    ///
    /// # Errors
    ///
    /// Returns a validation error for bad payloads or a database error if
    /// the update fails.
    pub async fn update(&self, id: Uuid, req: DeliverableUpdateRequest) -> Result<()> {
        req.validated()?;
        let deadline = req.parsed_deadline()?;

        let mut model = deliverables::ActiveModel {
            id: Set(id),
            ..Default::default()
        };
        if let Some(ref title) = req.title {
            model.title = Set(title.clone());
        }
        if let Some(ref description) = req.description {
            model.description = Set(description.clone());
        }
        if let Some(owner_id) = req.owner_id {
            model.owner_id = Set(owner_id);
        }
        if let Some(deadline) = deadline {
            model.deadline = Set(deadline);
        }
        if let Some(progress) = req.progress {
            model.progress = Set(progress);
        }
        if let Some(ref status) = req.status {
            model.status = Set(status.clone());
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| AppError::database(format!("Failed to update deliverable: {}", e)))?;

        let owner_name = {
            let members = self.members.read().await;
            let lookup: HashMap<Uuid, &team_members::Model> = members.iter().map(|m| (m.id, m)).collect();
            req.owner_id.map(|owner_id| owner_display_name(owner_id, &lookup))
        };

        self.state
            .apply(move |prev| {
                prev.iter()
                    .cloned()
                    .map(|mut d| {
                        if d.id != id {
                            return d;
                        }
                        if let Some(ref title) = req.title {
                            d.title = title.clone();
                        }
                        if let Some(ref description) = req.description {
                            d.description = description.clone();
                        }
                        if let Some(owner_id) = req.owner_id {
                            d.owner_id = owner_id;
                        }
                        if let Some(deadline) = deadline {
                            d.deadline = deadline;
                        }
                        if let Some(progress) = req.progress {
                            d.progress = progress;
                        }
                        if let Some(ref status) = req.status {
                            d.status = status.clone();
                        }
                        if let Some(ref owner_name) = owner_name {
                            d.owner_name = owner_name.clone();
                        }
                        d
                    })
                    .collect()
            })
            .await;

        info!(deliverable_id = %id, "Deliverable updated");
        Ok(())
    }

    /// Updates progress and derives the matching status. This is the only
    /// path that keeps progress and status consistent; direct status edits
    /// through [`Self::update`] bypass the guarantee.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an out-of-range progress or a
    /// database error if the update fails.
    pub async fn update_progress(&self, id: Uuid, progress: i32) -> Result<()> {
        let deadline = self
            .state
            .snapshot()
            .await
            .iter()
            .find(|d| d.id == id)
            .and_then(|d| d.deadline);

        let status = derive_status(progress, deadline, Utc::now().date_naive());

        let req = DeliverableUpdateRequest {
            progress: Some(progress),
            status,
            ..Default::default()
        };
        self.update(id, req).await
    }

    /// Immediate hard delete plus in-memory removal. Deliverables have no
    /// undo window.
    ///
    /// # Errors
    ///
    /// Returns a database error if the delete fails.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        deliverables::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete deliverable: {}", e)))?;

        self.state
            .apply(|prev| prev.iter().filter(|d| d.id != id).cloned().collect())
            .await;

        info!(deliverable_id = %id, "Deliverable deleted");
        Ok(())
    }

    /// Adds a directed dependency edge "deliverable depends on".
    ///
    /// Self-loops and ids missing from the loaded set fail before any
    /// network call. Conflict signals from the storage layer map to
    /// domain errors: the unique index to "already exists", the cycle
    /// trigger to "circular dependency".
    ///
    /// # Errors
    ///
    /// Returns the precondition, conflict, or database error described
    /// above.
    pub async fn add_dependency(&self, deliverable_id: Uuid, depends_on_id: Uuid) -> Result<()> {
        if deliverable_id == depends_on_id {
            return Err(AppError::bad_request("A deliverable cannot depend on itself"));
        }

        let snapshot = self.state.snapshot().await;
        if !snapshot.iter().any(|d| d.id == deliverable_id) {
            return Err(AppError::not_found("Deliverable not found"));
        }
        if !snapshot.iter().any(|d| d.id == depends_on_id) {
            return Err(AppError::not_found("Dependency deliverable not found"));
        }

        let edge = deliverable_dependencies::ActiveModel {
            deliverable_id: Set(deliverable_id),
            depends_on_id: Set(depends_on_id),
            ..Default::default()
        };
        edge.insert(&self.db).await.map_err(map_dependency_insert_err)?;

        self.state
            .apply(|prev| {
                prev.iter()
                    .cloned()
                    .map(|mut d| {
                        if d.id == deliverable_id {
                            d.dependency_ids.push(depends_on_id);
                        }
                        d
                    })
                    .collect()
            })
            .await;

        info!(deliverable_id = %deliverable_id, depends_on_id = %depends_on_id, "Dependency added");
        Ok(())
    }

    /// Removes the single matching dependency edge.
    ///
    /// # Errors
    ///
    /// Returns a database error if the delete fails.
    pub async fn remove_dependency(&self, deliverable_id: Uuid, depends_on_id: Uuid) -> Result<()> {
        deliverable_dependencies::Entity::delete_many()
            .filter(DependencyColumn::DeliverableId.eq(deliverable_id))
            .filter(DependencyColumn::DependsOnId.eq(depends_on_id))
            .exec(&self.db)
            .await
            .map_err(|e| AppError::database(format!("Failed to remove dependency: {}", e)))?;

        self.state
            .apply(|prev| {
                prev.iter()
                    .cloned()
                    .map(|mut d| {
                        if d.id == deliverable_id {
                            d.dependency_ids.retain(|dep| *dep != depends_on_id);
                        }
                        d
                    })
                    .collect()
            })
            .await;

        info!(deliverable_id = %deliverable_id, depends_on_id = %depends_on_id, "Dependency removed");
        Ok(())
    }

    async fn fetch_team_members(&self) -> Result<Vec<team_members::Model>> {
        team_members::Entity::find()
            .order_by_asc(team_members::Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| AppError::database(format!("Failed to fetch team members: {}", e)))
    }
}

fn owner_display_name(owner_id: Option<Uuid>, lookup: &HashMap<Uuid, &team_members::Model>) -> String {
    match owner_id {
        Some(id) => {
            lookup
                .get(&id)
                .map(|m| m.name.clone())
                .unwrap_or_else(|| UNKNOWN_OWNER.to_string())
        },
        None => UNASSIGNED_OWNER.to_string(),
    }
}

/// Maps a dependency-insert failure onto the domain error taxonomy.
fn map_dependency_insert_err(err: sea_orm::DbErr) -> AppError {
    let message = err.to_string();
    if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) || message.contains("duplicate key") {
        return AppError::conflict("This dependency already exists");
    }
    if message.contains("circular dependency") {
        return AppError::conflict("This would create a circular dependency");
    }
    if message.contains("cannot depend on itself") {
        return AppError::bad_request("A deliverable cannot depend on itself");
    }
    AppError::database(format!("Failed to add dependency: {}", err))
}
