//! # Agreement Aggregator
//!
//! Loads agreements with signature counts, manages the sign/create
//! lifecycle (an agreement activates once every current member has
//! signed), and drives the optimistic delete/undo workflow: deletion
//! removes the row from the view immediately, holds a snapshot in the
//! undo queue, and only commits the hard delete when the countdown
//! elapses or the toast is dismissed.

use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Utc};
use entity::{
    agreement_signatures::{self, Column as SignatureColumn},
    agreements::{self, AgreementStatus, Column as AgreementColumn},
    team_members,
};
use error::{AppError, Result};
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, DbConn, EntityTrait, QueryFilter, QueryOrder, Set, SqlErr,
};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{error, info};
use uuid::Uuid;
use validator::Validate;

use crate::{
    current_user::{CurrentUserResolver, FirstTeamMember},
    dto::AgreementCreateRequest,
    state::ViewState,
    undo::{PendingDeletion, UndoQueue},
};

/// An agreement enriched with computed signature counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgreementWithSignatures {
    /// Agreement id
    pub id:            Uuid,
    /// Agreement title
    pub title:         String,
    /// Agreement description
    pub description:   Option<String>,
    /// Lifecycle status
    pub status:        AgreementStatus,
    /// Creating member, if still known
    pub created_by:    Option<Uuid>,
    /// Creation timestamp
    pub created_at:    DateTime<Utc>,
    /// Last update timestamp
    pub updated_at:    DateTime<Utc>,
    /// Number of collected signatures
    pub signed_by:     u64,
    /// Size of the current roster (recomputed live on every load)
    pub total_members: u64,
    /// Creator display name
    pub creator_name:  String,
}

/// One roster entry of an agreement's signature sheet: every member
/// appears, signed or not, so the list length equals the member count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignatureDisplay {
    /// Signature id, or the member id when unsigned
    pub id:        Uuid,
    /// Member id
    pub member_id: Uuid,
    /// Member display name
    pub name:      String,
    /// Whether this member has signed
    pub signed:    bool,
    /// Human-readable signing time, when signed
    pub timestamp: Option<String>,
}

/// Aggregator for the agreements view.
pub struct AgreementService {
    db:              DbConn,
    resolver:        Arc<dyn CurrentUserResolver>,
    members:         RwLock<Vec<team_members::Model>>,
    current_user_id: RwLock<Option<Uuid>>,
    state:           ViewState<AgreementWithSignatures>,
    undo:            UndoQueue<AgreementWithSignatures>,
}

impl AgreementService {
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
            undo: UndoQueue::new(),
        }
    }

    /// Snapshot of the loaded agreements, newest first.
    pub async fn agreements(&self) -> Vec<AgreementWithSignatures> { self.state.snapshot().await }

    /// Snapshot of the loaded roster.
    pub async fn team_members(&self) -> Vec<team_members::Model> { self.members.read().await.clone() }

    /// The resolved current user, if any.
    pub async fn current_user_id(&self) -> Option<Uuid> { *self.current_user_id.read().await }

    /// Invalidates in-flight loads; a load that resolves after this call
    /// will not write into the view.
    pub fn reset(&self) { self.state.invalidate(); }

    /// Loads agreements, every signature row, and the roster, and commits
    /// the enriched list through the stale-load guard.
    ///
    /// # Errors
    ///
    /// Returns an error if any fetch fails; the previous view is kept.
    pub async fn load(&self) -> Result<Vec<AgreementWithSignatures>> {
        let token = self.state.begin_load();

        let members = self.fetch_team_members().await?;
        let current_user = self.resolver.resolve(&self.db).await?;

        let agreement_rows = agreements::Entity::find()
            .order_by_desc(AgreementColumn::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| AppError::database(format!("Failed to fetch agreements: {}", e)))?;

        let enriched = if agreement_rows.is_empty() {
            Vec::new()
        }
        else {
            // Un-scoped: every signature row is loaded to build counts
            let signatures = agreement_signatures::Entity::find()
                .all(&self.db)
                .await
                .map_err(|e| AppError::database(format!("Failed to fetch signatures: {}", e)))?;

            let mut counts: HashMap<Uuid, u64> = HashMap::new();
            for signature in &signatures {
                *counts.entry(signature.agreement_id).or_default() += 1;
            }

            let lookup: HashMap<Uuid, &team_members::Model> = members.iter().map(|m| (m.id, m)).collect();
            let total_members = members.len() as u64;

            agreement_rows
                .into_iter()
                .map(|a| {
                    let creator_name = a
                        .created_by
                        .and_then(|id| lookup.get(&id))
                        .map(|m| m.name.clone())
                        .unwrap_or_else(|| "Unknown".to_string());
                    AgreementWithSignatures {
                        signed_by: counts.get(&a.id).copied().unwrap_or(0),
                        total_members,
                        creator_name,
                        id: a.id,
                        title: a.title,
                        description: a.description,
                        status: a.status,
                        created_by: a.created_by,
                        created_at: a.created_at,
                        updated_at: a.updated_at,
                    }
                })
                .collect()
        };

        *self.members.write().await = members;
        *self.current_user_id.write().await = current_user;
        self.state.commit_if_current(token, enriched.clone()).await;

        Ok(enriched)
    }

    /// Creates an agreement in `pending` status and prepends it to the
    /// view with zero signatures.
    ///
    /// # Errors
    ///
    /// Returns a validation error for bad payloads or a database error if
    /// the insert fails.
    pub async fn create(&self, req: AgreementCreateRequest) -> Result<Uuid> {
        req.validate().map_err(AppError::from)?;

        let created_by = *self.current_user_id.read().await;

        let model = agreements::ActiveModel {
            title: Set(req.title.clone()),
            description: Set(req.description.clone()),
            status: Set(AgreementStatus::Pending),
            created_by: Set(created_by),
            ..Default::default()
        };

        let created = model
            .insert(&self.db)
            .await
            .map_err(|e| AppError::database(format!("Failed to create agreement: {}", e)))?;

        let members = self.members.read().await;
        let creator_name = created_by
            .and_then(|id| members.iter().find(|m| m.id == id))
            .map(|m| m.name.clone())
            .unwrap_or_else(|| "You".to_string());
        let total_members = members.len() as u64;
        drop(members);

        let enriched = AgreementWithSignatures {
            signed_by: 0,
            total_members,
            creator_name,
            id: created.id,
            title: created.title,
            description: created.description,
            status: created.status,
            created_by: created.created_by,
            created_at: created.created_at,
            updated_at: created.updated_at,
        };

        let id = enriched.id;
        self.state
            .apply(move |prev| {
                let mut next = Vec::with_capacity(prev.len() + 1);
                next.push(enriched);
                next.extend_from_slice(prev);
                next
            })
            .await;

        info!(agreement_id = %id, "Agreement created");
        Ok(id)
    }

    /// Signs an agreement as the current user.
    ///
    /// The existence pre-check runs before the insert and is advisory; the
    /// unique index is the authoritative duplicate guard and maps to the
    /// same message. When the recomputed count covers the roster, the
    /// `active` status is persisted best-effort: a failure there is logged
    /// and the sign still succeeds, the flag simply lags.
    ///
    /// # Errors
    ///
    /// Returns a conflict when already signed, a bad-request when no
    /// current user is resolvable, or a database error.
    pub async fn sign(&self, agreement_id: Uuid) -> Result<()> {
        let member_id = self
            .current_user_id
            .read()
            .await
            .ok_or_else(|| AppError::bad_request("No user logged in"))?;

        let existing = agreement_signatures::Entity::find()
            .filter(SignatureColumn::AgreementId.eq(agreement_id))
            .filter(SignatureColumn::MemberId.eq(member_id))
            .one(&self.db)
            .await
            .map_err(|e| AppError::database(format!("Failed to check signature status: {}", e)))?;

        if existing.is_some() {
            return Err(AppError::conflict("You have already signed this agreement"));
        }

        let signature = agreement_signatures::ActiveModel {
            agreement_id: Set(agreement_id),
            member_id: Set(member_id),
            ..Default::default()
        };
        signature.insert(&self.db).await.map_err(map_signature_insert_err)?;

        // Recompute client-side and activate once the roster is covered
        let snapshot = self.state.snapshot().await;
        let current = snapshot.iter().find(|a| a.id == agreement_id);
        let new_signed = current.map(|a| a.signed_by).unwrap_or(0) + 1;
        let total_members = current.map(|a| a.total_members).unwrap_or(0);
        let should_activate = total_members > 0 && new_signed >= total_members;

        if should_activate {
            let persisted = agreements::Entity::update_many()
                .col_expr(AgreementColumn::Status, AgreementStatus::Active.as_enum())
                .filter(AgreementColumn::Id.eq(agreement_id))
                .exec(&self.db)
                .await;

            if let Err(e) = persisted {
                // The signature exists; only the status flag lags.
                error!(agreement_id = %agreement_id, error = %e, "Failed to persist agreement activation");
            }
        }

        self.state
            .apply(|prev| {
                prev.iter()
                    .cloned()
                    .map(|mut a| {
                        if a.id == agreement_id {
                            a.signed_by = new_signed;
                            if should_activate {
                                a.status = AgreementStatus::Active;
                            }
                        }
                        a
                    })
                    .collect()
            })
            .await;

        info!(agreement_id = %agreement_id, member_id = %member_id, activated = should_activate, "Agreement signed");
        Ok(())
    }

    /// Soft half of delete-with-undo: removes the agreement from the view
    /// and returns the snapshot with its original index. No backend call
    /// happens here; the database is untouched until timeout or dismiss.
    ///
    /// # Errors
    ///
    /// Returns a not-found error when the agreement is not in the view.
    pub async fn delete_agreement(&self, agreement_id: Uuid) -> Result<(AgreementWithSignatures, usize)> {
        let snapshot = self.state.snapshot().await;
        let index = snapshot
            .iter()
            .position(|a| a.id == agreement_id)
            .ok_or_else(|| AppError::not_found("Agreement not found"))?;
        let deleted = snapshot[index].clone();

        self.state
            .apply(|prev| prev.iter().filter(|a| a.id != agreement_id).cloned().collect())
            .await;

        Ok((deleted, index))
    }

    /// Hard half of delete-with-undo: issues the backend delete. Called
    /// exactly once per deletion event, by the countdown or by dismissal,
    /// never by undo.
    ///
    /// # Errors
    ///
    /// Returns a database error if the delete fails.
    pub async fn permanently_delete(&self, agreement_id: Uuid) -> Result<()> {
        agreements::Entity::delete_by_id(agreement_id)
            .exec(&self.db)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete agreement: {}", e)))?;

        info!(agreement_id = %agreement_id, "Agreement permanently deleted");
        Ok(())
    }

    /// Removes the agreement from the view and schedules its hard delete
    /// behind the undo window. Returns the deletion id for
    /// [`Self::undo`] / [`Self::dismiss`].
    ///
    /// # Errors
    ///
    /// Returns a not-found error when the agreement is not in the view.
    pub async fn delete_with_undo(&self, agreement_id: Uuid) -> Result<Uuid> {
        let (snapshot, index) = self.delete_agreement(agreement_id).await?;

        // The countdown outlives any borrow of the service; it captures its
        // own connection handle for the deferred hard delete.
        let db = self.db.clone();
        let deletion_id = self
            .undo
            .schedule(snapshot, index, async move {
                match agreements::Entity::delete_by_id(agreement_id).exec(&db).await {
                    Ok(_) => info!(agreement_id = %agreement_id, "Agreement permanently deleted"),
                    Err(e) => {
                        error!(agreement_id = %agreement_id, error = %e, "Deferred agreement delete failed")
                    },
                }
            })
            .await;

        Ok(deletion_id)
    }

    /// Restores a pending deletion at its original list index and cancels
    /// its countdown. No backend call: nothing was ever sent.
    ///
    /// # Errors
    ///
    /// Returns a not-found error when the deletion already reached a
    /// terminal state (committed or undone).
    pub async fn undo(&self, deletion_id: Uuid) -> Result<()> {
        let (snapshot, index) = self
            .undo
            .take(deletion_id)
            .await
            .ok_or_else(|| AppError::not_found("No pending deletion with this id"))?;

        let restored_id = snapshot.id;
        self.state
            .apply(move |prev| {
                let mut next = prev.to_vec();
                next.insert(index.min(next.len()), snapshot);
                next
            })
            .await;

        info!(agreement_id = %restored_id, "Agreement deletion undone");
        Ok(())
    }

    /// Dismisses a pending deletion's toast: cancels the countdown and
    /// issues the hard delete immediately.
    ///
    /// # Errors
    ///
    /// Returns a not-found error when the deletion already reached a
    /// terminal state, or a database error if the delete fails.
    pub async fn dismiss(&self, deletion_id: Uuid) -> Result<()> {
        let (snapshot, _) = self
            .undo
            .take(deletion_id)
            .await
            .ok_or_else(|| AppError::not_found("No pending deletion with this id"))?;

        self.permanently_delete(snapshot.id).await
    }

    /// Pending deletions in creation order, for stacked toast rendering.
    pub async fn pending_deletions(&self) -> Vec<PendingDeletion> { self.undo.pending().await }

    /// Remaining countdown fraction for one pending deletion.
    pub async fn deletion_progress(&self, deletion_id: Uuid) -> Option<f64> { self.undo.progress(deletion_id).await }

    /// Signature sheet for one agreement: the full roster joined against
    /// the agreement's signatures, so unsigned members appear with
    /// `signed = false`.
    ///
    /// # Errors
    ///
    /// Returns a database error if the signature fetch fails.
    pub async fn fetch_signatures(&self, agreement_id: Uuid) -> Result<Vec<SignatureDisplay>> {
        let signatures = agreement_signatures::Entity::find()
            .filter(SignatureColumn::AgreementId.eq(agreement_id))
            .all(&self.db)
            .await
            .map_err(|e| AppError::database(format!("Failed to fetch signatures: {}", e)))?;

        let lookup: HashMap<Uuid, &agreement_signatures::Model> =
            signatures.iter().map(|s| (s.member_id, s)).collect();

        let now = Utc::now();
        let members = self.members.read().await;
        Ok(members
            .iter()
            .map(|member| {
                let signature = lookup.get(&member.id);
                SignatureDisplay {
                    id:        signature.map(|s| s.id).unwrap_or(member.id),
                    member_id: member.id,
                    name:      member.name.clone(),
                    signed:    signature.is_some(),
                    timestamp: signature.map(|s| format_time_ago(s.signed_at, now)),
                }
            })
            .collect())
    }

    /// Whether the current user has signed the given agreement.
    ///
    /// # Errors
    ///
    /// Returns a database error if the existence check fails.
    pub async fn has_user_signed(&self, agreement_id: Uuid) -> Result<bool> {
        let Some(member_id) = *self.current_user_id.read().await
        else {
            return Ok(false);
        };

        let existing = agreement_signatures::Entity::find()
            .filter(SignatureColumn::AgreementId.eq(agreement_id))
            .filter(SignatureColumn::MemberId.eq(member_id))
            .one(&self.db)
            .await
            .map_err(|e| AppError::database(format!("Failed to check signature status: {}", e)))?;

        Ok(existing.is_some())
    }

    async fn fetch_team_members(&self) -> Result<Vec<team_members::Model>> {
        team_members::Entity::find()
            .order_by_asc(team_members::Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| AppError::database(format!("Failed to fetch team members: {}", e)))
    }
}

/// Maps a signature-insert failure: the unique index violation is the
/// authoritative duplicate guard and surfaces as "already signed".
fn map_signature_insert_err(err: sea_orm::DbErr) -> AppError {
    if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
        || err.to_string().contains("duplicate key")
    {
        AppError::conflict("You have already signed this agreement")
    }
    else {
        AppError::database(format!("Failed to sign agreement: {}", err))
    }
}

/// Format a timestamp into a human-readable "time ago" string relative to
/// `now`.
fn format_time_ago(date: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - date).num_seconds().max(0);

    if seconds < 60 {
        return "just now".to_string();
    }

    if seconds < 3600 {
        let minutes = seconds / 60;
        return format!("{} {} ago", minutes, if minutes == 1 { "minute" } else { "minutes" });
    }

    if seconds < 86_400 {
        let hours = seconds / 3600;
        return format!("{} {} ago", hours, if hours == 1 { "hour" } else { "hours" });
    }

    if seconds < 604_800 {
        let days = seconds / 86_400;
        return format!("{} {} ago", days, if days == 1 { "day" } else { "days" });
    }

    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(seconds_ago: i64) -> (DateTime<Utc>, DateTime<Utc>) {
        let now = Utc.with_ymd_and_hms(2026, 8, 7, 12, 0, 0).unwrap();
        (now - chrono::Duration::seconds(seconds_ago), now)
    }

    #[test]
    fn test_time_ago_just_now() {
        let (date, now) = at(30);
        assert_eq!(format_time_ago(date, now), "just now");
    }

    #[test]
    fn test_time_ago_minutes() {
        let (date, now) = at(60);
        assert_eq!(format_time_ago(date, now), "1 minute ago");
        let (date, now) = at(59 * 60);
        assert_eq!(format_time_ago(date, now), "59 minutes ago");
    }

    #[test]
    fn test_time_ago_hours() {
        let (date, now) = at(3600);
        assert_eq!(format_time_ago(date, now), "1 hour ago");
        let (date, now) = at(5 * 3600);
        assert_eq!(format_time_ago(date, now), "5 hours ago");
    }

    #[test]
    fn test_time_ago_days() {
        let (date, now) = at(86_400);
        assert_eq!(format_time_ago(date, now), "1 day ago");
        let (date, now) = at(3 * 86_400);
        assert_eq!(format_time_ago(date, now), "3 days ago");
    }

    #[test]
    fn test_time_ago_falls_back_to_date() {
        let (date, now) = at(30 * 86_400);
        assert_eq!(format_time_ago(date, now), "2026-07-08");
    }

    #[test]
    fn test_map_signature_insert_err_duplicate() {
        let err = sea_orm::DbErr::Custom("duplicate key value violates unique constraint".to_string());
        let mapped = map_signature_insert_err(err);
        assert_eq!(mapped.code(), "CONFLICT");
        assert_eq!(mapped.message(), "You have already signed this agreement");
    }

    #[test]
    fn test_map_signature_insert_err_other() {
        let err = sea_orm::DbErr::Custom("connection reset".to_string());
        let mapped = map_signature_insert_err(err);
        assert_eq!(mapped.code(), "DATABASE_ERROR");
    }
}
