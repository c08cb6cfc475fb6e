use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::auth::Actor;
use crate::engine::Transition;
use crate::entities::{history_item, prelude::*, project, score_entry, user_notification};
use crate::error::{ConflictError, EngineError, EngineResult};
use crate::notifier::{InvalidationEvent, InvalidationSink};

/// Optimistic concurrency gate in front of every project mutation.
///
/// A write is one transaction: read the row, compare versions, run the
/// mutator on a copy, then `UPDATE ... WHERE id = ? AND version = ?` and
/// append the transition's children. A zero-row update means another writer
/// committed first and is reported as a conflict.
#[derive(Clone)]
pub struct VersionGuard {
    db: DatabaseConnection,
    sink: Arc<dyn InvalidationSink>,
}

impl VersionGuard {
    pub fn new(db: DatabaseConnection, sink: Arc<dyn InvalidationSink>) -> Self {
        Self { db, sink }
    }

    /// Load a project visible to `actor`. Rows of other tenants are reported
    /// as missing.
    pub async fn acquire<C>(&self, conn: &C, actor: &Actor, project_id: Uuid) -> EngineResult<project::Model>
    where
        C: ConnectionTrait,
    {
        Project::find_by_id(project_id)
            .filter(project::Column::TenantId.eq(actor.tenant_id))
            .one(conn)
            .await?
            .ok_or_else(|| EngineError::project_not_found(project_id))
    }

    /// Version as stored right now.
    pub async fn current_version(&self, actor: &Actor, project_id: Uuid) -> EngineResult<i32> {
        Ok(self.acquire(&self.db, actor, project_id).await?.version)
    }

    /// Run `mutator` against the project if its stored version equals
    /// `expected_version`. On success the version is bumped by one and the
    /// committed row is returned.
    pub async fn apply_if_current<F>(
        &self,
        actor: &Actor,
        project_id: Uuid,
        expected_version: i32,
        mutator: F,
    ) -> EngineResult<project::Model>
    where
        F: FnOnce(&mut project::Model) -> EngineResult<Transition>,
    {
        let txn = self.db.begin().await?;

        let current = self.acquire(&txn, actor, project_id).await?;
        if current.version != expected_version {
            let conflict = ConflictError::against(&current, expected_version);
            tracing::warn!(
                project_id = %project_id,
                expected_version,
                current_version = current.version,
                "Rejected stale project write"
            );
            return Err(conflict.into());
        }

        let mut draft = current;
        let transition = mutator(&mut draft)?;

        let now = Utc::now();
        draft.version = expected_version + 1;
        draft.updated_at = now.into();

        let updated = Project::update_many()
            .set(draft.mutable_columns())
            .filter(project::Column::Id.eq(project_id))
            .filter(project::Column::Version.eq(expected_version))
            .exec(&txn)
            .await?;

        if updated.rows_affected == 0 {
            let latest = self.acquire(&txn, actor, project_id).await?;
            tracing::warn!(
                project_id = %project_id,
                expected_version,
                current_version = latest.version,
                "Lost project write race"
            );
            return Err(ConflictError::against(&latest, expected_version).into());
        }

        self.append_children(&txn, actor, &draft, &transition).await?;
        txn.commit().await?;

        tracing::info!(
            project_id = %project_id,
            version = draft.version,
            stage = draft.stage.as_str(),
            actor_id = %actor.id,
            history = ?transition.history.iter().map(|h| h.action.as_str()).collect::<Vec<_>>(),
            "Committed project mutation"
        );

        self.sink.notify(InvalidationEvent {
            tenant_id: draft.tenant_id,
            keys: transition.invalidate,
        });

        Ok(draft)
    }

    async fn append_children<C>(
        &self,
        conn: &C,
        actor: &Actor,
        project: &project::Model,
        transition: &Transition,
    ) -> EngineResult<()>
    where
        C: ConnectionTrait,
    {
        let now = project.updated_at;

        if !transition.history.is_empty() {
            let rows = transition.history.iter().map(|entry| history_item::ActiveModel {
                id: Set(Uuid::new_v4()),
                project_id: Set(project.id),
                stage: Set(entry.stage),
                action: Set(entry.action.clone()),
                user_id: Set(actor.id),
                rejection_snapshot: Set(entry.rejection_snapshot.clone()),
                created_at: Set(now),
            });
            HistoryItem::insert_many(rows).exec_without_returning(conn).await?;
        }

        if !transition.scores.is_empty() {
            let rows = transition.scores.iter().map(|score| score_entry::ActiveModel {
                id: Set(Uuid::new_v4()),
                tenant_id: Set(project.tenant_id),
                project_id: Set(project.id),
                user_id: Set(score.user_id),
                points: Set(score.points),
                reason: Set(score.reason),
                created_at: Set(now),
            });
            ScoreEntry::insert_many(rows).exec_without_returning(conn).await?;
        }

        if !transition.notices.is_empty() {
            let rows = transition.notices.iter().map(|notice| user_notification::ActiveModel {
                id: Set(Uuid::new_v4()),
                tenant_id: Set(project.tenant_id),
                user_id: Set(notice.user_id),
                project_id: Set(Some(project.id)),
                message: Set(notice.message.clone()),
                is_read: Set(false),
                created_at: Set(now),
            });
            UserNotification::insert_many(rows).exec_without_returning(conn).await?;
        }

        Ok(())
    }
}
