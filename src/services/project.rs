use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::Serialize;
use strum::IntoEnumIterator;
use uuid::Uuid;

use crate::auth::{permissions, Actor};
use crate::engine::checklist::templates;
use crate::entities::{
    comment, enums::{Priority, ProjectStage}, history_item, prelude::*, project, score_entry, user_notification,
};
use crate::error::{EngineError, EngineResult};
use crate::notifier::{InvalidateKey, InvalidationEvent, InvalidationSink};

#[derive(Debug, Clone)]
pub struct NewProject {
    pub client_name: String,
    pub priority: Priority,
    pub overall_deadline: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectStats {
    pub total: u64,
    pub delayed: u64,
    pub by_stage: Vec<(ProjectStage, u64)>,
}

/// Project creation, reads and deletion. Everything that changes an
/// existing row goes through [`super::VersionGuard`] instead.
#[derive(Clone)]
pub struct ProjectService {
    db: DatabaseConnection,
    sink: Arc<dyn InvalidationSink>,
}

impl ProjectService {
    pub fn new(db: DatabaseConnection, sink: Arc<dyn InvalidationSink>) -> Self {
        Self { db, sink }
    }

    /// New projects start UPCOMING at version 1 with template checklists and
    /// no history.
    pub async fn create_project(&self, actor: &Actor, input: NewProject) -> EngineResult<project::Model> {
        permissions::require_admin(actor, "create projects")?;

        let client_name = input.client_name.trim();
        if client_name.is_empty() {
            return Err(EngineError::validation("client name cannot be empty"));
        }

        let now = Utc::now();
        let [design, dev, qa, fin] = templates();
        let new_project = project::ActiveModel {
            id: Set(Uuid::new_v4()),
            tenant_id: Set(actor.tenant_id),
            client_name: Set(client_name.to_string()),
            priority: Set(input.priority),
            stage: Set(ProjectStage::Upcoming),
            overall_deadline: Set(input.overall_deadline.into()),
            current_deadline: Set(input.overall_deadline.into()),
            completed_at: Set(None),
            assigned_designer_id: Set(None),
            assigned_dev_manager_id: Set(None),
            assigned_qa_id: Set(None),
            design_checklist: Set(design),
            dev_checklist: Set(dev),
            qa_checklist: Set(qa),
            final_checklist: Set(fin),
            qa_fail_count: Set(0),
            version: Set(1),
            created_by: Set(actor.id),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        let project = new_project.insert(&self.db).await?;
        tracing::info!(project_id = %project.id, client = %project.client_name, "Created project");

        self.notify(actor.tenant_id, [InvalidateKey::Projects, InvalidateKey::ProjectStats]);
        Ok(project)
    }

    pub async fn get_project(&self, tenant_id: Uuid, project_id: Uuid) -> EngineResult<project::Model> {
        Project::find_by_id(project_id)
            .filter(project::Column::TenantId.eq(tenant_id))
            .one(&self.db)
            .await?
            .ok_or_else(|| EngineError::project_not_found(project_id))
    }

    /// Tenant projects, soonest current deadline first.
    pub async fn list_projects(
        &self,
        tenant_id: Uuid,
        stage: Option<ProjectStage>,
    ) -> EngineResult<Vec<project::Model>> {
        let mut query = Project::find().filter(project::Column::TenantId.eq(tenant_id));
        if let Some(stage) = stage {
            query = query.filter(project::Column::Stage.eq(stage));
        }

        Ok(query
            .order_by_asc(project::Column::CurrentDeadline)
            .order_by_asc(project::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    pub async fn project_stats(&self, tenant_id: Uuid, now: DateTime<Utc>) -> EngineResult<ProjectStats> {
        let projects = self.list_projects(tenant_id, None).await?;

        let mut counts: HashMap<ProjectStage, u64> = HashMap::new();
        let mut delayed = 0;
        for project in &projects {
            *counts.entry(project.stage).or_default() += 1;
            if project.is_delayed(now) {
                delayed += 1;
            }
        }

        Ok(ProjectStats {
            total: projects.len() as u64,
            delayed,
            by_stage: ProjectStage::iter()
                .map(|stage| (stage, counts.get(&stage).copied().unwrap_or(0)))
                .collect(),
        })
    }

    /// Irreversible. Every listed project and all of its children go in one
    /// transaction; a single unknown id aborts the whole delete.
    pub async fn delete_projects(&self, actor: &Actor, project_ids: &[Uuid]) -> EngineResult<u64> {
        permissions::require_admin(actor, "delete projects")?;

        let ids: Vec<Uuid> = project_ids
            .iter()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if ids.is_empty() {
            return Err(EngineError::validation("no projects selected for deletion"));
        }

        let txn = self.db.begin().await?;

        let found: BTreeSet<Uuid> = Project::find()
            .filter(project::Column::Id.is_in(ids.clone()))
            .filter(project::Column::TenantId.eq(actor.tenant_id))
            .all(&txn)
            .await?
            .into_iter()
            .map(|project| project.id)
            .collect();
        if let Some(missing) = ids.iter().find(|id| !found.contains(id)) {
            return Err(EngineError::project_not_found(*missing));
        }

        HistoryItem::delete_many()
            .filter(history_item::Column::ProjectId.is_in(ids.clone()))
            .exec(&txn)
            .await?;
        ScoreEntry::delete_many()
            .filter(score_entry::Column::ProjectId.is_in(ids.clone()))
            .exec(&txn)
            .await?;
        Comment::delete_many()
            .filter(comment::Column::ProjectId.is_in(ids.clone()))
            .exec(&txn)
            .await?;
        UserNotification::delete_many()
            .filter(user_notification::Column::ProjectId.is_in(ids.clone()))
            .exec(&txn)
            .await?;
        let deleted = Project::delete_many()
            .filter(project::Column::Id.is_in(ids.clone()))
            .exec(&txn)
            .await?;

        txn.commit().await?;
        tracing::info!(count = deleted.rows_affected, actor_id = %actor.id, "Deleted projects");

        self.notify(
            actor.tenant_id,
            [
                InvalidateKey::Projects,
                InvalidateKey::ProjectStats,
                InvalidateKey::Rankings,
                InvalidateKey::Notifications,
            ],
        );
        Ok(deleted.rows_affected)
    }

    pub async fn delete_project(&self, actor: &Actor, project_id: Uuid) -> EngineResult<()> {
        self.delete_projects(actor, &[project_id]).await.map(|_| ())
    }

    fn notify(&self, tenant_id: Uuid, keys: impl IntoIterator<Item = InvalidateKey>) {
        self.sink.notify(InvalidationEvent {
            tenant_id,
            keys: keys.into_iter().collect(),
        });
    }
}
