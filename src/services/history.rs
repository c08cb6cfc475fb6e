use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use uuid::Uuid;

use crate::entities::{comment, history_item, prelude::*, project};
use crate::error::{EngineError, EngineResult};

/// Read side of the audit timeline. Rows are only ever inserted by the
/// version guard and removed by project deletion.
#[derive(Clone)]
pub struct HistoryService {
    db: DatabaseConnection,
}

impl HistoryService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Oldest first.
    pub async fn project_history(
        &self,
        tenant_id: Uuid,
        project_id: Uuid,
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> EngineResult<Vec<history_item::Model>> {
        self.ensure_visible(tenant_id, project_id).await?;

        let mut query = HistoryItem::find()
            .filter(history_item::Column::ProjectId.eq(project_id))
            .order_by_asc(history_item::Column::CreatedAt);

        if let Some(limit) = limit {
            query = query.limit(limit);
        }

        if let Some(offset) = offset {
            query = query.offset(offset);
        }

        Ok(query.all(&self.db).await?)
    }

    /// Comments are kept apart from stage events and never appear in the
    /// history timeline.
    pub async fn project_comments(&self, tenant_id: Uuid, project_id: Uuid) -> EngineResult<Vec<comment::Model>> {
        self.ensure_visible(tenant_id, project_id).await?;

        Ok(Comment::find()
            .filter(comment::Column::ProjectId.eq(project_id))
            .order_by_asc(comment::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    async fn ensure_visible(&self, tenant_id: Uuid, project_id: Uuid) -> EngineResult<()> {
        Project::find_by_id(project_id)
            .filter(project::Column::TenantId.eq(tenant_id))
            .one(&self.db)
            .await?
            .map(|_| ())
            .ok_or_else(|| EngineError::project_not_found(project_id))
    }
}
