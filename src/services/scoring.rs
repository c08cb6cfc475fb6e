use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use serde::Serialize;
use uuid::Uuid;

use crate::entities::{prelude::*, project, score_entry};
use crate::error::{EngineError, EngineResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ranking {
    pub user_id: Uuid,
    pub total_points: i64,
    pub entries: i64,
}

/// Read side of the score ledger.
#[derive(Clone)]
pub struct ScoreService {
    db: DatabaseConnection,
}

impl ScoreService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn project_scores(&self, tenant_id: Uuid, project_id: Uuid) -> EngineResult<Vec<score_entry::Model>> {
        Project::find_by_id(project_id)
            .filter(project::Column::TenantId.eq(tenant_id))
            .one(&self.db)
            .await?
            .ok_or_else(|| EngineError::project_not_found(project_id))?;

        Ok(ScoreEntry::find()
            .filter(score_entry::Column::ProjectId.eq(project_id))
            .order_by_asc(score_entry::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    /// Total points per user across the tenant, highest first.
    pub async fn rankings(&self, tenant_id: Uuid) -> EngineResult<Vec<Ranking>> {
        let rows: Vec<(Uuid, Option<i64>, i64)> = ScoreEntry::find()
            .select_only()
            .column(score_entry::Column::UserId)
            .column_as(Expr::col(score_entry::Column::Points).sum(), "total_points")
            .column_as(Expr::col(score_entry::Column::Id).count(), "entries")
            .filter(score_entry::Column::TenantId.eq(tenant_id))
            .group_by(score_entry::Column::UserId)
            .into_tuple()
            .all(&self.db)
            .await?;

        let mut rankings: Vec<Ranking> = rows
            .into_iter()
            .map(|(user_id, total, entries)| Ranking {
                user_id,
                total_points: total.unwrap_or(0),
                entries,
            })
            .collect();
        rankings.sort_by(|a, b| b.total_points.cmp(&a.total_points).then(a.user_id.cmp(&b.user_id)));

        Ok(rankings)
    }
}
