//! `SeaORM` Entity, append-only project timeline

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::enums::ProjectStage;
use super::project::Checklist;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "project_history")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub project_id: Uuid,
    pub stage: ProjectStage,
    #[sea_orm(column_type = "Text")]
    pub action: String,
    pub user_id: Uuid,
    /// Frozen copy of the QA checklist at the moment of a rejection.
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub rejection_snapshot: Option<Checklist>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::project::Entity",
        from = "Column::ProjectId",
        to = "super::project::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Project,
}

impl Related<super::project::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Project.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
