//! `SeaORM` Entity, Project lifecycle row

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};

use super::enums::{Priority, ProjectStage};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: Uuid,
    pub label: String,
    pub completed: bool,
}

/// Ordered checklist persisted as a JSON column.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct Checklist(pub Vec<ChecklistItem>);

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "project")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub client_name: String,
    pub priority: Priority,
    pub stage: ProjectStage,
    pub overall_deadline: DateTimeWithTimeZone,
    pub current_deadline: DateTimeWithTimeZone,
    pub completed_at: Option<DateTimeWithTimeZone>,
    pub assigned_designer_id: Option<Uuid>,
    pub assigned_dev_manager_id: Option<Uuid>,
    pub assigned_qa_id: Option<Uuid>,
    #[sea_orm(column_type = "JsonBinary")]
    pub design_checklist: Checklist,
    #[sea_orm(column_type = "JsonBinary")]
    pub dev_checklist: Checklist,
    #[sea_orm(column_type = "JsonBinary")]
    pub qa_checklist: Checklist,
    #[sea_orm(column_type = "JsonBinary")]
    pub final_checklist: Checklist,
    pub qa_fail_count: i32,
    pub version: i32,
    pub created_by: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::history_item::Entity")]
    History,
    #[sea_orm(has_many = "super::score_entry::Entity")]
    Scores,
    #[sea_orm(has_many = "super::comment::Entity")]
    Comments,
}

impl Related<super::history_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::History.def()
    }
}

impl Related<super::score_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Scores.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Derived at read time, never persisted.
    pub fn is_delayed(&self, now: DateTime<Utc>) -> bool {
        now > self.current_deadline.with_timezone(&Utc) && self.stage != ProjectStage::Completed
    }

    /// Every column a guarded mutation may change. Identity, tenant,
    /// creator and creation time are left `NotSet`.
    pub fn mutable_columns(&self) -> ActiveModel {
        use sea_orm::Set;

        ActiveModel {
            client_name: Set(self.client_name.clone()),
            priority: Set(self.priority),
            stage: Set(self.stage),
            current_deadline: Set(self.current_deadline),
            completed_at: Set(self.completed_at),
            assigned_designer_id: Set(self.assigned_designer_id),
            assigned_dev_manager_id: Set(self.assigned_dev_manager_id),
            assigned_qa_id: Set(self.assigned_qa_id),
            design_checklist: Set(self.design_checklist.clone()),
            dev_checklist: Set(self.dev_checklist.clone()),
            qa_checklist: Set(self.qa_checklist.clone()),
            final_checklist: Set(self.final_checklist.clone()),
            qa_fail_count: Set(self.qa_fail_count),
            version: Set(self.version),
            updated_at: Set(self.updated_at),
            ..Default::default()
        }
    }
}
