use async_graphql::Enum;
use sea_orm::entity::prelude::StringLen;
use sea_orm::DeriveActiveEnum;
use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoStaticStr};

// Stored as plain strings so the same schema runs on PostgreSQL and SQLite.
#[derive(
    Enum, Copy, Clone, Eq, PartialEq, Hash, Debug, DeriveActiveEnum, Serialize, Deserialize, EnumIter, IntoStaticStr,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[strum(serialize_all = "snake_case")]
#[graphql(name = "ProjectStage")]
pub enum ProjectStage {
    #[graphql(name = "UPCOMING")]
    #[sea_orm(string_value = "upcoming")]
    Upcoming,
    #[graphql(name = "DESIGN")]
    #[sea_orm(string_value = "design")]
    Design,
    #[graphql(name = "DEVELOPMENT")]
    #[sea_orm(string_value = "development")]
    Development,
    #[graphql(name = "QA")]
    #[sea_orm(string_value = "qa")]
    Qa,
    #[graphql(name = "ADMIN_REVIEW")]
    #[sea_orm(string_value = "admin_review")]
    AdminReview,
    #[graphql(name = "SEND_TO_CLIENT")]
    #[sea_orm(string_value = "send_to_client")]
    SendToClient,
    #[graphql(name = "SENT_TO_CLIENT")]
    #[sea_orm(string_value = "sent_to_client")]
    SentToClient,
    #[graphql(name = "COMPLETED")]
    #[sea_orm(string_value = "completed")]
    Completed,
}

impl ProjectStage {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }

    /// Human readable name used in history entries and notices.
    pub fn label(&self) -> &'static str {
        match self {
            ProjectStage::Upcoming => "Upcoming",
            ProjectStage::Design => "Design",
            ProjectStage::Development => "Development",
            ProjectStage::Qa => "QA",
            ProjectStage::AdminReview => "Admin Review",
            ProjectStage::SendToClient => "Send to Client",
            ProjectStage::SentToClient => "Sent to Client",
            ProjectStage::Completed => "Completed",
        }
    }
}

#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug, DeriveActiveEnum, Serialize, Deserialize, EnumIter)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[graphql(name = "Priority")]
pub enum Priority {
    #[graphql(name = "LOW")]
    #[sea_orm(string_value = "low")]
    Low,
    #[graphql(name = "MEDIUM")]
    #[sea_orm(string_value = "medium")]
    Medium,
    #[graphql(name = "HIGH")]
    #[sea_orm(string_value = "high")]
    High,
    #[graphql(name = "URGENT")]
    #[sea_orm(string_value = "urgent")]
    Urgent,
}

#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug, DeriveActiveEnum, Serialize, Deserialize, EnumIter, IntoStaticStr)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[strum(serialize_all = "snake_case")]
#[graphql(name = "UserRole")]
pub enum UserRole {
    #[graphql(name = "ADMIN")]
    #[sea_orm(string_value = "admin")]
    Admin,
    #[graphql(name = "DESIGNER")]
    #[sea_orm(string_value = "designer")]
    Designer,
    #[graphql(name = "DEV_MANAGER")]
    #[sea_orm(string_value = "dev_manager")]
    DevManager,
    #[graphql(name = "QA_ENGINEER")]
    #[sea_orm(string_value = "qa_engineer")]
    QaEngineer,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

/// The three lead slots on a project. Not persisted on its own; each slot
/// is a nullable column on `project`.
#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[graphql(name = "LeadRole")]
pub enum LeadRole {
    #[graphql(name = "DESIGNER")]
    Designer,
    #[graphql(name = "DEV_MANAGER")]
    DevManager,
    #[graphql(name = "QA_ENGINEER")]
    QaEngineer,
}

impl LeadRole {
    /// Role a user must hold to occupy this slot.
    pub fn required_user_role(&self) -> UserRole {
        match self {
            LeadRole::Designer => UserRole::Designer,
            LeadRole::DevManager => UserRole::DevManager,
            LeadRole::QaEngineer => UserRole::QaEngineer,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LeadRole::Designer => "Designer",
            LeadRole::DevManager => "Dev Lead",
            LeadRole::QaEngineer => "QA Engineer",
        }
    }

    /// Lead slot owning the checklist of `stage`, if any.
    pub fn for_stage(stage: ProjectStage) -> Option<Self> {
        match stage {
            ProjectStage::Design => Some(LeadRole::Designer),
            ProjectStage::Development => Some(LeadRole::DevManager),
            ProjectStage::Qa => Some(LeadRole::QaEngineer),
            _ => None,
        }
    }
}

#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug, DeriveActiveEnum, Serialize, Deserialize, EnumIter)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[graphql(name = "ScoreReason")]
pub enum ScoreReason {
    #[graphql(name = "DELIVERY")]
    #[sea_orm(string_value = "delivery")]
    Delivery,
    #[graphql(name = "ON_TIME")]
    #[sea_orm(string_value = "on_time")]
    OnTime,
    #[graphql(name = "EARLY_DELIVERY")]
    #[sea_orm(string_value = "early_delivery")]
    EarlyDelivery,
    #[graphql(name = "QA_FIRST_PASS")]
    #[sea_orm(string_value = "qa_first_pass")]
    QaFirstPass,
    #[graphql(name = "QA_REJECTION")]
    #[sea_orm(string_value = "qa_rejection")]
    QaRejection,
    #[graphql(name = "DEADLINE_MISSED")]
    #[sea_orm(string_value = "deadline_missed")]
    DeadlineMissed,
    #[graphql(name = "DELAY_PENALTY")]
    #[sea_orm(string_value = "delay_penalty")]
    DelayPenalty,
}
