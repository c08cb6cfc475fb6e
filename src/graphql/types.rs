use async_graphql::*;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::engine::checklist::ChecklistKey;
use crate::engine::stage::next_stage;
use crate::entities::enums::{LeadRole, Priority, ProjectStage, ScoreReason, UserRole};
use crate::entities::project::Checklist;
use crate::graphql::DataLoaderContext;

#[derive(SimpleObject)]
#[graphql(complex)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl From<crate::entities::user::Model> for User {
    fn from(user: crate::entities::user::Model) -> Self {
        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
            created_at: user.created_at.into(),
        }
    }
}

#[ComplexObject]
impl User {
    async fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.clone(),
            (None, Some(last)) => last.clone(),
            (None, None) => self.email.clone(),
        }
    }
}

#[derive(SimpleObject, Clone)]
pub struct ChecklistItem {
    pub id: Uuid,
    pub label: String,
    pub completed: bool,
}

fn items(list: Checklist) -> Vec<ChecklistItem> {
    list.0
        .into_iter()
        .map(|item| ChecklistItem {
            id: item.id,
            label: item.label,
            completed: item.completed,
        })
        .collect()
}

#[derive(SimpleObject)]
pub struct ActiveChecklist {
    pub key: ChecklistKey,
    pub items: Vec<ChecklistItem>,
    pub completed_count: i32,
    pub is_complete: bool,
}

// Project Types
#[derive(SimpleObject)]
#[graphql(complex)]
pub struct Project {
    pub id: Uuid,
    pub client_name: String,
    pub priority: Priority,
    pub stage: ProjectStage,
    pub overall_deadline: DateTime<Utc>,
    pub current_deadline: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub assigned_designer_id: Option<Uuid>,
    pub assigned_dev_manager_id: Option<Uuid>,
    #[graphql(name = "assignedQAId")]
    pub assigned_qa_id: Option<Uuid>,
    pub design_checklist: Vec<ChecklistItem>,
    pub dev_checklist: Vec<ChecklistItem>,
    pub qa_checklist: Vec<ChecklistItem>,
    pub final_checklist: Vec<ChecklistItem>,
    pub qa_fail_count: i32,
    pub version: i32,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<crate::entities::project::Model> for Project {
    fn from(project: crate::entities::project::Model) -> Self {
        Self {
            id: project.id,
            client_name: project.client_name,
            priority: project.priority,
            stage: project.stage,
            overall_deadline: project.overall_deadline.into(),
            current_deadline: project.current_deadline.into(),
            completed_at: project.completed_at.map(Into::into),
            assigned_designer_id: project.assigned_designer_id,
            assigned_dev_manager_id: project.assigned_dev_manager_id,
            assigned_qa_id: project.assigned_qa_id,
            design_checklist: items(project.design_checklist),
            dev_checklist: items(project.dev_checklist),
            qa_checklist: items(project.qa_checklist),
            final_checklist: items(project.final_checklist),
            qa_fail_count: project.qa_fail_count,
            version: project.version,
            created_by: project.created_by,
            created_at: project.created_at.into(),
            updated_at: project.updated_at.into(),
        }
    }
}

#[ComplexObject]
impl Project {
    /// Derived from `currentDeadline` at read time.
    async fn is_delayed(&self) -> bool {
        Utc::now() > self.current_deadline && self.stage != ProjectStage::Completed
    }

    /// Canonical forward successor, if any.
    async fn next_stage(&self) -> Option<ProjectStage> {
        next_stage(self.stage)
    }

    async fn active_checklist(&self) -> ActiveChecklist {
        let key = ChecklistKey::for_stage(self.stage);
        let items = match key {
            ChecklistKey::Design => &self.design_checklist,
            ChecklistKey::Dev => &self.dev_checklist,
            ChecklistKey::Qa => &self.qa_checklist,
            ChecklistKey::Final => &self.final_checklist,
        };
        let completed_count = items.iter().filter(|item| item.completed).count();

        ActiveChecklist {
            key,
            items: items.clone(),
            completed_count: completed_count as i32,
            is_complete: !items.is_empty() && completed_count == items.len(),
        }
    }

    async fn designer(&self, ctx: &Context<'_>) -> Result<Option<User>> {
        load_lead(ctx, self.assigned_designer_id).await
    }

    async fn dev_manager(&self, ctx: &Context<'_>) -> Result<Option<User>> {
        load_lead(ctx, self.assigned_dev_manager_id).await
    }

    async fn qa_engineer(&self, ctx: &Context<'_>) -> Result<Option<User>> {
        load_lead(ctx, self.assigned_qa_id).await
    }
}

async fn load_lead(ctx: &Context<'_>, user_id: Option<Uuid>) -> Result<Option<User>> {
    let Some(user_id) = user_id else {
        return Ok(None);
    };
    let dataloader = ctx.data::<DataLoaderContext>()?;
    let user = dataloader
        .load_user(user_id)
        .await
        .map_err(|e| Error::new(format!("Failed to load user: {}", e)))?;
    Ok(user.map(Into::into))
}

#[derive(SimpleObject)]
#[graphql(complex)]
pub struct HistoryItem {
    pub id: Uuid,
    pub project_id: Uuid,
    pub stage: ProjectStage,
    pub action: String,
    pub user_id: Uuid,
    pub rejection_snapshot: Option<Vec<ChecklistItem>>,
    pub timestamp: DateTime<Utc>,
}

impl From<crate::entities::history_item::Model> for HistoryItem {
    fn from(item: crate::entities::history_item::Model) -> Self {
        Self {
            id: item.id,
            project_id: item.project_id,
            stage: item.stage,
            action: item.action,
            user_id: item.user_id,
            rejection_snapshot: item.rejection_snapshot.map(items),
            timestamp: item.created_at.into(),
        }
    }
}

#[ComplexObject]
impl HistoryItem {
    async fn user(&self, ctx: &Context<'_>) -> Result<Option<User>> {
        load_lead(ctx, Some(self.user_id)).await
    }
}

#[derive(SimpleObject)]
pub struct Comment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl From<crate::entities::comment::Model> for Comment {
    fn from(comment: crate::entities::comment::Model) -> Self {
        Self {
            id: comment.id,
            user_id: comment.user_id,
            text: comment.text,
            timestamp: comment.created_at.into(),
        }
    }
}

#[derive(SimpleObject)]
pub struct ScoreEntry {
    pub id: Uuid,
    pub project_id: Uuid,
    pub user_id: Uuid,
    pub points: i32,
    pub reason: ScoreReason,
    pub date: DateTime<Utc>,
}

impl From<crate::entities::score_entry::Model> for ScoreEntry {
    fn from(entry: crate::entities::score_entry::Model) -> Self {
        Self {
            id: entry.id,
            project_id: entry.project_id,
            user_id: entry.user_id,
            points: entry.points,
            reason: entry.reason,
            date: entry.created_at.into(),
        }
    }
}

#[derive(SimpleObject)]
#[graphql(complex)]
pub struct Ranking {
    pub user_id: Uuid,
    pub total_points: i64,
    pub entries: i64,
}

impl From<crate::services::Ranking> for Ranking {
    fn from(ranking: crate::services::Ranking) -> Self {
        Self {
            user_id: ranking.user_id,
            total_points: ranking.total_points,
            entries: ranking.entries,
        }
    }
}

#[ComplexObject]
impl Ranking {
    async fn user(&self, ctx: &Context<'_>) -> Result<Option<User>> {
        load_lead(ctx, Some(self.user_id)).await
    }
}

#[derive(SimpleObject)]
pub struct StageCount {
    pub stage: ProjectStage,
    pub count: u64,
}

#[derive(SimpleObject)]
pub struct ProjectStats {
    pub total: u64,
    pub delayed: u64,
    pub by_stage: Vec<StageCount>,
}

impl From<crate::services::ProjectStats> for ProjectStats {
    fn from(stats: crate::services::ProjectStats) -> Self {
        Self {
            total: stats.total,
            delayed: stats.delayed,
            by_stage: stats
                .by_stage
                .into_iter()
                .map(|(stage, count)| StageCount { stage, count })
                .collect(),
        }
    }
}

#[derive(SimpleObject)]
pub struct Notification {
    pub id: Uuid,
    pub project_id: Option<Uuid>,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<crate::entities::user_notification::Model> for Notification {
    fn from(notification: crate::entities::user_notification::Model) -> Self {
        Self {
            id: notification.id,
            project_id: notification.project_id,
            message: notification.message,
            is_read: notification.is_read,
            created_at: notification.created_at.into(),
        }
    }
}

#[derive(SimpleObject)]
pub struct BatchItemResult {
    pub project_id: Uuid,
    pub success: bool,
    pub error: Option<String>,
    pub error_code: Option<String>,
}

#[derive(SimpleObject)]
pub struct BatchResult {
    pub total_succeeded: i32,
    pub total_failed: i32,
    pub results: Vec<BatchItemResult>,
}

impl From<crate::services::BatchResult> for BatchResult {
    fn from(result: crate::services::BatchResult) -> Self {
        Self {
            total_succeeded: result.total_succeeded as i32,
            total_failed: result.total_failed as i32,
            results: result
                .results
                .into_iter()
                .map(|item| BatchItemResult {
                    project_id: item.project_id,
                    success: item.success,
                    error: item.error,
                    error_code: item.error_code.map(str::to_string),
                })
                .collect(),
        }
    }
}

// Inputs
#[derive(InputObject)]
pub struct CreateProjectInput {
    pub client_name: String,
    pub priority: Option<Priority>,
    pub overall_deadline: DateTime<Utc>,
}

#[derive(InputObject)]
pub struct ExpectedVersionInput {
    pub project_id: Uuid,
    pub version: i32,
}

#[derive(InputObject, Default)]
pub struct BatchPayloadInput {
    pub next_stage: Option<ProjectStage>,
    pub lead_role: Option<LeadRole>,
    pub user_id: Option<Uuid>,
    pub expected_versions: Option<Vec<ExpectedVersionInput>>,
}

impl From<BatchPayloadInput> for crate::services::BatchPayload {
    fn from(input: BatchPayloadInput) -> Self {
        Self {
            next_stage: input.next_stage,
            lead_role: input.lead_role,
            user_id: input.user_id,
            expected_versions: input
                .expected_versions
                .unwrap_or_default()
                .into_iter()
                .map(|entry| (entry.project_id, entry.version))
                .collect(),
        }
    }
}
