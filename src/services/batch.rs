use std::collections::HashMap;

use async_graphql::Enum;
use uuid::Uuid;

use crate::auth::Actor;
use crate::entities::enums::{LeadRole, ProjectStage};
use crate::entities::project;
use crate::error::{EngineError, EngineResult};
use crate::services::{LifecycleService, ProjectService};

#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug)]
#[graphql(name = "BatchOperation")]
pub enum BatchOperation {
    #[graphql(name = "UPDATE_STAGE")]
    UpdateStage,
    #[graphql(name = "ASSIGN_USER")]
    AssignUser,
    #[graphql(name = "ARCHIVE")]
    Archive,
    #[graphql(name = "DELETE")]
    Delete,
}

/// Operation arguments. Items without an entry in `expected_versions` are
/// guarded against the version read when the item is applied.
#[derive(Debug, Clone, Default)]
pub struct BatchPayload {
    pub next_stage: Option<ProjectStage>,
    pub lead_role: Option<LeadRole>,
    pub user_id: Option<Uuid>,
    pub expected_versions: HashMap<Uuid, i32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchItemResult {
    pub project_id: Uuid,
    pub success: bool,
    pub error: Option<String>,
    pub error_code: Option<&'static str>,
}

impl BatchItemResult {
    fn ok(project_id: Uuid) -> Self {
        Self { project_id, success: true, error: None, error_code: None }
    }

    fn failed(project_id: Uuid, err: &EngineError) -> Self {
        Self {
            project_id,
            success: false,
            error: Some(err.public_message()),
            error_code: Some(err.code()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchResult {
    pub total_succeeded: usize,
    pub total_failed: usize,
    pub results: Vec<BatchItemResult>,
}

impl BatchResult {
    fn from_items(results: Vec<BatchItemResult>) -> Self {
        let total_succeeded = results.iter().filter(|r| r.success).count();
        Self {
            total_succeeded,
            total_failed: results.len() - total_succeeded,
            results,
        }
    }
}

enum ItemAction {
    Advance(ProjectStage),
    Assign(LeadRole, Uuid),
    Archive,
}

/// Applies one operation to many projects. Stage, assignment and archive
/// items are independent guarded writes; delete is all or nothing.
#[derive(Clone)]
pub struct BatchService {
    lifecycle: LifecycleService,
    projects: ProjectService,
}

impl BatchService {
    pub fn new(lifecycle: LifecycleService, projects: ProjectService) -> Self {
        Self { lifecycle, projects }
    }

    pub async fn apply(
        &self,
        actor: &Actor,
        operation: BatchOperation,
        project_ids: &[Uuid],
        payload: BatchPayload,
    ) -> EngineResult<BatchResult> {
        if project_ids.is_empty() {
            return Err(EngineError::validation("batch requires at least one project"));
        }

        let action = match operation {
            BatchOperation::Delete => return Ok(self.delete_all(actor, project_ids).await),
            BatchOperation::UpdateStage => ItemAction::Advance(
                payload
                    .next_stage
                    .ok_or_else(|| EngineError::validation("UPDATE_STAGE requires nextStage"))?,
            ),
            BatchOperation::AssignUser => ItemAction::Assign(
                payload
                    .lead_role
                    .ok_or_else(|| EngineError::validation("ASSIGN_USER requires leadRole"))?,
                payload
                    .user_id
                    .ok_or_else(|| EngineError::validation("ASSIGN_USER requires userId"))?,
            ),
            BatchOperation::Archive => ItemAction::Archive,
        };

        let mut results = Vec::with_capacity(project_ids.len());
        for project_id in project_ids {
            let outcome = self
                .apply_one(actor, *project_id, &action, payload.expected_versions.get(project_id).copied())
                .await;
            results.push(match outcome {
                Ok(_) => BatchItemResult::ok(*project_id),
                Err(err) => {
                    tracing::debug!(project_id = %project_id, error = %err, "Batch item failed");
                    BatchItemResult::failed(*project_id, &err)
                }
            });
        }

        let result = BatchResult::from_items(results);
        tracing::info!(
            operation = ?operation,
            succeeded = result.total_succeeded,
            failed = result.total_failed,
            "Batch operation finished"
        );
        Ok(result)
    }

    async fn apply_one(
        &self,
        actor: &Actor,
        project_id: Uuid,
        action: &ItemAction,
        expected_version: Option<i32>,
    ) -> EngineResult<project::Model> {
        let expected_version = match expected_version {
            Some(version) => version,
            None => self.lifecycle.guard().current_version(actor, project_id).await?,
        };

        match action {
            ItemAction::Advance(next_stage) => {
                self.lifecycle
                    .advance(actor, project_id, *next_stage, expected_version)
                    .await
            }
            ItemAction::Assign(role, user_id) => {
                self.lifecycle
                    .reassign_lead(actor, project_id, *role, *user_id, expected_version)
                    .await
            }
            ItemAction::Archive => self.lifecycle.archive(actor, project_id, expected_version).await,
        }
    }

    async fn delete_all(&self, actor: &Actor, project_ids: &[Uuid]) -> BatchResult {
        let results = match self.projects.delete_projects(actor, project_ids).await {
            Ok(_) => project_ids.iter().map(|id| BatchItemResult::ok(*id)).collect(),
            Err(err) => {
                tracing::warn!(error = %err, "Batch delete rolled back");
                project_ids
                    .iter()
                    .map(|id| BatchItemResult::failed(*id, &err))
                    .collect()
            }
        };
        BatchResult::from_items(results)
    }
}
