use async_graphql::*;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::auth::require_actor;
use crate::entities::enums::{LeadRole, Priority, ProjectStage};
use crate::graphql::types::{BatchPayloadInput, BatchResult, CreateProjectInput, Notification, Project};
use crate::services::{
    BatchOperation, BatchService, ChecklistService, LifecycleService, NewProject, NotificationService,
    ProjectService,
};

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn create_project(&self, ctx: &Context<'_>, input: CreateProjectInput) -> Result<Project> {
        let actor = require_actor(ctx).await?;
        let project_service = ctx.data::<ProjectService>()?;

        let project = project_service
            .create_project(
                &actor,
                NewProject {
                    client_name: input.client_name,
                    priority: input.priority.unwrap_or(Priority::Medium),
                    overall_deadline: input.overall_deadline,
                },
            )
            .await
            .map_err(|e| e.extend())?;

        Ok(project.into())
    }

    async fn start_project(&self, ctx: &Context<'_>, project_id: Uuid, expected_version: i32) -> Result<Project> {
        let actor = require_actor(ctx).await?;
        let lifecycle = ctx.data::<LifecycleService>()?;

        let project = lifecycle
            .start(&actor, project_id, expected_version)
            .await
            .map_err(|e| e.extend())?;

        Ok(project.into())
    }

    async fn advance_stage(
        &self,
        ctx: &Context<'_>,
        project_id: Uuid,
        next_stage: ProjectStage,
        expected_version: i32,
    ) -> Result<Project> {
        let actor = require_actor(ctx).await?;
        let lifecycle = ctx.data::<LifecycleService>()?;

        let project = lifecycle
            .advance(&actor, project_id, next_stage, expected_version)
            .await
            .map_err(|e| e.extend())?;

        Ok(project.into())
    }

    #[graphql(name = "recordQAFeedback")]
    async fn record_qa_feedback(
        &self,
        ctx: &Context<'_>,
        project_id: Uuid,
        passed: bool,
        expected_version: i32,
    ) -> Result<Project> {
        let actor = require_actor(ctx).await?;
        let lifecycle = ctx.data::<LifecycleService>()?;

        let project = lifecycle
            .record_qa_feedback(&actor, project_id, passed, expected_version)
            .await
            .map_err(|e| e.extend())?;

        Ok(project.into())
    }

    async fn reassign_lead(
        &self,
        ctx: &Context<'_>,
        project_id: Uuid,
        role: LeadRole,
        user_id: Uuid,
        expected_version: i32,
    ) -> Result<Project> {
        let actor = require_actor(ctx).await?;
        let lifecycle = ctx.data::<LifecycleService>()?;

        let project = lifecycle
            .reassign_lead(&actor, project_id, role, user_id, expected_version)
            .await
            .map_err(|e| e.extend())?;

        Ok(project.into())
    }

    async fn change_deadline(
        &self,
        ctx: &Context<'_>,
        project_id: Uuid,
        new_deadline: DateTime<Utc>,
        justification: String,
        expected_version: i32,
    ) -> Result<Project> {
        let actor = require_actor(ctx).await?;
        let lifecycle = ctx.data::<LifecycleService>()?;

        let project = lifecycle
            .change_deadline(&actor, project_id, new_deadline, &justification, expected_version)
            .await
            .map_err(|e| e.extend())?;

        Ok(project.into())
    }

    async fn archive_project(&self, ctx: &Context<'_>, project_id: Uuid, expected_version: i32) -> Result<Project> {
        let actor = require_actor(ctx).await?;
        let lifecycle = ctx.data::<LifecycleService>()?;

        let project = lifecycle
            .archive(&actor, project_id, expected_version)
            .await
            .map_err(|e| e.extend())?;

        Ok(project.into())
    }

    async fn unarchive_project(&self, ctx: &Context<'_>, project_id: Uuid, expected_version: i32) -> Result<Project> {
        let actor = require_actor(ctx).await?;
        let lifecycle = ctx.data::<LifecycleService>()?;

        let project = lifecycle
            .unarchive(&actor, project_id, expected_version)
            .await
            .map_err(|e| e.extend())?;

        Ok(project.into())
    }

    async fn delete_project(&self, ctx: &Context<'_>, project_id: Uuid) -> Result<bool> {
        let actor = require_actor(ctx).await?;
        let project_service = ctx.data::<ProjectService>()?;

        project_service
            .delete_project(&actor, project_id)
            .await
            .map_err(|e| e.extend())?;

        Ok(true)
    }

    async fn toggle_checklist_item(
        &self,
        ctx: &Context<'_>,
        project_id: Uuid,
        item_id: Uuid,
        expected_version: i32,
    ) -> Result<Project> {
        let actor = require_actor(ctx).await?;
        let checklist_service = ctx.data::<ChecklistService>()?;

        let project = checklist_service
            .toggle_item(&actor, project_id, item_id, expected_version)
            .await
            .map_err(|e| e.extend())?;

        Ok(project.into())
    }

    async fn add_checklist_item(
        &self,
        ctx: &Context<'_>,
        project_id: Uuid,
        label: String,
        expected_version: i32,
    ) -> Result<Project> {
        let actor = require_actor(ctx).await?;
        let checklist_service = ctx.data::<ChecklistService>()?;

        let project = checklist_service
            .add_item(&actor, project_id, &label, expected_version)
            .await
            .map_err(|e| e.extend())?;

        Ok(project.into())
    }

    async fn remove_checklist_item(
        &self,
        ctx: &Context<'_>,
        project_id: Uuid,
        item_id: Uuid,
        expected_version: i32,
    ) -> Result<Project> {
        let actor = require_actor(ctx).await?;
        let checklist_service = ctx.data::<ChecklistService>()?;

        let project = checklist_service
            .remove_item(&actor, project_id, item_id, expected_version)
            .await
            .map_err(|e| e.extend())?;

        Ok(project.into())
    }

    async fn batch_apply(
        &self,
        ctx: &Context<'_>,
        operation: BatchOperation,
        project_ids: Vec<Uuid>,
        payload: Option<BatchPayloadInput>,
    ) -> Result<BatchResult> {
        let actor = require_actor(ctx).await?;
        let batch_service = ctx.data::<BatchService>()?;

        let result = batch_service
            .apply(&actor, operation, &project_ids, payload.unwrap_or_default().into())
            .await
            .map_err(|e| e.extend())?;

        Ok(result.into())
    }

    async fn mark_notification_read(&self, ctx: &Context<'_>, notification_id: Uuid) -> Result<Notification> {
        let actor = require_actor(ctx).await?;
        let notification_service = ctx.data::<NotificationService>()?;

        let notification = notification_service
            .mark_read(&actor, notification_id)
            .await
            .map_err(|e| e.extend())?;

        Ok(notification.into())
    }
}
