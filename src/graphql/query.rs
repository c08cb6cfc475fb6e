use async_graphql::*;
use chrono::Utc;
use uuid::Uuid;

use crate::auth::require_actor;
use crate::entities::enums::{ProjectStage, UserRole};
use crate::graphql::types::{Comment, HistoryItem, Notification, Project, ProjectStats, Ranking, ScoreEntry, User};
use crate::services::{HistoryService, NotificationService, ProjectService, ScoreService, UserService};

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn health(&self) -> &str {
        "OK"
    }

    async fn me(&self, ctx: &Context<'_>) -> Result<User> {
        let actor = require_actor(ctx).await?;
        let user_service = ctx.data::<UserService>()?;

        let user = user_service
            .find_in_tenant(actor.tenant_id, actor.id)
            .await
            .map_err(|e| e.extend())?;

        Ok(user.into())
    }

    async fn users(&self, ctx: &Context<'_>, role: Option<UserRole>) -> Result<Vec<User>> {
        let actor = require_actor(ctx).await?;
        let user_service = ctx.data::<UserService>()?;

        let users = user_service
            .list_users(actor.tenant_id, role)
            .await
            .map_err(|e| e.extend())?;

        Ok(users.into_iter().map(Into::into).collect())
    }

    async fn project(&self, ctx: &Context<'_>, id: Uuid) -> Result<Project> {
        let actor = require_actor(ctx).await?;
        let project_service = ctx.data::<ProjectService>()?;

        let project = project_service
            .get_project(actor.tenant_id, id)
            .await
            .map_err(|e| e.extend())?;

        Ok(project.into())
    }

    async fn projects(&self, ctx: &Context<'_>, stage: Option<ProjectStage>) -> Result<Vec<Project>> {
        let actor = require_actor(ctx).await?;
        let project_service = ctx.data::<ProjectService>()?;

        let projects = project_service
            .list_projects(actor.tenant_id, stage)
            .await
            .map_err(|e| e.extend())?;

        Ok(projects.into_iter().map(Into::into).collect())
    }

    async fn project_stats(&self, ctx: &Context<'_>) -> Result<ProjectStats> {
        let actor = require_actor(ctx).await?;
        let project_service = ctx.data::<ProjectService>()?;

        let stats = project_service
            .project_stats(actor.tenant_id, Utc::now())
            .await
            .map_err(|e| e.extend())?;

        Ok(stats.into())
    }

    async fn project_history(
        &self,
        ctx: &Context<'_>,
        project_id: Uuid,
        limit: Option<i32>,
        offset: Option<i32>,
    ) -> Result<Vec<HistoryItem>> {
        let actor = require_actor(ctx).await?;
        let history_service = ctx.data::<HistoryService>()?;

        let history = history_service
            .project_history(
                actor.tenant_id,
                project_id,
                limit.map(|l| l.max(0) as u64),
                offset.map(|o| o.max(0) as u64),
            )
            .await
            .map_err(|e| e.extend())?;

        Ok(history.into_iter().map(Into::into).collect())
    }

    async fn project_comments(&self, ctx: &Context<'_>, project_id: Uuid) -> Result<Vec<Comment>> {
        let actor = require_actor(ctx).await?;
        let history_service = ctx.data::<HistoryService>()?;

        let comments = history_service
            .project_comments(actor.tenant_id, project_id)
            .await
            .map_err(|e| e.extend())?;

        Ok(comments.into_iter().map(Into::into).collect())
    }

    async fn project_scores(&self, ctx: &Context<'_>, project_id: Uuid) -> Result<Vec<ScoreEntry>> {
        let actor = require_actor(ctx).await?;
        let score_service = ctx.data::<ScoreService>()?;

        let scores = score_service
            .project_scores(actor.tenant_id, project_id)
            .await
            .map_err(|e| e.extend())?;

        Ok(scores.into_iter().map(Into::into).collect())
    }

    async fn rankings(&self, ctx: &Context<'_>) -> Result<Vec<Ranking>> {
        let actor = require_actor(ctx).await?;
        let score_service = ctx.data::<ScoreService>()?;

        let rankings = score_service
            .rankings(actor.tenant_id)
            .await
            .map_err(|e| e.extend())?;

        Ok(rankings.into_iter().map(Into::into).collect())
    }

    async fn my_notifications(
        &self,
        ctx: &Context<'_>,
        unread_only: Option<bool>,
        limit: Option<i32>,
    ) -> Result<Vec<Notification>> {
        let actor = require_actor(ctx).await?;
        let notification_service = ctx.data::<NotificationService>()?;

        let notifications = notification_service
            .for_user(&actor, unread_only.unwrap_or(false), limit.map(|l| l.max(0) as u64))
            .await
            .map_err(|e| e.extend())?;

        Ok(notifications.into_iter().map(Into::into).collect())
    }
}
