use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::auth::Actor;
use crate::engine::transitions::{self, TransitionContext};
use crate::engine::ScoringPolicy;
use crate::entities::enums::{LeadRole, ProjectStage};
use crate::entities::project;
use crate::error::EngineResult;
use crate::services::{UserService, VersionGuard};

/// Stage transitions, lead assignment and deadline changes. Every call runs
/// its rule inside [`VersionGuard::apply_if_current`].
#[derive(Clone)]
pub struct LifecycleService {
    guard: VersionGuard,
    users: UserService,
    policy: ScoringPolicy,
}

impl LifecycleService {
    pub fn new(guard: VersionGuard, users: UserService, policy: ScoringPolicy) -> Self {
        Self { guard, users, policy }
    }

    pub fn guard(&self) -> &VersionGuard {
        &self.guard
    }

    pub async fn start(&self, actor: &Actor, project_id: Uuid, expected_version: i32) -> EngineResult<project::Model> {
        let ctx = self.context(actor);
        self.guard
            .apply_if_current(actor, project_id, expected_version, |project| {
                transitions::start(project, &ctx)
            })
            .await
    }

    pub async fn advance(
        &self,
        actor: &Actor,
        project_id: Uuid,
        next_stage: ProjectStage,
        expected_version: i32,
    ) -> EngineResult<project::Model> {
        let ctx = self.context(actor);
        self.guard
            .apply_if_current(actor, project_id, expected_version, |project| {
                transitions::advance(project, next_stage, &ctx)
            })
            .await
    }

    pub async fn record_qa_feedback(
        &self,
        actor: &Actor,
        project_id: Uuid,
        passed: bool,
        expected_version: i32,
    ) -> EngineResult<project::Model> {
        let ctx = self.context(actor);
        self.guard
            .apply_if_current(actor, project_id, expected_version, |project| {
                transitions::qa_feedback(project, passed, &ctx)
            })
            .await
    }

    pub async fn archive(&self, actor: &Actor, project_id: Uuid, expected_version: i32) -> EngineResult<project::Model> {
        let ctx = self.context(actor);
        self.guard
            .apply_if_current(actor, project_id, expected_version, |project| {
                transitions::archive(project, &ctx)
            })
            .await
    }

    pub async fn unarchive(
        &self,
        actor: &Actor,
        project_id: Uuid,
        expected_version: i32,
    ) -> EngineResult<project::Model> {
        let ctx = self.context(actor);
        self.guard
            .apply_if_current(actor, project_id, expected_version, |project| {
                transitions::unarchive(project, &ctx)
            })
            .await
    }

    pub async fn reassign_lead(
        &self,
        actor: &Actor,
        project_id: Uuid,
        role: LeadRole,
        user_id: Uuid,
        expected_version: i32,
    ) -> EngineResult<project::Model> {
        let assignee = self.users.find_in_tenant(actor.tenant_id, user_id).await?;
        let ctx = self.context(actor);
        self.guard
            .apply_if_current(actor, project_id, expected_version, |project| {
                transitions::reassign_lead(project, role, &assignee, &ctx)
            })
            .await
    }

    pub async fn change_deadline(
        &self,
        actor: &Actor,
        project_id: Uuid,
        new_deadline: DateTime<Utc>,
        justification: &str,
        expected_version: i32,
    ) -> EngineResult<project::Model> {
        let ctx = self.context(actor);
        self.guard
            .apply_if_current(actor, project_id, expected_version, |project| {
                transitions::change_deadline(project, new_deadline, justification, &ctx)
            })
            .await
    }

    fn context<'a>(&'a self, actor: &'a Actor) -> TransitionContext<'a> {
        TransitionContext {
            actor,
            now: Utc::now(),
            policy: &self.policy,
        }
    }
}
