use uuid::Uuid;

use crate::auth::Actor;
use crate::engine::checklist;
use crate::entities::project;
use crate::error::EngineResult;
use crate::services::VersionGuard;

/// Edits to the active checklist. Each edit is a guarded mutation and
/// bumps the project version like any other write.
#[derive(Clone)]
pub struct ChecklistService {
    guard: VersionGuard,
}

impl ChecklistService {
    pub fn new(guard: VersionGuard) -> Self {
        Self { guard }
    }

    pub async fn toggle_item(
        &self,
        actor: &Actor,
        project_id: Uuid,
        item_id: Uuid,
        expected_version: i32,
    ) -> EngineResult<project::Model> {
        self.guard
            .apply_if_current(actor, project_id, expected_version, |project| {
                checklist::toggle_item(project, actor, item_id)
            })
            .await
    }

    pub async fn add_item(
        &self,
        actor: &Actor,
        project_id: Uuid,
        label: &str,
        expected_version: i32,
    ) -> EngineResult<project::Model> {
        self.guard
            .apply_if_current(actor, project_id, expected_version, |project| {
                checklist::add_item(project, actor, label)
            })
            .await
    }

    pub async fn remove_item(
        &self,
        actor: &Actor,
        project_id: Uuid,
        item_id: Uuid,
        expected_version: i32,
    ) -> EngineResult<project::Model> {
        self.guard
            .apply_if_current(actor, project_id, expected_version, |project| {
                checklist::remove_item(project, actor, item_id)
            })
            .await
    }
}
