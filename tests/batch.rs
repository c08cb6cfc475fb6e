mod common;

use std::collections::HashMap;

use assert_matches::assert_matches;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use uuid::Uuid;

use common::TestApp;
use stagegate::entities::enums::{LeadRole, ProjectStage, ScoreReason};
use stagegate::entities::{history_item, prelude::*};
use stagegate::error::EngineError;
use stagegate::services::{BatchOperation, BatchPayload};

#[tokio::test]
async fn update_stage_reports_partial_success() {
    let app = TestApp::new().await;
    let fresh = app.staffed_project(30).await;
    let stale = app.staffed_project(30).await;

    let payload = BatchPayload {
        next_stage: Some(ProjectStage::Design),
        expected_versions: HashMap::from([(fresh.id, fresh.version), (stale.id, stale.version - 1)]),
        ..Default::default()
    };
    let result = app
        .services
        .batch
        .apply(&app.admin, BatchOperation::UpdateStage, &[fresh.id, stale.id], payload)
        .await
        .unwrap();

    assert_eq!(result.total_succeeded, 1);
    assert_eq!(result.total_failed, 1);
    let failed = result.results.iter().find(|r| !r.success).unwrap();
    assert_eq!(failed.project_id, stale.id);
    assert_eq!(failed.error_code, Some("CONFLICT"));

    let updated = app.services.projects.get_project(app.tenant_id, fresh.id).await.unwrap();
    assert_eq!(updated.stage, ProjectStage::Design);
    let untouched = app.services.projects.get_project(app.tenant_id, stale.id).await.unwrap();
    assert_eq!(untouched.stage, ProjectStage::Upcoming);
    assert_eq!(untouched.version, stale.version);
}

#[tokio::test]
async fn items_without_expected_version_use_the_current_one() {
    let app = TestApp::new().await;
    let staffed = app.staffed_project(30).await;
    let unstaffed = app.create_project(30).await;

    let payload = BatchPayload {
        next_stage: Some(ProjectStage::Design),
        ..Default::default()
    };
    let result = app
        .services
        .batch
        .apply(&app.admin, BatchOperation::UpdateStage, &[staffed.id, unstaffed.id], payload)
        .await
        .unwrap();

    assert_eq!(result.total_succeeded, 1);
    let failed = result.results.iter().find(|r| !r.success).unwrap();
    assert_eq!(failed.project_id, unstaffed.id);
    assert_eq!(failed.error_code, Some("VALIDATION_ERROR"));
    assert!(failed.error.as_deref().unwrap_or_default().contains("lead role unfilled"));
}

#[tokio::test]
async fn assign_user_applies_per_project() {
    let app = TestApp::new().await;
    let first = app.create_project(30).await;
    let second = app.create_project(30).await;

    let payload = BatchPayload {
        lead_role: Some(LeadRole::DevManager),
        user_id: Some(app.dev_manager.id),
        ..Default::default()
    };
    let result = app
        .services
        .batch
        .apply(&app.admin, BatchOperation::AssignUser, &[first.id, second.id], payload)
        .await
        .unwrap();

    assert_eq!(result.total_succeeded, 2);
    for id in [first.id, second.id] {
        let project = app.services.projects.get_project(app.tenant_id, id).await.unwrap();
        assert_eq!(project.assigned_dev_manager_id, Some(app.dev_manager.id));
        assert_eq!(project.version, 2);
    }
}

#[tokio::test]
async fn archive_skips_already_completed_projects() {
    let app = TestApp::new().await;
    let open = app.staffed_project(30).await;
    let done = app.staffed_project(30).await;
    let unstaffed = app.create_project(30).await;
    app.services
        .lifecycle
        .archive(&app.admin, done.id, done.version)
        .await
        .unwrap();

    let result = app
        .services
        .batch
        .apply(
            &app.admin,
            BatchOperation::Archive,
            &[open.id, done.id, unstaffed.id],
            BatchPayload::default(),
        )
        .await
        .unwrap();

    assert_eq!(result.total_succeeded, 1);
    assert_eq!(result.total_failed, 2);
    assert!(result.results[0].success);
    assert!(result.results[2].error.as_deref().unwrap_or_default().contains("Dev Lead"));

    let scores = app.services.scores.project_scores(app.tenant_id, open.id).await.unwrap();
    assert!(scores.iter().any(|s| s.reason == ScoreReason::Delivery));
}

#[tokio::test]
async fn delete_is_all_or_nothing() {
    let app = TestApp::new().await;
    let project = app.staffed_project(30).await;
    let missing = Uuid::new_v4();

    let result = app
        .services
        .batch
        .apply(&app.admin, BatchOperation::Delete, &[project.id, missing], BatchPayload::default())
        .await
        .unwrap();

    assert_eq!(result.total_succeeded, 0);
    assert_eq!(result.total_failed, 2);
    assert!(result.results.iter().all(|r| r.error_code == Some("NOT_FOUND")));
    assert!(app.services.projects.get_project(app.tenant_id, project.id).await.is_ok());
}

#[tokio::test]
async fn delete_removes_children() {
    let app = TestApp::new().await;
    let first = app.staffed_project(30).await;
    let second = app.create_project(30).await;

    let result = app
        .services
        .batch
        .apply(&app.admin, BatchOperation::Delete, &[first.id, second.id], BatchPayload::default())
        .await
        .unwrap();
    assert_eq!(result.total_succeeded, 2);

    let err = app.services.projects.get_project(app.tenant_id, first.id).await.unwrap_err();
    assert_matches!(err, EngineError::NotFound { .. });
    let orphaned = HistoryItem::find()
        .filter(history_item::Column::ProjectId.eq(first.id))
        .count(&app.db)
        .await
        .unwrap();
    assert_eq!(orphaned, 0);
}

#[tokio::test]
async fn non_admins_cannot_delete() {
    let app = TestApp::new().await;
    let project = app.create_project(30).await;
    let designer = TestApp::actor(&app.designer);

    let result = app
        .services
        .batch
        .apply(&designer, BatchOperation::Delete, &[project.id], BatchPayload::default())
        .await
        .unwrap();
    assert_eq!(result.total_failed, 1);
    assert_eq!(result.results[0].error_code, Some("FORBIDDEN"));
}

#[tokio::test]
async fn missing_payload_fields_fail_the_whole_batch() {
    let app = TestApp::new().await;
    let project = app.create_project(30).await;

    let err = app
        .services
        .batch
        .apply(&app.admin, BatchOperation::UpdateStage, &[project.id], BatchPayload::default())
        .await
        .unwrap_err();
    assert_matches!(err, EngineError::Validation(_));
}
