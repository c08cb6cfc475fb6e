mod common;

use assert_matches::assert_matches;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use uuid::Uuid;

use common::TestApp;
use stagegate::auth::Actor;
use stagegate::engine::Transition;
use stagegate::entities::enums::{LeadRole, ProjectStage, UserRole};
use stagegate::entities::{history_item, prelude::*, user_notification};
use stagegate::error::EngineError;
use stagegate::notifier::InvalidateKey;

async fn history_count(app: &TestApp, project_id: Uuid) -> u64 {
    HistoryItem::find()
        .filter(history_item::Column::ProjectId.eq(project_id))
        .count(&app.db)
        .await
        .unwrap()
}

#[tokio::test]
async fn new_project_starts_at_version_one() {
    let app = TestApp::new().await;
    let project = app.create_project(30).await;

    assert_eq!(project.version, 1);
    assert_eq!(project.stage, ProjectStage::Upcoming);
    assert_eq!(project.current_deadline, project.overall_deadline);
    assert_eq!(project.completed_at, None);
    assert_eq!(history_count(&app, project.id).await, 0);
}

#[tokio::test]
async fn each_committed_call_bumps_version_by_one() {
    let app = TestApp::new().await;

    let project = app.staffed_project(30).await;
    assert_eq!(project.version, 4);

    let project = app
        .services
        .lifecycle
        .start(&app.admin, project.id, project.version)
        .await
        .unwrap();
    assert_eq!(project.version, 5);
    assert_eq!(project.stage, ProjectStage::Design);

    let project = app.complete_active_checklist(project).await;
    assert_eq!(project.version, 10);

    let stored = app.services.projects.get_project(app.tenant_id, project.id).await.unwrap();
    assert_eq!(stored.version, 10);
}

#[tokio::test]
async fn stale_version_is_rejected_without_side_effects() {
    let app = TestApp::new().await;
    let project = app.staffed_project(30).await;
    let history_before = history_count(&app, project.id).await;
    let mut events = app.sink.subscribe();

    let err = app
        .services
        .lifecycle
        .start(&app.admin, project.id, project.version - 1)
        .await
        .unwrap_err();

    let stored = app.services.projects.get_project(app.tenant_id, project.id).await.unwrap();
    assert_matches!(&err, EngineError::Conflict(conflict) => {
        assert_eq!(conflict.current_version, 4);
        assert_eq!(conflict.expected_version, 3);
        assert_eq!(conflict.updated_at, stored.updated_at.with_timezone(&chrono::Utc));
    });
    assert_eq!(err.code(), "CONFLICT");

    assert_eq!(stored.version, 4);
    assert_eq!(stored.stage, ProjectStage::Upcoming);
    assert_eq!(history_count(&app, project.id).await, history_before);
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn concurrent_writers_with_same_version_have_one_winner() {
    let app = TestApp::new().await;
    let project = app.create_project(30).await;
    let designer = app.designer.id;
    let qa = app.qa_engineer.id;

    let lifecycle = app.services.lifecycle.clone();
    let (first, second) = tokio::join!(
        lifecycle.reassign_lead(&app.admin, project.id, LeadRole::Designer, designer, 1),
        lifecycle.reassign_lead(&app.admin, project.id, LeadRole::QaEngineer, qa, 1),
    );

    let outcomes = [first.is_ok(), second.is_ok()];
    assert_eq!(outcomes.iter().filter(|ok| **ok).count(), 1);
    let loser = if first.is_ok() { second } else { first };
    assert_matches!(loser, Err(EngineError::Conflict(_)));

    let stored = app.services.projects.get_project(app.tenant_id, project.id).await.unwrap();
    assert_eq!(stored.version, 2);
    let assigned = [stored.assigned_designer_id, stored.assigned_qa_id];
    assert_eq!(assigned.iter().filter(|id| id.is_some()).count(), 1);
    assert_eq!(history_count(&app, project.id).await, 1);
}

#[tokio::test]
async fn validation_failure_commits_nothing() {
    let app = TestApp::new().await;
    let project = app.create_project(30).await;

    let err = app
        .services
        .lifecycle
        .start(&app.admin, project.id, project.version)
        .await
        .unwrap_err();

    assert_matches!(err, EngineError::Validation(msg) if msg.contains("lead role unfilled"));
    let stored = app.services.projects.get_project(app.tenant_id, project.id).await.unwrap();
    assert_eq!(stored.version, 1);
}

#[tokio::test]
async fn mutator_errors_roll_back_the_transaction() {
    let app = TestApp::new().await;
    let project = app.create_project(30).await;

    let err = app
        .services
        .guard
        .apply_if_current(&app.admin, project.id, 1, |draft| {
            draft.client_name = "Changed".to_string();
            Err::<Transition, _>(EngineError::validation("nope"))
        })
        .await
        .unwrap_err();

    assert_matches!(err, EngineError::Validation(_));
    let stored = app.services.projects.get_project(app.tenant_id, project.id).await.unwrap();
    assert_eq!(stored.client_name, "Acme Corp");
    assert_eq!(stored.version, 1);
}

#[tokio::test]
async fn other_tenants_cannot_see_or_write_projects() {
    let app = TestApp::new().await;
    let project = app.create_project(30).await;
    let outsider = Actor {
        id: app.admin.id,
        tenant_id: Uuid::new_v4(),
        role: UserRole::Admin,
    };

    let err = app
        .services
        .lifecycle
        .archive(&outsider, project.id, 1)
        .await
        .unwrap_err();
    assert_matches!(err, EngineError::NotFound { entity: "Project", .. });

    let err = app.services.projects.get_project(outsider.tenant_id, project.id).await.unwrap_err();
    assert_eq!(err.code(), "NOT_FOUND");
}

#[tokio::test]
async fn committed_writes_emit_invalidation_keys() {
    let app = TestApp::new().await;
    let project = app.create_project(30).await;
    let mut events = app.sink.subscribe();

    app.services
        .lifecycle
        .reassign_lead(&app.admin, project.id, LeadRole::Designer, app.designer.id, 1)
        .await
        .unwrap();

    let event = events.recv().await.unwrap();
    assert_eq!(event.tenant_id, app.tenant_id);
    assert!(event.keys.contains(&InvalidateKey::Projects));
    assert!(event.keys.contains(&InvalidateKey::Notifications));
    assert!(!event.keys.contains(&InvalidateKey::Rankings));

    let notices = UserNotification::find()
        .filter(user_notification::Column::UserId.eq(app.designer.id))
        .count(&app.db)
        .await
        .unwrap();
    assert_eq!(notices, 1);
}
