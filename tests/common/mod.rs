#![allow(dead_code)]

use std::sync::Arc;

use chrono::{Duration, Utc};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};
use uuid::Uuid;

use stagegate::auth::Actor;
use stagegate::engine::checklist::active_checklist;
use stagegate::engine::ScoringPolicy;
use stagegate::entities::enums::{LeadRole, Priority, UserRole};
use stagegate::entities::{project, user};
use stagegate::notifier::BroadcastInvalidationSink;
use stagegate::services::{AppServices, NewProject};

/// One tenant with an admin and a user for each lead slot, on a freshly
/// migrated in-memory SQLite database.
pub struct TestApp {
    pub db: DatabaseConnection,
    pub services: AppServices,
    pub sink: Arc<BroadcastInvalidationSink>,
    pub tenant_id: Uuid,
    pub admin: Actor,
    pub designer: user::Model,
    pub dev_manager: user::Model,
    pub qa_engineer: user::Model,
}

/// A single connection keeps the in-memory database alive and serializes
/// transactions the way row-level locking would.
pub async fn test_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1).sqlx_logging(false);

    let db = Database::connect(options).await.expect("connect to sqlite");
    Migrator::up(&db, None).await.expect("run migrations");
    db
}

pub async fn seed_user(db: &DatabaseConnection, tenant_id: Uuid, role: UserRole, name: &str) -> user::Model {
    let now = Utc::now();
    user::ActiveModel {
        id: Set(Uuid::new_v4()),
        tenant_id: Set(tenant_id),
        email: Set(format!("{}.{}@example.com", name.to_lowercase(), Uuid::new_v4().simple())),
        first_name: Set(Some(name.to_string())),
        last_name: Set(Some("Tester".to_string())),
        role: Set(role),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(db)
    .await
    .expect("seed user")
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_policy(ScoringPolicy::default()).await
    }

    pub async fn with_policy(policy: ScoringPolicy) -> Self {
        let db = test_db().await;
        let tenant_id = Uuid::new_v4();

        let admin = seed_user(&db, tenant_id, UserRole::Admin, "Avery").await;
        let designer = seed_user(&db, tenant_id, UserRole::Designer, "Dana").await;
        let dev_manager = seed_user(&db, tenant_id, UserRole::DevManager, "Devon").await;
        let qa_engineer = seed_user(&db, tenant_id, UserRole::QaEngineer, "Quinn").await;

        let sink = Arc::new(BroadcastInvalidationSink::new(64));
        let services = AppServices::new(db.clone(), sink.clone(), policy);

        Self {
            db,
            services,
            sink,
            tenant_id,
            admin: Actor::from(&admin),
            designer,
            dev_manager,
            qa_engineer,
        }
    }

    pub fn actor(user: &user::Model) -> Actor {
        Actor::from(user)
    }

    pub async fn create_project(&self, deadline_in_days: i64) -> project::Model {
        self.services
            .projects
            .create_project(
                &self.admin,
                NewProject {
                    client_name: "Acme Corp".to_string(),
                    priority: Priority::High,
                    overall_deadline: Utc::now() + Duration::days(deadline_in_days),
                },
            )
            .await
            .expect("create project")
    }

    /// Project with all three leads assigned, still UPCOMING (version 4).
    pub async fn staffed_project(&self, deadline_in_days: i64) -> project::Model {
        let mut project = self.create_project(deadline_in_days).await;
        for (slot, user) in [
            (LeadRole::Designer, &self.designer),
            (LeadRole::DevManager, &self.dev_manager),
            (LeadRole::QaEngineer, &self.qa_engineer),
        ] {
            project = self
                .services
                .lifecycle
                .reassign_lead(&self.admin, project.id, slot, user.id, project.version)
                .await
                .expect("assign lead");
        }
        project
    }

    /// Tick every open item of the active checklist, one guarded write each.
    pub async fn complete_active_checklist(&self, mut project: project::Model) -> project::Model {
        let (_, items) = active_checklist(&project);
        let open: Vec<Uuid> = items.0.iter().filter(|i| !i.completed).map(|i| i.id).collect();
        for item_id in open {
            project = self
                .services
                .checklists
                .toggle_item(&self.admin, project.id, item_id, project.version)
                .await
                .expect("toggle item");
        }
        project
    }

    /// Drive a staffed project forward until it sits in QA.
    pub async fn project_in_qa(&self, deadline_in_days: i64) -> project::Model {
        use stagegate::entities::enums::ProjectStage;

        let project = self.staffed_project(deadline_in_days).await;
        let mut project = self
            .services
            .lifecycle
            .start(&self.admin, project.id, project.version)
            .await
            .expect("start");

        for next in [ProjectStage::Development, ProjectStage::Qa] {
            project = self.complete_active_checklist(project).await;
            project = self
                .services
                .lifecycle
                .advance(&self.admin, project.id, next, project.version)
                .await
                .expect("advance");
        }
        project
    }
}
