pub mod batch;
pub mod checklist;
pub mod history;
pub mod lifecycle;
pub mod notification;
pub mod project;
pub mod scoring;
pub mod user;
pub mod version_guard;

pub use batch::*;
pub use checklist::*;
pub use history::*;
pub use lifecycle::*;
pub use notification::*;
pub use project::*;
pub use scoring::*;
pub use user::*;
pub use version_guard::*;

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::engine::ScoringPolicy;
use crate::notifier::InvalidationSink;

/// Every service wired against one connection pool and invalidation sink.
#[derive(Clone)]
pub struct AppServices {
    pub guard: VersionGuard,
    pub users: UserService,
    pub projects: ProjectService,
    pub lifecycle: LifecycleService,
    pub checklists: ChecklistService,
    pub history: HistoryService,
    pub scores: ScoreService,
    pub batch: BatchService,
    pub notifications: NotificationService,
}

impl AppServices {
    pub fn new(db: DatabaseConnection, sink: Arc<dyn InvalidationSink>, policy: ScoringPolicy) -> Self {
        let guard = VersionGuard::new(db.clone(), sink.clone());
        let users = UserService::new(db.clone());
        let projects = ProjectService::new(db.clone(), sink.clone());
        let lifecycle = LifecycleService::new(guard.clone(), users.clone(), policy);
        let checklists = ChecklistService::new(guard.clone());
        let history = HistoryService::new(db.clone());
        let scores = ScoreService::new(db.clone());
        let batch = BatchService::new(lifecycle.clone(), projects.clone());
        let notifications = NotificationService::new(db, sink);

        Self {
            guard,
            users,
            projects,
            lifecycle,
            checklists,
            history,
            scores,
            batch,
            notifications,
        }
    }
}
