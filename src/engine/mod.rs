//! Project lifecycle rules. Everything here is pure: a rule takes the
//! project as read inside the version guard, mutates it in place and
//! returns the [`Transition`] describing what must be appended alongside
//! the new row. Persisting is the guard's job.

pub mod checklist;
pub mod scoring;
pub mod stage;
pub mod transitions;

use std::collections::BTreeSet;

use uuid::Uuid;

use crate::entities::enums::{ProjectStage, ScoreReason};
use crate::entities::project::Checklist;
use crate::notifier::InvalidateKey;

pub use checklist::ChecklistKey;
pub use scoring::ScoringPolicy;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryDraft {
    pub stage: ProjectStage,
    pub action: String,
    pub rejection_snapshot: Option<Checklist>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreDraft {
    pub user_id: Uuid,
    pub points: i32,
    pub reason: ScoreReason,
}

impl ScoreDraft {
    pub fn new(user_id: Uuid, points: i32, reason: ScoreReason) -> Self {
        Self { user_id, points, reason }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeDraft {
    pub user_id: Uuid,
    pub message: String,
}

/// Side effects of one committed mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub history: Vec<HistoryDraft>,
    pub scores: Vec<ScoreDraft>,
    pub notices: Vec<NoticeDraft>,
    pub invalidate: BTreeSet<InvalidateKey>,
}

impl Default for Transition {
    fn default() -> Self {
        Self::new()
    }
}

impl Transition {
    /// Every committed mutation at least invalidates the project views.
    pub fn new() -> Self {
        Self {
            history: Vec::new(),
            scores: Vec::new(),
            notices: Vec::new(),
            invalidate: BTreeSet::from([InvalidateKey::Projects]),
        }
    }

    pub fn record(mut self, stage: ProjectStage, action: impl Into<String>) -> Self {
        self.history.push(HistoryDraft {
            stage,
            action: action.into(),
            rejection_snapshot: None,
        });
        self
    }

    pub fn record_rejection(
        mut self,
        stage: ProjectStage,
        action: impl Into<String>,
        snapshot: Checklist,
    ) -> Self {
        self.history.push(HistoryDraft {
            stage,
            action: action.into(),
            rejection_snapshot: Some(snapshot),
        });
        self
    }

    pub fn score(mut self, entries: impl IntoIterator<Item = ScoreDraft>) -> Self {
        self.scores.extend(entries);
        if !self.scores.is_empty() {
            self.invalidate.insert(InvalidateKey::Rankings);
        }
        self
    }

    pub fn notify_user(mut self, user_id: Uuid, message: impl Into<String>) -> Self {
        self.notices.push(NoticeDraft {
            user_id,
            message: message.into(),
        });
        self.invalidate.insert(InvalidateKey::Notifications);
        self
    }

    /// Stage or deadline changed, so aggregate counters are stale too.
    pub fn affects_stats(mut self) -> Self {
        self.invalidate.insert(InvalidateKey::ProjectStats);
        self
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    use crate::auth::Actor;
    use crate::entities::enums::{Priority, ProjectStage, UserRole};
    use crate::entities::project;

    pub fn actor(role: UserRole) -> Actor {
        Actor {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            role,
        }
    }

    /// A project sitting in `stage` with template checklists, no leads and a
    /// deadline ten days out.
    pub fn project_in(stage: ProjectStage) -> project::Model {
        let now = Utc::now();
        let deadline = now + Duration::days(10);
        let [design, dev, qa, fin] = super::checklist::templates();
        project::Model {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            client_name: "Acme Corp".to_string(),
            priority: Priority::High,
            stage,
            overall_deadline: deadline.into(),
            current_deadline: deadline.into(),
            completed_at: None,
            assigned_designer_id: None,
            assigned_dev_manager_id: None,
            assigned_qa_id: None,
            design_checklist: design,
            dev_checklist: dev,
            qa_checklist: qa,
            final_checklist: fin,
            qa_fail_count: 0,
            version: 1,
            created_by: Uuid::new_v4(),
            created_at: now.into(),
            updated_at: now.into(),
        }
    }
}
