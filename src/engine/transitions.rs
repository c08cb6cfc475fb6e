//! The stage state machine. Each rule validates every precondition before
//! touching the project, so a rejected call leaves the draft untouched.

use chrono::{DateTime, Utc};

use crate::auth::{permissions, Actor};
use crate::engine::checklist::active_checklist;
use crate::engine::scoring::{require_dev_manager, ScoringPolicy};
use crate::engine::stage::{is_legal_edge, next_stage};
use crate::engine::{ScoreDraft, Transition};
use crate::entities::enums::{LeadRole, ProjectStage};
use crate::entities::{project, user};
use crate::error::{EngineError, EngineResult};

pub const MIN_JUSTIFICATION_CHARS: usize = 15;

/// Who is acting, when, and under which scoring policy.
#[derive(Debug, Clone, Copy)]
pub struct TransitionContext<'a> {
    pub actor: &'a Actor,
    pub now: DateTime<Utc>,
    pub policy: &'a ScoringPolicy,
}

/// UPCOMING → DESIGN. Admin only; needs all three leads, no checklist.
pub fn start(project: &mut project::Model, ctx: &TransitionContext<'_>) -> EngineResult<Transition> {
    permissions::require_admin(ctx.actor, "start projects")?;
    if project.stage != ProjectStage::Upcoming {
        return Err(EngineError::validation(format!(
            "illegal stage transition: project is already in {}",
            project.stage.label()
        )));
    }
    advance(project, ProjectStage::Design, ctx)
}

/// Move to the canonical successor of the current stage.
pub fn advance(
    project: &mut project::Model,
    next: ProjectStage,
    ctx: &TransitionContext<'_>,
) -> EngineResult<Transition> {
    permissions::require_advance(ctx.actor, project)?;
    forward(project, next, ctx)
}

/// QA outcome. A pass continues to ADMIN_REVIEW; a rejection sends the
/// project back to DEVELOPMENT with a fresh dev checklist. A Dev Lead is
/// required whenever the outcome is scored, so a repeat pass without one
/// goes through.
pub fn qa_feedback(
    project: &mut project::Model,
    passed: bool,
    ctx: &TransitionContext<'_>,
) -> EngineResult<Transition> {
    if project.stage != ProjectStage::Qa {
        return Err(EngineError::validation(
            "QA feedback can only be recorded while the project is in QA",
        ));
    }
    permissions::require_qa_feedback(ctx.actor, project)?;

    if passed {
        return forward(project, ProjectStage::AdminReview, ctx);
    }

    let dev_manager_id = require_dev_manager(project)?;

    // Deep copy taken before anything else changes.
    let snapshot = project.qa_checklist.clone();
    project.stage = ProjectStage::Development;
    project.qa_fail_count += 1;
    project.dev_checklist.reset();

    Ok(Transition::new()
        .record_rejection(
            ProjectStage::Development,
            format!("QA Rejected (rejection #{})", project.qa_fail_count),
            snapshot,
        )
        .score([ctx.policy.qa_rejection(dev_manager_id)])
        .notify_user(
            dev_manager_id,
            format!(
                "QA rejected {}; the development checklist has been reset",
                project.client_name
            ),
        )
        .affects_stats())
}

/// Admin override straight to COMPLETED. Skips the checklist gates but
/// scores the delivery like any other completion.
pub fn archive(project: &mut project::Model, ctx: &TransitionContext<'_>) -> EngineResult<Transition> {
    permissions::require_admin(ctx.actor, "archive projects")?;
    if project.stage == ProjectStage::Completed {
        return Err(EngineError::validation("project is already completed"));
    }

    let scores = enter_completed(project, ctx)?;

    Ok(Transition::new()
        .record(ProjectStage::Completed, "Project Archived")
        .score(scores)
        .affects_stats())
}

/// COMPLETED → ADMIN_REVIEW.
pub fn unarchive(project: &mut project::Model, ctx: &TransitionContext<'_>) -> EngineResult<Transition> {
    permissions::require_admin(ctx.actor, "restore archived projects")?;
    if project.stage != ProjectStage::Completed {
        return Err(EngineError::validation("only completed projects can be restored"));
    }

    project.stage = ProjectStage::AdminReview;
    project.completed_at = None;

    Ok(Transition::new()
        .record(ProjectStage::AdminReview, "Project Restored from Archive")
        .affects_stats())
}

/// Put `assignee` in a lead slot. The caller resolves the user within the
/// project's tenant.
pub fn reassign_lead(
    project: &mut project::Model,
    slot: LeadRole,
    assignee: &user::Model,
    ctx: &TransitionContext<'_>,
) -> EngineResult<Transition> {
    permissions::require_admin(ctx.actor, "reassign project leads")?;
    if assignee.tenant_id != project.tenant_id {
        return Err(EngineError::user_not_found(assignee.id));
    }
    if assignee.role != slot.required_user_role() {
        return Err(EngineError::validation(format!(
            "{} cannot fill the {} slot (role is {})",
            assignee.display_name(),
            slot.label(),
            assignee.role.as_str()
        )));
    }

    match slot {
        LeadRole::Designer => project.assigned_designer_id = Some(assignee.id),
        LeadRole::DevManager => project.assigned_dev_manager_id = Some(assignee.id),
        LeadRole::QaEngineer => project.assigned_qa_id = Some(assignee.id),
    }

    Ok(Transition::new()
        .record(
            project.stage,
            format!("{} assigned: {}", slot.label(), assignee.display_name()),
        )
        .notify_user(
            assignee.id,
            format!("You have been assigned as {} on {}", slot.label(), project.client_name),
        ))
}

/// Move `current_deadline`. The `overall_deadline` baseline never changes.
pub fn change_deadline(
    project: &mut project::Model,
    new_deadline: DateTime<Utc>,
    justification: &str,
    ctx: &TransitionContext<'_>,
) -> EngineResult<Transition> {
    permissions::require_admin(ctx.actor, "change deadlines")?;

    let justification = justification.trim();
    if justification.chars().count() < MIN_JUSTIFICATION_CHARS {
        return Err(EngineError::validation(format!(
            "deadline changes need a justification of at least {} characters",
            MIN_JUSTIFICATION_CHARS
        )));
    }
    if new_deadline <= ctx.now {
        return Err(EngineError::validation("new deadline must be in the future"));
    }

    let previous = project.current_deadline.with_timezone(&Utc);
    project.current_deadline = new_deadline.into();

    Ok(Transition::new()
        .record(
            project.stage,
            format!(
                "Deadline changed from {} to {}: {}",
                previous.format("%Y-%m-%d"),
                new_deadline.format("%Y-%m-%d"),
                justification
            ),
        )
        .affects_stats())
}

/// Shared forward step used by `advance` and a QA pass. Permissions are
/// checked by the caller.
fn forward(
    project: &mut project::Model,
    next: ProjectStage,
    ctx: &TransitionContext<'_>,
) -> EngineResult<Transition> {
    let from = project.stage;
    match next_stage(from) {
        Some(canonical) if canonical == next => {}
        _ if is_legal_edge(from, next) => {
            return Err(EngineError::validation(
                "illegal stage transition: use QA feedback to send a project back to Development",
            ));
        }
        Some(canonical) => {
            return Err(EngineError::validation(format!(
                "illegal stage transition from {} to {}; the next stage is {}",
                from.label(),
                next.label(),
                canonical.label()
            )));
        }
        None => {
            return Err(EngineError::validation(format!(
                "illegal stage transition: {} has no next stage",
                from.label()
            )));
        }
    }

    if from == ProjectStage::Upcoming {
        let staffing: &project::Model = project;
        let unfilled: Vec<&str> = [LeadRole::Designer, LeadRole::DevManager, LeadRole::QaEngineer]
            .into_iter()
            .filter(|slot| permissions::lead_id(staffing, *slot).is_none())
            .map(|slot| slot.label())
            .collect();
        if !unfilled.is_empty() {
            return Err(EngineError::validation(format!(
                "lead role unfilled: assign {} before starting",
                unfilled.join(", ")
            )));
        }
    } else {
        let (_, items) = active_checklist(project);
        if !items.is_complete() {
            return Err(EngineError::validation(format!(
                "checklist incomplete: {} of {} {} items done",
                items.completed_count(),
                items.0.len(),
                from.label()
            )));
        }
    }

    let mut scores = Vec::new();
    if from == ProjectStage::Qa && project.qa_fail_count == 0 {
        let dev_manager_id = require_dev_manager(project)?;
        scores.extend(ctx.policy.qa_pass(dev_manager_id, project.qa_fail_count));
    }
    if next == ProjectStage::Completed {
        scores.extend(enter_completed(project, ctx)?);
    }

    project.stage = next;

    let action = match (from, next) {
        (ProjectStage::Upcoming, _) => "Project Started".to_string(),
        (ProjectStage::Qa, _) => "QA Passed".to_string(),
        (_, ProjectStage::Completed) => "Project Completed".to_string(),
        (_, stage) => format!("Moved to {}", stage.label()),
    };

    let mut transition = Transition::new()
        .record(next, action)
        .score(scores)
        .affects_stats();

    let next_lead = match LeadRole::for_stage(next) {
        Some(slot) => permissions::lead_id(project, slot),
        None => None,
    };
    if let Some(lead_id) = next_lead.filter(|id| *id != ctx.actor.id) {
        transition = transition.notify_user(
            lead_id,
            format!("{} is ready for {}", project.client_name, next.label()),
        );
    }

    Ok(transition)
}

/// Enter COMPLETED: credit the Dev Lead against the original deadline and
/// stamp `completed_at`. Nothing is touched when no Dev Lead is assigned.
fn enter_completed(project: &mut project::Model, ctx: &TransitionContext<'_>) -> EngineResult<Vec<ScoreDraft>> {
    let dev_manager_id = require_dev_manager(project)?;
    let scores = ctx.policy.completion(
        dev_manager_id,
        project.overall_deadline.with_timezone(&Utc),
        ctx.now,
    );
    project.stage = ProjectStage::Completed;
    project.completed_at = Some(ctx.now.into());
    Ok(scores)
}
