//! Role-based checks for lifecycle mutations. These run inside the engine,
//! not the client, so every transport gets the same rules.

use uuid::Uuid;

use crate::auth::Actor;
use crate::entities::enums::{LeadRole, ProjectStage};
use crate::entities::project;
use crate::error::{EngineError, EngineResult};

/// User currently occupying `slot` on `project`.
pub fn lead_id(project: &project::Model, slot: LeadRole) -> Option<Uuid> {
    match slot {
        LeadRole::Designer => project.assigned_designer_id,
        LeadRole::DevManager => project.assigned_dev_manager_id,
        LeadRole::QaEngineer => project.assigned_qa_id,
    }
}

/// True when `actor` is the lead assigned to the slot that owns the
/// project's current stage (Designer in DESIGN, Dev Lead in DEVELOPMENT,
/// QA Engineer in QA).
pub fn is_current_stage_lead(actor: &Actor, project: &project::Model) -> bool {
    LeadRole::for_stage(project.stage)
        .filter(|slot| actor.role == slot.required_user_role())
        .and_then(|slot| lead_id(project, slot))
        .is_some_and(|id| id == actor.id)
}

pub fn require_admin(actor: &Actor, action: &str) -> EngineResult<()> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(EngineError::permission(format!("only an admin can {}", action)))
    }
}

/// Checklist toggles: admins at any stage, otherwise only the current
/// stage lead.
pub fn require_checklist_toggle(actor: &Actor, project: &project::Model) -> EngineResult<()> {
    if actor.is_admin() || is_current_stage_lead(actor, project) {
        return Ok(());
    }
    Err(EngineError::permission(format!(
        "checklist for the {} stage can only be updated by its lead or an admin",
        project.stage.label()
    )))
}

/// Stage advances out of DESIGN/DEVELOPMENT/QA may be driven by the stage
/// lead. Leaving UPCOMING or ADMIN_REVIEW is reserved for admins.
pub fn require_advance(actor: &Actor, project: &project::Model) -> EngineResult<()> {
    if actor.is_admin() {
        return Ok(());
    }
    match project.stage {
        ProjectStage::Design | ProjectStage::Development | ProjectStage::Qa
            if is_current_stage_lead(actor, project) =>
        {
            Ok(())
        }
        stage => Err(EngineError::permission(format!(
            "you cannot advance a project out of the {} stage",
            stage.label()
        ))),
    }
}

/// QA outcomes come from an admin or the assigned QA engineer.
pub fn require_qa_feedback(actor: &Actor, project: &project::Model) -> EngineResult<()> {
    let is_assigned_qa = project.assigned_qa_id == Some(actor.id)
        && actor.role == LeadRole::QaEngineer.required_user_role();
    if actor.is_admin() || is_assigned_qa {
        Ok(())
    } else {
        Err(EngineError::permission(
            "only the assigned QA engineer or an admin can record QA feedback",
        ))
    }
}
