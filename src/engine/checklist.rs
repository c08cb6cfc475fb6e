//! Checklist rules: which list is active for a stage, the completion gate,
//! stage templates, and the admin/lead edit operations.

use async_graphql::Enum;
use uuid::Uuid;

use crate::auth::{permissions, Actor};
use crate::engine::Transition;
use crate::entities::enums::ProjectStage;
use crate::entities::project::{self, Checklist, ChecklistItem};
use crate::error::{EngineError, EngineResult};

const DESIGN_TEMPLATE: &[&str] = &[
    "Wireframes approved by client",
    "Visual design finalized",
    "Responsive layouts prepared",
    "Design assets exported",
    "Design handoff reviewed with Dev Lead",
];

const DEV_TEMPLATE: &[&str] = &[
    "Feature implementation complete",
    "Code reviewed",
    "Unit tests passing",
    "Deployed to staging",
];

const QA_TEMPLATE: &[&str] = &[
    "Functional test pass",
    "Cross-browser and device check",
    "Regression suite green",
    "No open critical defects",
];

const FINAL_TEMPLATE: &[&str] = &[
    "Client sign-off received",
    "Production deployment verified",
    "Handover documentation delivered",
];

#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug)]
#[graphql(name = "ChecklistKey")]
pub enum ChecklistKey {
    #[graphql(name = "DESIGN_CHECKLIST")]
    Design,
    #[graphql(name = "DEV_CHECKLIST")]
    Dev,
    #[graphql(name = "QA_CHECKLIST")]
    Qa,
    #[graphql(name = "FINAL_CHECKLIST")]
    Final,
}

impl ChecklistKey {
    /// DESIGN, DEVELOPMENT and QA own their lists; every other stage,
    /// ADMIN_REVIEW included, works on the final list.
    pub fn for_stage(stage: ProjectStage) -> Self {
        match stage {
            ProjectStage::Design => ChecklistKey::Design,
            ProjectStage::Development => ChecklistKey::Dev,
            ProjectStage::Qa => ChecklistKey::Qa,
            _ => ChecklistKey::Final,
        }
    }
}

impl Checklist {
    pub fn from_labels(labels: &[&str]) -> Self {
        Checklist(
            labels
                .iter()
                .map(|label| ChecklistItem {
                    id: Uuid::new_v4(),
                    label: (*label).to_string(),
                    completed: false,
                })
                .collect(),
        )
    }

    /// Non-empty and every item completed.
    pub fn is_complete(&self) -> bool {
        !self.0.is_empty() && self.0.iter().all(|item| item.completed)
    }

    pub fn completed_count(&self) -> usize {
        self.0.iter().filter(|item| item.completed).count()
    }

    pub fn reset(&mut self) {
        for item in &mut self.0 {
            item.completed = false;
        }
    }

    fn find_mut(&mut self, item_id: Uuid) -> Option<&mut ChecklistItem> {
        self.0.iter_mut().find(|item| item.id == item_id)
    }
}

/// Fresh lists for a new project, all items incomplete.
pub fn templates() -> [Checklist; 4] {
    [
        Checklist::from_labels(DESIGN_TEMPLATE),
        Checklist::from_labels(DEV_TEMPLATE),
        Checklist::from_labels(QA_TEMPLATE),
        Checklist::from_labels(FINAL_TEMPLATE),
    ]
}

pub fn checklist(project: &project::Model, key: ChecklistKey) -> &Checklist {
    match key {
        ChecklistKey::Design => &project.design_checklist,
        ChecklistKey::Dev => &project.dev_checklist,
        ChecklistKey::Qa => &project.qa_checklist,
        ChecklistKey::Final => &project.final_checklist,
    }
}

fn checklist_mut(project: &mut project::Model, key: ChecklistKey) -> &mut Checklist {
    match key {
        ChecklistKey::Design => &mut project.design_checklist,
        ChecklistKey::Dev => &mut project.dev_checklist,
        ChecklistKey::Qa => &mut project.qa_checklist,
        ChecklistKey::Final => &mut project.final_checklist,
    }
}

pub fn active_checklist(project: &project::Model) -> (ChecklistKey, &Checklist) {
    let key = ChecklistKey::for_stage(project.stage);
    (key, checklist(project, key))
}

/// Flip one item of the active checklist.
pub fn toggle_item(project: &mut project::Model, actor: &Actor, item_id: Uuid) -> EngineResult<Transition> {
    permissions::require_checklist_toggle(actor, project)?;

    let key = ChecklistKey::for_stage(project.stage);
    let item = checklist_mut(project, key)
        .find_mut(item_id)
        .ok_or_else(|| EngineError::validation("checklist item not found in the active checklist"))?;
    item.completed = !item.completed;

    Ok(Transition::new())
}

pub fn add_item(project: &mut project::Model, actor: &Actor, label: &str) -> EngineResult<Transition> {
    require_custom_item_edit(project, actor)?;

    let label = label.trim();
    if label.is_empty() {
        return Err(EngineError::validation("checklist item label cannot be empty"));
    }

    let key = ChecklistKey::for_stage(project.stage);
    checklist_mut(project, key).0.push(ChecklistItem {
        id: Uuid::new_v4(),
        label: label.to_string(),
        completed: false,
    });

    Ok(Transition::new())
}

pub fn remove_item(project: &mut project::Model, actor: &Actor, item_id: Uuid) -> EngineResult<Transition> {
    require_custom_item_edit(project, actor)?;

    let key = ChecklistKey::for_stage(project.stage);
    let items = &mut checklist_mut(project, key).0;
    let before = items.len();
    items.retain(|item| item.id != item_id);
    if items.len() == before {
        return Err(EngineError::validation("checklist item not found in the active checklist"));
    }

    Ok(Transition::new())
}

fn require_custom_item_edit(project: &project::Model, actor: &Actor) -> EngineResult<()> {
    permissions::require_admin(actor, "edit checklist items")?;
    if project.stage == ProjectStage::Upcoming {
        return Err(EngineError::validation(
            "checklist items cannot be edited before the project has started",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing::{actor, project_in};
    use crate::entities::enums::UserRole;

    #[test]
    fn empty_checklist_is_never_complete() {
        assert!(!Checklist::default().is_complete());
    }

    #[test]
    fn completion_gate_flips_on_last_item() {
        let mut list = Checklist::from_labels(&["a", "b"]);
        list.0[0].completed = true;
        assert!(!list.is_complete());
        list.0[1].completed = true;
        assert!(list.is_complete());
    }

    #[test]
    fn admin_review_uses_final_checklist() {
        let project = project_in(ProjectStage::AdminReview);
        let (key, items) = active_checklist(&project);
        assert_eq!(key, ChecklistKey::Final);
        assert_eq!(items, &project.final_checklist);
    }

    #[test]
    fn toggle_flips_only_the_active_list() {
        let admin = actor(UserRole::Admin);
        let mut project = project_in(ProjectStage::Development);
        let item_id = project.dev_checklist.0[0].id;
        let design_before = project.design_checklist.clone();

        toggle_item(&mut project, &admin, item_id).unwrap();
        assert!(project.dev_checklist.0[0].completed);
        toggle_item(&mut project, &admin, item_id).unwrap();
        assert!(!project.dev_checklist.0[0].completed);
        assert_eq!(project.design_checklist, design_before);
    }

    #[test]
    fn toggle_rejects_items_of_inactive_lists() {
        let admin = actor(UserRole::Admin);
        let mut project = project_in(ProjectStage::Development);
        let design_item = project.design_checklist.0[0].id;

        let err = toggle_item(&mut project, &admin, design_item).unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[test]
    fn custom_items_are_blocked_while_upcoming() {
        let admin = actor(UserRole::Admin);
        let mut project = project_in(ProjectStage::Upcoming);

        assert!(matches!(
            add_item(&mut project, &admin, "Extra review"),
            Err(EngineError::Validation(_))
        ));

        project.stage = ProjectStage::Qa;
        add_item(&mut project, &admin, "Extra review").unwrap();
        assert_eq!(project.qa_checklist.0.last().map(|i| i.label.as_str()), Some("Extra review"));
    }

    #[test]
    fn leads_cannot_add_custom_items() {
        let designer = actor(UserRole::Designer);
        let mut project = project_in(ProjectStage::Design);
        project.assigned_designer_id = Some(designer.id);

        assert!(matches!(
            add_item(&mut project, &designer, "Moodboard"),
            Err(EngineError::Permission(_))
        ));
    }

    #[test]
    fn remove_drops_the_item() {
        let admin = actor(UserRole::Admin);
        let mut project = project_in(ProjectStage::Design);
        let item_id = project.design_checklist.0[2].id;

        remove_item(&mut project, &admin, item_id).unwrap();
        assert_eq!(project.design_checklist.0.len(), DESIGN_TEMPLATE.len() - 1);
        assert!(remove_item(&mut project, &admin, item_id).is_err());
    }
}
