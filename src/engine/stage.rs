//! The stage graph. Forward chain:
//! UPCOMING → DESIGN → DEVELOPMENT → QA → ADMIN_REVIEW → COMPLETED,
//! plus the single backward edge QA → DEVELOPMENT taken on rejection.

use crate::entities::enums::ProjectStage;

/// Canonical forward successor, if the stage has one.
pub fn next_stage(stage: ProjectStage) -> Option<ProjectStage> {
    match stage {
        ProjectStage::Upcoming => Some(ProjectStage::Design),
        ProjectStage::Design => Some(ProjectStage::Development),
        ProjectStage::Development => Some(ProjectStage::Qa),
        ProjectStage::Qa => Some(ProjectStage::AdminReview),
        ProjectStage::AdminReview => Some(ProjectStage::Completed),
        // Legacy hand-off stages are not part of the graph.
        ProjectStage::SendToClient | ProjectStage::SentToClient => None,
        ProjectStage::Completed => None,
    }
}

pub fn is_legal_edge(from: ProjectStage, to: ProjectStage) -> bool {
    next_stage(from) == Some(to) || (from == ProjectStage::Qa && to == ProjectStage::Development)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn forward_chain_reaches_completed() {
        let mut stage = ProjectStage::Upcoming;
        let mut visited = vec![stage];
        while let Some(next) = next_stage(stage) {
            stage = next;
            visited.push(stage);
        }
        assert_eq!(
            visited,
            vec![
                ProjectStage::Upcoming,
                ProjectStage::Design,
                ProjectStage::Development,
                ProjectStage::Qa,
                ProjectStage::AdminReview,
                ProjectStage::Completed,
            ]
        );
    }

    #[test]
    fn only_six_edges_are_legal() {
        let legal: Vec<_> = ProjectStage::iter()
            .flat_map(|from| ProjectStage::iter().map(move |to| (from, to)))
            .filter(|(from, to)| is_legal_edge(*from, *to))
            .collect();

        assert_eq!(legal.len(), 6);
        assert!(legal.contains(&(ProjectStage::Qa, ProjectStage::Development)));
        assert!(!legal.contains(&(ProjectStage::Development, ProjectStage::Design)));
    }
}
