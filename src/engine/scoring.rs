//! Score ledger policy. Entries are only ever derived here, as a side effect
//! of a transition; nothing else writes to the ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::ScoreDraft;
use crate::entities::enums::ScoreReason;
use crate::entities::project;
use crate::error::{EngineError, EngineResult};

const SECONDS_PER_DAY: i64 = 86_400;

/// Point amounts. Penalties are configured as positive numbers and
/// recorded as negative entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringPolicy {
    pub delivery: i32,
    pub on_time: i32,
    pub early_per_day: i32,
    pub qa_first_pass: i32,
    pub qa_rejection: i32,
    pub deadline_missed: i32,
    pub delay_per_day: i32,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            delivery: 10,
            on_time: 5,
            early_per_day: 2,
            qa_first_pass: 5,
            qa_rejection: 3,
            deadline_missed: 10,
            delay_per_day: 2,
        }
    }
}

/// Scored outcomes are credited to the Dev Lead. Refusing the transition
/// keeps rewards and penalties from being orphaned.
pub fn require_dev_manager(project: &project::Model) -> EngineResult<Uuid> {
    project
        .assigned_dev_manager_id
        .ok_or_else(|| EngineError::validation("assign a Dev Lead before recording outcomes"))
}

impl ScoringPolicy {
    /// Entries for a project reaching COMPLETED at `completed_at`, measured
    /// against the immutable `overall_deadline`.
    pub fn completion(
        &self,
        dev_manager_id: Uuid,
        overall_deadline: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    ) -> Vec<ScoreDraft> {
        let mut entries = vec![ScoreDraft::new(dev_manager_id, self.delivery, ScoreReason::Delivery)];

        if completed_at <= overall_deadline {
            entries.push(ScoreDraft::new(dev_manager_id, self.on_time, ScoreReason::OnTime));
            let days_early = (overall_deadline - completed_at).num_days();
            if days_early > 0 {
                entries.push(ScoreDraft::new(
                    dev_manager_id,
                    per_day(self.early_per_day, days_early),
                    ScoreReason::EarlyDelivery,
                ));
            }
        } else {
            // Any part of a day late counts as a full day.
            let seconds_late = (completed_at - overall_deadline).num_seconds();
            let days_late = ((seconds_late + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY).max(1);
            entries.push(ScoreDraft::new(
                dev_manager_id,
                self.deadline_missed.saturating_neg(),
                ScoreReason::DeadlineMissed,
            ));
            entries.push(ScoreDraft::new(
                dev_manager_id,
                per_day(self.delay_per_day, days_late).saturating_neg(),
                ScoreReason::DelayPenalty,
            ));
        }

        entries
    }

    /// Bonus for passing QA without any prior rejection.
    pub fn qa_pass(&self, dev_manager_id: Uuid, qa_fail_count: i32) -> Vec<ScoreDraft> {
        if qa_fail_count == 0 {
            vec![ScoreDraft::new(dev_manager_id, self.qa_first_pass, ScoreReason::QaFirstPass)]
        } else {
            Vec::new()
        }
    }

    pub fn qa_rejection(&self, dev_manager_id: Uuid) -> ScoreDraft {
        ScoreDraft::new(dev_manager_id, self.qa_rejection.saturating_neg(), ScoreReason::QaRejection)
    }
}

/// `points * days`, clamped to the i32 range.
fn per_day(points: i32, days: i64) -> i32 {
    points.saturating_mul(i32::try_from(days).unwrap_or(i32::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn deadline() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 20, 17, 0, 0).unwrap()
    }

    fn total(entries: &[ScoreDraft]) -> i32 {
        entries.iter().map(|e| e.points).sum()
    }

    #[test]
    fn early_completion_earns_per_day_bonus() {
        let policy = ScoringPolicy::default();
        let dev = Uuid::new_v4();

        let entries = policy.completion(dev, deadline(), deadline() - Duration::days(3) - Duration::hours(2));

        let reasons: Vec<_> = entries.iter().map(|e| e.reason).collect();
        assert_eq!(
            reasons,
            vec![ScoreReason::Delivery, ScoreReason::OnTime, ScoreReason::EarlyDelivery]
        );
        assert_eq!(total(&entries), 10 + 5 + 2 * 3);
        assert!(entries.iter().all(|e| e.user_id == dev));
    }

    #[test]
    fn same_day_completion_is_on_time_without_early_bonus() {
        let policy = ScoringPolicy::default();
        let entries = policy.completion(Uuid::new_v4(), deadline(), deadline() - Duration::hours(5));

        assert_eq!(total(&entries), 15);
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn late_completion_rounds_partial_days_up() {
        let policy = ScoringPolicy::default();
        let entries = policy.completion(
            Uuid::new_v4(),
            deadline(),
            deadline() + Duration::days(2) + Duration::minutes(1),
        );

        let delay = entries
            .iter()
            .find(|e| e.reason == ScoreReason::DelayPenalty)
            .unwrap();
        assert_eq!(delay.points, -2 * 3);
        assert_eq!(total(&entries), 10 - 10 - 6);
    }

    #[test]
    fn first_pass_bonus_only_without_rejections() {
        let policy = ScoringPolicy::default();
        let dev = Uuid::new_v4();

        assert_eq!(total(&policy.qa_pass(dev, 0)), 5);
        assert!(policy.qa_pass(dev, 1).is_empty());
        assert_eq!(policy.qa_rejection(dev).points, -3);
    }

    #[test]
    fn large_amounts_saturate() {
        let policy = ScoringPolicy {
            early_per_day: i32::MAX / 2,
            delay_per_day: i32::MAX / 2,
            deadline_missed: i32::MIN,
            ..ScoringPolicy::default()
        };
        let dev = Uuid::new_v4();

        let early = policy.completion(dev, deadline(), deadline() - Duration::days(4000));
        let bonus = early.iter().find(|e| e.reason == ScoreReason::EarlyDelivery).unwrap();
        assert_eq!(bonus.points, i32::MAX);

        let late = policy.completion(dev, deadline(), deadline() + Duration::days(4000));
        let delay = late.iter().find(|e| e.reason == ScoreReason::DelayPenalty).unwrap();
        assert_eq!(delay.points, -i32::MAX);
        let missed = late.iter().find(|e| e.reason == ScoreReason::DeadlineMissed).unwrap();
        assert_eq!(missed.points, i32::MAX);
    }
}
