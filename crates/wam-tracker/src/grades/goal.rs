//! Back-solves the average a student needs on remaining assessments to reach a target.

use serde::{Deserialize, Serialize};

use super::aggregate::MarksTally;
use super::domain::{Assessment, Subject, SubjectId};
use super::input::BoundedInput;

/// Target used by the "low pass" preset.
pub const LOW_PASS_PERCENT: f64 = 60.0;

/// Bounds applied to the "high pass" preset.
pub const HIGH_PASS_INPUT: BoundedInput = BoundedInput {
    min: 60.0,
    max: 100.0,
};

/// Label-only view of a [`GoalOutcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    AlreadyAchieved,
    Unachievable,
    NoRemainingWork,
    Achievable,
}

impl GoalStatus {
    pub const fn label(self) -> &'static str {
        match self {
            GoalStatus::AlreadyAchieved => "already_achieved",
            GoalStatus::Unachievable => "unachievable",
            GoalStatus::NoRemainingWork => "no_remaining_work",
            GoalStatus::Achievable => "achievable",
        }
    }
}

/// Terminal classification of a goal projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GoalOutcome {
    AlreadyAchieved,
    Unachievable,
    NoRemainingWork,
    /// Average percentage needed across the remaining assessments.
    Achievable { required_average: f64 },
}

impl GoalOutcome {
    pub fn status(&self) -> GoalStatus {
        match self {
            GoalOutcome::AlreadyAchieved => GoalStatus::AlreadyAchieved,
            GoalOutcome::Unachievable => GoalStatus::Unachievable,
            GoalOutcome::NoRemainingWork => GoalStatus::NoRemainingWork,
            GoalOutcome::Achievable { .. } => GoalStatus::Achievable,
        }
    }

    /// Required average for achievable goals, zero otherwise.
    pub fn value(&self) -> f64 {
        match self {
            GoalOutcome::Achievable { required_average } => *required_average,
            _ => 0.0,
        }
    }
}

/// Decides which assessments still have marks on offer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemainingPolicy {
    /// Ungraded assessments and assessments scored exactly zero. A real zero score
    /// cannot be told apart from one not yet sat.
    #[default]
    UngradedOrZero,
    /// Only assessments with no recorded marks.
    UngradedOnly,
}

impl RemainingPolicy {
    pub fn is_remaining(self, assessment: &Assessment) -> bool {
        match (self, assessment.obtained_marks) {
            (_, None) => true,
            (RemainingPolicy::UngradedOrZero, Some(marks)) => marks == 0.0,
            (RemainingPolicy::UngradedOnly, Some(_)) => false,
        }
    }
}

/// Project `target_percent` for `subject` using the default remaining policy.
pub fn project_goal(subject: &Subject, target_percent: f64) -> GoalOutcome {
    project_goal_with(subject, target_percent, RemainingPolicy::default())
}

pub fn project_goal_with(
    subject: &Subject,
    target_percent: f64,
    policy: RemainingPolicy,
) -> GoalOutcome {
    let tally = MarksTally::of(&subject.assessments);
    let current = tally.percent().unwrap_or(0.0);

    if current >= target_percent {
        return GoalOutcome::AlreadyAchieved;
    }

    required_on_remaining(&subject.assessments, &tally, target_percent, policy)
}

fn required_on_remaining(
    assessments: &[Assessment],
    tally: &MarksTally,
    target_percent: f64,
    policy: RemainingPolicy,
) -> GoalOutcome {
    let required_total = target_percent / 100.0 * tally.full;
    let required_marks = required_total - tally.obtained;

    let remaining_full_marks: f64 = assessments
        .iter()
        .filter(|assessment| policy.is_remaining(assessment))
        .map(|assessment| assessment.full_marks)
        .sum();

    if remaining_full_marks == 0.0 {
        return GoalOutcome::NoRemainingWork;
    }

    if required_marks <= 0.0 {
        return GoalOutcome::AlreadyAchieved;
    }

    if required_marks > remaining_full_marks {
        return GoalOutcome::Unachievable;
    }

    GoalOutcome::Achievable {
        required_average: required_marks / remaining_full_marks * 100.0,
    }
}

/// Goal selected in the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "goal", content = "percentage", rename_all = "snake_case")]
pub enum GoalTarget {
    LowPass,
    /// Requested percentage; settled into 60..=100 and rounded.
    HighPass(f64),
    /// Arbitrary target already validated by the caller.
    Custom(f64),
}

impl GoalTarget {
    pub fn percent(&self) -> f64 {
        match self {
            GoalTarget::LowPass => LOW_PASS_PERCENT,
            GoalTarget::HighPass(requested) => HIGH_PASS_INPUT.settle_value(*requested),
            GoalTarget::Custom(percent) => *percent,
        }
    }
}

/// Goal projection bundled with the figures the evaluator displays.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalEvaluation {
    pub subject_id: SubjectId,
    pub target_percent: f64,
    pub current_percent: f64,
    pub outcome: GoalOutcome,
}

impl GoalEvaluation {
    pub fn evaluate(subject: &Subject, target: GoalTarget, policy: RemainingPolicy) -> Self {
        let target_percent = target.percent();
        Self {
            subject_id: subject.id.clone(),
            target_percent,
            current_percent: MarksTally::of(&subject.assessments)
                .percent()
                .unwrap_or(0.0),
            outcome: project_goal_with(subject, target_percent, policy),
        }
    }

    pub fn message(&self) -> String {
        let current = format!("Current WAM: {:.2}%", self.current_percent);
        match self.outcome {
            GoalOutcome::AlreadyAchieved => {
                format!("Congratulations! You have reached your goal. {current}")
            }
            GoalOutcome::Unachievable => format!(
                "Unfortunately, it's not possible to reach your goal with the remaining assessments. {current}"
            ),
            GoalOutcome::NoRemainingWork => format!(
                "Unfortunately, you did not reach your goal and there are no remaining assessments. {current}"
            ),
            GoalOutcome::Achievable { required_average } => format!(
                "To reach your goal, you need to score an average of at least {required_average:.2}% in the remaining assessments. {current}"
            ),
        }
    }
}
