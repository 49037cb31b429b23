//! Credit-weighted aggregation of subject percentages into a single WAM figure.

use serde::Serialize;

use super::domain::{Assessment, Subject, SubjectId};

/// Sum of obtained and full marks over a set of assessments.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MarksTally {
    pub obtained: f64,
    pub full: f64,
}

impl MarksTally {
    /// Tally every assessment, counting ungraded items as zero obtained marks.
    pub fn of(assessments: &[Assessment]) -> Self {
        assessments
            .iter()
            .fold(Self::default(), |tally, assessment| Self {
                obtained: tally.obtained + assessment.obtained_or_zero(),
                full: tally.full + assessment.full_marks,
            })
    }

    /// Percentage of full marks obtained, `None` when there is nothing to divide by.
    pub fn percent(&self) -> Option<f64> {
        if self.full == 0.0 {
            return None;
        }
        let percent = self.obtained / self.full * 100.0;
        percent.is_finite().then_some(percent)
    }
}

/// Current percentage for a single subject; zero when its full marks total is zero.
pub fn current_percent(subject: &Subject) -> f64 {
    MarksTally::of(&subject.assessments)
        .percent()
        .unwrap_or(0.0)
}

/// One subject's share of the aggregate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectContribution {
    pub subject_id: SubjectId,
    pub percent: f64,
    pub credit: f64,
}

impl SubjectContribution {
    /// `None` for excluded subjects, subjects without assessments and subjects whose
    /// assessments carry no full marks.
    fn of(subject: &Subject) -> Option<Self> {
        if !subject.counts_toward_wam() {
            return None;
        }
        let percent = MarksTally::of(&subject.assessments).percent()?;
        Some(Self {
            subject_id: subject.id.clone(),
            percent,
            credit: subject.credit,
        })
    }
}

/// WAM together with the per-subject contributions that produced it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregateBreakdown {
    pub wam: f64,
    pub total_credit: f64,
    pub contributions: Vec<SubjectContribution>,
}

pub fn aggregate_breakdown(subjects: &[Subject]) -> AggregateBreakdown {
    let contributions: Vec<SubjectContribution> =
        subjects.iter().filter_map(SubjectContribution::of).collect();

    let (weighted_sum, total_credit) = contributions
        .iter()
        .fold((0.0, 0.0), |(weighted, credit), contribution| {
            (
                weighted + contribution.percent * contribution.credit,
                credit + contribution.credit,
            )
        });

    let wam = if total_credit > 0.0 {
        weighted_sum / total_credit
    } else {
        0.0
    };

    AggregateBreakdown {
        wam,
        total_credit,
        contributions,
    }
}

/// Credit-weighted average of included subject percentages, 0 when nothing counts.
pub fn compute_aggregate(subjects: &[Subject]) -> f64 {
    aggregate_breakdown(subjects).wam
}
