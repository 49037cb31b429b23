use crate::infra::{open_gradebook, parse_percentage, parse_target, GoalPreset};
use chrono::Local;
use clap::Args;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::Arc;
use wam_tracker::config::AppConfig;
use wam_tracker::error::AppError;
use wam_tracker::grades::{
    current_semester_options, import_subject_drafts, share_caption, share_url, AssessmentDraft,
    GoalEvaluation, GoalTarget, GradebookService, InMemorySubjectRepository, SemesterFilter,
    SubjectDraft, SubjectId, WamSummary,
};

const DEMO_SHARE_BASE: &str = "http://localhost:3000/gpa-calculator";

#[derive(Args, Debug, Default)]
pub(crate) struct WamArgs {
    /// Restrict the WAM to one semester (e.g. "2025 First Semester")
    #[arg(long)]
    pub(crate) semester: Option<String>,
    /// Print a shareable link and caption for the result
    #[arg(long)]
    pub(crate) share: bool,
}

#[derive(Args, Debug)]
pub(crate) struct GoalArgs {
    /// Identifier of the stored subject to evaluate
    #[arg(long)]
    pub(crate) subject: String,
    /// Preset goal to evaluate
    #[arg(long, value_enum, default_value_t = GoalPreset::LowPass)]
    pub(crate) goal: GoalPreset,
    /// Percentage for the high-pass goal; settled into 60-100 and rounded
    #[arg(long, value_parser = parse_percentage, allow_negative_numbers = true)]
    pub(crate) percentage: Option<f64>,
    /// Arbitrary target percentage; overrides --goal
    #[arg(long, value_parser = parse_target)]
    pub(crate) target: Option<f64>,
}

impl GoalArgs {
    fn target(&self) -> GoalTarget {
        match self.target {
            Some(target) => GoalTarget::Custom(target),
            None => self.goal.target(self.percentage),
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct ImportArgs {
    /// CSV grade sheet with one row per assessment
    #[arg(long)]
    pub(crate) csv: PathBuf,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Target percentage used for every sample subject (defaults to the low-pass goal)
    #[arg(long, value_parser = parse_target)]
    pub(crate) target: Option<f64>,
    /// Restrict the sample WAM to one semester
    #[arg(long)]
    pub(crate) semester: Option<String>,
}

pub(crate) fn run_wam(args: WamArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let gradebook = open_gradebook(&config)?;
    let filter = semester_filter(args.semester.as_deref());

    let summary = gradebook.wam_summary(&filter)?;
    render_wam_summary(&summary);
    if args.share {
        render_share(&config.share_base_url, summary.wam);
    }
    Ok(())
}

pub(crate) fn run_goal(args: GoalArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let gradebook = open_gradebook(&config)?;
    let subject_id = SubjectId(args.subject.clone());

    let subject = gradebook.subject(&subject_id)?;
    let evaluation = gradebook.evaluate_goal(&subject_id, args.target())?;
    println!("{} ({})", subject.name, subject.id);
    render_goal(&evaluation);
    Ok(())
}

pub(crate) fn run_import(args: ImportArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let gradebook = open_gradebook(&config)?;

    let reader = BufReader::new(File::open(&args.csv)?);
    let drafts = import_subject_drafts(reader)?;
    let subjects = gradebook.import(drafts)?;

    println!(
        "Imported {} subject(s) from {}",
        subjects.len(),
        args.csv.display()
    );
    for subject in &subjects {
        println!(
            "- {} [{}] {} assessment(s)",
            subject.name,
            subject.id,
            subject.assessments.len()
        );
    }
    Ok(())
}

pub(crate) fn run_semesters() {
    for option in current_semester_options() {
        println!("{option}");
    }
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { target, semester } = args;

    println!("WAM tracker demo ({})", Local::now().date_naive());
    let repository = Arc::new(InMemorySubjectRepository::default());
    let gradebook = GradebookService::new(repository)?;
    let subjects = gradebook.import(sample_drafts())?;

    let summary = gradebook.wam_summary(&semester_filter(semester.as_deref()))?;
    render_wam_summary(&summary);

    let goal = target.map_or(GoalTarget::LowPass, GoalTarget::Custom);
    println!("\nGoal projections");
    for subject in &subjects {
        let evaluation = gradebook.evaluate_goal(&subject.id, goal)?;
        println!("{}:", subject.name);
        render_goal(&evaluation);
    }

    render_share(DEMO_SHARE_BASE, summary.wam);
    Ok(())
}

fn semester_filter(raw: Option<&str>) -> SemesterFilter {
    raw.map(SemesterFilter::parse).unwrap_or_default()
}

fn render_wam_summary(summary: &WamSummary) {
    println!(
        "\nWAM ({}): {:.2}% across {} credit point(s)",
        summary.semester, summary.wam, summary.total_credit
    );
    if summary.subjects.is_empty() {
        println!("No subjects recorded.");
        return;
    }
    for subject in &summary.subjects {
        let status = if !subject.counts_toward_wam {
            "excluded"
        } else if subject.passing {
            "passing"
        } else {
            "below pass"
        };
        println!(
            "- {} [{}] {:.2}% | credit {} | {}/{} graded | {}",
            subject.name,
            subject.id,
            subject.current_percent,
            subject.credit,
            subject.graded_count,
            subject.assessment_count,
            status
        );
    }
}

fn render_goal(evaluation: &GoalEvaluation) {
    println!(
        "  target {:.2}% | {}",
        evaluation.target_percent,
        evaluation.outcome.status().label()
    );
    println!("  {}", evaluation.message());
}

fn render_share(base: &str, wam: f64) {
    println!("\nShare: {}", share_url(base, wam));
    println!("{}", share_caption(wam));
}

fn sample_drafts() -> Vec<SubjectDraft> {
    let graded = |name: &str, full_marks: f64, obtained: Option<f64>| AssessmentDraft {
        full_marks,
        minimum_pass_requirement: full_marks / 2.0,
        weight: full_marks,
        obtained_marks: obtained,
        ..AssessmentDraft::new(name)
    };

    vec![
        SubjectDraft {
            semester: "2025 First Semester".to_string(),
            assessments: vec![
                graded("Assignment 1", 20.0, Some(17.0)),
                graded("Assignment 2", 20.0, Some(14.0)),
                graded("Final Exam", 60.0, None),
            ],
            ..SubjectDraft::new("Data Structures")
        },
        SubjectDraft {
            semester: "2025 First Semester".to_string(),
            credit: 6.0,
            assessments: vec![
                graded("Lab Report", 60.0, Some(12.0)),
                graded("Quiz", 10.0, Some(0.0)),
                graded("Exam", 30.0, None),
            ],
            ..SubjectDraft::new("Linear Algebra")
        },
        SubjectDraft {
            semester: "2025 Second Semester".to_string(),
            assessments: vec![
                graded("Project", 50.0, Some(44.0)),
                graded("Presentation", 50.0, Some(41.0)),
            ],
            ..SubjectDraft::new("Software Engineering")
        },
        SubjectDraft {
            semester: "2025 Second Semester".to_string(),
            included: false,
            assessments: vec![graded("Portfolio", 100.0, Some(70.0))],
            ..SubjectDraft::new("Elective Seminar")
        },
    ]
}
