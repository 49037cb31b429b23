use crate::demo::{
    run_demo, run_goal, run_import, run_semesters, run_wam, DemoArgs, GoalArgs, ImportArgs,
    WamArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use wam_tracker::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "WAM Tracker",
    about = "Track subject marks, weighted average mark and grade goals",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print the WAM for the stored gradebook, optionally for one semester
    Wam(WamArgs),
    /// Evaluate a grade goal for one stored subject
    Goal(GoalArgs),
    /// Import subjects and assessments from a CSV grade sheet
    Import(ImportArgs),
    /// List the semester names offered for the current and next year
    Semesters,
    /// Walk through a sample gradebook without touching stored data
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Wam(args) => run_wam(args),
        Command::Goal(args) => run_goal(args),
        Command::Import(args) => run_import(args),
        Command::Semesters => {
            run_semesters();
            Ok(())
        }
        Command::Demo(args) => run_demo(args),
    }
}
