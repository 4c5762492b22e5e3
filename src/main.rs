//! Beam Assignment Grading CLI
//!
//! Loads a scenario, reads the solver's proposed assignment, verifies it
//! against the constellation constraints, and appends the result to a
//! shared report log.
//!
//! Usage:
//!   grade results.log cases/basic.txt --solution solution.txt

use anyhow::Result;
use beam_grader::{report, scenario::Scenario, solver, verifier};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "grade", about = "Grade a satellite beam assignment solution")]
struct Args {
    /// Report log the result line is appended to
    out_path: PathBuf,

    /// Scenario file describing users, satellites, and the pass threshold
    test_case: PathBuf,

    /// Solution file written by the solver under test
    #[arg(short, long, default_value = "solution.txt")]
    solution: PathBuf,

    /// Also write a JSON run summary to this path
    #[arg(long)]
    json_summary: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let scenario = Scenario::load(&args.test_case)?;
    info!(
        "Scenario: {:.2}% coverage required ({} users, {} sats)",
        100.0 * scenario.min_coverage,
        scenario.users.len(),
        scenario.sats.len()
    );

    let solution_file = solver::SolutionFile::new(&args.solution);
    let (solution, duration) = solver::run_solver(&scenario, &solution_file)?;

    // Any violation aborts here, before the report write.
    let verdict = verifier::verify(&scenario, &solution)?;
    info!(
        "Solution: {:.2}% coverage ({} of {} users) in {:.2}s",
        100.0 * verdict.coverage,
        verdict.served_users,
        verdict.total_users,
        duration.as_secs_f64()
    );

    let test_case_name = args.test_case.display().to_string();
    report::append_report_line(&args.out_path, &test_case_name, verdict.coverage, duration)?;

    if let Some(json_path) = &args.json_summary {
        let summary = report::RunSummary {
            test_case: test_case_name,
            total_users: verdict.total_users,
            total_sats: scenario.sats.len(),
            served_users: verdict.served_users,
            coverage: verdict.coverage,
            min_coverage: scenario.min_coverage,
            duration_s: duration.as_secs_f64(),
            generated_at: String::new(),
        }
        .stamped_now();
        report::write_json_summary(json_path, &summary)?;
    }

    info!("PASS");
    Ok(())
}
