//! Adapter around the opaque solver under test.
//!
//! The canonical contract is in-process: the solver receives the
//! id→position maps and returns an assignment. [`run_solver`] hands the
//! solver defensive clones of both maps so a misbehaving implementation
//! cannot corrupt the data the verifier will judge it against, and
//! brackets the call with a monotonic clock. The measured duration is
//! diagnostic only and never affects the verdict.
//!
//! Solvers that live in another process communicate through a side file
//! instead, one `<user_id> <sat_id> <color_char>` line per beam; the
//! [`SolutionFile`] adapter parses that format behind the same trait.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::{Color, GraderError, Result, SatId, Scenario, Solution, UserId, Vector3};

/// The external assignment algorithm, black-box to the grader.
pub trait Solver {
    fn solve(
        &self,
        users: HashMap<UserId, Vector3>,
        sats: HashMap<SatId, Vector3>,
    ) -> Result<Solution>;
}

/// Invoke the solver on defensive copies of the scenario data and time
/// the call. The scenario itself is never handed out.
pub fn run_solver<S: Solver>(scenario: &Scenario, solver: &S) -> Result<(Solution, Duration)> {
    let users = scenario.users.clone();
    let sats = scenario.sats.clone();

    let start = Instant::now();
    let solution = solver.solve(users, sats)?;
    let duration = start.elapsed();

    info!(
        "Solver proposed {} beams in {:.2}s",
        solution.len(),
        duration.as_secs_f64()
    );

    Ok((solution, duration))
}

/// File-based solver boundary: the external process has already written
/// its assignment to `path`, and "solving" is reading it back.
pub struct SolutionFile {
    path: PathBuf,
}

impl SolutionFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Solver for SolutionFile {
    fn solve(
        &self,
        _users: HashMap<UserId, Vector3>,
        _sats: HashMap<SatId, Vector3>,
    ) -> Result<Solution> {
        read_solution_file(&self.path)
    }
}

/// Read a solution side file. Comment (`#`) and blank lines are allowed,
/// matching the scenario format.
pub fn read_solution_file(path: impl AsRef<Path>) -> Result<Solution> {
    let path = path.as_ref();
    debug!("Reading solution from {:?}", path);
    let text = std::fs::read_to_string(path)?;
    parse_solution(&text)
}

/// Parse `<user_id> <sat_id> <color_char>` lines into a [`Solution`].
/// Malformed lines and repeated user ids fail with
/// [`GraderError::SolutionFormat`] naming the offending line.
pub fn parse_solution(text: &str) -> Result<Solution> {
    let mut solution = Solution::new();

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }

        let mut parts = line.split_whitespace();
        let user = next_token(&mut parts, line_no, raw)?
            .parse::<u64>()
            .map(UserId)
            .map_err(|_| format_error(line_no, raw, "invalid user id"))?;
        let sat = next_token(&mut parts, line_no, raw)?
            .parse::<u64>()
            .map(SatId)
            .map_err(|_| format_error(line_no, raw, "invalid sat id"))?;
        let color_token = next_token(&mut parts, line_no, raw)?;
        let color = color_token.parse::<Color>().map_err(|_| {
            format_error(
                line_no,
                raw,
                &format!("'{color_token}' is not a valid beam color"),
            )
        })?;
        if parts.next().is_some() {
            return Err(format_error(line_no, raw, "unexpected trailing token"));
        }

        if solution.insert(user, (sat, color)).is_some() {
            return Err(format_error(
                line_no,
                raw,
                &format!("duplicate assignment for user {user}"),
            ));
        }
    }

    Ok(solution)
}

fn next_token<'a>(
    parts: &mut std::str::SplitWhitespace<'a>,
    line_no: usize,
    raw: &str,
) -> Result<&'a str> {
    parts
        .next()
        .ok_or_else(|| format_error(line_no, raw, "expected 'user sat color'"))
}

fn format_error(line_no: usize, raw: &str, reason: &str) -> GraderError {
    GraderError::SolutionFormat(format!(
        "line {line_no}: {reason} ({:?})",
        raw.trim_end()
    ))
}
