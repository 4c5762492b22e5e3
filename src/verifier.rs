//! Constraint verification for a proposed beam assignment.
//!
//! `verify` is a pure decision function: it never touches the process,
//! the filesystem, or the terminal, and identical inputs always produce
//! identical verdicts. Callers decide what to do with the outcome.
//!
//! Checks run fail-fast, cheapest first:
//! 1. reference validity (ids resolve against the scenario),
//! 2. capacity (≤ 32 beams per satellite),
//! 3. visibility (zenith to user→satellite angle ≤ 45°),
//! 4. co-channel separation (same satellite + color pairs ≥ 10° apart),
//! 5. coverage (served fraction ≥ `min_coverage`).
//!
//! The per-satellite pair scan in step 4 is O(k²) with k ≤ 32, bounded
//! by the capacity rule enforced in step 2.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::{
    Beam, GraderError, Result, SatId, Scenario, Solution, MAX_BEAMS_PER_SAT, MAX_VISIBILITY_DEG,
    MIN_SEPARATION_DEG,
};

/// Outcome of a passing verification run.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct VerifierReport {
    pub served_users: usize,
    pub total_users: usize,
    pub coverage: f64,
}

/// Fraction of users served. Zero users means there is nobody left
/// unserved, so the fraction is 1.
pub fn coverage_fraction(served: usize, total: usize) -> f64 {
    if total == 0 {
        1.0
    } else {
        served as f64 / total as f64
    }
}

/// Check a proposed assignment against every constellation rule.
/// Returns the coverage summary on pass; the first violation aborts
/// with an error naming the offending ids and the measured value.
pub fn verify(scenario: &Scenario, solution: &Solution) -> Result<VerifierReport> {
    // Step 1: every referenced id must exist. Colors are structurally
    // valid here; the solution-file codec rejects bad ones earlier.
    for (&user, &(sat, _)) in solution {
        if !scenario.users.contains_key(&user) {
            return Err(GraderError::SolutionFormat(format!(
                "'{user}' is not a valid user id"
            )));
        }
        if !scenario.sats.contains_key(&sat) {
            return Err(GraderError::SolutionFormat(format!(
                "'{sat}' is not a valid sat id"
            )));
        }
    }

    let beams = group_by_sat(solution);

    // Step 2: capacity.
    for (&sat, sat_beams) in &beams {
        if sat_beams.len() > MAX_BEAMS_PER_SAT {
            return Err(GraderError::OverCapacity {
                sat,
                assigned: sat_beams.len(),
            });
        }
    }

    // Step 3: visibility. Fails on angles strictly above the limit.
    for (&user, &(sat, _)) in solution {
        let user_pos = scenario.users[&user];
        let sat_pos = scenario.sats[&sat];
        let angle_deg = user_pos.angle_deg(sat_pos - user_pos);
        debug!("beam {user}->{sat}: {angle_deg:.2} degrees from vertical");
        if angle_deg > MAX_VISIBILITY_DEG {
            return Err(GraderError::NotVisible {
                user,
                sat,
                angle_deg,
            });
        }
    }

    // Step 4: co-channel separation. Fails on angles strictly below the
    // limit; exactly 10 degrees is legal.
    for (&sat, sat_beams) in &beams {
        let sat_pos = scenario.sats[&sat];
        for (i, a) in sat_beams.iter().enumerate() {
            for b in &sat_beams[i + 1..] {
                if a.user == b.user {
                    // One beam per user is a structural invariant of the
                    // solution map; a repeat here is a grader bug.
                    return Err(GraderError::Internal(format!(
                        "user {} appears twice on satellite {sat}",
                        a.user
                    )));
                }
                if a.color != b.color {
                    continue;
                }
                let angle_deg =
                    sat_pos.angle_between(scenario.users[&a.user], scenario.users[&b.user]);
                if angle_deg < MIN_SEPARATION_DEG {
                    return Err(GraderError::TooClose {
                        user_a: a.user,
                        user_b: b.user,
                        sat,
                        color: a.color,
                        angle_deg,
                    });
                }
            }
        }
    }

    // Step 5: coverage. Equal to the threshold passes.
    let served_users = solution.len();
    let total_users = scenario.users.len();
    let coverage = coverage_fraction(served_users, total_users);
    if coverage < scenario.min_coverage {
        return Err(GraderError::CoverageShortfall {
            coverage,
            min_coverage: scenario.min_coverage,
        });
    }

    Ok(VerifierReport {
        served_users,
        total_users,
        coverage,
    })
}

/// Beams keyed by satellite, each group ordered by (color, user) so
/// verification walks pairs deterministically.
fn group_by_sat(solution: &Solution) -> BTreeMap<SatId, Vec<Beam>> {
    let mut beams: BTreeMap<SatId, Vec<Beam>> = BTreeMap::new();
    for (&user, &(sat, color)) in solution {
        beams.entry(sat).or_default().push(Beam { user, sat, color });
    }
    for sat_beams in beams.values_mut() {
        sat_beams.sort_by_key(|b| (b.color, b.user));
    }
    beams
}
