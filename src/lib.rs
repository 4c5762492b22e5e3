//! Satellite Beam Assignment Grader
//!
//! Validates and scores a candidate beam assignment against a fixed
//! scenario of ground users and satellites. The solver under test is an
//! opaque external collaborator; this crate loads the scenario, hands the
//! solver defensive copies of the position data, then checks the proposed
//! assignment against the constellation's physical and capacity rules.
//!
//! # Constraint Model
//!
//! | Check      | Rule                                                        |
//! |------------|-------------------------------------------------------------|
//! | References | every user/satellite id in the solution exists              |
//! | Capacity   | at most 32 beams per satellite                              |
//! | Visibility | user zenith to user→satellite angle ≤ 45°                   |
//! | Separation | same satellite, same color: angle at satellite ≥ 10°        |
//! | Coverage   | served users / total users ≥ scenario `min_coverage`        |
//!
//! Checks run fail-fast in that order: structural validity is rejected
//! before any trigonometry, and the O(k²) per-satellite pair scan is
//! bounded by the capacity rule (k ≤ 32).

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod geometry;
pub mod report;
pub mod scenario;
pub mod solver;
pub mod verifier;

pub use geometry::Vector3;
pub use scenario::Scenario;
pub use verifier::{coverage_fraction, verify, VerifierReport};

/// Maximum concurrent beams a single satellite can serve.
pub const MAX_BEAMS_PER_SAT: usize = 32;

/// Maximum angle (degrees) between a user's zenith and the user→satellite
/// direction for the satellite to be visible.
pub const MAX_VISIBILITY_DEG: f64 = 45.0;

/// Minimum angle (degrees) at a satellite between two users sharing a
/// color on that satellite.
pub const MIN_SEPARATION_DEG: f64 = 10.0;

#[derive(Error, Debug)]
pub enum GraderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("scenario parse error at line {line_no}: {reason} ({line:?})")]
    Parse {
        line_no: usize,
        line: String,
        reason: String,
    },
    #[error("solution format error: {0}")]
    SolutionFormat(String),
    #[error("user {user} cannot see satellite {sat} ({angle_deg:.2} degrees from vertical)")]
    NotVisible {
        user: UserId,
        sat: SatId,
        angle_deg: f64,
    },
    #[error("satellite {sat} cannot serve more than 32 users ({assigned} assigned)")]
    OverCapacity { sat: SatId, assigned: usize },
    #[error(
        "users {user_a} and {user_b} on satellite {sat} color {color} are too close \
         ({angle_deg:.2} degrees)"
    )]
    TooClose {
        user_a: UserId,
        user_b: UserId,
        sat: SatId,
        color: Color,
        angle_deg: f64,
    },
    #[error("too few users served: {coverage:.4} < {min_coverage:.4}")]
    CoverageShortfall { coverage: f64, min_coverage: f64 },
    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, GraderError>;

/// Ground terminal identifier. Ids are stable keys, not indices: they
/// need not be dense or zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(pub u64);

/// Satellite identifier. Same sparse-key contract as [`UserId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SatId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for SatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reusable frequency/polarization channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Color {
    A,
    B,
    C,
    D,
}

impl Color {
    pub const ALL: [Color; 4] = [Color::A, Color::B, Color::C, Color::D];
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Color::A => 'A',
            Color::B => 'B',
            Color::C => 'C',
            Color::D => 'D',
        };
        write!(f, "{c}")
    }
}

impl FromStr for Color {
    type Err = GraderError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "A" => Ok(Color::A),
            "B" => Ok(Color::B),
            "C" => Ok(Color::C),
            "D" => Ok(Color::D),
            other => Err(GraderError::SolutionFormat(format!(
                "'{other}' is not a valid beam color"
            ))),
        }
    }
}

/// One (user, satellite, color) assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Beam {
    pub user: UserId,
    pub sat: SatId,
    pub color: Color,
}

/// Candidate assignment under test: at most one beam per user, enforced
/// by the map key. Ordered so verification walks beams deterministically.
pub type Solution = BTreeMap<UserId, (SatId, Color)>;
