//! Scenario loading from line-oriented test case files.
//!
//! A scenario file holds one record per line, whitespace separated:
//!
//! ```text
//! user <id> <x> <y> <z>
//! sat <id> <x> <y> <z>
//! min_coverage <fraction>
//! ```
//!
//! `#` starts a comment; blank lines are skipped. The last
//! `min_coverage` record wins, and it defaults to 0 when absent.

use std::collections::HashMap;
use std::path::Path;
use std::str::SplitWhitespace;

use tracing::info;

use crate::{GraderError, Result, SatId, UserId, Vector3};

/// Fixed input a solution is judged against: user and satellite
/// positions plus the pass threshold. Immutable after load.
#[derive(Debug, Clone, Default)]
pub struct Scenario {
    pub users: HashMap<UserId, Vector3>,
    pub sats: HashMap<SatId, Vector3>,
    pub min_coverage: f64,
}

impl Scenario {
    /// Parse a scenario file. Any line that is not one of the three
    /// record forms fails with a [`GraderError::Parse`] citing the line.
    pub fn load(path: impl AsRef<Path>) -> Result<Scenario> {
        let path = path.as_ref();
        info!("Loading scenario from {:?}", path);

        let text = std::fs::read_to_string(path)?;
        let mut scenario = Scenario::default();

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }

            let mut parts = line.split_whitespace();
            let kind = parts.next().unwrap_or("");
            match kind {
                "user" => {
                    let id = parse_field::<u64>(&mut parts, line_no, raw, "user id")?;
                    let pos = parse_position(&mut parts, line_no, raw)?;
                    expect_end(&mut parts, line_no, raw)?;
                    scenario.users.insert(UserId(id), pos);
                }
                "sat" => {
                    let id = parse_field::<u64>(&mut parts, line_no, raw, "sat id")?;
                    let pos = parse_position(&mut parts, line_no, raw)?;
                    expect_end(&mut parts, line_no, raw)?;
                    scenario.sats.insert(SatId(id), pos);
                }
                "min_coverage" => {
                    let fraction =
                        parse_field::<f64>(&mut parts, line_no, raw, "coverage fraction")?;
                    expect_end(&mut parts, line_no, raw)?;
                    scenario.min_coverage = fraction;
                }
                other => {
                    return Err(parse_error(line_no, raw, format!("invalid token '{other}'")));
                }
            }
        }

        info!(
            "Loaded scenario: {} users, {} sats, min_coverage {:.2}",
            scenario.users.len(),
            scenario.sats.len(),
            scenario.min_coverage
        );

        Ok(scenario)
    }
}

fn parse_error(line_no: usize, raw: &str, reason: String) -> GraderError {
    GraderError::Parse {
        line_no,
        line: raw.trim_end().to_string(),
        reason,
    }
}

fn parse_field<T: std::str::FromStr>(
    parts: &mut SplitWhitespace<'_>,
    line_no: usize,
    raw: &str,
    what: &str,
) -> Result<T> {
    let token = parts
        .next()
        .ok_or_else(|| parse_error(line_no, raw, format!("missing {what}")))?;
    token
        .parse()
        .map_err(|_| parse_error(line_no, raw, format!("invalid {what} '{token}'")))
}

fn parse_position(
    parts: &mut SplitWhitespace<'_>,
    line_no: usize,
    raw: &str,
) -> Result<Vector3> {
    let x = parse_field::<f64>(parts, line_no, raw, "x coordinate")?;
    let y = parse_field::<f64>(parts, line_no, raw, "y coordinate")?;
    let z = parse_field::<f64>(parts, line_no, raw, "z coordinate")?;
    Ok(Vector3::new(x, y, z))
}

fn expect_end(parts: &mut SplitWhitespace<'_>, line_no: usize, raw: &str) -> Result<()> {
    match parts.next() {
        Some(extra) => Err(parse_error(
            line_no,
            raw,
            format!("unexpected trailing token '{extra}'"),
        )),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_scenario(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_basic_scenario() {
        let file = write_scenario(
            "# two terminals, one bird\n\
             user 1 0.0 0.0 6371.0\n\
             user 7 10.0 0.0 6370.0\n\
             sat 3 0.0 0.0 7000.0\n\
             min_coverage 0.5\n",
        );

        let scenario = Scenario::load(file.path()).unwrap();
        assert_eq!(scenario.users.len(), 2);
        assert_eq!(scenario.sats.len(), 1);
        assert_eq!(scenario.min_coverage, 0.5);
        assert_eq!(scenario.users[&UserId(7)], Vector3::new(10.0, 0.0, 6370.0));
        assert_eq!(scenario.sats[&SatId(3)], Vector3::new(0.0, 0.0, 7000.0));
    }

    #[test]
    fn test_sparse_ids_are_kept_as_keys() {
        let file = write_scenario("user 1000000 1.0 2.0 3.0\nsat 42 4.0 5.0 6.0\n");
        let scenario = Scenario::load(file.path()).unwrap();
        assert!(scenario.users.contains_key(&UserId(1_000_000)));
        assert!(scenario.sats.contains_key(&SatId(42)));
    }

    #[test]
    fn test_min_coverage_defaults_to_zero() {
        let file = write_scenario("user 0 0.0 0.0 1.0\n");
        let scenario = Scenario::load(file.path()).unwrap();
        assert_eq!(scenario.min_coverage, 0.0);
    }

    #[test]
    fn test_last_min_coverage_wins() {
        let file = write_scenario("min_coverage 0.25\nmin_coverage 0.75\n");
        let scenario = Scenario::load(file.path()).unwrap();
        assert_eq!(scenario.min_coverage, 0.75);
    }

    #[test]
    fn test_comments_and_blank_lines_skipped() {
        let file = write_scenario("\n# header comment\nuser 1 0.0 0.0 1.0  # inline\n\n");
        let scenario = Scenario::load(file.path()).unwrap();
        assert_eq!(scenario.users.len(), 1);
    }

    #[test]
    fn test_unknown_token_cites_line() {
        let file = write_scenario("user 1 0.0 0.0 1.0\nplanet 9 1.0 2.0 3.0\n");
        let err = Scenario::load(file.path()).unwrap_err();
        match err {
            GraderError::Parse { line_no, line, .. } => {
                assert_eq!(line_no, 2);
                assert!(line.contains("planet"));
            }
            other => panic!("expected Parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_wrong_arity_rejected() {
        let file = write_scenario("user 1 0.0 0.0\n");
        assert!(matches!(
            Scenario::load(file.path()),
            Err(GraderError::Parse { line_no: 1, .. })
        ));
    }

    #[test]
    fn test_trailing_token_rejected() {
        let file = write_scenario("sat 1 0.0 0.0 1.0 extra\n");
        assert!(matches!(
            Scenario::load(file.path()),
            Err(GraderError::Parse { .. })
        ));
    }

    #[test]
    fn test_non_numeric_coordinate_rejected() {
        let file = write_scenario("user 1 0.0 north 1.0\n");
        let err = Scenario::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("y coordinate"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            Scenario::load("/nonexistent/scenario.txt"),
            Err(GraderError::Io(_))
        ));
    }
}
