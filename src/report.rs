//! Result reporting.
//!
//! The persistent record is one fixed-width text line per run, appended
//! to a log whose lifetime spans many independent invocations. The
//! format matches the historical harness output: test case name
//! left-justified in 44 columns, then coverage and duration with two
//! decimals. No locking is performed; concurrent writers to the same
//! path are the caller's problem.

use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use tracing::info;

use crate::Result;

/// Machine-readable run summary, written only when the run passed.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub test_case: String,
    pub total_users: usize,
    pub total_sats: usize,
    pub served_users: usize,
    pub coverage: f64,
    pub min_coverage: f64,
    pub duration_s: f64,
    pub generated_at: String,
}

impl RunSummary {
    pub fn stamped_now(mut self) -> Self {
        self.generated_at = Utc::now().to_rfc3339();
        self
    }
}

/// Append one result line, creating the file if needed.
pub fn append_report_line(
    path: impl AsRef<Path>,
    test_case: &str,
    coverage: f64,
    duration: Duration,
) -> Result<()> {
    let path = path.as_ref();
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = BufWriter::new(file);
    writeln!(writer, "{}", report_line(test_case, coverage, duration))?;
    writer.flush()?;
    info!("Appended result for {test_case} to {:?}", path);
    Ok(())
}

/// The formatted report line, without the trailing newline.
pub fn report_line(test_case: &str, coverage: f64, duration: Duration) -> String {
    format!(
        "{:<44} {:>6.2}% {:>6.2}s",
        test_case,
        100.0 * coverage,
        duration.as_secs_f64()
    )
}

/// Write the optional JSON summary artifact.
pub fn write_json_summary(path: impl AsRef<Path>, summary: &RunSummary) -> Result<()> {
    let path = path.as_ref();
    let file = std::fs::File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, summary)?;
    info!("Wrote JSON summary to {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_report_line_format() {
        let line = report_line("cases/basic.txt", 0.875, Duration::from_millis(1230));
        assert_eq!(line, format!("{:<44}  87.50%   1.23s", "cases/basic.txt"));
        // Name field is 44 columns wide.
        assert_eq!(line.find("87.50").unwrap(), 46);
    }

    #[test]
    fn test_long_test_case_name_is_not_truncated() {
        let name = "a".repeat(60);
        let line = report_line(&name, 1.0, Duration::from_secs(2));
        assert!(line.starts_with(&name));
        assert!(line.ends_with("100.00%   2.00s"));
    }

    #[test]
    fn test_append_creates_and_appends() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("results.log");

        append_report_line(&path, "case-1", 1.0, Duration::from_secs(1)).unwrap();
        append_report_line(&path, "case-2", 0.5, Duration::from_secs(2)).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("case-1"));
        assert!(lines[0].contains("100.00%"));
        assert!(lines[1].starts_with("case-2"));
        assert!(lines[1].contains("50.00%"));
    }

    #[test]
    fn test_json_summary_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("summary.json");
        let summary = RunSummary {
            test_case: "case-1".to_string(),
            total_users: 10,
            total_sats: 2,
            served_users: 9,
            coverage: 0.9,
            min_coverage: 0.8,
            duration_s: 0.25,
            generated_at: String::new(),
        }
        .stamped_now();

        write_json_summary(&path, &summary).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["test_case"], "case-1");
        assert_eq!(value["served_users"], 9);
        assert!(value["generated_at"].as_str().unwrap().contains('T'));
    }
}
