//! Sequential suite runner

use super::suites::Suite;
use crate::error::Result;
use crate::providers::{OcrClient, Provider};
use std::fmt;
use std::path::Path;
use tracing::info;

/// Aggregate score for one suite
#[derive(Debug, Clone, PartialEq)]
pub struct SuiteReport {
    pub suite: Suite,
    pub marks: usize,
    pub total: usize,
}

impl SuiteReport {
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.marks as f64 / self.total as f64 * 100.0
    }
}

impl fmt::Display for SuiteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}/{} ({:.2}% accuracy)",
            self.suite.label(),
            self.marks,
            self.total,
            self.accuracy()
        )
    }
}

/// Run the selected suites in [`Suite::ALL`] order.
///
/// Each summary is printed as soon as its suite finishes. The first error
/// aborts the remaining suites.
pub async fn run_suites(
    client: &OcrClient,
    provider: Provider,
    data_dir: &Path,
    selected: &[Suite],
) -> Result<Vec<SuiteReport>> {
    let mut reports = Vec::new();

    for suite in Suite::ALL.into_iter().filter(|s| selected.contains(s)) {
        info!("Running {} with provider {}", suite.label(), provider);

        let (mut marks, mut total) = (0, 0);
        for case in suite.cases() {
            total += case.qa.len();
            marks += case.run(client, provider, data_dir, suite.label()).await?.marks;
        }

        let report = SuiteReport { suite, marks, total };
        println!("{report}");
        reports.push(report);
    }

    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_display() {
        let report = SuiteReport {
            suite: Suite::Receipts,
            marks: 7,
            total: 10,
        };
        assert_eq!(report.to_string(), "Receipt Tests: 7/10 (70.00% accuracy)");
    }

    #[test]
    fn test_report_accuracy_rounding() {
        let report = SuiteReport {
            suite: Suite::Mortgage,
            marks: 2,
            total: 3,
        };
        assert_eq!(report.to_string(), "Mortgage Tests: 2/3 (66.67% accuracy)");
    }
}
