//! Import outcome tracking.
//!
//! Counts successful and failed rows for a single CSV run and keeps the
//! first [`MAX_RETAINED_FAILURES`] individual failures for reporting. Every
//! failure is printed as it happens, so later ones are only counted.

use std::fmt;

use crate::error::RowError;

/// Failures kept in [`ImportSummary::failures`]; the rest are only counted.
pub const MAX_RETAINED_FAILURES: usize = 100;

/// A rejected row together with its line in the input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFailure {
    pub line: u64,
    pub error: RowError,
}

impl fmt::Display for RowFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line {}: {}", self.line, self.error)
    }
}

/// Totals for one import run. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Rows inserted, or rows that would have been inserted in a dry run
    pub successes: usize,
    /// Rows rejected for any reason
    pub errors: usize,
    /// The first rejected rows, at most [`MAX_RETAINED_FAILURES`]
    pub failures: Vec<RowFailure>,
    pub dry_run: bool,
}

impl ImportSummary {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Self::default()
        }
    }

    pub fn record_success(&mut self) {
        self.successes += 1;
    }

    pub fn record_failure(&mut self, failure: RowFailure) {
        self.errors += 1;
        if self.failures.len() < MAX_RETAINED_FAILURES {
            self.failures.push(failure);
        }
    }

    pub fn total(&self) -> usize {
        self.successes + self.errors
    }
}

impl fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Processing complete. Successful: {}, Failed: {}",
            self.successes, self.errors
        )?;
        if self.dry_run {
            write!(f, " (dry run, no changes written)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failures_are_counted_and_kept() {
        let mut summary = ImportSummary::new(false);
        summary.record_success();
        summary.record_failure(RowFailure {
            line: 2,
            error: RowError::Structural { fields: 2 },
        });
        assert_eq!(
            summary.failures[0].to_string(),
            "Line 2: expected 3 fields (name, surname, email), found 2"
        );

        assert_eq!(summary.successes, 1);
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.total(), 2);
        assert_eq!(
            summary.to_string(),
            "Processing complete. Successful: 1, Failed: 1"
        );
    }

    #[test]
    fn retained_failures_are_capped_but_all_counted() {
        let mut summary = ImportSummary::new(false);
        for line in 1..=150 {
            summary.record_failure(RowFailure {
                line,
                error: RowError::Structural { fields: 1 },
            });
        }

        assert_eq!(summary.errors, 150);
        assert_eq!(summary.failures.len(), MAX_RETAINED_FAILURES);
        assert_eq!(summary.failures.last().map(|f| f.line), Some(100));
        assert_eq!(
            summary.to_string(),
            "Processing complete. Successful: 0, Failed: 150"
        );
    }

    #[test]
    fn dry_run_summary_says_so() {
        let summary = ImportSummary::new(true);
        assert!(summary.to_string().ends_with("(dry run, no changes written)"));
    }
}
