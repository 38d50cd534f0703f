//! Diagnostics collected while converting external feed rows.
//!
//! Feed conversion never aborts on a single bad row. Malformed numeric cells
//! are defaulted to zero and recorded as warnings; rows that cannot become a
//! project at all (bad or duplicate ID) are skipped and recorded as errors.
//!
//! ```
//! use lotboard_core::diagnostics::FeedDiagnostics;
//!
//! let mut diag = FeedDiagnostics::new();
//! diag.add_defaulted("Tariff", "n/a", 3);
//! assert_eq!(diag.warning_count(), 1);
//! assert_eq!(diag.stats.defaulted_values, 1);
//! ```

use serde::Serialize;

/// Severity level for diagnostic issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Unusual but the row was kept (e.g., defaulted value)
    Warning,
    /// The row was skipped
    Error,
}

/// A single issue found in a feed row
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticIssue {
    pub severity: Severity,
    /// Category for grouping (e.g., "parse", "identity")
    pub category: String,
    pub message: String,
    /// 1-based data row in the feed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
}

impl DiagnosticIssue {
    pub fn new(
        severity: Severity,
        category: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            category: category.into(),
            message: message.into(),
            row: None,
        }
    }

    pub fn with_row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }
}

impl std::fmt::Display for DiagnosticIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let severity = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };

        write!(f, "[{}:{}] {}", severity, self.category, self.message)?;

        if let Some(row) = self.row {
            write!(f, " at row {}", row)?;
        }

        Ok(())
    }
}

/// Counters for one feed conversion
#[derive(Debug, Clone, Default, Serialize)]
pub struct FeedStats {
    pub rows_read: usize,
    pub projects: usize,
    pub requirements: usize,
    /// Rows whose likelihood is not a configured bucket
    pub dropped_rows: usize,
    pub skipped_rows: usize,
    pub defaulted_values: usize,
}

/// Statistics plus issues for a feed conversion
#[derive(Debug, Clone, Default, Serialize)]
pub struct FeedDiagnostics {
    pub stats: FeedStats,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<DiagnosticIssue>,
}

impl FeedDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a numeric cell that could not be parsed and was replaced by zero
    pub fn add_defaulted(&mut self, column: &str, raw: &str, row: usize) {
        self.issues.push(
            DiagnosticIssue::new(
                Severity::Warning,
                "parse",
                format!("{column} value '{raw}' is not numeric, using 0"),
            )
            .with_row(row),
        );
        self.stats.defaulted_values += 1;
    }

    /// Record a row that was skipped entirely
    pub fn add_skipped(&mut self, category: &str, message: &str, row: usize) {
        self.issues
            .push(DiagnosticIssue::new(Severity::Error, category, message).with_row(row));
        self.stats.skipped_rows += 1;
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .count()
    }

    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .count()
    }

    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    pub fn summary(&self) -> String {
        let warnings = self.warning_count();
        let errors = self.error_count();
        let issue_summary = match (warnings, errors) {
            (0, 0) => "No issues".to_string(),
            (w, 0) => format!("{} warning{}", w, if w == 1 { "" } else { "s" }),
            (0, e) => format!("{} error{}", e, if e == 1 { "" } else { "s" }),
            (w, e) => format!(
                "{} warning{}, {} error{}",
                w,
                if w == 1 { "" } else { "s" },
                e,
                if e == 1 { "" } else { "s" }
            ),
        };

        format!(
            "{} rows, {} projects, {} requirements, {} dropped | {}",
            self.stats.rows_read,
            self.stats.projects,
            self.stats.requirements,
            self.stats.dropped_rows,
            issue_summary
        )
    }
}

impl std::fmt::Display for FeedDiagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Feed: {}", self.summary())?;
        for issue in &self.issues {
            writeln!(f, "  {}", issue)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_stats() {
        let mut diag = FeedDiagnostics::new();
        diag.add_defaulted("Capacity (MW)", "tbd", 4);
        diag.add_skipped("identity", "ID 'x' is not an integer", 7);

        assert_eq!(diag.warning_count(), 1);
        assert_eq!(diag.error_count(), 1);
        assert_eq!(diag.stats.defaulted_values, 1);
        assert_eq!(diag.stats.skipped_rows, 1);
        assert!(diag.has_issues());
    }

    #[test]
    fn test_summary() {
        let mut diag = FeedDiagnostics::new();
        diag.stats.rows_read = 12;
        diag.stats.projects = 10;
        diag.stats.dropped_rows = 2;
        assert!(diag.summary().ends_with("No issues"));

        diag.add_defaulted("Tariff", "", 1);
        diag.add_defaulted("Tariff", "-", 2);
        let summary = diag.summary();
        assert!(summary.contains("12 rows"));
        assert!(summary.contains("2 dropped"));
        assert!(summary.contains("2 warnings"));
    }

    #[test]
    fn test_issue_display_and_serialization() {
        let issue = DiagnosticIssue::new(Severity::Error, "identity", "duplicate ID 7").with_row(9);
        let display = issue.to_string();
        assert!(display.contains("error:identity"));
        assert!(display.contains("row 9"));

        let json = serde_json::to_string(&issue).unwrap();
        assert!(json.contains("\"severity\":\"error\""));
        assert!(json.contains("\"row\":9"));
    }
}
