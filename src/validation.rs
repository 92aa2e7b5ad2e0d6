// ✅ Table Validation - checks a read-back table against the generator's contract
// Never mutates the table; categorical membership is already enforced by the
// types when the table is parsed.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::export::MovementTable;
use crate::movement::{parse_document_number, COLUMNS, DOCUMENT_MAX, DOCUMENT_MIN};

// How many offending rows a failed check lists in its message
const MAX_REPORTED_ROWS: usize = 5;

// ============================================================================
// CHECK RESULT
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    pub passed: bool,
    pub check: String,
    pub message: String,
}

impl CheckResult {
    pub fn pass(check: &str, message: impl Into<String>) -> Self {
        CheckResult {
            passed: true,
            check: check.to_string(),
            message: message.into(),
        }
    }

    pub fn fail(check: &str, message: impl Into<String>) -> Self {
        CheckResult {
            passed: false,
            check: check.to_string(),
            message: message.into(),
        }
    }
}

// ============================================================================
// VALIDATION REPORT
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub rows: usize,
    pub checks: Vec<CheckResult>,
}

impl ValidationReport {
    pub fn passed(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }

    pub fn failures(&self) -> Vec<&CheckResult> {
        self.checks.iter().filter(|c| !c.passed).collect()
    }

    pub fn summary(&self) -> String {
        let failed = self.failures().len();
        format!(
            "{} rows: {}/{} checks passed{}",
            self.rows,
            self.checks.len() - failed,
            self.checks.len(),
            if failed == 0 { "" } else { " ❌" }
        )
    }
}

// ============================================================================
// VALIDATOR
// ============================================================================

pub struct TableValidator {
    expected_rows: usize,
    amount_min: f64,
    amount_max: f64,

    /// Inclusive (earliest, latest) date bounds, if dates should be checked
    date_window: Option<(NaiveDate, NaiveDate)>,
}

impl TableValidator {
    pub fn new(expected_rows: usize, amount_min: f64, amount_max: f64) -> Self {
        TableValidator {
            expected_rows,
            amount_min,
            amount_max,
            date_window: None,
        }
    }

    /// Builder: also check every date lies in [earliest, latest]
    pub fn with_date_window(mut self, earliest: NaiveDate, latest: NaiveDate) -> Self {
        self.date_window = Some((earliest, latest));
        self
    }

    pub fn validate(&self, table: &MovementTable) -> ValidationReport {
        let mut checks = vec![
            self.check_row_count(table),
            self.check_columns(table),
            self.check_codes(table),
            self.check_documents(table),
            self.check_amounts(table),
        ];

        if let Some((earliest, latest)) = self.date_window {
            checks.push(self.check_dates(table, earliest, latest));
        }

        ValidationReport {
            rows: table.len(),
            checks,
        }
    }

    // ========================================================================
    // CHECKS
    // ========================================================================

    fn check_row_count(&self, table: &MovementTable) -> CheckResult {
        if table.len() == self.expected_rows {
            CheckResult::pass("row_count", format!("{} rows", table.len()))
        } else {
            CheckResult::fail(
                "row_count",
                format!("Expected {} rows, found {}", self.expected_rows, table.len()),
            )
        }
    }

    fn check_columns(&self, table: &MovementTable) -> CheckResult {
        if table.columns.iter().map(String::as_str).eq(COLUMNS.iter().copied()) {
            CheckResult::pass("columns", "Column set matches")
        } else {
            CheckResult::fail(
                "columns",
                format!("Expected {:?}, found {:?}", COLUMNS, table.columns),
            )
        }
    }

    fn check_codes(&self, table: &MovementTable) -> CheckResult {
        let out_of_place: Vec<String> = table
            .movements
            .iter()
            .enumerate()
            .filter(|(idx, m)| m.code as usize != idx + 1)
            .map(|(idx, m)| format!("row {} has code {}", idx + 1, m.code))
            .collect();

        summarize("codes_sequential", "Codes run 1..=N", out_of_place)
    }

    fn check_documents(&self, table: &MovementTable) -> CheckResult {
        let bad: Vec<String> = table
            .movements
            .iter()
            .filter(|m| {
                !parse_document_number(&m.document)
                    .map(|n| (DOCUMENT_MIN..=DOCUMENT_MAX).contains(&n))
                    .unwrap_or(false)
            })
            .map(|m| format!("{}: {:?}", m.code, m.document))
            .collect();

        summarize("document_format", "Documents are NF-1000..NF-9999", bad)
    }

    fn check_amounts(&self, table: &MovementTable) -> CheckResult {
        let bad: Vec<String> = table
            .movements
            .iter()
            .filter(|m| !(m.amount >= self.amount_min && m.amount <= self.amount_max))
            .map(|m| format!("{}: {}", m.code, m.amount))
            .collect();

        summarize(
            "amount_range",
            format!("Amounts within [{}, {}]", self.amount_min, self.amount_max),
            bad,
        )
    }

    fn check_dates(&self, table: &MovementTable, earliest: NaiveDate, latest: NaiveDate) -> CheckResult {
        let bad: Vec<String> = table
            .movements
            .iter()
            .filter(|m| m.date < earliest || m.date > latest)
            .map(|m| format!("{}: {}", m.code, m.date))
            .collect();

        summarize(
            "date_window",
            format!("Dates within [{}, {}]", earliest, latest),
            bad,
        )
    }
}

fn summarize(check: &str, ok_message: impl Into<String>, offenders: Vec<String>) -> CheckResult {
    if offenders.is_empty() {
        return CheckResult::pass(check, ok_message);
    }

    let shown: Vec<&str> = offenders
        .iter()
        .take(MAX_REPORTED_ROWS)
        .map(String::as_str)
        .collect();
    CheckResult::fail(
        check,
        format!("{} offending rows (e.g. {})", offenders.len(), shown.join("; ")),
    )
}
