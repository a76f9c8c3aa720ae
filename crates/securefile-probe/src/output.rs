//! Output formatting for securefile-probe (table or json)

use colored::Colorize;
use serde::Serialize;
use tabled::{Table, Tabled};

use crate::suites::CaseResult;

/// Context for output rendering
pub struct OutputContext {
    pub json: bool,
}

impl OutputContext {
    pub fn new(json: bool, no_color: bool) -> Self {
        if no_color || json {
            colored::control::set_override(false);
        }
        Self { json }
    }

    /// Print an info message (table mode only, so JSON stays parseable)
    pub fn info(&self, msg: &str) {
        if !self.json {
            println!("{}", msg);
        }
    }

    /// Print an error message
    pub fn error(&self, msg: &str) {
        eprintln!("{}", msg.red());
    }

    /// Print every case result followed by a summary line
    pub fn print_results(&self, results: &[CaseResult]) {
        let summary = Summary::from_results(results);

        if self.json {
            let report = Report {
                results,
                summary: &summary,
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&report).unwrap_or_else(|_| "{}".to_string())
            );
            return;
        }

        let rows: Vec<CaseRow> = results.iter().map(CaseRow::from).collect();
        if rows.is_empty() {
            println!("No cases run");
        } else {
            println!("{}", Table::new(rows));
        }

        let line = format!(
            "{} passed, {} failed ({} cases)",
            summary.passed, summary.failed, summary.total
        );
        if summary.failed == 0 {
            println!("{}", line.green().bold());
        } else {
            println!("{}", line.red().bold());
        }
    }
}

/// Pass/fail counts for a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
}

impl Summary {
    pub fn from_results(results: &[CaseResult]) -> Self {
        let passed = results.iter().filter(|r| r.passed).count();
        Self {
            total: results.len(),
            passed,
            failed: results.len() - passed,
        }
    }
}

#[derive(Serialize)]
struct Report<'a> {
    results: &'a [CaseResult],
    summary: &'a Summary,
}

/// Case display for the results table
#[derive(Debug, Tabled)]
pub struct CaseRow {
    #[tabled(rename = "Suite")]
    pub suite: String,
    #[tabled(rename = "Case")]
    pub case: String,
    #[tabled(rename = "Expected")]
    pub expected: String,
    #[tabled(rename = "Observed")]
    pub observed: String,
    #[tabled(rename = "Result")]
    pub result: String,
}

impl From<&CaseResult> for CaseRow {
    fn from(result: &CaseResult) -> Self {
        Self {
            suite: result.suite.to_string(),
            case: result.case.clone(),
            expected: result.expected.to_string(),
            observed: result.observed.clone(),
            result: if result.passed { "PASS" } else { "FAIL" }.to_string(),
        }
    }
}
