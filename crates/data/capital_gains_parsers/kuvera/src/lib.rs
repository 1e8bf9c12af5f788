//! Parser for the Kuvera mutual fund capital gains report.
//!
//! The report is an HTML file (Kuvera names it `.xls`) whose second table
//! lists every redemption, grouped by fund and folio. Rows carry no type
//! marker, so each one is classified by its column count (see [`rows`]) and
//! folded into a [`ParseContext`] that remembers the current fund and folio.

pub mod config;
pub mod context;
pub mod reconcile;
pub mod rows;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, info};
use models::{ReportError, ReportTotals, TransactionRecord};
use serde::Serialize;

pub use crate::config::Config;
pub use crate::context::{ParseContext, RowOutcome};
pub use crate::reconcile::Reconciliation;
pub use crate::rows::{classify, extract_rows, RawRow, RowKind};

pub const PARSER_NAME: &str = "kuvera";

/// Everything read from one report, transactions in report order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ParsedReport {
    pub transactions: Vec<TransactionRecord>,
    /// Absent when the report has no "Total" row.
    pub totals: Option<ReportTotals>,
}

impl ParsedReport {
    fn absorb(&mut self, outcome: Option<RowOutcome>) {
        match outcome {
            Some(RowOutcome::Transaction(record)) => self.transactions.push(record),
            Some(RowOutcome::Totals(totals)) => self.totals = Some(totals),
            None => {}
        }
    }

    pub fn reconciliation(&self) -> Reconciliation {
        Reconciliation::new(&self.transactions, self.totals.as_ref())
    }
}

pub struct KuveraCapitalGainsParser;

impl KuveraCapitalGainsParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<ParsedReport> {
        let path = path.as_ref();
        let html = fs::read_to_string(path)
            .with_context(|| format!("Cannot read report {}", path.display()))?;
        let report = self
            .parse_str(&html)
            .with_context(|| format!("Failed parsing {}", path.display()))?;
        info!(
            "{}: {} transactions parsed from {}",
            PARSER_NAME,
            report.transactions.len(),
            path.display()
        );
        Ok(report)
    }

    pub fn parse_str(&self, html: &str) -> Result<ParsedReport, ReportError> {
        let rows = extract_rows(html)?;
        parse_rows(&rows)
    }
}

impl Default for KuveraCapitalGainsParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Folds the body rows in order. Errors carry the 1-based row number.
pub fn parse_rows(rows: &[RawRow]) -> Result<ParsedReport, ReportError> {
    let (_, report) = rows.iter().enumerate().try_fold(
        (ParseContext::default(), ParsedReport::default()),
        |(context, mut report), (idx, row)| {
            debug!("row {}: {} columns -> {:?}", idx + 1, row.len(), row.kind());
            let (context, outcome) = context.step(row).map_err(|e| e.at_row(idx + 1))?;
            report.absorb(outcome);
            Ok::<_, ReportError>((context, report))
        },
    )?;
    Ok(report)
}
