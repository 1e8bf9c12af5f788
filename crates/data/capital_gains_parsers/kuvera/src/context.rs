use std::sync::OnceLock;

use models::{Fund, FundCategory, RawTransaction, ReportError, ReportTotals, TransactionRecord};
use regex::Regex;

use crate::rows::{RawRow, RowKind};

/// Fund and folio that the following transaction rows belong to.
///
/// A transaction needs a `Fund`, and only a header row can produce one, so a
/// transaction seen before any header is rejected rather than attributed to a
/// blank fund. The folio is optional and simply carried onto the record.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParseContext {
    pub fund: Option<Fund>,
    pub folio: Option<String>,
}

/// What a single row contributes to the parsed report.
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Transaction(TransactionRecord),
    Totals(ReportTotals),
}

impl ParseContext {
    /// Folds one body row into the context.
    pub fn step(self, row: &RawRow) -> Result<(ParseContext, Option<RowOutcome>), ReportError> {
        match row.kind() {
            RowKind::FundHeader => {
                let fund = parse_fund_header(row.first())?;
                Ok((
                    ParseContext {
                        fund: Some(fund),
                        ..self
                    },
                    None,
                ))
            }
            RowKind::Folio => {
                let folio = parse_folio(row.first())?;
                Ok((
                    ParseContext {
                        folio: Some(folio),
                        ..self
                    },
                    None,
                ))
            }
            RowKind::Transaction => {
                let fund = self.fund.as_ref().ok_or_else(|| {
                    ReportError::structural("transaction row before any fund header")
                })?;
                let raw = RawTransaction::from_columns(&row.columns)?;
                let record = TransactionRecord::from_raw(fund, self.folio.as_deref(), &raw)?;
                Ok((self, Some(RowOutcome::Transaction(record))))
            }
            RowKind::GrandTotal => {
                let totals = parse_totals(row)?;
                Ok((self, Some(RowOutcome::Totals(totals))))
            }
            RowKind::FundSubtotal | RowKind::Ignored => Ok((self, None)),
        }
    }
}

fn isin_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[ISIN: (.*)\]").expect("invalid ISIN regex"))
}

fn fund_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(.*)\[ISIN").expect("invalid fund name regex"))
}

fn folio_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Folio No: (.*)").expect("invalid folio regex"))
}

/// Reads "<fund name> [ISIN: <code>] <category>" from the first line of a
/// header cell.
pub fn parse_fund_header(cell: &str) -> Result<Fund, ReportError> {
    let details = cell.split('\n').next().unwrap_or("");

    let isin = isin_re()
        .captures(details)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .ok_or_else(|| ReportError::reference("ISIN", details))?;

    let name = fund_name_re()
        .captures(details)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .ok_or_else(|| ReportError::reference("fund name", details))?;

    let category = FundCategory::from_hint(details)
        .ok_or_else(|| ReportError::reference("fund category", details))?;

    Ok(Fund::new(name, category, Some(isin)))
}

pub fn parse_folio(cell: &str) -> Result<String, ReportError> {
    folio_re()
        .captures(cell)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .ok_or_else(|| ReportError::reference("folio number", cell))
}

/// Reads the "<currency> <amount>" cells of the grand total row.
pub fn parse_totals(row: &RawRow) -> Result<ReportTotals, ReportError> {
    let short_term = parse_total_amount("short term total", row.columns.get(1))?;
    let long_term = parse_total_amount("long term total", row.columns.get(2))?;
    Ok(ReportTotals {
        short_term,
        long_term,
    })
}

fn parse_total_amount(field: &'static str, cell: Option<&String>) -> Result<f64, ReportError> {
    let cell = cell.map(String::as_str).unwrap_or("");
    cell.split_whitespace()
        .nth(1)
        .and_then(|amount| amount.replace(',', "").parse::<f64>().ok())
        .ok_or_else(|| ReportError::format(field, cell, "amount like 'INR 1,234.56'"))
}
