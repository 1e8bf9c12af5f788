use models::{ReportTotals, TransactionRecord};
use serde::Serialize;

/// Gain sums computed from the parsed lots next to the totals the report
/// declares. The two are expected to agree but are never forced to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Reconciliation {
    pub short_term_sum: f64,
    pub short_term_reported: Option<f64>,
    pub long_term_sum: f64,
    pub long_term_reported: Option<f64>,
}

impl Reconciliation {
    pub fn new(transactions: &[TransactionRecord], totals: Option<&ReportTotals>) -> Self {
        Self {
            short_term_sum: transactions.iter().filter_map(|t| t.short_term_gain).sum(),
            short_term_reported: totals.map(|t| t.short_term),
            long_term_sum: transactions.iter().filter_map(|t| t.long_term_gain).sum(),
            long_term_reported: totals.map(|t| t.long_term),
        }
    }

    pub fn short_term_difference(&self) -> Option<f64> {
        self.short_term_reported.map(|r| self.short_term_sum - r)
    }

    pub fn long_term_difference(&self) -> Option<f64> {
        self.long_term_reported.map(|r| self.long_term_sum - r)
    }

    /// True when both reported totals exist and match the sums within `tolerance`.
    pub fn is_balanced(&self, tolerance: f64) -> bool {
        match (self.short_term_difference(), self.long_term_difference()) {
            (Some(st), Some(lt)) => st.abs() <= tolerance && lt.abs() <= tolerance,
            _ => false,
        }
    }
}
