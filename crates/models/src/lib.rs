//! Shared types for the capital gains conversion: fund context, the
//! normalised transaction record and the totals declared by the report.

pub mod error;
pub mod record;

use serde::Serialize;

pub use error::ReportError;
pub use record::{
    format_output_date, parse_optional_number, parse_report_date, parse_strict_number,
    OutputRow, RawTransaction, TransactionRecord, OUTPUT_DATE_FORMAT, REPORT_DATE_FORMAT,
};

/// Tax category of a mutual fund as the filing template understands it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FundCategory {
    EquityLike,
    OtherThanEquity,
}

/// Category hints looked for in a fund header, in match priority order.
/// Index funds are labelled "Others" in the report and are taxed as equity.
pub const CATEGORY_HINTS: [(&str, FundCategory); 3] = [
    ("Equity", FundCategory::EquityLike),
    ("Others", FundCategory::EquityLike),
    ("Debt", FundCategory::OtherThanEquity),
];

impl FundCategory {
    /// First hint keyword contained in `text`, checked in `CATEGORY_HINTS` order.
    pub fn from_hint(text: &str) -> Option<Self> {
        CATEGORY_HINTS
            .iter()
            .find(|(hint, _)| text.contains(hint))
            .map(|(_, category)| *category)
    }

    /// Label used in the template's fund type column.
    pub fn label(&self) -> &'static str {
        match self {
            FundCategory::EquityLike => "MF (Equity)",
            FundCategory::OtherThanEquity => "MF (Other than Equity)",
        }
    }

    pub fn is_equity(&self) -> bool {
        matches!(self, FundCategory::EquityLike)
    }
}

/// The fund a run of transaction rows belongs to, as declared by a header row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fund {
    pub name: String,
    pub category: FundCategory,
    /// Only kept for equity-like funds.
    pub isin: Option<String>,
}

impl Fund {
    pub fn new(name: impl Into<String>, category: FundCategory, isin: Option<String>) -> Self {
        Self {
            name: name.into(),
            category,
            isin: isin.filter(|_| category.is_equity()),
        }
    }
}

/// Short and long term gain totals from the report's final "Total" row.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ReportTotals {
    pub short_term: f64,
    pub long_term: f64,
}
