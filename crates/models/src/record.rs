use chrono::NaiveDate;
use serde::Serialize;

use crate::{Fund, FundCategory, ReportError};

/// Date layout used by the report, e.g. "Jan 5, 2021".
pub const REPORT_DATE_FORMAT: &str = "%b %d, %Y";
/// Date layout expected by the filing template.
pub const OUTPUT_DATE_FORMAT: &str = "%d/%m/%Y";

/// The ten cells of a transaction row, in report column order.
#[derive(Debug, Clone, Copy)]
pub struct RawTransaction<'a> {
    pub serial_no: &'a str,
    pub units: &'a str,
    pub purchase_date: &'a str,
    pub purchase_value: &'a str,
    pub acquisition_value: &'a str,
    pub cutoff_value: &'a str,
    pub redemption_date: &'a str,
    pub redemption_value: &'a str,
    pub short_term_gain: &'a str,
    pub long_term_gain: &'a str,
}

impl<'a> RawTransaction<'a> {
    pub const COLUMNS: usize = 10;

    pub fn from_columns(columns: &'a [String]) -> Result<Self, ReportError> {
        let [
            serial_no,
            units,
            purchase_date,
            purchase_value,
            acquisition_value,
            cutoff_value,
            redemption_date,
            redemption_value,
            short_term_gain,
            long_term_gain,
        ] = columns
        else {
            return Err(ReportError::structural(format!(
                "transaction row has {} columns, expected {}",
                columns.len(),
                Self::COLUMNS
            )));
        };

        Ok(Self {
            serial_no,
            units,
            purchase_date,
            purchase_value,
            acquisition_value,
            cutoff_value,
            redemption_date,
            redemption_value,
            short_term_gain,
            long_term_gain,
        })
    }
}

/// One redemption lot from the capital gains report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionRecord {
    pub fund_name: String,
    pub category: FundCategory,
    pub isin: Option<String>,
    /// Absent when no "Folio No" row preceded the lot.
    pub folio: Option<String>,
    pub serial_no: u32,
    pub units: f64,
    pub purchase_date: NaiveDate,
    pub purchase_value: f64,
    pub acquisition_value: f64,
    /// Fair market value on 31 Jan 2018; blank for lots bought after it.
    pub cutoff_value: Option<f64>,
    pub redemption_date: NaiveDate,
    pub redemption_value: f64,
    pub short_term_gain: Option<f64>,
    pub long_term_gain: Option<f64>,
}

impl TransactionRecord {
    pub fn from_raw(
        fund: &Fund,
        folio: Option<&str>,
        raw: &RawTransaction<'_>,
    ) -> Result<Self, ReportError> {
        let serial_no = raw
            .serial_no
            .trim()
            .parse::<u32>()
            .map_err(|_| ReportError::format("serial number", raw.serial_no, "integer"))?;

        Ok(Self {
            fund_name: fund.name.clone(),
            category: fund.category,
            isin: fund.isin.clone().filter(|_| fund.category.is_equity()),
            folio: folio.map(str::to_string),
            serial_no,
            units: parse_strict_number("units", raw.units)?,
            purchase_date: parse_report_date("purchase date", raw.purchase_date)?,
            purchase_value: parse_strict_number("purchase value", raw.purchase_value)?,
            acquisition_value: parse_strict_number("acquisition value", raw.acquisition_value)?,
            cutoff_value: parse_optional_number(raw.cutoff_value, false),
            redemption_date: parse_report_date("redemption date", raw.redemption_date)?,
            redemption_value: parse_strict_number("redemption value", raw.redemption_value)?,
            short_term_gain: parse_optional_number(raw.short_term_gain, true),
            long_term_gain: parse_optional_number(raw.long_term_gain, true),
        })
    }

    pub fn redemption_value_per_unit(&self) -> Option<f64> {
        per_unit(Some(self.redemption_value), self.units)
    }

    pub fn cutoff_value_per_unit(&self) -> Option<f64> {
        per_unit(self.cutoff_value, self.units)
    }

    /// Values in the order the mutual fund sheet expects them.
    pub fn output_row(&self) -> OutputRow<'_> {
        OutputRow {
            fund_type: self.category.label(),
            isin: self.isin.as_deref(),
            fund_name: &self.fund_name,
            units: self.units,
            purchase_date: self.purchase_date,
            purchase_value: self.purchase_value,
            redemption_date: self.redemption_date,
            redemption_value: self.redemption_value,
            redemption_value_per_unit: self.redemption_value_per_unit(),
            cutoff_value_per_unit: self.cutoff_value_per_unit(),
            transfer_expenses: 0.0,
        }
    }
}

/// Template-facing view of a record.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputRow<'a> {
    pub fund_type: &'static str,
    pub isin: Option<&'a str>,
    pub fund_name: &'a str,
    pub units: f64,
    pub purchase_date: NaiveDate,
    pub purchase_value: f64,
    pub redemption_date: NaiveDate,
    pub redemption_value: f64,
    pub redemption_value_per_unit: Option<f64>,
    pub cutoff_value_per_unit: Option<f64>,
    // Stamp duty, brokerage etc. The template has no column mapped to it yet.
    pub transfer_expenses: f64,
}

fn per_unit(value: Option<f64>, units: f64) -> Option<f64> {
    if units == 0.0 {
        return None;
    }
    value.map(|v| v / units)
}

pub fn parse_report_date(field: &'static str, raw: &str) -> Result<NaiveDate, ReportError> {
    NaiveDate::parse_from_str(raw.trim(), REPORT_DATE_FORMAT)
        .map_err(|_| ReportError::format(field, raw, "date like 'Jan 5, 2021'"))
}

pub fn format_output_date(date: NaiveDate) -> String {
    date.format(OUTPUT_DATE_FORMAT).to_string()
}

pub fn parse_strict_number(field: &'static str, raw: &str) -> Result<f64, ReportError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| ReportError::format(field, raw, "number"))
}

/// Parses a cell that is allowed to be blank or a placeholder such as "-".
/// Anything unparseable is treated as absent.
pub fn parse_optional_number(raw: &str, strip_grouping: bool) -> Option<f64> {
    let s = if strip_grouping {
        raw.trim().replace(',', "")
    } else {
        raw.trim().to_string()
    };
    s.parse::<f64>().ok()
}
