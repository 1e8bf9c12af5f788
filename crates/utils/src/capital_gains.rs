//! Fills the mutual fund sheet of the ClearTax capital gains template.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use log::{debug, info};
use models::{OutputRow, TransactionRecord};

use crate::template::{CellValue, TemplateWorkbook, XlsxTemplate, DATE_FORMAT, NUMBER_FORMAT};

/// Position of the mutual fund sheet in the template.
pub const MUTUAL_FUND_SHEET: usize = 1;
/// Row 1 holds the template's headers.
pub const FIRST_DATA_ROW: u32 = 2;

/// Template columns written by the writer. Columns 9, 11 and 13 hold the
/// template's own formulas and are never written.
pub mod column {
    pub const FUND_TYPE: u32 = 1;
    pub const ISIN: u32 = 2;
    pub const FUND_NAME: u32 = 3;
    pub const UNITS: u32 = 4;
    pub const PURCHASE_DATE: u32 = 5;
    pub const PURCHASE_VALUE: u32 = 6;
    pub const REDEMPTION_DATE: u32 = 7;
    pub const REDEMPTION_VALUE: u32 = 8;
    pub const REDEMPTION_VALUE_PER_UNIT: u32 = 10;
    pub const CUTOFF_VALUE_PER_UNIT: u32 = 12;
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedCell {
    pub column: u32,
    pub value: CellValue,
    pub format: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WriteSummary {
    pub rows_written: usize,
    pub sheet_name: String,
    pub destination: PathBuf,
}

/// Cells to write for one record. Absent values are left out so the template
/// cell stays untouched.
pub fn project(row: &OutputRow<'_>) -> Vec<ProjectedCell> {
    let text = |s: &str| Some(CellValue::Text(s.to_string()));
    let number = |n: f64| Some(CellValue::Number(n));

    [
        (column::FUND_TYPE, text(row.fund_type), None),
        (column::ISIN, row.isin.and_then(text), None),
        (column::FUND_NAME, text(row.fund_name), None),
        (column::UNITS, number(row.units), Some(NUMBER_FORMAT)),
        (
            column::PURCHASE_DATE,
            Some(CellValue::Date(row.purchase_date)),
            Some(DATE_FORMAT),
        ),
        (column::PURCHASE_VALUE, number(row.purchase_value), Some(NUMBER_FORMAT)),
        (
            column::REDEMPTION_DATE,
            Some(CellValue::Date(row.redemption_date)),
            Some(DATE_FORMAT),
        ),
        (column::REDEMPTION_VALUE, number(row.redemption_value), Some(NUMBER_FORMAT)),
        (
            column::REDEMPTION_VALUE_PER_UNIT,
            row.redemption_value_per_unit.and_then(number),
            Some(NUMBER_FORMAT),
        ),
        (
            column::CUTOFF_VALUE_PER_UNIT,
            row.cutoff_value_per_unit.and_then(number),
            Some(NUMBER_FORMAT),
        ),
    ]
    .into_iter()
    .filter_map(|(column, value, format)| {
        value.map(|value| ProjectedCell {
            column,
            value,
            format,
        })
    })
    .collect()
}

/// Writes one template row per record, starting at row 2, in the given order.
pub fn fill_mutual_fund_sheet<W: TemplateWorkbook + ?Sized>(
    workbook: &mut W,
    records: &[TransactionRecord],
) -> Result<usize> {
    let sheets = workbook.sheet_names();
    if sheets.len() <= MUTUAL_FUND_SHEET {
        bail!(
            "Template has {} sheet(s); the mutual fund sheet is expected at position {}",
            sheets.len(),
            MUTUAL_FUND_SHEET + 1
        );
    }

    for (i, record) in records.iter().enumerate() {
        let row = FIRST_DATA_ROW + i as u32;
        for cell in project(&record.output_row()) {
            workbook
                .set_value(MUTUAL_FUND_SHEET, row, cell.column, cell.value)
                .with_context(|| format!("Writing row {} column {}", row, cell.column))?;
            if let Some(format) = cell.format {
                workbook.set_number_format(MUTUAL_FUND_SHEET, row, cell.column, format)?;
            }
        }
        debug!("row {}: {} #{}", row, record.fund_name, record.serial_no);
    }

    Ok(records.len())
}

/// Copies the template to `destination` with the mutual fund sheet filled in.
pub fn write_capital_gains_report(
    records: &[TransactionRecord],
    template: &Path,
    destination: &Path,
) -> Result<WriteSummary> {
    let mut workbook = XlsxTemplate::open(template)?;
    let sheet_name = workbook
        .sheet_names()
        .get(MUTUAL_FUND_SHEET)
        .cloned()
        .unwrap_or_default();

    let rows_written = fill_mutual_fund_sheet(&mut workbook, records)
        .with_context(|| format!("Filling template {}", template.display()))?;

    if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Creating output dir: {}", parent.display()))?;
    }
    workbook.save(destination)?;

    info!(
        "{} rows written to sheet '{}' of {}",
        rows_written,
        sheet_name,
        destination.display()
    );

    Ok(WriteSummary {
        rows_written,
        sheet_name,
        destination: destination.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use models::FundCategory;
    use std::cell::RefCell;
    use std::collections::BTreeMap;

    #[derive(Default)]
    struct FakeWorkbook {
        sheets: Vec<String>,
        values: BTreeMap<(usize, u32, u32), CellValue>,
        formats: BTreeMap<(usize, u32, u32), String>,
        saved_to: RefCell<Vec<PathBuf>>,
    }

    impl FakeWorkbook {
        fn with_sheets(names: &[&str]) -> Self {
            Self {
                sheets: names.iter().map(|s| s.to_string()).collect(),
                ..Default::default()
            }
        }

        fn value(&self, row: u32, column: u32) -> Option<&CellValue> {
            self.values.get(&(MUTUAL_FUND_SHEET, row, column))
        }

        fn format(&self, row: u32, column: u32) -> Option<&str> {
            self.formats
                .get(&(MUTUAL_FUND_SHEET, row, column))
                .map(String::as_str)
        }
    }

    impl TemplateWorkbook for FakeWorkbook {
        fn sheet_names(&self) -> Vec<String> {
            self.sheets.clone()
        }

        fn set_value(&mut self, sheet: usize, row: u32, column: u32, value: CellValue) -> Result<()> {
            self.values.insert((sheet, row, column), value);
            Ok(())
        }

        fn set_number_format(
            &mut self,
            sheet: usize,
            row: u32,
            column: u32,
            format: &str,
        ) -> Result<()> {
            self.formats.insert((sheet, row, column), format.to_string());
            Ok(())
        }

        fn save(&self, destination: &Path) -> Result<()> {
            self.saved_to.borrow_mut().push(destination.to_path_buf());
            Ok(())
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn equity_record() -> TransactionRecord {
        TransactionRecord {
            fund_name: "Axis Bluechip Fund".to_string(),
            category: FundCategory::EquityLike,
            isin: Some("INF846K01DP8".to_string()),
            folio: Some("91012345678".to_string()),
            serial_no: 1,
            units: 10.0,
            purchase_date: date(2017, 6, 1),
            purchase_value: 1000.0,
            acquisition_value: 1100.0,
            cutoff_value: Some(1200.0),
            redemption_date: date(2021, 1, 5),
            redemption_value: 1500.0,
            short_term_gain: None,
            long_term_gain: Some(300.0),
        }
    }

    fn debt_record() -> TransactionRecord {
        TransactionRecord {
            fund_name: "HDFC Liquid Fund".to_string(),
            category: FundCategory::OtherThanEquity,
            isin: None,
            folio: Some("555".to_string()),
            serial_no: 2,
            units: 4.0,
            purchase_date: date(2020, 3, 1),
            purchase_value: 400.0,
            acquisition_value: 400.0,
            cutoff_value: None,
            redemption_date: date(2020, 9, 1),
            redemption_value: 410.0,
            short_term_gain: Some(10.0),
            long_term_gain: None,
        }
    }

    #[test]
    fn test_fill_writes_fixed_columns() {
        let mut wb = FakeWorkbook::with_sheets(&["Stocks", "Mutual Funds"]);
        let written = fill_mutual_fund_sheet(&mut wb, &[equity_record(), debt_record()]).unwrap();
        assert_eq!(written, 2);

        assert_eq!(wb.value(2, 1), Some(&CellValue::Text("MF (Equity)".to_string())));
        assert_eq!(wb.value(2, 2), Some(&CellValue::Text("INF846K01DP8".to_string())));
        assert_eq!(wb.value(2, 3), Some(&CellValue::Text("Axis Bluechip Fund".to_string())));
        assert_eq!(wb.value(2, 4), Some(&CellValue::Number(10.0)));
        assert_eq!(wb.value(2, 5), Some(&CellValue::Date(date(2017, 6, 1))));
        assert_eq!(wb.value(2, 6), Some(&CellValue::Number(1000.0)));
        assert_eq!(wb.value(2, 7), Some(&CellValue::Date(date(2021, 1, 5))));
        assert_eq!(wb.value(2, 8), Some(&CellValue::Number(1500.0)));
        assert_eq!(wb.value(2, 10), Some(&CellValue::Number(150.0)));
        assert_eq!(wb.value(2, 12), Some(&CellValue::Number(120.0)));

        assert_eq!(
            wb.value(3, 1),
            Some(&CellValue::Text("MF (Other than Equity)".to_string()))
        );
        assert_eq!(wb.value(3, 10), Some(&CellValue::Number(102.5)));
    }

    #[test]
    fn test_absent_values_leave_cells_untouched() {
        let mut wb = FakeWorkbook::with_sheets(&["Stocks", "Mutual Funds"]);
        fill_mutual_fund_sheet(&mut wb, &[debt_record()]).unwrap();

        assert_eq!(wb.value(2, 2), None);
        assert_eq!(wb.value(2, 12), None);
        assert_eq!(wb.format(2, 12), None);
    }

    #[test]
    fn test_formula_columns_are_never_written() {
        let mut wb = FakeWorkbook::with_sheets(&["Stocks", "Mutual Funds"]);
        fill_mutual_fund_sheet(&mut wb, &[equity_record(), debt_record()]).unwrap();

        for (_, row, column) in wb.values.keys() {
            assert!(![9, 11, 13].contains(column), "row {row} column {column} written");
            assert!(*row >= FIRST_DATA_ROW);
        }
        assert!(wb.values.keys().all(|(sheet, _, _)| *sheet == MUTUAL_FUND_SHEET));
    }

    #[test]
    fn test_number_and_date_formats() {
        let mut wb = FakeWorkbook::with_sheets(&["Stocks", "Mutual Funds"]);
        fill_mutual_fund_sheet(&mut wb, &[equity_record()]).unwrap();

        for column in [4, 6, 8, 10, 12] {
            assert_eq!(wb.format(2, column), Some(NUMBER_FORMAT));
        }
        for column in [5, 7] {
            assert_eq!(wb.format(2, column), Some(DATE_FORMAT));
        }
        for column in [1, 2, 3] {
            assert_eq!(wb.format(2, column), None);
        }
    }

    #[test]
    fn test_template_without_mutual_fund_sheet() {
        let mut wb = FakeWorkbook::with_sheets(&["Only"]);
        let err = fill_mutual_fund_sheet(&mut wb, &[equity_record()]).unwrap_err();
        assert!(err.to_string().contains("position 2"));
        assert!(wb.values.is_empty());
        assert!(wb.saved_to.borrow().is_empty());
    }

    #[test]
    fn test_write_report_to_new_file() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("cleartax.xlsx");
        let destination = dir.path().join("out").join("filled.xlsx");

        let mut book = umya_spreadsheet::new_file();
        book.new_sheet("Mutual Funds").unwrap();
        umya_spreadsheet::writer::xlsx::write(&book, &template).unwrap();

        let summary =
            write_capital_gains_report(&[equity_record(), debt_record()], &template, &destination)
                .unwrap();
        assert_eq!(summary.rows_written, 2);
        assert_eq!(summary.sheet_name, "Mutual Funds");
        assert!(destination.exists());

        let written = umya_spreadsheet::reader::xlsx::read(&destination).unwrap();
        let sheet = written.get_sheet(&MUTUAL_FUND_SHEET).unwrap();
        assert_eq!(sheet.get_value((3, 2)), "Axis Bluechip Fund");
        assert_eq!(sheet.get_value((3, 3)), "HDFC Liquid Fund");
        assert_eq!(sheet.get_value((7, 2)), "05/01/2021");
    }
}
