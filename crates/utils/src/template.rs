use std::path::Path;

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use models::format_output_date;
use umya_spreadsheet::{reader, writer, Spreadsheet, Worksheet};

pub const NUMBER_FORMAT: &str = "0.00";
pub const DATE_FORMAT: &str = "dd/mm/yyyy";

/// A value written into a template cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Date(NaiveDate),
}

/// The parts of a spreadsheet template the report writer relies on.
///
/// Sheets are addressed by zero-based position; rows and columns are
/// 1-based, as in the spreadsheet itself.
pub trait TemplateWorkbook {
    fn sheet_names(&self) -> Vec<String>;

    fn set_value(&mut self, sheet: usize, row: u32, column: u32, value: CellValue) -> Result<()>;

    fn set_number_format(&mut self, sheet: usize, row: u32, column: u32, format: &str)
        -> Result<()>;

    fn save(&self, destination: &Path) -> Result<()>;
}

/// `.xlsx` template loaded fully into memory. Saving never touches the file it
/// was opened from unless that same path is passed to `save`.
pub struct XlsxTemplate {
    book: Spreadsheet,
}

impl XlsxTemplate {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let book = reader::xlsx::read(path)
            .map_err(|e| anyhow!("Cannot open template {}: {:?}", path.display(), e))?;
        Ok(Self { book })
    }

    pub fn from_spreadsheet(book: Spreadsheet) -> Self {
        Self { book }
    }

    fn sheet_mut(&mut self, index: usize) -> Result<&mut Worksheet> {
        self.book
            .get_sheet_mut(&index)
            .ok_or_else(|| anyhow!("Template has no sheet at position {}", index + 1))
    }
}

impl TemplateWorkbook for XlsxTemplate {
    fn sheet_names(&self) -> Vec<String> {
        self.book
            .get_sheet_collection()
            .iter()
            .map(|s| s.get_name().to_string())
            .collect()
    }

    fn set_value(&mut self, sheet: usize, row: u32, column: u32, value: CellValue) -> Result<()> {
        let cell = self.sheet_mut(sheet)?.get_cell_mut((column, row));
        match value {
            CellValue::Text(s) => {
                cell.set_value_string(s);
            }
            CellValue::Number(n) => {
                cell.set_value_number(n);
            }
            // The filing tool reads dates as dd/mm/yyyy text
            CellValue::Date(d) => {
                cell.set_value_string(format_output_date(d));
            }
        }
        Ok(())
    }

    fn set_number_format(
        &mut self,
        sheet: usize,
        row: u32,
        column: u32,
        format: &str,
    ) -> Result<()> {
        self.sheet_mut(sheet)?
            .get_cell_mut((column, row))
            .get_style_mut()
            .get_number_format_mut()
            .set_format_code(format);
        Ok(())
    }

    fn save(&self, destination: &Path) -> Result<()> {
        writer::xlsx::write(&self.book, destination)
            .map_err(|e| anyhow!("Cannot write workbook {}: {:?}", destination.display(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template_book() -> Spreadsheet {
        let mut book = umya_spreadsheet::new_file();
        let sheet = book.new_sheet("Mutual Fund").unwrap();
        sheet.get_cell_mut((3, 1)).set_value_string("Fund Name");
        book
    }

    #[test]
    fn test_xlsx_template_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let template_path = dir.path().join("template.xlsx");
        let output_path = dir.path().join("output.xlsx");
        writer::xlsx::write(&template_book(), &template_path).unwrap();

        let mut template = XlsxTemplate::open(&template_path).unwrap();
        assert_eq!(template.sheet_names().len(), 2);
        assert_eq!(template.sheet_names()[1], "Mutual Fund");

        template
            .set_value(1, 2, 3, CellValue::Text("Axis Bluechip".to_string()))
            .unwrap();
        template
            .set_value(
                1,
                2,
                5,
                CellValue::Date(NaiveDate::from_ymd_opt(2021, 1, 5).unwrap()),
            )
            .unwrap();
        template.set_value(1, 2, 4, CellValue::Number(12.5)).unwrap();
        template.set_number_format(1, 2, 4, NUMBER_FORMAT).unwrap();
        template.save(&output_path).unwrap();

        let written = reader::xlsx::read(&output_path).unwrap();
        let sheet = written.get_sheet(&1).unwrap();
        assert_eq!(sheet.get_value((3, 1)), "Fund Name");
        assert_eq!(sheet.get_value((3, 2)), "Axis Bluechip");
        assert_eq!(sheet.get_value((5, 2)), "05/01/2021");

        // The template on disk is left as it was
        let original = reader::xlsx::read(&template_path).unwrap();
        assert_eq!(original.get_sheet(&1).unwrap().get_value((3, 2)), "");
    }

    #[test]
    fn test_missing_sheet() {
        let mut template = XlsxTemplate::from_spreadsheet(umya_spreadsheet::new_file());
        let err = template
            .set_value(3, 1, 1, CellValue::Text("x".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains("no sheet at position 4"));
    }

    #[test]
    fn test_open_missing_template() {
        assert!(XlsxTemplate::open("/no/such/template.xlsx").is_err());
    }
}
