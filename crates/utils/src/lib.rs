pub mod capital_gains;
pub mod template;

// Re-export commonly used items
pub use crate::capital_gains::{fill_mutual_fund_sheet, write_capital_gains_report, WriteSummary};
pub use crate::template::{CellValue, TemplateWorkbook, XlsxTemplate};
