use std::sync::OnceLock;

use models::ReportError;
use scraper::{ElementRef, Html, Selector};

/// Label of the 3-column row carrying the report-wide gain totals.
pub const TOTAL_LABEL: &str = "Total";

/// Text of every `<td>` in one body row of the capital gains table.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawRow {
    pub columns: Vec<String>,
}

impl RawRow {
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn first(&self) -> &str {
        self.columns.first().map(String::as_str).unwrap_or("")
    }

    pub fn kind(&self) -> RowKind {
        classify(self.len(), self.first())
    }
}

/// What a body row means. The report has no explicit row type, so this is
/// inferred from the row's shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    /// Fund name, ISIN and category; more than 10 columns.
    FundHeader,
    /// "Folio No: ..."; a single column.
    Folio,
    /// One redemption lot; exactly 10 columns.
    Transaction,
    /// Per-fund totals; exactly 8 columns.
    FundSubtotal,
    /// Report-wide totals; 3 columns starting with "Total".
    GrandTotal,
    Ignored,
}

pub fn classify(column_count: usize, first_column: &str) -> RowKind {
    match column_count {
        n if n > 10 => RowKind::FundHeader,
        10 => RowKind::Transaction,
        8 => RowKind::FundSubtotal,
        3 if first_column == TOTAL_LABEL => RowKind::GrandTotal,
        1 => RowKind::Folio,
        _ => RowKind::Ignored,
    }
}

fn table_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    SEL.get_or_init(|| Selector::parse("table").expect("invalid table selector"))
}

fn tbody_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    SEL.get_or_init(|| Selector::parse("tbody").expect("invalid tbody selector"))
}

fn tr_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    SEL.get_or_init(|| Selector::parse("tr").expect("invalid tr selector"))
}

fn td_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    SEL.get_or_init(|| Selector::parse("td").expect("invalid td selector"))
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().collect()
}

/// Pulls the body rows out of the second table; the first one is the report
/// preamble.
pub fn extract_rows(html: &str) -> Result<Vec<RawRow>, ReportError> {
    let document = Html::parse_document(html);

    let tables: Vec<ElementRef<'_>> = document.select(table_selector()).collect();
    let table = tables.get(1).ok_or_else(|| {
        ReportError::structural(format!(
            "expected at least 2 tables, found {}",
            tables.len()
        ))
    })?;

    let tbody = table
        .select(tbody_selector())
        .next()
        .ok_or_else(|| ReportError::structural("capital gains table has no body"))?;

    let rows: Vec<RawRow> = tbody
        .select(tr_selector())
        .map(|tr| RawRow::new(tr.select(td_selector()).map(cell_text)))
        .collect();

    if rows.is_empty() {
        return Err(ReportError::structural("capital gains table body has no rows"));
    }

    Ok(rows)
}
