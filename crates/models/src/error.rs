use thiserror::Error;

/// Fatal problems found while reading a capital gains report.
///
/// Optional fields (cutoff value, short/long term gains) never produce one of
/// these: they are stored as absent instead.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ReportError {
    /// The document does not have the expected table layout.
    #[error("unexpected report structure: {0}")]
    Structural(String),

    /// A mandatory field could not be read as its expected type.
    #[error("invalid {field}: '{value}' is not a valid {expected}")]
    Format {
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    /// A label that must be present in a row could not be found.
    #[error("no {label} found in '{text}'")]
    Reference { label: &'static str, text: String },

    #[error("row {row}: {source}")]
    AtRow {
        row: usize,
        #[source]
        source: Box<ReportError>,
    },
}

impl ReportError {
    pub fn structural(message: impl Into<String>) -> Self {
        ReportError::Structural(message.into())
    }

    pub fn format(field: &'static str, value: &str, expected: &'static str) -> Self {
        ReportError::Format {
            field,
            value: value.to_string(),
            expected,
        }
    }

    pub fn reference(label: &'static str, text: &str) -> Self {
        ReportError::Reference {
            label,
            text: text.to_string(),
        }
    }

    /// Attach the 1-based body row number the error was raised on.
    pub fn at_row(self, row: usize) -> Self {
        ReportError::AtRow {
            row,
            source: Box::new(self),
        }
    }

    /// The innermost error, with any row wrapping removed.
    pub fn root(&self) -> &ReportError {
        match self {
            ReportError::AtRow { source, .. } => source.root(),
            other => other,
        }
    }

    pub fn row(&self) -> Option<usize> {
        match self {
            ReportError::AtRow { row, .. } => Some(*row),
            _ => None,
        }
    }
}
