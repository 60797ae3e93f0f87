//! Error types for tetris-tree operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for tetris-tree operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading, laying out, or rendering a diagram.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// One or more configured columns are absent from a sheet.
    #[error("Missing columns in sheet '{sheet}': {}", columns.join(", "))]
    MissingColumns {
        /// Sheet that was inspected.
        sheet: String,
        /// Every configured column that could not be found.
        columns: Vec<String>,
    },

    /// A sheet referenced by a job does not exist in the workbook.
    #[error("Missing sheet '{name}' in workbook {}", workbook.display())]
    MissingSheet {
        /// Sheet name.
        name: String,
        /// Workbook directory.
        workbook: PathBuf,
    },

    /// A color rule could not be parsed or is out of place.
    #[error("Invalid color rule #{index} '{rule}': {reason}")]
    InvalidColorRule {
        /// 1-based position of the rule in its list.
        index: usize,
        /// Rule text as given.
        rule: String,
        /// Why the rule was rejected.
        reason: String,
    },

    /// The color rule list has no trailing default (empty rule) entry.
    #[error("Color rule list must end with exactly one default entry (empty rule)")]
    MissingDefaultRule,

    /// Diagram configuration is unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A cell could not be interpreted as the type its column requires.
    #[error("Invalid value at line {line}, column '{column}': '{value}'")]
    InvalidValue {
        /// 1-based line number in the source file (header is line 1).
        line: usize,
        /// Column name.
        column: String,
        /// Offending cell content.
        value: String,
    },

    /// I/O error wrapper.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    /// Whether this error only invalidates a single diagram.
    ///
    /// Configuration errors are recovered per job by the batch runner;
    /// everything else aborts the batch.
    #[must_use]
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Self::MissingColumns { .. }
                | Self::MissingSheet { .. }
                | Self::InvalidColorRule { .. }
                | Self::MissingDefaultRule
                | Self::InvalidConfig(_)
                | Self::InvalidValue { .. }
        )
    }
}
