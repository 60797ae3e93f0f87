//! CSV import of workbook sheets and record tables.
//!
//! A workbook is a directory holding one `<sheet>.csv` file per sheet. Sheets
//! are read as plain string grids; [`RecordSchema`] then projects a sheet onto
//! the grouping levels, weight and quality columns of a diagram.
//!
//! ## Example
//!
//! ```rust,ignore
//! use tetris_tree::import::{RecordSchema, Workbook};
//!
//! let workbook = Workbook::open("data/")?;
//! let sheet = workbook.sheet("Staff")?;
//!
//! let schema = RecordSchema::builder()
//!     .levels(["division", "dept"])
//!     .weight_column("fte")
//!     .quality_column("score")
//!     .build();
//!
//! let table = schema.load(&sheet)?;
//! ```

mod records;

pub use records::{Record, RecordSchema, RecordSchemaBuilder, RecordTable};

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

const SHEET_EXTENSION: &str = "csv";

/// A directory of CSV sheets.
#[derive(Debug, Clone)]
pub struct Workbook {
    root: PathBuf,
    sheet_names: Vec<String>,
}

impl Workbook {
    /// Open a workbook directory and index its sheets.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        let mut sheet_names = Vec::new();

        for entry in std::fs::read_dir(&root)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let is_csv = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(SHEET_EXTENSION));
            if let (true, Some(stem)) = (is_csv, path.file_stem().and_then(|s| s.to_str())) {
                sheet_names.push(stem.to_string());
            }
        }
        sheet_names.sort();

        tracing::debug!(
            "Opened workbook {} with {} sheets",
            root.display(),
            sheet_names.len()
        );

        Ok(Self { root, sheet_names })
    }

    /// Directory the workbook was opened from.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Sheet names, sorted.
    #[must_use]
    pub fn sheet_names(&self) -> &[String] {
        &self.sheet_names
    }

    /// Whether a sheet with this exact name exists.
    #[must_use]
    pub fn has_sheet(&self, name: &str) -> bool {
        self.sheet_names.iter().any(|s| s == name)
    }

    /// Read a sheet by name.
    pub fn sheet(&self, name: &str) -> Result<Sheet> {
        if !self.has_sheet(name) {
            return Err(Error::MissingSheet {
                name: name.to_string(),
                workbook: self.root.clone(),
            });
        }
        let path = self.root.join(format!("{name}.{SHEET_EXTENSION}"));
        Sheet::read(name, path)
    }
}

/// A sheet of string cells with a header row.
#[derive(Debug, Clone, Default)]
pub struct Sheet {
    name: String,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Sheet {
    /// Build a sheet from in-memory cells.
    #[must_use]
    pub fn new(name: impl Into<String>, headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            name: name.into(),
            headers,
            rows,
        }
    }

    /// Read a sheet from a CSV file.
    pub fn read(name: impl Into<String>, path: impl AsRef<Path>) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path.as_ref())?;
        Self::from_reader(name, &mut reader)
    }

    /// Read a sheet from CSV text.
    pub fn parse(name: impl Into<String>, text: &str) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(text.as_bytes());
        Self::from_reader(name, &mut reader)
    }

    fn from_reader<R: std::io::Read>(
        name: impl Into<String>,
        reader: &mut csv::Reader<R>,
    ) -> Result<Self> {
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            // Short rows are padded so every row indexes like the header
            let mut row: Vec<String> = record.iter().map(String::from).collect();
            row.resize(headers.len(), String::new());
            rows.push(row);
        }

        Ok(Self::new(name, headers, rows))
    }

    /// Sheet name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Header row.
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Data rows (header excluded).
    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Find a column index, exact match first, then case-insensitive.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h == name)
            .or_else(|| find_header_index(&self.headers, name))
    }

    /// Cell at a row and column, empty when out of range.
    #[must_use]
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map_or("", String::as_str)
    }
}

/// Find a header index by name (case-insensitive).
fn find_header_index(headers: &[String], name: &str) -> Option<usize> {
    let name_lower = name.to_lowercase();
    headers.iter().position(|h| h.to_lowercase() == name_lower)
}
