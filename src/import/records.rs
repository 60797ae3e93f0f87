//! Projection of a sheet onto diagram records.

use serde::{Deserialize, Serialize};

use super::Sheet;
use crate::error::{Error, Result};

/// One source row, reduced to what the layout needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Grouping-level values, outermost first.
    pub path: Vec<String>,
    /// Area weight (never negative).
    pub weight: f64,
    /// Quality value, `None` when the cell was empty.
    pub quality: Option<f64>,
}

impl Record {
    /// Create a record.
    #[must_use]
    pub fn new<S: Into<String>>(
        path: impl IntoIterator<Item = S>,
        weight: f64,
        quality: Option<f64>,
    ) -> Self {
        Self {
            path: path.into_iter().map(Into::into).collect(),
            weight,
            quality,
        }
    }

    /// Value of a grouping level, used as label text.
    #[must_use]
    pub fn level_value(&self, level: usize) -> &str {
        self.path.get(level).map_or("", String::as_str)
    }
}

/// Records of one sheet together with the column names they came from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordTable {
    /// Grouping-level column names, outermost first.
    pub levels: Vec<String>,
    /// Weight column name.
    pub weight_column: String,
    /// Quality column name.
    pub quality_column: String,
    /// Rows in sheet order.
    pub records: Vec<Record>,
}

impl RecordTable {
    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sum of all weights.
    #[must_use]
    pub fn total_weight(&self) -> f64 {
        self.records.iter().map(|r| r.weight).sum()
    }
}

/// Which sheet columns feed a diagram.
#[derive(Debug, Clone, Default)]
pub struct RecordSchema {
    /// Grouping-level columns, outermost first.
    pub levels: Vec<String>,
    /// Column holding the area weight.
    pub weight_column: String,
    /// Column holding the quality value.
    pub quality_column: String,
}

impl RecordSchema {
    /// Create a schema builder.
    #[must_use]
    pub fn builder() -> RecordSchemaBuilder {
        RecordSchemaBuilder::default()
    }

    /// Check that every configured column exists in `sheet`.
    ///
    /// All absent columns are reported together.
    pub fn validate(&self, sheet: &Sheet) -> Result<()> {
        let missing: Vec<String> = self
            .levels
            .iter()
            .chain([&self.weight_column, &self.quality_column])
            .filter(|c| sheet.column(c).is_none())
            .cloned()
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::MissingColumns {
                sheet: sheet.name().to_string(),
                columns: missing,
            })
        }
    }

    /// Load the records of `sheet`.
    pub fn load(&self, sheet: &Sheet) -> Result<RecordTable> {
        self.validate(sheet)?;

        // validate() guarantees every lookup below succeeds
        let level_idx: Vec<usize> = self
            .levels
            .iter()
            .filter_map(|c| sheet.column(c))
            .collect();
        let weight_idx = sheet.column(&self.weight_column).unwrap_or_default();
        let quality_idx = sheet.column(&self.quality_column).unwrap_or_default();

        let mut records = Vec::with_capacity(sheet.rows().len());
        for row in 0..sheet.rows().len() {
            let line = row + 2; // +2 for 1-based and header

            let path = level_idx.iter().map(|&i| sheet.cell(row, i).to_string());
            let weight = parse_weight(sheet.cell(row, weight_idx)).ok_or_else(|| {
                Error::InvalidValue {
                    line,
                    column: self.weight_column.clone(),
                    value: sheet.cell(row, weight_idx).to_string(),
                }
            })?;
            let quality = parse_quality(sheet.cell(row, quality_idx)).map_err(|()| {
                Error::InvalidValue {
                    line,
                    column: self.quality_column.clone(),
                    value: sheet.cell(row, quality_idx).to_string(),
                }
            })?;

            records.push(Record::new(path, weight, quality));
        }

        tracing::debug!(
            "Loaded {} records from sheet '{}'",
            records.len(),
            sheet.name()
        );

        Ok(RecordTable {
            levels: self.levels.clone(),
            weight_column: self.weight_column.clone(),
            quality_column: self.quality_column.clone(),
            records,
        })
    }
}

/// Builder for record schemas.
#[derive(Debug, Default)]
pub struct RecordSchemaBuilder {
    schema: RecordSchema,
}

impl RecordSchemaBuilder {
    /// Set the grouping-level columns, outermost first.
    #[must_use]
    pub fn levels<S: Into<String>>(mut self, levels: impl IntoIterator<Item = S>) -> Self {
        self.schema.levels = levels.into_iter().map(Into::into).collect();
        self
    }

    /// Set the weight column name.
    #[must_use]
    pub fn weight_column(mut self, name: impl Into<String>) -> Self {
        self.schema.weight_column = name.into();
        self
    }

    /// Set the quality column name.
    #[must_use]
    pub fn quality_column(mut self, name: impl Into<String>) -> Self {
        self.schema.quality_column = name.into();
        self
    }

    /// Build the schema.
    #[must_use]
    pub fn build(self) -> RecordSchema {
        self.schema
    }
}

/// Empty weights count as zero; negative or non-finite weights are rejected.
fn parse_weight(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Some(0.0);
    }
    cell.parse::<f64>()
        .ok()
        .filter(|w| w.is_finite() && *w >= 0.0)
}

fn parse_quality(cell: &str) -> std::result::Result<Option<f64>, ()> {
    let cell = cell.trim();
    if cell.is_empty() || cell.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    cell.parse::<f64>().map(Some).map_err(|_| ())
}
