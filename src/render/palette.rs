//! Named colors loaded from a color sheet.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::import::Sheet;

/// Maps color names to concrete color values (usually `#rrggbb`).
///
/// A color sheet has a `color` column, an optional `pf_color` alias column,
/// and a `hex` column; both names resolve to the hex value.
#[derive(Debug, Clone, Default)]
pub struct Palette {
    colors: HashMap<String, String>,
}

impl Palette {
    /// An empty palette; every name resolves to itself.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a palette from a color sheet.
    pub fn from_sheet(sheet: &Sheet) -> Result<Self> {
        let (Some(hex_idx), Some(color_idx)) = (sheet.column("hex"), sheet.column("color")) else {
            let columns = ["color", "hex"]
                .iter()
                .filter(|c| sheet.column(c).is_none())
                .map(|c| (*c).to_string())
                .collect();
            return Err(Error::MissingColumns {
                sheet: sheet.name().to_string(),
                columns,
            });
        };
        let alias_idx = sheet.column("pf_color");

        let mut palette = Self::new();
        for row in 0..sheet.rows().len() {
            let hex = sheet.cell(row, hex_idx).trim();
            if hex.is_empty() {
                continue;
            }
            let names = std::iter::once(color_idx).chain(alias_idx);
            for idx in names {
                palette.insert(sheet.cell(row, idx), hex);
            }
        }

        tracing::debug!(
            "Loaded {} color names from sheet '{}'",
            palette.len(),
            sheet.name()
        );
        Ok(palette)
    }

    /// Add or replace a named color; empty names are ignored.
    pub fn insert(&mut self, name: &str, value: &str) {
        let name = name.trim();
        if !name.is_empty() {
            self.colors.insert(name.to_string(), value.trim().to_string());
        }
    }

    /// Concrete value for `name`, or `name` itself when unknown.
    #[must_use]
    pub fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        self.colors.get(name.trim()).map_or(name, String::as_str)
    }

    /// Number of known names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Whether no names are known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_sheet_maps_both_names() {
        let sheet = Sheet::parse(
            "Colors",
            "color,pf_color,hex\n\
             green,pf_green,#27ae60\n\
             red,,#e74c3c\n\
             unused,,\n",
        )
        .unwrap();
        let palette = Palette::from_sheet(&sheet).unwrap();

        assert_eq!(palette.len(), 3);
        assert_eq!(palette.resolve("green"), "#27ae60");
        assert_eq!(palette.resolve("pf_green"), "#27ae60");
        assert_eq!(palette.resolve("red"), "#e74c3c");
        assert_eq!(palette.resolve("unused"), "unused");
        assert_eq!(palette.resolve("navy"), "navy");
    }

    #[test]
    fn test_missing_hex_column() {
        let sheet = Sheet::parse("Colors", "color\ngreen\n").unwrap();
        match Palette::from_sheet(&sheet).unwrap_err() {
            Error::MissingColumns { columns, .. } => assert_eq!(columns, ["hex"]),
            other => panic!("unexpected error: {other}"),
        }
    }
}
