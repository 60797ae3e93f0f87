//! Batch jobs driven by a command sheet.
//!
//! Each row of the command sheet describes one diagram: which sheet to read,
//! which columns to use, which color rules apply, and where to write the SVG.
//!
//! | column | meaning |
//! |---|---|
//! | `active` | `#` comments the row out |
//! | `input_sheet` | sheet with the records |
//! | `output_svgfile` | output file name without `.svg` |
//! | `levels` | comma-separated grouping columns, outermost first |
//! | `area` | weight column |
//! | `quality` | quality column |
//! | `color_sheet` | sheet with the named colors |
//! | `rule1`..`rule6`, `bg_color1`.., `fg_color1`.. | color rule slots |

mod runner;

pub use runner::{BatchReport, BatchRunner, JobOutcome, JobStatus};

use serde::{Deserialize, Serialize};

use crate::cell::ColorRule;
use crate::error::{Error, Result};
use crate::import::Sheet;

/// Number of color rule slots in a command row.
pub const RULE_SLOTS: usize = 6;

const REQUIRED_COLUMNS: [&str; 7] = [
    "active",
    "input_sheet",
    "output_svgfile",
    "levels",
    "area",
    "quality",
    "color_sheet",
];

/// One row of the command sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// 0-based row index in the command sheet.
    pub index: usize,
    pub active: bool,
    pub input_sheet: String,
    /// Output file name, `.svg` included.
    pub output_file: String,
    pub levels: Vec<String>,
    pub area: String,
    pub quality: String,
    pub color_sheet: String,
    /// Rules from the slots whose background color is set, in slot order.
    pub rules: Vec<ColorRule>,
}

impl Job {
    /// `levels` as written in the command row, e.g. `division/dept`.
    #[must_use]
    pub fn level_path(&self) -> String {
        self.levels.join("/")
    }
}

/// Read every job of a command sheet.
///
/// Only the sheet's shape is validated here; problems with individual jobs
/// surface when they run.
pub fn parse_commands(sheet: &Sheet) -> Result<Vec<Job>> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| sheet.column(c).is_none())
        .map(|c| (*c).to_string())
        .collect();
    if !missing.is_empty() {
        return Err(Error::MissingColumns {
            sheet: sheet.name().to_string(),
            columns: missing,
        });
    }

    let get = |row: usize, column: &str| -> String {
        sheet
            .column(column)
            .map(|i| sheet.cell(row, i).trim().to_string())
            .unwrap_or_default()
    };

    let mut jobs = Vec::with_capacity(sheet.rows().len());
    for row in 0..sheet.rows().len() {
        let mut rules = Vec::new();
        for slot in 1..=RULE_SLOTS {
            let bg = get(row, &format!("bg_color{slot}"));
            if !bg.is_empty() {
                rules.push(ColorRule::new(
                    get(row, &format!("rule{slot}")),
                    bg,
                    get(row, &format!("fg_color{slot}")),
                ));
            }
        }

        let output = get(row, "output_svgfile");
        jobs.push(Job {
            index: row,
            active: !get(row, "active").starts_with('#'),
            input_sheet: get(row, "input_sheet"),
            output_file: format!("{output}.svg"),
            levels: parse_levels(&get(row, "levels")),
            area: get(row, "area"),
            quality: get(row, "quality"),
            color_sheet: get(row, "color_sheet"),
            rules,
        });
    }
    Ok(jobs)
}

/// Split `a, b ,c` into `["a", "b", "c"]`; spaces are dropped everywhere.
fn parse_levels(levels: &str) -> Vec<String> {
    levels
        .replace(' ', "")
        .split(',')
        .map(String::from)
        .collect()
}
