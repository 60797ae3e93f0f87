//! Leaf cell policy: color classification and label fitting.

mod classify;
mod label;

pub use classify::{CellColors, ColorRule, ColorRules, Comparison, DEFAULT_FOREGROUND, mean_quality};
pub use label::{LabelFit, Orientation, fit_label};
