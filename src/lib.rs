//! # tetris-tree
//!
//! Hierarchical "tetris tree" diagrams from tabular data.
//!
//! Records grouped by an ordered list of levels are laid out by recursive
//! weighted bisection: each step splits a rectangle in two, with areas
//! proportional to the summed weight of the groups assigned to each half.
//! Leaves are colored by threshold rules on their mean quality and labelled
//! with text sized to fit.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tetris_tree::{ColorRule, Diagram, DiagramConfig, SvgRenderer, Workbook};
//!
//! let config = DiagramConfig::builder()
//!     .levels(["division", "dept"])
//!     .weight_field("fte")
//!     .quality_field("score")
//!     .rule(ColorRule::new(">80", "green", ""))
//!     .rule(ColorRule::new("", "gray", ""))
//!     .build()?;
//!
//! let sheet = Workbook::open("data/")?.sheet("Staff")?;
//! let diagram = Diagram::from_sheet(&config, &sheet)?;
//! let svg = SvgRenderer::default().render(&diagram);
//! ```
//!
//! ## Modules
//!
//! - [`error`]: Error types for the library
//! - [`import`]: CSV workbooks and record tables
//! - [`layout`]: Regions, grouping, and the weighted binary splitter
//! - [`cell`]: Leaf color classification and label fitting
//! - [`draw`]: Draw instructions produced by the layout
//! - [`diagram`]: Band composition and diagram configuration
//! - [`render`]: SVG rendering and color palettes
//! - [`jobs`]: Command-sheet batch runs

pub mod cell;
pub mod diagram;
pub mod draw;
pub mod error;
pub mod import;
pub mod jobs;
pub mod layout;
pub mod render;

// Re-export commonly used types
pub use cell::{CellColors, ColorRule, ColorRules, LabelFit, Orientation, fit_label};
pub use diagram::{Band, BandGeometry, Diagram, DiagramConfig};
pub use draw::DrawOp;
pub use error::{Error, Result};
pub use import::{Record, RecordSchema, RecordTable, Sheet, Workbook};
pub use jobs::{BatchReport, BatchRunner, Job, JobOutcome, JobStatus, parse_commands};
pub use layout::{KeyOrder, Region, Splitter};
pub use render::{PageSetup, Palette, SvgRenderer};
