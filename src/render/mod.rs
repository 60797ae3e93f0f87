//! Rendering of laid-out diagrams.
//!
//! - [`Palette`]: named colors from a color sheet
//! - [`SvgRenderer`]: SVG documents in millimetre user units

mod palette;
pub mod svg;

pub use palette::Palette;
pub use svg::{Margins, PageSetup, SvgRenderer};
