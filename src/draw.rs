//! Draw instructions produced by the layout.
//!
//! The layout never formats output itself; it emits a sequence of these
//! values in paint order and a renderer turns them into a document.

use serde::{Deserialize, Serialize};

use crate::cell::{CellColors, LabelFit, Orientation};
use crate::layout::Region;

/// One drawing primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    /// Fill `region` with `color`.
    FillRect { region: Region, color: String },
    /// Draw `text` centered in `region`.
    Text {
        region: Region,
        text: String,
        font_size: f64,
        color: String,
        orientation: Orientation,
    },
}

impl DrawOp {
    /// Fill and label ops for one leaf cell, in paint order.
    #[must_use]
    pub fn cell(region: Region, colors: CellColors, text: String, fit: LabelFit) -> [Self; 2] {
        [
            Self::FillRect {
                region,
                color: colors.bg,
            },
            Self::Text {
                region,
                text,
                font_size: fit.font_size,
                color: colors.fg,
                orientation: fit.orientation,
            },
        ]
    }

    /// Region the op paints into.
    #[must_use]
    pub fn region(&self) -> &Region {
        match self {
            Self::FillRect { region, .. } | Self::Text { region, .. } => region,
        }
    }
}
