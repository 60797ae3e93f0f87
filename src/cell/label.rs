//! Label size and orientation for a leaf rectangle.

use serde::{Deserialize, Serialize};

use crate::layout::Region;

/// Largest font size ever used for a label.
const MAX_FONT_SIZE: f64 = 24.0;

/// Share of the cross-axis extent a label may occupy.
const CROSS_AXIS_FILL: f64 = 0.9;

/// Text direction of a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Horizontal,
    /// Turned 90° counter-clockwise, reading bottom to top.
    Rotated,
}

impl Orientation {
    /// Rotation in degrees as used by SVG `rotate()`.
    #[must_use]
    pub fn angle(self) -> f64 {
        match self {
            Self::Horizontal => 0.0,
            Self::Rotated => -90.0,
        }
    }
}

/// Result of fitting a label into a region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelFit {
    pub font_size: f64,
    pub orientation: Orientation,
}

/// Pick orientation and font size for `text` inside `region`.
///
/// Portrait regions get rotated text. The size grows with the longer side
/// per character, is capped at 24, and never exceeds 90% of the side that
/// becomes the text height. This is a heuristic: long labels in extreme
/// aspect ratios can still overflow.
#[must_use]
pub fn fit_label(region: &Region, text: &str) -> LabelFit {
    let width = region.width();
    let height = region.height();
    let portrait = region.is_portrait();

    let chars = text.chars().count().max(1) as f64;
    let ratio = width.max(height) / chars;
    let max_point_size = CROSS_AXIS_FILL * if portrait { width } else { height };
    let font_size = max_point_size.min(MAX_FONT_SIZE.min(0.1 * (14.0 * ratio).floor()));

    LabelFit {
        font_size,
        orientation: if portrait {
            Orientation::Rotated
        } else {
            Orientation::Horizontal
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_portrait_label_is_rotated_and_bounded_by_width() {
        let region = Region::from_origin(0.0, 0.0, 10.0, 40.0);
        let fit = fit_label(&region, "Marketing");
        assert_eq!(fit.orientation, Orientation::Rotated);
        assert!(fit.font_size <= 9.0);
        // 40 / 9 chars = 4.44 → floor(62.2) * 0.1
        assert!((fit.font_size - 6.2).abs() < 1e-9);
    }

    #[test]
    fn test_short_label_capped_at_24() {
        let region = Region::from_origin(0.0, 0.0, 200.0, 68.0);
        let fit = fit_label(&region, "R&D");
        assert_eq!(fit.orientation, Orientation::Horizontal);
        assert_eq!(fit.font_size, 24.0);
    }

    #[test]
    fn test_thin_landscape_limited_by_height() {
        let region = Region::from_origin(0.0, 0.0, 100.0, 2.0);
        let fit = fit_label(&region, "Ops");
        assert!((fit.font_size - 1.8).abs() < 1e-9);
    }

    #[test]
    fn test_empty_label_counts_as_one_char() {
        let region = Region::from_origin(0.0, 0.0, 1.0, 0.5);
        let fit = fit_label(&region, "");
        // ratio 1.0 → 1.4, but cross-axis cap is 0.45
        assert!((fit.font_size - 0.45).abs() < 1e-9);
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        let region = Region::from_origin(0.0, 0.0, 40.0, 30.0);
        assert_eq!(
            fit_label(&region, "Åsa").font_size,
            fit_label(&region, "Asa").font_size
        );
    }
}
