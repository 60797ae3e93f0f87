//! SVG output for tetris-tree diagrams.
//!
//! Coordinates of the diagram are used directly as SVG user units, and the
//! document is sized so that one user unit is one millimetre on the page.
//! Page margins shift the whole drawing; nothing else is transformed.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};

use super::Palette;
use crate::cell::Orientation;
use crate::diagram::{Band, Diagram};
use crate::draw::DrawOp;

/// Page margins in millimetres.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

/// Page size and margins in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSetup {
    pub width: f64,
    pub height: f64,
    pub margins: Margins,
}

impl Default for PageSetup {
    fn default() -> Self {
        Self::a4_portrait()
    }
}

impl PageSetup {
    /// A4, 210 × 297 mm, no margins.
    #[must_use]
    pub fn a4_portrait() -> Self {
        Self {
            width: 210.0,
            height: 297.0,
            margins: Margins::default(),
        }
    }

    /// A4 turned sideways, 297 × 210 mm, no margins.
    #[must_use]
    pub fn a4_landscape() -> Self {
        Self {
            width: 297.0,
            height: 210.0,
            margins: Margins::default(),
        }
    }

    /// Sets the margins.
    #[must_use]
    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }
}

/// Renders [`Diagram`]s as standalone SVG documents.
#[derive(Debug, Clone, Default)]
pub struct SvgRenderer {
    page: PageSetup,
    palette: Palette,
    cell_stroke: Option<String>,
    generated_at: Option<DateTime<Utc>>,
}

impl SvgRenderer {
    /// Creates a renderer for a page, resolving color names through `palette`.
    #[must_use]
    pub fn new(page: PageSetup, palette: Palette) -> Self {
        Self {
            page,
            palette,
            cell_stroke: Some("white".to_string()),
            generated_at: None,
        }
    }

    /// Sets the outline color of cells, `None` for no outline.
    #[must_use]
    pub fn with_cell_stroke(mut self, stroke: Option<String>) -> Self {
        self.cell_stroke = stroke;
        self
    }

    /// Records a generation time in the document description.
    #[must_use]
    pub fn with_timestamp(mut self, at: DateTime<Utc>) -> Self {
        self.generated_at = Some(at);
        self
    }

    /// Renders the whole document.
    #[must_use]
    pub fn render(&self, diagram: &Diagram) -> String {
        let mut svg = String::with_capacity(256 + diagram.ops().count() * 160);
        let page = &self.page;

        svg.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\n");
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}mm" height="{h}mm" viewBox="0 0 {w} {h}">"#,
            w = page.width,
            h = page.height
        );
        let _ = writeln!(svg, "<title>{}</title>", xml_escape(&diagram.title));

        let mut desc = diagram.description.clone();
        if let Some(at) = self.generated_at {
            let _ = write!(desc, " (generated {})", at.format("%Y-%m-%d %H:%M:%S UTC"));
        }
        let _ = writeln!(svg, "<desc>{}</desc>", xml_escape(&desc));
        let _ = writeln!(
            svg,
            "<!-- Page: {} x {} mm, margins {:?} -->",
            page.width, page.height, page.margins
        );

        let _ = writeln!(
            svg,
            r#"<g font-family="sans-serif" transform="translate({} {})">"#,
            page.margins.left, page.margins.top
        );
        for (i, band) in diagram.bands.iter().enumerate() {
            self.render_band(&mut svg, i, band);
        }
        svg.push_str("</g>\n</svg>\n");
        svg
    }

    fn render_band(&self, svg: &mut String, index: usize, band: &Band) {
        let levels = band.levels.join("/");
        let _ = writeln!(svg, "<!-- Level {} -->", comment_safe(&levels));
        let _ = writeln!(
            svg,
            r#"<g id="band-{}" data-levels="{}">"#,
            index + 1,
            xml_escape(&levels)
        );
        for op in &band.ops {
            self.render_op(svg, op);
        }
        svg.push_str("</g>\n");
    }

    fn render_op(&self, svg: &mut String, op: &DrawOp) {
        match op {
            DrawOp::FillRect { region, color } => {
                let stroke = self
                    .cell_stroke
                    .as_deref()
                    .map(|s| format!(r#" stroke="{}" stroke-width="0.25""#, xml_escape(s)))
                    .unwrap_or_default();
                let _ = writeln!(
                    svg,
                    r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}"{}/>"#,
                    region.x0,
                    region.y0,
                    region.width(),
                    region.height(),
                    xml_escape(self.palette.resolve(color)),
                    stroke
                );
            }
            DrawOp::Text {
                region,
                text,
                font_size,
                color,
                orientation,
            } => {
                let (cx, cy) = region.center();
                let rotate = match orientation {
                    Orientation::Horizontal => String::new(),
                    Orientation::Rotated => format!(
                        r#" transform="rotate({} {:.2} {:.2})""#,
                        orientation.angle(),
                        cx,
                        cy
                    ),
                };
                let _ = writeln!(
                    svg,
                    r#"<text x="{:.2}" y="{:.2}" font-size="{:.2}" text-anchor="middle" dominant-baseline="central" fill="{}"{}>{}</text>"#,
                    cx,
                    cy,
                    font_size,
                    xml_escape(self.palette.resolve(color)),
                    rotate,
                    xml_escape(text)
                );
            }
        }
    }
}

/// Escape the five XML special characters for element text and attributes.
fn xml_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

/// `--` may not appear inside an XML comment.
fn comment_safe(input: &str) -> String {
    input.replace("--", "- -")
}
