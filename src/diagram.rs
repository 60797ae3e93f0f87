//! Diagram composition: one laid-out band per prefix of the grouping levels.
//!
//! Band `i` lays out the whole table over `levels[0..=i]` and labels every
//! leaf with its level-`i` value, so the finished diagram reads top to bottom
//! from the coarsest grouping to the finest.

use serde::{Deserialize, Serialize};

use crate::cell::{ColorRule, ColorRules};
use crate::draw::DrawOp;
use crate::error::{Error, Result};
use crate::import::{RecordSchema, RecordTable, Sheet};
use crate::layout::{Region, Splitter};

/// Placement of the stacked bands, in page units (millimetres by default).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandGeometry {
    /// Left edge of every band.
    pub x: f64,
    /// Top edge of the first band.
    pub y: f64,
    /// Band width.
    pub width: f64,
    /// Band height.
    pub band_height: f64,
    /// Vertical space between bands.
    pub gap: f64,
}

impl Default for BandGeometry {
    fn default() -> Self {
        Self {
            x: 5.0,
            y: 5.0,
            width: 200.0,
            band_height: 68.0,
            gap: 5.0,
        }
    }
}

impl BandGeometry {
    /// Region of band `index` (0-based).
    #[must_use]
    pub fn band(&self, index: usize) -> Region {
        let y = self.y + index as f64 * (self.band_height + self.gap);
        Region::from_origin(self.x, y, self.width, self.band_height)
    }

    fn validate(&self) -> Result<()> {
        let finite = [self.x, self.y, self.width, self.band_height, self.gap]
            .iter()
            .all(|v| v.is_finite());
        if !finite || self.width <= 0.0 || self.band_height <= 0.0 || self.gap < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "band geometry must have positive size and non-negative gap: {self:?}"
            )));
        }
        Ok(())
    }
}

/// Everything needed to turn one sheet into one diagram.
///
/// Deserialized configs pass the same checks as [`DiagramConfigBuilder::build`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDiagramConfig")]
pub struct DiagramConfig {
    /// Title written into the document.
    pub title: String,
    /// Grouping-level columns, outermost first.
    pub levels: Vec<String>,
    /// Column holding the area weight.
    pub weight_field: String,
    /// Column holding the quality value.
    pub quality_field: String,
    /// Ordered color rules, default last.
    pub color_rules: ColorRules,
    /// Band placement.
    #[serde(default)]
    pub geometry: BandGeometry,
}

/// Unchecked serialized form of [`DiagramConfig`].
#[derive(Deserialize)]
struct RawDiagramConfig {
    title: String,
    levels: Vec<String>,
    weight_field: String,
    quality_field: String,
    color_rules: Vec<ColorRule>,
    #[serde(default)]
    geometry: BandGeometry,
}

impl TryFrom<RawDiagramConfig> for DiagramConfig {
    type Error = Error;

    fn try_from(raw: RawDiagramConfig) -> Result<Self> {
        DiagramConfig::builder()
            .title(raw.title)
            .levels(raw.levels)
            .weight_field(raw.weight_field)
            .quality_field(raw.quality_field)
            .rules(raw.color_rules)
            .geometry(raw.geometry)
            .build()
    }
}

impl DiagramConfig {
    /// Create a config builder.
    #[must_use]
    pub fn builder() -> DiagramConfigBuilder {
        DiagramConfigBuilder::default()
    }

    /// Schema that loads this diagram's columns from a sheet.
    #[must_use]
    pub fn schema(&self) -> RecordSchema {
        RecordSchema::builder()
            .levels(self.levels.iter().cloned())
            .weight_column(&self.weight_field)
            .quality_column(&self.quality_field)
            .build()
    }

    /// Check levels, field names and geometry.
    ///
    /// The fields are public, so a config edited after [`DiagramConfigBuilder::build`]
    /// is checked again before layout.
    pub fn validate(&self) -> Result<()> {
        if self.levels.is_empty() {
            return Err(Error::InvalidConfig(
                "at least one grouping level is required".to_string(),
            ));
        }
        if self.levels.iter().any(|l| l.trim().is_empty()) {
            return Err(Error::InvalidConfig(format!(
                "empty grouping level name in {:?}",
                self.levels
            )));
        }
        if self.weight_field.trim().is_empty() {
            return Err(Error::InvalidConfig("weight field is empty".to_string()));
        }
        if self.quality_field.trim().is_empty() {
            return Err(Error::InvalidConfig("quality field is empty".to_string()));
        }
        self.geometry.validate()
    }

    /// Human-readable parameter summary, e.g. `levels division/dept area fte quality score`.
    #[must_use]
    pub fn describe(&self) -> String {
        format!(
            "levels {} area {} quality {}",
            self.levels.join("/"),
            self.weight_field,
            self.quality_field
        )
    }
}

/// Builder for [`DiagramConfig`].
#[derive(Debug, Default)]
pub struct DiagramConfigBuilder {
    title: Option<String>,
    levels: Vec<String>,
    weight_field: String,
    quality_field: String,
    color_rules: Vec<ColorRule>,
    geometry: BandGeometry,
}

impl DiagramConfigBuilder {
    /// Set the document title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the grouping levels, outermost first.
    #[must_use]
    pub fn levels<S: Into<String>>(mut self, levels: impl IntoIterator<Item = S>) -> Self {
        self.levels = levels.into_iter().map(Into::into).collect();
        self
    }

    /// Set the weight column.
    #[must_use]
    pub fn weight_field(mut self, name: impl Into<String>) -> Self {
        self.weight_field = name.into();
        self
    }

    /// Set the quality column.
    #[must_use]
    pub fn quality_field(mut self, name: impl Into<String>) -> Self {
        self.quality_field = name.into();
        self
    }

    /// Append a color rule.
    #[must_use]
    pub fn rule(mut self, rule: ColorRule) -> Self {
        self.color_rules.push(rule);
        self
    }

    /// Replace all color rules.
    #[must_use]
    pub fn rules(mut self, rules: impl IntoIterator<Item = ColorRule>) -> Self {
        self.color_rules = rules.into_iter().collect();
        self
    }

    /// Set the band geometry.
    #[must_use]
    pub fn geometry(mut self, geometry: BandGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    /// Validate and build the config.
    pub fn build(self) -> Result<DiagramConfig> {
        let title = self
            .title
            .unwrap_or_else(|| format!("Tetris Tree for {}", self.levels.join("/")));

        let config = DiagramConfig {
            title,
            levels: self.levels,
            weight_field: self.weight_field,
            quality_field: self.quality_field,
            color_rules: ColorRules::new(self.color_rules)?,
            geometry: self.geometry,
        };
        config.validate()?;
        Ok(config)
    }
}

/// One horizontal band of a diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Band {
    /// Level prefix laid out in this band.
    pub levels: Vec<String>,
    /// Area the band occupies.
    pub region: Region,
    /// Draw ops in paint order.
    pub ops: Vec<DrawOp>,
}

/// A fully laid-out diagram, ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagram {
    pub title: String,
    /// Parameter summary from [`DiagramConfig::describe`].
    pub description: String,
    pub bands: Vec<Band>,
}

impl Diagram {
    /// Load `sheet` with the config's columns and lay it out.
    ///
    /// Missing columns are reported before any layout work starts.
    pub fn from_sheet(config: &DiagramConfig, sheet: &Sheet) -> Result<Self> {
        let table = config.schema().load(sheet)?;
        Self::layout(config, &table)
    }

    /// Lay out an already loaded table, one band per level prefix.
    pub fn layout(config: &DiagramConfig, table: &RecordTable) -> Result<Self> {
        config.validate()?;
        let mut bands = Vec::with_capacity(config.levels.len());

        for depth in 1..=config.levels.len() {
            let levels = config.levels[..depth].to_vec();
            let region = config.geometry.band(depth - 1);
            let splitter = Splitter::new(depth, depth - 1, &config.color_rules)?;
            let ops = splitter.layout(&table.records, region);

            tracing::debug!("{}: {} draw ops", levels.join("/"), ops.len());
            bands.push(Band {
                levels,
                region,
                ops,
            });
        }

        tracing::info!(
            "Laid out '{}' ({} records, {} bands)",
            config.title,
            table.len(),
            bands.len()
        );

        Ok(Self {
            title: config.title.clone(),
            description: config.describe(),
            bands,
        })
    }

    /// All draw ops of all bands, top band first.
    pub fn ops(&self) -> impl Iterator<Item = &DrawOp> {
        self.bands.iter().flat_map(|b| b.ops.iter())
    }
}
