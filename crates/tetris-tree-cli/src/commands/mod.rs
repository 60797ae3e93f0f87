//! Subcommand implementations.

pub mod layout;
pub mod paint;
pub mod run;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tetris_tree::{ColorRule, Diagram, DiagramConfig, PageSetup, Sheet};

/// Inputs shared by the single-diagram commands.
#[derive(Args, Debug)]
pub struct DiagramArgs {
    /// Input CSV file
    #[arg(short, long)]
    pub input: PathBuf,

    /// Grouping columns, outermost first (comma separated)
    #[arg(short, long, value_delimiter = ',', required = true)]
    pub levels: Vec<String>,

    /// Column holding the area weight
    #[arg(short, long)]
    pub area: String,

    /// Column holding the quality value
    #[arg(short, long)]
    pub quality: String,

    /// Color rule as RULE:BG[:FG], e.g. '>80:green' or ':gray:black' (repeat, default last)
    #[arg(short, long = "rule", required = true)]
    pub rules: Vec<ColorRule>,

    /// Diagram title
    #[arg(long)]
    pub title: Option<String>,
}

impl DiagramArgs {
    /// Load the input file and lay it out.
    pub fn load(&self) -> Result<Diagram> {
        let sheet_name = self
            .input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("input")
            .to_string();

        let mut builder = DiagramConfig::builder()
            .levels(self.levels.iter().map(|l| l.trim().to_string()))
            .weight_field(&self.area)
            .quality_field(&self.quality)
            .rules(self.rules.iter().cloned());
        builder = builder.title(
            self.title
                .clone()
                .unwrap_or_else(|| format!("Tetris Tree / Voronoi Diagram for {sheet_name}")),
        );
        let config = builder.build().context("Invalid diagram options")?;

        let sheet = Sheet::read(sheet_name, &self.input)
            .with_context(|| format!("Failed to read {}", self.input.display()))?;
        tracing::debug!(
            "Read {} rows from {}",
            sheet.rows().len(),
            self.input.display()
        );
        Diagram::from_sheet(&config, &sheet)
            .with_context(|| format!("Failed to lay out {}", self.input.display()))
    }
}

/// A4 page in the requested orientation.
pub fn page(landscape: bool) -> PageSetup {
    if landscape {
        PageSetup::a4_landscape()
    } else {
        PageSetup::a4_portrait()
    }
}
