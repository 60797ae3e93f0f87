//! Single-diagram SVG command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tetris_tree::{Palette, Sheet, SvgRenderer};

use super::{DiagramArgs, page};

pub fn run(
    args: DiagramArgs,
    output: PathBuf,
    palette: Option<PathBuf>,
    landscape: bool,
) -> Result<()> {
    let diagram = args.load()?;

    let palette = match palette {
        Some(path) => {
            let sheet = Sheet::read("palette", &path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Palette::from_sheet(&sheet)?
        }
        None => Palette::new(),
    };

    let svg = SvgRenderer::new(page(landscape), palette)
        .with_timestamp(chrono::Utc::now())
        .render(&diagram);
    std::fs::write(&output, svg)
        .with_context(|| format!("Failed to write to {}", output.display()))?;

    println!(
        "{} cells in {} bands",
        diagram.ops().count() / 2,
        diagram.bands.len()
    );
    println!("Saved to: {}", output.display());
    Ok(())
}
