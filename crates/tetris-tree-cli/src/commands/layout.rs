//! Draw-instruction dump command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use super::DiagramArgs;

pub fn run(args: DiagramArgs, output: Option<PathBuf>) -> Result<()> {
    let diagram = args.load()?;
    let json = serde_json::to_string_pretty(&diagram)?;

    match output {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("Failed to write to {}", path.display()))?;
            eprintln!("Saved to: {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
