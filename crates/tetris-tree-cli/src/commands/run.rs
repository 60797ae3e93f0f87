//! Command-sheet batch run.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use tetris_tree::{BatchRunner, JobStatus, Workbook, parse_commands};

use super::page;

pub fn run(
    workbook: PathBuf,
    commands: &str,
    output_dir: PathBuf,
    report: Option<PathBuf>,
    timestamp: bool,
    landscape: bool,
) -> Result<()> {
    let book = Workbook::open(&workbook)
        .with_context(|| format!("Failed to open workbook {}", workbook.display()))?;
    if !book.has_sheet(commands) {
        bail!(
            "Could not find sheet '{}' in workbook {}",
            commands,
            workbook.display()
        );
    }

    let jobs = parse_commands(&book.sheet(commands)?)
        .with_context(|| format!("Failed to read command sheet '{}'", commands))?;

    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    let summary = BatchRunner::new(book, &output_dir)
        .with_page(page(landscape))
        .with_timestamp(timestamp)
        .run(&jobs);

    for outcome in &summary.outcomes {
        let status = match &outcome.status {
            JobStatus::Written { path } => format!("written {}", path.display()),
            JobStatus::Inactive => "inactive".to_string(),
            JobStatus::Skipped { reason } => format!("skipped: {reason}"),
            JobStatus::Failed { reason } => format!("FAILED: {reason}"),
        };
        println!(
            "{:>3}. {:<20} {:<30} {}",
            outcome.index, outcome.input_sheet, outcome.levels, status
        );
    }
    println!(
        "{} of {} jobs written, {} with problems",
        summary.written(),
        summary.outcomes.len(),
        summary.problems()
    );

    if let Some(path) = report {
        let json = serde_json::to_string_pretty(&summary)?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write to {}", path.display()))?;
        println!("Report saved to: {}", path.display());
    }

    Ok(())
}
