//! Runs command-sheet jobs against a workbook and writes SVG files.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::Job;
use crate::diagram::{Diagram, DiagramConfig};
use crate::error::Result;
use crate::import::Workbook;
use crate::render::{PageSetup, Palette, SvgRenderer};

/// What happened to one job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JobStatus {
    /// SVG written to `path`.
    Written { path: PathBuf },
    /// Commented out in the command sheet.
    Inactive,
    /// Configuration problem; only this job was skipped.
    Skipped { reason: String },
    /// Any other failure while running this job.
    Failed { reason: String },
}

/// Outcome of one job, for the batch report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobOutcome {
    pub index: usize,
    pub input_sheet: String,
    pub levels: String,
    #[serde(flatten)]
    pub status: JobStatus,
}

/// Summary of a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub started_at: DateTime<Utc>,
    pub workbook: PathBuf,
    pub outcomes: Vec<JobOutcome>,
}

impl BatchReport {
    /// Number of SVG files written.
    #[must_use]
    pub fn written(&self) -> usize {
        self.count(|s| matches!(s, JobStatus::Written { .. }))
    }

    /// Number of jobs skipped or failed.
    #[must_use]
    pub fn problems(&self) -> usize {
        self.count(|s| matches!(s, JobStatus::Skipped { .. } | JobStatus::Failed { .. }))
    }

    fn count(&self, pred: impl Fn(&JobStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.status)).count()
    }
}

/// Runs jobs of one workbook.
#[derive(Debug, Clone)]
pub struct BatchRunner {
    workbook: Workbook,
    output_dir: PathBuf,
    page: PageSetup,
    timestamp: bool,
}

impl BatchRunner {
    /// Create a runner writing into `output_dir`.
    #[must_use]
    pub fn new(workbook: Workbook, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            workbook,
            output_dir: output_dir.into(),
            page: PageSetup::a4_portrait(),
            timestamp: false,
        }
    }

    /// Sets the page used for every diagram.
    #[must_use]
    pub fn with_page(mut self, page: PageSetup) -> Self {
        self.page = page;
        self
    }

    /// Stamp each SVG with the batch start time.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: bool) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Directory output files are written to.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Run all jobs.
    ///
    /// Diagrams are built in parallel; files are written afterwards in
    /// command-sheet order, so when two jobs share an output name the later
    /// row wins. A failing job never stops the others.
    pub fn run(&self, jobs: &[Job]) -> BatchReport {
        let started_at = Utc::now();
        tracing::info!(
            "Running {} jobs from {}",
            jobs.len(),
            self.workbook.root().display()
        );

        let rendered: Vec<Option<Result<String>>> = jobs
            .par_iter()
            .map(|job| job.active.then(|| self.render_job(job, started_at)))
            .collect();

        let outcomes = jobs
            .iter()
            .zip(rendered)
            .map(|(job, result)| {
                let status = match result {
                    None => JobStatus::Inactive,
                    Some(Ok(svg)) => self.write_output(job, &svg),
                    Some(Err(e)) if e.is_config() => {
                        tracing::warn!("Job {} ({}): {} - skipping", job.index, job.input_sheet, e);
                        JobStatus::Skipped {
                            reason: e.to_string(),
                        }
                    }
                    Some(Err(e)) => {
                        tracing::error!("Job {} ({}) failed: {}", job.index, job.input_sheet, e);
                        JobStatus::Failed {
                            reason: e.to_string(),
                        }
                    }
                };
                JobOutcome {
                    index: job.index,
                    input_sheet: job.input_sheet.clone(),
                    levels: job.level_path(),
                    status,
                }
            })
            .collect();

        BatchReport {
            started_at,
            workbook: self.workbook.root().to_path_buf(),
            outcomes,
        }
    }

    fn render_job(&self, job: &Job, started_at: DateTime<Utc>) -> Result<String> {
        tracing::info!(
            "{}. {} --> {}: {} Area: {} Quality: {}",
            job.index,
            job.input_sheet,
            job.output_file,
            job.level_path(),
            job.area,
            job.quality
        );

        let palette = Palette::from_sheet(&self.workbook.sheet(&job.color_sheet)?)?;
        let sheet = self.workbook.sheet(&job.input_sheet)?;

        let config = DiagramConfig::builder()
            .title(format!("Tetris Tree / Voronoi Diagram for {}", job.input_sheet))
            .levels(job.levels.iter().cloned())
            .weight_field(&job.area)
            .quality_field(&job.quality)
            .rules(job.rules.iter().cloned())
            .build()?;
        let diagram = Diagram::from_sheet(&config, &sheet)?;

        let mut renderer = SvgRenderer::new(self.page, palette);
        if self.timestamp {
            renderer = renderer.with_timestamp(started_at);
        }
        Ok(renderer.render(&diagram))
    }

    fn write_output(&self, job: &Job, svg: &str) -> JobStatus {
        let path = self.output_dir.join(&job.output_file);
        match std::fs::write(&path, svg) {
            Ok(()) => {
                tracing::info!("Saved {}", path.display());
                JobStatus::Written { path }
            }
            Err(e) => {
                tracing::error!("Failed to write {}: {}", path.display(), e);
                JobStatus::Failed {
                    reason: format!("failed to write {}: {e}", path.display()),
                }
            }
        }
    }
}
