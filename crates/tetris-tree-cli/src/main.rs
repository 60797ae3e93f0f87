//! tetris-tree CLI - hierarchical area diagrams from CSV sheets

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::DiagramArgs;

/// Hierarchical tetris-tree diagrams from tabular data.
#[derive(Parser)]
#[command(name = "tetris-tree")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every job of a workbook's command sheet
    Run {
        /// Workbook directory holding one CSV file per sheet
        #[arg(short, long)]
        workbook: PathBuf,

        /// Name of the command sheet
        #[arg(long, default_value = "Commands")]
        commands: String,

        /// Directory for the generated SVG files
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Write a JSON summary of the run
        #[arg(long)]
        report: Option<PathBuf>,

        /// Stamp each SVG with the generation time
        #[arg(long)]
        timestamp: bool,

        /// Use an A4 landscape page instead of portrait
        #[arg(long)]
        landscape: bool,
    },

    /// Render one CSV file as an SVG diagram
    Paint {
        #[command(flatten)]
        diagram: DiagramArgs,

        /// Output SVG file
        #[arg(short, long)]
        output: PathBuf,

        /// Color sheet (CSV with color, pf_color, hex columns)
        #[arg(long)]
        palette: Option<PathBuf>,

        /// Use an A4 landscape page instead of portrait
        #[arg(long)]
        landscape: bool,
    },

    /// Print the draw instructions for one CSV file as JSON
    Layout {
        #[command(flatten)]
        diagram: DiagramArgs,

        /// Output JSON file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "tetris_tree=debug,tetris_tree_cli=debug"
    } else {
        "tetris_tree=info,tetris_tree_cli=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Run {
            workbook,
            commands,
            output_dir,
            report,
            timestamp,
            landscape,
        } => commands::run::run(workbook, &commands, output_dir, report, timestamp, landscape),
        Commands::Paint {
            diagram,
            output,
            palette,
            landscape,
        } => commands::paint::run(diagram, output, palette, landscape),
        Commands::Layout { diagram, output } => commands::layout::run(diagram, output),
    }
}
