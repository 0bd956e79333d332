use std::path::PathBuf;

use crate::prelude::*;
use clap::Parser;

mod batch;
mod config;
mod error;
mod prelude;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Extract a title and H1-H3 outline from PDFs using typographic cues"
)]
pub struct App {
    #[command(subcommand)]
    pub command: Option<SubCommands>,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Directory scanned for `.pdf` files
    #[clap(
        long,
        env = "PDFOUTLINE_INPUT_DIR",
        global = true,
        default_value = "/app/input"
    )]
    input_dir: PathBuf,

    /// Directory receiving one `.json` file per input
    #[clap(
        long,
        env = "PDFOUTLINE_OUTPUT_DIR",
        global = true,
        default_value = "/app/output"
    )]
    output_dir: PathBuf,

    /// TOML file overriding the heuristic weights
    #[clap(long, env = "PDFOUTLINE_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Whether to display additional information.
    #[clap(long, env = "PDFOUTLINE_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Subcommand)]
pub enum SubCommands {
    /// Process every PDF in the input directory (the default)
    Batch,

    /// Print the outline of a single PDF to stdout
    Extract {
        /// Path to the PDF file
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command.unwrap_or(SubCommands::Batch) {
        SubCommands::Batch => crate::batch::run(&app.global),
        SubCommands::Extract { path } => crate::batch::extract_one(&path, &app.global),
    }
}
