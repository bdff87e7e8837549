//! get-papers-list - PubMed papers with pharma/biotech-affiliated authors
//!
//! Searches PubMed, keeps papers with at least one company-affiliated
//! author, and writes them as CSV to a file or stdout.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use paperfetch_core::ProgressContext;

mod config;
mod output;

use config::Config;

#[derive(Parser)]
#[command(name = "get-papers-list")]
#[command(about = "Fetch PubMed papers with authors from pharma/biotech companies")]
#[command(version)]
struct Cli {
    /// PubMed search query (e.g. 'crispr therapeutics[title]')
    query: String,

    /// Output CSV file (default: print to stdout)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Config file path (default: ./paperfetch.toml or ~/.config/paperfetch/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Maximum number of PMIDs to retrieve
    #[arg(short = 'n', long)]
    max_results: Option<usize>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logging goes through the progress display on a TTY so spinners stay intact
    let progress = ProgressContext::new();
    let multi = progress.is_tty().then(|| progress.multi());
    paperfetch_core::init_logging(cli.debug, multi);

    match run(cli, &progress) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("An unexpected error prevented the program from completing: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, progress: &ProgressContext) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };

    let mut pipeline = config.pipeline();
    if let Some(max_results) = cli.max_results {
        pipeline.max_results = max_results;
    }

    let papers = paperfetch_pubmed::find_papers(&pipeline, &cli.query, progress);
    output::write_results(&papers, cli.file.as_deref())
}
