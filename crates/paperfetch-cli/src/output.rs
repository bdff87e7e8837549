//! CSV report output

use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use paperfetch_pubmed::{CSV_HEADER, PaperResult};

/// Write `papers` as CSV to `path`, or to stdout when no path is given.
///
/// Nothing is written when there are no papers.
pub fn write_results(papers: &[PaperResult], path: Option<&Path>) -> Result<()> {
    if papers.is_empty() {
        log::info!("No matching papers found to write");
        return Ok(());
    }

    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_csv(file, papers)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("Results saved to {}", path.display());
        }
        None => {
            write_csv(std::io::stdout().lock(), papers).context("Failed to write to stdout")?;
            log::info!("CSV output printed to console");
        }
    }
    Ok(())
}

/// Header plus one row per paper
pub fn write_csv<W: Write>(writer: W, papers: &[PaperResult]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(CSV_HEADER)?;
    for paper in papers {
        wtr.write_record(paper.csv_row())?;
    }
    wtr.flush()?;
    Ok(())
}
