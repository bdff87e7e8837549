//! Pipeline orchestration: search, fetch, parse & filter

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use paperfetch_core::ProgressContext;

use crate::config::Config;
use crate::eutils::{fetch_details, search};
use crate::model::PaperResult;
use crate::parser::parse_and_filter;

/// Pipeline execution summary
#[derive(Debug, Default)]
pub struct Summary {
    pub total_pmids: usize,
    pub batches: usize,
    pub papers: Vec<PaperResult>,
    pub elapsed: Duration,
}

/// Run the pipeline, propagating search and fetch failures.
pub fn try_find_papers(
    config: &Config,
    query: &str,
    progress: &ProgressContext,
) -> Result<Summary> {
    let start = Instant::now();
    log::info!("Starting paper fetch for query: '{query}'");

    let stage = progress.stage_line("search");
    stage.set_message(query.to_string());
    let pmids = search(config, query)
        .inspect_err(|_| stage.finish_and_clear())
        .context("PubMed search failed")?;
    stage.finish_and_clear();

    let mut summary = Summary {
        total_pmids: pmids.len(),
        ..Default::default()
    };
    if pmids.is_empty() {
        summary.elapsed = start.elapsed();
        return Ok(summary);
    }

    let stage = progress.stage_line("fetch");
    let xml = fetch_details(config, &pmids, &stage)
        .inspect_err(|_| stage.finish_and_clear())
        .context("Fetching paper details failed")?;
    summary.batches = pmids.len().div_ceil(config.effective_batch_size());
    stage.finish_and_clear();

    if !xml.is_empty() {
        let stage = progress.stage_line("parse");
        stage.set_message(format!("{} bytes", xml.len()));
        summary.papers = parse_and_filter(&xml);
        stage.finish_and_clear();
    }

    summary.elapsed = start.elapsed();
    log_summary(&summary);
    Ok(summary)
}

/// Run the pipeline, returning an empty list on any failure.
///
/// Failures are logged; callers cannot tell them apart from a query with no
/// matching papers. Use [`try_find_papers`] to see the error.
pub fn find_papers(
    config: &Config,
    query: &str,
    progress: &ProgressContext,
) -> Vec<PaperResult> {
    match try_find_papers(config, query, progress) {
        Ok(summary) => summary.papers,
        Err(e) => {
            log::error!("A critical error occurred in the main workflow: {e:#}");
            Vec::new()
        }
    }
}

fn log_summary(summary: &Summary) {
    log::info!("=== PubMed Summary ===");
    log::info!(
        "PMIDs: {} ({} fetch batches)",
        summary.total_pmids,
        summary.batches
    );
    log::info!("Papers with company authors: {}", summary.papers.len());
    log::info!("Time: {:.1}s", summary.elapsed.as_secs_f64());
}
