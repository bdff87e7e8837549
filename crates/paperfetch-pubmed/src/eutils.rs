//! NCBI E-utilities client: esearch for PMIDs, efetch for full records

use indicatif::ProgressBar;
use paperfetch_core::{RemoteError, get_text, post_form_text};

use crate::config::Config;

/// Search PubMed and return matching PMIDs, at most `config.max_results`.
///
/// A response without `esearchresult.idlist` is treated as no matches.
pub fn search(config: &Config, query: &str) -> Result<Vec<String>, RemoteError> {
    let retmax = config.max_results.to_string();
    let params = [
        ("db", config.database.as_str()),
        ("term", query),
        ("retmode", "json"),
        ("retmax", retmax.as_str()),
        ("usehistory", "y"),
    ];

    log::debug!("Executing eSearch with query: '{query}'");
    let body = get_text(&config.esearch_url(), &params, None)
        .inspect_err(|e| log::error!("PubMed search failed: {e}"))?;

    let pmids = parse_search_response(&body)?;
    log::info!("Found {} PMIDs from search", pmids.len());
    Ok(pmids)
}

fn parse_search_response(body: &str) -> Result<Vec<String>, RemoteError> {
    let parsed: serde_json::Value =
        serde_json::from_str(body).map_err(|e| RemoteError::Decode(e.to_string()))?;

    let Some(ids) = parsed["esearchresult"]["idlist"].as_array() else {
        log::warn!("No results found or malformed API response");
        return Ok(Vec::new());
    };
    Ok(ids
        .iter()
        .filter_map(|v| v.as_str().map(String::from))
        .collect())
}

/// Fetch full XML records for `pmids`, one POST per batch, in order.
///
/// Response bodies are concatenated as-is, so the result holds one complete
/// XML document per batch. The first failing batch aborts the fetch.
pub fn fetch_details(
    config: &Config,
    pmids: &[String],
    pb: &ProgressBar,
) -> Result<String, RemoteError> {
    if pmids.is_empty() {
        return Ok(String::new());
    }

    let batch_size = config.effective_batch_size();
    let total_batches = pmids.len().div_ceil(batch_size);
    pb.set_length(total_batches as u64);

    let url = config.efetch_url();
    let mut xml = String::new();

    for (i, batch) in pmids.chunks(batch_size).enumerate() {
        pb.set_message(format!("batch {}/{total_batches}", i + 1));
        log::debug!("Fetching details for batch of {} PMIDs", batch.len());

        let ids = batch.join(",");
        let form = [
            ("db", config.database.as_str()),
            ("id", ids.as_str()),
            ("retmode", "xml"),
        ];
        let body = post_form_text(&url, &form, Some(config.fetch_timeout)).inspect_err(|e| {
            log::error!("Fetching batch {}/{total_batches} failed: {e}", i + 1)
        })?;

        xml.push_str(&body);
        pb.inc(1);
    }

    Ok(xml)
}
