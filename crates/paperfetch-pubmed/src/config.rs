//! PubMed pipeline configuration

use std::time::Duration;

/// Largest number of PMIDs efetch accepts in one POST
pub const MAX_IDS_PER_REQUEST: usize = 200;

/// Runtime configuration for the PubMed pipeline
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the E-utilities service (esearch.fcgi / efetch.fcgi live under it)
    pub base_url: String,
    /// Entrez database to query
    pub database: String,
    /// Maximum PMIDs returned by search
    pub max_results: usize,
    /// PMIDs per efetch request (capped at [`MAX_IDS_PER_REQUEST`])
    pub batch_size: usize,
    /// Per-request timeout for efetch; search has none
    pub fetch_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/".to_string(),
            database: "pubmed".to_string(),
            max_results: 100,
            batch_size: MAX_IDS_PER_REQUEST,
            fetch_timeout: Duration::from_secs(30),
        }
    }
}

impl Config {
    pub fn esearch_url(&self) -> String {
        self.endpoint("esearch.fcgi")
    }

    pub fn efetch_url(&self) -> String {
        self.endpoint("efetch.fcgi")
    }

    /// Effective batch size: at least 1, never above the protocol limit
    pub fn effective_batch_size(&self) -> usize {
        self.batch_size.clamp(1, MAX_IDS_PER_REQUEST)
    }

    fn endpoint(&self, name: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), name)
    }
}
