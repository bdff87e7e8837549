//! Paperfetch PubMed - find PubMed papers with company-affiliated authors
//!
//! Searches PubMed through NCBI E-utilities, fetches full records in
//! batches, and keeps articles where at least one author's affiliation
//! looks commercial.
//!
//! # Example
//!
//! ```ignore
//! use paperfetch_core::ProgressContext;
//! use paperfetch_pubmed::{Config, find_papers};
//!
//! let config = Config::default();
//! let papers = find_papers(&config, "crispr therapeutics[title]", &ProgressContext::new());
//! for paper in &papers {
//!     println!("{} {}", paper.pubmed_id, paper.title);
//! }
//! ```

pub mod classify;
pub mod config;
pub mod document;
pub mod eutils;
pub mod model;
pub mod parser;
pub mod runner;

// Re-exports
pub use classify::is_company_affiliation;
pub use config::Config;
pub use eutils::{fetch_details, search};
pub use model::{CSV_HEADER, PaperResult};
pub use parser::parse_and_filter;
pub use runner::{Summary, find_papers, try_find_papers};
