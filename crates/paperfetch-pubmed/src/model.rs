//! Filtered paper record

use serde::Serialize;

/// Placeholder for a missing value in output and date slots
pub const NOT_AVAILABLE: &str = "N/A";

/// Column names of the CSV report, in row order
pub const CSV_HEADER: [&str; 6] = [
    "PubmedID",
    "Title",
    "Publication Date",
    "Non-academic Author(s)",
    "Company Affiliation(s)",
    "Corresponding Author Email",
];

/// One article with at least one company-affiliated author
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaperResult {
    pub pubmed_id: String,
    pub title: String,
    /// `{year}-{month}-{day}`, missing parts as `N/A`
    pub publication_date: String,
    pub non_academic_authors: Vec<String>,
    /// Distinct, in first-seen order
    pub company_affiliations: Vec<String>,
    pub corresponding_author_email: Option<String>,
}

impl PaperResult {
    /// Row matching [`CSV_HEADER`]: lists joined with `"; "`, missing email as `N/A`
    pub fn csv_row(&self) -> [String; 6] {
        [
            self.pubmed_id.clone(),
            self.title.clone(),
            self.publication_date.clone(),
            self.non_academic_authors.join("; "),
            self.company_affiliations.join("; "),
            self.corresponding_author_email
                .clone()
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        ]
    }
}
