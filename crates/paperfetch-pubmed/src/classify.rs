//! Company vs. academic affiliation heuristic

/// Substrings marking a commercial affiliation.
///
/// Matched against the lowercased affiliation without word boundaries, so
/// short entries like "ag" and "inc" also hit inside unrelated words.
pub const COMPANY_KEYWORDS: &[&str] = &[
    "inc",
    "ltd",
    "llc",
    "corp",
    "corporation",
    "pharmaceuticals",
    "therapeutics",
    "biotech",
    "biosciences",
    "diagnostics",
    "labs",
    "laboratories",
    "gmbh",
    "ag",
    "s.a.",
];

/// Whether an affiliation string looks like a company.
pub fn is_company_affiliation(affiliation: &str) -> bool {
    if affiliation.is_empty() {
        return false;
    }
    let lower = affiliation.to_lowercase();
    COMPANY_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
}
