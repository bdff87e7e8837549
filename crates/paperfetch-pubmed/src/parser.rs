//! Parse concatenated efetch XML and keep papers with company-affiliated authors

use std::sync::LazyLock;

use regex::Regex;

use crate::classify::is_company_affiliation;
use crate::document::{Element, parse_document};
use crate::model::{NOT_AVAILABLE, PaperResult};

/// Characters of unparseable input echoed at debug level
const DEBUG_EXCERPT_CHARS: usize = 500;

static XML_DECL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<\?xml[^>]*\?>").expect("valid regex"));

static DOCTYPE_DECL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<!DOCTYPE[^>]*>").expect("valid regex"));

/// Parse efetch output and return papers with at least one company author.
///
/// `xml` may hold several complete documents back to back (one per fetch
/// batch). Unparseable input is logged and yields an empty list, which is
/// indistinguishable from a batch with no matching papers.
pub fn parse_and_filter(xml: &str) -> Vec<PaperResult> {
    if xml.trim().is_empty() {
        return Vec::new();
    }

    let root = match parse_document(&wrap_batch(xml)) {
        Ok(root) => root,
        Err(e) => {
            log::error!("Failed to parse XML: {e:#}");
            let excerpt: String = xml.chars().take(DEBUG_EXCERPT_CHARS).collect();
            log::debug!("Problematic XML data (first {DEBUG_EXCERPT_CHARS} chars): {excerpt}");
            return Vec::new();
        }
    };

    let results: Vec<PaperResult> = root
        .find_all("PubmedArticle")
        .filter_map(extract_paper)
        .collect();
    log::info!("Filtered {} papers with company affiliations", results.len());
    results
}

/// Strip every XML/DOCTYPE declaration and wrap the rest in one root element
fn wrap_batch(xml: &str) -> String {
    let cleaned = XML_DECL.replace_all(xml, "");
    let cleaned = DOCTYPE_DECL.replace_all(&cleaned, "");
    format!("<root>{}</root>", cleaned.trim())
}

/// Build a result for one `PubmedArticle`, or `None` if it lacks required
/// nodes or has no company-affiliated author.
fn extract_paper(article: &Element) -> Option<PaperResult> {
    let pmid = article.find("PMID")?;
    let title = article.find("ArticleTitle")?;
    let author_list = article.find("AuthorList")?;

    let mut non_academic_authors = Vec::new();
    let mut company_affiliations: Vec<String> = Vec::new();

    for author in author_list.children_named("Author") {
        let Some(affiliation) = author.find("Affiliation").map(|a| a.text().trim().to_string())
        else {
            continue;
        };
        log::debug!("Checking affiliation: '{affiliation}'");

        if !is_company_affiliation(&affiliation) {
            continue;
        }
        let name = author_name(author);
        if !name.is_empty() {
            non_academic_authors.push(name);
        }
        if !company_affiliations.contains(&affiliation) {
            company_affiliations.push(affiliation);
        }
    }

    if non_academic_authors.is_empty() {
        return None;
    }

    let pubmed_id = non_empty_or(pmid.leading_text(), NOT_AVAILABLE);
    let title = non_empty_or(title.text().trim().to_string(), "No Title");
    let paper = PaperResult {
        pubmed_id,
        publication_date: publication_date(article),
        non_academic_authors,
        company_affiliations,
        corresponding_author_email: corresponding_author_email(author_list),
        title,
    };
    log::debug!(
        "Filtered paper added: {} - {}",
        paper.pubmed_id,
        paper.title.chars().take(50).collect::<String>()
    );
    Some(paper)
}

fn non_empty_or(value: String, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value
    }
}

/// `"{fore} {last}"`, trimmed; empty if the author has neither part
fn author_name(author: &Element) -> String {
    let part = |name: &str| author.find(name).map(Element::leading_text).unwrap_or_default();
    format!("{} {}", part("ForeName"), part("LastName"))
        .trim()
        .to_string()
}

/// `{year}-{month}-{day}` from the first `PubDate`, `N/A` for missing parts.
/// Articles without any `PubDate` get plain `N/A`.
fn publication_date(article: &Element) -> String {
    let Some(date) = article.find("PubDate") else {
        return NOT_AVAILABLE.to_string();
    };
    let part = |name: &str| {
        date.child(name)
            .map(Element::leading_text)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    };
    format!("{}-{}-{}", part("Year"), part("Month"), part("Day"))
}

/// Email of the first corresponding author whose affiliation carries one.
///
/// An author is corresponding when flagged `CorrespondingAuthor="Y"` or when
/// the affiliation text mentions "Corresponding".
fn corresponding_author_email(author_list: &Element) -> Option<String> {
    author_list.children_named("Author").find_map(|author| {
        let affiliation = author
            .find("Affiliation")
            .map(|a| a.text().trim().to_string())
            .unwrap_or_default();

        let flagged = author.attr("CorrespondingAuthor") == Some("Y");
        let mentioned = affiliation.contains("Corresponding");
        if !(flagged || mentioned) || !affiliation.contains('@') {
            return None;
        }
        extract_email(&affiliation)
    })
}

/// Last whitespace-separated token containing `@`, parentheses treated as
/// spaces and surrounding `.;,` removed.
fn extract_email(text: &str) -> Option<String> {
    let spaced = text.replace(&['(', ')'][..], " ");
    spaced
        .split_whitespace()
        .rev()
        .find(|token| token.contains('@'))
        .map(|token| token.trim_matches(&['.', ';', ','][..]).to_string())
}
