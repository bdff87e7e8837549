//! Integration tests for paperfetch-pubmed
//!
//! E-utilities endpoints are served by wiremock. The live test against NCBI
//! needs network access and is marked #[ignore].
//! Run it with: cargo test -p paperfetch-pubmed --test integration -- --ignored

use std::time::Duration;

use paperfetch_core::{ProgressContext, RemoteError};
use paperfetch_pubmed::{Config, fetch_details, find_papers, search, try_find_papers};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

const SAMPLE_XML: &str = include_str!("data/sample_data.xml");

/// The mock server runs on its own thread; this runtime only drives setup
/// and inspection, so the blocking client is never called from inside it.
fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to build test runtime")
}

fn config_for(server: &MockServer) -> Config {
    Config {
        base_url: server.uri(),
        ..Default::default()
    }
}

fn esearch_body(ids: &[&str]) -> String {
    serde_json::json!({
        "header": {"type": "esearch", "version": "0.3"},
        "esearchresult": {
            "count": ids.len().to_string(),
            "retmax": ids.len().to_string(),
            "idlist": ids,
        }
    })
    .to_string()
}

/// PMIDs from an efetch form body (`id` is comma-joined, URL-encoded)
fn form_ids(request: &Request) -> Vec<String> {
    let body = String::from_utf8_lossy(&request.body);
    body.split('&')
        .find_map(|pair| pair.strip_prefix("id="))
        .map(|ids| ids.split("%2C").map(String::from).collect())
        .unwrap_or_default()
}

/// Answers each efetch batch with a marker naming its size and first PMID
struct EchoBatch;

impl Respond for EchoBatch {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let ids = form_ids(request);
        ResponseTemplate::new(200).set_body_string(format!(
            "<batch size=\"{}\" first=\"{}\"/>",
            ids.len(),
            ids.first().map(String::as_str).unwrap_or("")
        ))
    }
}

#[test]
fn search_sends_query_and_returns_ids() {
    let rt = runtime();
    let server = rt.block_on(MockServer::start());
    rt.block_on(
        Mock::given(method("GET"))
            .and(path("/esearch.fcgi"))
            .and(query_param("db", "pubmed"))
            .and(query_param("term", "crispr therapeutics[title]"))
            .and(query_param("retmode", "json"))
            .and(query_param("retmax", "100"))
            .and(query_param("usehistory", "y"))
            .respond_with(ResponseTemplate::new(200).set_body_string(esearch_body(&["1", "2"])))
            .expect(1)
            .mount(&server),
    );

    let ids = search(&config_for(&server), "crispr therapeutics[title]").unwrap();
    assert_eq!(ids, vec!["1", "2"]);
}

#[test]
fn search_respects_max_results() {
    let rt = runtime();
    let server = rt.block_on(MockServer::start());
    rt.block_on(
        Mock::given(method("GET"))
            .and(path("/esearch.fcgi"))
            .and(query_param("retmax", "7"))
            .respond_with(ResponseTemplate::new(200).set_body_string(esearch_body(&["9"])))
            .expect(1)
            .mount(&server),
    );

    let config = Config {
        max_results: 7,
        ..config_for(&server)
    };
    assert_eq!(search(&config, "x").unwrap(), vec!["9"]);
}

#[test]
fn search_waits_for_slow_response() {
    let rt = runtime();
    let server = rt.block_on(MockServer::start());
    rt.block_on(
        Mock::given(path("/esearch.fcgi"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(esearch_body(&["5"]))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server),
    );

    // fetch_timeout applies to efetch only
    let config = Config {
        fetch_timeout: Duration::from_secs(1),
        ..config_for(&server)
    };
    assert_eq!(search(&config, "x").unwrap(), vec!["5"]);
}

#[test]
fn search_without_idlist_is_empty() {
    let rt = runtime();
    let server = rt.block_on(MockServer::start());
    rt.block_on(
        Mock::given(path("/esearch.fcgi"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"{"esearchresult":{"count":"0"}}"#),
            )
            .mount(&server),
    );

    assert!(search(&config_for(&server), "nothing").unwrap().is_empty());
}

#[test]
fn search_error_status_is_remote_error() {
    let rt = runtime();
    let server = rt.block_on(MockServer::start());
    rt.block_on(
        Mock::given(path("/esearch.fcgi"))
            .respond_with(ResponseTemplate::new(503).set_body_string("backend down"))
            .mount(&server),
    );

    let err = search(&config_for(&server), "x").unwrap_err();
    assert_eq!(err.status(), Some(503));
    assert!(err.to_string().contains("backend down"));
}

#[test]
fn fetch_batches_450_ids_as_200_200_50() {
    let rt = runtime();
    let server = rt.block_on(MockServer::start());
    rt.block_on(
        Mock::given(method("POST"))
            .and(path("/efetch.fcgi"))
            .respond_with(EchoBatch)
            .mount(&server),
    );

    let pmids: Vec<String> = (0..450).map(|i| i.to_string()).collect();
    let progress = ProgressContext::hidden();
    let xml = fetch_details(&config_for(&server), &pmids, &progress.stage_line("fetch")).unwrap();

    assert_eq!(
        xml,
        "<batch size=\"200\" first=\"0\"/>\
         <batch size=\"200\" first=\"200\"/>\
         <batch size=\"50\" first=\"400\"/>"
    );

    let requests = rt.block_on(server.received_requests()).unwrap();
    assert_eq!(requests.len(), 3);
    let sizes: Vec<usize> = requests.iter().map(|r| form_ids(r).len()).collect();
    assert_eq!(sizes, vec![200, 200, 50]);

    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains("db=pubmed"));
    assert!(body.contains("retmode=xml"));
}

#[test]
fn fetch_error_aborts_remaining_batches() {
    let rt = runtime();
    let server = rt.block_on(MockServer::start());
    rt.block_on(
        Mock::given(path("/efetch.fcgi"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server),
    );

    let pmids: Vec<String> = (0..450).map(|i| i.to_string()).collect();
    let err = fetch_details(
        &config_for(&server),
        &pmids,
        &indicatif::ProgressBar::hidden(),
    )
    .unwrap_err();

    assert!(matches!(err, RemoteError::Status { status: 500, .. }));
    let requests = rt.block_on(server.received_requests()).unwrap();
    assert_eq!(requests.len(), 1);
}

#[test]
fn fetch_times_out_on_slow_batch() {
    let rt = runtime();
    let server = rt.block_on(MockServer::start());
    rt.block_on(
        Mock::given(method("POST"))
            .and(path("/efetch.fcgi"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server),
    );

    let config = Config {
        fetch_timeout: Duration::from_secs(1),
        ..config_for(&server)
    };
    let pmids = vec!["1".to_string()];
    let err = fetch_details(&config, &pmids, &indicatif::ProgressBar::hidden()).unwrap_err();
    assert!(matches!(err, RemoteError::Transport(_)), "got: {err}");
}

fn mount_pipeline(rt: &tokio::runtime::Runtime, server: &MockServer) {
    rt.block_on(async {
        Mock::given(path("/esearch.fcgi"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(esearch_body(&["12345678", "98765432"])),
            )
            .mount(server)
            .await;
        Mock::given(method("POST"))
            .and(path("/efetch.fcgi"))
            .respond_with(ResponseTemplate::new(200).set_body_string(SAMPLE_XML))
            .expect(1)
            .mount(server)
            .await;
    });
}

#[test]
fn pipeline_keeps_only_company_paper() {
    let rt = runtime();
    let server = rt.block_on(MockServer::start());
    mount_pipeline(&rt, &server);

    let papers = find_papers(&config_for(&server), "test", &ProgressContext::hidden());

    assert_eq!(papers.len(), 1);
    let paper = &papers[0];
    assert_eq!(paper.pubmed_id, "12345678");
    assert_eq!(paper.title, "A groundbreaking study on novel therapeutics.");
    assert_eq!(paper.publication_date, "2023-Jan-N/A");
    assert_eq!(paper.non_academic_authors, vec!["Jane Doe"]);
    assert_eq!(paper.company_affiliations.len(), 1);
    assert!(paper.company_affiliations[0].contains("PharmaCorp Inc."));
    assert_eq!(
        paper.corresponding_author_email.as_deref(),
        Some("jane.doe@pharmaco.com")
    );
}

#[test]
fn pipeline_summary_counts() {
    let rt = runtime();
    let server = rt.block_on(MockServer::start());
    mount_pipeline(&rt, &server);

    let summary =
        try_find_papers(&config_for(&server), "test", &ProgressContext::hidden()).unwrap();
    assert_eq!(summary.total_pmids, 2);
    assert_eq!(summary.batches, 1);
    assert_eq!(summary.papers.len(), 1);
}

#[test]
fn pipeline_no_search_hits_skips_fetch() {
    let rt = runtime();
    let server = rt.block_on(MockServer::start());
    rt.block_on(async {
        Mock::given(path("/esearch.fcgi"))
            .respond_with(ResponseTemplate::new(200).set_body_string(esearch_body(&[])))
            .mount(&server)
            .await;
        Mock::given(path("/efetch.fcgi"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
    });

    let summary =
        try_find_papers(&config_for(&server), "none", &ProgressContext::hidden()).unwrap();
    assert_eq!(summary.total_pmids, 0);
    assert!(summary.papers.is_empty());
}

#[test]
fn pipeline_failure_degrades_to_empty() {
    let rt = runtime();
    let server = rt.block_on(MockServer::start());
    rt.block_on(
        Mock::given(path("/esearch.fcgi"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server),
    );

    let config = config_for(&server);
    let progress = ProgressContext::hidden();
    assert!(try_find_papers(&config, "x", &progress).is_err());
    assert!(find_papers(&config, "x", &progress).is_empty());
}

#[test]
fn pipeline_fetch_failure_is_error() {
    let rt = runtime();
    let server = rt.block_on(MockServer::start());
    rt.block_on(async {
        Mock::given(path("/esearch.fcgi"))
            .respond_with(ResponseTemplate::new(200).set_body_string(esearch_body(&["1"])))
            .mount(&server)
            .await;
        Mock::given(path("/efetch.fcgi"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
    });

    let config = config_for(&server);
    let progress = ProgressContext::hidden();
    let err = try_find_papers(&config, "x", &progress).unwrap_err();
    assert!(format!("{err:#}").contains("HTTP 503"), "got: {err:#}");
    assert!(find_papers(&config, "x", &progress).is_empty());
}

#[test]
fn pipeline_unparseable_fetch_degrades_to_empty() {
    let rt = runtime();
    let server = rt.block_on(MockServer::start());
    rt.block_on(async {
        Mock::given(path("/esearch.fcgi"))
            .respond_with(ResponseTemplate::new(200).set_body_string(esearch_body(&["1"])))
            .mount(&server)
            .await;
        Mock::given(path("/efetch.fcgi"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("<PubmedArticle><PMID>1</PMID>"),
            )
            .mount(&server)
            .await;
    });

    let summary =
        try_find_papers(&config_for(&server), "x", &ProgressContext::hidden()).unwrap();
    assert_eq!(summary.total_pmids, 1);
    assert!(summary.papers.is_empty());
}

/// Query the real NCBI service
/// Run with: cargo test -p paperfetch-pubmed --test integration -- --ignored live_search_and_fetch
#[test]
#[ignore]
fn live_search_and_fetch() {
    let config = Config {
        max_results: 5,
        ..Default::default()
    };
    let pmids = search(&config, "crispr therapeutics[title]").expect("search should succeed");
    assert!(!pmids.is_empty(), "expected at least one PMID");

    let xml = fetch_details(&config, &pmids, &indicatif::ProgressBar::hidden())
        .expect("fetch should succeed");
    assert!(xml.contains("<PubmedArticle"));

    let papers = paperfetch_pubmed::parse_and_filter(&xml);
    assert!(papers.len() <= pmids.len());
}
