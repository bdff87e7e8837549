//! Blocking HTTP helpers over a shared async client.
//!
//! Requests run on async reqwest, driven by a single current-thread tokio
//! runtime through `block_on`, so callers get a plain sync interface and at
//! most one request is in flight at a time.

use std::sync::LazyLock;
use std::time::Duration;

use crate::error::RemoteError;

/// Characters of an error response body kept in the error message
const ERROR_BODY_CHARS: usize = 200;

pub const USER_AGENT: &str = concat!("paperfetch/", env!("CARGO_PKG_VERSION"));

/// Shared async HTTP client with connection pooling.
///
/// No client-wide timeouts: each request sets its own ceiling, or none.
static SHARED_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .expect("failed to build HTTP client")
});

/// Get shared HTTP client.
pub(crate) fn http_client() -> &'static reqwest::Client {
    &SHARED_CLIENT
}

/// Shared tokio runtime for HTTP operations.
///
/// Must not be entered from inside another tokio runtime.
pub(crate) static SHARED_RUNTIME: LazyLock<tokio::runtime::Runtime> = LazyLock::new(|| {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to build tokio runtime")
});

/// GET `url` with query parameters, returning the body as text.
///
/// `timeout` bounds the whole request; `None` waits indefinitely.
pub fn get_text(
    url: &str,
    query: &[(&str, &str)],
    timeout: Option<Duration>,
) -> Result<String, RemoteError> {
    let mut request = http_client().get(url).query(query);
    if let Some(timeout) = timeout {
        request = request.timeout(timeout);
    }
    send_for_text(request)
}

/// POST `form` as `application/x-www-form-urlencoded`, returning the body as text.
pub fn post_form_text(
    url: &str,
    form: &[(&str, &str)],
    timeout: Option<Duration>,
) -> Result<String, RemoteError> {
    let mut request = http_client().post(url).form(form);
    if let Some(timeout) = timeout {
        request = request.timeout(timeout);
    }
    send_for_text(request)
}

fn send_for_text(request: reqwest::RequestBuilder) -> Result<String, RemoteError> {
    SHARED_RUNTIME.block_on(async {
        let response = request.send().await.map_err(RemoteError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteError::Status {
                status: status.as_u16(),
                message: error_message(status, &body),
            });
        }

        response.text().await.map_err(RemoteError::from_reqwest)
    })
}

/// Short description of a failed response: body excerpt, or the reason phrase
fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    let excerpt: String = body.trim().chars().take(ERROR_BODY_CHARS).collect();
    if excerpt.is_empty() {
        status.canonical_reason().unwrap_or("unknown status").to_string()
    } else {
        excerpt
    }
}
