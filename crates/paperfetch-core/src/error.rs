//! Error type for requests against remote endpoints

/// Failure talking to a remote HTTP endpoint.
///
/// `Status` is the only variant produced by the server itself; the other two
/// cover everything that goes wrong on our side of the wire.
#[derive(Debug)]
pub enum RemoteError {
    /// Endpoint answered with a non-success status
    Status { status: u16, message: String },
    /// Connection, timeout or other transport failure
    Transport(String),
    /// Body could not be read or decoded
    Decode(String),
}

impl std::fmt::Display for RemoteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Status { status, message } => write!(f, "HTTP {status}: {message}"),
            Self::Transport(message) => write!(f, "HTTP error: {message}"),
            Self::Decode(message) => write!(f, "invalid response body: {message}"),
        }
    }
}

impl std::error::Error for RemoteError {}

impl RemoteError {
    /// Classify a reqwest error, keeping the status code when there is one.
    ///
    /// The URL is stripped from the message; request URLs carry the full
    /// query string.
    pub fn from_reqwest(e: reqwest::Error) -> Self {
        let status = e.status();
        let undecodable = e.is_decode() || e.is_body();
        let message = e.without_url().to_string();
        match status {
            Some(status) => Self::Status {
                status: status.as_u16(),
                message,
            },
            None if undecodable => Self::Decode(message),
            None => Self::Transport(message),
        }
    }

    /// HTTP status code, if the endpoint returned one
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
