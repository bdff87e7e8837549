//! Paperfetch Core - shared infrastructure for the paperfetch pipeline
//!
//! Blocking HTTP helpers over a shared client, the remote error type,
//! logging setup and progress display.

pub mod error;
pub mod http;
pub mod logging;
pub mod progress;

// Re-exports for convenience
pub use error::RemoteError;
pub use http::{get_text, post_form_text};
pub use logging::{IndicatifLogger, init_logging};
pub use progress::ProgressContext;
