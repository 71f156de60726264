//! Crate error type
//!
//! The simulation itself never fails. Errors only come from the edges:
//! storage backends, persisted JSON, tuning files and event listeners.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The storage backend refused a read or write
    #[error("storage: {0}")]
    Storage(String),
    /// Persisted data or a tuning file did not parse
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid tuning: {0}")]
    InvalidTuning(String),
    /// An event listener failed to react to an event
    #[error("listener {name}: {detail}")]
    Listener { name: &'static str, detail: String },
}
