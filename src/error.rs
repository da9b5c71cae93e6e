//! Errors at the catalogue-source boundary. The palette engines themselves
//! never fail.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PaletteError {
    #[error("reading catalogue: {0}")]
    Io(#[from] std::io::Error),
    #[error("parsing catalogue: {0}")]
    Json(#[from] serde_json::Error),
    #[error("fetching catalogue: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("ranking task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
