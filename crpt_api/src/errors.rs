use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CrptError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("document rejected with status {status}: {body}")]
    Rejected { status: StatusCode, body: String },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CrptError>;
