use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecapError {
    #[error("Invalid video URL: {input:?} (must start with http:// or https://)")]
    InvalidUrl { input: String },

    #[error("No captions available for {url}: {reason}")]
    CaptionsUnavailable { url: String, reason: String },

    #[error("Generation backend unreachable: {0}")]
    BackendUnavailable(#[from] reqwest::Error),

    #[error("Generation backend returned status {status}")]
    BackendError { status: u16 },

    #[error("Summarization task failed: {reason}")]
    TaskFailed { reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RecapError>;
