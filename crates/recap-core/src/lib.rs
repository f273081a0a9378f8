//! Recap Core Library
//!
//! Core functionality for fetching YouTube caption tracks, cleaning SRT
//! transcripts, and producing hierarchical summaries with a local Ollama
//! backend.

pub mod captions;
pub mod chunk;
pub mod clean;
pub mod error;
pub mod ollama;
pub mod summarize;
pub mod workdir;

// Re-export commonly used items at crate root
pub use captions::{download_captions, validate_url};
pub use chunk::{DEFAULT_MAX_CHARS, chunk_text};
pub use clean::{FILLER_LINES, clean_srt};
pub use error::{RecapError, Result};
pub use ollama::{DEFAULT_BASE_URL, DEFAULT_MODEL, Generate, OllamaClient};
pub use summarize::{
    BatchSummary, DEFAULT_BATCH_SIZE, DEFAULT_WORKERS, Digests, finalize, merge_summaries,
    summarize_batches,
};
pub use workdir::{get_root_workdir, get_workdir};
