// Error type shared by the library modules. The binary wraps these in
// `anyhow` and prints the chain; nothing here is recovered from locally.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CloudLabelError>;

#[derive(Debug, Error)]
pub enum CloudLabelError {
    /// Network failure or non-success status from the service (listing,
    /// thumbnail download or upload).
    #[error("request to {url} failed: {reason}")]
    RemoteFetch { url: String, reason: String },

    #[error("cannot derive a local file name from thumbnail url {url:?}")]
    InvalidThumbnailUrl { url: String },

    #[error("I/O error on {}: {source}", .path.display())]
    LocalIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("nothing to upload in {}", .path.display())]
    EmptyUpload { path: PathBuf },
}

impl CloudLabelError {
    pub fn remote(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::RemoteFetch {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::LocalIo {
            path: path.into(),
            source,
        }
    }
}
