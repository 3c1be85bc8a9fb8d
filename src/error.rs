//! Error kinds shared by the tag adapter, the catalog client and the matcher.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Extension is neither `.mp3` nor `.m4a`. The file is skipped.
    #[error("Unsupported format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// The tag container could not be parsed. The file is skipped.
    #[error("Corrupt file {}: {reason}", path.display())]
    CorruptFile { path: PathBuf, reason: String },

    /// Saving the tag failed (read-only, locked, ...). Reported per file.
    #[error("Write failed for {}: {reason}", path.display())]
    WriteFailed { path: PathBuf, reason: String },

    #[error("Catalog unavailable: {0}")]
    RemoteUnavailable(String),

    #[error("No results for '{query}' in [{locale}] store")]
    NoMatch { query: String, locale: String },

    #[error("Invalid input: {0}")]
    AmbiguousInput(String),

    /// Every locale returned zero tracks for the chosen collection.
    #[error("No tracks found for collection {collection_id} in [{locale}] store")]
    NoTracks { collection_id: u64, locale: String },

    #[error("Operation not allowed while session is {0}")]
    InvalidState(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ureq::Error> for Error {
    fn from(e: ureq::Error) -> Self {
        Error::RemoteUnavailable(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::RemoteUnavailable(format!("malformed response: {}", e))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
