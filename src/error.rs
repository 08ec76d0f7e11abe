//! Error types for station-dl
//!
//! The taxonomy separates the failures the retry engine may keep attempting
//! (network transport, remote API errors) from the ones that are fatal on
//! first sight (configuration, already-added, invalid destination). "Not
//! found" is a typed variant rather than a swallowed exception so callers
//! branch on it explicitly; the folder-existence check in particular relies
//! on matching `FolderNotFound`.

use crate::types::TaskId;
use thiserror::Error;

/// Result type alias for station-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for station-dl
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "destination.root")
        key: Option<String>,
    },

    /// The resolved remote destination path is empty
    #[error("invalid destination: resolved remote path is empty")]
    InvalidDestination,

    /// A pre-supplied task id already maps to a live remote task
    ///
    /// Distinct from the idempotent found-by-URI path, which is success:
    /// this guards against a caller accidentally re-adding a task it
    /// already owns.
    #[error("task {id} already added to the download service")]
    AlreadyAdded {
        /// The pre-supplied id that is still live on the remote service
        id: TaskId,
    },

    /// Task creation failed on every attempt of the retry budget
    #[error("failed to create download task for {uri} after {attempts} attempts")]
    ExhaustedRetries {
        /// Number of attempts made before giving up
        attempts: u32,
        /// The source URI that could not be queued
        uri: String,
    },

    /// The remote service knows no task under this id
    #[error("task {id} not found on the download service")]
    TaskNotFound {
        /// The id the remote service did not recognize
        id: TaskId,
    },

    /// The remote service knows no folder at this path
    #[error("folder {path} not found on the download service")]
    FolderNotFound {
        /// The absolute remote path that does not exist
        path: String,
    },

    /// The remote service answered with an application-level error code
    #[error("download service error {code} from {api}")]
    Api {
        /// Error code from the response envelope
        code: i32,
        /// The API that produced the error (e.g., "SYNO.DownloadStation.Task")
        api: String,
    },

    /// Login failed or no session is available
    #[error("session error: {0}")]
    Session(String),

    /// Network transport error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
