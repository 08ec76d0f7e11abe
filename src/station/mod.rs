//! Remote download service client.
//!
//! The controller talks to the NAS-hosted download agent exclusively through
//! the [`StationClient`] trait. The production implementation is
//! [`HttpStationClient`], which speaks the service's web API; tests drive the
//! controller with a scripted mock instead.

mod http;


pub use http::HttpStationClient;

use crate::error::Result;
use crate::types::TaskId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Transfer details of a remote task
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct TaskTransfer {
    /// Bytes the service has downloaded so far
    #[serde(default)]
    pub size_downloaded: u64,
    /// Current download speed in bytes per second
    #[serde(default)]
    pub speed_download: u64,
}

/// A download task as reported by the remote service
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StationTask {
    /// Identifier assigned by the service
    pub id: TaskId,
    /// The source URI the task was created from
    #[serde(default)]
    pub uri: String,
    /// Service-side status string (e.g., "waiting", "downloading", "finished")
    #[serde(default)]
    pub status: String,
    /// Total size in bytes, 0 until the service knows it
    #[serde(default)]
    pub size_total: u64,
    /// Transfer progress details
    #[serde(default)]
    pub transfer: TaskTransfer,
}

impl StationTask {
    /// Whether the service considers this task finished
    pub fn is_finished(&self) -> bool {
        self.status == "finished"
    }
}

/// An entry of a remote folder listing
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FolderEntry {
    /// Entry name within the folder
    pub name: String,
    /// Whether the entry is itself a folder
    #[serde(default)]
    pub is_dir: bool,
}

/// Contract exposed by the remote download service
///
/// One client instance is shared by every controller talking to the same
/// service; implementations must be safe for concurrent use and must reuse
/// their session rather than logging in per call.
#[async_trait]
pub trait StationClient: Send + Sync {
    /// Establish a session with the service
    async fn login(&self) -> Result<()>;

    /// The service's configured default destination folder
    async fn default_destination(&self) -> Result<String>;

    /// List all tasks currently known to the service
    async fn list_tasks(&self) -> Result<Vec<StationTask>>;

    /// Create a download task; the destination is passed without its leading
    /// slash, per the service API's convention. Returns the ids the service
    /// assigned (possibly empty when it registers the task asynchronously).
    async fn create_task(&self, uri: &str, destination: &str) -> Result<Vec<TaskId>>;

    /// Delete a task; `force_complete` forces completed data into place first
    async fn delete_task(&self, id: &TaskId, force_complete: bool) -> Result<()>;

    /// Pause a task
    async fn pause_task(&self, id: &TaskId) -> Result<()>;

    /// Resume a paused task
    async fn resume_task(&self, id: &TaskId) -> Result<()>;

    /// Fetch a single task's current state; fails with
    /// [`crate::Error::TaskNotFound`] when the service no longer knows the id
    async fn task_info(&self, id: &TaskId) -> Result<StationTask>;

    /// List a folder; fails with [`crate::Error::FolderNotFound`] when the
    /// path does not exist
    async fn list_folder(&self, path: &str) -> Result<Vec<FolderEntry>>;

    /// Create a folder, including intermediate parents when requested
    async fn create_folder(&self, path: &str, create_parents: bool) -> Result<()>;
}
