//! Core types for station-dl

use serde::{Deserialize, Serialize};

/// Opaque identifier assigned to a task by the remote download service
///
/// The id is the primary key for every subsequent operation on a remote task
/// (pause, resume, delete, status). Once assigned to a download it never
/// changes for that download's lifetime.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl TaskId {
    /// Create a new TaskId
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for TaskId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status of a delegated download
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Created locally, no remote task yet
    Unstarted,
    /// Downloading (or queued) on the remote service
    Active,
    /// Paused on the remote service
    Paused,
    /// Remote service reported the download finished
    Finished,
    /// Creation exhausted its retry budget
    Failed,
    /// Remote task disappeared (or was cancelled)
    NotFound,
}

impl Status {
    /// Whether this status ends the download's lifecycle
    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Finished | Status::Failed | Status::NotFound)
    }
}

/// Transfer progress snapshot taken from the remote task's transfer details
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    /// Bytes downloaded so far
    pub bytes_done: u64,
    /// Total size in bytes (0 when the remote service does not know it yet)
    pub bytes_total: u64,
    /// Current download speed in bytes per second
    pub speed_bps: u64,
}

/// Event emitted during the download lifecycle
///
/// The contract is: zero or more `Progress` events, then exactly one
/// `Complete` event per poll that observes a terminal condition. The crate
/// does not suppress duplicate terminal emissions across polls; avoiding
/// polls on a finished download is the scheduler's responsibility.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Periodic progress update while the remote task is alive
    Progress {
        /// Bytes downloaded so far
        bytes_done: u64,
        /// Total size in bytes
        bytes_total: u64,
        /// Current download speed in bytes per second
        speed_bps: u64,
    },

    /// The download reached a terminal condition
    Complete {
        /// None on success; an error message when the task was lost
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
}
