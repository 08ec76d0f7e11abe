//! Lifecycle controller for a single delegated download.
//!
//! The `StationDownload` struct and its operations are organized by concern:
//! - [`start`] - idempotent task creation (guards, folder ensure, retry)
//! - [`control`] - pause, resume, cancel
//! - [`poll`] - status polling and event translation
//!
//! One controller manages exactly one download. It owns no timers and no
//! threads: an external scheduler calls [`StationDownload::update`] on
//! whatever interval it likes, and consumes the resulting events.

mod control;
mod poll;
mod start;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

use crate::config::Config;
use crate::error::Result;
use crate::paths::resolve_remote_path;
use crate::station::StationClient;
use crate::types::{Event, Status, TaskId, Transfer};
use std::sync::Arc;

/// What the caller wants downloaded and where
#[derive(Clone, Debug)]
pub struct DownloadRequest {
    /// The resource to fetch
    pub source_uri: String,
    /// Caller-side file path, used only for labeling and error messages
    pub local_file_path: String,
    /// Path of the download relative to the destination root (and category)
    pub download_path: String,
    /// Pre-known remote task id when resuming a previously tracked download
    pub task_id: Option<TaskId>,
}

/// Mutable lifecycle state, grouped under one lock
struct TaskState {
    /// Set exactly once: from the request, or by a resolve/create cycle
    task_id: Option<TaskId>,
    status: Status,
    /// Last observed transfer snapshot; None outside active transfers
    progress: Option<Transfer>,
}

/// Controller for one download delegated to the remote service
///
/// Constructed via [`StationDownload::initialize`], which performs session
/// bootstrap and destination resolution but does not touch the remote task
/// table. The download itself starts with
/// [`start_download`](StationDownload::start_download).
pub struct StationDownload {
    pub(crate) client: Arc<dyn StationClient>,
    pub(crate) config: Arc<Config>,
    pub(crate) event_tx: tokio::sync::broadcast::Sender<Event>,
    source_uri: String,
    local_file_path: String,
    remote_destination: String,
    /// Id handed in at construction; kept separate from the live id so the
    /// already-added guard only ever fires for caller-supplied ids
    preassigned_id: Option<TaskId>,
    state: tokio::sync::RwLock<TaskState>,
}

impl std::fmt::Debug for StationDownload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StationDownload")
            .field("source_uri", &self.source_uri)
            .field("local_file_path", &self.local_file_path)
            .field("remote_destination", &self.remote_destination)
            .field("preassigned_id", &self.preassigned_id)
            .finish_non_exhaustive()
    }
}

impl StationDownload {
    /// Set up a controller: session bootstrap plus destination resolution.
    ///
    /// Logs in when the client has credentials configured, resolves the
    /// absolute remote destination from the configured root override (or the
    /// service's default destination, fetched here once), the optional
    /// category, and the request's download path. No remote task is created.
    ///
    /// # Errors
    ///
    /// Fails with a configuration error when no destination root is
    /// obtainable from either source, and propagates login or lookup
    /// failures from the service.
    pub async fn initialize(
        config: Config,
        client: Arc<dyn StationClient>,
        request: DownloadRequest,
    ) -> Result<Self> {
        client.login().await?;

        let root = match &config.destination.root {
            Some(explicit) => Some(explicit.clone()),
            None => Some(client.default_destination().await?),
        };
        let remote_destination = resolve_remote_path(
            root.as_deref(),
            config.destination.category.as_deref(),
            &request.download_path,
        )?;

        tracing::debug!(
            uri = %request.source_uri,
            file = %request.local_file_path,
            destination = %remote_destination,
            "download controller initialized"
        );

        let (event_tx, _rx) = tokio::sync::broadcast::channel(64);

        Ok(Self {
            client,
            config: Arc::new(config),
            event_tx,
            source_uri: request.source_uri,
            local_file_path: request.local_file_path,
            remote_destination,
            preassigned_id: request.task_id.clone(),
            state: tokio::sync::RwLock::new(TaskState {
                task_id: request.task_id,
                status: Status::Unstarted,
                progress: None,
            }),
        })
    }

    /// Subscribe to lifecycle events
    ///
    /// The contract is zero or more `Progress` events followed by one
    /// `Complete` event per terminal poll. Multiple subscribers are
    /// supported; each receives all events independently.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// The source URI this controller manages
    pub fn source_uri(&self) -> &str {
        &self.source_uri
    }

    /// The caller-side file path label
    pub fn local_file_path(&self) -> &str {
        &self.local_file_path
    }

    /// The resolved absolute remote destination path
    pub fn remote_destination(&self) -> &str {
        &self.remote_destination
    }

    /// Current lifecycle status
    pub async fn status(&self) -> Status {
        self.state.read().await.status
    }

    /// The remote task id, once one exists
    pub async fn task_id(&self) -> Option<TaskId> {
        self.state.read().await.task_id.clone()
    }

    /// Last observed transfer snapshot
    pub async fn progress(&self) -> Option<Transfer> {
        self.state.read().await.progress
    }

    /// Emit an event to all subscribers; dropped silently when nobody listens
    pub(crate) fn emit_event(&self, event: Event) {
        self.event_tx.send(event).ok();
    }
}
