//! Status polling translated into progress and completion events.

use crate::types::{Event, Status, Transfer};

use super::StationDownload;

impl StationDownload {
    /// Poll the remote task once and translate the outcome into an event.
    ///
    /// Meant to be driven by an external scheduler on its own interval; one
    /// call costs at most one network round trip. The translation:
    ///
    /// - no remote task id yet: nothing happens
    /// - the service reports `finished`: one `Complete` event with no error,
    ///   the download is terminal
    /// - the fetch fails or the task is gone: one `Complete` event carrying
    ///   a "Task not found" error, the download is terminal
    /// - anything else: a `Progress` event with the task's transfer counters
    ///
    /// Failures are delivered through the event channel rather than returned:
    /// the scheduler polls fire-and-forget, with nobody awaiting a result.
    /// Polls after a terminal event keep reporting it; stopping the polling
    /// is the scheduler's side of the contract.
    pub async fn update(&self) {
        let current = self.state.read().await.task_id.clone();
        let Some(id) = current else {
            tracing::trace!(uri = %self.source_uri(), "no remote task yet, nothing to poll");
            return;
        };

        match self.client.task_info(&id).await {
            Ok(task) if task.is_finished() => {
                {
                    let mut state = self.state.write().await;
                    state.status = Status::Finished;
                    state.progress = None;
                }
                tracing::info!(%id, uri = %self.source_uri(), "download finished");
                self.emit_event(Event::Complete { error: None });
            }
            Ok(task) => {
                let transfer = Transfer {
                    bytes_done: task.transfer.size_downloaded,
                    bytes_total: task.size_total,
                    speed_bps: task.transfer.speed_download,
                };
                self.state.write().await.progress = Some(transfer);
                tracing::trace!(
                    %id,
                    bytes_done = transfer.bytes_done,
                    bytes_total = transfer.bytes_total,
                    speed_bps = transfer.speed_bps,
                    "download progressing"
                );
                self.emit_event(Event::Progress {
                    bytes_done: transfer.bytes_done,
                    bytes_total: transfer.bytes_total,
                    speed_bps: transfer.speed_bps,
                });
            }
            Err(e) => {
                tracing::warn!(%id, uri = %self.source_uri(), error = %e, "remote task lost");
                {
                    let mut state = self.state.write().await;
                    state.status = Status::NotFound;
                    state.progress = None;
                }
                self.emit_event(Event::Complete {
                    error: Some("Task not found".to_string()),
                });
            }
        }
    }
}
