//! Download lifecycle control: pause, resume, cancel.

use crate::error::Result;
use crate::types::Status;

use super::StationDownload;

impl StationDownload {
    /// Pause the download on the remote service.
    ///
    /// A no-op when no remote task exists yet: nothing to pause, no remote
    /// call is made.
    pub async fn pause(&self) -> Result<()> {
        let mut state = self.state.write().await;
        let Some(id) = state.task_id.clone() else {
            tracing::debug!(uri = %self.source_uri(), "pause requested before any remote task exists");
            return Ok(());
        };

        self.client.pause_task(&id).await?;
        state.status = Status::Paused;
        tracing::info!(%id, "download paused");
        Ok(())
    }

    /// Resume a paused download on the remote service.
    ///
    /// Symmetric to [`pause`](Self::pause), including the no-op guard.
    pub async fn resume(&self) -> Result<()> {
        let mut state = self.state.write().await;
        let Some(id) = state.task_id.clone() else {
            tracing::debug!(uri = %self.source_uri(), "resume requested before any remote task exists");
            return Ok(());
        };

        self.client.resume_task(&id).await?;
        state.status = Status::Active;
        tracing::info!(%id, "download resumed");
        Ok(())
    }

    /// Stop tracking the download and remove its task from the service.
    ///
    /// The delete is soft: completed data is not forced into place
    /// (`force_complete` stays false). A no-op when no remote task exists.
    /// The in-flight retry loop of a concurrent `start_download` is not
    /// interrupted; cancellation only removes the remote-side task.
    pub async fn cancel(&self) -> Result<()> {
        let mut state = self.state.write().await;
        let Some(id) = state.task_id.clone() else {
            tracing::debug!(uri = %self.source_uri(), "cancel requested before any remote task exists");
            return Ok(());
        };

        self.client.delete_task(&id, false).await?;
        state.status = Status::NotFound;
        state.progress = None;
        tracing::info!(%id, uri = %self.source_uri(), "download cancelled and task removed");
        Ok(())
    }
}
