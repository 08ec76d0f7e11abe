//! Idempotent download start: guards, folder ensure, creation with retry.

use crate::error::{Error, Result};
use crate::retry;
use crate::types::{Status, TaskId};

use super::StationDownload;

impl StationDownload {
    /// Get this download running on the remote service.
    ///
    /// Resolution order: fail fast on an unusable destination, fail fast when
    /// a pre-supplied id still names a live task, make sure the destination
    /// folder exists, then hand off to the resolve/create retry loop. The
    /// returned id is the one the service tracks this download under, whether
    /// this call created it or an earlier one did.
    ///
    /// This is the one long-running operation of the controller: with the
    /// default retry tuning it may block for the full backoff budget
    /// (1+2+3+4 seconds) before giving up. Callers wanting a harder limit
    /// impose their own timeout around it.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidDestination`] when the resolved remote path is empty
    /// - [`Error::AlreadyAdded`] when the pre-supplied id maps to a live task
    /// - [`Error::ExhaustedRetries`] when every creation attempt failed
    /// - folder creation failures, propagated from the destination ensure step
    pub async fn start_download(&self) -> Result<TaskId> {
        if self.remote_destination().is_empty() {
            return Err(Error::InvalidDestination);
        }

        // Guard against re-adding a task the caller already owns. Only the
        // constructor-supplied id is checked: an id acquired by an earlier
        // start_download call goes through the resolver below and comes back
        // as the same task, which is success.
        if let Some(pre) = &self.preassigned_id {
            match self.client.task_info(pre).await {
                Ok(_) => {
                    tracing::warn!(
                        id = %pre,
                        uri = %self.source_uri(),
                        "task was already added to the service"
                    );
                    return Err(Error::AlreadyAdded { id: pre.clone() });
                }
                Err(Error::TaskNotFound { .. }) => {
                    tracing::debug!(id = %pre, "previously tracked task is gone, starting fresh");
                }
                Err(e) => return Err(e),
            }
        }

        self.ensure_folder(self.remote_destination()).await?;

        let created = retry::create_with_retry(
            self.client.as_ref(),
            self.source_uri(),
            self.remote_destination(),
            &self.config.retry,
        )
        .await;

        match created {
            Ok(id) => {
                let mut state = self.state.write().await;
                state.task_id = Some(id.clone());
                state.status = Status::Active;
                tracing::info!(
                    %id,
                    uri = %self.source_uri(),
                    file = %self.local_file_path(),
                    "download started"
                );
                Ok(id)
            }
            Err(e) => {
                self.state.write().await.status = Status::Failed;
                Err(e)
            }
        }
    }

    /// Make sure the destination folder exists on the service.
    ///
    /// A listing failure of any kind is treated as "folder absent" and
    /// answered with a creation attempt (parents included); a failure of the
    /// creation itself propagates to the caller.
    pub(crate) async fn ensure_folder(&self, path: &str) -> Result<()> {
        match self.client.list_folder(path).await {
            Ok(_) => return Ok(()),
            Err(Error::FolderNotFound { .. }) => {
                tracing::debug!(path, "destination folder missing, creating it");
            }
            Err(e) => {
                // Listing can fail for reasons other than absence; creation
                // will surface a real error if the path is unusable.
                tracing::debug!(path, error = %e, "folder listing failed, attempting creation");
            }
        }

        self.client.create_folder(path, true).await
    }
}
