//! Idempotent task creation with bounded retries and linear backoff.
//!
//! This module is the core correctness mechanism of the crate: it must
//! tolerate transient network failures and remote-side eventual registration
//! without ever creating duplicate downloads for one source URI. Every
//! attempt therefore starts with a lookup, and a creation that yields no id
//! is given a second lookup before it counts as failed.

use crate::config::RetryConfig;
use crate::error::{Error, Result};
use crate::station::StationClient;
use crate::types::TaskId;

/// Find the remote task already registered for `uri`, if any.
///
/// Lists all tasks known to the service and returns the id of the first one
/// whose recorded source URI equals `uri`. This is the idempotency check: it
/// runs before every creation attempt so that re-requesting a download never
/// produces a duplicate remote task.
pub async fn resolve_existing(client: &dyn StationClient, uri: &str) -> Result<Option<TaskId>> {
    let tasks = client.list_tasks().await?;
    Ok(tasks.into_iter().find(|task| task.uri == uri).map(|task| task.id))
}

/// Create a remote task for `uri`, retrying failed attempts with linear
/// backoff until `retry.max_attempts` is exhausted.
///
/// `destination` is the absolute resolved remote path; the service API wants
/// it without the leading slash, which is stripped here. Attempt `n` waits
/// `n * retry.backoff_step` before the next one; there is no wait after the
/// final attempt. Any client error counts as a failed attempt; the next
/// attempt's lookup decides whether the task actually made it through.
pub async fn create_with_retry(
    client: &dyn StationClient,
    uri: &str,
    destination: &str,
    retry: &RetryConfig,
) -> Result<TaskId> {
    let api_destination = destination.trim_start_matches('/');

    let mut attempt: u32 = 0;
    loop {
        attempt += 1;

        match try_create(client, uri, api_destination).await {
            Ok(Some(id)) => {
                tracing::info!(
                    %id,
                    uri,
                    attempt,
                    "download task available on the service"
                );
                return Ok(id);
            }
            Ok(None) => {
                tracing::warn!(
                    uri,
                    attempt,
                    max_attempts = retry.max_attempts,
                    "creation yielded no task id"
                );
            }
            Err(e) => {
                tracing::warn!(
                    uri,
                    attempt,
                    max_attempts = retry.max_attempts,
                    error = %e,
                    "creation attempt failed"
                );
            }
        }

        if attempt >= retry.max_attempts {
            return Err(Error::ExhaustedRetries {
                attempts: retry.max_attempts,
                uri: uri.to_string(),
            });
        }

        let delay = retry.backoff_step * attempt;
        tracing::debug!(uri, delay_ms = delay.as_millis() as u64, "backing off before retry");
        tokio::time::sleep(delay).await;
    }
}

/// One creation attempt: lookup, create, and (when the service registers
/// tasks asynchronously) a second lookup.
async fn try_create(
    client: &dyn StationClient,
    uri: &str,
    api_destination: &str,
) -> Result<Option<TaskId>> {
    // Another actor may have registered the URI since the last attempt;
    // finding it is success, not a conflict.
    if let Some(id) = resolve_existing(client, uri).await? {
        return Ok(Some(id));
    }

    let ids = client.create_task(uri, api_destination).await?;
    if let Some(id) = ids.into_iter().next() {
        return Ok(Some(id));
    }

    // The service sometimes reports success before the task shows up under
    // an id; look once more before writing the attempt off.
    resolve_existing(client, uri).await
}
