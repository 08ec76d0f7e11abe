//! # station-dl
//!
//! Lifecycle controller for downloads delegated to a NAS-hosted download
//! agent (a "Download Station") reachable over its HTTP web API.
//!
//! ## Design Philosophy
//!
//! station-dl is designed to be:
//! - **Per-task** - one controller manages exactly one download's lifecycle
//! - **Idempotent** - starting the same URI twice never creates two remote tasks
//! - **Resilient** - creation survives transient failures with bounded, linear backoff
//! - **Externally driven** - no internal timers or threads; a scheduler calls
//!   `update()` and consumes the resulting events
//! - **Library-first** - no CLI or UI, purely a Rust crate for embedding
//!
//! ## Quick Start
//!
//! ```no_run
//! use station_dl::{Config, DownloadRequest, HttpStationClient, StationDownload};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let client = Arc::new(HttpStationClient::new(&config.station)?);
//!
//!     let download = StationDownload::initialize(
//!         config,
//!         client,
//!         DownloadRequest {
//!             source_uri: "http://example.com/linux.iso".to_string(),
//!             local_file_path: "/library/linux.iso".to_string(),
//!             download_path: "isos".to_string(),
//!             task_id: None,
//!         },
//!     )
//!     .await?;
//!
//!     // Subscribe to events, then hand the URI to the service
//!     let mut events = download.subscribe();
//!     let id = download.start_download().await?;
//!     println!("queued as {id}");
//!
//!     // An external scheduler polls on its own interval:
//!     download.update().await;
//!     while let Ok(event) = events.try_recv() {
//!         println!("event: {event:?}");
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Configuration types
pub mod config;
/// Lifecycle controller (decomposed into focused submodules)
pub mod controller;
/// Error types
pub mod error;
/// Remote destination path resolution
pub mod paths;
/// Idempotent task creation with bounded retries and linear backoff
pub mod retry;
/// Remote download service client
pub mod station;
/// Core types and events
pub mod types;

// Re-export commonly used types
pub use config::{Config, DestinationConfig, RetryConfig, StationConfig};
pub use controller::{DownloadRequest, StationDownload};
pub use error::{Error, Result};
pub use station::{FolderEntry, HttpStationClient, StationClient, StationTask, TaskTransfer};
pub use types::{Event, Status, TaskId, Transfer};
