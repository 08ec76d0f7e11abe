//! Shared test helpers: a scripted StationClient mock and controller builders.

use crate::config::{Config, RetryConfig};
use crate::error::{Error, Result};
use crate::station::{FolderEntry, StationClient, StationTask, TaskTransfer};
use crate::types::{Status, TaskId};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{StationDownload, TaskState};

/// Source URI used throughout controller and retry tests
pub(crate) const TEST_URI: &str = "http://example.com/linux.iso";

/// Build a remote task as the mock's task table stores it
pub(crate) fn remote_task(id: &str, uri: &str, status: &str) -> StationTask {
    StationTask {
        id: TaskId::new(id),
        uri: uri.to_string(),
        status: status.to_string(),
        size_total: 0,
        transfer: TaskTransfer::default(),
    }
}

/// Behavior of one scripted `create_task` call
#[derive(Clone, Copy, Debug)]
pub(crate) enum CreateScript {
    /// Register the task and return its id
    Succeed(&'static str),
    /// Register the task but return no id (asynchronous registration)
    SucceedSilently(&'static str),
    /// Acknowledge without registering anything
    ReturnNothing,
    /// Fail the call outright
    Fail,
}

/// Behavior of `list_folder`
#[derive(Clone, Copy, Debug, Default)]
pub(crate) enum FolderListBehavior {
    /// The folder exists (empty listing)
    #[default]
    Exists,
    /// Typed not-found
    Missing,
    /// Some unrelated service error
    OtherError,
}

/// Scripted in-memory stand-in for the remote download service
#[derive(Default)]
pub(crate) struct MockStationClient {
    /// The service's current task table
    pub(crate) tasks: Mutex<Vec<StationTask>>,

    create_scripts: Mutex<VecDeque<CreateScript>>,
    fail_creates: AtomicBool,
    /// Task registered by "another actor" as soon as a create call fails
    register_after_fail: Mutex<Option<StationTask>>,
    /// Countdown of list_tasks calls to fail before recovering
    failing_lists: AtomicU32,

    pub(crate) folder_list: Mutex<FolderListBehavior>,
    fail_create_folder: AtomicBool,

    pub(crate) default_destination: Mutex<Option<String>>,

    pub(crate) login_calls: AtomicU32,
    pub(crate) destination_calls: AtomicU32,
    pub(crate) list_calls: AtomicU32,
    pub(crate) create_calls: AtomicU32,
    pub(crate) delete_calls: AtomicU32,
    pub(crate) pause_calls: AtomicU32,
    pub(crate) resume_calls: AtomicU32,
    pub(crate) info_calls: AtomicU32,
    pub(crate) folder_list_calls: AtomicU32,
    pub(crate) folder_create_calls: AtomicU32,

    pub(crate) last_create_destination: Mutex<Option<String>>,
    pub(crate) last_delete: Mutex<Option<(TaskId, bool)>>,
    pub(crate) last_create_folder: Mutex<Option<(String, bool)>>,
}

impl MockStationClient {
    /// Queue the behavior of the next `create_task` call
    pub(crate) fn script_create(&self, script: CreateScript) {
        self.create_scripts.lock().unwrap().push_back(script);
    }

    /// Make every unscripted `create_task` call fail
    pub(crate) fn fail_all_creates(&self) {
        self.fail_creates.store(true, Ordering::SeqCst);
    }

    /// Register `task` in the table as soon as a create call has failed,
    /// simulating a concurrent actor adding the same URI between attempts
    pub(crate) fn tasks_after_failures(&self, task: StationTask) {
        *self.register_after_fail.lock().unwrap() = Some(task);
    }

    /// Fail the next `n` list_tasks calls, then recover
    pub(crate) fn fail_next_lists(&self, n: u32) {
        self.failing_lists.store(n, Ordering::SeqCst);
    }

    /// Make `create_folder` fail
    pub(crate) fn fail_folder_creation(&self) {
        self.fail_create_folder.store(true, Ordering::SeqCst);
    }

    fn total_remote_calls(&self) -> u32 {
        self.list_calls.load(Ordering::SeqCst)
            + self.create_calls.load(Ordering::SeqCst)
            + self.delete_calls.load(Ordering::SeqCst)
            + self.pause_calls.load(Ordering::SeqCst)
            + self.resume_calls.load(Ordering::SeqCst)
            + self.info_calls.load(Ordering::SeqCst)
            + self.folder_list_calls.load(Ordering::SeqCst)
            + self.folder_create_calls.load(Ordering::SeqCst)
            + self.destination_calls.load(Ordering::SeqCst)
    }

    /// Assert the no-op guards: nothing reached the service
    pub(crate) fn assert_no_remote_calls(&self) {
        assert_eq!(self.total_remote_calls(), 0, "expected zero remote calls");
    }
}

#[async_trait]
impl StationClient for MockStationClient {
    async fn login(&self) -> Result<()> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn default_destination(&self) -> Result<String> {
        self.destination_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .default_destination
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| "downloads".to_string()))
    }

    async fn list_tasks(&self) -> Result<Vec<StationTask>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_lists.load(Ordering::SeqCst) > 0 {
            self.failing_lists.fetch_sub(1, Ordering::SeqCst);
            return Err(Error::Api {
                code: 503,
                api: "mock.list".to_string(),
            });
        }
        Ok(self.tasks.lock().unwrap().clone())
    }

    async fn create_task(&self, uri: &str, destination: &str) -> Result<Vec<TaskId>> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_create_destination.lock().unwrap() = Some(destination.to_string());

        let script = self.create_scripts.lock().unwrap().pop_front().unwrap_or_else(|| {
            if self.fail_creates.load(Ordering::SeqCst) {
                CreateScript::Fail
            } else {
                CreateScript::ReturnNothing
            }
        });

        match script {
            CreateScript::Succeed(id) => {
                self.tasks.lock().unwrap().push(remote_task(id, uri, "waiting"));
                Ok(vec![TaskId::new(id)])
            }
            CreateScript::SucceedSilently(id) => {
                self.tasks.lock().unwrap().push(remote_task(id, uri, "waiting"));
                Ok(vec![])
            }
            CreateScript::ReturnNothing => Ok(vec![]),
            CreateScript::Fail => {
                if let Some(task) = self.register_after_fail.lock().unwrap().take() {
                    self.tasks.lock().unwrap().push(task);
                }
                Err(Error::Api {
                    code: 500,
                    api: "mock.create".to_string(),
                })
            }
        }
    }

    async fn delete_task(&self, id: &TaskId, force_complete: bool) -> Result<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_delete.lock().unwrap() = Some((id.clone(), force_complete));
        self.tasks.lock().unwrap().retain(|task| &task.id != id);
        Ok(())
    }

    async fn pause_task(&self, _id: &TaskId) -> Result<()> {
        self.pause_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn resume_task(&self, _id: &TaskId) -> Result<()> {
        self.resume_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn task_info(&self, id: &TaskId) -> Result<StationTask> {
        self.info_calls.fetch_add(1, Ordering::SeqCst);
        self.tasks
            .lock()
            .unwrap()
            .iter()
            .find(|task| &task.id == id)
            .cloned()
            .ok_or_else(|| Error::TaskNotFound { id: id.clone() })
    }

    async fn list_folder(&self, path: &str) -> Result<Vec<FolderEntry>> {
        self.folder_list_calls.fetch_add(1, Ordering::SeqCst);
        match *self.folder_list.lock().unwrap() {
            FolderListBehavior::Exists => Ok(vec![]),
            FolderListBehavior::Missing => Err(Error::FolderNotFound {
                path: path.to_string(),
            }),
            FolderListBehavior::OtherError => Err(Error::Api {
                code: 402,
                api: "mock.folder".to_string(),
            }),
        }
    }

    async fn create_folder(&self, path: &str, create_parents: bool) -> Result<()> {
        self.folder_create_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_create_folder.lock().unwrap() = Some((path.to_string(), create_parents));
        if self.fail_create_folder.load(Ordering::SeqCst) {
            return Err(Error::Api {
                code: 407,
                api: "mock.folder".to_string(),
            });
        }
        Ok(())
    }
}

/// Retry tuning with delays short enough for tests
pub(crate) fn fast_retry() -> RetryConfig {
    RetryConfig {
        max_attempts: 5,
        backoff_step: Duration::from_millis(5),
    }
}

/// Assemble a controller directly, bypassing `initialize`, so tests control
/// every field, including destinations `initialize` would never produce.
pub(crate) fn build_download(
    client: Arc<MockStationClient>,
    destination: &str,
    preassigned: Option<TaskId>,
) -> StationDownload {
    let (event_tx, _rx) = tokio::sync::broadcast::channel(64);
    let config = Config {
        retry: fast_retry(),
        ..Config::default()
    };

    StationDownload {
        client,
        config: Arc::new(config),
        event_tx,
        source_uri: TEST_URI.to_string(),
        local_file_path: "/library/linux.iso".to_string(),
        remote_destination: destination.to_string(),
        preassigned_id: preassigned.clone(),
        state: tokio::sync::RwLock::new(TaskState {
            task_id: preassigned,
            status: Status::Unstarted,
            progress: None,
        }),
    }
}
