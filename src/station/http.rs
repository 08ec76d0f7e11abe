//! HTTP implementation of the [`StationClient`] contract.
//!
//! Speaks the Download Station web API: every call is a GET against a `.cgi`
//! endpoint carrying `api`/`version`/`method` query parameters and answered
//! with a `{success, data, error: {code}}` envelope. A session id is obtained
//! once via `auth.cgi` and appended to subsequent calls; the underlying
//! `reqwest::Client` pools connections, so one `HttpStationClient` can be
//! shared by any number of controllers.

use super::{FolderEntry, StationClient, StationTask, TaskTransfer};
use crate::config::StationConfig;
use crate::error::{Error, Result};
use crate::types::TaskId;
use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

const AUTH_CGI: &str = "webapi/auth.cgi";
const TASK_CGI: &str = "webapi/DownloadStation/task.cgi";
const INFO_CGI: &str = "webapi/DownloadStation/info.cgi";
const FILE_CGI: &str = "webapi/FileStation/file_share.cgi";

const AUTH_API: &str = "SYNO.API.Auth";
const TASK_API: &str = "SYNO.DownloadStation.Task";
const INFO_API: &str = "SYNO.DownloadStation.Info";
const FILE_API: &str = "SYNO.FileStation.List";

/// Task API: the id does not name a live task.
const ERR_INVALID_TASK_ID: i32 = 404;
/// File API: no such file or directory.
const ERR_NO_SUCH_PATH: i32 = 408;

/// Response envelope shared by every web API endpoint
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    success: bool,
    data: Option<T>,
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: i32,
}

#[derive(Debug, Deserialize)]
struct LoginData {
    sid: String,
}

#[derive(Debug, Deserialize)]
struct ServiceConfigData {
    #[serde(default)]
    default_destination: String,
}

#[derive(Debug, Deserialize)]
struct TaskListData {
    #[serde(default)]
    tasks: Vec<WireTask>,
}

#[derive(Debug, Deserialize)]
struct CreateData {
    #[serde(default)]
    task_id: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct FolderListData {
    #[serde(default)]
    files: Vec<WireFolderEntry>,
}

#[derive(Debug, Deserialize)]
struct WireFolderEntry {
    name: String,
    #[serde(default)]
    isdir: bool,
}

/// Task as the wire reports it; the URI and transfer counters ride in the
/// `additional` blob requested via `additional=detail,transfer`.
#[derive(Debug, Deserialize)]
struct WireTask {
    id: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    size: u64,
    #[serde(default)]
    additional: WireAdditional,
}

#[derive(Debug, Default, Deserialize)]
struct WireAdditional {
    #[serde(default)]
    detail: WireDetail,
    #[serde(default)]
    transfer: WireTransfer,
}

#[derive(Debug, Default, Deserialize)]
struct WireDetail {
    #[serde(default)]
    uri: String,
}

#[derive(Debug, Default, Deserialize)]
struct WireTransfer {
    #[serde(default)]
    size_downloaded: u64,
    #[serde(default)]
    speed_download: u64,
}

impl From<WireTask> for StationTask {
    fn from(wire: WireTask) -> Self {
        StationTask {
            id: TaskId::new(wire.id),
            uri: wire.additional.detail.uri,
            status: wire.status,
            size_total: wire.size,
            transfer: TaskTransfer {
                size_downloaded: wire.additional.transfer.size_downloaded,
                speed_download: wire.additional.transfer.speed_download,
            },
        }
    }
}

/// Web API client for the remote download service
pub struct HttpStationClient {
    http: reqwest::Client,
    base_url: Url,
    username: Option<String>,
    password: Option<String>,
    /// Session id from auth.cgi; None until login, or when no credentials
    /// are configured (some setups front the service with their own auth).
    sid: tokio::sync::RwLock<Option<String>>,
}

impl HttpStationClient {
    /// Build a client for the service at `config.base_url`.
    pub fn new(config: &StationConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| Error::Config {
            message: format!("invalid station base URL '{}': {e}", config.base_url),
            key: Some("station.base_url".to_string()),
        })?;

        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            username: config.username.clone(),
            password: config.password.clone(),
            sid: tokio::sync::RwLock::new(None),
        })
    }

    fn endpoint(&self, cgi: &str) -> Result<Url> {
        self.base_url.join(cgi).map_err(|e| Error::Config {
            message: format!("cannot build endpoint URL for {cgi}: {e}"),
            key: Some("station.base_url".to_string()),
        })
    }

    /// Issue one GET and decode the response envelope. Transport and HTTP
    /// status failures surface as `Error::Network`; envelope errors are left
    /// for the caller, which knows the operation-specific code mapping.
    async fn call<T: DeserializeOwned>(
        &self,
        cgi: &str,
        params: &[(&str, &str)],
    ) -> Result<Envelope<T>> {
        let url = self.endpoint(cgi)?;
        let mut request = self.http.get(url).query(params);

        if let Some(sid) = self.sid.read().await.as_deref() {
            request = request.query(&[("_sid", sid)]);
        }

        let response = request.send().await?.error_for_status()?;
        let envelope = response.json::<Envelope<T>>().await?;
        Ok(envelope)
    }

    /// Reduce an envelope to its data, mapping envelope errors through
    /// `map_err_code` so operations can type their not-found cases.
    fn unwrap_envelope<T>(
        envelope: Envelope<T>,
        api: &str,
        map_err_code: impl Fn(i32) -> Option<Error>,
    ) -> Result<Option<T>> {
        if let Some(body) = envelope.error {
            if let Some(typed) = map_err_code(body.code) {
                return Err(typed);
            }
            return Err(Error::Api {
                code: body.code,
                api: api.to_string(),
            });
        }
        if !envelope.success {
            // Envelope said failure but carried no code; treat as code 0.
            return Err(Error::Api {
                code: 0,
                api: api.to_string(),
            });
        }
        Ok(envelope.data)
    }
}

#[async_trait]
impl StationClient for HttpStationClient {
    async fn login(&self) -> Result<()> {
        let (Some(username), Some(password)) = (&self.username, &self.password) else {
            tracing::debug!("no credentials configured, skipping login");
            return Ok(());
        };

        let envelope: Envelope<LoginData> = self
            .call(
                AUTH_CGI,
                &[
                    ("api", AUTH_API),
                    ("version", "2"),
                    ("method", "login"),
                    ("account", username),
                    ("passwd", password),
                    ("session", "DownloadStation"),
                    ("format", "sid"),
                ],
            )
            .await?;

        if let Some(body) = envelope.error {
            return Err(Error::Session(format!(
                "login rejected with code {}",
                body.code
            )));
        }
        let data = envelope
            .data
            .ok_or_else(|| Error::Session("login response carried no session id".to_string()))?;

        tracing::debug!(account = %username, "session established");
        *self.sid.write().await = Some(data.sid);
        Ok(())
    }

    async fn default_destination(&self) -> Result<String> {
        let envelope: Envelope<ServiceConfigData> = self
            .call(
                INFO_CGI,
                &[("api", INFO_API), ("version", "1"), ("method", "getconfig")],
            )
            .await?;

        let data = Self::unwrap_envelope(envelope, INFO_API, |_| None)?;
        Ok(data.map(|d| d.default_destination).unwrap_or_default())
    }

    async fn list_tasks(&self) -> Result<Vec<StationTask>> {
        let envelope: Envelope<TaskListData> = self
            .call(
                TASK_CGI,
                &[
                    ("api", TASK_API),
                    ("version", "1"),
                    ("method", "list"),
                    ("additional", "detail,transfer"),
                ],
            )
            .await?;

        let data = Self::unwrap_envelope(envelope, TASK_API, |_| None)?;
        Ok(data
            .map(|d| d.tasks.into_iter().map(StationTask::from).collect())
            .unwrap_or_default())
    }

    async fn create_task(&self, uri: &str, destination: &str) -> Result<Vec<TaskId>> {
        // Some service firmwares are strict about the encoding of the uri
        // parameter; build this query by hand so arbitrary magnet/ftp/http
        // URIs are encoded exactly once.
        let mut url = self.endpoint(TASK_CGI)?;
        let mut query = format!(
            "api={TASK_API}&version=1&method=create&uri={}&destination={}",
            urlencoding::encode(uri),
            urlencoding::encode(destination)
        );
        if let Some(sid) = self.sid.read().await.as_deref() {
            query.push_str("&_sid=");
            query.push_str(sid);
        }
        url.set_query(Some(query.as_str()));

        let response = self.http.get(url).send().await?.error_for_status()?;
        let envelope = response.json::<Envelope<CreateData>>().await?;

        let data = Self::unwrap_envelope(envelope, TASK_API, |_| None)?;
        Ok(data
            .map(|d| d.task_id.into_iter().map(TaskId::new).collect())
            .unwrap_or_default())
    }

    async fn delete_task(&self, id: &TaskId, force_complete: bool) -> Result<()> {
        let force = if force_complete { "true" } else { "false" };
        let envelope: Envelope<serde_json::Value> = self
            .call(
                TASK_CGI,
                &[
                    ("api", TASK_API),
                    ("version", "1"),
                    ("method", "delete"),
                    ("id", id.as_str()),
                    ("force_complete", force),
                ],
            )
            .await?;

        Self::unwrap_envelope(envelope, TASK_API, |code| {
            (code == ERR_INVALID_TASK_ID).then(|| Error::TaskNotFound { id: id.clone() })
        })?;
        Ok(())
    }

    async fn pause_task(&self, id: &TaskId) -> Result<()> {
        let envelope: Envelope<serde_json::Value> = self
            .call(
                TASK_CGI,
                &[
                    ("api", TASK_API),
                    ("version", "1"),
                    ("method", "pause"),
                    ("id", id.as_str()),
                ],
            )
            .await?;

        Self::unwrap_envelope(envelope, TASK_API, |code| {
            (code == ERR_INVALID_TASK_ID).then(|| Error::TaskNotFound { id: id.clone() })
        })?;
        Ok(())
    }

    async fn resume_task(&self, id: &TaskId) -> Result<()> {
        let envelope: Envelope<serde_json::Value> = self
            .call(
                TASK_CGI,
                &[
                    ("api", TASK_API),
                    ("version", "1"),
                    ("method", "resume"),
                    ("id", id.as_str()),
                ],
            )
            .await?;

        Self::unwrap_envelope(envelope, TASK_API, |code| {
            (code == ERR_INVALID_TASK_ID).then(|| Error::TaskNotFound { id: id.clone() })
        })?;
        Ok(())
    }

    async fn task_info(&self, id: &TaskId) -> Result<StationTask> {
        let envelope: Envelope<TaskListData> = self
            .call(
                TASK_CGI,
                &[
                    ("api", TASK_API),
                    ("version", "1"),
                    ("method", "getinfo"),
                    ("id", id.as_str()),
                    ("additional", "detail,transfer"),
                ],
            )
            .await?;

        let data = Self::unwrap_envelope(envelope, TASK_API, |code| {
            (code == ERR_INVALID_TASK_ID).then(|| Error::TaskNotFound { id: id.clone() })
        })?;

        data.and_then(|d| d.tasks.into_iter().next())
            .map(StationTask::from)
            .ok_or_else(|| Error::TaskNotFound { id: id.clone() })
    }

    async fn list_folder(&self, path: &str) -> Result<Vec<FolderEntry>> {
        let envelope: Envelope<FolderListData> = self
            .call(
                FILE_CGI,
                &[
                    ("api", FILE_API),
                    ("version", "1"),
                    ("method", "list"),
                    ("folder_path", path),
                ],
            )
            .await?;

        let data = Self::unwrap_envelope(envelope, FILE_API, |code| {
            (code == ERR_NO_SUCH_PATH).then(|| Error::FolderNotFound {
                path: path.to_string(),
            })
        })?;

        Ok(data
            .map(|d| {
                d.files
                    .into_iter()
                    .map(|f| FolderEntry {
                        name: f.name,
                        is_dir: f.isdir,
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn create_folder(&self, path: &str, create_parents: bool) -> Result<()> {
        let parents = if create_parents { "true" } else { "false" };

        // createfolder takes the parent and the new name separately.
        let (parent, name) = match path.trim_end_matches('/').rsplit_once('/') {
            Some((parent, name)) if !parent.is_empty() => (parent.to_string(), name.to_string()),
            _ => ("/".to_string(), path.trim_matches('/').to_string()),
        };

        let envelope: Envelope<serde_json::Value> = self
            .call(
                FILE_CGI,
                &[
                    ("api", FILE_API),
                    ("version", "1"),
                    ("method", "createfolder"),
                    ("folder_path", parent.as_str()),
                    ("name", name.as_str()),
                    ("force_parent", parents),
                ],
            )
            .await?;

        Self::unwrap_envelope(envelope, FILE_API, |_| None)?;
        Ok(())
    }
}
