use std::path::{Path, PathBuf};
use std::time::Duration;

use bytes::Bytes;
use futures_util::StreamExt;
use monitor_logging::{monitor_debug, monitor_trace};
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use url::Url;

use crate::persist::{AtomicFileWriter, PersistError};
use crate::types::ErrorBody;
use crate::{ApiError, HealthBody, HistoryEntry, JobId, JobStatusBody, UploadAccepted};

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    /// `None` lets a hung request wait indefinitely.
    pub request_timeout: Option<Duration>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: None,
        }
    }
}

/// The translation service endpoints the monitor consumes.
#[async_trait::async_trait]
pub trait TranslationApi: Send + Sync {
    /// `POST /api/upload`; returns the id of the created job.
    async fn upload(
        &self,
        file: &Path,
        source_language: &str,
        target_language: &str,
    ) -> Result<JobId, ApiError>;

    async fn job_status(&self, job_id: JobId) -> Result<JobStatusBody, ApiError>;

    async fn history(&self) -> Result<Vec<HistoryEntry>, ApiError>;

    /// Saves the translated result as `{dest_dir}/{file_name}`.
    async fn download(
        &self,
        job_id: JobId,
        dest_dir: &Path,
        file_name: &str,
    ) -> Result<PathBuf, ApiError>;

    async fn health(&self) -> Result<HealthBody, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestApi {
    base: Url,
    client: reqwest::Client,
}

impl ReqwestApi {
    pub fn new(settings: &ClientSettings) -> Result<Self, ApiError> {
        let mut base = Url::parse(settings.base_url.trim())
            .map_err(|err| ApiError::InvalidBaseUrl(format!("{}: {err}", settings.base_url)))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(settings.base_url.clone()));
        }
        // Joining relative paths only keeps the prefix when it ends in a slash.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let mut builder = reqwest::Client::builder().connect_timeout(settings.connect_timeout);
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| ApiError::Network(err.to_string()))?;

        Ok(Self { base, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|err| ApiError::InvalidBaseUrl(err.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        monitor_trace!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_reqwest_error)?;
        if !status.is_success() {
            return Err(error_from_body(status, &body));
        }
        decode(&body)
    }
}

#[async_trait::async_trait]
impl TranslationApi for ReqwestApi {
    async fn upload(
        &self,
        file: &Path,
        source_language: &str,
        target_language: &str,
    ) -> Result<JobId, ApiError> {
        let data = tokio::fs::read(file)
            .await
            .map_err(|err| ApiError::Io(format!("{}: {err}", file.display())))?;
        let file_name = file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        monitor_debug!(
            "Uploading {} ({} bytes) {} -> {}",
            file_name,
            data.len(),
            source_language,
            target_language
        );

        let form = Form::new()
            .part("file", Part::bytes(data).file_name(file_name))
            .text("source_language", source_language.to_string())
            .text("target_language", target_language.to_string());

        let response = self
            .client
            .post(self.endpoint("api/upload")?)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_reqwest_error)?;
        if !status.is_success() {
            return Err(error_from_body(status, &body));
        }
        let accepted: UploadAccepted = decode(&body)?;
        Ok(accepted.job_id)
    }

    async fn job_status(&self, job_id: JobId) -> Result<JobStatusBody, ApiError> {
        self.get_json(&format!("api/jobs/{job_id}/status")).await
    }

    async fn history(&self) -> Result<Vec<HistoryEntry>, ApiError> {
        self.get_json("api/jobs/history").await
    }

    async fn download(
        &self,
        job_id: JobId,
        dest_dir: &Path,
        file_name: &str,
    ) -> Result<PathBuf, ApiError> {
        let response = self
            .client
            .get(self.endpoint(&format!("api/jobs/{job_id}/download"))?)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.map_err(map_reqwest_error)?;
            return Err(error_from_body(status, &body));
        }

        let writer = AtomicFileWriter::new(dest_dir.to_path_buf());
        let file_name = file_name.to_string();
        let mut partial = blocking(move || writer.begin(&file_name)).await?;

        let mut received = 0usize;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            received += chunk.len();
            partial = blocking(move || {
                let mut partial = partial;
                partial.append(&chunk).map(|()| partial)
            })
            .await?;
        }
        monitor_debug!("Downloaded job {} ({} bytes)", job_id, received);

        blocking(move || partial.commit()).await
    }

    async fn health(&self) -> Result<HealthBody, ApiError> {
        self.get_json("api/health").await
    }
}

/// Runs a file operation off the async workers.
async fn blocking<T, F>(op: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, PersistError> + Send + 'static,
{
    tokio::task::spawn_blocking(op)
        .await
        .map_err(|err| ApiError::Io(err.to_string()))?
        .map_err(|err| ApiError::Io(err.to_string()))
}

fn decode<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|err| ApiError::Decode(err.to_string()))
}

/// Non-success responses carrying `{error}` are rejections; anything else is a bare status.
fn error_from_body(status: StatusCode, body: &Bytes) -> ApiError {
    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(ErrorBody {
            error: Some(message),
        }) => ApiError::Rejected {
            status: status.as_u16(),
            message,
        },
        _ => ApiError::HttpStatus(status.as_u16()),
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::Timeout;
    }
    if err.is_decode() {
        return ApiError::Decode(err.to_string());
    }
    ApiError::Network(err.to_string())
}
