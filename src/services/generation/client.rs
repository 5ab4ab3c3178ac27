//! Generation Client
//!
//! HTTP client for the external drawing/materials service. Every call is
//! bounded by one wait ceiling; transport, timeout and status failures are
//! mapped onto `AppError` so callers never see `reqwest` types.

use std::future::Future;
use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::types::{
    BatchDownloadRequest, DeleteFileRequest, DesignListResponse, DesignRequest, DrawingDownloadRequest,
    DrawingOutput, ErrorBody, FilePayload,
};
use crate::models::settings::AppConfig;
use crate::utils::error::{AppError, AppResult};

/// Message used when an error body cannot be parsed at all.
pub const GENERIC_ERROR_MESSAGE: &str = "Server returned an error response";

/// Operations offered by the generation service
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Generate drawings for every record.
    async fn generate_drawings(&self, request: &DesignRequest) -> AppResult<DrawingOutput>;

    /// Generate the materials list for every record.
    async fn generate_materials(&self, request: &DesignRequest) -> AppResult<FilePayload>;

    /// Re-generate and fetch the drawing of one record.
    async fn download_drawing(&self, request: &DrawingDownloadRequest) -> AppResult<FilePayload>;

    /// Fetch every listed artifact as one zip archive.
    async fn batch_download(&self, request: &BatchDownloadRequest) -> AppResult<FilePayload>;

    /// Delete a file the service keeps on disk.
    async fn delete_file(&self, file_path: &str) -> AppResult<()>;

    /// Whether the service answers its health probe.
    async fn health(&self) -> bool;
}

/// Endpoint plus the fallback message shown when its error body has none
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceAction {
    GenerateDrawings,
    GenerateMaterials,
    DownloadDrawing,
    BatchDownload,
    DeleteFile,
    Health,
}

impl ServiceAction {
    pub fn path(&self) -> &'static str {
        match self {
            Self::GenerateDrawings => "/api/brb/design",
            Self::GenerateMaterials => "/api/brb/materials",
            Self::DownloadDrawing => "/api/brb/drawing-download",
            Self::BatchDownload => "/api/brb/batch-download",
            Self::DeleteFile => "/api/download/delete",
            Self::Health => "/api/health",
        }
    }

    pub fn failure_message(&self) -> &'static str {
        match self {
            Self::GenerateDrawings => "Drawing generation failed",
            Self::GenerateMaterials => "Materials generation failed",
            Self::DownloadDrawing => "Drawing download failed",
            Self::BatchDownload => "Batch download failed",
            Self::DeleteFile => "File deletion failed",
            Self::Health => "Health check failed",
        }
    }
}

/// Pick the user-facing message for a non-success response body.
pub fn error_message(action: ServiceAction, body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            message: Some(message),
        }) if !message.trim().is_empty() => message,
        Ok(_) => action.failure_message().to_string(),
        Err(_) => GENERIC_ERROR_MESSAGE.to_string(),
    }
}

/// Extract `filename="..."` from a Content-Disposition header value.
pub fn parse_content_disposition(value: &str) -> Option<String> {
    static FILENAME: OnceLock<Option<Regex>> = OnceLock::new();
    let re = FILENAME
        .get_or_init(|| Regex::new(r#"filename="([^"]+)""#).ok())
        .as_ref()?;
    re.captures(value)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// reqwest-backed `GenerationClient`
pub struct HttpGenerationClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpGenerationClient {
    /// Create a client for `base_url` with the given wait ceiling.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        Self::new(config.service_base_url.clone(), config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn url(&self, action: ServiceAction) -> String {
        format!("{}{}", self.base_url, action.path())
    }

    fn map_transport(&self, err: reqwest::Error) -> AppError {
        if err.is_timeout() {
            AppError::RequestTimeout(self.timeout)
        } else if err.is_connect() {
            AppError::network(format!("Connection failed: {}", err))
        } else {
            AppError::network(err.to_string())
        }
    }

    /// Run `fut` under the wait ceiling, covering both the request and the
    /// body read.
    async fn with_ceiling<T, F>(&self, action: ServiceAction, fut: F) -> AppResult<T>
    where
        F: Future<Output = AppResult<T>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    "[Generation] {} timed out after {:?}",
                    action.path(),
                    self.timeout
                );
                Err(AppError::RequestTimeout(self.timeout))
            }
        }
    }

    async fn post_json<B>(&self, action: ServiceAction, body: &B) -> AppResult<reqwest::Response>
    where
        B: Serialize + ?Sized + Sync,
    {
        let url = self.url(action);
        debug!("[Generation] POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let code = status.as_u16();
        let text = response.text().await.unwrap_or_default();
        let message = error_message(action, &text);
        warn!("[Generation] {} returned HTTP {}: {}", action.path(), code, message);
        Err(AppError::service(code, message))
    }

    async fn read_file(&self, response: reqwest::Response) -> AppResult<FilePayload> {
        let file_name = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_disposition);

        let bytes = response.bytes().await.map_err(|e| self.map_transport(e))?;
        Ok(FilePayload { file_name, bytes })
    }

    async fn fetch_file<B>(&self, action: ServiceAction, body: &B) -> AppResult<FilePayload>
    where
        B: Serialize + ?Sized + Sync,
    {
        self.with_ceiling(action, async {
            let response = self.post_json(action, body).await?;
            self.read_file(response).await
        })
        .await
    }
}

#[async_trait]
impl GenerationClient for HttpGenerationClient {
    async fn generate_drawings(&self, request: &DesignRequest) -> AppResult<DrawingOutput> {
        let action = ServiceAction::GenerateDrawings;
        info!(
            "[Generation] Generating drawings for '{}' ({} records, total {})",
            request.project_name,
            request.parameter_tables.len(),
            request.total_quantity
        );

        self.with_ceiling(action, async {
            let response = self.post_json(action, request).await?;
            let is_json = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(|v| v.contains("application/json"))
                .unwrap_or(false);

            if is_json {
                let status = response.status().as_u16();
                let listing: DesignListResponse = response.json().await.map_err(|e| {
                    if e.is_decode() {
                        AppError::service(status, format!("Invalid response from service: {}", e))
                    } else {
                        self.map_transport(e)
                    }
                })?;
                Ok(DrawingOutput::Files(listing.result))
            } else {
                Ok(DrawingOutput::Single(self.read_file(response).await?))
            }
        })
        .await
    }

    async fn generate_materials(&self, request: &DesignRequest) -> AppResult<FilePayload> {
        info!(
            "[Generation] Generating materials for '{}' ({} records)",
            request.project_name,
            request.parameter_tables.len()
        );
        self.fetch_file(ServiceAction::GenerateMaterials, request).await
    }

    async fn download_drawing(&self, request: &DrawingDownloadRequest) -> AppResult<FilePayload> {
        self.fetch_file(ServiceAction::DownloadDrawing, request).await
    }

    async fn batch_download(&self, request: &BatchDownloadRequest) -> AppResult<FilePayload> {
        info!(
            "[Generation] Batch download of {} files for '{}'",
            request.file_types.len(),
            request.project_name
        );
        self.fetch_file(ServiceAction::BatchDownload, request).await
    }

    async fn delete_file(&self, file_path: &str) -> AppResult<()> {
        let action = ServiceAction::DeleteFile;
        let body = DeleteFileRequest {
            file_path: file_path.to_string(),
        };
        self.with_ceiling(action, async {
            self.post_json(action, &body).await?;
            Ok(())
        })
        .await
    }

    async fn health(&self) -> bool {
        let action = ServiceAction::Health;
        let result = self
            .with_ceiling(action, async {
                self.client
                    .get(self.url(action))
                    .send()
                    .await
                    .map_err(|e| self.map_transport(e))
            })
            .await;

        match result {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!("[Generation] Health probe failed: {}", e);
                false
            }
        }
    }
}
