//! Generation Service Wire Types
//!
//! Request bodies sent to the drawing/materials service and the payloads it
//! returns.

use brb_designer_core::codec::normalize_record;
use brb_designer_core::ParameterRecord;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

// ============================================================================
// Requests
// ============================================================================

/// A record as the service expects it: normalized, with `template_type`
/// mirroring `template`.
#[derive(Debug, Clone, Serialize)]
pub struct OutboundRecord {
    #[serde(flatten)]
    pub record: ParameterRecord,
    pub template_type: String,
}

impl From<&ParameterRecord> for OutboundRecord {
    fn from(record: &ParameterRecord) -> Self {
        let record = normalize_record(record);
        let template_type = record.template.label().to_string();
        Self {
            record,
            template_type,
        }
    }
}

/// Body of `/api/brb/design` and `/api/brb/materials`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignRequest {
    pub project_name: String,
    pub parameter_tables: Vec<OutboundRecord>,
    pub total_quantity: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_folder: Option<String>,
}

impl DesignRequest {
    pub fn new(
        project_name: impl Into<String>,
        records: &[ParameterRecord],
        total_quantity: u64,
        project_folder: Option<String>,
    ) -> Self {
        Self {
            project_name: project_name.into(),
            parameter_tables: records.iter().map(OutboundRecord::from).collect(),
            total_quantity,
            project_folder,
        }
    }
}

/// Body of `/api/brb/drawing-download`: one record with its own total
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawingDownloadRequest {
    pub project_name: String,
    pub parameter_table: OutboundRecord,
    pub total_quantity: u64,
}

/// Body of `/api/brb/batch-download`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchDownloadRequest {
    pub project_name: String,
    pub parameter_tables: Vec<OutboundRecord>,
    pub total_quantity: u64,
    pub file_types: Vec<String>,
    pub table_indices: Vec<i64>,
}

/// Body of `/api/download/delete`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteFileRequest {
    pub file_path: String,
}

// ============================================================================
// Responses
// ============================================================================

/// A file streamed back by the service
#[derive(Debug, Clone, PartialEq)]
pub struct FilePayload {
    /// Name from `Content-Disposition`, when the service sent one
    pub file_name: Option<String>,
    pub bytes: Bytes,
}

impl FilePayload {
    pub fn name_or(&self, fallback: impl Into<String>) -> String {
        self.file_name.clone().unwrap_or_else(|| fallback.into())
    }
}

/// What drawing generation produced
#[derive(Debug, Clone, PartialEq)]
pub enum DrawingOutput {
    /// JSON listing of generated file names, one per record
    Files(Vec<String>),
    /// A single file streamed directly
    Single(FilePayload),
}

/// JSON body of a multi-file drawing response
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct DesignListResponse {
    #[serde(default)]
    pub result: Vec<String>,
}

/// JSON error body
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}
