//! Generation Service Module
//!
//! Client side of the external drawing/materials service.
//!
//! - `types`: request bodies (`DesignRequest`, `DrawingDownloadRequest`,
//!   `BatchDownloadRequest`) and returned payloads (`FilePayload`, `DrawingOutput`)
//! - `client`: the `GenerationClient` trait and its reqwest implementation

pub mod client;
pub mod types;

pub use client::{
    error_message, parse_content_disposition, GenerationClient, HttpGenerationClient, ServiceAction,
    GENERIC_ERROR_MESSAGE,
};
pub use types::{
    BatchDownloadRequest, DeleteFileRequest, DesignRequest, DrawingDownloadRequest, DrawingOutput,
    FilePayload, OutboundRecord,
};
