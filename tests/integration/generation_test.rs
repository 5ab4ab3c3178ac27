//! Generation Integration Tests
//!
//! Drawing/materials generation, downloads and artifact deletion against a
//! mock generation service.

use std::sync::Arc;
use std::time::Duration;

use httpmock::prelude::*;
use serde_json::json;

use brb_designer::models::artifact::{ArtifactKind, ArtifactSource};
use brb_designer::utils::error::AppError;
use brb_designer_core::RecordField;

use super::common::{fill_project, harness_with, http_harness, Harness, RecordingClient};

const TIMEOUT: Duration = Duration::from_secs(5);

async fn filled(server: &MockServer, folder: Option<&str>) -> Harness {
    let h = http_harness(&server.base_url(), TIMEOUT, folder.map(str::to_string));
    fill_project(&h.designer, "Tower", &[&["2", "3"], &["6"]]).await;
    h
}

// ============================================================================
// Pre-flight validation
// ============================================================================

#[tokio::test]
async fn test_invalid_workspace_sends_nothing() {
    let client = Arc::new(RecordingClient::returning(&["a.dxf"]));
    let h = harness_with(client.clone(), None);
    let d = &h.designer;

    // no project name
    let err = d.generate_drawings().await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    // total is zero
    d.set_project_name("Tower".into()).await;
    let err = d.generate_materials().await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    // non-numeric field
    fill_project(d, "Tower", &[&["2"]]).await;
    let id = d.snapshot().await.records[0].id.clone();
    d.update_field(&id, RecordField::Weld, "abc".into()).await;
    let err = d.generate_drawings().await.unwrap_err();
    assert!(err.to_string().contains("weld"));

    assert!(client.design_requests.lock().unwrap().is_empty());
    assert!(d.snapshot().await.artifacts.is_empty());
    assert!(!d.snapshot().await.generating_drawings);
}

// ============================================================================
// Drawing generation
// ============================================================================

#[tokio::test]
async fn test_multi_file_response_gets_virtual_paths() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/brb/design")
                .json_body_partial(r#"{"projectName": "Tower", "totalQuantity": 11}"#);
            then.status(200)
                .header("content-type", "application/json")
                .body(json!({"result": ["Tower_1.dxf", "Tower_2.dxf"]}).to_string());
        })
        .await;

    let h = filled(&server, None).await;
    let recorded = h.designer.generate_drawings().await.unwrap();
    mock.assert_async().await;

    assert_eq!(recorded.len(), 2);
    assert_eq!(recorded[0].name, "Tower_1.dxf");
    assert_eq!(recorded[1].source, ArtifactSource::Record(1));
    assert!(recorded[0].path.starts_with("drawing_"));
    assert!(recorded[0].path.ends_with("_0.dxf"));
    assert!(recorded.iter().all(|a| a.is_virtual()));
    assert_eq!(h.designer.list_artifacts().await.len(), 2);
}

#[tokio::test]
async fn test_request_body_carries_normalized_records() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/brb/design")
                .json_body_partial(
                    r#"{"projectFolder": "D:/out", "parameterTables": [{"width": "170", "template": "王一", "template_type": "王一", "coreMaterial": "Q235B"}]}"#,
                );
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"result": []}"#);
        })
        .await;

    let h = http_harness(&server.base_url(), TIMEOUT, Some("D:/out".into()));
    fill_project(&h.designer, "Tower", &[&["1"]]).await;
    let id = h.designer.snapshot().await.records[0].id.clone();
    h.designer
        .update_field(&id, RecordField::Width, " 170 ".into())
        .await;

    h.designer.generate_drawings().await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_single_stream_uses_content_disposition() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/brb/design");
            then.status(200)
                .header("content-type", "application/octet-stream")
                .header("content-disposition", r#"attachment; filename="Tower Rev2.dxf""#)
                .body("DXF");
        })
        .await;

    let h = filled(&server, None).await;
    let recorded = h.designer.generate_drawings().await.unwrap();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].name, "Tower Rev2.dxf");
    assert_eq!(recorded[0].source, ArtifactSource::Record(0));
    assert!(recorded[0].path.starts_with("drawing_"));
    // drawing_<ts>.dxf, no per-record suffix
    assert_eq!(recorded[0].path.matches('_').count(), 1);
}

#[tokio::test]
async fn test_single_stream_default_name() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/brb/design");
            then.status(200).body("DXF");
        })
        .await;

    let h = filled(&server, None).await;
    let recorded = h.designer.generate_drawings().await.unwrap();
    assert_eq!(recorded[0].name, "Tower BRB.dxf");
}

// ============================================================================
// Materials generation
// ============================================================================

#[tokio::test]
async fn test_materials_default_name_and_source() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/brb/materials");
            then.status(200).body("XLSX");
        })
        .await;

    let h = filled(&server, None).await;
    let recorded = h.designer.generate_materials().await.unwrap();
    assert_eq!(recorded.name, "Tower_materials.xlsx");
    assert_eq!(recorded.kind, ArtifactKind::Materials);
    assert_eq!(recorded.source, ArtifactSource::AllRecords);
    assert!(recorded.path.starts_with("materials_"));
    assert!(recorded.path.ends_with(".xlsx"));
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_error_body_messages() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/brb/design");
            then.status(422)
                .header("content-type", "application/json")
                .body(r#"{"message": "Width below minimum"}"#);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/brb/materials");
            then.status(500)
                .header("content-type", "application/json")
                .body(r#"{"detail": "boom"}"#);
        })
        .await;

    let h = filled(&server, None).await;

    match h.designer.generate_drawings().await.unwrap_err() {
        AppError::Service { status, message } => {
            assert_eq!(status, 422);
            assert_eq!(message, "Width below minimum");
        }
        other => panic!("unexpected error: {:?}", other),
    }

    match h.designer.generate_materials().await.unwrap_err() {
        AppError::Service { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "Materials generation failed");
        }
        other => panic!("unexpected error: {:?}", other),
    }

    assert!(h.designer.list_artifacts().await.is_empty());
}

#[tokio::test]
async fn test_unparseable_error_body_gets_generic_message() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/brb/design");
            then.status(502).body("<html>Bad Gateway</html>");
        })
        .await;

    let h = filled(&server, None).await;
    let err = h.designer.generate_drawings().await.unwrap_err();
    assert_eq!(err.kind(), "service");
    assert!(err.to_string().contains("Server returned an error response"));
}

#[tokio::test]
async fn test_timeout_clears_in_flight_flag() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/brb/design");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"result": ["late.dxf"]}"#)
                .delay(Duration::from_secs(3));
        })
        .await;

    let h = http_harness(&server.base_url(), Duration::from_millis(200), None);
    fill_project(&h.designer, "Tower", &[&["1"]]).await;

    let err = h.designer.generate_drawings().await.unwrap_err();
    assert!(matches!(err, AppError::RequestTimeout(_)), "{:?}", err);
    assert!(!h.designer.snapshot().await.generating_drawings);
    assert!(h.designer.list_artifacts().await.is_empty());
}

#[tokio::test]
async fn test_unreachable_service() {
    let h = http_harness("http://127.0.0.1:1", TIMEOUT, None);
    fill_project(&h.designer, "Tower", &[&["1"]]).await;

    let err = h.designer.generate_drawings().await.unwrap_err();
    assert!(matches!(err, AppError::NetworkUnavailable(_)), "{:?}", err);
    assert!(!h.designer.service_health().await);
}

#[tokio::test]
async fn test_concurrent_generation_is_busy() {
    let server = MockServer::start_async().await;
    let drawings = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/brb/design");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"result": ["a.dxf"]}"#)
                .delay(Duration::from_millis(500));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/brb/materials");
            then.status(200).body("XLSX");
        })
        .await;

    let h = filled(&server, None).await;
    let d = &h.designer;

    let (first, second, during) = tokio::join!(d.generate_drawings(), d.generate_drawings(), async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        let snapshot = d.snapshot().await;
        // materials is a separate action class
        let materials = d.generate_materials().await;
        (snapshot, materials)
    });

    assert_eq!(first.unwrap().len(), 1);
    assert!(matches!(second.unwrap_err(), AppError::Busy(_)));
    let (snapshot, materials) = during;
    assert!(snapshot.generating_drawings);
    assert!(materials.is_ok());
    drawings.assert_hits_async(1).await;
    assert!(!d.snapshot().await.generating_drawings);
}

// ============================================================================
// Downloads
// ============================================================================

#[tokio::test]
async fn test_download_posts_single_record_with_its_total() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/brb/design");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"result": ["Tower_1.dxf", "Tower_2.dxf"]}"#);
        })
        .await;
    let download = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/brb/drawing-download")
                .json_body_partial(r#"{"projectName": "Tower", "totalQuantity": 6}"#);
            then.status(200).body("DXF-2");
        })
        .await;

    let h = filled(&server, None).await;
    let recorded = h.designer.generate_drawings().await.unwrap();

    let saved = h.designer.download_artifact(&recorded[1].id).await.unwrap();
    download.assert_async().await;
    assert_eq!(saved.file_name, "Tower_2.dxf");
    assert_eq!(std::fs::read(&saved.path).unwrap(), b"DXF-2");
}

#[tokio::test]
async fn test_download_of_removed_record_is_not_found() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/brb/design");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"result": ["a.dxf", "b.dxf"]}"#);
        })
        .await;

    let h = filled(&server, None).await;
    let recorded = h.designer.generate_drawings().await.unwrap();
    let last = h.designer.snapshot().await.records[1].id.clone();
    h.designer.remove_record(&last).await;

    let err = h.designer.download_artifact(&recorded[1].id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    let err = h.designer.download_artifact("no-such-id").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_materials_download_regenerates() {
    let server = MockServer::start_async().await;
    let materials = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/brb/materials");
            then.status(200).body("XLSX");
        })
        .await;

    let h = filled(&server, None).await;
    let recorded = h.designer.generate_materials().await.unwrap();
    let saved = h.designer.download_artifact(&recorded.id).await.unwrap();

    materials.assert_hits_async(2).await;
    assert_eq!(saved.file_name, "Tower_materials.xlsx");
    assert_eq!(saved.size, 4);
}

#[tokio::test]
async fn test_batch_download_saves_archive() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/brb/design");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"result": ["a.dxf", "b.dxf"]}"#);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/brb/materials");
            then.status(200).body("XLSX");
        })
        .await;
    let batch = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/brb/batch-download").json_body_partial(
                r#"{"fileTypes": ["drawing", "drawing", "materials"], "tableIndices": [0, 1, -1]}"#,
            );
            then.status(200)
                .header("content-disposition", r#"attachment; filename="ignored.zip""#)
                .body("PK");
        })
        .await;

    let h = filled(&server, None).await;
    let err = h.designer.download_all_artifacts().await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    h.designer.generate_drawings().await.unwrap();
    h.designer.generate_materials().await.unwrap();

    let saved = h.designer.download_all_artifacts().await.unwrap();
    batch.assert_async().await;
    assert_eq!(saved.file_name, "Tower.zip");
    assert!(h.downloads.path().join("Tower.zip").exists());
}

// ============================================================================
// Deletion
// ============================================================================

#[tokio::test]
async fn test_virtual_delete_is_local_only() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/brb/design");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"result": ["a.dxf"]}"#);
        })
        .await;
    let delete = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/download/delete");
            then.status(200).body("{}");
        })
        .await;

    let h = filled(&server, None).await;
    let recorded = h.designer.generate_drawings().await.unwrap();

    let removed = h.designer.delete_artifact(&recorded[0].id).await.unwrap();
    assert_eq!(removed.id, recorded[0].id);
    assert!(h.designer.list_artifacts().await.is_empty());
    delete.assert_hits_async(0).await;

    let err = h.designer.delete_artifact(&recorded[0].id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_real_path_delete_calls_service() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/brb/design");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"result": ["D:/out/Tower/Tower_1.dxf"]}"#);
        })
        .await;
    let delete = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/download/delete")
                .json_body(json!({"filePath": "D:/out/Tower/Tower_1.dxf"}));
            then.status(200).body("{}");
        })
        .await;

    let h = filled(&server, Some("D:/out")).await;
    let recorded = h.designer.generate_drawings().await.unwrap();
    assert_eq!(recorded[0].name, "Tower_1.dxf");
    assert_eq!(recorded[0].path, "D:/out/Tower/Tower_1.dxf");

    h.designer.delete_artifact(&recorded[0].id).await.unwrap();
    delete.assert_async().await;
}

#[tokio::test]
async fn test_remote_delete_failure_still_removes_locally() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/brb/design");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"result": ["/srv/out/a.dxf", "/srv/out/b.dxf"]}"#);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/download/delete");
            then.status(404)
                .header("content-type", "application/json")
                .body(r#"{"message": "File not found"}"#);
        })
        .await;

    let h = filled(&server, Some("/srv/out")).await;
    let recorded = h.designer.generate_drawings().await.unwrap();

    let err = h.designer.delete_artifact(&recorded[0].id).await.unwrap_err();
    assert!(matches!(err, AppError::RemoteCleanup(_)));
    assert!(err.to_string().contains("File not found"));

    let remaining = h.designer.list_artifacts().await;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, recorded[1].id);
}

#[tokio::test]
async fn test_health_probe() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/health");
            then.status(200).body("ok");
        })
        .await;

    let h = http_harness(&server.base_url(), TIMEOUT, None);
    assert!(h.designer.service_health().await);
}
