//! Project File Integration Tests
//!
//! Save, open and import of project documents through the designer.

use std::sync::Arc;

use brb_designer::utils::error::AppError;
use brb_designer_core::{RecordField, Template};

use super::common::{fill_project, harness_with, RecordingClient, Harness};

fn harness() -> Harness {
    harness_with(Arc::new(RecordingClient::default()), None)
}

#[tokio::test]
async fn test_save_then_open_round_trip() {
    let h = harness();
    let d = &h.designer;
    fill_project(d, "Tower A", &[&["2", "3"], &["6"]]).await;
    let id = d.snapshot().await.records[0].id.clone();
    d.update_field(&id, RecordField::Width, " 170 ".into()).await;
    d.update_field(&id, RecordField::Template, "王工".into()).await;

    let saved = d.save_project().await.unwrap();
    assert_eq!(saved.file_name, "Tower A.json");
    assert!(saved.size > 0);

    let text = std::fs::read_to_string(&saved.path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(json["projectName"], "Tower A");
    assert_eq!(json["totalQuantity"], 11);
    assert_eq!(json["version"], "1.0");
    assert_eq!(json["parameterTables"][0]["width"], "170");

    d.new_project().await;
    let snapshot = d.open_project(std::path::Path::new(&saved.path)).await.unwrap();
    assert_eq!(snapshot.project_name, "Tower A");
    assert_eq!(snapshot.records.len(), 2);
    assert_eq!(snapshot.records[0].id, id);
    assert_eq!(snapshot.records[0].width, "170");
    assert_eq!(snapshot.records[0].template, Template::WangGong);
    assert_eq!(snapshot.total_quantity, 11);
}

#[tokio::test]
async fn test_second_save_does_not_overwrite() {
    let h = harness();
    let d = &h.designer;
    d.set_project_name("Tower".into()).await;

    let first = d.save_project().await.unwrap();
    let second = d.save_project().await.unwrap();
    assert_eq!(first.file_name, "Tower.json");
    assert_eq!(second.file_name, "Tower (1).json");
    assert!(h.downloads.path().join("Tower.json").exists());
}

#[tokio::test]
async fn test_save_requires_project_name() {
    let h = harness();
    let err = h.designer.save_project().await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(std::fs::read_dir(h.downloads.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_malformed_import_leaves_workspace_untouched() {
    let h = harness();
    let d = &h.designer;
    d.set_project_name("Keep".into()).await;

    for text in ["{ not json", "[1, 2, 3]", "\"text\""] {
        let err = d.import_project(text).await.unwrap_err();
        assert!(matches!(err, AppError::MalformedDocument(_)), "{}", text);
        assert_eq!(err.kind(), "malformed_document");
    }
    assert_eq!(d.snapshot().await.project_name, "Keep");
}

#[tokio::test]
async fn test_open_missing_file_is_io_error() {
    let h = harness();
    let missing = h.downloads.path().join("missing.json");
    let err = h.designer.open_project(&missing).await.unwrap_err();
    assert!(matches!(err, AppError::Io(_)));
}

#[tokio::test]
async fn test_legacy_import_recomputes_total() {
    let h = harness();
    let legacy = serde_json::json!({
        "project_name": "Legacy",
        "totalQuantity": 999,
        "param_tables": [{
            "table_number": 7,
            "design_force": 1500,
            "parameters": {"截面宽度(mm)": "170", "选择截面": "十一"},
            "length_quantity": [[3000, 2], {"length": "3200", "quantity": -1}]
        }]
    });

    let snapshot = h
        .designer
        .import_project(&legacy.to_string())
        .await
        .unwrap();
    assert_eq!(snapshot.project_name, "Legacy");
    assert_eq!(snapshot.records[0].id, "7");
    assert_eq!(snapshot.records[0].design_force, "1500");
    assert_eq!(snapshot.records[0].width, "170");
    assert_eq!(snapshot.records[0].template, Template::ShiYi);
    assert_eq!(snapshot.records[0].quantity_rows.len(), 2);
    assert_eq!(snapshot.total_quantity, 2);
}

#[tokio::test]
async fn test_import_without_records_yields_one_record() {
    let h = harness();
    let snapshot = h
        .designer
        .import_project(r#"{"projectName": "Bare"}"#)
        .await
        .unwrap();
    assert_eq!(snapshot.records.len(), 1);
    assert_eq!(snapshot.total_quantity, 0);
}
