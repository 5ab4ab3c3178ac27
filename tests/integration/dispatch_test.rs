//! Dispatcher Integration Tests
//!
//! `AppState` on temp files, driven line by line through `dispatch_line`
//! against a mock generation service.

use httpmock::prelude::*;
use serde_json::{json, Value};
use tempfile::TempDir;

use brb_designer::{dispatch_line, AppState};

struct Session {
    state: AppState,
    dir: TempDir,
    next_id: u64,
}

impl Session {
    async fn start() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::new();
        state
            .initialize_at(dir.path().join("config.json"), dir.path().join("data.db"))
            .await
            .unwrap();
        Self {
            state,
            dir,
            next_id: 0,
        }
    }

    async fn call(&mut self, command: &str, args: Value) -> Value {
        self.next_id += 1;
        let line = json!({"id": self.next_id, "command": command, "args": args}).to_string();
        let response: Value = serde_json::from_str(&dispatch_line(&self.state, &line).await).unwrap();
        assert_eq!(response["id"], self.next_id);
        response
    }

    async fn ok(&mut self, command: &str, args: Value) -> Value {
        let response = self.call(command, args).await;
        assert_eq!(response["success"], true, "{}: {}", command, response);
        response["data"].clone()
    }
}

#[tokio::test]
async fn test_full_session_through_dispatcher() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/brb/design")
                .json_body_partial(r#"{"projectName": "Bridge", "totalQuantity": 5}"#);
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"result": ["Bridge_1.dxf"]}"#);
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
            when.method(POST).path("/api/brb/batch-download");
            then.status(200).body("PK");
        })
        .await;

    let mut s = Session::start().await;
    let downloads = s.dir.path().join("downloads");

    let settings = s
        .ok(
            "update_settings",
            json!({"service_base_url": server.base_url(), "download_dir": downloads}),
        )
        .await;
    assert_eq!(settings["service_base_url"], server.base_url());

    let workspace = s.ok("get_workspace", Value::Null).await;
    assert_eq!(workspace["records"].as_array().unwrap().len(), 1);
    let id = workspace["records"][0]["id"].as_str().unwrap().to_string();

    s.ok("set_project_name", json!({"name": "Bridge"})).await;
    for field in ["designForce", "width", "height", "thickness", "tubeWidth", "tubeThickness", "weld"] {
        s.ok("update_field", json!({"id": id, "field": field, "value": "120"}))
            .await;
    }
    let workspace = s
        .ok(
            "update_quantity_row",
            json!({"id": id, "index": 0, "column": "quantity", "value": "5"}),
        )
        .await;
    assert_eq!(workspace["totalQuantity"], 5);
    assert_eq!(workspace["unsavedContent"], true);
    assert_eq!(s.ok("compute_total", Value::Null).await, 5);

    let drawings = s.ok("generate_drawings", Value::Null).await;
    assert_eq!(drawings[0]["name"], "Bridge_1.dxf");
    assert_eq!(drawings[0]["tableIndex"], 0);
    let materials = s.ok("generate_materials", Value::Null).await;
    assert_eq!(materials["tableIndex"], -1);
    assert_eq!(materials["kind"], "materials");

    let listed = s.ok("list_artifacts", Value::Null).await;
    assert_eq!(listed.as_array().unwrap().len(), 2);

    let archive = s.ok("download_all_artifacts", Value::Null).await;
    batch.assert_async().await;
    assert_eq!(archive["fileName"], "Bridge.zip");
    assert!(downloads.join("Bridge.zip").exists());

    let saved = s.ok("save_project", Value::Null).await;
    assert_eq!(saved["fileName"], "Bridge.json");

    let deleted = s
        .ok("delete_artifact", json!({"id": drawings[0]["id"]}))
        .await;
    assert_eq!(deleted["name"], "Bridge_1.dxf");

    let fresh = s.ok("new_project", Value::Null).await;
    assert_eq!(fresh["projectName"], "");
    assert_eq!(fresh["artifacts"].as_array().unwrap().len(), 1);

    let reopened = s
        .ok("open_project", json!({"path": downloads.join("Bridge.json")}))
        .await;
    assert_eq!(reopened["projectName"], "Bridge");
    assert_eq!(reopened["totalQuantity"], 5);
}

#[tokio::test]
async fn test_workspace_survives_state_restart() {
    let mut s = Session::start().await;
    s.ok("set_project_name", json!({"name": "Durable"})).await;
    s.ok("add_record", Value::Null).await;

    let restarted = AppState::new();
    restarted
        .initialize_at(
            s.dir.path().join("config.json"),
            s.dir.path().join("data.db"),
        )
        .await
        .unwrap();
    let line = dispatch_line(&restarted, r#"{"command":"get_workspace"}"#).await;
    let response: Value = serde_json::from_str(&line).unwrap();
    assert_eq!(response["data"]["projectName"], "Durable");
    assert_eq!(response["data"]["records"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_drag_commands() {
    let mut s = Session::start().await;
    s.ok("add_record", Value::Null).await;
    let workspace = s.ok("add_record", Value::Null).await;
    let first = workspace["records"][0]["id"].clone();

    s.ok("drag_start", json!({"index": 0})).await;
    let over = s
        .ok(
            "drag_over",
            json!({"index": 1, "x": 290.0, "bounds": {"left": 200.0, "width": 100.0}}),
        )
        .await;
    assert_eq!(over["insertionMarker"], 2);
    assert_eq!(over["drag"]["state"], "dragging");

    let left = s.ok("drag_leave", Value::Null).await;
    assert_eq!(left["insertionMarker"], Value::Null);

    let dropped = s.ok("drop_at_end", Value::Null).await;
    assert_eq!(dropped["records"][2]["id"], first);
    assert_eq!(dropped["drag"]["state"], "idle");

    let moved = s.ok("reorder_records", json!({"from": 2, "to": 0})).await;
    assert_eq!(moved["records"][0]["id"], first);
}

#[tokio::test]
async fn test_error_responses_carry_kind() {
    let mut s = Session::start().await;

    let response = s.call("generate_drawings", Value::Null).await;
    assert_eq!(response["success"], false);
    assert_eq!(response["errorKind"], "validation");

    let response = s.call("import_project", json!({"content": "[]"})).await;
    assert_eq!(response["errorKind"], "malformed_document");

    let response = s.call("update_field", json!({"id": "x"})).await;
    assert_eq!(response["errorKind"], "validation");
    assert!(response["error"]
        .as_str()
        .unwrap()
        .contains("Invalid arguments for update_field"));

    let response = s
        .call("update_settings", json!({"request_timeout_secs": 0}))
        .await;
    assert_eq!(response["errorKind"], "config");

    let response = s.call("delete_artifact", json!({"id": "missing"})).await;
    assert_eq!(response["errorKind"], "not_found");

    let line = dispatch_line(&s.state, "not json").await;
    let response: Value = serde_json::from_str(&line).unwrap();
    assert_eq!(response["errorKind"], "validation");
}

#[tokio::test]
async fn test_health_reports_degraded_without_service() {
    let mut s = Session::start().await;
    s.ok(
        "update_settings",
        json!({"service_base_url": "http://127.0.0.1:1", "request_timeout_secs": 2}),
    )
    .await;

    let health = s.ok("get_health", Value::Null).await;
    assert_eq!(health["status"], "degraded");
    assert_eq!(health["database"], true);
    assert_eq!(health["generation_service"], false);

    let version = s.ok("get_version", Value::Null).await;
    assert_eq!(version, env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_boundary_arguments_do_not_break_the_session() {
    let mut s = Session::start().await;
    let workspace = s.ok("add_record", Value::Null).await;
    let id = workspace["records"][0]["id"].clone();
    let max = i64::MAX.to_string();

    for index in 0..3 {
        if index > 0 {
            s.ok("add_quantity_row", json!({"id": id})).await;
        }
        s.ok(
            "update_quantity_row",
            json!({"id": id, "index": index, "column": "quantity", "value": max}),
        )
        .await;
    }
    assert_eq!(s.ok("compute_total", Value::Null).await, json!(u64::MAX));

    s.ok("drag_start", json!({"index": 0})).await;
    let over = s
        .ok(
            "drag_over",
            json!({"index": usize::MAX, "x": 900.0, "bounds": {"left": 0.0, "width": 100.0}}),
        )
        .await;
    assert_eq!(over["insertionMarker"], 2);
    let dropped = s
        .ok(
            "drop_on_record",
            json!({"index": usize::MAX, "x": 900.0, "bounds": {"left": 0.0, "width": 100.0}}),
        )
        .await;
    assert_eq!(dropped["records"][1]["id"], id);

    // still answering
    let workspace = s.ok("get_workspace", Value::Null).await;
    assert_eq!(workspace["totalQuantity"], json!(u64::MAX));
}
