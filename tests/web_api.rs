//! Web API tests
//!
//! Integration tests for the file manager routes against the in-memory store.

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use bucketfm::web::{create_router, AppState};
use bucketfm::{DownloadOptions, MemoryStore};
use serde_json::Value;
use std::sync::Arc;

const MIB: usize = 1024 * 1024;

/// Create a test server over a fresh in-memory store.
fn create_test_server(store: Arc<MemoryStore>) -> TestServer {
    create_test_server_with(store, DownloadOptions::default())
}

fn create_test_server_with(store: Arc<MemoryStore>, download: DownloadOptions) -> TestServer {
    let state = AppState::new(store).with_download_options(download);
    let router = create_router(Arc::new(state), 100 * MIB);
    TestServer::new(router).expect("Failed to create test server")
}

fn seeded_store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::with_objects([
        ("a/b.txt", "b"),
        ("a/c/d.txt", "d"),
        ("e.txt", "e"),
    ]))
}

fn names(body: &Value) -> Vec<(String, String)> {
    body["files"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| {
            (
                e["type"].as_str().unwrap().to_string(),
                e["name"].as_str().unwrap().to_string(),
            )
        })
        .collect()
}

#[tokio::test]
async fn health_check() {
    let server = create_test_server(Arc::new(MemoryStore::new()));
    let response = server.get("/health").await;
    response.assert_status_ok();
    assert_eq!(response.text(), "OK");
}

#[tokio::test]
async fn list_root_shows_top_level_entries() {
    let server = create_test_server(seeded_store());

    let response = server.get("/list").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["prefix"], "");
    assert_eq!(
        names(&body),
        vec![
            ("folder".to_string(), "a/".to_string()),
            ("file".to_string(), "e.txt".to_string()),
        ]
    );
    assert_eq!(body["files"][1]["key"], "e.txt");
    assert_eq!(body["files"][1]["mime_type"], "text/plain");
    // The in-memory store cannot presign, so no preview link.
    assert!(body["files"][1].get("preview_url").is_none());
}

#[tokio::test]
async fn list_nested_prefix() {
    let server = create_test_server(seeded_store());

    let response = server.get("/list").add_query_param("prefix", "a").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["prefix"], "a/");
    assert_eq!(
        names(&body),
        vec![
            ("folder".to_string(), "c/".to_string()),
            ("file".to_string(), "b.txt".to_string()),
        ]
    );
    assert_eq!(body["files"][0]["key"], "a/c/");
    assert_eq!(body["files"][1]["key"], "a/b.txt");
}

#[tokio::test]
async fn upload_then_download_round_trips() {
    let store = Arc::new(MemoryStore::new());
    let server = create_test_server(store.clone());
    let content: Vec<u8> = (0..(9 * MIB)).map(|i| (i % 241) as u8).collect();

    let form = MultipartForm::new()
        .add_text("folder", "docs")
        .add_part("file", Part::bytes(content.clone()).file_name("big report.bin"));
    let response = server.post("/upload").multipart(form).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"], "File uploaded successfully");
    assert_eq!(body["key"], "docs/big_report.bin");

    let response = server.get("/download/docs/big_report.bin").await;
    response.assert_status_ok();
    assert_eq!(
        response.header("content-length").to_str().unwrap(),
        (9 * MIB).to_string()
    );
    assert_eq!(
        response.header("content-disposition").to_str().unwrap(),
        "attachment; filename=\"big_report.bin\""
    );
    assert_eq!(response.as_bytes().as_ref(), content.as_slice());

    // 9 MiB in 4 MiB chunks.
    assert_eq!(store.range_reads().len(), 3);
}

#[tokio::test]
async fn upload_strips_path_traversal() {
    let store = Arc::new(MemoryStore::new());
    let server = create_test_server(store.clone());

    let form = MultipartForm::new()
        .add_part("file", Part::bytes(b"x".to_vec()).file_name("../../etc/passwd"));
    let response = server.post("/upload").multipart(form).await;
    response.assert_status_ok();
    assert_eq!(store.keys(), vec!["passwd"]);
}

#[tokio::test]
async fn upload_without_file_is_bad_request() {
    let server = create_test_server(Arc::new(MemoryStore::new()));

    let form = MultipartForm::new().add_text("folder", "docs");
    let response = server.post("/upload").multipart(form).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "No file part");
}

#[tokio::test]
async fn upload_with_empty_filename_is_bad_request() {
    let server = create_test_server(Arc::new(MemoryStore::new()));

    let form = MultipartForm::new().add_part("file", Part::bytes(b"x".to_vec()).file_name(""));
    let response = server.post("/upload").multipart(form).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "No selected file");
}

#[tokio::test]
async fn download_missing_key_is_404_json() {
    let store = Arc::new(MemoryStore::new());
    let server = create_test_server(store.clone());

    let response = server.get("/download/missing.txt").await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["error"], "File not found: missing.txt");
    assert!(store.range_reads().is_empty());
}

#[tokio::test]
async fn download_empty_object() {
    let store = Arc::new(MemoryStore::with_objects([("empty.txt", "")]));
    let server = create_test_server(store.clone());

    let response = server.get("/download/empty.txt").await;
    response.assert_status_ok();
    assert_eq!(response.header("content-length").to_str().unwrap(), "0");
    assert!(response.as_bytes().is_empty());
    assert!(store.range_reads().is_empty());
}

#[tokio::test]
async fn download_uses_configured_chunk_size() {
    let store = Arc::new(MemoryStore::with_objects([("a/notes.md", "0123456789")]));
    let download = DownloadOptions {
        chunk_size: 4,
        ..DownloadOptions::default()
    };
    let server = create_test_server_with(store.clone(), download);

    let response = server.get("/download/a/notes.md").await;
    response.assert_status_ok();
    assert_eq!(response.text(), "0123456789");
    let ranges: Vec<(u64, u64)> = store
        .range_reads()
        .into_iter()
        .map(|(_, s, e)| (s, e))
        .collect();
    assert_eq!(ranges, vec![(0, 4), (4, 8), (8, 10)]);
}

#[tokio::test]
async fn delete_file_is_idempotent() {
    let store = seeded_store();
    let server = create_test_server(store.clone());

    server.delete("/delete/e.txt").await.assert_status_ok();
    server.delete("/delete/e.txt").await.assert_status_ok();
    server.delete("/delete/never-existed.txt").await.assert_status_ok();
    assert_eq!(store.keys(), vec!["a/b.txt", "a/c/d.txt"]);
}

#[tokio::test]
async fn create_folder_normalizes_name() {
    let store = Arc::new(MemoryStore::new());
    let server = create_test_server(store.clone());

    let response = server
        .post("/create_folder")
        .json(&serde_json::json!({ "folder_name": "photos" }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["key"], "photos/");

    server
        .post("/create_folder")
        .json(&serde_json::json!({ "folder_name": "photos/" }))
        .await
        .assert_status_ok();
    assert_eq!(store.keys(), vec!["photos/"]);

    let body: Value = server.get("/list").await.json();
    assert_eq!(names(&body), vec![("folder".to_string(), "photos/".to_string())]);
}

#[tokio::test]
async fn create_folder_requires_a_name() {
    let server = create_test_server(Arc::new(MemoryStore::new()));

    for payload in [
        serde_json::json!({}),
        serde_json::json!({ "folder_name": "" }),
        serde_json::json!({ "folder_name": "   " }),
    ] {
        let response = server.post("/create_folder").json(&payload).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["error"], "Folder name is required");
    }
}

#[tokio::test]
async fn delete_folder_cascades() {
    let store = seeded_store();
    store.insert("a/", "");
    let server = create_test_server(store.clone());

    let response = server.delete("/delete_folder/a").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["deleted"], 3);
    assert_eq!(store.keys(), vec!["e.txt"]);

    let body: Value = server.get("/list").add_query_param("prefix", "a/").await.json();
    assert!(body["files"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn partial_folder_delete_is_500_with_failed_keys() {
    let store = seeded_store();
    store.fail_delete("a/c/d.txt");
    let server = create_test_server(store.clone());

    let response = server.delete("/delete_folder/a/").await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("partially deleted"));
    assert_eq!(body["failed"], serde_json::json!(["a/c/d.txt"]));
    assert_eq!(store.keys(), vec!["a/c/d.txt", "e.txt"]);
}

#[tokio::test]
async fn presign_on_memory_store_is_500() {
    let server = create_test_server(seeded_store());

    let response = server.get("/presign/e.txt").await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("not supported"));
}

#[tokio::test]
async fn doubled_slashes_in_folder_names_stay_listable() {
    let store = Arc::new(MemoryStore::new());
    let server = create_test_server(store.clone());

    let response = server
        .post("/create_folder")
        .json(&serde_json::json!({ "folder_name": "a//b" }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["key"], "a/b/");

    let form = MultipartForm::new()
        .add_text("folder", "a//b")
        .add_part("file", Part::bytes(b"x".to_vec()).file_name("f.txt"));
    let response = server.post("/upload").multipart(form).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["key"], "a/b/f.txt");

    let body: Value = server.get("/list").add_query_param("prefix", "a").await.json();
    assert_eq!(names(&body), vec![("folder".to_string(), "b/".to_string())]);

    let body: Value = server.get("/list").add_query_param("prefix", "a/b").await.json();
    assert_eq!(names(&body), vec![("file".to_string(), "f.txt".to_string())]);
}
