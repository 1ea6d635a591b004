//! HTTP API integration tests.
//!
//! Tests for REST API endpoints (health check, history, groups),
//! against the in-memory stores and the SQLite store.

mod fixtures;
use fixtures::TestServer;
use hiroba_server::{AppState, infrastructure::repository::SqliteDatabase};
use serde_json::json;

#[tokio::test]
async fn test_health_endpoint() {
    // テスト項目: /api/health エンドポイントが正常に動作する
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    // when (操作):
    let response = client
        .get(format!("{}/api/health", server.base_url()))
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_room_messages_endpoint() {
    // テスト項目: /rooms/{room}/messages がルームの履歴を古い順に返し、DM は含まない
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();
    let mut alice = server.connect().await;
    let mut bob = server.connect().await;
    alice.join("rust", "Alice").await;
    let bob_id = bob.join("rust", "Bob").await;
    for content in ["first", "second"] {
        alice
            .send(json!({"type": "chat", "data": {"room": "rust", "content": content}}))
            .await;
        alice.recv_type("chat").await;
    }
    alice
        .send(json!({"type": "private", "data": {"to": bob_id, "content": "secret"}}))
        .await;
    alice.recv_type("private").await;

    // when (操作):
    let response = client
        .get(format!("{}/rooms/rust/messages", server.base_url()))
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    let messages = body.as_array().expect("Response should be an array");
    let contents: Vec<&str> = messages
        .iter()
        .map(|m| m["content"].as_str().unwrap())
        .collect();
    assert_eq!(contents, vec!["first", "second"]);
    assert_eq!(messages[0]["author"], "Alice");
    assert_eq!(messages[0]["is_private"], false);
    assert!(messages[0]["created_at"].is_string());
}

#[tokio::test]
async fn test_direct_messages_endpoint() {
    // テスト項目: /dm/{peer}/messages が双方向の DM を古い順に返す
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();
    let mut alice = server.connect().await;
    let mut bob = server.connect().await;
    let alice_id = alice.join("", "Alice").await;
    let bob_id = bob.join("", "Bob").await;
    alice
        .send(json!({"type": "private", "data": {"to": bob_id, "content": "ping"}}))
        .await;
    bob.recv_type("private").await;
    bob.send(json!({"type": "private", "data": {"to": alice_id, "content": "pong"}}))
        .await;
    alice.recv_type("private").await;
    alice.recv_type("private").await;

    // when (操作):
    let response = client
        .get(format!(
            "{}/dm/{}/messages?me={}",
            server.base_url(),
            bob_id,
            alice_id
        ))
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    let messages = body.as_array().expect("Response should be an array");
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["content"], "ping");
    assert_eq!(messages[0]["author_id"], alice_id.as_str());
    assert_eq!(messages[1]["content"], "pong");
    assert_eq!(messages[1]["recipient_id"], alice_id.as_str());
    assert!(messages.iter().all(|m| m["is_private"] == true));
}

#[tokio::test]
async fn test_direct_messages_requires_me() {
    // テスト項目: me が空の場合は 400 を返す
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    // when (操作):
    let response = client
        .get(format!("{}/dm/someone/messages", server.base_url()))
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["error"], "missing peer or me");
}

#[tokio::test]
async fn test_create_group_broadcasts_and_lists() {
    // テスト項目: POST /groups がグループを作成し、接続中の全員に group:created が届く
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();
    let mut watcher = server.connect().await;
    watcher.join("", "Watcher").await;

    // when (操作):
    let response = client
        .post(format!("{}/groups", server.base_url()))
        .json(&json!({"name": "rustaceans"}))
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(response.status(), 200);
    let created: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(created["name"], "rustaceans");

    let event = watcher.recv_type("group:created").await;
    assert_eq!(event["data"], created);

    let groups: serde_json::Value = client
        .get(format!("{}/groups", server.base_url()))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse JSON");
    assert_eq!(groups[0]["name"], "general");
    assert_eq!(groups[1], created);
    assert_eq!(groups.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_groups_survive_restart_with_sqlite() {
    // テスト項目: SQLite ストアでは作成したグループが再起動後も一覧に残る
    // given (前提条件):
    let path = std::env::temp_dir().join(format!("hiroba-it-{}.db", uuid::Uuid::new_v4()));
    let client = reqwest::Client::new();
    {
        let db = SqliteDatabase::open(&path).expect("Failed to open database");
        let server = TestServer::start_with(AppState::sqlite(db)).await;
        let response = client
            .post(format!("{}/groups", server.base_url()))
            .json(&json!({"name": "rustaceans"}))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), 200);
    }

    // when (操作):
    let db = SqliteDatabase::open(&path).expect("Failed to reopen database");
    let server = TestServer::start_with(AppState::sqlite(db)).await;
    let groups: serde_json::Value = client
        .get(format!("{}/groups", server.base_url()))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse JSON");

    // then (期待する結果):
    let names: Vec<&str> = groups
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["general", "rustaceans"]);

    drop(server);
    for suffix in ["", "-wal", "-shm"] {
        let mut file = path.clone().into_os_string();
        file.push(suffix);
        let _ = std::fs::remove_file(file);
    }
}

#[tokio::test]
async fn test_create_group_rejects_invalid_input() {
    // テスト項目: 空のグループ名や不正な JSON には 400 を返す
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    // when (操作):
    let blank = client
        .post(format!("{}/groups", server.base_url()))
        .json(&json!({"name": "  "}))
        .send()
        .await
        .expect("Failed to send request");
    let broken = client
        .post(format!("{}/groups", server.base_url()))
        .header("content-type", "application/json")
        .body("{name:")
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(blank.status(), 400);
    assert_eq!(broken.status(), 400);
}
