//! Test fixtures shared by the integration tests.

#![allow(dead_code)]

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use hiroba_server::{AppState, ServerConfig, build_cors, build_router};
use serde_json::Value;
use tokio::{net::TcpStream, task::JoinHandle};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

/// Chat server running in-process on an ephemeral port
pub struct TestServer {
    pub addr: std::net::SocketAddr,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start with the in-memory stores
    pub async fn start() -> Self {
        Self::start_with(AppState::in_memory()).await
    }

    pub async fn start_with(state: AppState) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local address");
        let cors = build_cors(&ServerConfig::default()).expect("Failed to build CORS layer");
        let app = build_router(state, cors);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Server failed");
        });

        Self { addr, handle }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    pub async fn connect(&self) -> TestClient {
        let (stream, _) = connect_async(self.ws_url())
            .await
            .expect("Failed to connect WebSocket");
        TestClient { stream }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// WebSocket client speaking the `{"type", "data"}` envelope
pub struct TestClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl TestClient {
    pub async fn send(&mut self, event: Value) {
        self.stream
            .send(Message::Text(event.to_string().into()))
            .await
            .expect("Failed to send frame");
    }

    pub async fn send_raw(&mut self, text: &str) {
        self.stream
            .send(Message::Text(text.to_string().into()))
            .await
            .expect("Failed to send frame");
    }

    /// Next JSON event, failing the test after a timeout
    pub async fn recv(&mut self) -> Value {
        loop {
            let frame = tokio::time::timeout(Duration::from_secs(5), self.stream.next())
                .await
                .expect("Timed out waiting for event")
                .expect("Stream closed")
                .expect("WebSocket error");
            if let Message::Text(text) = frame {
                return serde_json::from_str(text.as_str()).expect("Invalid JSON frame");
            }
        }
    }

    /// Receive until an event of the given type arrives
    pub async fn recv_type(&mut self, event_type: &str) -> Value {
        loop {
            let event = self.recv().await;
            if event["type"] == event_type {
                return event;
            }
        }
    }

    /// Next JSON event, or `None` if nothing arrives within `wait`
    pub async fn recv_within(&mut self, wait: Duration) -> Option<Value> {
        tokio::time::timeout(wait, self.recv()).await.ok()
    }

    /// Join and consume the initial events, returning the assigned user id
    pub async fn join(&mut self, room: &str, name: &str) -> String {
        self.send(serde_json::json!({"type": "join", "data": {"room": room, "name": name}}))
            .await;
        let joined = self.recv_type("joined").await;
        self.recv_type("joined:rooms").await;
        joined["data"]["userId"]
            .as_str()
            .expect("userId missing")
            .to_string()
    }

    pub async fn close(mut self) {
        let _ = self.stream.close(None).await;
    }
}
