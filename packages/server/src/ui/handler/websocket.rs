//! WebSocket connection handlers.

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::ui::{session::ConnectionSession, state::AppState};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    // Create a channel for this connection to receive events
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    let mut session = match ConnectionSession::open(state, tx).await {
        Ok(session) => session,
        Err(e) => {
            tracing::error!("Failed to open connection: {}", e);
            return;
        }
    };

    let (mut sender, mut receiver) = socket.split();

    // Forward queued events to this client
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    });

    // The read loop is the only consumer of this session's events
    let reason = loop {
        tokio::select! {
            msg = receiver.next() => match msg {
                Some(Ok(Message::Text(text))) => session.handle_text(text.as_str()).await,
                Some(Ok(Message::Binary(_))) => {
                    tracing::debug!("Ignoring binary frame from '{}'", session.connection_id());
                }
                Some(Ok(Message::Close(_))) => break "client closed",
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::warn!("WebSocket error on '{}': {}", session.connection_id(), e);
                    break "transport error";
                }
                None => break "stream ended",
            },
            _ = &mut send_task => break "send failed",
        }
    };

    send_task.abort();
    session.close(reason).await;
}
