//! WebSocket upgrade handler.
//!
//! Each connected client gets its own [`Bridge`] and receives:
//! 1. A `ready` message listing the extensions on connect.
//! 2. Render and interaction messages for the instances it triggered.
//! 3. Broadcast `log` lines shared by all clients.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use chatext::ext::ExtensionSet;
use futures::{SinkExt, StreamExt, stream::SplitSink};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, warn};

use crate::bridge::Bridge;
use crate::protocol::WsMessage;

/// Shared state for WebSocket handlers.
#[derive(Clone)]
pub struct WsState {
    pub extensions: Arc<ExtensionSet>,
    pub log_tx: broadcast::Sender<WsMessage>,
}

/// GET /ws: WebSocket upgrade handler.
pub async fn ws_upgrade(
    ws: WebSocketUpgrade,
    State(ws_state): State<WsState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, ws_state))
}

async fn handle_socket(socket: WebSocket, ws_state: WsState) {
    let (mut sink, mut stream) = socket.split();
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<WsMessage>();
    let mut log_rx = ws_state.log_tx.subscribe();

    let mut bridge = Bridge::new(ws_state.extensions, out_tx);
    bridge.ready();
    debug!("WebSocket client connected");

    // Single writer: connection messages and broadcast logs share the sink.
    let forward_task = tokio::spawn(async move {
        let mut logs_open = true;
        loop {
            let msg = tokio::select! {
                msg = out_rx.recv() => match msg {
                    Some(msg) => msg,
                    None => break,
                },
                log = log_rx.recv(), if logs_open => match log {
                    Ok(msg) => msg,
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!("WebSocket client lagged by {n} log lines");
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        logs_open = false;
                        continue;
                    }
                },
            };
            if ws_send(&mut sink, &msg).await.is_err() {
                break; // Client disconnected.
            }
        }
    });

    while let Some(Ok(msg)) = stream.next().await {
        match msg {
            Message::Text(text) => bridge.handle_text(&text).await,
            Message::Close(_) => break,
            _ => {} // Ignore binary, ping, pong.
        }
    }

    debug!(
        sessions = bridge.session_count(),
        "WebSocket client disconnected"
    );
    forward_task.abort();
}

/// Serialize a `WsMessage` and send it over the WebSocket sink.
async fn ws_send(sink: &mut SplitSink<WebSocket, Message>, msg: &WsMessage) -> Result<(), ()> {
    let json = serde_json::to_string(msg).unwrap_or_default();
    sink.send(Message::Text(json.into())).await.map_err(|_| ())
}
