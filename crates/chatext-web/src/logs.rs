//! Forwarding of captured tracing output to connected clients.

use std::time::Duration;

use chatext::log::LogBuffer;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::protocol::WsMessage;

/// How often the buffer is drained by [`forward_logs`].
pub const LOG_FLUSH_INTERVAL: Duration = Duration::from_millis(200);

/// Drain `buffer` every `interval` and broadcast each line as a
/// [`WsMessage::Log`]. Lines drained while no client is connected are
/// dropped.
pub fn forward_logs(
    buffer: LogBuffer,
    log_tx: broadcast::Sender<WsMessage>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            for line in buffer.drain() {
                let _ = log_tx.send(WsMessage::Log { line });
            }
        }
    })
}
