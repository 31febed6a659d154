//! WebSocket host bridge for `chatext` extensions.
//!
//! `chatext-web` plays the chat-widget host for a browser: the page sends
//! traces and booking actions over `/ws`, the server runs them through an
//! [`ExtensionSet`] and streams back render instructions, interaction
//! callbacks and input restyling. Painting is left to the page.
//!
//! # Quick start
//!
//! ```ignore
//! use chatext::prelude::*;
//! use chatext_web::{WebConfig, WsMessage, spawn_web};
//! use std::sync::Arc;
//!
//! let config = ExtensionConfig::default();
//! let extensions = Arc::new(ExtensionSet::from_config(&config));
//! let (log_tx, _) = tokio::sync::broadcast::channel::<WsMessage>(256);
//!
//! let addr = spawn_web(extensions, Arc::new(config.catalog()), log_tx, WebConfig::default()).await?;
//! println!("Widget host: ws://{addr}/ws");
//! ```
//!
//! # Architecture
//!
//! ```text
//! browser ──trace/action──▶ /ws ──▶ Bridge ──dispatch──▶ ExtensionSet
//!    ▲                                 │
//!    └──render/interact/input/log ◀────┘
//! ```

mod api;
pub mod bridge;
pub mod logs;
pub mod protocol;
mod server;
mod ws;

pub use bridge::Bridge;
pub use logs::{LOG_FLUSH_INTERVAL, forward_logs};
pub use protocol::{ClientMessage, InstanceId, WsMessage};

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use chatext::booking::Catalog;
use chatext::ext::ExtensionSet;

/// Configuration for the web server.
pub struct WebConfig {
    /// Address to bind to. Default: `127.0.0.1:3001`.
    pub bind_addr: SocketAddr,
    /// Directory of static files (the widget page) served as a fallback.
    ///
    /// If `None`, only the API and WebSocket endpoints are served.
    pub static_dir: Option<PathBuf>,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3001)),
            static_dir: None,
        }
    }
}

/// Spawn the web server on a Tokio task and return the bound address.
///
/// The server runs until the Tokio runtime shuts down.
///
/// # Arguments
///
/// * `extensions`: Extensions dispatched for every client.
/// * `catalog`: Served at `/api/catalog`; normally the same catalog the
///   booking extension renders from.
/// * `log_tx`: Broadcast channel whose messages reach every client. Feed it
///   with [`forward_logs`].
/// * `config`: Server configuration.
pub async fn spawn_web(
    extensions: Arc<ExtensionSet>,
    catalog: Arc<Catalog>,
    log_tx: tokio::sync::broadcast::Sender<WsMessage>,
    config: WebConfig,
) -> std::io::Result<SocketAddr> {
    let app_state = api::AppState {
        extensions: extensions.clone(),
        catalog,
    };
    let ws_state = ws::WsState { extensions, log_tx };
    let router = server::build_router(app_state, ws_state, config.static_dir);
    server::start_server(router, config.bind_addr).await
}
