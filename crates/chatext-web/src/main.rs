//! Chat-widget host bridge.
//!
//! Serves the built-in extensions over WebSocket so a browser page can act
//! as the chat widget.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p chatext-web
//! cargo run -p chatext-web -- --port 8080 --config chatext.toml
//! cargo run -p chatext-web -- --static-dir ./widget
//! ```
//!
//! Then connect to `/ws` and send a trace:
//! ```json
//! {"type": "trace", "trace": {"type": "ext_booking"}}
//! ```
//! and drive the booking with the returned instance id:
//! ```json
//! {"type": "action", "instance": 1, "action": {"type": "select_location", "value": "RENAULT MONTROUGE"}}
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use chatext::prelude::*;
use chatext_web::{LOG_FLUSH_INTERVAL, WebConfig, WsMessage, forward_logs, spawn_web};
use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Chat-widget host bridge.
#[derive(Parser)]
#[command(about = "Serve chat-widget extensions to a browser over WebSocket")]
struct Args {
    /// Port for the web server.
    #[arg(long, default_value_t = 3001)]
    port: u16,

    /// TOML file overriding catalogs, copy and timings.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory of static files to serve (e.g. the widget page).
    #[arg(long)]
    static_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let args = Args::parse();

    // 1. Logs go to stderr and, through the buffer, to connected clients.
    let (log_layer, log_buffer) = ExtensionLogLayer::new();
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(log_layer)
        .init();

    // 2. Extension configuration.
    let config = match &args.config {
        Some(path) => ExtensionConfig::load(path).map_err(|e| e.to_string())?,
        None => ExtensionConfig::default(),
    };
    let extensions = Arc::new(ExtensionSet::from_config(&config));
    tracing::info!(extensions = extensions.len(), "extensions registered");

    // 3. Log broadcast shared by every WebSocket client.
    let (log_tx, _) = tokio::sync::broadcast::channel::<WsMessage>(256);
    let _forwarder = forward_logs(log_buffer, log_tx.clone(), LOG_FLUSH_INTERVAL);

    // 4. Serve until interrupted.
    let web_config = WebConfig {
        bind_addr: ([127, 0, 0, 1], args.port).into(),
        static_dir: args.static_dir,
    };
    let addr = spawn_web(extensions, Arc::new(config.catalog()), log_tx, web_config)
        .await
        .map_err(|e| format!("failed to bind port {}: {e}", args.port))?;
    println!("Widget host: ws://{addr}/ws");

    tokio::signal::ctrl_c().await.map_err(|e| e.to_string())?;
    Ok(())
}
