//! Per-connection host: turns client messages into extension activations
//! and extension callbacks into outbound [`WsMessage`]s.
//!
//! ```text
//! client ──ClientMessage──▶ Bridge ──dispatch──▶ ExtensionSet
//!    ▲                        │
//!    └──── WsMessage ◀── ChannelHost / ChannelMount / ChannelInput
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use chatext::booking::{ActionOutcome, BookingSession};
use chatext::error::ExtensionError;
use chatext::ext::{Activation, ExtensionKind, ExtensionSet};
use chatext::host::{Host, Interaction, Mount, RenderContext, Trace};
use chatext::input::{ChatInputAdapter, InputState};
use chatext::view::View;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::protocol::{ClientMessage, InstanceId, WsMessage};

pub type Outbox = mpsc::UnboundedSender<WsMessage>;

// ── Channel-backed collaborators ──────────────────────────────────────

struct ChannelHost {
    instance: InstanceId,
    out: Outbox,
}

impl Host for ChannelHost {
    fn interact(&self, interaction: Interaction) {
        let _ = self.out.send(WsMessage::Interact {
            instance: self.instance,
            interaction,
        });
    }

    fn scroll_to_bottom(&self) {
        let _ = self.out.send(WsMessage::Scroll {
            instance: self.instance,
        });
    }
}

struct ChannelMount {
    instance: InstanceId,
    out: Outbox,
}

impl Mount for ChannelMount {
    fn render(&self, view: View) {
        let _ = self.out.send(WsMessage::Render {
            instance: self.instance,
            view,
        });
    }

    fn set_hidden(&self, hidden: bool) {
        let _ = self.out.send(WsMessage::Hidden {
            instance: self.instance,
            hidden,
        });
    }
}

struct ChannelInput {
    out: Outbox,
}

impl ChatInputAdapter for ChannelInput {
    fn apply(&self, state: &InputState) -> Result<(), ExtensionError> {
        self.out
            .send(WsMessage::Input {
                state: state.clone(),
            })
            .map_err(|_| ExtensionError::HostIntegrationMissing("chat input (client gone)".into()))
    }
}

// ── Bridge ────────────────────────────────────────────────────────────

/// State of one client connection.
pub struct Bridge {
    extensions: Arc<ExtensionSet>,
    out: Outbox,
    next_instance: InstanceId,
    sessions: HashMap<InstanceId, BookingSession>,
}

impl Bridge {
    pub fn new(extensions: Arc<ExtensionSet>, out: Outbox) -> Self {
        Self {
            extensions,
            out,
            next_instance: 1,
            sessions: HashMap::new(),
        }
    }

    /// Greet the client with the registered extensions.
    pub fn ready(&self) {
        let _ = self.out.send(WsMessage::Ready {
            extensions: self.extensions.descriptors(),
        });
    }

    /// Parse and serve one text frame.
    pub async fn handle_text(&mut self, text: &str) {
        match serde_json::from_str::<ClientMessage>(text) {
            Ok(msg) => self.handle(msg).await,
            Err(e) => {
                debug!(error = %e, "ignoring malformed WebSocket message");
                self.error(format!("malformed message: {e}"));
            }
        }
    }

    pub async fn handle(&mut self, msg: ClientMessage) {
        match msg {
            ClientMessage::Trace { trace } => self.trace(trace).await,
            ClientMessage::Action { instance, action } => {
                let Some(session) = self.sessions.get_mut(&instance) else {
                    self.error(format!("no booking session for instance {instance}"));
                    return;
                };
                if let ActionOutcome::Ignored(reason) = session.handle(action) {
                    debug!(instance, %reason, "booking action ignored");
                }
            }
            ClientMessage::Close { instance } => {
                if self.sessions.remove(&instance).is_some() {
                    debug!(instance, "booking session closed");
                }
            }
        }
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    async fn trace(&mut self, trace: Trace) {
        let Some(kind) = self.extensions.find(&trace).map(|e| e.kind()) else {
            self.error(format!("no extension matches trace `{}`", trace.kind));
            return;
        };
        let instance = self.next_instance;
        self.next_instance += 1;

        let mut ctx = RenderContext::new(trace)
            .with_host(Arc::new(ChannelHost {
                instance,
                out: self.out.clone(),
            }))
            .with_chat_input(Arc::new(ChannelInput {
                out: self.out.clone(),
            }));
        if kind == ExtensionKind::Response {
            ctx = ctx.with_mount(Arc::new(ChannelMount {
                instance,
                out: self.out.clone(),
            }));
        }

        match self.extensions.dispatch(ctx).await {
            Ok(Some(Activation::Booking(session))) => {
                self.sessions.insert(instance, session);
            }
            // The timer task owns the animation from here on.
            Ok(Some(Activation::Waiting(_))) => {}
            Ok(Some(Activation::Done { dismissed })) => {
                debug!(instance, dismissed, "done signal handled");
            }
            Ok(Some(Activation::Input(_))) | Ok(None) => {}
            Err(e) => {
                warn!(instance, error = %e, "activation failed");
                self.error(e.to_string());
            }
        }
    }

    fn error(&self, message: String) {
        let _ = self.out.send(WsMessage::Error { message });
    }
}
