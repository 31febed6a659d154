//! Contracts with the chat-widget host.
//!
//! The host hands each extension a [`Trace`] (the trigger event) plus a
//! [`RenderContext`] naming its collaborators: a [`Host`] that receives
//! [`Interaction`]s, for response extensions a [`Mount`] to render into, and
//! for effects a [`ChatInputAdapter`].

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::booking::machine::CompletionPayload;
use crate::error::ExtensionError;
use crate::input::ChatInputAdapter;
use crate::view::View;

/// A trigger event dispatched by the host.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl Trace {
    pub fn new(kind: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            kind: kind.into(),
            payload,
        }
    }

    /// `payload.name`, when the payload is an object carrying a string name.
    pub fn payload_name(&self) -> Option<&str> {
        self.payload.get("name").and_then(|v| v.as_str())
    }

    /// Whether this trace targets the given discriminator through either
    /// its `type` or its `payload.name`.
    pub fn is(&self, discriminator: &str) -> bool {
        self.kind == discriminator || self.payload_name() == Some(discriminator)
    }

    pub fn payload_str(&self, key: &str) -> Option<&str> {
        self.payload.get(key).and_then(|v| v.as_str())
    }
}

/// A message sent back to the host.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Interaction {
    /// The booking finished; carries the flat result record.
    Complete { payload: CompletionPayload },
    /// Let the conversation proceed.
    Continue,
}

/// The host's interaction callback.
pub trait Host: Send + Sync {
    fn interact(&self, interaction: Interaction);

    /// Ask the host to bring the latest content into view. Best effort.
    fn scroll_to_bottom(&self) {}
}

/// The container an extension renders into.
pub trait Mount: Send + Sync {
    /// Replace the container's content.
    fn render(&self, view: View);

    fn set_hidden(&self, hidden: bool);
}

/// Collaborators available to one extension activation.
#[derive(Clone, Default)]
pub struct RenderContext {
    pub trace: Trace,
    pub host: Option<Arc<dyn Host>>,
    pub mount: Option<Arc<dyn Mount>>,
    /// The host's chat input, for effects that restyle it.
    pub chat_input: Option<Arc<dyn ChatInputAdapter>>,
}

impl RenderContext {
    pub fn new(trace: Trace) -> Self {
        Self {
            trace,
            ..Default::default()
        }
    }

    pub fn with_host(mut self, host: Arc<dyn Host>) -> Self {
        self.host = Some(host);
        self
    }

    pub fn with_mount(mut self, mount: Arc<dyn Mount>) -> Self {
        self.mount = Some(mount);
        self
    }

    pub fn with_chat_input(mut self, chat_input: Arc<dyn ChatInputAdapter>) -> Self {
        self.chat_input = Some(chat_input);
        self
    }

    pub fn require_host(&self) -> Result<Arc<dyn Host>, ExtensionError> {
        self.host
            .clone()
            .ok_or_else(|| ExtensionError::HostIntegrationMissing("interaction callback".into()))
    }

    pub fn require_mount(&self) -> Result<Arc<dyn Mount>, ExtensionError> {
        self.mount
            .clone()
            .ok_or_else(|| ExtensionError::HostIntegrationMissing("mount point".into()))
    }
}

impl std::fmt::Debug for RenderContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderContext")
            .field("trace", &self.trace)
            .field("host", &self.host.is_some())
            .field("mount", &self.mount.is_some())
            .field("chat_input", &self.chat_input.is_some())
            .finish()
    }
}
