//! Disable-input effect.
//!
//! The host's chat input is not owned by this crate. [`InputState`] is the
//! declarative description of how it should look; applying it to the real
//! widget is the job of a [`ChatInputAdapter`] implemented at the host
//! boundary.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error};

use crate::error::ExtensionError;
use crate::ext::{Activation, Extension, ExtensionFuture, ExtensionKind};
use crate::host::{Interaction, RenderContext};

pub const DISABLE_INPUT_DISCRIMINATOR: &str = "ext_disableInput";

/// Placeholder shown while the input accepts text.
pub const ENABLED_PLACEHOLDER: &str = "Message...";

/// Desired appearance of the host's chat input.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct InputState {
    pub disabled: bool,
    pub placeholder: String,
    pub hide_border: bool,
    pub hide_send_button: bool,
    /// Reads of the input value return an empty string.
    pub mask_value: bool,
}

impl InputState {
    pub fn disabled() -> Self {
        Self {
            disabled: true,
            placeholder: String::new(),
            hide_border: true,
            hide_send_button: true,
            mask_value: true,
        }
    }

    pub fn enabled() -> Self {
        Self {
            disabled: false,
            placeholder: ENABLED_PLACEHOLDER.to_string(),
            hide_border: false,
            hide_send_button: false,
            mask_value: false,
        }
    }

    pub fn for_flag(disabled: bool) -> Self {
        if disabled {
            Self::disabled()
        } else {
            Self::enabled()
        }
    }
}

/// Boundary adapter that applies an [`InputState`] to the host's widget.
///
/// Implementations return [`ExtensionError::HostIntegrationMissing`] when
/// the widget parts they need cannot be found.
pub trait ChatInputAdapter: Send + Sync {
    fn apply(&self, state: &InputState) -> Result<(), ExtensionError>;
}

/// Effect extension toggling the chat input. Payload: `isDisabled` (bool).
pub struct DisableInputExtension {
    adapter: Option<Arc<dyn ChatInputAdapter>>,
}

impl DisableInputExtension {
    /// An extension without a default adapter; the host supplies one per
    /// activation through the render context.
    pub fn new() -> Self {
        Self { adapter: None }
    }

    /// Fall back to `adapter` when the render context carries none.
    pub fn with_adapter(adapter: Arc<dyn ChatInputAdapter>) -> Self {
        Self {
            adapter: Some(adapter),
        }
    }
}

impl Default for DisableInputExtension {
    fn default() -> Self {
        Self::new()
    }
}

impl Extension for DisableInputExtension {
    fn name(&self) -> &'static str {
        "DisableInput"
    }

    fn kind(&self) -> ExtensionKind {
        ExtensionKind::Effect
    }

    fn discriminator(&self) -> &'static str {
        DISABLE_INPUT_DISCRIMINATOR
    }

    fn activate(&self, ctx: RenderContext) -> ExtensionFuture<'_> {
        Box::pin(async move {
            let host = ctx.require_host()?;
            let adapter = ctx
                .chat_input
                .clone()
                .or_else(|| self.adapter.clone())
                .ok_or_else(|| ExtensionError::HostIntegrationMissing("chat input".into()))?;
            let disabled = ctx
                .trace
                .payload
                .get("isDisabled")
                .and_then(|v| v.as_bool())
                .unwrap_or(false);
            let state = InputState::for_flag(disabled);
            if let Err(e) = adapter.apply(&state) {
                error!(error = %e, "failed to update chat input");
                return Err(e);
            }
            debug!(disabled, "chat input updated");
            host.interact(Interaction::Continue);
            Ok(Activation::Input(state))
        })
    }
}
