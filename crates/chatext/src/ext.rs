//! Extension abstraction and dispatch.
//!
//! The [`Extension`] trait is what every chat-widget extension implements:
//! a name, a kind, the trace discriminator it answers to, and an async
//! `activate`. Extensions are collected into an [`ExtensionSet`] that routes
//! each incoming [`Trace`] to the first extension that matches it.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, info};

use crate::animation::{AnimationSlot, DoneAnimationExtension, WaitingAnimationExtension, WaitingHandle};
use crate::booking::calendar::{Clock, LocalClock};
use crate::booking::session::{BookingExtension, BookingSession};
use crate::config::ExtensionConfig;
use crate::error::ExtensionError;
use crate::host::{RenderContext, Trace};
use crate::input::{DisableInputExtension, InputState};

/// Boxed future returned by [`Extension::activate`].
pub type ExtensionFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Activation, ExtensionError>> + Send + 'a>>;

/// Whether an extension draws into a container or only acts on the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtensionKind {
    /// Renders into a mount point.
    Response,
    /// Side effect on host UI; no container.
    Effect,
}

/// What an activation left behind for the host to drive.
pub enum Activation {
    /// A live booking form awaiting user actions.
    Booking(BookingSession),
    /// A waiting animation whose timer is running.
    Waiting(WaitingHandle),
    /// A done signal was processed. `dismissed` is whether an animation
    /// was on screen to receive it.
    Done { dismissed: bool },
    /// The chat input was restyled.
    Input(InputState),
}

impl fmt::Debug for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Booking(session) => f.debug_tuple("Booking").field(session).finish(),
            Self::Waiting(handle) => f.debug_tuple("Waiting").field(handle).finish(),
            Self::Done { dismissed } => f.debug_struct("Done").field("dismissed", dismissed).finish(),
            Self::Input(state) => f.debug_tuple("Input").field(state).finish(),
        }
    }
}

/// A chat-widget extension.
///
/// Uses a boxed future so that the trait is dyn-compatible.
pub trait Extension: Send + Sync {
    fn name(&self) -> &'static str;

    fn kind(&self) -> ExtensionKind;

    /// The trace `type` (or `payload.name`) this extension answers to.
    fn discriminator(&self) -> &'static str;

    fn matches(&self, trace: &Trace) -> bool {
        trace.is(self.discriminator())
    }

    fn activate(&self, ctx: RenderContext) -> ExtensionFuture<'_>;
}

/// Public description of a registered extension.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExtensionDescriptor {
    pub name: &'static str,
    pub kind: ExtensionKind,
    pub discriminator: &'static str,
}

// ── ExtensionSet ──────────────────────────────────────────────────────

/// The extensions a host dispatches traces to, in registration order.
///
/// ```ignore
/// let config = ExtensionConfig::load("chatext.toml")?;
/// let set = ExtensionSet::from_config(&config);
/// if let Some(activation) = set.dispatch(ctx).await? {
///     // drive the session or handle
/// }
/// ```
#[derive(Default)]
pub struct ExtensionSet {
    extensions: Vec<Box<dyn Extension>>,
}

impl fmt::Debug for ExtensionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtensionSet")
            .field(
                "extensions",
                &self.extensions.iter().map(|e| e.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl ExtensionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an extension. Earlier registrations win when several match.
    pub fn register(&mut self, extension: impl Extension + 'static) {
        self.extensions.push(Box::new(extension));
    }

    /// Register an extension (builder pattern).
    pub fn with(mut self, extension: impl Extension + 'static) -> Self {
        self.register(extension);
        self
    }

    /// The four built-in extensions. Waiting and done share one
    /// [`AnimationSlot`].
    pub fn builtin(config: &ExtensionConfig, clock: Arc<dyn Clock>) -> Self {
        let slot = AnimationSlot::new();
        Self::new()
            .with(BookingExtension::new(Arc::new(config.catalog()), clock))
            .with(WaitingAnimationExtension::new(
                slot.clone(),
                config.waiting_text.clone(),
                config.waiting_delay(),
                config.settle_delay(),
            ))
            .with(DoneAnimationExtension::new(slot, config.settle_delay()))
            .with(DisableInputExtension::new())
    }

    /// [`builtin`](Self::builtin) with the host's local clock.
    pub fn from_config(config: &ExtensionConfig) -> Self {
        Self::builtin(config, Arc::new(LocalClock))
    }

    pub fn find(&self, trace: &Trace) -> Option<&dyn Extension> {
        self.extensions
            .iter()
            .find(|e| e.matches(trace))
            .map(|e| e.as_ref())
    }

    pub fn descriptors(&self) -> Vec<ExtensionDescriptor> {
        self.extensions
            .iter()
            .map(|e| ExtensionDescriptor {
                name: e.name(),
                kind: e.kind(),
                discriminator: e.discriminator(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    /// Activate the extension matching `ctx.trace`.
    ///
    /// Returns `Ok(None)` when no extension matches.
    pub async fn dispatch(&self, ctx: RenderContext) -> Result<Option<Activation>, ExtensionError> {
        let Some(extension) = self.find(&ctx.trace) else {
            debug!(trace = %ctx.trace.kind, "no extension matches trace");
            return Ok(None);
        };
        let name = extension.name();
        info!(extension = name, "activating extension");
        match extension.activate(ctx).await {
            Ok(activation) => Ok(Some(activation)),
            Err(e) => {
                error!(extension = name, error = %e, "extension activation failed");
                Err(e)
            }
        }
    }
}
