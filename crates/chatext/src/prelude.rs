//! Convenience re-exports for common `chatext` types.
//!
//! ```ignore
//! use chatext::prelude::*;
//! ```

// ── Extensions ──────────────────────────────────────────────────────
pub use crate::animation::{
    AnimationSlot, DoneAnimationExtension, WaitingAnimationExtension, WaitingHandle,
    WaitingOutcome, WaitingView,
};
pub use crate::ext::{
    Activation, Extension, ExtensionDescriptor, ExtensionFuture, ExtensionKind, ExtensionSet,
};
pub use crate::input::{ChatInputAdapter, DisableInputExtension, InputState};

// ── Booking ─────────────────────────────────────────────────────────
pub use crate::booking::{
    ActionOutcome, BookingAction, BookingExtension, BookingSession, Catalog, Clock,
    CompletionPayload, ContactForm, FixedClock, LocalClock, Screen, Step,
};

// ── Host ────────────────────────────────────────────────────────────
pub use crate::config::ExtensionConfig;
pub use crate::error::{BookingError, ConfigError, ExtensionError};
pub use crate::host::{Host, Interaction, Mount, RenderContext, Trace};
pub use crate::log::{ExtensionLogLayer, LogBuffer, LogLevel, LogLine};
pub use crate::view::View;
