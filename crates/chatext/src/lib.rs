//! Chat-widget extensions for a conversational car-dealership assistant.
//!
//! A chat host dispatches [`Trace`](host::Trace) events; each extension in an
//! [`ExtensionSet`](ext::ExtensionSet) answers to one trace discriminator and
//! either renders into a container the host provides or acts on the host's
//! UI directly.
//!
//! | Discriminator | Extension | Kind |
//! |---------------|-----------|------|
//! | `ext_booking` | [`BookingExtension`](booking::BookingExtension) | response |
//! | `ext_waitingAnimation` | [`WaitingAnimationExtension`](animation::WaitingAnimationExtension) | response |
//! | `ext_doneAnimation` | [`DoneAnimationExtension`](animation::DoneAnimationExtension) | response |
//! | `ext_disableInput` | [`DisableInputExtension`](input::DisableInputExtension) | effect |
//!
//! ```ignore
//! use chatext::prelude::*;
//!
//! let set = ExtensionSet::from_config(&ExtensionConfig::default());
//! let ctx = RenderContext::new(trace).with_host(host).with_mount(mount);
//! if let Some(Activation::Booking(mut session)) = set.dispatch(ctx).await? {
//!     session.handle(BookingAction::SelectLocation { value: "RENAULT MONTROUGE".into() });
//! }
//! ```
//!
//! # Where to find things
//!
//! - **Booking state and rules:** [`booking::machine`], with date math in
//!   [`booking::calendar`] and form checks in [`booking::validate`].
//! - **What gets drawn:** [`view::View`] and [`booking::screens`]. Rendering
//!   is declarative; the host's [`Mount`](host::Mount) decides how to paint.
//! - **Host collaborators:** [`host`] for the callback and mount traits,
//!   [`input::ChatInputAdapter`] for the chat input boundary.
//! - **Logs:** [`log::ExtensionLogLayer`] buffers tracing events for hosts
//!   that display them.

pub mod animation;
pub mod booking;
pub mod config;
pub mod error;
pub mod ext;
pub mod host;
pub mod input;
pub mod log;
pub mod prelude;
pub mod view;

pub use error::{BookingError, ConfigError, ExtensionError};
