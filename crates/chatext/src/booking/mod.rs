//! Three-step test-drive booking form.
//!
//! ```text
//! LocationVehicle ──next──▶ DateTime ──next──▶ Contact ──submit──▶ (frozen)
//!        ◀──back──────────────  ◀──back──────────
//! ```
//!
//! [`machine`] holds the pure state machine, [`screens`] turns its state into
//! serializable render trees, and [`session`] binds both to a host.

pub mod calendar;
pub mod catalog;
pub mod machine;
pub mod screens;
pub mod session;
pub mod validate;

pub use calendar::{BookingDate, CalendarBounds, Clock, FixedClock, LocalClock, MonthCursor};
pub use catalog::{Catalog, Dealership, Vehicle};
pub use machine::{BookingMachine, BookingSelection, CompletionPayload, Step};
pub use screens::Screen;
pub use session::{ActionOutcome, BOOKING_DISCRIMINATOR, BookingAction, BookingExtension, BookingSession};
pub use validate::{ContactForm, Field, FieldErrors, validate_contact};
