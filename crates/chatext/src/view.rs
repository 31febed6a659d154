//! Render instructions handed to a [`Mount`](crate::host::Mount).

use serde::Serialize;

use crate::animation::WaitingView;
use crate::booking::screens::Screen;

/// Everything an extension can draw into its container.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum View {
    Booking(Screen),
    Waiting(WaitingView),
}
