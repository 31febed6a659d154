//! Error types shared across the extension set.

use std::path::PathBuf;

use thiserror::Error;

use crate::booking::validate::FieldErrors;

/// Failure of an extension activation or of a host round-trip.
#[derive(Debug, Error)]
pub enum ExtensionError {
    /// The host did not supply a collaborator the extension needs for this
    /// render cycle (mount point, interaction callback, chat input).
    #[error("host integration missing: {0}")]
    HostIntegrationMissing(String),

    /// The trace payload could not be interpreted.
    #[error("invalid trace payload: {0}")]
    InvalidPayload(String),

    /// A booking operation was rejected.
    #[error(transparent)]
    Booking(#[from] BookingError),
}

/// Why a booking operation was rejected. The selection is never modified
/// when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingError {
    /// The operation is not valid in the current state. The UI is expected
    /// to disable the control, so callers treat this as a no-op.
    #[error("precondition not met: {0}")]
    Precondition(&'static str),

    /// The session was submitted and accepts no further mutation.
    #[error("booking already submitted")]
    Frozen,

    /// One or more contact fields failed validation.
    #[error("invalid contact fields: {0}")]
    Validation(FieldErrors),
}

/// Failure to load an [`ExtensionConfig`](crate::config::ExtensionConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A catalog that the booking flow cannot work without is empty.
    #[error("config catalog `{0}` must not be empty")]
    EmptyCatalog(&'static str),
}
