//! Error types
//!
//! Nothing here is fatal to the watch. Sync and wire errors drop the offending
//! update, render errors skip a frame, time errors keep the previous clock.

use thiserror::Error;

/// A weather payload that cannot be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncError {
    #[error("payload is missing key {0}")]
    MissingKey(&'static str),
    #[error("payload key {0} has an unexpected type")]
    WrongType(&'static str),
}

/// A BLE frame from the companion that cannot be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WireError {
    #[error("frame is not a valid postcard message")]
    Decode,
    #[error("frame does not fit the output buffer")]
    Encode,
}

/// Drawing a frame failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RenderError {
    #[error("text does not fit the label buffer")]
    Format,
    #[error("clock instant is out of range")]
    Clock,
    #[error("draw target rejected the frame")]
    Target,
}

/// Invalid Current Time Service data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimeError {
    #[error("expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("date or time fields are out of range")]
    InvalidDate,
}
