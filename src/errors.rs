//! Errors for boat bookings
use thiserror::Error;

use crate::models::{BoatId, CaptainId};

/// Rejection of a create, update or submit request.
///
/// Validation errors are reported back to the user; the store is left
/// untouched whenever one is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field missing: {0}")]
    MissingField(&'static str),

    #[error("Capacity must be at least 1")]
    InvalidCapacity,

    #[error("Participants must be at least 1")]
    InvalidParticipants,

    #[error("End time must be after start time")]
    InvalidWindow,

    #[error("Unknown boat: {0}")]
    UnknownBoat(BoatId),

    #[error("Unknown captain: {0}")]
    UnknownCaptain(CaptainId),

    #[error("Boat {0} is not available for this booking")]
    BoatUnavailable(BoatId),

    #[error("Captain {0} is not available for this booking")]
    CaptainUnavailable(CaptainId),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Serialization error")]
    SerdeError(#[from] serde_json::Error),

    #[error("Configuration error")]
    ConfigError(#[from] config::ConfigError),

    #[error("IO error")]
    IoError(#[from] std::io::Error),

    #[error("Invalid configuration: {message}")]
    ConfigurationError { message: String },

    #[error("Seed file error: {path}: {origin}")]
    SeedError { path: String, origin: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}
