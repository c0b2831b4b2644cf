//! Failure classes for location acquisition and nearby search.
//!
//! Every variant's `Display` text is the message shown in the status line,
//! so these read as user-facing sentences rather than diagnostics.

use thiserror::Error;

/// Why the user's position could not be determined.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocateError {
    #[error("Geolocation is not supported by this configuration.")]
    Unsupported,

    #[error("Location permission denied. Enable location detection in config.toml.")]
    PermissionDenied,

    #[error("Location information is unavailable.")]
    PositionUnavailable,

    #[error("The request to get your location timed out.")]
    Timeout,
}

/// Why a nearby-places search produced no result set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// No coordinate has been detected or entered yet. No request is sent.
    #[error("Press 'd' to detect your location first, or enter coordinates.")]
    MissingOrigin,

    /// A search input could not be turned into a query. No request is sent.
    #[error("{0}")]
    InvalidInput(String),

    /// Transport failure or an undecodable response body.
    #[error("Failed to fetch data from server.")]
    NetworkError(String),

    /// The backend answered with an explicit `error` message.
    #[error("{0}")]
    ServerError(String),
}
