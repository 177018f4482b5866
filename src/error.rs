use std::num::ParseFloatError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AcError {
    #[error("Station not found: {0}")]
    StationNotFound(String),
    #[error("Bus stop not found: {0}")]
    BusStopNotFound(String),
    #[error("Bus route not found: {0}")]
    BusRouteNotFound(String),
    #[error("{0}")]
    Geolocation(#[from] GeolocationError),
    #[error("Invalid coordinates: {0}, {1}")]
    InvalidCoordinates(f64, f64),
    #[error("Map SDK unavailable: {0}")]
    SdkUnavailable(String),
    #[error("Directions request failed with status {0}")]
    DirectionsStatus(String),
    #[error("HTTP error! status: {0}")]
    HttpStatus(u16),
    #[error("No backend configured")]
    NoBackend,
    #[error("No signed-in user")]
    NotSignedIn,
    #[error("Message is empty")]
    EmptyMessage,
    #[error("Failed to parse date {0}")]
    ParseDate(#[from] chrono::ParseError),
    #[error("Failed to parse float: {0}")]
    ParseFloatError(#[from] ParseFloatError),
    #[error("Io Error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("SerdeJsonError: {0}")]
    SerdeJsonError(#[from] serde_json::Error),
    #[error("Reqwest error: {0}")]
    ReqwestError(#[from] reqwest::Error),
    #[error("Invalid url: {0}")]
    UrlError(#[from] url::ParseError),
}

/// Failures of a position request, worded the way they are shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeolocationError {
    #[error("Geolocation is not supported by this device")]
    Unsupported,
    #[error("Location access denied by user")]
    PermissionDenied,
    #[error("Location information unavailable")]
    PositionUnavailable,
    #[error("Location request timed out")]
    Timeout,
}

pub type AcResult<T> = Result<T, AcError>;
