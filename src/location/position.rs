use std::{future::Future, time::Duration};

use serde::Serialize;

use crate::error::GeolocationError;
use crate::utils::Coordinates;

pub const POSITION_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    pub lat: f64,
    pub lng: f64,
    /// Radius of uncertainty in metres.
    pub accuracy: f64,
}

impl Position {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lng)
    }
}

/// Anything able to tell where the device is.
pub trait PositionProvider {
    fn current_position(&self)
    -> impl Future<Output = Result<Position, GeolocationError>> + Send;
}

/// A position fixed up front, e.g. from the command line.
#[derive(Debug, Clone, Copy)]
pub struct FixedPositionProvider(pub Position);

impl PositionProvider for FixedPositionProvider {
    async fn current_position(&self) -> Result<Position, GeolocationError> {
        Ok(self.0)
    }
}

/// Stands in when the host has no way to locate itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedPositionProvider;

impl PositionProvider for UnsupportedPositionProvider {
    async fn current_position(&self) -> Result<Position, GeolocationError> {
        Err(GeolocationError::Unsupported)
    }
}

pub async fn get_current_location<P: PositionProvider>(
    provider: &P,
    timeout: Duration,
) -> Result<Position, GeolocationError> {
    match tokio::time::timeout(timeout, provider.current_position()).await {
        Ok(result) => result.inspect_err(|e| log::warn!("Position request failed: {e}")),
        Err(_) => {
            log::warn!("Position request timed out after {timeout:?}");
            Err(GeolocationError::Timeout)
        }
    }
}
