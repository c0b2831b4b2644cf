//! User location resolution for the nearby-places explorer.
//!
//! [`GeoLocator`] is the one entry point the app calls. It wraps a
//! [`PositionSource`] (IP geolocation in production) and turns every way the
//! lookup can go wrong into a [`LocateError`] the status line can show.

use crate::config::{LocationConfig, LocationProvider};
use crate::error::LocateError;
use crate::models::Coordinate;
use async_trait::async_trait;
use ipgeolocate::{Locator, Service};
use std::time::Duration;
use tracing::{error, info, warn};

/// Something that can answer "where is the user right now".
#[async_trait]
pub trait PositionSource: Send + Sync {
    async fn current_position(&self) -> Result<Coordinate, LocateError>;
}

/// IP based position lookup through `ipgeolocate`.
pub struct IpLocator {
    provider: LocationProvider,
    address: String,
}

impl IpLocator {
    /// Returns `None` for [`LocationProvider::None`].
    pub fn new(provider: LocationProvider, address: impl Into<String>) -> Option<Self> {
        (provider != LocationProvider::None).then(|| Self {
            provider,
            address: address.into(),
        })
    }

    fn service(&self) -> Service {
        match self.provider {
            LocationProvider::IpWhois => Service::IpWhois,
            _ => Service::IpApi,
        }
    }
}

#[async_trait]
impl PositionSource for IpLocator {
    async fn current_position(&self) -> Result<Coordinate, LocateError> {
        let loc = Locator::get(&self.address, self.service()).await.map_err(|e| {
            error!("Error using geolocation service: {}", e);
            LocateError::PositionUnavailable
        })?;

        let lat = loc.latitude.parse::<f64>().ok();
        let lon = loc.longitude.parse::<f64>().ok();
        match lat.zip(lon).and_then(|(lat, lon)| Coordinate::try_new(lat, lon)) {
            Some(coord) => Ok(coord),
            None => {
                warn!(
                    "Geolocation returned an unusable position ({:?}, {:?})",
                    loc.latitude, loc.longitude
                );
                Err(LocateError::PositionUnavailable)
            }
        }
    }
}

/// Classifying wrapper around a [`PositionSource`].
///
/// Configuration decides whether detection is possible at all (`None`
/// provider), whether it is permitted, and how long a lookup may take.
pub struct GeoLocator<S> {
    source: Option<S>,
    allow_detection: bool,
    timeout: Duration,
}

impl GeoLocator<IpLocator> {
    /// Builds the production locator from `[location]` settings.
    pub fn from_config(config: &LocationConfig) -> Self {
        Self {
            source: IpLocator::new(config.provider, config.lookup_address.clone()),
            allow_detection: config.allow_detection,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

impl<S: PositionSource> GeoLocator<S> {
    pub fn new(source: Option<S>, allow_detection: bool, timeout: Duration) -> Self {
        Self {
            source,
            allow_detection,
            timeout,
        }
    }

    /// Acquires the current position or the classified reason it failed.
    ///
    /// Performs no view mutation; the caller applies the result.
    pub async fn detect(&self) -> Result<Coordinate, LocateError> {
        let Some(source) = self.source.as_ref() else {
            return Err(LocateError::Unsupported);
        };
        if !self.allow_detection {
            return Err(LocateError::PermissionDenied);
        }

        let coord = tokio::time::timeout(self.timeout, source.current_position())
            .await
            .map_err(|_| LocateError::Timeout)??;

        info!("Geolocation successful - ({}, {})", coord.latitude, coord.longitude);
        Ok(coord)
    }
}
