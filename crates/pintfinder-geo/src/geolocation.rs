//! Single-shot device location.
//!
//! [`GeolocationService`] models the host platform's location API: one
//! asynchronous position fix per request, no continuous tracking. The shipped
//! adapter resolves an approximate position through an IP geolocation
//! endpoint, which is the portable way to get a fix in a headless process;
//! embedders with access to a real platform API implement the trait
//! themselves.

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::{Coordinate, error::GeolocationError};

/// Yields the device's current coordinates once, or fails with a reason code.
#[async_trait::async_trait]
pub trait GeolocationService: Send + Sync {
    async fn request_position(&self) -> Result<Coordinate, GeolocationError>;
}

/// Run a position request with an upper bound on how long it may take.
///
/// Elapsing the deadline maps to [`GeolocationError::Timeout`]; the underlying
/// request is dropped, not surfaced.
pub async fn with_timeout<S>(service: &S, limit: Duration) -> Result<Coordinate, GeolocationError>
where
    S: GeolocationService + ?Sized,
{
    match tokio::time::timeout(limit, service.request_position()).await {
        Ok(result) => result,
        Err(_elapsed) => {
            warn!(?limit, "geolocation request timed out");
            Err(GeolocationError::Timeout)
        }
    }
}

const DEFAULT_ENDPOINT: &str = "http://ip-api.com/json";

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
}

/// IP-based geolocation against an ip-api.com style JSON endpoint.
#[derive(Debug, Clone)]
pub struct IpApiGeolocation {
    client: reqwest::Client,
    endpoint: String,
}

impl IpApiGeolocation {
    pub fn new() -> Result<Self, GeolocationError> {
        Self::with_endpoint(DEFAULT_ENDPOINT)
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Result<Self, GeolocationError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|_| GeolocationError::Unavailable)?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait::async_trait]
impl GeolocationService for IpApiGeolocation {
    #[instrument(name = "IP geolocation", skip(self), level = "debug")]
    async fn request_position(&self) -> Result<Coordinate, GeolocationError> {
        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|err| {
                warn!(%err, "geolocation transport failure");
                GeolocationError::Unavailable
            })?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "geolocation endpoint rejected request");
            return Err(GeolocationError::Unavailable);
        }

        let body: IpApiResponse = response.json().await.map_err(|err| {
            warn!(%err, "geolocation response undecodable");
            GeolocationError::Unavailable
        })?;

        // ip-api reports quota and lookup failures in-band with status "fail".
        if body.status != "success" {
            warn!(status = %body.status, "geolocation lookup refused");
            return Err(GeolocationError::PermissionDenied);
        }

        match (body.lat, body.lon) {
            (Some(lat), Some(lon)) => {
                let position = Coordinate::new(lat, lon);
                debug!(%position, "geolocation resolved");
                Ok(position)
            }
            _ => Err(GeolocationError::Unavailable),
        }
    }
}
