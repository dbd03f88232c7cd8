use thiserror::Error;

/// Failure of a forward-geocoding query.
///
/// All variants are non-fatal to the caller: the autocomplete input stays
/// live and shows an empty suggestion list.
#[derive(Error, Debug)]
pub enum GeocodeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("geocoding service returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("failed to decode geocoding response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Failure of a single-shot geolocation request.
///
/// Mirrors the reason codes of platform location APIs. The map view stays on
/// its default center when any of these occur.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeolocationError {
    #[error("location permission denied")]
    PermissionDenied,
    #[error("location unavailable")]
    Unavailable,
    #[error("location request timed out")]
    Timeout,
}
