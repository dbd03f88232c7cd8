use thiserror::Error;

#[derive(Error, Debug)]
pub enum PintfinderError {
    #[error("Geocoding error: {0}")]
    Geocode(#[from] pintfinder_geo::GeocodeError),
    #[error("Geolocation error: {0}")]
    Geolocation(#[from] pintfinder_geo::GeolocationError),
    #[error("Store error: {0}")]
    Store(#[from] crate::store::StoreError),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Init Logging error: {0}")]
    InitLoggingError(#[from] tracing_subscriber::filter::ParseError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, PintfinderError>;
