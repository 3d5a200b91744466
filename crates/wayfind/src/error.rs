use thiserror::Error;

#[derive(Error, Debug)]
pub enum WayfindError {
    #[error("Geo error: {0}")]
    Geo(#[from] wayfind_geo::GeoError),
    #[error("Geocoder error: {0}")]
    Geocoder(#[from] wayfind_geo::GeocodeError),
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
    #[error("Runtime error: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("Init Logging error: {0}")]
    InitLogging(#[from] tracing_subscriber::filter::ParseError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, WayfindError>;
