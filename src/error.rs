use thiserror::Error;

/// Errors raised while acquiring a TMY or deriving yields from it
#[derive(Debug, Error)]
pub enum YieldError {
    #[error("TMY request rejected for lat={lat}, lon={lon} (HTTP {status}); check the coordinates")]
    Request { lat: f64, lon: f64, status: u16 },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to parse TMY payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid timestamp: {0}")]
    Timestamp(String),

    #[error("Metadata error: {0}")]
    Metadata(String),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<bincode::Error> for YieldError {
    fn from(e: bincode::Error) -> Self {
        YieldError::Cache(e.to_string())
    }
}

impl From<figment::Error> for YieldError {
    fn from(e: figment::Error) -> Self {
        YieldError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, YieldError>;
