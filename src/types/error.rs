use thiserror::Error;

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid configuration: {0}")]
    Configuration(String),
    #[error("invalid geometry: {0}")]
    Geometry(String),
    #[error("invalid metadata: {0}")]
    InvalidMetadata(String),
    #[error("out of bounds: {0}")]
    OutOfBounds(String),
}
