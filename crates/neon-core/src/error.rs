//! Error types for Neon

use thiserror::Error;

/// The main error type for Neon operations
#[derive(Debug, Error)]
pub enum NeonError {
    #[error("Surface unavailable: {0}")]
    SurfaceUnavailable(String),

    #[error("Render error: {0}")]
    RenderError(String),

    #[error("Invalid performance tier: {0}")]
    InvalidTier(String),

    #[error("Invalid particle kind: {0}")]
    InvalidKind(String),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),
}

/// Result type alias for Neon operations
pub type Result<T> = std::result::Result<T, NeonError>;

impl From<toml::de::Error> for NeonError {
    fn from(err: toml::de::Error) -> Self {
        NeonError::TomlParseError(err.to_string())
    }
}
