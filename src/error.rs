use thiserror::Error;

/// Errors surfaced by the simulation core and its hosts.
#[derive(Debug, Error)]
pub enum FluidError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid resize to {width}x{height}")]
    InvalidResize { width: u32, height: u32 },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, FluidError>;
