/// Result alias used across `formflash`.
pub type FlashResult<T> = Result<T, FlashError>;

/// Errors raised while building flash configuration or raster surfaces.
///
/// The tick and paint paths never produce these: host misses there are logged and skipped.
#[derive(thiserror::Error, Debug)]
pub enum FlashError {
    /// Invalid timing, frame-rate or palette settings.
    #[error("validation error: {0}")]
    Validation(String),

    /// Settings could not be read or parsed.
    #[error("config error: {0}")]
    Config(String),

    /// Raster surface setup or readback failed.
    #[error("render error: {0}")]
    Render(String),

    /// Any other error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FlashError {
    /// Build a [`FlashError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`FlashError::Config`].
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`FlashError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
