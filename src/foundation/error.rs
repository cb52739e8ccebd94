/// Result alias used throughout the crate.
pub type WatermarkResult<T> = Result<T, WatermarkError>;

/// Errors that abort a render pass or an export.
///
/// Bad configuration values are not errors; they resolve to fallbacks inside the resolver and
/// compiler. What remains here is input that cannot be turned into pixels at all.
#[derive(thiserror::Error, Debug)]
pub enum WatermarkError {
    /// Structurally invalid input (zero-sized canvas, mismatched buffers, ...).
    #[error("validation error: {0}")]
    Validation(String),

    /// A base image or watermark raster could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// Font data could not be registered or no font is available for text.
    #[error("font error: {0}")]
    Font(String),

    /// The composited surface could not be encoded.
    #[error("encode error: {0}")]
    Encode(String),

    /// Settings JSON could not be read or written.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Anything else, with its source chain preserved.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl WatermarkError {
    /// Build a [`WatermarkError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`WatermarkError::Decode`].
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`WatermarkError::Font`].
    pub fn font(msg: impl Into<String>) -> Self {
        Self::Font(msg.into())
    }

    /// Build a [`WatermarkError::Encode`].
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`WatermarkError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
