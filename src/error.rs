//! Error types for the palette_picker library

use thiserror::Error;

/// Result type alias for palette_picker operations
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Error types for palette extraction
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// Buffer has no usable pixels after filtering
    ///
    /// Not fatal: the engine answers with the all-fallback palette.
    #[error("No usable pixels in the input buffer")]
    EmptyInput,

    /// Extraction exceeded its time budget and was abandoned
    #[error("Extraction timed out after {limit_ms}ms")]
    Timeout { limit_ms: u64 },

    /// Caller withdrew interest before the extraction finished
    #[error("Extraction cancelled")]
    Cancelled,

    /// Encoded image data could not be turned into pixels
    #[error("Failed to decode image: {message}")]
    DecodeFailure {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration value rejected before computation started
    #[error("Invalid configuration: {parameter} = {value}")]
    InvalidConfig { parameter: String, value: String },

    /// Pixel data length does not match the declared dimensions
    #[error("Invalid pixel buffer: expected {expected} bytes, got {actual}")]
    InvalidBuffer { expected: usize, actual: usize },

    /// Worker task ended abnormally
    #[error("Extraction task failed: {message}")]
    TaskFailure { message: String },
}

impl ExtractionError {
    /// Create a decode error with context
    pub fn decode<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::DecodeFailure {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a decode error without an underlying cause
    pub fn decode_message(message: impl Into<String>) -> Self {
        Self::DecodeFailure {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error for a named parameter
    pub fn invalid_config(parameter: impl Into<String>, value: impl ToString) -> Self {
        Self::InvalidConfig {
            parameter: parameter.into(),
            value: value.to_string(),
        }
    }

    /// Check if this error indicates a recoverable condition
    ///
    /// Recoverable errors can be answered with the configured fallbacks
    /// instead of failing the caller.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ExtractionError::EmptyInput)
    }

    /// Get user-friendly error description for application display
    pub fn user_message(&self) -> String {
        match self {
            ExtractionError::EmptyInput => {
                "The image has no visible pixels. Fallback colors were used.".to_string()
            }
            ExtractionError::Timeout { limit_ms } => {
                format!("Color extraction took longer than {}ms. Please try a smaller image.", limit_ms)
            }
            ExtractionError::DecodeFailure { .. } => {
                "Could not read the image. Please check the format and try again.".to_string()
            }
            ExtractionError::InvalidConfig { parameter, .. } => {
                format!("Invalid value for '{}'. Colors must be in the format #ffffff or #fff.", parameter)
            }
            _ => "Color extraction failed. Please try with a different image.".to_string(),
        }
    }
}
