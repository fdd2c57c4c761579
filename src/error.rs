//! Error types for palette extraction

use thiserror::Error;

/// Result type alias for palette operations
pub type Result<T> = std::result::Result<T, PaletteError>;

/// Everything that can go wrong between raw image bytes and a finished palette
#[derive(Error, Debug)]
pub enum PaletteError {
    /// Image could not be decoded, is not JPEG/PNG/WEBP, or has no RGB pixels
    #[error("Unsupported image: {message}")]
    UnsupportedFormat {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Requested palette size does not fit the sampled pixels
    #[error("Invalid cluster count: {requested} requested, {available} pixels available")]
    InvalidClusterCount { requested: usize, available: usize },

    /// Invalid input parameters
    #[error("Invalid parameter: {parameter} = {value}")]
    InvalidParameter { parameter: String, value: String },

    /// Configuration file could not be read or written
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Unexpected failure inside the pipeline
    #[error("Processing error: {message}")]
    Processing { message: String },
}

impl PaletteError {
    /// Create an unsupported-format error wrapping the decoder's error
    pub fn unsupported<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::UnsupportedFormat {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an unsupported-format error with no underlying cause
    pub fn unsupported_msg(message: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            message: message.into(),
            source: None,
        }
    }

    pub fn invalid_parameter(parameter: impl Into<String>, value: impl ToString) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            value: value.to_string(),
        }
    }

    /// Create a configuration error with context
    pub fn config<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Get user-friendly error description for application display
    pub fn user_message(&self) -> String {
        match self {
            PaletteError::UnsupportedFormat { .. } => {
                "Invalid image. Please upload a valid JPG, JPEG, PNG, or WEBP file.".to_string()
            }
            PaletteError::InvalidClusterCount { requested, available } => format!(
                "Cannot build a palette of {requested} colors from {available} pixels. Please choose a smaller palette size."
            ),
            PaletteError::InvalidParameter { parameter, .. } => {
                format!("Invalid setting for {parameter}.")
            }
            PaletteError::Config { .. } => {
                "Could not load the configuration file.".to_string()
            }
            PaletteError::Processing { message } => {
                format!("An error occurred while processing the image: {message}")
            }
        }
    }
}
