// Error types module

use std::fmt;

/// Pipeline-level error type
///
/// Only two failure classes ever reach the caller: a malformed path (handled
/// before this type comes into play) and "could not produce an image at all",
/// which is what these variants represent. Cache-layer failures are recovered
/// inside the pipeline and never appear here.
#[derive(Debug, Clone)]
pub enum OptimizeError {
    /// The source object does not exist in the bucket
    SourceNotFound { key: String },

    /// The storage layer failed while reading the source object
    StorageUnavailable { message: String },

    /// Failed to decode the source image data
    DecodeFailed { message: String },

    /// Resize operation failed
    ResizeFailed { message: String },

    /// Encoding to the output format failed
    EncodeFailed { format: String, message: String },
}

impl fmt::Display for OptimizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptimizeError::SourceNotFound { key } => {
                write!(f, "Original image not found: {}", key)
            }
            OptimizeError::StorageUnavailable { message } => {
                write!(f, "Storage error: {}", message)
            }
            OptimizeError::DecodeFailed { message } => {
                write!(f, "Failed to decode image: {}", message)
            }
            OptimizeError::ResizeFailed { message } => {
                write!(f, "Resize failed: {}", message)
            }
            OptimizeError::EncodeFailed { format, message } => {
                write!(f, "Failed to encode to {}: {}", format, message)
            }
        }
    }
}

impl std::error::Error for OptimizeError {}

impl OptimizeError {
    /// Maps pipeline errors to HTTP status codes
    ///
    /// The missing-source case carries the storage layer's 404; everything
    /// else is an internal failure.
    pub fn to_http_status(&self) -> u16 {
        match self {
            OptimizeError::SourceNotFound { .. } => 404,

            OptimizeError::StorageUnavailable { .. }
            | OptimizeError::DecodeFailed { .. }
            | OptimizeError::ResizeFailed { .. }
            | OptimizeError::EncodeFailed { .. } => 500,
        }
    }

    /// Helper constructors for common error patterns
    pub fn source_not_found(key: impl Into<String>) -> Self {
        OptimizeError::SourceNotFound { key: key.into() }
    }

    pub fn storage_unavailable(message: impl Into<String>) -> Self {
        OptimizeError::StorageUnavailable {
            message: message.into(),
        }
    }

    pub fn decode_failed(message: impl Into<String>) -> Self {
        OptimizeError::DecodeFailed {
            message: message.into(),
        }
    }

    pub fn resize_failed(message: impl Into<String>) -> Self {
        OptimizeError::ResizeFailed {
            message: message.into(),
        }
    }

    pub fn encode_failed(format: impl Into<String>, message: impl Into<String>) -> Self {
        OptimizeError::EncodeFailed {
            format: format.into(),
            message: message.into(),
        }
    }
}
