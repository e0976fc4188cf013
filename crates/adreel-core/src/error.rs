//! Core error types for adreel.
//!
//! The per-frame compositor never fails on content problems; these errors
//! cover the edges: parsing props, reading config, encoding and I/O.

/// A specialized Result type for adreel operations.
pub type AdreelResult<T> = Result<T, AdreelError>;

/// Top-level error type encompassing all adreel subsystems.
#[derive(Debug, thiserror::Error)]
pub enum AdreelError {
    #[error("parse error: {message} at line {line}, column {column}")]
    Parse {
        message: String,
        line: usize,
        column: usize,
    },

    #[error("config error: {0}")]
    Config(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("encode error: {0}")]
    Encode(String),

    #[error("asset error: {message} ({url})")]
    Asset { message: String, url: String },

    #[error("validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{0}")]
    Other(String),
}

impl AdreelError {
    /// Create a parse error with source location.
    pub fn parse(message: impl Into<String>, line: usize, column: usize) -> Self {
        AdreelError::Parse {
            message: message.into(),
            line,
            column,
        }
    }

    /// Create an asset error.
    pub fn asset(message: impl Into<String>, url: impl Into<String>) -> Self {
        AdreelError::Asset {
            message: message.into(),
            url: url.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = AdreelError::parse("expected value", 10, 5);
        assert_eq!(
            err.to_string(),
            "parse error: expected value at line 10, column 5"
        );
    }

    #[test]
    fn test_asset_error_display() {
        let err = AdreelError::asset("decode failed", "https://cdn.example.com/hero.jpg");
        assert!(err.to_string().contains("decode failed"));
        assert!(err.to_string().contains("hero.jpg"));
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: AdreelError = io.into();
        assert!(matches!(err, AdreelError::Io(_)));
    }
}
