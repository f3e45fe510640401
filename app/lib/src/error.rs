//! Error types for the tsbench library.
//!
//! Token-level problems during extraction are not errors: unparseable tokens
//! and NaN values are filtered out silently. Everything in this module is a
//! failure that stops the operation and is handed back to the caller.

use thiserror::Error;

/// Main error type for the tsbench library.
///
/// All fallible operations return `Result<T, TsbenchError>`.
#[derive(Debug, Error)]
pub enum TsbenchError {
    /// I/O error.
    ///
    /// Raised when a source cannot be read or a destination cannot be
    /// written. Never recovered from.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Non-I/O failure reported by the CSV record reader.
    #[error("CSV read error at line {line}: {message}")]
    CsvReadError {
        /// Line number where the reader failed (1-indexed, 0 if unknown)
        line: u64,
        /// Description of the failure
        message: String,
    },

    /// A line of a float text file did not hold a number.
    ///
    /// Only the strict line reader raises this; extraction filters instead.
    #[error("Float parse error at line {line}: {token:?} is not a number")]
    FloatParseError {
        /// Line number of the offending line (1-indexed)
        line: usize,
        /// The line content, trimmed
        token: String,
    },

    /// A codec rejected its input.
    #[error("{codec} codec error: {message}")]
    CodecError {
        /// Name of the codec that failed
        codec: &'static str,
        /// Description of the failure
        message: String,
    },

    /// Decoding a page did not give back the values that were encoded.
    #[error("{codec} round trip mismatch in page {page} at value {index}")]
    RoundTripMismatch {
        /// Name of the codec under test
        codec: &'static str,
        /// Page number (0-indexed)
        page: usize,
        /// Index of the first differing value within the page, or the
        /// decoded length when the lengths differ
        index: usize,
    },

    /// A configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A configuration file is not valid JSON for the expected shape.
    #[error("Configuration parse error: {0}")]
    ConfigParseError(#[from] serde_json::Error),
}

impl TsbenchError {
    /// Build a [`TsbenchError::CodecError`].
    pub fn codec(codec: &'static str, message: impl Into<String>) -> Self {
        TsbenchError::CodecError {
            codec,
            message: message.into(),
        }
    }
}

impl From<csv::Error> for TsbenchError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|p| p.line()).unwrap_or(0);
        match error.into_kind() {
            csv::ErrorKind::Io(e) => TsbenchError::IoError(e),
            kind => TsbenchError::CsvReadError {
                line,
                message: format!("{:?}", kind),
            },
        }
    }
}

/// Type alias for Results using `TsbenchError`.
pub type Result<T> = std::result::Result<T, TsbenchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_parse_error_display() {
        let error = TsbenchError::FloatParseError {
            line: 7,
            token: "abc".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("line 7"));
        assert!(display.contains("\"abc\""));
    }

    #[test]
    fn test_codec_error_display() {
        let error = TsbenchError::codec("gorilla", "stream truncated");
        let display = format!("{}", error);
        assert!(display.starts_with("gorilla codec error"));
        assert!(display.contains("stream truncated"));
    }

    #[test]
    fn test_round_trip_mismatch_display() {
        let error = TsbenchError::RoundTripMismatch {
            codec: "raw",
            page: 2,
            index: 17,
        };
        let display = format!("{}", error);
        assert!(display.contains("page 2"));
        assert!(display.contains("value 17"));
    }

    #[test]
    fn test_io_error_from() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: TsbenchError = io_error.into();
        assert!(matches!(error, TsbenchError::IoError(_)));
    }

    #[test]
    fn test_csv_io_error_becomes_io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let csv_error = csv::Error::from(io_error);
        let error: TsbenchError = csv_error.into();
        assert!(matches!(error, TsbenchError::IoError(_)));
    }

    #[test]
    fn test_config_parse_error_from() {
        let json_error = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let error: TsbenchError = json_error.into();
        assert!(matches!(error, TsbenchError::ConfigParseError(_)));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TsbenchError>();
    }
}
