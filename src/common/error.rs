//! Error handling for bitrow

use thiserror::Error;

/// Main error type for compaction, coding and index operations
#[derive(Error, Debug)]
pub enum BitrowError {
    /// Missing definition/stats, bad start index, stats that do not match the definition
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A declared column type has no encoding path
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// Malformed or truncated stream; nothing after this point can be trusted
    #[error("Decode error: {0}")]
    Decode(String),

    /// A caller broke a coding contract (zero passed as positive, value outside a fixed range, ...)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for BitrowError {
    fn from(err: serde_json::Error) -> Self {
        BitrowError::Serialization(err.to_string())
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, BitrowError>;

/// Result type alias for bitrow operations (alias for Result)
pub type BitrowResult<T> = std::result::Result<T, BitrowError>;

/// Macro for creating configuration errors
#[macro_export]
macro_rules! config_err {
    ($msg:expr) => {
        $crate::common::error::BitrowError::Configuration($msg.to_string())
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::common::error::BitrowError::Configuration(format!($fmt, $($arg)*))
    };
}

/// Macro for creating decode errors
#[macro_export]
macro_rules! decode_err {
    ($msg:expr) => {
        $crate::common::error::BitrowError::Decode($msg.to_string())
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::common::error::BitrowError::Decode(format!($fmt, $($arg)*))
    };
}

/// Macro for creating invalid argument errors
#[macro_export]
macro_rules! invalid_arg_err {
    ($msg:expr) => {
        $crate::common::error::BitrowError::InvalidArgument($msg.to_string())
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::common::error::BitrowError::InvalidArgument(format!($fmt, $($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = config_err!("negative start index");
        assert_eq!(format!("{}", err), "Configuration error: negative start index");

        let err = decode_err!("value too large for {}-bit integer", 32);
        assert_eq!(format!("{}", err), "Decode error: value too large for 32-bit integer");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof");
        let err: BitrowError = io.into();
        assert!(matches!(err, BitrowError::Io(_)));
    }
}
