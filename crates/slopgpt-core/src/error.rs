use thiserror::Error;

/// Top-level error type for the SlopGPT services.
///
/// Subsystem crates define their own error types and convert into
/// `SlopError` where they cross a crate boundary.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SlopError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for SlopError {
    fn from(err: toml::de::Error) -> Self {
        SlopError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for SlopError {
    fn from(err: toml::ser::Error) -> Self {
        SlopError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for SlopError {
    fn from(err: serde_json::Error) -> Self {
        SlopError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for SlopGPT operations.
pub type Result<T> = std::result::Result<T, SlopError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SlopError::Config("missing field".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing field");

        let err = SlopError::Validation("Name and email are required".to_string());
        assert_eq!(
            err.to_string(),
            "Validation error: Name and email are required"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: SlopError = io_err.into();
        assert!(matches!(err, SlopError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_error_from_toml_de() {
        let err: std::result::Result<toml::Value, _> = toml::from_str("invalid = [[[");
        let slop_err: SlopError = err.unwrap_err().into();
        assert!(matches!(slop_err, SlopError::Config(_)));
    }

    #[test]
    fn test_error_from_serde_json() {
        let err: std::result::Result<serde_json::Value, _> = serde_json::from_str("{ nope }");
        let slop_err: SlopError = err.unwrap_err().into();
        assert!(matches!(slop_err, SlopError::Serialization(_)));
    }

    #[test]
    fn test_result_type_with_question_mark() {
        fn inner() -> Result<String> {
            let io_result: std::result::Result<i32, std::io::Error> = Ok(42);
            let value = io_result?;
            Ok(value.to_string())
        }

        assert_eq!(inner().unwrap(), "42");
    }
}
