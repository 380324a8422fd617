use thiserror::Error;

/// Top-level error type for the dealbot workspace.
///
/// Subsystem crates define their own error types and implement
/// `From<DealbotError>` so that `?` works across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DealbotError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for DealbotError {
    fn from(err: toml::de::Error) -> Self {
        DealbotError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for DealbotError {
    fn from(err: toml::ser::Error) -> Self {
        DealbotError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for DealbotError {
    fn from(err: serde_json::Error) -> Self {
        DealbotError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for dealbot operations.
pub type Result<T> = std::result::Result<T, DealbotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DealbotError::Config("missing field".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing field");
    }

    #[test]
    fn test_error_display_all_variants() {
        let cases: Vec<(DealbotError, &str)> = vec![
            (
                DealbotError::Config("bad key".to_string()),
                "Configuration error: bad key",
            ),
            (
                DealbotError::Storage("disk full".to_string()),
                "Storage error: disk full",
            ),
            (
                DealbotError::Serialization("invalid json".to_string()),
                "Serialization error: invalid json",
            ),
            (
                DealbotError::Api("bind failed".to_string()),
                "API error: bind failed",
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.to_string(), expected);
        }
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: DealbotError = io_err.into();
        assert!(matches!(err, DealbotError::Io(_)));
        assert!(err.to_string().starts_with("I/O error:"));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_error_from_toml_de() {
        let err: std::result::Result<toml::Value, _> = toml::from_str("invalid = [[[");
        let err: DealbotError = err.unwrap_err().into();
        assert!(matches!(err, DealbotError::Config(_)));
    }

    #[test]
    fn test_error_from_serde_json() {
        let err: std::result::Result<serde_json::Value, _> = serde_json::from_str("{ nope }");
        let err: DealbotError = err.unwrap_err().into();
        assert!(matches!(err, DealbotError::Serialization(_)));
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
