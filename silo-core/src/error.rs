use thiserror::Error;

/// Normalized error taxonomy shared by every provider adapter.
///
/// Backend diagnostics are translated into this enum exactly once, at the
/// adapter's wrap boundary; everything downstream matches on the variant and
/// never inspects backend-specific structures.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// A value outside the domain accepted by a converter.
    #[error("value outside the accepted domain: {0}")]
    Validation(String),

    /// The backend returned a value of an unexpected type.
    #[error("unexpected value type from the backend: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    /// Ambiguous, conflicting or incomplete construction parameters.
    #[error("invalid adapter configuration: {0}")]
    Configuration(String),

    /// A DDL object already exists. Recovered locally during table creation,
    /// never surfaced to the caller.
    #[error("schema object already exists: {0}")]
    SchemaConflict(String),

    /// No session could be leased within the configured pool bounds.
    #[error("no session available within the configured pool bounds")]
    PoolExhausted,

    /// The operation is not supported by this adapter.
    #[error("not implemented: {0}")]
    NotImplemented(String),

    /// Any other backend-reported error, wrapped uniformly.
    #[error("backend error {code}: {message}")]
    Backend { code: i32, message: String },
}

/// Result type.
pub type Result<T> = std::result::Result<T, AdapterError>;

impl AdapterError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn type_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn backend(code: i32, message: impl Into<String>) -> Self {
        Self::Backend {
            code,
            message: message.into(),
        }
    }

    /// Whether this error reports a DDL object that already exists.
    pub fn is_schema_conflict(&self) -> bool {
        matches!(self, Self::SchemaConflict(..))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_carries_original_diagnostic() {
        let error = AdapterError::backend(942, "table or view does not exist");
        assert_eq!(
            error.to_string(),
            "backend error 942: table or view does not exist"
        );
        assert!(!error.is_schema_conflict());
        assert!(AdapterError::SchemaConflict("T".into()).is_schema_conflict());
    }
}
