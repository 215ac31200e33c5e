use crate::{Result, Value};

/// Stateless mapping between one portable semantic type and one backend
/// column type.
///
/// `to_backend` fails with [`crate::AdapterError::Validation`] for values
/// outside the represented domain; `from_backend` fails with
/// [`crate::AdapterError::TypeMismatch`] when the backend hands back a value
/// the converter cannot interpret.
pub trait Converter: Send + Sync {
    /// Encode a portable value into its backend representation.
    fn to_backend(&self, value: &Value) -> Result<Value>;
    /// Decode a backend value into its portable representation.
    fn from_backend(&self, value: Value) -> Result<Value>;
}
