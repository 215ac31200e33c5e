use rust_decimal::Decimal;
use time::{Date, PrimitiveDateTime};

/// Portable value carried between the mapping engine and a backend.
///
/// Each variant doubles as a type witness: a `None` payload describes a column
/// type (possibly with parameters) without carrying data. Trailing fields hold
/// the declared type parameters and survive even when the payload is absent.
#[derive(Default, Debug, Clone, PartialEq)]
pub enum Value {
    /// Untyped null.
    #[default]
    Null,
    Boolean(Option<bool>),
    Int8(Option<i8>),
    Int16(Option<i16>),
    Int32(Option<i32>),
    Int64(Option<i64>),
    Float32(Option<f32>),
    Float64(Option<f64>),
    /// Fixed-point decimal with declared precision and scale.
    Decimal(Option<Decimal>, u8, u8),
    /// Text with a declared maximum length in characters, 0 meaning unbounded.
    Varchar(Option<String>, u32),
    Blob(Option<Vec<u8>>),
    Date(Option<Date>),
    Timestamp(Option<PrimitiveDateTime>),
}

impl Value {
    /// Whether the value carries no data (either `Null` or an empty payload).
    pub fn is_null(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Boolean(v) => v.is_none(),
            Value::Int8(v) => v.is_none(),
            Value::Int16(v) => v.is_none(),
            Value::Int32(v) => v.is_none(),
            Value::Int64(v) => v.is_none(),
            Value::Float32(v) => v.is_none(),
            Value::Float64(v) => v.is_none(),
            Value::Decimal(v, ..) => v.is_none(),
            Value::Varchar(v, ..) => v.is_none(),
            Value::Blob(v) => v.is_none(),
            Value::Date(v) => v.is_none(),
            Value::Timestamp(v) => v.is_none(),
        }
    }

    /// Semantic type name, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(..) => "boolean",
            Value::Int8(..) => "int8",
            Value::Int16(..) => "int16",
            Value::Int32(..) => "int32",
            Value::Int64(..) => "int64",
            Value::Float32(..) => "float32",
            Value::Float64(..) => "float64",
            Value::Decimal(..) => "decimal",
            Value::Varchar(..) => "varchar",
            Value::Blob(..) => "blob",
            Value::Date(..) => "date",
            Value::Timestamp(..) => "timestamp",
        }
    }

    /// Whether this value is one of the integer variants.
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            Value::Int8(..) | Value::Int16(..) | Value::Int32(..) | Value::Int64(..)
        )
    }

    /// Integer payload widened to `i64`, when present.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int8(Some(v)) => Some(*v as i64),
            Value::Int16(Some(v)) => Some(*v as i64),
            Value::Int32(Some(v)) => Some(*v as i64),
            Value::Int64(Some(v)) => Some(*v),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(Some(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int64(Some(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float64(Some(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Varchar(Some(value.into()), 0)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Varchar(Some(value), 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_detection() {
        assert!(Value::Null.is_null());
        assert!(Value::Varchar(None, 40).is_null());
        assert!(!Value::Int64(Some(0)).is_null());
    }

    #[test]
    fn integer_widening() {
        assert_eq!(Value::Int8(Some(-3)).as_i64(), Some(-3));
        assert_eq!(Value::Int64(Some(1 << 40)).as_i64(), Some(1 << 40));
        assert_eq!(Value::Float64(Some(1.0)).as_i64(), None);
    }
}
