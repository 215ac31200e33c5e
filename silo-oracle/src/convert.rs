use rust_decimal::{Decimal, prelude::ToPrimitive};
use silo_core::{AdapterError, Converter, Result, Value};
use time::{PrimitiveDateTime, Time};

/// Booleans are stored in a NUMBER(1) column; any nonzero value decodes to
/// true. Sentinel pairs like 'Y'/'N' are not recognized.
pub struct BoolConverter;

impl Converter for BoolConverter {
    fn to_backend(&self, value: &Value) -> Result<Value> {
        match value {
            Value::Boolean(Some(v)) => Ok(Value::Int8(Some(*v as i8))),
            _ if value.is_null() => Ok(Value::Null),
            other => Err(domain_error("boolean", other)),
        }
    }

    fn from_backend(&self, value: Value) -> Result<Value> {
        match value {
            _ if value.is_null() => Ok(Value::Boolean(None)),
            Value::Boolean(v) => Ok(Value::Boolean(v)),
            ref v if v.as_i64().is_some() => Ok(Value::Boolean(Some(v.as_i64() != Some(0)))),
            Value::Decimal(Some(v), ..) => Ok(Value::Boolean(Some(!v.is_zero()))),
            other => Err(mismatch_error("boolean", &other)),
        }
    }
}

/// Text columns; the backend conflates the empty string with null, so empty
/// input normalizes to null before validation. Unbounded text lives in CLOB
/// columns whose content the client materializes eagerly on fetch.
pub struct TextConverter {
    pub max_len: u32,
}

impl Converter for TextConverter {
    fn to_backend(&self, value: &Value) -> Result<Value> {
        match value {
            Value::Varchar(Some(v), ..) if v.is_empty() => Ok(Value::Null),
            Value::Varchar(Some(v), ..) => {
                if self.max_len > 0 && v.chars().count() > self.max_len as usize {
                    return Err(AdapterError::validation(format!(
                        "string of {} characters exceeds the declared maximum of {}",
                        v.chars().count(),
                        self.max_len
                    )));
                }
                Ok(Value::Varchar(Some(v.clone()), self.max_len))
            }
            _ if value.is_null() => Ok(Value::Null),
            other => Err(domain_error("text", other)),
        }
    }

    fn from_backend(&self, value: Value) -> Result<Value> {
        match value {
            _ if value.is_null() => Ok(Value::Varchar(None, self.max_len)),
            Value::Varchar(v, ..) => Ok(Value::Varchar(v, self.max_len)),
            other => Err(mismatch_error("text", &other)),
        }
    }
}

/// Integers are stored in NUMBER(38) and carried portably as `i64`.
pub struct IntConverter;

impl Converter for IntConverter {
    fn to_backend(&self, value: &Value) -> Result<Value> {
        match value.as_i64() {
            Some(v) => Ok(Value::Int64(Some(v))),
            None if value.is_null() && value.is_integer() || value == &Value::Null => {
                Ok(Value::Null)
            }
            None => Err(domain_error("integer", value)),
        }
    }

    fn from_backend(&self, value: Value) -> Result<Value> {
        match value {
            _ if value.is_null() && value.is_integer() || value == Value::Null => {
                Ok(Value::Int64(None))
            }
            ref v if v.as_i64().is_some() => Ok(Value::Int64(v.as_i64())),
            Value::Decimal(Some(v), ..) if v.fract().is_zero() => v
                .to_i64()
                .map(|v| Value::Int64(Some(v)))
                .ok_or_else(|| AdapterError::type_mismatch("integer", v.to_string())),
            other => Err(mismatch_error("integer", &other)),
        }
    }
}

/// Approximate reals are stored in unconstrained NUMBER columns; the backend
/// has no single/double distinction, so equality comparisons use a declared
/// tolerance instead.
pub struct RealConverter {
    pub tolerance: f64,
}

impl RealConverter {
    pub const DEFAULT_TOLERANCE: f64 = 1e-14;

    /// Equality within the declared tolerance.
    pub fn approx_eq(&self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.tolerance * a.abs().max(b.abs()).max(1.0)
    }
}

impl Default for RealConverter {
    fn default() -> Self {
        Self {
            tolerance: Self::DEFAULT_TOLERANCE,
        }
    }
}

impl Converter for RealConverter {
    fn to_backend(&self, value: &Value) -> Result<Value> {
        match value {
            Value::Float32(Some(v)) => Ok(Value::Float64(Some(*v as f64))),
            Value::Float64(Some(v)) => Ok(Value::Float64(Some(*v))),
            _ if value.is_null() => Ok(Value::Null),
            other => Err(domain_error("real", other)),
        }
    }

    fn from_backend(&self, value: Value) -> Result<Value> {
        match value {
            _ if value.is_null() => Ok(Value::Float64(None)),
            Value::Float32(Some(v)) => Ok(Value::Float64(Some(v as f64))),
            Value::Float64(v) => Ok(Value::Float64(v)),
            ref v if v.as_i64().is_some() => Ok(Value::Float64(v.as_i64().map(|v| v as f64))),
            Value::Decimal(Some(v), ..) => v
                .to_f64()
                .map(|v| Value::Float64(Some(v)))
                .ok_or_else(|| AdapterError::type_mismatch("real", v.to_string())),
            other => Err(mismatch_error("real", &other)),
        }
    }
}

/// Fixed-point decimals map to NUMBER(precision, scale) with no implicit
/// rounding: a value whose scale exceeds the declared one is rejected.
pub struct DecimalConverter {
    pub precision: u8,
    pub scale: u8,
}

impl Converter for DecimalConverter {
    fn to_backend(&self, value: &Value) -> Result<Value> {
        match value {
            Value::Decimal(Some(v), ..) => {
                if v.scale() > self.scale as u32 {
                    return Err(AdapterError::validation(format!(
                        "decimal {} does not fit scale {} without rounding",
                        v, self.scale
                    )));
                }
                if self.precision >= self.scale {
                    let limit = Decimal::from_i128_with_scale(
                        10i128.pow((self.precision - self.scale) as u32),
                        0,
                    );
                    if v.abs() >= limit {
                        return Err(AdapterError::validation(format!(
                            "decimal {} exceeds precision {}",
                            v, self.precision
                        )));
                    }
                }
                Ok(Value::Decimal(Some(*v), self.precision, self.scale))
            }
            _ if value.is_null() => Ok(Value::Null),
            other => Err(domain_error("decimal", other)),
        }
    }

    fn from_backend(&self, value: Value) -> Result<Value> {
        match value {
            _ if value.is_null() => Ok(Value::Decimal(None, self.precision, self.scale)),
            Value::Decimal(v, ..) => Ok(Value::Decimal(v, self.precision, self.scale)),
            ref v if v.as_i64().is_some() => Ok(Value::Decimal(
                v.as_i64().map(Decimal::from),
                self.precision,
                self.scale,
            )),
            other => Err(mismatch_error("decimal", &other)),
        }
    }
}

/// Binary data maps to BLOB; the client reads handles eagerly into memory.
pub struct BlobConverter;

impl Converter for BlobConverter {
    fn to_backend(&self, value: &Value) -> Result<Value> {
        match value {
            Value::Blob(Some(v)) => Ok(Value::Blob(Some(v.clone()))),
            _ if value.is_null() => Ok(Value::Null),
            other => Err(domain_error("blob", other)),
        }
    }

    fn from_backend(&self, value: Value) -> Result<Value> {
        match value {
            _ if value.is_null() => Ok(Value::Blob(None)),
            Value::Blob(v) => Ok(Value::Blob(v)),
            other => Err(mismatch_error("blob", &other)),
        }
    }
}

/// Pure dates are stored in DATE columns, which also carry a time component;
/// decoding truncates it.
pub struct DateConverter;

impl Converter for DateConverter {
    fn to_backend(&self, value: &Value) -> Result<Value> {
        match value {
            Value::Date(Some(v)) => Ok(Value::Date(Some(*v))),
            _ if value.is_null() => Ok(Value::Null),
            other => Err(domain_error("date", other)),
        }
    }

    fn from_backend(&self, value: Value) -> Result<Value> {
        match value {
            _ if value.is_null() => Ok(Value::Date(None)),
            Value::Date(v) => Ok(Value::Date(v)),
            Value::Timestamp(Some(v)) => Ok(Value::Date(Some(v.date()))),
            other => Err(mismatch_error("date", &other)),
        }
    }
}

/// Datetimes map to TIMESTAMP(6).
pub struct DatetimeConverter;

impl Converter for DatetimeConverter {
    fn to_backend(&self, value: &Value) -> Result<Value> {
        match value {
            Value::Timestamp(Some(v)) => Ok(Value::Timestamp(Some(*v))),
            _ if value.is_null() => Ok(Value::Null),
            other => Err(domain_error("datetime", other)),
        }
    }

    fn from_backend(&self, value: Value) -> Result<Value> {
        match value {
            _ if value.is_null() => Ok(Value::Timestamp(None)),
            Value::Timestamp(v) => Ok(Value::Timestamp(v)),
            Value::Date(Some(v)) => Ok(Value::Timestamp(Some(PrimitiveDateTime::new(
                v,
                Time::MIDNIGHT,
            )))),
            other => Err(mismatch_error("datetime", &other)),
        }
    }
}

/// Converter registry keyed on a column's value type witness.
pub fn converter_for(value: &Value) -> Result<Box<dyn Converter>> {
    Ok(match value {
        Value::Boolean(..) => Box::new(BoolConverter),
        Value::Varchar(.., max_len) => Box::new(TextConverter { max_len: *max_len }),
        Value::Int8(..) | Value::Int16(..) | Value::Int32(..) | Value::Int64(..) => {
            Box::new(IntConverter)
        }
        Value::Float32(..) | Value::Float64(..) => Box::new(RealConverter::default()),
        Value::Decimal(.., precision, scale) => Box::new(DecimalConverter {
            precision: *precision,
            scale: *scale,
        }),
        Value::Blob(..) => Box::new(BlobConverter),
        Value::Date(..) => Box::new(DateConverter),
        Value::Timestamp(..) => Box::new(DatetimeConverter),
        Value::Null => {
            return Err(AdapterError::validation(
                "a plain null has no converter; use a typed column witness",
            ));
        }
    })
}

fn domain_error(expected: &str, value: &Value) -> AdapterError {
    AdapterError::validation(format!(
        "{} converter cannot encode a {} value",
        expected,
        value.kind()
    ))
}

fn mismatch_error(expected: &str, value: &Value) -> AdapterError {
    AdapterError::type_mismatch(expected, value.kind())
}
