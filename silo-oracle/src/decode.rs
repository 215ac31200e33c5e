use oracle::sql_type::OracleType;
use rust_decimal::Decimal;
use silo_core::{AdapterError, Result, Value};
use std::str::FromStr;

/// Scale Oracle reports for unconstrained NUMBER columns, where the stored
/// value floats freely instead of honoring a declared scale.
pub const UNBOUNDED_SCALE: i8 = -127;

/// Decode strategy selected for one result column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeKind {
    /// Exact integer, read through its textual representation.
    Integer,
    /// Integer or fixed-point decimal, split by probing for a fractional
    /// separator in the textual representation.
    IntegerOrDecimal,
    /// Fixed-point decimal through a string intermediate, never through
    /// native floating point.
    Decimal,
    /// Native floating point.
    Float,
    /// Unicode text (bounded character columns, CLOB handles read eagerly).
    Text,
    /// Raw bytes (RAW columns, BLOB handles read eagerly).
    Binary,
    /// DATE or TIMESTAMP.
    Temporal,
    Boolean,
}

/// Output-coercion rule applied to every result column of a session.
///
/// Oracle's NUMBER wire type cannot reliably distinguish integers from
/// fractional values, and decoding it as native floating point loses exact
/// decimal digits; this policy inspects the declared precision and scale
/// before row fetch and routes numeric columns through a string intermediate
/// instead. The policy is an explicit value configured on every session at
/// acquisition time and passed to the executor, not a hook registered on the
/// connection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodePolicy;

impl DecodePolicy {
    /// Strategy for a NUMBER column with the declared `precision` and
    /// `scale`.
    pub fn numeric(&self, precision: u8, scale: i8) -> DecodeKind {
        if scale == 0 {
            if precision > 0 {
                DecodeKind::Integer
            } else {
                DecodeKind::IntegerOrDecimal
            }
        } else if scale != UNBOUNDED_SCALE {
            DecodeKind::Decimal
        } else {
            DecodeKind::Float
        }
    }

    /// Strategy for an arbitrary result column type.
    pub fn plan(&self, column_type: &OracleType) -> DecodeKind {
        match column_type {
            OracleType::Number(precision, scale) => self.numeric(*precision, *scale),
            OracleType::Float(..) | OracleType::BinaryFloat | OracleType::BinaryDouble => {
                DecodeKind::Float
            }
            OracleType::Varchar2(..)
            | OracleType::NVarchar2(..)
            | OracleType::Char(..)
            | OracleType::NChar(..)
            | OracleType::CLOB
            | OracleType::NCLOB
            | OracleType::Long
            | OracleType::Rowid => DecodeKind::Text,
            OracleType::Raw(..) | OracleType::BLOB | OracleType::LongRaw => DecodeKind::Binary,
            OracleType::Date
            | OracleType::Timestamp(..)
            | OracleType::TimestampTZ(..)
            | OracleType::TimestampLTZ(..) => DecodeKind::Temporal,
            OracleType::Boolean => DecodeKind::Boolean,
            // Anything else converts through text, the client's most
            // forgiving representation.
            _ => DecodeKind::Text,
        }
    }

    /// Decode the textual representation of a scale-0 NUMBER with declared
    /// precision.
    pub fn decode_integer(&self, text: &str) -> Result<Value> {
        let text = normalize_separator(text);
        let value = text
            .parse::<i64>()
            .map_err(|_| AdapterError::type_mismatch("integer", &*text))?;
        Ok(Value::Int64(Some(value)))
    }

    /// Decode a scale-0 NUMBER without declared precision by probing for a
    /// fractional separator.
    pub fn decode_integer_or_decimal(&self, text: &str) -> Result<Value> {
        let text = normalize_separator(text);
        if text.contains('.') {
            decimal_from_str(&text)
        } else {
            self.decode_integer(&text)
        }
    }

    /// Decode a fixed-scale NUMBER through its textual digits.
    pub fn decode_decimal(&self, text: &str) -> Result<Value> {
        decimal_from_str(&normalize_separator(text))
    }
}

/// The client renders the decimal separator per territory; normalize the
/// comma form to a dot before parsing.
fn normalize_separator(text: &str) -> std::borrow::Cow<'_, str> {
    if text.contains(',') {
        text.replace(',', ".").into()
    } else {
        text.into()
    }
}

fn decimal_from_str(text: &str) -> Result<Value> {
    let value =
        Decimal::from_str(text).map_err(|_| AdapterError::type_mismatch("decimal", text))?;
    Ok(Value::Decimal(Some(value), 0, 0))
}
