use oracle::{
    sql_type::{OracleType, Timestamp as OraTimestamp, ToSql},
    Connection, SqlValue,
};
use silo_core::{AdapterError, Result, Value};
use time::{Date, Month, PrimitiveDateTime, Time};

/// ORA-00955: name is already used by an existing object.
pub const ORA_OBJECT_EXISTS: i32 = 955;

/// Bind-side representation of a [`Value`].
///
/// Every portable value collapses to one of five wire shapes before binding.
/// Temporal parameters declare `TIMESTAMP(6)` up front so the server receives
/// a timestamp bind instead of a string it would parse with session NLS
/// settings.
#[derive(Debug)]
pub enum OracleParam {
    Int(Option<i64>),
    Float(Option<f64>),
    Text(Option<String>),
    Bytes(Option<Vec<u8>>),
    Stamp(Option<OraTimestamp>),
}

impl OracleParam {
    pub fn from_value(value: &Value) -> Result<Self> {
        Ok(match value {
            Value::Null => Self::Text(None),
            Value::Boolean(v) => Self::Int(v.map(i64::from)),
            Value::Int8(v) => Self::Int(v.map(i64::from)),
            Value::Int16(v) => Self::Int(v.map(i64::from)),
            Value::Int32(v) => Self::Int(v.map(i64::from)),
            Value::Int64(v) => Self::Int(*v),
            Value::Float32(v) => Self::Float(v.map(f64::from)),
            Value::Float64(v) => Self::Float(*v),
            // Decimals travel as text so no binary float rounding occurs.
            Value::Decimal(v, ..) => Self::Text(v.map(|d| d.to_string())),
            Value::Varchar(v, ..) => Self::Text(v.clone()),
            Value::Blob(v) => Self::Bytes(v.clone()),
            Value::Date(v) => Self::Stamp(v.map(date_to_backend)),
            Value::Timestamp(v) => Self::Stamp(v.map(timestamp_to_backend)),
        })
    }
}

impl ToSql for OracleParam {
    fn oratype(&self, conn: &Connection) -> oracle::Result<OracleType> {
        match self {
            Self::Int(v) => v.oratype(conn),
            Self::Float(v) => v.oratype(conn),
            Self::Text(v) => v.oratype(conn),
            Self::Bytes(v) => v.oratype(conn),
            Self::Stamp(_) => Ok(OracleType::Timestamp(6)),
        }
    }

    fn to_sql(&self, val: &mut SqlValue) -> oracle::Result<()> {
        match self {
            Self::Int(v) => val.set(v),
            Self::Float(v) => val.set(v),
            Self::Text(v) => val.set(v),
            Self::Bytes(v) => val.set(v),
            Self::Stamp(v) => val.set(v),
        }
    }
}

pub fn date_to_backend(value: Date) -> OraTimestamp {
    OraTimestamp::new(
        value.year(),
        u8::from(value.month()) as u32,
        value.day() as u32,
        0,
        0,
        0,
        0,
    )
}

pub fn timestamp_to_backend(value: PrimitiveDateTime) -> OraTimestamp {
    OraTimestamp::new(
        value.year(),
        u8::from(value.month()) as u32,
        value.day() as u32,
        value.hour() as u32,
        value.minute() as u32,
        value.second() as u32,
        value.nanosecond(),
    )
}

pub fn timestamp_from_backend(value: &OraTimestamp) -> Result<PrimitiveDateTime> {
    let month = Month::try_from(value.month() as u8)
        .map_err(|e| AdapterError::type_mismatch("month in 1..=12", e.to_string()))?;
    let date = Date::from_calendar_date(value.year(), month, value.day() as u8)
        .map_err(|e| AdapterError::type_mismatch("calendar date", e.to_string()))?;
    let time = Time::from_hms_nano(
        value.hour() as u8,
        value.minute() as u8,
        value.second() as u8,
        value.nanosecond(),
    )
    .map_err(|e| AdapterError::type_mismatch("time of day", e.to_string()))?;
    Ok(PrimitiveDateTime::new(date, time))
}

/// Single normalization boundary for client library errors.
///
/// `ORA-00955` becomes [`AdapterError::SchemaConflict`] so idempotent DDL
/// deployment can recognize an object that already exists.
pub fn wrap_error(error: oracle::Error) -> AdapterError {
    match &error {
        oracle::Error::OciError(db) | oracle::Error::DpiError(db) => {
            if db.code() == ORA_OBJECT_EXISTS {
                AdapterError::SchemaConflict(db.message().to_string())
            } else {
                AdapterError::backend(db.code(), db.message())
            }
        }
        oracle::Error::NullValue => {
            AdapterError::type_mismatch("non-null column value", "NULL")
        }
        oracle::Error::InvalidTypeConversion(from, to) => {
            AdapterError::type_mismatch(to.clone(), from.clone())
        }
        other => AdapterError::backend(0, other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    #[test]
    fn portable_values_collapse_to_wire_shapes() {
        assert!(matches!(
            OracleParam::from_value(&Value::Boolean(Some(true))).unwrap(),
            OracleParam::Int(Some(1))
        ));
        assert!(matches!(
            OracleParam::from_value(&Value::Int16(Some(-7))).unwrap(),
            OracleParam::Int(Some(-7))
        ));
        let decimal = Value::Decimal("12.50".parse().map(Some).unwrap(), 4, 2);
        match OracleParam::from_value(&decimal).unwrap() {
            OracleParam::Text(Some(s)) => assert_eq!(s, "12.50"),
            other => panic!("unexpected shape {:?}", other),
        }
        assert!(matches!(
            OracleParam::from_value(&Value::Varchar(None, 40)).unwrap(),
            OracleParam::Text(None)
        ));
    }

    #[test]
    fn temporal_round_trip() {
        let stamp = timestamp_to_backend(datetime!(2024-02-29 13:05:00.250));
        assert_eq!(stamp.nanosecond(), 250_000_000);
        let back = timestamp_from_backend(&stamp).unwrap();
        assert_eq!(back, datetime!(2024-02-29 13:05:00.250));

        let midnight = date_to_backend(date!(2024 - 02 - 29));
        assert_eq!(
            timestamp_from_backend(&midnight).unwrap(),
            datetime!(2024-02-29 00:00:00)
        );
    }
}
