use crate::{
    decode::{DecodeKind, DecodePolicy},
    sql_writer::RETURNING_BIND,
    value_wrap::{timestamp_from_backend, wrap_error, OracleParam},
};
use oracle::{
    sql_type::{OracleType, ToSql},
    Connection,
};
use silo_core::{AdapterError, Executor, Result, RowLabeled, RowNames, RowsAffected, Value};

/// One leased Oracle session.
///
/// Wraps a dedicated client connection together with the decode policy
/// applied to every result set it produces. All calls block until the server
/// responds.
pub struct OracleSession {
    conn: Connection,
    policy: DecodePolicy,
}

impl OracleSession {
    pub fn new(conn: Connection, policy: DecodePolicy) -> Self {
        Self { conn, policy }
    }

    /// The underlying client connection, for operations the portable
    /// interface does not cover.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn bind_params(params: &[Value]) -> Result<Vec<OracleParam>> {
        params.iter().map(OracleParam::from_value).collect()
    }

    fn decode_cell(&self, row: &oracle::Row, index: usize, kind: DecodeKind) -> Result<Value> {
        Ok(match kind {
            DecodeKind::Integer => match row.get::<usize, Option<String>>(index).map_err(wrap_error)? {
                Some(text) => self.policy.decode_integer(&text)?,
                None => Value::Int64(None),
            },
            DecodeKind::IntegerOrDecimal => {
                match row.get::<usize, Option<String>>(index).map_err(wrap_error)? {
                    Some(text) => self.policy.decode_integer_or_decimal(&text)?,
                    None => Value::Int64(None),
                }
            }
            DecodeKind::Decimal => {
                match row.get::<usize, Option<String>>(index).map_err(wrap_error)? {
                    Some(text) => self.policy.decode_decimal(&text)?,
                    None => Value::Decimal(None, 0, 0),
                }
            }
            DecodeKind::Float => {
                Value::Float64(row.get::<usize, Option<f64>>(index).map_err(wrap_error)?)
            }
            DecodeKind::Text => Value::Varchar(
                row.get::<usize, Option<String>>(index).map_err(wrap_error)?,
                0,
            ),
            DecodeKind::Binary => {
                Value::Blob(row.get::<usize, Option<Vec<u8>>>(index).map_err(wrap_error)?)
            }
            DecodeKind::Temporal => {
                let stamp = row
                    .get::<usize, Option<oracle::sql_type::Timestamp>>(index)
                    .map_err(wrap_error)?;
                Value::Timestamp(stamp.as_ref().map(timestamp_from_backend).transpose()?)
            }
            DecodeKind::Boolean => {
                Value::Boolean(row.get::<usize, Option<bool>>(index).map_err(wrap_error)?)
            }
        })
    }
}

/// Reject generated-key expectations the adapter cannot satisfy before any
/// network round trip happens.
fn ensure_integer_key(expected: &Value) -> Result<()> {
    if expected.is_integer() {
        Ok(())
    } else {
        Err(AdapterError::NotImplemented(format!(
            "generated keys of type {} (only integer keys are supported)",
            expected.kind()
        )))
    }
}

/// An empty batch has no first parameter set to derive bind types from and
/// is rejected before the statement is prepared.
fn ensure_nonempty_batch(param_sets: &[Box<[Value]>]) -> Result<()> {
    if param_sets.is_empty() {
        return Err(AdapterError::validation(
            "batch execution requires at least one parameter set",
        ));
    }
    Ok(())
}

/// Fit the returned key into the expected integer width.
fn coerce_key(expected: &Value, key: i64) -> Result<Value> {
    let overflow = |_| AdapterError::type_mismatch(expected.kind(), format!("key {}", key));
    Ok(match expected {
        Value::Int8(..) => Value::Int8(Some(i8::try_from(key).map_err(overflow)?)),
        Value::Int16(..) => Value::Int16(Some(i16::try_from(key).map_err(overflow)?)),
        Value::Int32(..) => Value::Int32(Some(i32::try_from(key).map_err(overflow)?)),
        _ => Value::Int64(Some(key)),
    })
}

impl Executor for OracleSession {
    fn execute(&mut self, sql: &str, params: &[Value]) -> Result<RowsAffected> {
        log::debug!("executing: {}", sql);
        if params.is_empty() {
            // DDL and other parameterless statements skip bind preparation.
            let stmt = self.conn.execute(sql, &[]).map_err(wrap_error)?;
            return Ok(RowsAffected {
                rows_affected: stmt.row_count().ok(),
            });
        }
        let params = Self::bind_params(params)?;
        let refs: Vec<&dyn ToSql> = params.iter().map(|p| p as &dyn ToSql).collect();
        let mut stmt = self.conn.statement(sql).build().map_err(wrap_error)?;
        stmt.execute(&refs).map_err(wrap_error)?;
        Ok(RowsAffected {
            rows_affected: stmt.row_count().ok(),
        })
    }

    fn execute_batch(&mut self, sql: &str, param_sets: &[Box<[Value]>]) -> Result<RowsAffected> {
        ensure_nonempty_batch(param_sets)?;
        log::debug!("executing batch of {}: {}", param_sets.len(), sql);
        // Bind types are fixed by the first appended set; the client rejects
        // later sets of a different shape.
        let mut batch = self
            .conn
            .batch(sql, param_sets.len())
            .with_row_counts()
            .build()
            .map_err(wrap_error)?;
        for set in param_sets {
            let params = Self::bind_params(set)?;
            let refs: Vec<&dyn ToSql> = params.iter().map(|p| p as &dyn ToSql).collect();
            batch.append_row(&refs).map_err(wrap_error)?;
        }
        batch.execute().map_err(wrap_error)?;
        let counts = batch.row_counts().map_err(wrap_error)?;
        Ok(RowsAffected {
            rows_affected: Some(counts.iter().sum()),
        })
    }

    fn execute_returning_key(
        &mut self,
        sql: &str,
        params: &[Value],
        expected: &Value,
    ) -> Result<Value> {
        ensure_integer_key(expected)?;
        log::debug!("executing with key capture: {}", sql);
        let params = Self::bind_params(params)?;
        let mut refs: Vec<&dyn ToSql> = params.iter().map(|p| p as &dyn ToSql).collect();
        // Binding an OracleType declares the trailing placeholder as an
        // out-bind receiving the generated key.
        let key_type = OracleType::Int64;
        refs.push(&key_type);
        let mut stmt = self.conn.statement(sql).build().map_err(wrap_error)?;
        stmt.execute(&refs).map_err(wrap_error)?;
        let keys: Vec<i64> = stmt.returned_values(RETURNING_BIND).map_err(wrap_error)?;
        match keys.first() {
            Some(key) => coerce_key(expected, *key),
            None => Err(AdapterError::type_mismatch(
                "one generated key",
                "no returned value",
            )),
        }
    }

    fn fetch(&mut self, sql: &str, params: &[Value]) -> Result<Vec<RowLabeled>> {
        log::debug!("fetching: {}", sql);
        let params = Self::bind_params(params)?;
        let refs: Vec<&dyn ToSql> = params.iter().map(|p| p as &dyn ToSql).collect();
        let mut stmt = self.conn.statement(sql).build().map_err(wrap_error)?;
        let rows = stmt.query(&refs).map_err(wrap_error)?;
        let (names, plans): (Vec<String>, Vec<DecodeKind>) = rows
            .column_info()
            .iter()
            .map(|info| (info.name().to_string(), self.policy.plan(info.oracle_type())))
            .unzip();
        let names: RowNames = names.into();
        let mut out = Vec::new();
        for row in rows {
            let row = row.map_err(wrap_error)?;
            let values = plans
                .iter()
                .enumerate()
                .map(|(index, kind)| self.decode_cell(&row, index, *kind))
                .collect::<Result<Box<[Value]>>>()?;
            out.push(RowLabeled::new(names.clone(), values));
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_integer_keys_are_supported() {
        assert!(ensure_integer_key(&Value::Int32(None)).is_ok());
        assert!(ensure_integer_key(&Value::Int64(None)).is_ok());
        let error = ensure_integer_key(&Value::Varchar(None, 40)).unwrap_err();
        assert!(matches!(error, AdapterError::NotImplemented(..)));
    }

    #[test]
    fn empty_batches_are_rejected() {
        let error = ensure_nonempty_batch(&[]).unwrap_err();
        assert!(matches!(error, AdapterError::Validation(..)));
        let single: [Box<[Value]>; 1] = [[Value::from("x")].into()];
        assert!(ensure_nonempty_batch(&single).is_ok());
    }

    #[test]
    fn keys_coerce_to_the_expected_width() {
        assert_eq!(
            coerce_key(&Value::Int32(None), 7).unwrap(),
            Value::Int32(Some(7))
        );
        assert_eq!(
            coerce_key(&Value::Int64(None), i64::MAX).unwrap(),
            Value::Int64(Some(i64::MAX))
        );
        let error = coerce_key(&Value::Int8(None), 1_000).unwrap_err();
        assert!(matches!(error, AdapterError::TypeMismatch { .. }));
    }
}
