use silo_core::{ColumnDef, RawQuery, SqlWriter, Value};
use std::{borrow::Cow, fmt::Write};

/// SQL writer for the Oracle dialect.
///
/// Extends the generic writer with Oracle column types, uppercase catalog
/// case folding, `:n` bind placeholders and the RETURNING clause that streams
/// a generated key back in the same round trip.
#[derive(Default, Debug, Clone, Copy)]
pub struct OracleSqlWriter;

/// Name of the output bind receiving a generated key.
pub const RETURNING_BIND: &str = "new_id";

impl SqlWriter for OracleSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }

    /// Unquoted identifiers land uppercase in the catalog; fold before
    /// quoting so rendered names match it.
    fn fold_case<'a>(&self, ident: &'a str) -> Cow<'a, str> {
        if ident.chars().any(|c| c.is_ascii_lowercase()) {
            ident.to_uppercase().into()
        } else {
            ident.into()
        }
    }

    fn write_placeholder(&self, out: &mut RawQuery, index: usize) {
        let _ = write!(out, ":{}", index);
    }

    fn write_column_type(&self, out: &mut RawQuery, value: &Value) {
        match value {
            Value::Boolean(..) => out.push_str("NUMBER(1)"),
            Value::Int8(..) | Value::Int16(..) | Value::Int32(..) | Value::Int64(..) => {
                out.push_str("NUMBER(38)")
            }
            Value::Float32(..) | Value::Float64(..) => out.push_str("NUMBER"),
            Value::Decimal(.., precision, scale) => {
                out.push_str("NUMBER");
                if (precision, scale) != (&0, &0) {
                    let _ = write!(out, "({},{})", precision, scale);
                }
            }
            Value::Varchar(.., 0) => out.push_str("CLOB"),
            Value::Varchar(.., length) => {
                let _ = write!(out, "VARCHAR2({} CHAR)", length);
            }
            Value::Blob(..) => out.push_str("BLOB"),
            Value::Date(..) => out.push_str("DATE"),
            Value::Timestamp(..) => out.push_str("TIMESTAMP(6)"),
            Value::Null => log::error!("Cannot render an Oracle column type for a plain null"),
        }
    }

    fn write_insert_returning(&self, out: &mut RawQuery, column: &ColumnDef) {
        out.push_str(" RETURNING ");
        self.write_identifier(out, column.name());
        let _ = write!(out, " INTO :{}", RETURNING_BIND);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use silo_core::{AutoKey, ColumnRef, PrimaryKeyType, TableDef};

    const WRITER: OracleSqlWriter = OracleSqlWriter;

    #[test]
    fn identifiers_fold_uppercase() {
        let mut sql = RawQuery::default();
        WRITER.write_identifier(&mut sql, "order_line");
        assert_eq!(sql.as_str(), "\"ORDER_LINE\"");
    }

    #[test]
    fn column_types() {
        let cases = [
            (Value::Boolean(None), "NUMBER(1)"),
            (Value::Int64(None), "NUMBER(38)"),
            (Value::Float64(None), "NUMBER"),
            (Value::Decimal(None, 12, 2), "NUMBER(12,2)"),
            (Value::Varchar(None, 100), "VARCHAR2(100 CHAR)"),
            (Value::Varchar(None, 0), "CLOB"),
            (Value::Blob(None), "BLOB"),
            (Value::Date(None), "DATE"),
            (Value::Timestamp(None), "TIMESTAMP(6)"),
        ];
        for (value, expected) in cases {
            let mut sql = RawQuery::default();
            WRITER.write_column_type(&mut sql, &value);
            assert_eq!(sql.as_str(), expected);
        }
    }

    #[test]
    fn insert_appends_returning_clause() {
        let table = TableDef::new(
            "person",
            "",
            vec![
                ColumnDef {
                    column_ref: ColumnRef {
                        name: "id".into(),
                        table: "person".into(),
                        ..Default::default()
                    },
                    value: Value::Int64(None),
                    primary_key: PrimaryKeyType::PrimaryKey,
                    auto_key: AutoKey::EmulatedSequence,
                    ..Default::default()
                },
                ColumnDef {
                    column_ref: ColumnRef {
                        name: "name".into(),
                        table: "person".into(),
                        ..Default::default()
                    },
                    value: Value::Varchar(None, 40),
                    nullable: true,
                    ..Default::default()
                },
            ],
        )
        .unwrap();
        let mut sql = RawQuery::default();
        WRITER.write_insert(&mut sql, &table, table.emulated_auto_key());
        assert_eq!(
            sql.as_str(),
            "INSERT INTO \"PERSON\" (\"NAME\")\nVALUES (:1) RETURNING \"ID\" INTO :new_id"
        );
    }
}
