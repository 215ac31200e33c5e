use crate::{ColumnDef, PrimaryKeyType, TableDef, Value};
use std::{
    borrow::Cow,
    fmt::{self, Write},
};

/// SQL text under construction.
#[derive(Default, Debug)]
pub struct RawQuery {
    value: String,
}

impl RawQuery {
    pub fn new(value: String) -> Self {
        Self { value }
    }
    pub fn with_capacity(capacity: usize) -> Self {
        Self::new(String::with_capacity(capacity))
    }
    pub fn as_str(&self) -> &str {
        &self.value
    }
    pub fn push_str(&mut self, s: &str) {
        self.value.push_str(s);
    }
    pub fn push(&mut self, c: char) {
        self.value.push(c);
    }
    pub fn len(&self) -> usize {
        self.value.len()
    }
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl Write for RawQuery {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push_str(s);
        Ok(())
    }
    fn write_char(&mut self, c: char) -> fmt::Result {
        self.push(c);
        Ok(())
    }
}

impl From<RawQuery> for String {
    fn from(value: RawQuery) -> Self {
        value.value
    }
}

/// Push `value` escaping every occurrence of `quote` with `escaped`.
pub fn write_escaped(out: &mut RawQuery, value: &str, quote: char, escaped: &str) {
    for c in value.chars() {
        if c == quote {
            out.push_str(escaped);
        } else {
            out.push(c);
        }
    }
}

/// Write `it` items through `f`, separated by `separator`.
pub fn separated_by<I, F>(out: &mut RawQuery, it: I, mut f: F, separator: &str)
where
    I: IntoIterator,
    F: FnMut(&mut RawQuery, I::Item),
{
    let mut first = true;
    for item in it {
        if !first {
            out.push_str(separator);
        }
        first = false;
        f(out, item);
    }
}

/// SQL dialect renderer.
///
/// Default methods implement a generic ANSI-flavoured dialect; provider
/// adapters override only the points where their backend deviates.
pub trait SqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter;

    /// Case folding applied to identifiers before quoting, matching the
    /// backend's default catalog case.
    fn fold_case<'a>(&self, ident: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(ident)
    }

    fn write_identifier(&self, out: &mut RawQuery, value: &str) {
        out.push('"');
        write_escaped(out, &self.fold_case(value), '"', "\"\"");
        out.push('"');
    }

    fn write_table_name(&self, out: &mut RawQuery, table: &TableDef) {
        if !table.schema().is_empty() {
            self.write_identifier(out, table.schema());
            out.push('.');
        }
        self.write_identifier(out, table.name());
    }

    /// Bind placeholder for the 1-based parameter `index`.
    fn write_placeholder(&self, out: &mut RawQuery, index: usize) {
        let _ = index;
        out.push('?');
    }

    fn write_column_type(&self, out: &mut RawQuery, value: &Value) {
        match value {
            Value::Boolean(..) => out.push_str("BOOLEAN"),
            Value::Int8(..) => out.push_str("TINYINT"),
            Value::Int16(..) => out.push_str("SMALLINT"),
            Value::Int32(..) => out.push_str("INTEGER"),
            Value::Int64(..) => out.push_str("BIGINT"),
            Value::Float32(..) => out.push_str("FLOAT"),
            Value::Float64(..) => out.push_str("DOUBLE PRECISION"),
            Value::Decimal(.., precision, scale) => {
                out.push_str("DECIMAL");
                if (precision, scale) != (&0, &0) {
                    let _ = write!(out, "({},{})", precision, scale);
                }
            }
            Value::Varchar(.., 0) => out.push_str("TEXT"),
            Value::Varchar(.., length) => {
                let _ = write!(out, "VARCHAR({})", length);
            }
            Value::Blob(..) => out.push_str("BLOB"),
            Value::Date(..) => out.push_str("DATE"),
            Value::Timestamp(..) => out.push_str("TIMESTAMP"),
            Value::Null => log::error!("Cannot render a column type for a plain null"),
        }
    }

    /// Literal rendering, used for logging and debug SQL.
    fn write_value(&self, out: &mut RawQuery, value: &Value) {
        match value {
            _ if value.is_null() => self.write_value_none(out),
            Value::Boolean(Some(v)) => self.write_value_bool(out, *v),
            Value::Int8(Some(v)) => drop(write!(out, "{}", v)),
            Value::Int16(Some(v)) => drop(write!(out, "{}", v)),
            Value::Int32(Some(v)) => drop(write!(out, "{}", v)),
            Value::Int64(Some(v)) => drop(write!(out, "{}", v)),
            Value::Float32(Some(v)) => drop(write!(out, "{}", v)),
            Value::Float64(Some(v)) => drop(write!(out, "{}", v)),
            Value::Decimal(Some(v), ..) => drop(write!(out, "{}", v)),
            Value::Varchar(Some(v), ..) => self.write_value_string(out, v),
            Value::Blob(Some(v)) => self.write_value_blob(out, v),
            Value::Date(Some(v)) => self.write_value_date(out, v),
            Value::Timestamp(Some(v)) => self.write_value_timestamp(out, v),
            _ => unreachable!("null payloads are handled above"),
        }
    }

    fn write_value_none(&self, out: &mut RawQuery) {
        out.push_str("NULL");
    }

    fn write_value_bool(&self, out: &mut RawQuery, value: bool) {
        out.push_str(if value { "TRUE" } else { "FALSE" });
    }

    fn write_value_string(&self, out: &mut RawQuery, value: &str) {
        out.push('\'');
        write_escaped(out, value, '\'', "''");
        out.push('\'');
    }

    fn write_value_blob(&self, out: &mut RawQuery, value: &[u8]) {
        out.push_str("X'");
        for b in value {
            let _ = write!(out, "{:02X}", b);
        }
        out.push('\'');
    }

    fn write_value_date(&self, out: &mut RawQuery, value: &time::Date) {
        let _ = write!(
            out,
            "DATE '{:04}-{:02}-{:02}'",
            value.year(),
            u8::from(value.month()),
            value.day()
        );
    }

    fn write_value_timestamp(&self, out: &mut RawQuery, value: &time::PrimitiveDateTime) {
        let _ = write!(
            out,
            "TIMESTAMP '{:04}-{:02}-{:02} {:02}:{:02}:{:02}.{:06}'",
            value.year(),
            u8::from(value.month()),
            value.day(),
            value.hour(),
            value.minute(),
            value.second(),
            value.microsecond()
        );
    }

    fn write_create_table(&self, out: &mut RawQuery, table: &TableDef) {
        out.push_str("CREATE TABLE ");
        self.write_table_name(out, table);
        out.push_str(" (\n");
        separated_by(
            out,
            table.columns(),
            |out, column| {
                self.as_dyn().write_column_def(out, column);
            },
            ",\n",
        );
        let composite: Vec<_> = table
            .columns()
            .iter()
            .filter(|c| c.primary_key == PrimaryKeyType::PartOfPrimaryKey)
            .collect();
        if !composite.is_empty() {
            out.push_str(",\nPRIMARY KEY (");
            separated_by(
                out,
                composite,
                |out, column| self.as_dyn().write_identifier(out, column.name()),
                ", ",
            );
            out.push(')');
        }
        out.push_str("\n)");
    }

    fn write_column_def(&self, out: &mut RawQuery, column: &ColumnDef) {
        self.write_identifier(out, column.name());
        out.push(' ');
        self.write_column_type(out, &column.value);
        if !column.nullable {
            out.push_str(" NOT NULL");
        }
        if column.unique {
            out.push_str(" UNIQUE");
        }
        if column.primary_key == PrimaryKeyType::PrimaryKey {
            out.push_str(" PRIMARY KEY");
        }
    }

    /// INSERT with bind placeholders for every non-generated column and an
    /// optional generated-key capture clause.
    fn write_insert(&self, out: &mut RawQuery, table: &TableDef, returning: Option<&ColumnDef>) {
        out.push_str("INSERT INTO ");
        self.write_table_name(out, table);
        out.push_str(" (");
        separated_by(
            out,
            table.insert_columns(),
            |out, column| self.as_dyn().write_identifier(out, column.name()),
            ", ",
        );
        out.push_str(")\nVALUES (");
        let mut index = 0;
        separated_by(
            out,
            table.insert_columns(),
            |out, _| {
                index += 1;
                self.as_dyn().write_placeholder(out, index);
            },
            ", ",
        );
        out.push(')');
        if let Some(column) = returning {
            self.write_insert_returning(out, column);
        }
    }

    /// Generated-key capture clause. The generic dialect has none; backends
    /// with native auto-increment report the key through their client API.
    fn write_insert_returning(&self, out: &mut RawQuery, column: &ColumnDef) {
        let _ = (out, column);
    }
}

/// Writer for the generic dialect, using every default as-is.
#[derive(Default, Debug, Clone, Copy)]
pub struct GenericSqlWriter;

impl SqlWriter for GenericSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }
}
