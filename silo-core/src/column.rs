use crate::{AdapterError, Result, Value};
use std::borrow::Cow;

/// Reference to a table column.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
    /// Column name.
    pub name: Cow<'static, str>,
    /// Table name.
    pub table: Cow<'static, str>,
    /// Schema name (may be empty).
    pub schema: Cow<'static, str>,
}

/// Indicates if and how a column participates in the primary key.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryKeyType {
    /// Single-column primary key.
    PrimaryKey,
    /// Member of a composite primary key.
    PartOfPrimaryKey,
    /// Not part of the primary key.
    #[default]
    None,
}

/// How the backend generates values for an auto key column.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum AutoKey {
    /// Plain column, no generation.
    #[default]
    None,
    /// The backend has a native auto-increment facility.
    BackendNative,
    /// Emulated with a sequence object and a before-insert trigger.
    EmulatedSequence,
}

/// Column specification.
#[derive(Default, Debug)]
pub struct ColumnDef {
    /// Column identity.
    pub column_ref: ColumnRef,
    /// `Value` describing column type and parameters.
    pub value: Value,
    /// Nullability flag.
    pub nullable: bool,
    /// Primary key participation.
    pub primary_key: PrimaryKeyType,
    /// Auto-generated key strategy.
    pub auto_key: AutoKey,
    /// Unique constraint (single column only).
    pub unique: bool,
    /// Optional human-readable comment.
    pub comment: &'static str,
}

impl ColumnDef {
    /// Column name (as declared in the table definition).
    pub fn name(&self) -> &str {
        &self.column_ref.name
    }
    /// Table name owning this column.
    pub fn table(&self) -> &str {
        &self.column_ref.table
    }
    /// Schema name owning this column (may be empty).
    pub fn schema(&self) -> &str {
        &self.column_ref.schema
    }
}

/// Table specification: an ordered list of columns owned by a schema.
///
/// Constructed once from entity metadata and immutable thereafter.
#[derive(Default, Debug)]
pub struct TableDef {
    name: Cow<'static, str>,
    schema: Cow<'static, str>,
    columns: Vec<ColumnDef>,
}

impl TableDef {
    /// Build a table definition, enforcing that at most one column uses the
    /// emulated-sequence auto key strategy.
    pub fn new(
        name: impl Into<Cow<'static, str>>,
        schema: impl Into<Cow<'static, str>>,
        columns: Vec<ColumnDef>,
    ) -> Result<Self> {
        let name = name.into();
        let emulated = columns
            .iter()
            .filter(|c| c.auto_key == AutoKey::EmulatedSequence)
            .count();
        if emulated > 1 {
            return Err(AdapterError::configuration(format!(
                "table {} declares {} emulated auto key columns, at most one is allowed",
                name, emulated
            )));
        }
        Ok(Self {
            name,
            schema: schema.into(),
            columns,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    /// The column populated by sequence-plus-trigger emulation, if any.
    pub fn emulated_auto_key(&self) -> Option<&ColumnDef> {
        self.columns
            .iter()
            .find(|c| c.auto_key == AutoKey::EmulatedSequence)
    }

    /// Columns that receive a bound value on insert (auto keys are skipped,
    /// their value comes from the backend).
    pub fn insert_columns(&self) -> impl Iterator<Item = &ColumnDef> + Clone {
        self.columns.iter().filter(|c| c.auto_key == AutoKey::None)
    }
}

impl<'a> From<&'a ColumnDef> for &'a ColumnRef {
    fn from(value: &'a ColumnDef) -> Self {
        &value.column_ref
    }
}
