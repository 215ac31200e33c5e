use crate::{Result, Value};
use std::{iter, slice, sync::Arc};

/// Result of a modifying operation (INSERT/UPDATE/DELETE/DDL).
#[derive(Default, Clone, Copy, Debug)]
pub struct RowsAffected {
    /// Number of rows modified (if reported by the backend).
    pub rows_affected: Option<u64>,
}

impl Extend<RowsAffected> for RowsAffected {
    fn extend<T: IntoIterator<Item = RowsAffected>>(&mut self, iter: T) {
        for elem in iter {
            if self.rows_affected.is_some() || elem.rows_affected.is_some() {
                self.rows_affected = Some(
                    self.rows_affected.unwrap_or_default() + elem.rows_affected.unwrap_or_default(),
                );
            }
        }
    }
}

/// Shared column names.
pub type RowNames = Arc<[String]>;
/// Row values matching `RowNames`.
pub type Row = Box<[Value]>;

/// Row with column labels.
#[derive(Default, Clone, Debug)]
pub struct RowLabeled {
    /// Column names.
    pub labels: RowNames,
    /// Column values.
    pub values: Row,
}

impl RowLabeled {
    pub fn new(names: RowNames, values: Row) -> Self {
        Self {
            labels: names,
            values,
        }
    }
    /// Column labels.
    pub fn names(&self) -> &[String] {
        &self.labels
    }
    /// Row values.
    pub fn values(&self) -> &[Value] {
        &self.values
    }
    /// Get value by column name.
    pub fn get_column(&self, name: &str) -> Option<&Value> {
        self.labels
            .iter()
            .position(|v| v == name)
            .map(|i| &self.values()[i])
    }
    /// Column count.
    pub fn len(&self) -> usize {
        self.values.len()
    }
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<'s> IntoIterator for &'s RowLabeled {
    type Item = (&'s String, &'s Value);
    type IntoIter = iter::Zip<slice::Iter<'s, String>, slice::Iter<'s, Value>>;
    fn into_iter(self) -> Self::IntoIter {
        iter::zip(self.labels.iter(), self.values.iter())
    }
}

/// Blocking statement executor bound to one leased backend session.
///
/// Every call blocks the calling thread until the backend responds; no call
/// is cancellable once sent. A session is never shared across threads, the
/// pool only bounds the total session count.
pub trait Executor: Send {
    /// Run a statement with ordered parameters, binding per-parameter type
    /// hints before sending.
    fn execute(&mut self, sql: &str, params: &[Value]) -> Result<RowsAffected>;

    /// Run a statement once per parameter set. Bind type hints are computed
    /// from the first set and applied to the whole batch, which is assumed to
    /// be homogeneous; an empty batch is a validation error.
    fn execute_batch(&mut self, sql: &str, param_sets: &[Box<[Value]>]) -> Result<RowsAffected>;

    /// Run an INSERT carrying a generated-key capture clause and return the
    /// key coerced to the `expected` integer type. Non-integer expectations
    /// fail with a not-implemented fault before contacting the backend.
    fn execute_returning_key(
        &mut self,
        sql: &str,
        params: &[Value],
        expected: &Value,
    ) -> Result<Value>;

    /// Run a query and decode every result column through the session's
    /// decode policy.
    fn fetch(&mut self, sql: &str, params: &[Value]) -> Result<Vec<RowLabeled>>;
}
