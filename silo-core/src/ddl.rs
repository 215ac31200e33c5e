use crate::{AdapterError, Executor, Result, TableDef};

/// What to do after a create statement failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DdlRecovery {
    /// Propagate the error.
    Fail,
    /// Treat this statement as a no-op and continue with the next one.
    SkipStatement,
    /// Stop emitting statements for this table, without raising.
    SkipTable,
}

/// Renders the creation statements for a table, including whatever companion
/// objects the backend needs to emulate generated keys.
pub trait DdlSynthesizer {
    /// Ordered creation statements for `table`. A table without an emulated
    /// auto key yields exactly one statement.
    fn synthesize(&self, table: &TableDef) -> Result<Vec<String>>;

    /// Recovery decision for the failed statement at `index`.
    fn recovery(&self, index: usize, error: &AdapterError) -> DdlRecovery {
        let _ = (index, error);
        DdlRecovery::Fail
    }
}

/// Run the creation statements for `table`, applying the synthesizer's
/// idempotent-creation policy.
///
/// An already-existing first statement is taken to mean the whole table was
/// deployed before, so its companion objects are assumed present and the
/// remaining statements are skipped. Creation is not transactional across
/// statements: a failure mid-way leaves the schema degraded but re-runnable.
pub fn deploy_table<E, D>(executor: &mut E, synthesizer: &D, table: &TableDef) -> Result<()>
where
    E: Executor + ?Sized,
    D: DdlSynthesizer + ?Sized,
{
    let statements = synthesizer.synthesize(table)?;
    for (index, sql) in statements.iter().enumerate() {
        log::debug!("Deploying table {}:\n{}", table.name(), sql);
        let Err(error) = executor.execute(sql, &[]) else {
            continue;
        };
        match synthesizer.recovery(index, &error) {
            DdlRecovery::Fail => return Err(error),
            DdlRecovery::SkipStatement => {
                log::debug!("Already exists: {}", error);
            }
            DdlRecovery::SkipTable => {
                if statements.len() > 1 {
                    log::info!(
                        "Table {} already exists, skipping its remaining DDL statements",
                        table.name()
                    );
                }
                return Ok(());
            }
        }
    }
    Ok(())
}
