use crate::{DdlSynthesizer, Executor, Pool, Result, SessionFactory, SqlWriter};
use std::fmt::Debug;

/// Backend connector and capability factory.
///
/// A provider adapter implements each capability interface once and this
/// trait composes them, replacing deep subclassing with explicit types.
pub trait Driver: Default + Debug {
    /// Adapter construction parameters.
    type Config;
    /// Session factory used by the pool.
    type Factory: SessionFactory<Session = Self::Session>;
    /// Leased backend session.
    type Session: Executor;
    /// SQL dialect writer.
    type SqlWriter: SqlWriter;
    /// DDL synthesizer.
    type Ddl: DdlSynthesizer;

    /// Human-readable backend name.
    const NAME: &'static str;

    /// Build a session pool from explicit construction parameters.
    ///
    /// Validation happens here; conflicting or incomplete credentials are a
    /// construction-time error, never detected lazily on first use.
    fn connect(&self, config: Self::Config) -> Result<Pool<Self::Factory>>;

    /// Create a SQL writer.
    ///
    /// Writers are expected to be cheap to construct as they are usually
    /// stateless.
    fn sql_writer(&self) -> Self::SqlWriter;

    /// Create the DDL synthesizer for this dialect.
    fn ddl(&self) -> Self::Ddl;
}
