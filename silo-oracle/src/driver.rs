use crate::{OracleConfig, OracleDdl, OracleFactory, OracleSession, OracleSqlWriter};
use silo_core::{Driver, Pool, Result};

/// Oracle provider adapter.
#[derive(Default, Debug, Clone, Copy)]
pub struct OracleDriver;

impl Driver for OracleDriver {
    type Config = OracleConfig;
    type Factory = OracleFactory;
    type Session = OracleSession;
    type SqlWriter = OracleSqlWriter;
    type Ddl = OracleDdl;

    const NAME: &'static str = "oracle";

    fn connect(&self, config: Self::Config) -> Result<Pool<Self::Factory>> {
        let pool = config.pool.clone();
        Pool::new(OracleFactory::new(config), pool)
    }

    fn sql_writer(&self) -> Self::SqlWriter {
        OracleSqlWriter
    }

    fn ddl(&self) -> Self::Ddl {
        OracleDdl::default()
    }
}
