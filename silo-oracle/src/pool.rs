use crate::{config::OracleConfig, decode::DecodePolicy, session::OracleSession, value_wrap::wrap_error};
use oracle::Connection;
use silo_core::{Pool, Result, SessionFactory};

/// Opens dedicated Oracle connections for the bounded session pool.
#[derive(Debug)]
pub struct OracleFactory {
    config: OracleConfig,
    policy: DecodePolicy,
}

impl OracleFactory {
    pub fn new(config: OracleConfig) -> Self {
        Self {
            config,
            policy: DecodePolicy,
        }
    }
}

impl SessionFactory for OracleFactory {
    type Session = OracleSession;

    fn create(&self) -> Result<Self::Session> {
        log::info!(
            "opening session as {} to {}",
            self.config.user,
            self.config.target
        );
        let conn = Connection::connect(
            &self.config.user,
            &self.config.password,
            &self.config.target,
        )
        .map_err(wrap_error)?;
        Ok(OracleSession::new(conn, self.policy))
    }
}

/// Bounded pool of Oracle sessions.
pub type OraclePool = Pool<OracleFactory>;
