use silo_core::{AdapterError, PoolOptions, Result};

/// Validated Oracle adapter construction parameters.
///
/// Built through [`OracleConfigBuilder`], which accepts either one combined
/// `user/password@target` credential string or the three fields separately
/// and rejects conflicting duplicates at construction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleConfig {
    pub user: String,
    pub password: String,
    /// Connect descriptor, TNS alias or `//host:port/service` easy-connect
    /// string, passed verbatim to the client library.
    pub target: String,
    pub pool: PoolOptions,
}

impl OracleConfig {
    pub fn builder() -> OracleConfigBuilder {
        OracleConfigBuilder::default()
    }

    /// Shorthand for a configuration built from one combined credential
    /// string and default pool bounds.
    pub fn from_credentials(combined: &str) -> Result<Self> {
        Self::builder().credentials(combined).build()
    }
}

#[derive(Default, Debug)]
pub struct OracleConfigBuilder {
    combined: Option<String>,
    user: Option<String>,
    password: Option<String>,
    target: Option<String>,
    pool: PoolOptions,
}

impl OracleConfigBuilder {
    /// Combined credential string of the form `user/password@target`.
    pub fn credentials(mut self, combined: impl Into<String>) -> Self {
        self.combined = Some(combined.into());
        self
    }

    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn pool(mut self, pool: PoolOptions) -> Self {
        self.pool = pool;
        self
    }

    pub fn build(self) -> Result<OracleConfig> {
        let (mut user, mut password, mut target) = match &self.combined {
            Some(combined) => {
                let (user, password, target) = parse_combined(combined)?;
                (Some(user), Some(password), Some(target))
            }
            None => (None, None, None),
        };
        merge("user", &mut user, self.user)?;
        merge("password", &mut password, self.password)?;
        merge("target", &mut target, self.target)?;
        let require = |field: Option<String>, name| {
            field.ok_or_else(|| {
                AdapterError::configuration(format!("missing credential field `{}`", name))
            })
        };
        Ok(OracleConfig {
            user: require(user, "user")?,
            password: require(password, "password")?,
            target: require(target, "target")?,
            pool: self.pool,
        })
    }
}

/// Split `user/password@target`, failing on any missing part.
fn parse_combined(combined: &str) -> Result<(String, String, String)> {
    let malformed = || {
        AdapterError::configuration(
            "incorrect connection string (must be in the form `user/password@target`)",
        )
    };
    let (user, tail) = combined.split_once('/').ok_or_else(malformed)?;
    let (password, target) = tail.split_once('@').ok_or_else(malformed)?;
    if user.is_empty() || password.is_empty() || target.is_empty() {
        return Err(malformed());
    }
    Ok((user.into(), password.into(), target.into()))
}

/// Fill `current` from `explicit`, failing when both are set and disagree.
fn merge(name: &str, current: &mut Option<String>, explicit: Option<String>) -> Result<()> {
    let Some(explicit) = explicit else {
        return Ok(());
    };
    match current {
        Some(value) if *value != explicit => Err(AdapterError::configuration(format!(
            "ambiguous value for `{}`",
            name
        ))),
        _ => {
            *current = Some(explicit);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combined_credential_string() {
        let config = OracleConfig::from_credentials("alice/secret@orcl").unwrap();
        assert_eq!(config.user, "alice");
        assert_eq!(config.password, "secret");
        assert_eq!(config.target, "orcl");
        assert_eq!(config.pool, PoolOptions::default());
    }

    #[test]
    fn password_may_contain_slashes() {
        let config = OracleConfig::from_credentials("app/p/w-d@//db:1521/XEPDB1").unwrap();
        assert_eq!(config.password, "p/w-d");
        assert_eq!(config.target, "//db:1521/XEPDB1");
    }

    #[test]
    fn separate_fields() {
        let config = OracleConfig::builder()
            .user("alice")
            .password("secret")
            .target("orcl")
            .build()
            .unwrap();
        assert_eq!(config.user, "alice");
    }

    #[test]
    fn conflicting_user_is_rejected() {
        let error = OracleConfig::builder()
            .credentials("alice/secret@orcl")
            .user("bob")
            .build()
            .unwrap_err();
        assert!(matches!(error, AdapterError::Configuration(..)));
    }

    #[test]
    fn matching_duplicate_is_accepted() {
        assert!(
            OracleConfig::builder()
                .credentials("alice/secret@orcl")
                .user("alice")
                .build()
                .is_ok()
        );
    }

    #[test]
    fn incomplete_credentials_are_rejected() {
        assert!(OracleConfig::from_credentials("alice@orcl").is_err());
        assert!(OracleConfig::from_credentials("alice/secret").is_err());
        assert!(
            OracleConfig::builder()
                .user("alice")
                .target("orcl")
                .build()
                .is_err()
        );
    }
}
