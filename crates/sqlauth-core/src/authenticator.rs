//! Username/password authentication against a SQL credential table.

use std::sync::Arc;

use crate::config::AuthOptions;
use crate::credentials::Credentials;
use crate::error::{AuthError, AuthResult};
use crate::executor::{QueryExecutor, Value};
use crate::principal::Principal;
use crate::strategy::{HashStrategy, PasswordStrategy};

/// Authenticates credentials and resolves roles and permissions with SQL.
///
/// Cloning is cheap; clones share the executor, options and strategy.
#[derive(Clone)]
pub struct SqlAuthenticator {
    executor: Arc<dyn QueryExecutor>,
    options: Arc<AuthOptions>,
    strategy: Arc<dyn PasswordStrategy>,
}

impl SqlAuthenticator {
    /// Create an authenticator with default queries and a SHA-256 salted-hash strategy.
    pub fn new(executor: Arc<dyn QueryExecutor>) -> Self {
        Self {
            executor,
            options: Arc::new(AuthOptions::default()),
            strategy: Arc::new(HashStrategy::default()),
        }
    }

    /// Create an authenticator from options, resolving the configured strategy.
    pub fn from_options(
        executor: Arc<dyn QueryExecutor>,
        options: AuthOptions,
    ) -> AuthResult<Self> {
        let strategy = options.password_strategy()?;
        Ok(Self {
            executor,
            options: Arc::new(options),
            strategy: Arc::new(strategy),
        })
    }

    /// Replace queries and role prefix. The password strategy is left as is.
    pub fn with_options(mut self, options: AuthOptions) -> Self {
        self.options = Arc::new(options);
        self
    }

    /// Set the authentication query.
    pub fn with_authentication_query(mut self, query: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.options).authentication_query = query.into();
        self
    }

    /// Set the roles query.
    pub fn with_roles_query(mut self, query: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.options).roles_query = query.into();
        self
    }

    /// Set the permissions query.
    pub fn with_permissions_query(mut self, query: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.options).permissions_query = query.into();
        self
    }

    /// Set the role prefix.
    pub fn with_role_prefix(mut self, prefix: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.options).role_prefix = prefix.into();
        self
    }

    /// Set the password strategy.
    pub fn with_password_strategy(mut self, strategy: impl PasswordStrategy + 'static) -> Self {
        self.strategy = Arc::new(strategy);
        self
    }

    /// Current options.
    pub fn options(&self) -> &AuthOptions {
        &self.options
    }

    /// Current password strategy.
    pub fn strategy(&self) -> &dyn PasswordStrategy {
        self.strategy.as_ref()
    }

    /// Verify a username/password pair.
    ///
    /// Unknown users and wrong passwords both yield
    /// [`AuthError::InvalidCredentials`]. More than one matching record yields
    /// [`AuthError::Integrity`].
    pub async fn authenticate(&self, credentials: &Credentials) -> AuthResult<Principal> {
        let (username, password) = credentials.validate()?;

        tracing::debug!(username, "running authentication query");
        let rs = self
            .executor
            .query(&self.options.authentication_query, &[Value::from(username)])
            .await?;

        match rs.num_rows() {
            0 => {
                tracing::debug!(username, "authentication failed");
                Err(AuthError::InvalidCredentials)
            }
            1 => {
                let row = &rs.rows()[0];
                let stored = self.strategy.password_from_row(row)?;
                let salt = self.strategy.salt_from_row(row)?;

                if self.strategy.verify(password, salt, stored)? {
                    tracing::debug!(username, "authentication succeeded");
                    Ok(Principal::new(
                        username,
                        self.clone(),
                        self.options.role_prefix.clone(),
                    ))
                } else {
                    tracing::debug!(username, "authentication failed");
                    Err(AuthError::InvalidCredentials)
                }
            }
            rows => {
                tracing::warn!(
                    username,
                    rows,
                    "authentication query matched more than one credential record"
                );
                Err(AuthError::Integrity)
            }
        }
    }

    /// Run a single-parameter query and collect the first column.
    pub(crate) async fn query_names(&self, sql: &str, username: &str) -> AuthResult<Vec<String>> {
        let rs = self.executor.query(sql, &[Value::from(username)]).await?;
        rs.first_column_strings()
            .map_err(|e| AuthError::MalformedRecord(e.to_string()))
    }
}

impl std::fmt::Debug for SqlAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqlAuthenticator")
            .field("options", &self.options)
            .field("strategy", &self.strategy)
            .finish_non_exhaustive()
    }
}
