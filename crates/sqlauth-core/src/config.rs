//! Authenticator configuration.

use serde::{Deserialize, Serialize};

use crate::encoder::PasswordEncoder;
use crate::error::{AuthError, AuthResult};
use crate::strategy::HashStrategy;

/// Default query returning `(hash, salt)` for a username.
pub const DEFAULT_AUTHENTICATION_QUERY: &str =
    "SELECT PASSWORD, PASSWORD_SALT FROM USER WHERE USERNAME = ?";

/// Default query returning all roles of a username.
pub const DEFAULT_ROLES_QUERY: &str = "SELECT ROLE FROM USER_ROLES WHERE USERNAME = ?";

/// Default query returning all permissions granted through a username's roles.
pub const DEFAULT_PERMISSIONS_QUERY: &str =
    "SELECT PERM FROM ROLES_PERMS RP, USER_ROLES UR WHERE UR.USERNAME = ? AND UR.ROLE = RP.ROLE";

/// Default prefix marking a capability string as a role name.
pub const DEFAULT_ROLE_PREFIX: &str = "role:";

/// Default password algorithm.
pub const DEFAULT_PASSWORD_ALGORITHM: &str = "SHA-256";

/// Queries, role prefix and password strategy settings.
///
/// Every field has a default, so a partial JSON document is valid:
///
/// ```text
/// { "authenticationQuery": "SELECT PWD, PWD_SALT FROM USER2 WHERE USER_NAME = ?",
///   "passwordAlgorithm": "HMACSHA256", "passwordEncoder": "hex" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthOptions {
    /// Query returning `(hash, salt)` rows for the bound username.
    pub authentication_query: String,

    /// Query returning role names for the bound username.
    pub roles_query: String,

    /// Query returning permission names for the bound username.
    pub permissions_query: String,

    /// Prefix distinguishing role checks from permission checks.
    pub role_prefix: String,

    /// Registry name of the password algorithm.
    pub password_algorithm: String,

    /// Output encoder for digest and HMAC strategies.
    pub password_encoder: PasswordEncoder,
}

impl AuthOptions {
    /// Create options with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from JSON.
    pub fn from_json(json: &str) -> AuthResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| AuthError::configuration(format!("invalid auth options: {}", e)))
    }

    /// Set the authentication query.
    pub fn with_authentication_query(mut self, query: impl Into<String>) -> Self {
        self.authentication_query = query.into();
        self
    }

    /// Set the roles query.
    pub fn with_roles_query(mut self, query: impl Into<String>) -> Self {
        self.roles_query = query.into();
        self
    }

    /// Set the permissions query.
    pub fn with_permissions_query(mut self, query: impl Into<String>) -> Self {
        self.permissions_query = query.into();
        self
    }

    /// Set the role prefix.
    pub fn with_role_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.role_prefix = prefix.into();
        self
    }

    /// Set the password algorithm name.
    pub fn with_password_algorithm(mut self, algorithm: impl Into<String>) -> Self {
        self.password_algorithm = algorithm.into();
        self
    }

    /// Set the output encoder.
    pub fn with_password_encoder(mut self, encoder: PasswordEncoder) -> Self {
        self.password_encoder = encoder;
        self
    }

    /// Resolve the configured password strategy.
    pub fn password_strategy(&self) -> AuthResult<HashStrategy> {
        let strategy = HashStrategy::create(&self.password_algorithm).ok_or_else(|| {
            AuthError::configuration(format!(
                "unsupported password algorithm: {}",
                self.password_algorithm
            ))
        })?;

        // BCrypt has no encoder; skip the assignment so it does not warn.
        Ok(match strategy {
            HashStrategy::BCrypt => strategy,
            other => other.with_encoder(self.password_encoder),
        })
    }
}

impl Default for AuthOptions {
    fn default() -> Self {
        Self {
            authentication_query: DEFAULT_AUTHENTICATION_QUERY.to_string(),
            roles_query: DEFAULT_ROLES_QUERY.to_string(),
            permissions_query: DEFAULT_PERMISSIONS_QUERY.to_string(),
            role_prefix: DEFAULT_ROLE_PREFIX.to_string(),
            password_algorithm: DEFAULT_PASSWORD_ALGORITHM.to_string(),
            password_encoder: PasswordEncoder::default(),
        }
    }
}
