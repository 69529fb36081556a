//! Authenticated identity with SQL-backed role and permission checks.

use crate::authenticator::SqlAuthenticator;
use crate::error::AuthResult;

/// An authenticated user.
///
/// Role and permission checks run their query on every call; nothing is cached.
#[derive(Debug, Clone)]
pub struct Principal {
    username: String,
    provider: SqlAuthenticator,
    role_prefix: String,
}

impl Principal {
    pub(crate) fn new(
        username: impl Into<String>,
        provider: SqlAuthenticator,
        role_prefix: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            provider,
            role_prefix: role_prefix.into(),
        }
    }

    /// The authenticated username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The prefix marking role capabilities.
    pub fn role_prefix(&self) -> &str {
        &self.role_prefix
    }

    /// Check a capability.
    ///
    /// A capability starting with the role prefix (`role:dev`) is checked
    /// against the user's roles with the prefix removed. Anything else is
    /// checked as a permission name.
    pub async fn is_authorized(&self, capability: &str) -> AuthResult<bool> {
        match capability.strip_prefix(self.role_prefix.as_str()) {
            Some(role) => self.has_role(role).await,
            None => self.has_permission(capability).await,
        }
    }

    /// Check whether the user holds a role.
    pub async fn has_role(&self, role: &str) -> AuthResult<bool> {
        let roles = self.roles().await?;
        Ok(roles.iter().any(|r| r == role))
    }

    /// Check whether any of the user's roles grants a permission.
    pub async fn has_permission(&self, permission: &str) -> AuthResult<bool> {
        let permissions = self.permissions().await?;
        Ok(permissions.iter().any(|p| p == permission))
    }

    /// All roles of the user.
    pub async fn roles(&self) -> AuthResult<Vec<String>> {
        tracing::debug!(username = %self.username, "running roles query");
        self.provider
            .query_names(&self.provider.options().roles_query, &self.username)
            .await
    }

    /// All permissions granted through the user's roles.
    pub async fn permissions(&self) -> AuthResult<Vec<String>> {
        tracing::debug!(username = %self.username, "running permissions query");
        self.provider
            .query_names(&self.provider.options().permissions_query, &self.username)
            .await
    }
}
