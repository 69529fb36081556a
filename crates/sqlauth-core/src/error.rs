//! Error types for authentication and authorization.
//!
//! Failures fall into a small taxonomy:
//! - Validation errors (missing username/password, no I/O performed)
//! - Credential failures (unknown user or wrong password, reported identically)
//! - Integrity failures (more than one credential record for a username)
//! - Configuration errors (e.g. a salt-requiring algorithm invoked without a salt)
//! - Malformed credential records (missing or mistyped columns)
//! - Query errors from the executor, propagated verbatim

use thiserror::Error;

use crate::executor::QueryError;

/// Authentication and authorization errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The supplied credentials are incomplete.
    #[error("{0}")]
    Validation(String),

    /// Unknown username or password mismatch.
    ///
    /// Both causes share this variant so callers cannot tell them apart.
    #[error("Invalid username/password")]
    InvalidCredentials,

    /// More than one credential record matched a single username.
    #[error("Failure in authentication")]
    Integrity,

    /// The password strategy cannot run with the given inputs or settings.
    #[error("{0}")]
    Configuration(String),

    /// A credential row does not have the shape the strategy expects.
    #[error("malformed credential record: {0}")]
    MalformedRecord(String),

    /// The query executor failed.
    #[error(transparent)]
    Query(#[from] QueryError),
}

impl AuthError {
    /// Create a configuration error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        AuthError::Configuration(msg.into())
    }

    /// Returns `true` for the uniform "Invalid username/password" outcome.
    #[inline]
    pub fn is_credential_failure(&self) -> bool {
        matches!(self, AuthError::InvalidCredentials)
    }

    /// Returns `true` if the input was rejected before any query ran.
    #[inline]
    pub fn is_validation(&self) -> bool {
        matches!(self, AuthError::Validation(_))
    }

    /// Returns `true` if the credential store holds ambiguous data.
    #[inline]
    pub fn is_integrity(&self) -> bool {
        matches!(self, AuthError::Integrity)
    }

    /// Returns `true` for strategy configuration problems.
    #[inline]
    pub fn is_configuration(&self) -> bool {
        matches!(self, AuthError::Configuration(_))
    }

    /// Returns `true` if the executor reported the failure.
    #[inline]
    pub fn is_query(&self) -> bool {
        matches!(self, AuthError::Query(_))
    }
}

/// Result type for authentication operations.
pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_failure_text() {
        assert_eq!(
            AuthError::InvalidCredentials.to_string(),
            "Invalid username/password"
        );
        assert_eq!(AuthError::Integrity.to_string(), "Failure in authentication");
        assert_ne!(
            AuthError::InvalidCredentials.to_string(),
            AuthError::Integrity.to_string()
        );
    }

    #[test]
    fn test_query_error_is_verbatim() {
        let err: AuthError = QueryError::Execution("no such table: USER".into()).into();
        assert!(err.is_query());
        assert_eq!(
            err.to_string(),
            QueryError::Execution("no such table: USER".into()).to_string()
        );
    }

    #[test]
    fn test_predicates() {
        assert!(AuthError::configuration("salt is required for HMAC").is_configuration());
        assert!(AuthError::Validation("missing".into()).is_validation());
        assert!(AuthError::Integrity.is_integrity());
        assert!(!AuthError::Integrity.is_credential_failure());
    }
}
