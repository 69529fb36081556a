//! sqlauth core - password strategies and SQL-backed authentication.
//!
//! This crate verifies username/password credentials against rows returned by
//! a [`QueryExecutor`] and resolves roles and permissions for the resulting
//! [`Principal`]. Stored passwords are produced by a [`PasswordStrategy`]:
//! salted digests, HMAC or BCrypt, looked up by name in the
//! [`AlgorithmRegistry`].

pub mod authenticator;
pub mod config;
pub mod credentials;
pub mod encoder;
pub mod error;
pub mod executor;
pub mod principal;
pub mod strategy;

#[cfg(test)]
mod testing;

pub use authenticator::SqlAuthenticator;
pub use config::{
    AuthOptions, DEFAULT_AUTHENTICATION_QUERY, DEFAULT_PASSWORD_ALGORITHM,
    DEFAULT_PERMISSIONS_QUERY, DEFAULT_ROLES_QUERY, DEFAULT_ROLE_PREFIX,
};
pub use credentials::Credentials;
pub use encoder::PasswordEncoder;
pub use error::{AuthError, AuthResult};
pub use executor::{ColumnError, QueryError, QueryExecutor, ResultSet, Row, Value};
pub use principal::Principal;

// Strategy exports
pub use strategy::salt::{generate_bcrypt_salt, generate_salt, DEFAULT_BCRYPT_COST};
pub use strategy::{
    AlgorithmKind, AlgorithmRegistry, DigestAlgorithm, HashStrategy, MacAlgorithm,
    PasswordStrategy,
};
