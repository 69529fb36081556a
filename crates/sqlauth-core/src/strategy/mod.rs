//! Password strategies.
//!
//! A strategy turns a plaintext password and an optional salt into the value
//! stored in the credential table, and knows which row columns hold the stored
//! hash and salt.
//!
//! # Built-in strategies
//!
//! - **Salted hash**: `digest(salt || password)`, salt optional
//! - **HMAC**: `mac(key = salt, password)`, salt required
//! - **BCrypt**: salt required, must be a `$2?$NN$...` salt string
//!
//! Digest and HMAC output is passed through a [`PasswordEncoder`] (base64 by
//! default). BCrypt output is already textual and ignores the encoder.
//!
//! # Example
//!
//! ```ignore
//! use sqlauth_core::{HashStrategy, PasswordEncoder, PasswordStrategy};
//!
//! let strategy = HashStrategy::create_with_encoder("HMACSHA256", PasswordEncoder::Hex)
//!     .expect("HMACSHA256 is always available");
//! let stored = strategy.compute("secret", Some("per-user-salt"))?;
//! ```

pub mod algorithm;
mod bcrypt_salt;
pub mod registry;
pub mod salt;

pub use algorithm::{DigestAlgorithm, MacAlgorithm};
pub use registry::{AlgorithmKind, AlgorithmRegistry};

use crate::encoder::PasswordEncoder;
use crate::error::{AuthError, AuthResult};
use crate::executor::Row;
use bcrypt_salt::BcryptSalt;
use subtle::ConstantTimeEq;

/// Column holding the stored hash.
pub const PASSWORD_COLUMN: usize = 0;

/// Column holding the stored salt.
pub const SALT_COLUMN: usize = 1;

/// Computes comparable password hashes and reads them from credential rows.
///
/// Implementations hold no per-call state and may be shared across tasks.
pub trait PasswordStrategy: Send + Sync + std::fmt::Debug {
    /// Hash a plaintext password with an optional salt.
    fn compute(&self, password: &str, salt: Option<&str>) -> AuthResult<String>;

    /// Replace the output encoder.
    fn set_encoder(&mut self, encoder: PasswordEncoder);

    /// Read the stored hash from a credential row.
    fn password_from_row<'r>(&self, row: &'r Row) -> AuthResult<&'r str> {
        row.get_string(PASSWORD_COLUMN)
            .map_err(|e| AuthError::MalformedRecord(e.to_string()))?
            .ok_or_else(|| AuthError::MalformedRecord("stored password is null".to_string()))
    }

    /// Read the stored salt from a credential row.
    ///
    /// A missing salt column is treated as "no salt".
    fn salt_from_row<'r>(&self, row: &'r Row) -> AuthResult<Option<&'r str>> {
        if row.len() <= SALT_COLUMN {
            return Ok(None);
        }
        row.get_string(SALT_COLUMN)
            .map_err(|e| AuthError::MalformedRecord(e.to_string()))
    }

    /// Recompute the hash and compare it with the stored value.
    fn verify(&self, password: &str, salt: Option<&str>, stored: &str) -> AuthResult<bool> {
        let computed = self.compute(password, salt)?;
        Ok(constant_time_eq(computed.as_bytes(), stored.as_bytes()))
    }
}

/// The built-in strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashStrategy {
    /// Salted one-way digest.
    SaltedHash {
        algorithm: DigestAlgorithm,
        encoder: PasswordEncoder,
    },
    /// HMAC keyed with the salt.
    Hmac {
        algorithm: MacAlgorithm,
        encoder: PasswordEncoder,
    },
    /// BCrypt; the salt carries version and cost.
    BCrypt,
}

impl HashStrategy {
    /// Salted-hash strategy with the default encoder.
    pub fn salted_hash(algorithm: DigestAlgorithm) -> Self {
        HashStrategy::SaltedHash {
            algorithm,
            encoder: PasswordEncoder::default(),
        }
    }

    /// HMAC strategy with the default encoder.
    pub fn hmac(algorithm: MacAlgorithm) -> Self {
        HashStrategy::Hmac {
            algorithm,
            encoder: PasswordEncoder::default(),
        }
    }

    /// BCrypt strategy.
    pub fn bcrypt() -> Self {
        HashStrategy::BCrypt
    }

    /// Create a strategy by algorithm name using the global registry.
    ///
    /// Returns `None` for unknown or unavailable algorithms.
    pub fn create(algorithm: &str) -> Option<Self> {
        AlgorithmRegistry::global().create(algorithm)
    }

    /// Create a strategy by name and assign an output encoder.
    pub fn create_with_encoder(algorithm: &str, encoder: PasswordEncoder) -> Option<Self> {
        Self::create(algorithm).map(|s| s.with_encoder(encoder))
    }

    /// Builder form of [`PasswordStrategy::set_encoder`].
    pub fn with_encoder(mut self, encoder: PasswordEncoder) -> Self {
        self.set_encoder(encoder);
        self
    }

    /// Algorithm name.
    pub fn algorithm_name(&self) -> &'static str {
        match self {
            HashStrategy::SaltedHash { algorithm, .. } => algorithm.name(),
            HashStrategy::Hmac { algorithm, .. } => algorithm.name(),
            HashStrategy::BCrypt => registry::BCRYPT,
        }
    }

    /// The output encoder, if the strategy uses one.
    pub fn encoder(&self) -> Option<PasswordEncoder> {
        match self {
            HashStrategy::SaltedHash { encoder, .. } | HashStrategy::Hmac { encoder, .. } => {
                Some(*encoder)
            }
            HashStrategy::BCrypt => None,
        }
    }

    /// Whether `compute` fails without a salt.
    pub fn requires_salt(&self) -> bool {
        !matches!(self, HashStrategy::SaltedHash { .. })
    }
}

impl Default for HashStrategy {
    fn default() -> Self {
        HashStrategy::salted_hash(DigestAlgorithm::Sha256)
    }
}

impl PasswordStrategy for HashStrategy {
    fn compute(&self, password: &str, salt: Option<&str>) -> AuthResult<String> {
        match self {
            HashStrategy::SaltedHash { algorithm, encoder } => {
                let digest = algorithm
                    .digest(salt.map(str::as_bytes), password.as_bytes())
                    .ok_or_else(|| unavailable(algorithm.name()))?;
                Ok(encoder.encode(&digest))
            }
            HashStrategy::Hmac { algorithm, encoder } => {
                let key = salt.ok_or_else(|| AuthError::configuration("salt is required for HMAC"))?;
                let mac = algorithm
                    .mac(key.as_bytes(), password.as_bytes())
                    .ok_or_else(|| unavailable(algorithm.name()))?;
                Ok(encoder.encode(&mac))
            }
            HashStrategy::BCrypt => {
                let salt =
                    salt.ok_or_else(|| AuthError::configuration("salt is required for BCrypt"))?;
                BcryptSalt::parse(salt)?.hash(password)
            }
        }
    }

    fn set_encoder(&mut self, new_encoder: PasswordEncoder) {
        match self {
            HashStrategy::SaltedHash { encoder, .. } | HashStrategy::Hmac { encoder, .. } => {
                *encoder = new_encoder
            }
            HashStrategy::BCrypt => {
                tracing::warn!(
                    encoder = %new_encoder,
                    "defining an encoder has no effect on a BCrypt strategy"
                );
            }
        }
    }

    fn salt_from_row<'r>(&self, row: &'r Row) -> AuthResult<Option<&'r str>> {
        if self.requires_salt() && row.len() <= SALT_COLUMN {
            return Err(AuthError::MalformedRecord(format!(
                "{} requires a salt column but the row has {} columns",
                self.algorithm_name(),
                row.len()
            )));
        }
        if row.len() <= SALT_COLUMN {
            return Ok(None);
        }
        row.get_string(SALT_COLUMN)
            .map_err(|e| AuthError::MalformedRecord(e.to_string()))
    }
}

fn unavailable(name: &str) -> AuthError {
    AuthError::configuration(format!("algorithm {} is not available in this build", name))
}

/// Compare two byte strings in time independent of where they differ.
pub(crate) fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.ct_eq(b).into()
}
