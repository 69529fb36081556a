//! BCrypt salt parsing and hashing.
//!
//! A bcrypt salt string carries its own version and cost:
//! `$2a$10$` followed by 22 characters of bcrypt-base64 (16 bytes). A full
//! stored hash is also accepted; only its first 29 characters are read.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;

use crate::error::{AuthError, AuthResult};

/// Length of the encoded salt portion.
const SALT_CHARS: usize = 22;

/// Length of `$2a$NN$`.
const PREFIX_LEN: usize = 7;

pub(crate) const BCRYPT_B64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::BCRYPT,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::RequireNone),
);

/// Minor version letter of the `$2?$` prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BcryptVersion {
    TwoA,
    TwoB,
    TwoX,
    TwoY,
}

impl From<BcryptVersion> for bcrypt::Version {
    fn from(v: BcryptVersion) -> Self {
        match v {
            BcryptVersion::TwoA => bcrypt::Version::TwoA,
            BcryptVersion::TwoB => bcrypt::Version::TwoB,
            BcryptVersion::TwoX => bcrypt::Version::TwoX,
            BcryptVersion::TwoY => bcrypt::Version::TwoY,
        }
    }
}

/// Parsed components of a bcrypt salt string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BcryptSalt {
    pub version: BcryptVersion,
    pub cost: u32,
    pub salt: [u8; 16],
}

fn invalid(reason: &str) -> AuthError {
    AuthError::configuration(format!("invalid bcrypt salt: {}", reason))
}

impl BcryptSalt {
    pub(crate) fn parse(s: &str) -> AuthResult<Self> {
        let bytes = s.as_bytes();
        if bytes.len() < PREFIX_LEN + SALT_CHARS || !s.is_char_boundary(PREFIX_LEN + SALT_CHARS)
        {
            return Err(invalid("too short"));
        }
        if bytes[0] != b'$' || bytes[1] != b'2' || bytes[3] != b'$' || bytes[6] != b'$' {
            return Err(invalid("expected $2<minor>$<cost>$ prefix"));
        }

        let version = match bytes[2] {
            b'a' => BcryptVersion::TwoA,
            b'b' => BcryptVersion::TwoB,
            b'x' => BcryptVersion::TwoX,
            b'y' => BcryptVersion::TwoY,
            _ => return Err(invalid("unsupported version")),
        };

        if !bytes[4].is_ascii_digit() || !bytes[5].is_ascii_digit() {
            return Err(invalid("cost must be two digits"));
        }
        let cost = s[4..6]
            .parse::<u32>()
            .map_err(|_| invalid("cost is not a number"))?;

        let encoded = &s[PREFIX_LEN..PREFIX_LEN + SALT_CHARS];
        let decoded = BCRYPT_B64
            .decode(encoded)
            .map_err(|e| invalid(&e.to_string()))?;
        let salt: [u8; 16] = decoded
            .as_slice()
            .try_into()
            .map_err(|_| invalid("salt must decode to 16 bytes"))?;

        Ok(Self {
            version,
            cost,
            salt,
        })
    }

    /// Hash a password, returning the modular-crypt string.
    pub(crate) fn hash(&self, password: &str) -> AuthResult<String> {
        let parts = bcrypt::hash_with_salt(password, self.cost, self.salt)
            .map_err(|e| AuthError::configuration(format!("bcrypt failure: {}", e)))?;
        Ok(parts.format_for_version(self.version.into()))
    }
}
