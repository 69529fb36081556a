//! Random salt generation for provisioning credential records.

use base64::Engine as _;
use rand::rngs::OsRng;
use rand::RngCore;

use super::bcrypt_salt::BCRYPT_B64;
use crate::encoder::PasswordEncoder;

/// Number of random bytes in a generated salt.
pub const SALT_LEN: usize = 32;

/// Default bcrypt cost factor for generated salts.
pub const DEFAULT_BCRYPT_COST: u32 = 10;

/// Generate a random salt for salted-hash and HMAC strategies.
///
/// The salt is 32 random bytes, base64 encoded.
pub fn generate_salt() -> String {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    PasswordEncoder::Base64.encode(&salt)
}

/// Generate a `$2a$` bcrypt salt string with the given cost factor.
///
/// The cost is not range-checked here; an out-of-range cost is rejected
/// when the salt is used.
pub fn generate_bcrypt_salt(cost: u32) -> String {
    let mut salt = [0u8; 16];
    OsRng.fill_bytes(&mut salt);
    format!("$2a${:02}${}", cost, BCRYPT_B64.encode(salt))
}
