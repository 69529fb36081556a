//! Output encoders for computed password hashes.

use base64::{engine::general_purpose::STANDARD as B64, Engine as _};
use serde::{Deserialize, Serialize};

/// Transforms raw digest bytes into their stored textual form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PasswordEncoder {
    /// Upper-case hexadecimal (`0-9A-F`), two characters per byte.
    Hex,
    /// Standard RFC 4648 base64 alphabet with padding.
    #[default]
    Base64,
}

impl PasswordEncoder {
    /// Encode bytes to text.
    pub fn encode(&self, data: &[u8]) -> String {
        match self {
            PasswordEncoder::Hex => hex::encode_upper(data),
            PasswordEncoder::Base64 => B64.encode(data),
        }
    }
}

impl std::fmt::Display for PasswordEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PasswordEncoder::Hex => write!(f, "hex"),
            PasswordEncoder::Base64 => write!(f, "base64"),
        }
    }
}

impl std::str::FromStr for PasswordEncoder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hex" => Ok(PasswordEncoder::Hex),
            "base64" => Ok(PasswordEncoder::Base64),
            other => Err(format!("unknown password encoder: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex() {
        assert_eq!(PasswordEncoder::Hex.encode(b"vertx"), "7665727478");
        assert_eq!(PasswordEncoder::Hex.encode(b"oink"), "6F696E6B");
        assert_eq!(PasswordEncoder::Hex.encode(&[0xab, 0x01]), "AB01");
    }

    #[test]
    fn test_base64() {
        assert_eq!(PasswordEncoder::Base64.encode(b"vertx"), "dmVydHg=");
        assert_eq!(PasswordEncoder::Base64.encode(b"oink"), "b2luaw==");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(PasswordEncoder::Hex.encode(&[]), "");
        assert_eq!(PasswordEncoder::Base64.encode(&[]), "");
    }

    #[test]
    fn test_parse() {
        assert_eq!("HEX".parse::<PasswordEncoder>().unwrap(), PasswordEncoder::Hex);
        assert_eq!(
            "base64".parse::<PasswordEncoder>().unwrap(),
            PasswordEncoder::Base64
        );
        assert!("base32".parse::<PasswordEncoder>().is_err());
        assert_eq!(PasswordEncoder::default(), PasswordEncoder::Base64);
    }
}
