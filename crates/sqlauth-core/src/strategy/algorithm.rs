//! Digest and MAC primitives known to the strategy layer.
//!
//! Each algorithm is identified by its canonical upper-case name. Whether a
//! primitive is actually usable depends on the cargo features the crate was
//! built with; [`DigestAlgorithm::probe`] and [`MacAlgorithm::probe`] report it.

use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha224, Sha256, Sha384, Sha512, Sha512_224, Sha512_256};

/// One-way hash functions usable for salted hashing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DigestAlgorithm {
    Md5,
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
    Sha512_224,
    Sha512_256,
    Sha3_224,
    Sha3_256,
    Sha3_384,
    Sha3_512,
}

impl DigestAlgorithm {
    /// Every digest this crate knows how to name.
    pub const CANDIDATES: [DigestAlgorithm; 12] = [
        DigestAlgorithm::Md5,
        DigestAlgorithm::Sha1,
        DigestAlgorithm::Sha224,
        DigestAlgorithm::Sha256,
        DigestAlgorithm::Sha384,
        DigestAlgorithm::Sha512,
        DigestAlgorithm::Sha512_224,
        DigestAlgorithm::Sha512_256,
        DigestAlgorithm::Sha3_224,
        DigestAlgorithm::Sha3_256,
        DigestAlgorithm::Sha3_384,
        DigestAlgorithm::Sha3_512,
    ];

    /// Canonical algorithm name.
    pub fn name(&self) -> &'static str {
        match self {
            DigestAlgorithm::Md5 => "MD5",
            DigestAlgorithm::Sha1 => "SHA-1",
            DigestAlgorithm::Sha224 => "SHA-224",
            DigestAlgorithm::Sha256 => "SHA-256",
            DigestAlgorithm::Sha384 => "SHA-384",
            DigestAlgorithm::Sha512 => "SHA-512",
            DigestAlgorithm::Sha512_224 => "SHA-512/224",
            DigestAlgorithm::Sha512_256 => "SHA-512/256",
            DigestAlgorithm::Sha3_224 => "SHA3-224",
            DigestAlgorithm::Sha3_256 => "SHA3-256",
            DigestAlgorithm::Sha3_384 => "SHA3-384",
            DigestAlgorithm::Sha3_512 => "SHA3-512",
        }
    }

    /// Alternative names accepted for the same algorithm.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            DigestAlgorithm::Sha1 => &["SHA", "SHA1"],
            _ => &[],
        }
    }

    /// Attempt to instantiate the primitive.
    pub fn probe(&self) -> bool {
        self.digest(None, b"").is_some()
    }

    /// Hash `salt || password`.
    ///
    /// Returns `None` if the primitive was not compiled in.
    pub fn digest(&self, salt: Option<&[u8]>, password: &[u8]) -> Option<Vec<u8>> {
        match self {
            #[cfg(feature = "legacy-digests")]
            DigestAlgorithm::Md5 => Some(salted_digest::<md5::Md5>(salt, password)),
            #[cfg(feature = "legacy-digests")]
            DigestAlgorithm::Sha1 => Some(salted_digest::<sha1::Sha1>(salt, password)),
            DigestAlgorithm::Sha224 => Some(salted_digest::<Sha224>(salt, password)),
            DigestAlgorithm::Sha256 => Some(salted_digest::<Sha256>(salt, password)),
            DigestAlgorithm::Sha384 => Some(salted_digest::<Sha384>(salt, password)),
            DigestAlgorithm::Sha512 => Some(salted_digest::<Sha512>(salt, password)),
            DigestAlgorithm::Sha512_224 => Some(salted_digest::<Sha512_224>(salt, password)),
            DigestAlgorithm::Sha512_256 => Some(salted_digest::<Sha512_256>(salt, password)),
            #[cfg(feature = "sha3")]
            DigestAlgorithm::Sha3_224 => Some(salted_digest::<sha3::Sha3_224>(salt, password)),
            #[cfg(feature = "sha3")]
            DigestAlgorithm::Sha3_256 => Some(salted_digest::<sha3::Sha3_256>(salt, password)),
            #[cfg(feature = "sha3")]
            DigestAlgorithm::Sha3_384 => Some(salted_digest::<sha3::Sha3_384>(salt, password)),
            #[cfg(feature = "sha3")]
            DigestAlgorithm::Sha3_512 => Some(salted_digest::<sha3::Sha3_512>(salt, password)),
            #[allow(unreachable_patterns)]
            _ => None,
        }
    }
}

impl std::fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Keyed hash functions; the salt is the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MacAlgorithm {
    HmacMd5,
    HmacSha1,
    HmacSha224,
    HmacSha256,
    HmacSha384,
    HmacSha512,
    HmacSha512_224,
    HmacSha512_256,
    HmacSha3_224,
    HmacSha3_256,
    HmacSha3_384,
    HmacSha3_512,
}

impl MacAlgorithm {
    /// Every MAC this crate knows how to name.
    pub const CANDIDATES: [MacAlgorithm; 12] = [
        MacAlgorithm::HmacMd5,
        MacAlgorithm::HmacSha1,
        MacAlgorithm::HmacSha224,
        MacAlgorithm::HmacSha256,
        MacAlgorithm::HmacSha384,
        MacAlgorithm::HmacSha512,
        MacAlgorithm::HmacSha512_224,
        MacAlgorithm::HmacSha512_256,
        MacAlgorithm::HmacSha3_224,
        MacAlgorithm::HmacSha3_256,
        MacAlgorithm::HmacSha3_384,
        MacAlgorithm::HmacSha3_512,
    ];

    /// Canonical algorithm name.
    pub fn name(&self) -> &'static str {
        match self {
            MacAlgorithm::HmacMd5 => "HMACMD5",
            MacAlgorithm::HmacSha1 => "HMACSHA1",
            MacAlgorithm::HmacSha224 => "HMACSHA224",
            MacAlgorithm::HmacSha256 => "HMACSHA256",
            MacAlgorithm::HmacSha384 => "HMACSHA384",
            MacAlgorithm::HmacSha512 => "HMACSHA512",
            MacAlgorithm::HmacSha512_224 => "HMACSHA512/224",
            MacAlgorithm::HmacSha512_256 => "HMACSHA512/256",
            MacAlgorithm::HmacSha3_224 => "HMACSHA3-224",
            MacAlgorithm::HmacSha3_256 => "HMACSHA3-256",
            MacAlgorithm::HmacSha3_384 => "HMACSHA3-384",
            MacAlgorithm::HmacSha3_512 => "HMACSHA3-512",
        }
    }

    /// Attempt to instantiate the primitive.
    pub fn probe(&self) -> bool {
        self.mac(b"probe", b"").is_some()
    }

    /// Compute the MAC of `password` keyed with `key`.
    ///
    /// Returns `None` if the primitive was not compiled in.
    pub fn mac(&self, key: &[u8], password: &[u8]) -> Option<Vec<u8>> {
        match self {
            #[cfg(feature = "legacy-digests")]
            MacAlgorithm::HmacMd5 => keyed::<Hmac<md5::Md5>>(key, password),
            #[cfg(feature = "legacy-digests")]
            MacAlgorithm::HmacSha1 => keyed::<Hmac<sha1::Sha1>>(key, password),
            MacAlgorithm::HmacSha224 => keyed::<Hmac<Sha224>>(key, password),
            MacAlgorithm::HmacSha256 => keyed::<Hmac<Sha256>>(key, password),
            MacAlgorithm::HmacSha384 => keyed::<Hmac<Sha384>>(key, password),
            MacAlgorithm::HmacSha512 => keyed::<Hmac<Sha512>>(key, password),
            MacAlgorithm::HmacSha512_224 => keyed::<Hmac<Sha512_224>>(key, password),
            MacAlgorithm::HmacSha512_256 => keyed::<Hmac<Sha512_256>>(key, password),
            #[cfg(feature = "sha3")]
            MacAlgorithm::HmacSha3_224 => keyed::<Hmac<sha3::Sha3_224>>(key, password),
            #[cfg(feature = "sha3")]
            MacAlgorithm::HmacSha3_256 => keyed::<Hmac<sha3::Sha3_256>>(key, password),
            #[cfg(feature = "sha3")]
            MacAlgorithm::HmacSha3_384 => keyed::<Hmac<sha3::Sha3_384>>(key, password),
            #[cfg(feature = "sha3")]
            MacAlgorithm::HmacSha3_512 => keyed::<Hmac<sha3::Sha3_512>>(key, password),
            #[allow(unreachable_patterns)]
            _ => None,
        }
    }
}

impl std::fmt::Display for MacAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

fn salted_digest<D: Digest>(salt: Option<&[u8]>, password: &[u8]) -> Vec<u8> {
    let mut hasher = D::new();
    if let Some(salt) = salt {
        Digest::update(&mut hasher, salt);
    }
    Digest::update(&mut hasher, password);
    hasher.finalize().to_vec()
}

// HMAC accepts keys of any length, so a key error means the primitive is unusable.
fn keyed<M: Mac + KeyInit>(key: &[u8], password: &[u8]) -> Option<Vec<u8>> {
    let mut mac = <M as KeyInit>::new_from_slice(key).ok()?;
    Mac::update(&mut mac, password);
    Some(mac.finalize().into_bytes().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_output_length() {
        let out = DigestAlgorithm::Sha256.digest(None, b"dummy").unwrap();
        assert_eq!(out.len(), 32);
        let out = DigestAlgorithm::Sha512.digest(Some(b"abcd"), b"dummy").unwrap();
        assert_eq!(out.len(), 64);
    }

    #[test]
    fn test_salt_is_prepended() {
        let salted = DigestAlgorithm::Sha256.digest(Some(b"ab"), b"cd").unwrap();
        let joined = DigestAlgorithm::Sha256.digest(None, b"abcd").unwrap();
        assert_eq!(salted, joined);
    }

    #[test]
    fn test_sha2_family_always_available() {
        for alg in [
            DigestAlgorithm::Sha224,
            DigestAlgorithm::Sha256,
            DigestAlgorithm::Sha384,
            DigestAlgorithm::Sha512,
            DigestAlgorithm::Sha512_224,
            DigestAlgorithm::Sha512_256,
        ] {
            assert!(alg.probe(), "{} should be available", alg);
        }
        assert!(MacAlgorithm::HmacSha256.probe());
        assert!(MacAlgorithm::HmacSha512.probe());
    }

    #[cfg(feature = "legacy-digests")]
    #[test]
    fn test_md5_known_answer() {
        let out = DigestAlgorithm::Md5.digest(None, b"").unwrap();
        assert_eq!(hex::encode(out), "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[test]
    fn test_mac_depends_on_key() {
        let a = MacAlgorithm::HmacSha256.mac(b"abcd", b"dummy").unwrap();
        let b = MacAlgorithm::HmacSha256.mac(b"abcde", b"dummy").unwrap();
        assert_eq!(a.len(), 32);
        assert_ne!(a, b);
    }

    #[test]
    fn test_names_are_upper_case() {
        for alg in DigestAlgorithm::CANDIDATES {
            assert_eq!(alg.name(), alg.name().to_ascii_uppercase());
        }
        for alg in MacAlgorithm::CANDIDATES {
            assert_eq!(alg.name(), alg.name().to_ascii_uppercase());
        }
    }
}
