//! Name-to-algorithm lookup table.
//!
//! Built once by probing every known digest and MAC primitive and keeping the
//! ones that instantiate. `BCRYPT` is always present. Names are matched
//! case-insensitively; the table never changes after construction.

use std::collections::HashMap;
use std::sync::LazyLock;

use super::algorithm::{DigestAlgorithm, MacAlgorithm};
use super::HashStrategy;

/// Registry name of the bcrypt strategy.
pub const BCRYPT: &str = "BCRYPT";

static GLOBAL: LazyLock<AlgorithmRegistry> = LazyLock::new(AlgorithmRegistry::probe);

/// Category of a registered algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlgorithmKind {
    /// Salted one-way digest.
    Digest(DigestAlgorithm),
    /// Keyed MAC using the salt as key.
    Mac(MacAlgorithm),
    /// BCrypt with an embedded-cost salt.
    BCrypt,
}

impl AlgorithmKind {
    /// Build a strategy for this algorithm with the default encoder.
    pub fn strategy(self) -> HashStrategy {
        match self {
            AlgorithmKind::Digest(alg) => HashStrategy::salted_hash(alg),
            AlgorithmKind::Mac(alg) => HashStrategy::hmac(alg),
            AlgorithmKind::BCrypt => HashStrategy::BCrypt,
        }
    }
}

/// Read-only map from algorithm name to strategy factory.
#[derive(Debug, Clone)]
pub struct AlgorithmRegistry {
    entries: HashMap<String, AlgorithmKind>,
}

impl AlgorithmRegistry {
    /// Build a registry from the primitives available in this build.
    pub fn probe() -> Self {
        let mut entries = HashMap::new();
        let mut skipped = 0usize;

        for alg in DigestAlgorithm::CANDIDATES {
            if !alg.probe() {
                skipped += 1;
                continue;
            }
            entries.insert(alg.name().to_string(), AlgorithmKind::Digest(alg));
            for alias in alg.aliases() {
                entries.insert(alias.to_string(), AlgorithmKind::Digest(alg));
            }
        }

        for alg in MacAlgorithm::CANDIDATES {
            if !alg.probe() {
                skipped += 1;
                continue;
            }
            entries.insert(alg.name().to_string(), AlgorithmKind::Mac(alg));
        }

        entries.insert(BCRYPT.to_string(), AlgorithmKind::BCrypt);

        tracing::info!(
            registered = entries.len(),
            skipped,
            "password algorithm registry built"
        );

        Self { entries }
    }

    /// The process-wide registry.
    pub fn global() -> &'static AlgorithmRegistry {
        &GLOBAL
    }

    /// Look up an algorithm by name, ignoring case.
    pub fn lookup(&self, name: &str) -> Option<AlgorithmKind> {
        self.entries.get(&name.to_ascii_uppercase()).copied()
    }

    /// Check if an algorithm name is registered.
    pub fn is_supported(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Create a strategy for the named algorithm, if supported.
    pub fn create(&self, name: &str) -> Option<HashStrategy> {
        self.lookup(name).map(AlgorithmKind::strategy)
    }

    /// All registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
