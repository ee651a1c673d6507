//! # Hashers and the Hasher Registry
//!
//! Stateful hash computation behind the [`Hasher`] trait, plus a
//! name-keyed [`HasherRegistry`] so `DigestSpec.hashAlgorithm` strings
//! round-trip into concrete hashers.
//!
//! The registry is an explicit, constructed-once lookup table passed by
//! reference into the components that need it. It is read-only after
//! construction and safe for concurrent lookup.
//!
//! ## Examples
//!
//! ```
//! use cdsig::hash::{HasherRegistry, SHA256};
//!
//! let registry = HasherRegistry::builtin();
//! let mut hasher = registry.hasher_for_name(SHA256).unwrap();
//! hasher.write(b"Hello, World!");
//! let hex = hasher.finalize_hex();
//! assert_eq!(hex.len(), 64);
//! ```

use crate::error::{Error, Result};
use sha2::{Digest, Sha256, Sha384, Sha512};
use std::collections::BTreeMap;
use subtle::ConstantTimeEq;

/// Canonical algorithm name for SHA-256.
pub const SHA256: &str = "sha256";
/// Canonical algorithm name for SHA-384.
pub const SHA384: &str = "sha384";
/// Canonical algorithm name for SHA-512.
pub const SHA512: &str = "sha512";

/// A stateful hash computation.
///
/// `finalize_hex` consumes the accumulated input and resets the hasher, so
/// one hasher instance can digest several payloads in sequence.
pub trait Hasher: Send {
    /// Discard any accumulated input.
    fn reset(&mut self);
    /// Feed input bytes.
    fn write(&mut self, bytes: &[u8]);
    /// Produce the hex-encoded digest of the accumulated input and reset.
    fn finalize_hex(&mut self) -> String;
    /// The algorithm name recorded in a `DigestSpec.hashAlgorithm` field.
    fn algorithm_name(&self) -> &'static str;
}

macro_rules! sha2_hasher {
    ($wrapper:ident, $inner:ty, $name:expr) => {
        struct $wrapper($inner);

        impl Hasher for $wrapper {
            fn reset(&mut self) {
                self.0 = <$inner>::new();
            }

            fn write(&mut self, bytes: &[u8]) {
                self.0.update(bytes);
            }

            fn finalize_hex(&mut self) -> String {
                let digest = std::mem::replace(&mut self.0, <$inner>::new()).finalize();
                hex::encode(digest)
            }

            fn algorithm_name(&self) -> &'static str {
                $name
            }
        }
    };
}

sha2_hasher!(Sha256Hasher, Sha256, SHA256);
sha2_hasher!(Sha384Hasher, Sha384, SHA384);
sha2_hasher!(Sha512Hasher, Sha512, SHA512);

impl std::fmt::Debug for dyn Hasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hasher")
            .field("algorithm", &self.algorithm_name())
            .finish()
    }
}

type HasherConstructor = fn() -> Box<dyn Hasher>;

/// Name-keyed table of hash algorithm constructors.
pub struct HasherRegistry {
    constructors: BTreeMap<String, HasherConstructor>,
}

impl HasherRegistry {
    /// An empty registry with no algorithms.
    pub fn empty() -> Self {
        Self {
            constructors: BTreeMap::new(),
        }
    }

    /// A registry seeded with the SHA-2 family (sha256, sha384, sha512).
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(SHA256, || Box::new(Sha256Hasher(Sha256::new())));
        registry.register(SHA384, || Box::new(Sha384Hasher(Sha384::new())));
        registry.register(SHA512, || Box::new(Sha512Hasher(Sha512::new())));
        registry
    }

    /// Register a new algorithm name. Replaces any existing entry under
    /// the same name.
    pub fn register(&mut self, name: &str, constructor: HasherConstructor) {
        self.constructors.insert(name.to_string(), constructor);
    }

    /// Construct a fresh hasher for the given algorithm name.
    pub fn hasher_for_name(&self, name: &str) -> Result<Box<dyn Hasher>> {
        self.constructors
            .get(name)
            .map(|constructor| constructor())
            .ok_or_else(|| Error::UnsupportedAlgorithm(name.to_string()))
    }

    /// Registered algorithm names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.constructors.keys().map(String::as_str).collect()
    }
}

impl Default for HasherRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Compare two hex digest strings in constant time.
pub fn digests_equal(left: &str, right: &str) -> bool {
    if left.len() != right.len() {
        return false;
    }
    left.as_bytes().ct_eq(right.as_bytes()).into()
}
