//! # cdsig
//!
//! Integrity protection for component descriptors: structured metadata
//! documents describing a software component, its dependencies, and its
//! resources.
//!
//! The pipeline: a raw descriptor passes through digest propagation
//! (caller-supplied digesters fill in missing element digests), is
//! normalized to canonical bytes (signatures excluded), hashed through a
//! registered hasher, and signed; the resulting named signature is
//! attached to the descriptor. Verification recomputes the digest under
//! the algorithms recorded in the signature and checks the signature
//! cryptographically.
//!
//! ## Quick Start
//!
//! ```
//! use cdsig::descriptor::ComponentDescriptor;
//! use cdsig::digest::hash_for_component_descriptor;
//! use cdsig::hash::{HasherRegistry, SHA256};
//!
//! let cd = ComponentDescriptor::from_yaml(r#"
//! meta:
//!   schemaVersion: v2
//! component:
//!   name: example.org/demo
//!   version: v0.1.0
//!   componentReferences: []
//!   resources: []
//! "#).unwrap();
//!
//! let registry = HasherRegistry::builtin();
//! let mut hasher = registry.hasher_for_name(SHA256).unwrap();
//! let digest = hash_for_component_descriptor(&cd, hasher.as_mut()).unwrap();
//! assert_eq!(digest.hash_algorithm, "sha256");
//! ```
//!
//! Signing and verification live in [`signing`]; the built-in RSA
//! primitives in [`signing::rsa`].

#![doc(html_root_url = "https://docs.rs/cdsig/0.1.0")]

pub mod cli;
pub mod descriptor;
pub mod digest;
pub mod error;
pub mod hash;
pub mod normalisation;
pub mod signing;
#[cfg(test)]
mod tests;

// Re-export error types
pub use error::{Error, Result};

/// Initialize logging for the CLI
///
/// # Examples
///
/// ```
/// use cdsig::init_logging;
///
/// // Initialize with default settings
/// let result = init_logging();
/// // Note: This might fail if already initialized
/// assert!(result.is_ok() || result.is_err());
/// ```
pub fn init_logging() -> Result<()> {
    env_logger::try_init().map_err(|e| Error::InitializationError(e.to_string()))
}
