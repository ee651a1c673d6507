//! # Descriptor Signing and Verification
//!
//! Attaches named [`Signature`]s to a component descriptor and verifies
//! them. The asymmetric primitives are behind the [`Signer`] and
//! [`Verifier`] traits, so key formats and crypto backends stay pluggable;
//! [`rsa`] provides the built-in RSA PKCS#1 v1.5 pair.
//!
//! A signature attests to a specific `DigestSpec` (hash algorithm +
//! normalization algorithm + value). Verification replays exactly the
//! algorithms recorded at signing time, so a descriptor signed under an
//! older normalization version stays verifiable after defaults move on.
//!
//! Signing and verification never touch element digests; they operate on
//! an already-propagated descriptor.

use crate::descriptor::{ComponentDescriptor, Signature};
use crate::digest;
use crate::error::{Error, Result};
use crate::hash::{self, Hasher, HasherRegistry};
use log::debug;

pub mod rsa;

/// Algorithm name recorded by the built-in RSA signer.
pub const RSASSA_PKCS1_V1_5: &str = "RSASSA-PKCS1-V1_5";

/// A signature produced over a digest value, tagged with the signature
/// algorithm that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureValue {
    pub algorithm: String,
    pub value: String,
}

/// Opaque asymmetric signing primitive.
pub trait Signer {
    /// Sign the hex-encoded digest value, returning the signature value
    /// and the name of the algorithm that produced it.
    fn sign(&self, digest_hex: &str) -> Result<SignatureValue>;
}

/// Opaque asymmetric verification primitive.
pub trait Verifier {
    /// Check `signature` against the hex-encoded digest value it claims
    /// to sign. Cryptographic failure is an error, never a silent false.
    fn verify(&self, digest_hex: &str, signature: &Signature) -> Result<()>;
}

/// Compute the whole-descriptor digest and append a signature over it
/// under `signature_name`.
///
/// Fails with [`Error::DuplicateSignatureName`] if the name is taken and
/// propagates signer errors untouched. On failure the descriptor is left
/// unmodified.
pub fn sign_component_descriptor(
    cd: &mut ComponentDescriptor,
    signer: &dyn Signer,
    hasher: &mut dyn Hasher,
    signature_name: &str,
) -> Result<()> {
    if cd.signature(signature_name).is_some() {
        return Err(Error::DuplicateSignatureName(signature_name.to_string()));
    }

    let digest = digest::hash_for_component_descriptor(cd, hasher)?;
    debug!(
        "signing descriptor {} digest {} as {signature_name}",
        cd.component.name, digest.value
    );
    let signature = signer.sign(&digest.value)?;

    cd.signatures.push(Signature {
        name: signature_name.to_string(),
        digest,
        algorithm: signature.algorithm,
        value: signature.value,
    });
    Ok(())
}

/// Verify the named signature on a descriptor.
///
/// Recomputes the descriptor digest under the hash and normalization
/// algorithms recorded in the signature's `DigestSpec`, compares it
/// against the signed digest, then verifies the signature value
/// cryptographically. The descriptor is never mutated.
pub fn verify_signed_component_descriptor(
    cd: &ComponentDescriptor,
    verifier: &dyn Verifier,
    registry: &HasherRegistry,
    signature_name: &str,
) -> Result<()> {
    let signature = cd
        .signature(signature_name)
        .ok_or_else(|| Error::SignatureNotFound(signature_name.to_string()))?;

    let mut hasher = registry.hasher_for_name(&signature.digest.hash_algorithm)?;
    let recomputed = digest::digest_for_component_descriptor(
        cd,
        hasher.as_mut(),
        &signature.digest.normalisation_algorithm,
    )?;

    if !hash::digests_equal(&recomputed.value, &signature.digest.value) {
        return Err(Error::DigestMismatch {
            name: signature_name.to_string(),
            expected: signature.digest.value.clone(),
            actual: recomputed.value,
        });
    }

    verifier.verify(&recomputed.value, signature)
}
