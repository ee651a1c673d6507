//! # Error Types
//!
//! Error taxonomy for descriptor normalization, digesting, signing, and
//! verification. Every failure surfaces as an explicit [`Error`] variant so
//! callers can match on the kind without parsing message strings.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The input contains a structure the normalization algorithm cannot
    /// canonicalize (unknown access kind, ambiguous element identity, or an
    /// unknown normalization algorithm name).
    #[error("Normalization error: {0}")]
    Normalization(String),

    /// An unknown hash or signature algorithm name was requested.
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// A caller-supplied digesting callback failed. Carries the identity of
    /// the element being digested so the failure can be located without
    /// re-running propagation.
    #[error("Digestion failed for {element} (name: {name}, version: {version}, extraIdentity: {extra_identity}): {source}")]
    DigestionCallback {
        element: &'static str,
        name: String,
        version: String,
        extra_identity: String,
        #[source]
        source: Box<Error>,
    },

    /// A signature with the requested name already exists on the descriptor.
    #[error("Signature name already in use: {0}")]
    DuplicateSignatureName(String),

    /// No signature with the requested name exists on the descriptor.
    #[error("Signature not found: {0}")]
    SignatureNotFound(String),

    /// The recomputed descriptor digest disagrees with the digest recorded
    /// in the signature; the descriptor changed since signing.
    #[error("Digest mismatch for signature {name}: descriptor digest {actual} does not match signed digest {expected}")]
    DigestMismatch {
        name: String,
        expected: String,
        actual: String,
    },

    /// The digests match but the cryptographic signature check failed.
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    #[error("Signing error: {0}")]
    Signing(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Initialization error: {0}")]
    InitializationError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Hex decode error: {0}")]
    HexDecode(#[from] hex::FromHexError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
