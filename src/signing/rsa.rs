//! Built-in RSA PKCS#1 v1.5 signer/verifier over PEM key files.
//!
//! Private key material is held in zeroizing buffers and cleared on drop.
//! Signature values travel base64-encoded inside the `Signature.value`
//! field; the recorded algorithm name is `RSASSA-PKCS1-V1_5`.

use crate::descriptor::Signature;
use crate::error::{Error, Result};
use crate::signing::{SignatureValue, Signer, Verifier, RSASSA_PKCS1_V1_5};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use openssl::hash::MessageDigest;
use openssl::pkey::{PKey, Private, Public};
use std::fs::read;
use std::path::Path;
use zeroize::{ZeroizeOnDrop, Zeroizing};

/// Secure wrapper for private key data that zeroizes on drop.
#[derive(ZeroizeOnDrop)]
pub struct SecurePrivateKey {
    #[zeroize(skip)]
    pkey: PKey<Private>,
    // Keep the original PEM bytes under zeroizing cover as well.
    _key_data: Zeroizing<Vec<u8>>,
}

impl SecurePrivateKey {
    /// Create a new SecurePrivateKey from raw PEM data.
    pub fn from_pem(pem_data: Vec<u8>) -> Result<Self> {
        let zeroizing_pem = Zeroizing::new(pem_data);

        let pkey = PKey::private_key_from_pem(&zeroizing_pem)
            .map_err(|e| Error::Signing(format!("Failed to load private key: {e}")))?;

        Ok(Self {
            pkey,
            _key_data: zeroizing_pem,
        })
    }

    pub fn as_pkey(&self) -> &PKey<Private> {
        &self.pkey
    }
}

/// Map a hex digest to the message digest openssl signs under. The digest
/// length identifies the SHA-2 family member that produced it.
fn message_digest_for(digest_hex: &str) -> Result<MessageDigest> {
    match digest_hex.len() {
        64 => Ok(MessageDigest::sha256()),
        96 => Ok(MessageDigest::sha384()),
        128 => Ok(MessageDigest::sha512()),
        len => Err(Error::UnsupportedAlgorithm(format!(
            "no known hash algorithm produces a {len}-character hex digest"
        ))),
    }
}

/// RSA signer over a PEM private key.
pub struct RsaSigner {
    key: SecurePrivateKey,
}

impl RsaSigner {
    pub fn from_pem(pem_data: Vec<u8>) -> Result<Self> {
        Ok(Self {
            key: SecurePrivateKey::from_pem(pem_data)?,
        })
    }

    /// Load the signing key from a PEM file.
    pub fn from_key_file(key_path: &Path) -> Result<Self> {
        let key_data = read(key_path)?;
        Self::from_pem(key_data)
    }
}

impl Signer for RsaSigner {
    fn sign(&self, digest_hex: &str) -> Result<SignatureValue> {
        let digest_bytes = hex::decode(digest_hex)?;
        let message_digest = message_digest_for(digest_hex)?;

        let mut signer = openssl::sign::Signer::new(message_digest, self.key.as_pkey())
            .map_err(|e| Error::Signing(format!("Failed to create signer: {e}")))?;
        signer
            .update(&digest_bytes)
            .map_err(|e| Error::Signing(format!("Failed to update signer: {e}")))?;

        let sig_len = signer
            .len()
            .map_err(|e| Error::Signing(format!("Failed to get signature length: {e}")))?;
        let mut signature = Zeroizing::new(vec![0u8; sig_len]);
        let len = signer
            .sign(&mut signature)
            .map_err(|e| Error::Signing(format!("Failed to sign digest: {e}")))?;

        Ok(SignatureValue {
            algorithm: RSASSA_PKCS1_V1_5.to_string(),
            value: STANDARD.encode(&signature[..len]),
        })
    }
}

/// RSA verifier over a PEM public key.
pub struct RsaVerifier {
    key: PKey<Public>,
}

impl RsaVerifier {
    pub fn from_pem(pem_data: &[u8]) -> Result<Self> {
        let key = PKey::public_key_from_pem(pem_data)
            .map_err(|e| Error::Signing(format!("Failed to load public key: {e}")))?;
        Ok(Self { key })
    }

    /// Load the verification key from a PEM file.
    pub fn from_key_file(key_path: &Path) -> Result<Self> {
        let key_data = read(key_path)?;
        Self::from_pem(&key_data)
    }
}

impl Verifier for RsaVerifier {
    fn verify(&self, digest_hex: &str, signature: &Signature) -> Result<()> {
        if signature.algorithm != RSASSA_PKCS1_V1_5 {
            return Err(Error::UnsupportedAlgorithm(format!(
                "signature algorithm {} (expected {RSASSA_PKCS1_V1_5})",
                signature.algorithm
            )));
        }

        let digest_bytes = hex::decode(digest_hex)?;
        let signature_bytes = STANDARD
            .decode(&signature.value)
            .map_err(|e| Error::InvalidSignature(format!("signature value is not base64: {e}")))?;
        let message_digest = message_digest_for(digest_hex)?;

        let mut verifier = openssl::sign::Verifier::new(message_digest, &self.key)
            .map_err(|e| Error::Signing(e.to_string()))?;
        verifier
            .update(&digest_bytes)
            .map_err(|e| Error::Signing(e.to_string()))?;

        match verifier.verify(&signature_bytes) {
            Ok(true) => Ok(()),
            Ok(false) => Err(Error::InvalidSignature(format!(
                "signature {} does not match digest {digest_hex}",
                signature.name
            ))),
            Err(e) => Err(Error::InvalidSignature(e.to_string())),
        }
    }
}
