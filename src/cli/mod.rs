pub mod commands;
pub mod handlers;

use crate::error::Error;

// Re-export commonly used items
pub use commands::{DescriptorCommands, HashAlgorithmChoice};
pub use handlers::handle_descriptor_command;

pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const CLI_NAME: &str = "cdsig";

pub fn format_error(error: &Error) -> String {
    match error {
        Error::Normalization(msg) => format!("Normalization error: {msg}"),
        Error::UnsupportedAlgorithm(msg) => format!("Unsupported algorithm: {msg}"),
        Error::DigestionCallback { .. } => format!("Digestion error: {error}"),
        Error::DuplicateSignatureName(name) => format!("Signature name already in use: {name}"),
        Error::SignatureNotFound(name) => format!("Signature not found: {name}"),
        Error::DigestMismatch { .. } => format!("Digest mismatch: {error}"),
        Error::InvalidSignature(msg) => format!("Invalid signature: {msg}"),
        Error::Signing(msg) => format!("Signing error: {msg}"),
        Error::Validation(msg) => format!("Validation error: {msg}"),
        Error::InitializationError(msg) => format!("Initialization error: {msg}"),
        Error::Io(err) => format!("IO error: {err}"),
        Error::HexDecode(err) => format!("Hex decode error: {err}"),
        Error::Json(err) => format!("JSON error: {err}"),
        Error::Yaml(err) => format!("YAML error: {err}"),
    }
}
