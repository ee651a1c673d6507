use clap::Subcommand;
use std::path::PathBuf;

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum HashAlgorithmChoice {
    Sha256,
    Sha384,
    Sha512,
}

impl HashAlgorithmChoice {
    pub fn algorithm_name(&self) -> &'static str {
        match self {
            HashAlgorithmChoice::Sha256 => crate::hash::SHA256,
            HashAlgorithmChoice::Sha384 => crate::hash::SHA384,
            HashAlgorithmChoice::Sha512 => crate::hash::SHA512,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum DescriptorCommands {
    /// Compute and print the whole-descriptor digest
    Digest {
        /// Path to the component descriptor (YAML)
        #[arg(long = "descriptor")]
        descriptor: PathBuf,

        /// Hash algorithm for the descriptor digest
        #[arg(long = "hash-alg", value_enum, default_value = "sha256")]
        hash_alg: HashAlgorithmChoice,
    },
    /// Sign a component descriptor and attach the named signature
    Sign {
        /// Path to the component descriptor (YAML)
        #[arg(long = "descriptor")]
        descriptor: PathBuf,

        /// Path to the RSA private key (PEM format)
        #[arg(long = "key")]
        key: PathBuf,

        /// Name under which the signature is attached
        #[arg(long = "signature-name")]
        signature_name: String,

        /// Hash algorithm for the descriptor digest
        #[arg(long = "hash-alg", value_enum, default_value = "sha256")]
        hash_alg: HashAlgorithmChoice,

        /// Write the signed descriptor here instead of stdout
        #[arg(long = "output")]
        output: Option<PathBuf>,
    },
    /// Verify a named signature on a component descriptor
    Verify {
        /// Path to the component descriptor (YAML)
        #[arg(long = "descriptor")]
        descriptor: PathBuf,

        /// Path to the RSA public key (PEM format)
        #[arg(long = "public-key")]
        public_key: PathBuf,

        /// Name of the signature to verify
        #[arg(long = "signature-name")]
        signature_name: String,
    },
}
