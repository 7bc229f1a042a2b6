//! Error types for the RSA homomorphic encryption library

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RsaError>;

#[derive(Error, Debug)]
pub enum RsaError {
    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Malformed plaintext on line {line}: {content:?}")]
    MalformedPlaintext { line: usize, content: String },

    #[error("Plaintext on line {line} is outside [1, 2^256]")]
    PlaintextOutOfRange { line: usize },

    #[error("Not enough plaintexts: found {found}, need at least {required}")]
    NotEnoughPlaintexts { found: usize, required: usize },

    #[error("Plaintext too large for modulus")]
    PlaintextTooLarge,

    #[error("Empty list provided for batch operation")]
    EmptyBatch,

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Failed to find a {bits}-bit prime after {attempts} candidates")]
    PrimeGenerationFailure { bits: u64, attempts: usize },

    #[error("Key generation failed: no coprime parameters after {attempts} attempts")]
    KeyGenerationFailure { attempts: usize },

    #[error("Failed to compute modular inverse")]
    ModularInverseError,

    #[error("Correctness check `{check}` failed: {detail}")]
    CorrectnessViolation { check: String, detail: String },

    #[error("IO error: {0}")]
    IOError(String),
}

impl From<std::io::Error> for RsaError {
    fn from(err: std::io::Error) -> Self {
        RsaError::IOError(err.to_string())
    }
}

impl RsaError {
    /// Whether the error stems from bad input rather than from the algebra.
    pub fn is_precondition_violation(&self) -> bool {
        matches!(
            self,
            RsaError::InputNotFound(_)
                | RsaError::MalformedPlaintext { .. }
                | RsaError::PlaintextOutOfRange { .. }
                | RsaError::NotEnoughPlaintexts { .. }
                | RsaError::PlaintextTooLarge
                | RsaError::EmptyBatch
                | RsaError::InvalidParameter(_)
                | RsaError::IOError(_)
        )
    }
}
