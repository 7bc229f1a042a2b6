//! # RSA Homomorphic Encryption Library
//!
//! Textbook RSA over arbitrary-precision integers, used for its
//! multiplicative homomorphism:
//! `Dec(Enc(m1) * Enc(m2) mod N) = m1 * m2 mod N`.
//!
//! Textbook RSA has no padding and is malleable by construction. This crate
//! demonstrates the algebra; it is not a secure cryptosystem.
//!
//! ## Features
//!
//! - **Key generation** from an injected entropy source, with bounded retries
//! - **Square-and-multiply** exponentiation and extended-Euclid inverses
//! - **Homomorphic multiplication**, batch products, powers and scalars
//! - **Correctness harness** that reports each algebraic check independently
//!
//! ## Example
//!
//! ```rust
//! use num_bigint::BigUint;
//! use rsa_he::{HomomorphicOperations, KeyParameters, Rsa};
//!
//! // Generate keys
//! let key = KeyParameters::generate().unwrap();
//! let rsa = Rsa::new(key);
//!
//! // Encrypt values
//! let ct1 = rsa.encrypt(&BigUint::from(5u32));
//! let ct2 = rsa.encrypt(&BigUint::from(6u32));
//!
//! // Multiply under encryption
//! let product = rsa.homomorphic_multiply(&ct1, &ct2);
//!
//! // Decrypt result
//! assert_eq!(rsa.decrypt(&product), BigUint::from(30u32));
//! ```

pub mod dataset;
pub mod encryption;
pub mod error;
pub mod harness;
pub mod homomorphic;
pub mod keys;
pub mod types;
pub mod utils;

// Re-export main types for convenience
pub use dataset::{load_plaintexts, parse_plaintexts};
pub use encryption::Rsa;
pub use error::{Result, RsaError};
pub use harness::{CheckOutcome, CheckReport, CorrectnessHarness, HarnessReport};
pub use homomorphic::HomomorphicOperations;
pub use keys::{KeyGenerator, KeyParameters};
pub use types::{Ciphertext, RsaConfig};
pub use utils::{mod_exp, mod_inverse};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
