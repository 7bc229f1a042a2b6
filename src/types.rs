//! Core types and data structures

use num_bigint::BigUint;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Fixed public exponent (F4)
pub const DEFAULT_PUBLIC_EXPONENT: u32 = 65537;

/// Primes are drawn from `[2^bits, 2^(bits + 1))`
pub const DEFAULT_PRIME_BITS: u64 = 256;

/// Upper limit on `prime_bits`; larger primes are impractical to search for
pub const MAX_PRIME_BITS: u64 = 8192;

/// RSA ciphertext, an element of `[0, N)`
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ciphertext(pub(crate) BigUint);

impl Ciphertext {
    /// Wrap a raw residue as a ciphertext
    pub fn new(value: BigUint) -> Self {
        Ciphertext(value)
    }

    /// Get the underlying residue
    pub fn value(&self) -> &BigUint {
        &self.0
    }

    /// Get the size in bytes
    pub fn size_bytes(&self) -> usize {
        self.0.to_bytes_be().len()
    }
}

impl fmt::Display for Ciphertext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ciphertext({} bytes)", self.size_bytes())
    }
}

/// Configuration for key generation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsaConfig {
    /// Public exponent e
    pub public_exponent: u32,
    /// Lower bound exponent of the prime range `[2^bits, 2^(bits + 1))`
    pub prime_bits: u64,
    /// Number of Miller-Rabin rounds for primality testing
    pub primality_rounds: usize,
    /// How many prime pairs to draw before giving up on coprimality
    pub max_key_attempts: usize,
    /// How many candidates to test per prime before giving up
    pub max_prime_attempts: usize,
}

impl RsaConfig {
    /// Smaller primes for fast tests. Not for anything else.
    pub fn for_testing(prime_bits: u64) -> Self {
        RsaConfig {
            prime_bits,
            primality_rounds: 10,
            ..RsaConfig::default()
        }
    }
}

impl Default for RsaConfig {
    fn default() -> Self {
        RsaConfig {
            public_exponent: DEFAULT_PUBLIC_EXPONENT,
            prime_bits: DEFAULT_PRIME_BITS,
            primality_rounds: 20,
            max_key_attempts: 64,
            max_prime_attempts: 100_000,
        }
    }
}
