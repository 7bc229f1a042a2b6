//! Key generation and management

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::One;
use rand::{thread_rng, CryptoRng, RngCore};
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{Result, RsaError};
use crate::types::{RsaConfig, MAX_PRIME_BITS};
use crate::utils::{generate_prime_in_range, mod_exp, mod_inverse};

/// RSA key triple: modulus, public exponent and private exponent
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyParameters {
    pub(crate) n: BigUint, // p * q
    pub(crate) e: BigUint, // Public exponent
    pub(crate) d: BigUint, // e^-1 mod (p-1)(q-1)
}

impl KeyParameters {
    /// Generate fresh 256-bit-prime parameters from the thread-local CSPRNG
    ///
    /// # Example
    ///
    /// ```rust
    /// use rsa_he::KeyParameters;
    ///
    /// let key = KeyParameters::generate().expect("Failed to generate keys");
    /// assert!(key.bit_size() >= 513);
    /// ```
    pub fn generate() -> Result<Self> {
        KeyGenerator::new(thread_rng()).generate()
    }

    /// Create key parameters from existing components
    pub fn from_components(n: BigUint, e: BigUint, d: BigUint) -> Result<Self> {
        let key = KeyParameters { n, e, d };
        key.validate()?;
        Ok(key)
    }

    /// Derive key parameters from two known primes and a public exponent
    pub fn from_primes(p: &BigUint, q: &BigUint, e: BigUint) -> Result<Self> {
        if p == q {
            return Err(RsaError::InvalidParameter(
                "Primes p and q must be distinct".to_string(),
            ));
        }

        let phi = totient(p, q);
        let d = mod_inverse(&e, &phi).ok_or(RsaError::ModularInverseError)?;

        Self::from_components(p * q, e, d)
    }

    /// Get the modulus N
    pub fn modulus(&self) -> &BigUint {
        &self.n
    }

    /// Get the public exponent e
    pub fn public_exponent(&self) -> &BigUint {
        &self.e
    }

    /// Get the private exponent d
    pub fn private_exponent(&self) -> &BigUint {
        &self.d
    }

    /// Get the bit size of the modulus
    pub fn bit_size(&self) -> u64 {
        self.n.bits()
    }

    /// Validate the key parameters
    pub fn validate(&self) -> Result<()> {
        let one = BigUint::one();

        if self.n <= one {
            return Err(RsaError::InvalidParameter(
                "Modulus N must be > 1".to_string(),
            ));
        }

        if self.e <= one || self.e >= self.n {
            return Err(RsaError::InvalidParameter(
                "Public exponent e must be in range (1, N)".to_string(),
            ));
        }

        if self.d <= one || self.d >= self.n {
            return Err(RsaError::InvalidParameter(
                "Private exponent d must be in range (1, N)".to_string(),
            ));
        }

        // (2^e)^d must come back to 2; catches a d that does not invert e
        let probe = BigUint::from(2u32) % &self.n;
        if mod_exp(&mod_exp(&probe, &self.e, &self.n), &self.d, &self.n) != probe {
            return Err(RsaError::InvalidParameter(
                "Private exponent does not invert the public exponent".to_string(),
            ));
        }

        Ok(())
    }
}

impl fmt::Display for KeyParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyParameters({} bits, e = {}, d = ***)", self.bit_size(), self.e)
    }
}

fn totient(p: &BigUint, q: &BigUint) -> BigUint {
    (p - BigUint::one()) * (q - BigUint::one())
}

/// Draws prime pairs from an injected entropy source and derives RSA keys
pub struct KeyGenerator<R> {
    rng: R,
    config: RsaConfig,
}

impl<R: RngCore + CryptoRng> KeyGenerator<R> {
    /// Create a generator with the default 256-bit-prime configuration
    pub fn new(rng: R) -> Self {
        Self::with_config(rng, RsaConfig::default())
    }

    /// Create a generator with a custom configuration
    ///
    /// # Example
    ///
    /// ```rust
    /// use rand::rngs::StdRng;
    /// use rand::SeedableRng;
    /// use rsa_he::{KeyGenerator, RsaConfig};
    ///
    /// let mut generator = KeyGenerator::with_config(StdRng::seed_from_u64(1), RsaConfig::for_testing(64));
    /// let key = generator.generate().expect("Failed to generate keys");
    /// assert!(key.bit_size() >= 129);
    /// ```
    pub fn with_config(rng: R, config: RsaConfig) -> Self {
        KeyGenerator { rng, config }
    }

    /// Generate one key triple
    ///
    /// Both primes are redrawn whenever they collide or `e` shares a factor
    /// with `(p-1)(q-1)`; after `max_key_attempts` such draws the call fails.
    pub fn generate(&mut self) -> Result<KeyParameters> {
        let bits = self.config.prime_bits;
        if !(2..=MAX_PRIME_BITS).contains(&bits) {
            return Err(RsaError::InvalidParameter(format!(
                "prime bit length {} outside [2, {}]",
                bits, MAX_PRIME_BITS
            )));
        }

        let e = BigUint::from(self.config.public_exponent);
        let low = BigUint::one() << bits;
        let high = BigUint::one() << (bits + 1);

        for attempt in 1..=self.config.max_key_attempts {
            let p = self.draw_prime(&low, &high)?;
            let q = self.draw_prime(&low, &high)?;

            if p == q {
                warn!(attempt, "drew identical primes, retrying");
                continue;
            }

            let phi = totient(&p, &q);
            if !e.gcd(&phi).is_one() {
                debug!(attempt, "public exponent not coprime to phi, retrying");
                continue;
            }

            let d = mod_inverse(&e, &phi).ok_or(RsaError::ModularInverseError)?;
            let key = KeyParameters { n: &p * &q, e, d };

            info!(bits = key.bit_size(), attempt, "generated RSA key parameters");
            return Ok(key);
        }

        Err(RsaError::KeyGenerationFailure {
            attempts: self.config.max_key_attempts,
        })
    }

    fn draw_prime(&mut self, low: &BigUint, high: &BigUint) -> Result<BigUint> {
        generate_prime_in_range(
            low,
            high,
            self.config.primality_rounds,
            self.config.max_prime_attempts,
            &mut self.rng,
        )
    }
}
