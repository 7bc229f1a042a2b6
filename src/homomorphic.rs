//! Homomorphic operations on ciphertexts

use num_bigint::BigUint;

use crate::encryption::Rsa;
use crate::error::{Result, RsaError};
use crate::types::Ciphertext;
use crate::utils::mod_exp;

/// Trait for homomorphic operations
///
/// Textbook RSA only supports multiplication; there is no homomorphic addition.
pub trait HomomorphicOperations {
    /// Multiply two ciphertexts: decrypts to `m1 * m2 mod N`
    fn homomorphic_multiply(&self, ct1: &Ciphertext, ct2: &Ciphertext) -> Ciphertext;

    /// Running product of ciphertexts, in slice order
    fn homomorphic_batch_multiply(&self, ciphertexts: &[Ciphertext]) -> Result<Ciphertext>;

    /// Raise a ciphertext to a public power: decrypts to `m^k mod N`
    fn homomorphic_power(&self, ct: &Ciphertext, k: &BigUint) -> Ciphertext;

    /// Multiply by a known plaintext scalar: decrypts to `m * s mod N`
    fn homomorphic_scalar_multiply(&self, ct: &Ciphertext, scalar: &BigUint) -> Ciphertext;
}

impl HomomorphicOperations for Rsa {
    fn homomorphic_multiply(&self, ct1: &Ciphertext, ct2: &Ciphertext) -> Ciphertext {
        Ciphertext((&ct1.0 * &ct2.0) % &self.key.n)
    }

    fn homomorphic_batch_multiply(&self, ciphertexts: &[Ciphertext]) -> Result<Ciphertext> {
        let (first, rest) = ciphertexts.split_first().ok_or(RsaError::EmptyBatch)?;

        Ok(rest.iter().fold(first.clone(), |acc, ct| {
            self.homomorphic_multiply(&acc, ct)
        }))
    }

    fn homomorphic_power(&self, ct: &Ciphertext, k: &BigUint) -> Ciphertext {
        // (m^e)^k = (m^k)^e
        Ciphertext(mod_exp(&ct.0, k, &self.key.n))
    }

    fn homomorphic_scalar_multiply(&self, ct: &Ciphertext, scalar: &BigUint) -> Ciphertext {
        let ct_scalar = self.encrypt(scalar);
        self.homomorphic_multiply(ct, &ct_scalar)
    }
}
