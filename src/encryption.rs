//! Core RSA encryption and decryption operations

use num_bigint::BigUint;

use crate::error::{Result, RsaError};
use crate::keys::KeyParameters;
use crate::types::Ciphertext;
use crate::utils::mod_exp;

/// Textbook RSA, multiplicatively homomorphic
///
/// Holds one immutable key triple for its whole lifetime; every operation is
/// a pure function of its inputs and that key.
#[derive(Clone, Debug)]
pub struct Rsa {
    pub(crate) key: KeyParameters,
}

impl Rsa {
    /// Create a new RSA instance over the given key
    pub fn new(key: KeyParameters) -> Self {
        Rsa { key }
    }

    /// Create an instance with freshly generated 256-bit-prime parameters
    pub fn generate() -> Result<Self> {
        KeyParameters::generate().map(Rsa::new)
    }

    /// Get the key parameters
    pub fn key(&self) -> &KeyParameters {
        &self.key
    }

    /// Get the modulus N
    pub fn modulus(&self) -> &BigUint {
        &self.key.n
    }

    /// Encrypt a plaintext: m^e mod N
    ///
    /// Plaintexts at or above N are reduced modulo N first, so they decrypt
    /// to `m mod N`. Use [`Rsa::encrypt_checked`] to reject them instead.
    pub fn encrypt(&self, plaintext: &BigUint) -> Ciphertext {
        Ciphertext(mod_exp(plaintext, &self.key.e, &self.key.n))
    }

    /// Encrypt a plaintext, failing if it does not lie in `[0, N)`
    pub fn encrypt_checked(&self, plaintext: &BigUint) -> Result<Ciphertext> {
        if plaintext >= &self.key.n {
            return Err(RsaError::PlaintextTooLarge);
        }

        Ok(self.encrypt(plaintext))
    }

    /// Decrypt a ciphertext: c^d mod N
    pub fn decrypt(&self, ciphertext: &Ciphertext) -> BigUint {
        mod_exp(&ciphertext.0, &self.key.d, &self.key.n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::KeyGenerator;
    use crate::types::RsaConfig;
    use num_traits::{One, Zero};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn classic() -> Rsa {
        Rsa::new(
            KeyParameters::from_components(
                BigUint::from(3233u32),
                BigUint::from(17u32),
                BigUint::from(413u32),
            )
            .unwrap(),
        )
    }

    fn generated() -> Rsa {
        let key = KeyGenerator::with_config(StdRng::seed_from_u64(17), RsaConfig::for_testing(128))
            .generate()
            .unwrap();
        Rsa::new(key)
    }

    #[test]
    fn test_classic_vector() {
        let rsa = classic();
        let ct = rsa.encrypt(&BigUint::from(65u32));
        assert_eq!(ct.value(), &BigUint::from(2790u32));
        assert_eq!(rsa.decrypt(&ct), BigUint::from(65u32));
    }

    #[test]
    fn test_encryption_decryption() {
        let rsa = generated();

        let plaintext = BigUint::from(42u32);
        let ciphertext = rsa.encrypt(&plaintext);
        assert_eq!(rsa.decrypt(&ciphertext), plaintext);
    }

    #[test]
    fn test_boundary_plaintexts() {
        let rsa = generated();
        let n_minus_1 = rsa.modulus() - BigUint::one();

        for m in [BigUint::zero(), BigUint::one(), n_minus_1] {
            let ct = rsa.encrypt(&m);
            assert!(ct.value() < rsa.modulus());
            assert_eq!(rsa.decrypt(&ct), m);
        }
    }

    #[test]
    fn test_oversized_plaintext_wraps() {
        let rsa = classic();
        let m = BigUint::from(3233u32 + 65);

        assert_eq!(rsa.decrypt(&rsa.encrypt(&m)), BigUint::from(65u32));
        assert!(matches!(
            rsa.encrypt_checked(&m),
            Err(RsaError::PlaintextTooLarge)
        ));
        assert!(rsa.encrypt_checked(&BigUint::from(65u32)).is_ok());
    }

    #[test]
    fn test_distinct_plaintexts_do_not_collide() {
        let rsa = generated();
        let m1 = BigUint::from(1234u32);
        let m2 = BigUint::from(4321u32);
        assert_ne!(rsa.decrypt(&rsa.encrypt(&m1)), m2);
    }
}
