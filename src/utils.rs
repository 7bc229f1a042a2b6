//! Modular arithmetic and prime generation over arbitrary-precision integers

use crate::error::{Result, RsaError};
use num_bigint::{BigInt, BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::Rng;

/// Small primes used to reject most composite candidates before Miller-Rabin.
const SMALL_PRIMES: [u32; 25] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
];

/// Modular exponentiation: base^exponent mod modulus
///
/// Square-and-multiply, consuming the exponent from its least significant bit.
/// An exponent of zero yields `1 mod modulus`, so a modulus of one always
/// yields zero.
///
/// # Panics
///
/// Panics if `modulus` is zero.
pub fn mod_exp(base: &BigUint, exponent: &BigUint, modulus: &BigUint) -> BigUint {
    let mut result = BigUint::one() % modulus;
    let mut square = base % modulus;
    let mut exp = exponent.clone();

    while !exp.is_zero() {
        if exp.is_odd() {
            result = (&result * &square) % modulus;
        }
        square = (&square * &square) % modulus;
        exp >>= 1;
    }

    result
}

/// Compute modular inverse using the extended Euclidean algorithm
///
/// Drives `(g, y)` from `(a, m)` down to `(gcd(a, m), 0)` while tracking the
/// Bezout coefficient `u` of `a`. Returns `None` when `a` and `m` are not
/// coprime.
pub fn mod_inverse(a: &BigUint, m: &BigUint) -> Option<BigUint> {
    if m.is_zero() {
        return None;
    }

    let modulus = BigInt::from(m.clone());
    let mut u = BigInt::one();
    let mut g = BigInt::from(a.clone());
    let mut x = BigInt::zero();
    let mut y = modulus.clone();

    while !y.is_zero() {
        let (q, t) = g.div_rem(&y);
        let s = &u - &q * &x;
        u = std::mem::replace(&mut x, s);
        g = std::mem::replace(&mut y, t);
    }

    // a*u + m*v = g
    if !g.is_one() {
        return None;
    }

    u.mod_floor(&modulus).to_biguint()
}

/// Miller-Rabin primality test
pub fn is_probable_prime<R: Rng + ?Sized>(n: &BigUint, rounds: usize, rng: &mut R) -> bool {
    if n <= &BigUint::one() {
        return false;
    }

    for &p in SMALL_PRIMES.iter() {
        if n == &BigUint::from(p) {
            return true;
        }
        if (n % p).is_zero() {
            return false;
        }
    }

    let two = BigUint::from(2u32);
    let n_minus_1 = n - BigUint::one();
    let (s, d) = factor_powers_of_two(&n_minus_1);

    'witness: for _ in 0..rounds {
        let a = rng.gen_biguint_range(&two, &n_minus_1);
        let mut x = mod_exp(&a, &d, n);

        if x.is_one() || x == n_minus_1 {
            continue;
        }

        for _ in 0..s - 1 {
            x = (&x * &x) % n;
            if x == n_minus_1 {
                continue 'witness;
            }
        }

        return false;
    }

    true
}

/// Factor out powers of 2 from n
pub fn factor_powers_of_two(n: &BigUint) -> (u64, BigUint) {
    let mut s = 0;
    let mut d = n.clone();

    while d.is_even() && !d.is_zero() {
        d >>= 1;
        s += 1;
    }

    (s, d)
}

/// Sample a probable prime uniformly from `[low, high)`
pub fn generate_prime_in_range<R: Rng + ?Sized>(
    low: &BigUint,
    high: &BigUint,
    rounds: usize,
    max_attempts: usize,
    rng: &mut R,
) -> Result<BigUint> {
    if low >= high {
        return Err(RsaError::InvalidParameter(format!(
            "empty prime range [{}, {})",
            low, high
        )));
    }

    for _ in 0..max_attempts {
        let candidate = rng.gen_biguint_range(low, high) | BigUint::one();
        if &candidate >= high {
            continue;
        }

        if is_probable_prime(&candidate, rounds, rng) {
            return Ok(candidate);
        }
    }

    Err(RsaError::PrimeGenerationFailure {
        bits: high.bits(),
        attempts: max_attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rstest::rstest;

    fn big(n: u64) -> BigUint {
        BigUint::from(n)
    }

    #[rstest]
    #[case(65, 17, 3233, 2790)]
    #[case(2790, 413, 3233, 65)]
    #[case(2790, 2753, 3233, 65)]
    #[case(4, 13, 497, 445)]
    #[case(7, 0, 13, 1)]
    #[case(0, 0, 13, 1)]
    #[case(0, 5, 13, 0)]
    #[case(12, 3, 1, 0)]
    #[case(0, 0, 1, 0)]
    fn test_mod_exp_vectors(
        #[case] base: u64,
        #[case] exponent: u64,
        #[case] modulus: u64,
        #[case] expected: u64,
    ) {
        assert_eq!(mod_exp(&big(base), &big(exponent), &big(modulus)), big(expected));
    }

    #[test]
    fn test_mod_exp_matches_modpow() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let modulus = rng.gen_biguint(300) | BigUint::one();
            let base = rng.gen_biguint(400);
            let exponent = rng.gen_biguint(128);
            assert_eq!(
                mod_exp(&base, &exponent, &modulus),
                base.modpow(&exponent, &modulus)
            );
        }
    }

    #[rstest]
    #[case(17, 780, 413)]
    #[case(17, 3120, 2753)]
    #[case(3, 11, 4)]
    #[case(65537, 100, 73)]
    #[case(1, 7, 1)]
    fn test_mod_inverse_vectors(#[case] a: u64, #[case] m: u64, #[case] expected: u64) {
        let inv = mod_inverse(&big(a), &big(m)).unwrap();
        assert_eq!(inv, big(expected));
        assert_eq!((big(a) * inv) % big(m), BigUint::one());
    }

    #[test]
    fn test_mod_inverse_not_coprime() {
        assert_eq!(mod_inverse(&big(6), &big(9)), None);
        assert_eq!(mod_inverse(&big(0), &big(9)), None);
        assert_eq!(mod_inverse(&big(3), &big(0)), None);
    }

    #[test]
    fn test_mod_inverse_large() {
        let mut rng = StdRng::seed_from_u64(11);
        let m = generate_prime_in_range(&(big(1) << 128), &(big(1) << 129), 20, 10_000, &mut rng)
            .unwrap();
        for _ in 0..10 {
            let a = rng.gen_biguint_range(&BigUint::one(), &m);
            let inv = mod_inverse(&a, &m).unwrap();
            assert!(inv < m);
            assert_eq!((&a * &inv) % &m, BigUint::one());
        }
    }

    #[test]
    fn test_is_probable_prime() {
        let mut rng = StdRng::seed_from_u64(1);

        // Known small primes
        for p in [2u64, 3, 5, 7, 11, 13, 61, 53, 97, 101, 65537] {
            assert!(is_probable_prime(&big(p), 20, &mut rng), "{} is prime", p);
        }

        // Known composites, including Carmichael numbers
        for c in [0u64, 1, 4, 6, 9, 15, 3233, 561, 1105, 41041, 10403] {
            assert!(!is_probable_prime(&big(c), 20, &mut rng), "{} is composite", c);
        }
    }

    #[test]
    fn test_factor_powers_of_two() {
        assert_eq!(factor_powers_of_two(&big(48)), (4, big(3)));
        assert_eq!(factor_powers_of_two(&big(7)), (0, big(7)));
    }

    #[test]
    fn test_generate_prime_in_range() {
        let mut rng = StdRng::seed_from_u64(3);
        let low = big(1) << 64;
        let high = big(1) << 65;
        let p = generate_prime_in_range(&low, &high, 20, 10_000, &mut rng).unwrap();

        assert!(p >= low && p < high);
        assert!(is_probable_prime(&p, 20, &mut rng));
    }

    #[test]
    fn test_generate_prime_gives_up() {
        let mut rng = StdRng::seed_from_u64(3);
        // [24, 29) holds no odd prime once candidates are forced odd: 25 and 27
        let result = generate_prime_in_range(&big(24), &big(29), 20, 50, &mut rng);
        assert!(matches!(
            result,
            Err(RsaError::PrimeGenerationFailure { attempts: 50, .. })
        ));
    }
}
