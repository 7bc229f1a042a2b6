//! Correctness checks for the RSA round trip and its multiplicative homomorphism
//!
//! Each check runs independently and records its own outcome, so one failure
//! does not hide the others. [`HarnessReport::into_result`] turns the first
//! failure into an [`RsaError::CorrectnessViolation`].

use num_bigint::BigUint;
use num_traits::One;
use rand::seq::index;
use rand::Rng;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::encryption::Rsa;
use crate::error::{Result, RsaError};
use crate::homomorphic::HomomorphicOperations;

/// Minimum number of plaintexts the fixed checks need
pub const MIN_PLAINTEXTS: usize = 2;

/// Minimum sample size for the random product check
pub const MIN_SAMPLE_SIZE: usize = 3;

/// Outcome of a single check
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckOutcome {
    Passed,
    Failed { detail: String },
    Skipped { reason: String },
}

impl CheckOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, CheckOutcome::Failed { .. })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckReport {
    pub name: String,
    pub outcome: CheckOutcome,
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            CheckOutcome::Passed => write!(f, "{}: passed", self.name),
            CheckOutcome::Failed { detail } => write!(f, "{}: FAILED ({})", self.name, detail),
            CheckOutcome::Skipped { reason } => write!(f, "{}: skipped ({})", self.name, reason),
        }
    }
}

/// Results of a full harness run, in execution order
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarnessReport {
    pub checks: Vec<CheckReport>,
}

impl HarnessReport {
    /// True when no check failed
    pub fn is_success(&self) -> bool {
        !self.checks.iter().any(|c| c.outcome.is_failure())
    }

    pub fn failures(&self) -> impl Iterator<Item = &CheckReport> {
        self.checks.iter().filter(|c| c.outcome.is_failure())
    }

    pub fn get(&self, name: &str) -> Option<&CheckReport> {
        self.checks.iter().find(|c| c.name == name)
    }

    /// Fail with the first failing check, if any
    pub fn into_result(self) -> Result<()> {
        match self.checks.into_iter().find(|c| c.outcome.is_failure()) {
            Some(CheckReport {
                name,
                outcome: CheckOutcome::Failed { detail },
            }) => Err(RsaError::CorrectnessViolation {
                check: name,
                detail,
            }),
            _ => Ok(()),
        }
    }
}

/// Drives a cipher with a fixed, ordered list of plaintexts
pub struct CorrectnessHarness<'a> {
    rsa: &'a Rsa,
    plaintexts: Vec<BigUint>,
}

impl<'a> CorrectnessHarness<'a> {
    pub fn new(rsa: &'a Rsa, plaintexts: Vec<BigUint>) -> Result<Self> {
        if plaintexts.len() < MIN_PLAINTEXTS {
            return Err(RsaError::NotEnoughPlaintexts {
                found: plaintexts.len(),
                required: MIN_PLAINTEXTS,
            });
        }

        // The checks assume every plaintext is already reduced modulo N
        if plaintexts.iter().any(|m| m >= rsa.modulus()) {
            return Err(RsaError::PlaintextTooLarge);
        }

        Ok(CorrectnessHarness { rsa, plaintexts })
    }

    pub fn plaintexts(&self) -> &[BigUint] {
        &self.plaintexts
    }

    /// Run every check in order and collect the outcomes
    pub fn run<R: Rng + ?Sized>(&self, rng: &mut R) -> HarnessReport {
        let checks = vec![
            record("round_trip", self.check_round_trip()),
            record("distinct_plaintext", self.check_distinct_plaintext()),
            record("pairwise_square", self.check_pairwise_square()),
            record("random_product", self.check_random_product(rng)),
        ];

        HarnessReport { checks }
    }

    /// Dec(Enc(v1)) = v1
    pub fn check_round_trip(&self) -> CheckOutcome {
        let m = &self.plaintexts[1];
        let decrypted = self.rsa.decrypt(&self.rsa.encrypt(m));

        if &decrypted == m {
            CheckOutcome::Passed
        } else {
            CheckOutcome::Failed {
                detail: format!("decrypt(encrypt({})) = {}", m, decrypted),
            }
        }
    }

    /// Dec(Enc(v1)) != v0
    pub fn check_distinct_plaintext(&self) -> CheckOutcome {
        let m = &self.plaintexts[1];
        let other = &self.plaintexts[0];
        let decrypted = self.rsa.decrypt(&self.rsa.encrypt(m));

        if &decrypted != other {
            CheckOutcome::Passed
        } else {
            CheckOutcome::Failed {
                detail: format!("decrypt(encrypt({})) equals stored value {}", m, other),
            }
        }
    }

    /// Dec(Enc(v1) * Enc(v1)) = v1^2 mod N
    pub fn check_pairwise_square(&self) -> CheckOutcome {
        let m = &self.plaintexts[1];
        let ct = self.rsa.encrypt(m);
        let decrypted = self
            .rsa
            .decrypt(&self.rsa.homomorphic_multiply(&ct, &ct));
        let expected = (m * m) % self.rsa.modulus();

        if decrypted == expected {
            CheckOutcome::Passed
        } else {
            CheckOutcome::Failed {
                detail: format!(
                    "decrypt(encrypt({m}) * encrypt({m})) = {}, expected {}",
                    decrypted, expected
                ),
            }
        }
    }

    /// Product over a random subset of at least three distinct plaintexts
    pub fn check_random_product<R: Rng + ?Sized>(&self, rng: &mut R) -> CheckOutcome {
        let n = self.plaintexts.len();
        if n < MIN_SAMPLE_SIZE {
            return CheckOutcome::Skipped {
                reason: format!("need at least {} plaintexts, have {}", MIN_SAMPLE_SIZE, n),
            };
        }

        let sample_size = rng.gen_range(MIN_SAMPLE_SIZE..=n);
        let indices = index::sample(rng, n, sample_size).into_vec();
        self.check_product(&indices)
    }

    /// Compare the plaintext product with the decrypted homomorphic product
    /// over `indices`, folding both in the same order
    pub fn check_product(&self, indices: &[usize]) -> CheckOutcome {
        let modulus = self.rsa.modulus();
        let mut product = BigUint::one();
        let mut ct_product = self.rsa.encrypt(&BigUint::one());

        for &i in indices {
            let m = &self.plaintexts[i];
            product = (product * m) % modulus;
            ct_product = self
                .rsa
                .homomorphic_multiply(&ct_product, &self.rsa.encrypt(m));
        }

        let decrypted = self.rsa.decrypt(&ct_product);
        if decrypted == product {
            CheckOutcome::Passed
        } else {
            CheckOutcome::Failed {
                detail: format!(
                    "indices {:?}: decrypted product {} != plaintext product {}",
                    indices, decrypted, product
                ),
            }
        }
    }
}

fn record(name: &str, outcome: CheckOutcome) -> CheckReport {
    let report = CheckReport {
        name: name.to_string(),
        outcome,
    };

    match &report.outcome {
        CheckOutcome::Passed => info!(check = name, "passed"),
        CheckOutcome::Failed { detail } => error!(check = name, %detail, "failed"),
        CheckOutcome::Skipped { reason } => warn!(check = name, %reason, "skipped"),
    }

    report
}
