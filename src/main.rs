use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::{thread_rng, SeedableRng};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use rsa_he::types::DEFAULT_PRIME_BITS;
use rsa_he::{load_plaintexts, CorrectnessHarness, KeyGenerator, Rsa, RsaConfig};

/// Check the multiplicative homomorphism of textbook RSA against a list of plaintexts
#[derive(Debug, Parser)]
#[command(name = "rsa_he", version)]
struct Cli {
    /// File with one decimal plaintext per line
    #[arg(value_name = "FILE")]
    filename: PathBuf,

    /// Seed for key generation and sampling (deterministic run)
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Primes are drawn from [2^BITS, 2^(BITS+1))
    #[arg(long, value_name = "BITS", default_value_t = DEFAULT_PRIME_BITS)]
    prime_bits: u64,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    // Input problems surface before any key material is generated
    let plaintexts = load_plaintexts(&cli.filename)
        .with_context(|| format!("reading plaintexts from {}", cli.filename.display()))?;

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(thread_rng()).context("seeding random generator")?,
    };

    let config = RsaConfig {
        prime_bits: cli.prime_bits,
        ..RsaConfig::default()
    };
    let key = KeyGenerator::with_config(&mut rng, config)
        .generate()
        .context("generating RSA parameters")?;
    info!(%key, "key ready");

    let rsa = Rsa::new(key);
    let harness = CorrectnessHarness::new(&rsa, plaintexts)?;
    let report = harness.run(&mut rng);

    for check in &report.checks {
        println!("{}", check);
    }

    report.into_result()?;
    info!("all checks passed");
    Ok(())
}
