//! Loading plaintext integers from a line-oriented text source

use num_bigint::BigUint;
use num_traits::{Num, One, Zero};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, info};

use crate::error::{Result, RsaError};

/// Largest accepted plaintext exponent: values lie in `[1, 2^256]`
pub const MAX_PLAINTEXT_BITS: u64 = 256;

/// Read plaintexts from a file, one decimal integer per line
///
/// The file must exist before anything else happens; its absence is reported
/// as [`RsaError::InputNotFound`].
pub fn load_plaintexts(path: &Path) -> Result<Vec<BigUint>> {
    if !path.is_file() {
        return Err(RsaError::InputNotFound(path.to_path_buf()));
    }

    let file = File::open(path)?;
    let values = parse_plaintexts(BufReader::new(file))?;

    info!(path = %path.display(), count = values.len(), "loaded plaintexts");
    Ok(values)
}

/// Parse plaintexts from any buffered reader, preserving line order
///
/// Blank lines are skipped. Line numbers in errors are 1-based.
pub fn parse_plaintexts<R: BufRead>(reader: R) -> Result<Vec<BigUint>> {
    let max = BigUint::one() << MAX_PLAINTEXT_BITS;
    let mut values = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let content = line.trim();
        if content.is_empty() {
            continue;
        }

        let value = BigUint::from_str_radix(content, 10).map_err(|_| {
            RsaError::MalformedPlaintext {
                line: idx + 1,
                content: content.to_string(),
            }
        })?;

        if value.is_zero() || value > max {
            return Err(RsaError::PlaintextOutOfRange { line: idx + 1 });
        }

        values.push(value);
    }

    debug!(count = values.len(), "parsed plaintexts");
    Ok(values)
}
