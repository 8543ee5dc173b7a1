//! dd-style size operands.

use crate::error::{Error, Result};

/// Two-letter decimal suffixes, inspected first.
const DECIMAL_SUFFIXES: [(&str, u64); 4] = [
    ("kB", 1000),
    ("MB", 1000 * 1000),
    ("GB", 1000 * 1000 * 1000),
    ("TB", 1000 * 1000 * 1000 * 1000),
];

/// One-letter binary suffixes, inspected on whatever the first stage left.
const BINARY_SUFFIXES: [(u8, u64); 5] = [
    (b'b', 512),
    (b'K', 1024),
    (b'M', 1024 * 1024),
    (b'G', 1024 * 1024 * 1024),
    (b'T', 1024 * 1024 * 1024 * 1024),
];

/// Parses a size the way dd does, e.g. `512`, `5M`, `5kB` or `4b`.
///
/// Strings shorter than two bytes are plain byte counts. Longer strings first
/// lose a trailing decimal suffix (`kB`, `MB`, `GB`, `TB`), then the last
/// remaining character is checked against the binary suffixes (`b` = 512,
/// `K`, `M`, `G`, `T` as powers of 1024); a binary match overrides the decimal
/// multiplier.
///
/// # Errors
///
/// Returns [`Error::MalformedSize`] when the remaining literal is not an
/// unsigned integer or the product overflows `u64`.
pub fn parse_size(input: &str) -> Result<u64> {
    let malformed = || Error::MalformedSize {
        input: input.to_string(),
    };

    if input.len() < 2 {
        return input.parse().map_err(|_| malformed());
    }

    let mut literal = input;
    let mut factor = 1u64;

    let tail = &input.as_bytes()[input.len() - 2..];
    if let Some(&(suffix, multiplier)) = DECIMAL_SUFFIXES
        .iter()
        .find(|(suffix, _)| suffix.as_bytes() == tail)
    {
        literal = &literal[..literal.len() - suffix.len()];
        factor = multiplier;
    }

    if let Some(&last) = literal.as_bytes().last() {
        if let Some(&(_, multiplier)) = BINARY_SUFFIXES.iter().find(|(c, _)| *c == last) {
            literal = &literal[..literal.len() - 1];
            factor = multiplier;
        }
    }

    let count: u64 = literal.parse().map_err(|_| malformed())?;
    count.checked_mul(factor).ok_or_else(malformed)
}
