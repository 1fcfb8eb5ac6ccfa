//! Parsing and validation utilities for CLI operations

use crate::error::BedshiftError;
use crate::pipeline::PerturbConfig;

/// Parse a delimiter argument into a single character
///
/// Accepts the escape `\t` (typed literally or as a tab), the names
/// `tab`, `comma` and `space`, or any single character.
///
/// # Examples
///
/// ```
/// use ferro_bedshift::cli::parse_delimiter;
///
/// assert_eq!(parse_delimiter("\\t").unwrap(), '\t');
/// assert_eq!(parse_delimiter("tab").unwrap(), '\t');
/// assert_eq!(parse_delimiter(",").unwrap(), ',');
/// assert!(parse_delimiter("::").is_err());
/// ```
pub fn parse_delimiter(value: &str) -> Result<char, BedshiftError> {
    match value.to_lowercase().as_str() {
        "\\t" | "tab" => return Ok('\t'),
        "comma" => return Ok(','),
        "space" => return Ok(' '),
        _ => {}
    }

    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(BedshiftError::Config {
            msg: format!("Delimiter must be a single character, got '{}'", value),
        }),
    }
}

/// Check request-level preconditions before any file is read
///
/// Rejects a repeat count below 1 and add/shift stages that need
/// chromosome lengths when none were given.
pub fn validate_request(
    config: &PerturbConfig,
    repeat: usize,
    has_chrom_lengths: bool,
) -> Result<(), BedshiftError> {
    if repeat < 1 {
        return Err(BedshiftError::Config {
            msg: format!("Repeat must be at least 1, got {}", repeat),
        });
    }

    if !has_chrom_lengths && config.needs_chrom_sizes() {
        let operation = if config.shift.rate() > 0.0 { "shift" } else { "add" };
        return Err(BedshiftError::MissingChromosomeLengths {
            operation: operation.to_string(),
        });
    }

    config.validate()
}
