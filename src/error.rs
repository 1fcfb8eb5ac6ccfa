//! Error types for ferro-bedshift
//!
//! Every failure the engine can report is a precondition failure detected
//! before the working interval set is touched. Each variant carries the
//! counts and values a command-line layer needs to print an actionable
//! message, and maps to a stable [`ErrorCode`].

use std::fmt;
use thiserror::Error;

/// Error codes for categorizing errors
///
/// These codes can be used for programmatic error handling
/// and for documentation lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ErrorCode {
    // Parameter errors (E1xxx)
    /// Rate outside its permitted range
    InvalidRate = 1001,
    /// Normal distribution parameters rejected
    InvalidDistribution = 1002,
    /// Requested region count cannot be held in memory
    TooManyRegions = 1003,

    // Chromosome errors (E2xxx)
    /// No chromosome lengths were loaded
    MissingChromosomeLengths = 2001,
    /// Chromosome absent from the length map
    UnknownChromosome = 2002,

    // Overlap errors (E3xxx)
    /// Fewer overlapping regions than requested
    InsufficientOverlap = 3001,
    /// No region overlaps the comparison set
    NoOverlapFound = 3002,
    /// Explicit row index outside the interval set
    RowOutOfRange = 3003,

    // Configuration errors (E4xxx)
    /// Malformed config or workflow file
    InvalidConfig = 4001,

    // IO errors (E9xxx)
    /// Input file missing or malformed
    UnreadableInput = 9001,
    /// File IO error
    IoError = 9002,
}

impl ErrorCode {
    /// Get the error code as a string (e.g., "E1001")
    pub fn as_str(&self) -> String {
        format!("E{:04}", *self as u16)
    }

    /// Get a brief description of this error code
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::InvalidRate => "rate out of range",
            ErrorCode::InvalidDistribution => "invalid normal distribution parameters",
            ErrorCode::TooManyRegions => "too many regions requested",
            ErrorCode::MissingChromosomeLengths => "chromosome lengths not provided",
            ErrorCode::UnknownChromosome => "chromosome not found in lengths",
            ErrorCode::InsufficientOverlap => "not enough overlapping regions",
            ErrorCode::NoOverlapFound => "no overlapping regions",
            ErrorCode::RowOutOfRange => "row index out of range",
            ErrorCode::InvalidConfig => "invalid configuration",
            ErrorCode::UnreadableInput => "unreadable input file",
            ErrorCode::IoError => "file I/O error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Main error type for ferro-bedshift operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BedshiftError {
    /// Rate outside `[0, 1]` (or below 0 for add)
    #[error("Invalid {operation} rate {rate}: {}", rate_bound(.unbounded))]
    InvalidRate {
        operation: String,
        rate: f64,
        /// Whether rates above 1 are permitted for this operation
        unbounded: bool,
    },

    /// Mean/standard deviation cannot define a normal distribution
    #[error("Invalid {operation} distribution: mean {mean}, stdev {stdev}")]
    InvalidDistribution {
        operation: String,
        mean: f64,
        stdev: f64,
    },

    /// Rate asks for more regions than can be allocated
    #[error("Cannot {operation} {requested} regions: too many to allocate")]
    TooManyRegions { operation: String, requested: usize },

    /// Operation needs chromosome lengths but none were loaded
    #[error("Chromosome lengths must be provided to {operation} regions")]
    MissingChromosomeLengths { operation: String },

    /// A region references a chromosome absent from the length map
    #[error("Chromosome '{chrom}' not found in chromosome lengths")]
    UnknownChromosome { chrom: String },

    /// From-file operation asked for more regions than overlap the file
    #[error("Cannot {operation} {requested} regions: only {available} regions overlap the provided file")]
    InsufficientOverlap {
        operation: String,
        requested: usize,
        available: usize,
    },

    /// Reference and comparison sets share no overlapping interval
    #[error("No overlap found between {reference_regions} reference regions and {comparison_regions} comparison regions")]
    NoOverlapFound {
        reference_regions: usize,
        comparison_regions: usize,
    },

    /// Explicit row index beyond the end of the interval set
    #[error("Row {row} is out of range for {len} regions")]
    RowOutOfRange { row: usize, len: usize },

    /// Input file missing or malformed
    #[error("Unreadable input {path}: {msg}")]
    UnreadableInput { path: String, msg: String },

    /// Config or workflow file malformed
    #[error("Config error: {msg}")]
    Config { msg: String },

    /// IO error (for file operations)
    #[error("IO error: {msg}")]
    Io { msg: String },
}

impl BedshiftError {
    /// Create an invalid-rate error for an operation bounded to `[0, 1]`
    pub fn invalid_rate(operation: impl Into<String>, rate: f64) -> Self {
        BedshiftError::InvalidRate {
            operation: operation.into(),
            rate,
            unbounded: false,
        }
    }

    /// Create an unreadable-input error
    pub fn unreadable(path: impl Into<String>, msg: impl Into<String>) -> Self {
        BedshiftError::UnreadableInput {
            path: path.into(),
            msg: msg.into(),
        }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            BedshiftError::InvalidRate { .. } => ErrorCode::InvalidRate,
            BedshiftError::InvalidDistribution { .. } => ErrorCode::InvalidDistribution,
            BedshiftError::TooManyRegions { .. } => ErrorCode::TooManyRegions,
            BedshiftError::MissingChromosomeLengths { .. } => ErrorCode::MissingChromosomeLengths,
            BedshiftError::UnknownChromosome { .. } => ErrorCode::UnknownChromosome,
            BedshiftError::InsufficientOverlap { .. } => ErrorCode::InsufficientOverlap,
            BedshiftError::NoOverlapFound { .. } => ErrorCode::NoOverlapFound,
            BedshiftError::RowOutOfRange { .. } => ErrorCode::RowOutOfRange,
            BedshiftError::UnreadableInput { .. } => ErrorCode::UnreadableInput,
            BedshiftError::Config { .. } => ErrorCode::InvalidConfig,
            BedshiftError::Io { .. } => ErrorCode::IoError,
        }
    }

    /// Suggest how to fix the error, when there is something to suggest
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            BedshiftError::InvalidRate {
                unbounded: false, ..
            } => Some("rates are proportions of the current region count"),
            BedshiftError::TooManyRegions { .. } => Some("lower the add rate"),
            BedshiftError::MissingChromosomeLengths { .. } => {
                Some("pass a chrom.sizes file with --chrom-lengths")
            }
            BedshiftError::UnknownChromosome { .. } => {
                Some("check that the chrom.sizes file matches the genome of the BED file")
            }
            BedshiftError::InsufficientOverlap { .. } => {
                Some("lower the rate or provide a file with more overlapping regions")
            }
            BedshiftError::NoOverlapFound { .. } => {
                Some("check that both files use the same chromosome naming")
            }
            _ => None,
        }
    }

    /// Get a formatted error with code prefix and hint
    pub fn detailed_message(&self) -> String {
        let mut result = format!("[{}] {}", self.code(), self);
        if let Some(hint) = self.hint() {
            result.push_str("\n\nHint: ");
            result.push_str(hint);
        }
        result
    }
}

fn rate_bound(unbounded: &bool) -> &'static str {
    if *unbounded {
        "must be at least 0"
    } else {
        "must be between 0 and 1"
    }
}

impl From<std::io::Error> for BedshiftError {
    fn from(err: std::io::Error) -> Self {
        BedshiftError::Io {
            msg: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for BedshiftError {
    fn from(err: toml::de::Error) -> Self {
        BedshiftError::Config {
            msg: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for BedshiftError {
    fn from(err: serde_json::Error) -> Self {
        BedshiftError::Io {
            msg: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_as_str() {
        assert_eq!(ErrorCode::InvalidRate.as_str(), "E1001");
        assert_eq!(ErrorCode::MissingChromosomeLengths.as_str(), "E2001");
        assert_eq!(ErrorCode::InsufficientOverlap.as_str(), "E3001");
        assert_eq!(ErrorCode::InvalidConfig.as_str(), "E4001");
        assert_eq!(ErrorCode::UnreadableInput.as_str(), "E9001");
    }

    #[test]
    fn test_too_many_regions() {
        let err = BedshiftError::TooManyRegions {
            operation: "add".to_string(),
            requested: usize::MAX,
        };
        assert_eq!(err.code().as_str(), "E1003");
        assert!(err.detailed_message().contains("Hint: lower the add rate"));
    }

    #[test]
    fn test_error_code_display() {
        assert_eq!(format!("{}", ErrorCode::NoOverlapFound), "E3002");
        assert_eq!(format!("{}", ErrorCode::IoError), "E9002");
    }

    #[test]
    fn test_error_code_description() {
        assert_eq!(
            ErrorCode::NoOverlapFound.description(),
            "no overlapping regions"
        );
        assert_eq!(
            ErrorCode::UnknownChromosome.description(),
            "chromosome not found in lengths"
        );
    }

    #[test]
    fn test_invalid_rate_display() {
        let err = BedshiftError::invalid_rate("drop", 1.5);
        let display = err.to_string();
        assert!(display.contains("drop"));
        assert!(display.contains("1.5"));
        assert!(display.contains("between 0 and 1"));

        let err = BedshiftError::InvalidRate {
            operation: "add".to_string(),
            rate: -0.1,
            unbounded: true,
        };
        assert!(err.to_string().contains("at least 0"));
    }

    #[test]
    fn test_insufficient_overlap_reports_counts() {
        let err = BedshiftError::InsufficientOverlap {
            operation: "shift".to_string(),
            requested: 7,
            available: 3,
        };
        let display = err.to_string();
        assert!(display.contains('7'));
        assert!(display.contains('3'));
        assert_eq!(err.code(), ErrorCode::InsufficientOverlap);
    }

    #[test]
    fn test_code_mapping() {
        let err = BedshiftError::MissingChromosomeLengths {
            operation: "add".to_string(),
        };
        assert_eq!(err.code(), ErrorCode::MissingChromosomeLengths);

        let err = BedshiftError::unreadable("x.bed", "missing");
        assert_eq!(err.code(), ErrorCode::UnreadableInput);

        let err = BedshiftError::RowOutOfRange { row: 9, len: 3 };
        assert_eq!(err.code(), ErrorCode::RowOutOfRange);
    }

    #[test]
    fn test_detailed_message() {
        let err = BedshiftError::MissingChromosomeLengths {
            operation: "shift".to_string(),
        };
        let msg = err.detailed_message();
        assert!(msg.starts_with("[E2001]"));
        assert!(msg.contains("Hint: pass a chrom.sizes file"));

        let err = BedshiftError::Io {
            msg: "disk full".to_string(),
        };
        assert!(!err.detailed_message().contains("Hint"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: BedshiftError = io_err.into();
        assert!(matches!(err, BedshiftError::Io { .. }));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_from_toml_error() {
        let toml_err = toml::from_str::<toml::Value>("not = [valid").unwrap_err();
        let err: BedshiftError = toml_err.into();
        assert_eq!(err.code(), ErrorCode::InvalidConfig);
    }
}
