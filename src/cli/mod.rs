//! CLI utilities for bedshift
//!
//! This module provides testable functions used by the `bedshift` binary:
//! argument parsing and validation, output naming and summary formatting.

pub mod format;
pub mod parse;

// Re-export commonly used items
pub use format::{
    default_output_path, replicate_output_path, write_summary, OutputFormat, ReplicateSummary,
};
pub use parse::{parse_delimiter, validate_request};
