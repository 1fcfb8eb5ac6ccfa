// Copyright (c) 2024-2025 Fulcrum Genomics LLC
// SPDX-License-Identifier: MIT

//! ferro-bedshift: perturb genomic regions to synthesize noisy BED files
//!
//! Part of the ferro bioinformatics toolkit.
//!
//! # Example
//!
//! ```
//! use ferro_bedshift::{Bedshift, ChromSizes, Region};
//!
//! let regions: Vec<Region> = (0..10)
//!     .map(|i| Region::new("chr1", i * 100, (i + 1) * 100))
//!     .collect();
//! let sizes = ChromSizes::from_pairs([("chr1", 1000)]);
//!
//! let mut bedshift = Bedshift::with_seed(regions, sizes, 42);
//! let dropped = bedshift.drop(0.2).unwrap();
//! assert_eq!(dropped, 2);
//! assert_eq!(bedshift.len(), 8);
//! ```

pub mod bed;
pub mod chrom_sizes;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod interval_set;
pub mod overlap;
pub mod perturb;
pub mod pipeline;
pub mod region;
pub mod workflow;

// Re-export commonly used types
pub use chrom_sizes::ChromSizes;
pub use engine::Bedshift;
pub use error::{BedshiftError, ErrorCode};
pub use interval_set::IntervalSet;
pub use overlap::{find_overlaps, OverlapResolver};
pub use perturb::ShiftOutcome;
pub use pipeline::{AddSpec, DropSpec, PerturbConfig, PipelineReport, ShiftSpec};
pub use region::{Region, Tag};
pub use workflow::{Step, Workflow, WorkflowReport};

/// Result type alias for ferro-bedshift operations
pub type Result<T> = std::result::Result<T, BedshiftError>;
