//! Perturbation operators.
//!
//! Each operator takes the working [`IntervalSet`](crate::IntervalSet), an
//! explicit random number generator and its parameters. All validation
//! happens before the set is touched, so a returned error always leaves
//! the set as it was. A rate of exactly 0 returns immediately without
//! drawing from the generator.
//!
//! Rates are proportions of the current row count: the operator acts on
//! `floor(rows * rate)` rows. Only `add` accepts rates above 1.

pub mod add;
pub mod cut;
pub mod drop;
pub mod merge;
pub mod shift;

pub use add::{add, add_from_regions};
pub use cut::{cut, cut_point};
pub use drop::{drop, drop_from_regions};
pub use merge::merge;
pub use shift::{shift, shift_from_regions, shift_rows};

use crate::chrom_sizes::ChromSizes;
use crate::error::BedshiftError;
use rand::seq::index;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::Serialize;

/// Result of a shift: how many candidates moved and how many would have
/// left their chromosome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ShiftOutcome {
    /// Candidate rows considered
    pub requested: usize,
    /// Rows actually shifted
    pub shifted: usize,
    /// Rows skipped because the shift crossed a chromosome boundary
    pub rejected: usize,
}

/// Fail unless `rate` is a finite proportion in `[0, 1]`.
pub(crate) fn validate_rate(operation: &str, rate: f64) -> Result<(), BedshiftError> {
    if !rate.is_finite() || !(0.0..=1.0).contains(&rate) {
        return Err(BedshiftError::invalid_rate(operation, rate));
    }
    Ok(())
}

/// Fail unless `rate` is finite and non-negative.
pub(crate) fn validate_add_rate(operation: &str, rate: f64) -> Result<(), BedshiftError> {
    if !rate.is_finite() || rate < 0.0 {
        return Err(BedshiftError::InvalidRate {
            operation: operation.to_string(),
            rate,
            unbounded: true,
        });
    }
    Ok(())
}

pub(crate) fn require_chrom_sizes(
    operation: &str,
    sizes: &ChromSizes,
) -> Result<(), BedshiftError> {
    if sizes.is_empty() {
        return Err(BedshiftError::MissingChromosomeLengths {
            operation: operation.to_string(),
        });
    }
    Ok(())
}

/// `floor(rows * rate)`
pub(crate) fn target_count(rows: usize, rate: f64) -> usize {
    (rows as f64 * rate).floor() as usize
}

/// `amount` distinct indices drawn uniformly from `0..length`.
pub(crate) fn sample_rows<R: Rng + ?Sized>(rng: &mut R, length: usize, amount: usize) -> Vec<usize> {
    index::sample(rng, length, amount).into_vec()
}

pub(crate) fn normal(operation: &str, mean: f64, stdev: f64) -> Result<Normal<f64>, BedshiftError> {
    let invalid = || BedshiftError::InvalidDistribution {
        operation: operation.to_string(),
        mean,
        stdev,
    };
    if !mean.is_finite() || !stdev.is_finite() {
        return Err(invalid());
    }
    Normal::new(mean, stdev).map_err(|_| invalid())
}

/// One normal draw rounded to the nearest integer.
pub(crate) fn draw_rounded<R: Rng + ?Sized>(rng: &mut R, dist: &Normal<f64>) -> i64 {
    dist.sample(rng).round() as i64
}
