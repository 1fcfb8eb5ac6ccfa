//! Cut regions in two at their midpoint.

use super::{sample_rows, target_count, validate_rate};
use crate::error::BedshiftError;
use crate::interval_set::IntervalSet;
use crate::region::{Region, Tag};
use rand::Rng;

/// Cut position for `[start, end)`.
///
/// The floor of the midpoint, pushed to `start + 10` when it does not lie
/// after `start` and then to `end - 10` when it does not lie before `end`.
/// Only regions narrower than 2 hit either adjustment; for those the two
/// halves may be inverted. The result never goes below 0.
///
/// # Examples
///
/// ```
/// use ferro_bedshift::perturb::cut_point;
///
/// assert_eq!(cut_point(100, 200), 150);
/// assert_eq!(cut_point(100, 101), 91);
/// ```
pub fn cut_point(start: u64, end: u64) -> u64 {
    let mut mid = start + (end.saturating_sub(start)) / 2;
    if mid <= start {
        mid = start.saturating_add(10);
    }
    if mid >= end {
        mid = end.saturating_sub(10);
    }
    mid
}

/// Replace `floor(rows * rate)` sampled rows with their two halves.
///
/// Returns the number of rows cut; the set grows by the same amount.
pub fn cut<R: Rng + ?Sized>(
    set: &mut IntervalSet,
    rng: &mut R,
    rate: f64,
) -> Result<usize, BedshiftError> {
    validate_rate("cut", rate)?;
    if rate == 0.0 {
        return Ok(0);
    }

    let rows = sample_rows(rng, set.len(), target_count(set.len(), rate));
    let mut halves = Vec::with_capacity(rows.len() * 2);
    for &row in &rows {
        let region = &set.regions()[row];
        let mid = cut_point(region.start, region.end);
        halves.push(Region::tagged(region.chrom.clone(), region.start, mid, Tag::Cut));
        halves.push(Region::tagged(region.chrom.clone(), mid, region.end, Tag::Cut));
    }

    set.replace_rows(&rows, halves);
    tracing::debug!(cut = rows.len(), "cut regions");
    Ok(rows.len())
}
