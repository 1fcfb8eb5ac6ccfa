//! Merge neighbouring regions.

use super::{sample_rows, target_count, validate_rate};
use crate::error::BedshiftError;
use crate::interval_set::IntervalSet;
use crate::region::{Region, Tag};
use rand::Rng;
use std::collections::HashSet;

/// Merge sampled rows with their successor in sorted order.
///
/// The set is sorted first, then `floor(rows * rate)` rows are sampled.
/// Row `i` merges with row `i + 1` into `[start_i, end_{i+1})` when the
/// successor exists, sits on the same chromosome and neither row has
/// already been merged in this call. Otherwise row `i` is left alone.
///
/// Returns the number of merges performed, which can be lower than the
/// number of sampled rows.
pub fn merge<R: Rng + ?Sized>(
    set: &mut IntervalSet,
    rng: &mut R,
    rate: f64,
) -> Result<usize, BedshiftError> {
    validate_rate("merge", rate)?;
    if rate == 0.0 {
        return Ok(0);
    }

    set.sort();
    let rows = sample_rows(rng, set.len(), target_count(set.len(), rate));
    let sampled = rows.len();
    let regions = set.regions();

    let mut consumed: HashSet<usize> = HashSet::with_capacity(sampled * 2);
    let mut merged = Vec::new();
    for row in rows {
        let next = row + 1;
        let (Some(left), Some(right)) = (regions.get(row), regions.get(next)) else {
            continue;
        };
        if left.chrom != right.chrom || consumed.contains(&row) || consumed.contains(&next) {
            continue;
        }
        consumed.insert(row);
        consumed.insert(next);
        merged.push(Region::tagged(
            left.chrom.clone(),
            left.start,
            right.end,
            Tag::Merged,
        ));
    }

    let removed: Vec<usize> = consumed.into_iter().collect();
    let count = merged.len();
    set.replace_rows(&removed, merged);

    if count < sampled {
        tracing::debug!(sampled, merged = count, "some sampled regions had no neighbour to merge with");
    }
    tracing::debug!(merged = count, "merged regions");
    Ok(count)
}
