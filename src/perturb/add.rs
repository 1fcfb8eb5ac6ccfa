//! Add new regions, either random or drawn from another set.

use super::{draw_rounded, normal, require_chrom_sizes, sample_rows, target_count, validate_add_rate};
use crate::chrom_sizes::ChromSizes;
use crate::error::BedshiftError;
use crate::interval_set::IntervalSet;
use crate::region::{Region, Tag};
use rand::Rng;

/// Add `floor(rows * rate)` random regions.
///
/// Each region lands on a chromosome chosen with probability proportional
/// to its length, starts uniformly in `[1, chrom_len]` and has a length
/// drawn from `Normal(mean, stdev)`. The end is clamped to
/// `[start, chrom_len]`, so a non-positive length yields a zero-width region.
pub fn add<R: Rng + ?Sized>(
    set: &mut IntervalSet,
    sizes: &ChromSizes,
    rng: &mut R,
    rate: f64,
    mean: f64,
    stdev: f64,
) -> Result<usize, BedshiftError> {
    validate_add_rate("add", rate)?;
    if rate == 0.0 {
        return Ok(0);
    }
    require_chrom_sizes("add", sizes)?;
    let dist = normal("add", mean, stdev)?;
    let sampler = sizes
        .sampler()
        .ok_or_else(|| BedshiftError::MissingChromosomeLengths {
            operation: "add".to_string(),
        })?;

    let count = target_count(set.len(), rate);
    let mut added = Vec::new();
    added
        .try_reserve_exact(count)
        .map_err(|_| BedshiftError::TooManyRegions {
            operation: "add".to_string(),
            requested: count,
        })?;
    for _ in 0..count {
        let (chrom, chrom_len) = sampler.choose(rng);
        let start = rng.gen_range(1..=chrom_len);
        let length = draw_rounded(rng, &dist);
        let end = clamp_end(start, length, chrom_len);
        added.push(Region::tagged(chrom, start, end, Tag::Added));
    }

    set.replace_rows(&[], added);
    tracing::debug!(added = count, "added random regions");
    Ok(count)
}

/// `start + length`, clamped to `[start, chrom_len]`.
fn clamp_end(start: u64, length: i64, chrom_len: u64) -> u64 {
    if length <= 0 {
        return start;
    }
    start.saturating_add(length as u64).min(chrom_len).max(start)
}

/// Add `floor(rows * rate)` regions picked without replacement from `source`.
///
/// The count is clamped to the size of `source`. Picked regions are tagged
/// [`Tag::Added`].
pub fn add_from_regions<R: Rng + ?Sized>(
    set: &mut IntervalSet,
    rng: &mut R,
    source: &[Region],
    rate: f64,
) -> Result<usize, BedshiftError> {
    validate_add_rate("add", rate)?;
    if rate == 0.0 {
        return Ok(0);
    }

    let requested = target_count(set.len(), rate);
    let count = requested.min(source.len());
    if count < requested {
        tracing::info!(
            requested,
            available = source.len(),
            "add file has fewer regions than requested, adding all of them"
        );
    }

    let added: Vec<Region> = sample_rows(rng, source.len(), count)
        .into_iter()
        .map(|i| source[i].with_tag(Tag::Added))
        .collect();

    set.replace_rows(&[], added);
    tracing::debug!(added = count, "added regions from file");
    Ok(count)
}
