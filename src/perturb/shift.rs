//! Shift regions by a normally distributed offset.
//!
//! Start and end move together. A shift that would put the start below 0
//! or the end past the chromosome length is skipped, not clamped; skips
//! are reported in [`ShiftOutcome::rejected`].

use super::{
    draw_rounded, normal, require_chrom_sizes, sample_rows, target_count, validate_rate,
    ShiftOutcome,
};
use crate::chrom_sizes::ChromSizes;
use crate::error::BedshiftError;
use crate::interval_set::IntervalSet;
use crate::overlap::OverlapResolver;
use crate::region::{Region, Tag};
use rand::Rng;
use std::collections::HashSet;

/// Shift `floor(rows * rate)` rows sampled without replacement.
pub fn shift<R: Rng + ?Sized>(
    set: &mut IntervalSet,
    sizes: &ChromSizes,
    rng: &mut R,
    rate: f64,
    mean: f64,
    stdev: f64,
) -> Result<ShiftOutcome, BedshiftError> {
    validate_rate("shift", rate)?;
    if rate == 0.0 {
        return Ok(ShiftOutcome::default());
    }
    require_chrom_sizes("shift", sizes)?;
    normal("shift", mean, stdev)?;

    let rows = sample_rows(rng, set.len(), target_count(set.len(), rate));
    shift_rows(set, sizes, rng, &rows, mean, stdev)
}

/// Shift an explicit list of rows.
///
/// Repeated row indices are shifted once. Every row must exist and sit on
/// a chromosome present in `sizes`.
pub fn shift_rows<R: Rng + ?Sized>(
    set: &mut IntervalSet,
    sizes: &ChromSizes,
    rng: &mut R,
    rows: &[usize],
    mean: f64,
    stdev: f64,
) -> Result<ShiftOutcome, BedshiftError> {
    require_chrom_sizes("shift", sizes)?;
    let dist = normal("shift", mean, stdev)?;

    let mut seen = HashSet::with_capacity(rows.len());
    let mut candidates = Vec::with_capacity(rows.len());
    for &row in rows {
        let region = set.get(row).ok_or(BedshiftError::RowOutOfRange {
            row,
            len: set.len(),
        })?;
        let chrom_len = sizes
            .get(&region.chrom)
            .ok_or_else(|| BedshiftError::UnknownChromosome {
                chrom: region.chrom.clone(),
            })?;
        if seen.insert(row) {
            candidates.push((row, chrom_len));
        }
    }

    let mut outcome = ShiftOutcome {
        requested: candidates.len(),
        ..ShiftOutcome::default()
    };
    let mut removed = Vec::with_capacity(candidates.len());
    let mut shifted = Vec::with_capacity(candidates.len());

    for (row, chrom_len) in candidates {
        let offset = draw_rounded(rng, &dist);
        match shifted_region(&set.regions()[row], offset, chrom_len) {
            Some(region) => {
                removed.push(row);
                shifted.push(region);
            }
            None => outcome.rejected += 1,
        }
    }
    outcome.shifted = shifted.len();

    set.replace_rows(&removed, shifted);

    if outcome.rejected > 0 {
        tracing::warn!(
            rejected = outcome.rejected,
            requested = outcome.requested,
            "{} regions were prevented from being shifted outside of chromosome boundaries; \
             reported regions shifted will be less than expected",
            outcome.rejected
        );
    }
    tracing::debug!(shifted = outcome.shifted, "shifted regions");
    Ok(outcome)
}

/// Move `region` by `offset`, or `None` when it would leave `[0, chrom_len]`.
fn shifted_region(region: &Region, offset: i64, chrom_len: u64) -> Option<Region> {
    let start = i128::from(region.start) + i128::from(offset);
    let end = i128::from(region.end) + i128::from(offset);
    if start < 0 || end > i128::from(chrom_len) {
        return None;
    }
    Some(Region::tagged(
        region.chrom.clone(),
        start as u64,
        end as u64,
        Tag::Shifted,
    ))
}

/// Shift `floor(rows * rate)` rows chosen among those overlapping `source`.
///
/// Fails with [`BedshiftError::NoOverlapFound`] when nothing overlaps, and
/// with [`BedshiftError::InsufficientOverlap`] when fewer rows overlap than
/// the rate asks for.
pub fn shift_from_regions<R: Rng + ?Sized>(
    set: &mut IntervalSet,
    sizes: &ChromSizes,
    rng: &mut R,
    source: &[Region],
    rate: f64,
    mean: f64,
    stdev: f64,
) -> Result<ShiftOutcome, BedshiftError> {
    validate_rate("shift", rate)?;
    if rate == 0.0 {
        return Ok(ShiftOutcome::default());
    }
    require_chrom_sizes("shift", sizes)?;
    normal("shift", mean, stdev)?;

    set.sort();
    let overlapping = OverlapResolver::new(source).resolve(set.regions())?;
    let requested = target_count(set.len(), rate);
    if requested > overlapping.len() {
        return Err(BedshiftError::InsufficientOverlap {
            operation: "shift".to_string(),
            requested,
            available: overlapping.len(),
        });
    }

    let rows: Vec<usize> = sample_rows(rng, overlapping.len(), requested)
        .into_iter()
        .map(|i| overlapping[i])
        .collect();
    shift_rows(set, sizes, rng, &rows, mean, stdev)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ten_regions() -> IntervalSet {
        IntervalSet::load((0..10).map(|i| Region::new("chr1", i * 100, (i + 1) * 100)))
    }

    fn sizes() -> ChromSizes {
        ChromSizes::from_pairs([("chr1", 1000)])
    }

    #[test]
    fn test_shifted_region_bounds() {
        let r = Region::new("chr1", 100, 200);
        assert_eq!(
            shifted_region(&r, -100, 1000),
            Some(Region::tagged("chr1", 0, 100, Tag::Shifted))
        );
        assert_eq!(shifted_region(&r, -101, 1000), None);
        assert_eq!(
            shifted_region(&r, 800, 1000),
            Some(Region::tagged("chr1", 900, 1000, Tag::Shifted))
        );
        assert_eq!(shifted_region(&r, 801, 1000), None);
    }

    #[test]
    fn test_shift_fixed_offset() {
        let mut set = ten_regions();
        let mut rng = StdRng::seed_from_u64(4);
        let outcome = shift_rows(&mut set, &sizes(), &mut rng, &[0, 1], 50.0, 0.0).unwrap();
        assert_eq!(
            outcome,
            ShiftOutcome {
                requested: 2,
                shifted: 2,
                rejected: 0
            }
        );
        let out = set.to_ordered_output();
        assert_eq!(out[0], Region::tagged("chr1", 50, 150, Tag::Shifted));
        assert_eq!(out[1], Region::tagged("chr1", 150, 250, Tag::Shifted));
        assert_eq!(set.len(), 10);
    }

    #[test]
    fn test_shift_rejects_out_of_bounds() {
        let mut set = ten_regions();
        let mut rng = StdRng::seed_from_u64(4);
        // row 9 ends at 1000, any positive shift exits chr1
        let outcome = shift_rows(&mut set, &sizes(), &mut rng, &[9, 0], 10.0, 0.0).unwrap();
        assert_eq!(outcome.shifted, 1);
        assert_eq!(outcome.rejected, 1);
        assert_eq!(outcome.shifted + outcome.rejected, outcome.requested);
        assert_eq!(set.len(), 10);
        assert!(set
            .regions()
            .iter()
            .any(|r| r.start == 900 && r.tag == Tag::Original));
    }

    #[test]
    fn test_shift_rows_dedups() {
        let mut set = ten_regions();
        let mut rng = StdRng::seed_from_u64(4);
        let outcome = shift_rows(&mut set, &sizes(), &mut rng, &[3, 3, 3], 1.0, 0.0).unwrap();
        assert_eq!(outcome.requested, 1);
        assert_eq!(set.len(), 10);
    }

    #[test]
    fn test_shift_unknown_chromosome() {
        let mut set = IntervalSet::load(vec![Region::new("chrZ", 0, 10)]);
        let mut rng = StdRng::seed_from_u64(4);
        let err = shift(&mut set, &sizes(), &mut rng, 1.0, 0.0, 10.0).unwrap_err();
        assert_eq!(
            err,
            BedshiftError::UnknownChromosome {
                chrom: "chrZ".to_string()
            }
        );
        assert_eq!(set.regions()[0].tag, Tag::Original);
    }

    #[test]
    fn test_shift_row_out_of_range() {
        let mut set = ten_regions();
        let mut rng = StdRng::seed_from_u64(4);
        let err = shift_rows(&mut set, &sizes(), &mut rng, &[10], 0.0, 1.0).unwrap_err();
        assert_eq!(err, BedshiftError::RowOutOfRange { row: 10, len: 10 });
    }

    #[test]
    fn test_shift_invalid_rate_and_sizes() {
        let mut set = ten_regions();
        let mut rng = StdRng::seed_from_u64(4);
        assert!(matches!(
            shift(&mut set, &sizes(), &mut rng, 1.2, 0.0, 1.0),
            Err(BedshiftError::InvalidRate { .. })
        ));
        assert!(matches!(
            shift(&mut set, &ChromSizes::new(), &mut rng, 0.2, 0.0, 1.0),
            Err(BedshiftError::MissingChromosomeLengths { .. })
        ));
        assert!(matches!(
            shift(&mut set, &sizes(), &mut rng, 0.2, 0.0, -1.0),
            Err(BedshiftError::InvalidDistribution { .. })
        ));
    }

    #[test]
    fn test_shift_from_regions_insufficient() {
        let mut set = ten_regions();
        let source = vec![Region::new("chr1", 10, 20)];
        let mut rng = StdRng::seed_from_u64(4);
        let err =
            shift_from_regions(&mut set, &sizes(), &mut rng, &source, 0.5, 0.0, 1.0).unwrap_err();
        assert_eq!(
            err,
            BedshiftError::InsufficientOverlap {
                operation: "shift".to_string(),
                requested: 5,
                available: 1,
            }
        );
        assert!(set.regions().iter().all(|r| r.tag == Tag::Original));
    }

    #[test]
    fn test_shift_from_regions_only_overlapping() {
        let mut set = ten_regions();
        let source = vec![Region::new("chr1", 150, 350)];
        let mut rng = StdRng::seed_from_u64(4);
        let outcome =
            shift_from_regions(&mut set, &sizes(), &mut rng, &source, 0.3, 5.0, 0.0).unwrap();
        assert_eq!(outcome.shifted, 3);
        let shifted: Vec<_> = set
            .to_ordered_output()
            .into_iter()
            .filter(|r| r.tag == Tag::Shifted)
            .map(|r| r.start)
            .collect();
        assert_eq!(shifted, vec![105, 205, 305]);
    }

    #[test]
    fn test_shift_from_regions_no_overlap() {
        let mut set = ten_regions();
        let source = vec![Region::new("chr2", 150, 350)];
        let mut rng = StdRng::seed_from_u64(4);
        let err =
            shift_from_regions(&mut set, &sizes(), &mut rng, &source, 0.3, 5.0, 0.0).unwrap_err();
        assert!(matches!(err, BedshiftError::NoOverlapFound { .. }));
    }
}
