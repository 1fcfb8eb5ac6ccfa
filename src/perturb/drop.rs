//! Drop regions.

use super::{sample_rows, target_count, validate_rate};
use crate::error::BedshiftError;
use crate::interval_set::IntervalSet;
use crate::overlap::OverlapResolver;
use crate::region::Region;
use rand::Rng;

/// Remove `floor(rows * rate)` rows sampled without replacement.
pub fn drop<R: Rng + ?Sized>(
    set: &mut IntervalSet,
    rng: &mut R,
    rate: f64,
) -> Result<usize, BedshiftError> {
    validate_rate("drop", rate)?;
    if rate == 0.0 {
        return Ok(0);
    }

    let rows = sample_rows(rng, set.len(), target_count(set.len(), rate));
    set.replace_rows(&rows, Vec::new());
    tracing::debug!(dropped = rows.len(), "dropped regions");
    Ok(rows.len())
}

/// Remove `floor(rows * rate)` rows chosen among those overlapping `source`.
///
/// The count is first clamped to the size of `source`. Fails with
/// [`BedshiftError::NoOverlapFound`] when nothing overlaps and with
/// [`BedshiftError::InsufficientOverlap`] when fewer rows overlap than
/// the clamped count.
pub fn drop_from_regions<R: Rng + ?Sized>(
    set: &mut IntervalSet,
    rng: &mut R,
    source: &[Region],
    rate: f64,
) -> Result<usize, BedshiftError> {
    validate_rate("drop", rate)?;
    if rate == 0.0 {
        return Ok(0);
    }

    let mut count = target_count(set.len(), rate);
    if count > source.len() {
        tracing::warn!(
            requested = count,
            available = source.len(),
            "Number of regions to be dropped ({}) is larger than the provided bedfile size ({}). \
             Dropping {} regions.",
            count,
            source.len(),
            source.len()
        );
        count = source.len();
    }

    set.sort();
    let overlapping = OverlapResolver::new(source).resolve(set.regions())?;
    if count > overlapping.len() {
        return Err(BedshiftError::InsufficientOverlap {
            operation: "drop".to_string(),
            requested: count,
            available: overlapping.len(),
        });
    }

    let rows: Vec<usize> = sample_rows(rng, overlapping.len(), count)
        .into_iter()
        .map(|i| overlapping[i])
        .collect();
    set.replace_rows(&rows, Vec::new());
    tracing::debug!(dropped = count, "dropped overlapping regions");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ten_regions() -> IntervalSet {
        IntervalSet::load((0..10).map(|i| Region::new("chr1", i * 100, (i + 1) * 100)))
    }

    #[test]
    fn test_drop_exact_count() {
        let mut set = ten_regions();
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(drop(&mut set, &mut rng, 0.2).unwrap(), 2);
        assert_eq!(set.len(), 8);
    }

    #[test]
    fn test_drop_everything() {
        let mut set = ten_regions();
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(drop(&mut set, &mut rng, 1.0).unwrap(), 10);
        assert!(set.is_empty());
    }

    #[test]
    fn test_drop_from_regions() {
        let mut set = ten_regions();
        let source = vec![Region::new("chr1", 0, 250), Region::new("chr1", 900, 950)];
        let mut rng = StdRng::seed_from_u64(0);
        // 10 * 0.3 = 3, clamped to 2 source regions
        assert_eq!(drop_from_regions(&mut set, &mut rng, &source, 0.3).unwrap(), 2);
        assert_eq!(set.len(), 8);
        // every dropped region overlapped the source
        let resolver = OverlapResolver::new(&source);
        let remaining_overlaps = set.regions().iter().filter(|r| resolver.overlaps(r)).count();
        assert_eq!(remaining_overlaps, 2);
    }

    #[test]
    fn test_drop_from_regions_insufficient() {
        let mut set = ten_regions();
        let source = vec![
            Region::new("chr1", 0, 10),
            Region::new("chr1", 20, 30),
            Region::new("chr1", 40, 50),
        ];
        let mut rng = StdRng::seed_from_u64(0);
        let err = drop_from_regions(&mut set, &mut rng, &source, 0.3).unwrap_err();
        assert_eq!(
            err,
            BedshiftError::InsufficientOverlap {
                operation: "drop".to_string(),
                requested: 3,
                available: 1,
            }
        );
        assert_eq!(set.len(), 10);
    }

    #[test]
    fn test_drop_from_regions_no_overlap() {
        let mut set = ten_regions();
        let source = vec![Region::new("chrX", 0, 1000)];
        let mut rng = StdRng::seed_from_u64(0);
        let err = drop_from_regions(&mut set, &mut rng, &source, 0.1).unwrap_err();
        assert!(matches!(err, BedshiftError::NoOverlapFound { .. }));
    }
}
