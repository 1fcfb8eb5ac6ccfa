//! Overlap resolution between two interval sets.
//!
//! The comparison set is indexed once per chromosome: entries sorted by
//! start, with a running maximum of end. A reference region `[s, e)`
//! overlaps something iff among the comparison entries with `start < e`
//! the largest end exceeds `s`. That is one binary search per query.

use crate::error::BedshiftError;
use crate::region::Region;
use std::collections::HashMap;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Per-chromosome index of comparison intervals
#[derive(Debug, Clone, Default)]
struct ChromIndex {
    /// Starts, ascending
    starts: Vec<u64>,
    /// End of the entry at the same position
    ends: Vec<u64>,
    /// Position of the entry in the comparison set
    order: Vec<usize>,
    /// `max_end[i]` = max of `ends[..=i]`
    max_end: Vec<u64>,
}

impl ChromIndex {
    fn build(mut entries: Vec<(u64, u64, usize)>) -> Self {
        entries.sort_unstable();
        let mut index = ChromIndex::default();
        let mut running = 0;
        for (start, end, order) in entries {
            running = running.max(end);
            index.starts.push(start);
            index.ends.push(end);
            index.order.push(order);
            index.max_end.push(running);
        }
        index
    }

    /// Number of entries whose start is before `end`.
    fn candidates(&self, end: u64) -> usize {
        self.starts.partition_point(|&s| s < end)
    }

    fn overlaps(&self, start: u64, end: u64) -> bool {
        match self.candidates(end) {
            0 => false,
            n => self.max_end[n - 1] > start,
        }
    }

    fn first_match(&self, start: u64, end: u64) -> Option<usize> {
        let n = self.candidates(end);
        (0..n)
            .filter(|&i| self.ends[i] > start)
            .map(|i| self.order[i])
            .min()
    }
}

/// Answers "does this region overlap the comparison set?"
#[derive(Debug, Clone, Default)]
pub struct OverlapResolver {
    by_chrom: HashMap<String, ChromIndex>,
    len: usize,
}

impl OverlapResolver {
    /// Index a comparison set.
    pub fn new(comparison: &[Region]) -> Self {
        let mut grouped: HashMap<String, Vec<(u64, u64, usize)>> = HashMap::new();
        for (i, region) in comparison.iter().enumerate() {
            grouped
                .entry(region.chrom.clone())
                .or_default()
                .push((region.start, region.end, i));
        }

        let by_chrom = grouped
            .into_iter()
            .map(|(chrom, entries)| (chrom, ChromIndex::build(entries)))
            .collect();

        Self {
            by_chrom,
            len: comparison.len(),
        }
    }

    /// Number of regions in the comparison set.
    pub fn comparison_len(&self) -> usize {
        self.len
    }

    /// Whether `region` overlaps at least one comparison region (half-open).
    pub fn overlaps(&self, region: &Region) -> bool {
        self.by_chrom
            .get(&region.chrom)
            .is_some_and(|index| index.overlaps(region.start, region.end))
    }

    /// Index of the first comparison region (in comparison-set order)
    /// that overlaps `region`.
    pub fn first_match(&self, region: &Region) -> Option<usize> {
        self.by_chrom
            .get(&region.chrom)
            .and_then(|index| index.first_match(region.start, region.end))
    }

    /// Row indices of `reference` that overlap the comparison set, ascending.
    ///
    /// Each reference row appears at most once however many comparison
    /// regions it overlaps. An empty result is [`BedshiftError::NoOverlapFound`].
    pub fn resolve(&self, reference: &[Region]) -> Result<Vec<usize>, BedshiftError> {
        let rows = self.matching_rows(reference);
        if rows.is_empty() {
            return Err(BedshiftError::NoOverlapFound {
                reference_regions: reference.len(),
                comparison_regions: self.len,
            });
        }
        Ok(rows)
    }

    #[cfg(not(feature = "parallel"))]
    fn matching_rows(&self, reference: &[Region]) -> Vec<usize> {
        reference
            .iter()
            .enumerate()
            .filter(|(_, region)| self.overlaps(region))
            .map(|(i, _)| i)
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn matching_rows(&self, reference: &[Region]) -> Vec<usize> {
        reference
            .par_iter()
            .enumerate()
            .filter(|(_, region)| self.overlaps(region))
            .map(|(i, _)| i)
            .collect()
    }
}

/// Row indices of `reference` overlapping any region of `comparison`.
///
/// # Examples
///
/// ```
/// use ferro_bedshift::{find_overlaps, Region};
///
/// let reference = vec![Region::new("chr1", 0, 100), Region::new("chr1", 100, 200)];
/// let comparison = vec![Region::new("chr1", 150, 160)];
/// assert_eq!(find_overlaps(&reference, &comparison).unwrap(), vec![1]);
/// ```
pub fn find_overlaps(
    reference: &[Region],
    comparison: &[Region],
) -> Result<Vec<usize>, BedshiftError> {
    OverlapResolver::new(comparison).resolve(reference)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> Vec<Region> {
        (0..10)
            .map(|i| Region::new("chr1", i * 100, (i + 1) * 100))
            .collect()
    }

    #[test]
    fn test_resolve_basic() {
        let comparison = vec![Region::new("chr1", 250, 260), Region::new("chr1", 590, 710)];
        let rows = find_overlaps(&reference(), &comparison).unwrap();
        assert_eq!(rows, vec![2, 5, 6, 7]);
    }

    #[test]
    fn test_touching_is_not_overlap() {
        let comparison = vec![Region::new("chr1", 1000, 1100)];
        let err = find_overlaps(&reference(), &comparison).unwrap_err();
        assert_eq!(
            err,
            BedshiftError::NoOverlapFound {
                reference_regions: 10,
                comparison_regions: 1,
            }
        );
    }

    #[test]
    fn test_other_chromosome_never_matches() {
        let comparison = vec![Region::new("chr2", 0, 1000)];
        assert!(find_overlaps(&reference(), &comparison).is_err());
    }

    #[test]
    fn test_one_row_per_reference_region() {
        let comparison = vec![
            Region::new("chr1", 10, 20),
            Region::new("chr1", 30, 40),
            Region::new("chr1", 0, 100),
        ];
        assert_eq!(find_overlaps(&reference(), &comparison).unwrap(), vec![0]);
    }

    #[test]
    fn test_long_earlier_interval_is_found() {
        // the long interval starts first but ends last
        let comparison = vec![
            Region::new("chr1", 0, 950),
            Region::new("chr1", 10, 20),
            Region::new("chr1", 30, 40),
        ];
        let rows = find_overlaps(&reference(), &comparison).unwrap();
        assert_eq!(rows, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_first_match_uses_comparison_order() {
        let comparison = vec![Region::new("chr1", 50, 60), Region::new("chr1", 0, 100)];
        let resolver = OverlapResolver::new(&comparison);
        assert_eq!(resolver.first_match(&Region::new("chr1", 55, 58)), Some(0));
        assert_eq!(resolver.first_match(&Region::new("chr1", 0, 10)), Some(1));
        assert_eq!(resolver.first_match(&Region::new("chr1", 100, 110)), None);
    }

    #[test]
    fn test_empty_comparison() {
        let resolver = OverlapResolver::new(&[]);
        assert_eq!(resolver.comparison_len(), 0);
        assert!(resolver.resolve(&reference()).is_err());
    }

    #[test]
    fn test_empty_reference() {
        let comparison = vec![Region::new("chr1", 0, 10)];
        assert!(find_overlaps(&[], &comparison).is_err());
    }
}
