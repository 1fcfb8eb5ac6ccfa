//! Working and pristine collections of regions.
//!
//! The working set is a plain arena of [`Region`]s addressed by row index.
//! Operators compute which rows to remove and which regions to append, then
//! apply both in one [`IntervalSet::replace_rows`] call.

use crate::region::{Region, Tag};
use std::collections::HashSet;

/// Regions under perturbation plus the untouched input
#[derive(Debug, Clone, Default)]
pub struct IntervalSet {
    regions: Vec<Region>,
    original: Vec<Region>,
}

impl IntervalSet {
    /// Load rows: sort by (chromosome, start, end) and tag everything Original.
    pub fn load(rows: impl IntoIterator<Item = Region>) -> Self {
        let mut regions: Vec<Region> = rows
            .into_iter()
            .map(|r| Region {
                tag: Tag::Original,
                ..r
            })
            .collect();
        sort_regions(&mut regions);
        Self {
            original: regions.clone(),
            regions,
        }
    }

    /// Restore the working set to the loaded input.
    pub fn reset(&mut self) {
        self.regions = self.original.clone();
    }

    /// Number of regions in the working set.
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Whether the working set is empty.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// The working set in its current order.
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// The loaded input, sorted.
    pub fn original(&self) -> &[Region] {
        &self.original
    }

    /// Number of regions that were loaded.
    pub fn original_len(&self) -> usize {
        self.original.len()
    }

    /// Region at a row index.
    pub fn get(&self, row: usize) -> Option<&Region> {
        self.regions.get(row)
    }

    /// Restore canonical (chromosome, start, end) order.
    pub fn sort(&mut self) {
        sort_regions(&mut self.regions);
    }

    /// Sorted copy of the working set, ready for output.
    pub fn to_ordered_output(&self) -> Vec<Region> {
        let mut out = self.regions.clone();
        sort_regions(&mut out);
        out
    }

    /// Remove `remove` rows and then append `append`, preserving the relative
    /// order of the surviving rows. Duplicate row indices are ignored.
    pub fn replace_rows(&mut self, remove: &[usize], append: Vec<Region>) {
        if !remove.is_empty() {
            let remove: HashSet<usize> = remove.iter().copied().collect();
            let mut row = 0;
            self.regions.retain(|_| {
                let keep = !remove.contains(&row);
                row += 1;
                keep
            });
        }
        self.regions.extend(append);
    }
}

fn sort_regions(regions: &mut [Region]) {
    regions.sort_by(|a, b| a.cmp_position(b));
}
