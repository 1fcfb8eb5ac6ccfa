//! The perturbation engine.
//!
//! [`Bedshift`] owns the working interval set, the chromosome lengths and
//! the random number generator. Every operator draws from that one
//! generator in call order, so a fixed seed and a fixed sequence of calls
//! reproduce the same output.

use crate::bed::{self, DEFAULT_DELIMITER};
use crate::chrom_sizes::ChromSizes;
use crate::error::BedshiftError;
use crate::interval_set::IntervalSet;
use crate::perturb::{self, ShiftOutcome};
use crate::region::Region;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Perturbs one BED file's regions
#[derive(Debug, Clone)]
pub struct Bedshift<R = StdRng> {
    set: IntervalSet,
    sizes: ChromSizes,
    rng: R,
    delimiter: char,
}

impl Bedshift<StdRng> {
    /// Engine with a generator seeded from `seed`.
    pub fn with_seed(regions: Vec<Region>, sizes: ChromSizes, seed: u64) -> Self {
        Self::with_rng(regions, sizes, StdRng::seed_from_u64(seed))
    }

    /// Engine with a generator seeded from the operating system.
    pub fn from_entropy(regions: Vec<Region>, sizes: ChromSizes) -> Self {
        Self::with_rng(regions, sizes, StdRng::from_entropy())
    }

    /// Read a BED file and optional chrom.sizes file into a new engine.
    ///
    /// Without `seed` the generator is seeded from the operating system.
    pub fn from_files<P: AsRef<Path>>(
        bed_path: P,
        chrom_sizes: Option<&Path>,
        delimiter: char,
        seed: Option<u64>,
    ) -> Result<Self, BedshiftError> {
        let regions = bed::read_bed(bed_path.as_ref(), delimiter)?;
        let sizes = match chrom_sizes {
            Some(path) => ChromSizes::from_file(path)?,
            None => ChromSizes::new(),
        };
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self::with_rng(regions, sizes, rng).delimiter(delimiter))
    }
}

impl<R: Rng> Bedshift<R> {
    /// Engine using the given generator.
    pub fn with_rng(regions: Vec<Region>, sizes: ChromSizes, rng: R) -> Self {
        Self {
            set: IntervalSet::load(regions),
            sizes,
            rng,
            delimiter: DEFAULT_DELIMITER,
        }
    }

    /// Delimiter used when reading files for the `*_from_file` operations.
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// The working interval set.
    pub fn interval_set(&self) -> &IntervalSet {
        &self.set
    }

    /// The working regions, in current order.
    pub fn regions(&self) -> &[Region] {
        self.set.regions()
    }

    /// Chromosome lengths in use.
    pub fn chrom_sizes(&self) -> &ChromSizes {
        &self.sizes
    }

    /// Number of working regions.
    pub fn len(&self) -> usize {
        self.set.len()
    }

    /// Whether the working set is empty.
    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// Number of regions originally loaded.
    pub fn original_len(&self) -> usize {
        self.set.original_len()
    }

    /// Undo every perturbation. The generator is not rewound.
    pub fn reset(&mut self) {
        self.set.reset();
    }

    /// Working regions sorted by (chromosome, start, end).
    pub fn to_ordered_output(&self) -> Vec<Region> {
        self.set.to_ordered_output()
    }

    /// Add random regions; see [`perturb::add`].
    pub fn add(&mut self, rate: f64, mean: f64, stdev: f64) -> Result<usize, BedshiftError> {
        perturb::add(&mut self.set, &self.sizes, &mut self.rng, rate, mean, stdev)
    }

    /// Add regions sampled from a BED file.
    pub fn add_from_file<P: AsRef<Path>>(&mut self, path: P, rate: f64) -> Result<usize, BedshiftError> {
        let source = bed::read_bed(path, self.delimiter)?;
        self.add_from_regions(&source, rate)
    }

    /// Add regions sampled from `source`; see [`perturb::add_from_regions`].
    pub fn add_from_regions(&mut self, source: &[Region], rate: f64) -> Result<usize, BedshiftError> {
        perturb::add_from_regions(&mut self.set, &mut self.rng, source, rate)
    }

    /// Shift random rows; see [`perturb::shift`].
    pub fn shift(&mut self, rate: f64, mean: f64, stdev: f64) -> Result<ShiftOutcome, BedshiftError> {
        perturb::shift(&mut self.set, &self.sizes, &mut self.rng, rate, mean, stdev)
    }

    /// Shift the given rows; see [`perturb::shift_rows`].
    pub fn shift_rows(
        &mut self,
        rows: &[usize],
        mean: f64,
        stdev: f64,
    ) -> Result<ShiftOutcome, BedshiftError> {
        perturb::shift_rows(&mut self.set, &self.sizes, &mut self.rng, rows, mean, stdev)
    }

    /// Shift rows overlapping the regions of a BED file.
    pub fn shift_from_file<P: AsRef<Path>>(
        &mut self,
        path: P,
        rate: f64,
        mean: f64,
        stdev: f64,
    ) -> Result<ShiftOutcome, BedshiftError> {
        let source = bed::read_bed(path, self.delimiter)?;
        self.shift_from_regions(&source, rate, mean, stdev)
    }

    /// Shift rows overlapping `source`; see [`perturb::shift_from_regions`].
    pub fn shift_from_regions(
        &mut self,
        source: &[Region],
        rate: f64,
        mean: f64,
        stdev: f64,
    ) -> Result<ShiftOutcome, BedshiftError> {
        perturb::shift_from_regions(
            &mut self.set,
            &self.sizes,
            &mut self.rng,
            source,
            rate,
            mean,
            stdev,
        )
    }

    /// Cut random rows in two; see [`perturb::cut`].
    pub fn cut(&mut self, rate: f64) -> Result<usize, BedshiftError> {
        perturb::cut(&mut self.set, &mut self.rng, rate)
    }

    /// Merge random rows with their successor; see [`perturb::merge`].
    pub fn merge(&mut self, rate: f64) -> Result<usize, BedshiftError> {
        perturb::merge(&mut self.set, &mut self.rng, rate)
    }

    /// Drop random rows; see [`perturb::drop()`].
    pub fn drop(&mut self, rate: f64) -> Result<usize, BedshiftError> {
        perturb::drop(&mut self.set, &mut self.rng, rate)
    }

    /// Drop rows overlapping the regions of a BED file.
    pub fn drop_from_file<P: AsRef<Path>>(&mut self, path: P, rate: f64) -> Result<usize, BedshiftError> {
        let source = bed::read_bed(path, self.delimiter)?;
        self.drop_from_regions(&source, rate)
    }

    /// Drop rows overlapping `source`; see [`perturb::drop_from_regions`].
    pub fn drop_from_regions(&mut self, source: &[Region], rate: f64) -> Result<usize, BedshiftError> {
        perturb::drop_from_regions(&mut self.set, &mut self.rng, source, rate)
    }

    /// Write the sorted working set to a BED file.
    pub fn write_bed<P: AsRef<Path>>(&self, path: P) -> Result<(), BedshiftError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| BedshiftError::Io {
                msg: format!("Failed to create directory {}: {}", parent.display(), e),
            })?;
        }
        let file = File::create(path).map_err(|e| BedshiftError::Io {
            msg: format!("Failed to create {}: {}", path.display(), e),
        })?;
        let mut writer = BufWriter::new(file);
        bed::write_bed(&mut writer, &self.to_ordered_output())?;

        tracing::info!(
            "The output bedfile located in {} has {} regions. The original bedfile had {} regions.",
            path.display(),
            self.len(),
            self.original_len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::Tag;

    fn engine(seed: u64) -> Bedshift {
        let regions = (0..10)
            .map(|i| Region::new("chr1", i * 100, (i + 1) * 100))
            .collect();
        Bedshift::with_seed(regions, ChromSizes::from_pairs([("chr1", 1000)]), seed)
    }

    #[test]
    fn test_reset_restores_original() {
        let mut b = engine(1);
        b.cut(0.5).unwrap();
        b.drop(0.5).unwrap();
        assert_ne!(b.len(), 10);
        b.reset();
        assert_eq!(b.len(), 10);
        assert!(b.regions().iter().all(|r| r.tag == Tag::Original));
    }

    #[test]
    fn test_same_seed_same_output() {
        let run = |seed| {
            let mut b = engine(seed);
            b.shift(0.5, 0.0, 30.0).unwrap();
            b.add(0.5, 50.0, 10.0).unwrap();
            b.cut(0.3).unwrap();
            b.to_ordered_output()
        };
        assert_eq!(run(7), run(7));
    }

    #[test]
    fn test_write_bed_sorted() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("out.bed");
        let mut b = engine(3);
        b.add(0.3, 20.0, 0.0).unwrap();
        b.write_bed(&path).unwrap();

        let written = bed::read_bed(&path, '\t').unwrap();
        assert_eq!(written.len(), 13);
        assert!(written.windows(2).all(|w| w[0].cmp_position(&w[1]).is_le()));
        assert_eq!(written.iter().filter(|r| r.tag == Tag::Added).count(), 3);
    }
}
