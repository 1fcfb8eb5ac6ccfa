//! Fixed-order perturbation pipeline.
//!
//! Stages run as shift, add, cut, merge, drop. The order is part of the
//! reproducibility contract: every stage draws from the engine's single
//! generator, so reordering would change the output for a given seed.

use crate::engine::Bedshift;
use crate::error::BedshiftError;
use crate::perturb::{normal, validate_add_rate, validate_rate};
use rand::Rng;
use serde::Serialize;
use std::path::PathBuf;

/// Default mean length of added regions
pub const DEFAULT_ADD_MEAN: f64 = 320.0;
/// Default standard deviation of added region lengths
pub const DEFAULT_ADD_STDEV: f64 = 30.0;
/// Default mean shift distance
pub const DEFAULT_SHIFT_MEAN: f64 = 0.0;
/// Default standard deviation of shift distances
pub const DEFAULT_SHIFT_STDEV: f64 = 150.0;

/// How the add stage picks regions
#[derive(Debug, Clone, PartialEq)]
pub enum AddSpec {
    /// Random regions with normally distributed lengths
    Parametric { rate: f64, mean: f64, stdev: f64 },
    /// Regions sampled from a BED file
    FromFile { path: PathBuf, rate: f64 },
}

impl AddSpec {
    /// Rate of this stage.
    pub fn rate(&self) -> f64 {
        match self {
            AddSpec::Parametric { rate, .. } | AddSpec::FromFile { rate, .. } => *rate,
        }
    }
}

impl Default for AddSpec {
    fn default() -> Self {
        AddSpec::Parametric {
            rate: 0.0,
            mean: DEFAULT_ADD_MEAN,
            stdev: DEFAULT_ADD_STDEV,
        }
    }
}

/// How the shift stage picks rows
#[derive(Debug, Clone, PartialEq)]
pub enum ShiftSpec {
    /// Any row may be shifted
    Parametric { rate: f64, mean: f64, stdev: f64 },
    /// Only rows overlapping a BED file are shifted
    FromFile {
        path: PathBuf,
        rate: f64,
        mean: f64,
        stdev: f64,
    },
}

impl ShiftSpec {
    /// Rate of this stage.
    pub fn rate(&self) -> f64 {
        match self {
            ShiftSpec::Parametric { rate, .. } | ShiftSpec::FromFile { rate, .. } => *rate,
        }
    }
}

impl Default for ShiftSpec {
    fn default() -> Self {
        ShiftSpec::Parametric {
            rate: 0.0,
            mean: DEFAULT_SHIFT_MEAN,
            stdev: DEFAULT_SHIFT_STDEV,
        }
    }
}

/// How the drop stage picks rows
#[derive(Debug, Clone, PartialEq)]
pub enum DropSpec {
    /// Any row may be dropped
    Parametric { rate: f64 },
    /// Only rows overlapping a BED file are dropped
    FromFile { path: PathBuf, rate: f64 },
}

impl DropSpec {
    /// Rate of this stage.
    pub fn rate(&self) -> f64 {
        match self {
            DropSpec::Parametric { rate } | DropSpec::FromFile { rate, .. } => *rate,
        }
    }
}

impl Default for DropSpec {
    fn default() -> Self {
        DropSpec::Parametric { rate: 0.0 }
    }
}

/// Parameters of all five stages
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerturbConfig {
    pub shift: ShiftSpec,
    pub add: AddSpec,
    pub cut_rate: f64,
    pub merge_rate: f64,
    pub drop: DropSpec,
}

impl PerturbConfig {
    /// Check every rate and distribution before anything runs.
    ///
    /// Stages with a rate of 0 are not checked beyond their rate.
    pub fn validate(&self) -> Result<(), BedshiftError> {
        let (rate, mean, stdev) = match &self.shift {
            ShiftSpec::Parametric { rate, mean, stdev }
            | ShiftSpec::FromFile {
                rate, mean, stdev, ..
            } => (*rate, *mean, *stdev),
        };
        validate_rate("shift", rate)?;
        if rate > 0.0 {
            normal("shift", mean, stdev)?;
        }

        validate_add_rate("add", self.add.rate())?;
        if let AddSpec::Parametric { rate, mean, stdev } = &self.add {
            if *rate > 0.0 {
                normal("add", *mean, *stdev)?;
            }
        }

        validate_rate("cut", self.cut_rate)?;
        validate_rate("merge", self.merge_rate)?;
        validate_rate("drop", self.drop.rate())?;
        Ok(())
    }

    /// Whether any stage needs chromosome lengths.
    pub fn needs_chrom_sizes(&self) -> bool {
        self.shift.rate() > 0.0 || matches!(self.add, AddSpec::Parametric { rate, .. } if rate > 0.0)
    }
}

/// Per-stage counts from one pipeline run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PipelineReport {
    pub shifted: usize,
    /// Shift candidates skipped at chromosome boundaries
    pub shift_rejected: usize,
    pub added: usize,
    pub cut: usize,
    pub merged: usize,
    pub dropped: usize,
}

impl PipelineReport {
    /// Total number of regions changed.
    pub fn total(&self) -> usize {
        self.shifted + self.added + self.cut + self.merged + self.dropped
    }
}

/// Run shift, add, cut, merge and drop in that order.
///
/// The whole configuration is validated first. A stage whose rate is 0 is
/// skipped without reading its file or drawing from the generator.
pub fn run_all<R: Rng>(
    bedshift: &mut Bedshift<R>,
    config: &PerturbConfig,
) -> Result<PipelineReport, BedshiftError> {
    config.validate()?;
    let mut report = PipelineReport::default();

    let shift = match &config.shift {
        ShiftSpec::Parametric { rate, .. } | ShiftSpec::FromFile { rate, .. } if *rate == 0.0 => {
            Default::default()
        }
        ShiftSpec::Parametric { rate, mean, stdev } => bedshift.shift(*rate, *mean, *stdev)?,
        ShiftSpec::FromFile {
            path,
            rate,
            mean,
            stdev,
        } => bedshift.shift_from_file(path, *rate, *mean, *stdev)?,
    };
    report.shifted = shift.shifted;
    report.shift_rejected = shift.rejected;

    report.added = match &config.add {
        AddSpec::Parametric { rate, .. } | AddSpec::FromFile { rate, .. } if *rate == 0.0 => 0,
        AddSpec::Parametric { rate, mean, stdev } => bedshift.add(*rate, *mean, *stdev)?,
        AddSpec::FromFile { path, rate } => bedshift.add_from_file(path, *rate)?,
    };

    report.cut = bedshift.cut(config.cut_rate)?;
    report.merged = bedshift.merge(config.merge_rate)?;

    report.dropped = match &config.drop {
        DropSpec::Parametric { rate } | DropSpec::FromFile { rate, .. } if *rate == 0.0 => 0,
        DropSpec::Parametric { rate } => bedshift.drop(*rate)?,
        DropSpec::FromFile { path, rate } => bedshift.drop_from_file(path, *rate)?,
    };

    tracing::info!(
        shifted = report.shifted,
        added = report.added,
        cut = report.cut,
        merged = report.merged,
        dropped = report.dropped,
        "{} regions changed in total",
        report.total()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chrom_sizes::ChromSizes;
    use crate::region::Region;

    fn engine(seed: u64) -> Bedshift {
        let regions = (0..10)
            .map(|i| Region::new("chr1", i * 100, (i + 1) * 100))
            .collect();
        Bedshift::with_seed(regions, ChromSizes::from_pairs([("chr1", 1000)]), seed)
    }

    #[test]
    fn test_default_config_is_noop() {
        let mut b = engine(1);
        let report = run_all(&mut b, &PerturbConfig::default()).unwrap();
        assert_eq!(report.total(), 0);
        assert_eq!(b.len(), 10);
    }

    #[test]
    fn test_validate_rejects_before_running() {
        let mut b = engine(1);
        let config = PerturbConfig {
            cut_rate: 0.5,
            drop: DropSpec::Parametric { rate: 1.5 },
            ..Default::default()
        };
        assert!(matches!(
            run_all(&mut b, &config),
            Err(BedshiftError::InvalidRate { .. })
        ));
        // cut did not run
        assert_eq!(b.len(), 10);
    }

    #[test]
    fn test_validate_shift_distribution() {
        let config = PerturbConfig {
            shift: ShiftSpec::FromFile {
                path: PathBuf::from("peaks.bed"),
                rate: 0.5,
                mean: 0.0,
                stdev: -1.0,
            },
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(BedshiftError::InvalidDistribution { .. })
        ));

        // a zero-rate stage is not checked beyond its rate
        let config = PerturbConfig {
            shift: ShiftSpec::Parametric {
                rate: 0.0,
                mean: 0.0,
                stdev: -1.0,
            },
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_rate_file_stage_not_read() {
        let mut b = engine(1);
        let config = PerturbConfig {
            drop: DropSpec::FromFile {
                path: PathBuf::from("/nonexistent.bed"),
                rate: 0.0,
            },
            ..Default::default()
        };
        assert_eq!(run_all(&mut b, &config).unwrap().total(), 0);
    }

    #[test]
    fn test_needs_chrom_sizes() {
        assert!(!PerturbConfig::default().needs_chrom_sizes());
        let config = PerturbConfig {
            add: AddSpec::FromFile {
                path: PathBuf::from("x.bed"),
                rate: 0.5,
            },
            ..Default::default()
        };
        assert!(!config.needs_chrom_sizes());
        let config = PerturbConfig {
            shift: ShiftSpec::Parametric {
                rate: 0.1,
                mean: 0.0,
                stdev: 1.0,
            },
            ..Default::default()
        };
        assert!(config.needs_chrom_sizes());
    }

    #[test]
    fn test_report_total() {
        let report = PipelineReport {
            shifted: 1,
            shift_rejected: 4,
            added: 2,
            cut: 3,
            merged: 4,
            dropped: 5,
        };
        assert_eq!(report.total(), 15);
    }
}
