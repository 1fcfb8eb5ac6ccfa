//! Declarative multi-step workflows.
//!
//! A workflow is a TOML file listing `[[step]]` tables that run in file
//! order against one [`Bedshift`] engine, bypassing the fixed pipeline
//! order.
//!
//! # Example Workflow
//!
//! ```toml
//! [[step]]
//! operation = "shift_from_file"
//! file = "peaks.bed"
//! rate = 0.3
//! stdev = 100
//!
//! [[step]]
//! operation = "drop"
//! rate = 0.1
//! ```
//!
//! Relative `file` paths resolve against the directory of the workflow
//! file.

use crate::engine::Bedshift;
use crate::error::BedshiftError;
use crate::pipeline::{DEFAULT_ADD_MEAN, DEFAULT_ADD_STDEV, DEFAULT_SHIFT_MEAN, DEFAULT_SHIFT_STDEV};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

fn default_add_mean() -> f64 {
    DEFAULT_ADD_MEAN
}

fn default_add_stdev() -> f64 {
    DEFAULT_ADD_STDEV
}

fn default_shift_mean() -> f64 {
    DEFAULT_SHIFT_MEAN
}

fn default_shift_stdev() -> f64 {
    DEFAULT_SHIFT_STDEV
}

/// One workflow step
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum Step {
    Add {
        rate: f64,
        #[serde(default = "default_add_mean")]
        mean: f64,
        #[serde(default = "default_add_stdev")]
        stdev: f64,
    },
    AddFromFile {
        file: PathBuf,
        rate: f64,
    },
    Shift {
        rate: f64,
        #[serde(default = "default_shift_mean")]
        mean: f64,
        #[serde(default = "default_shift_stdev")]
        stdev: f64,
    },
    ShiftFromFile {
        file: PathBuf,
        rate: f64,
        #[serde(default = "default_shift_mean")]
        mean: f64,
        #[serde(default = "default_shift_stdev")]
        stdev: f64,
    },
    Cut {
        rate: f64,
    },
    Merge {
        rate: f64,
    },
    Drop {
        rate: f64,
    },
    DropFromFile {
        file: PathBuf,
        rate: f64,
    },
}

impl Step {
    /// Operation name as written in the workflow file.
    pub fn name(&self) -> &'static str {
        match self {
            Step::Add { .. } => "add",
            Step::AddFromFile { .. } => "add_from_file",
            Step::Shift { .. } => "shift",
            Step::ShiftFromFile { .. } => "shift_from_file",
            Step::Cut { .. } => "cut",
            Step::Merge { .. } => "merge",
            Step::Drop { .. } => "drop",
            Step::DropFromFile { .. } => "drop_from_file",
        }
    }

    /// External file read by this step, if any.
    pub fn file(&self) -> Option<&Path> {
        match self {
            Step::AddFromFile { file, .. }
            | Step::ShiftFromFile { file, .. }
            | Step::DropFromFile { file, .. } => Some(file),
            _ => None,
        }
    }

    fn file_mut(&mut self) -> Option<&mut PathBuf> {
        match self {
            Step::AddFromFile { file, .. }
            | Step::ShiftFromFile { file, .. }
            | Step::DropFromFile { file, .. } => Some(file),
            _ => None,
        }
    }

    /// Run this step and return the number of regions it changed.
    ///
    /// File steps with a rate of 0 do not read their file.
    pub fn run<R: Rng>(&self, bedshift: &mut Bedshift<R>) -> Result<usize, BedshiftError> {
        match self {
            Step::Add { rate, mean, stdev } => bedshift.add(*rate, *mean, *stdev),
            Step::Shift { rate, mean, stdev } => {
                bedshift.shift(*rate, *mean, *stdev).map(|o| o.shifted)
            }
            Step::Cut { rate } => bedshift.cut(*rate),
            Step::Merge { rate } => bedshift.merge(*rate),
            Step::Drop { rate } => bedshift.drop(*rate),
            Step::AddFromFile { rate, .. }
            | Step::ShiftFromFile { rate, .. }
            | Step::DropFromFile { rate, .. }
                if *rate == 0.0 =>
            {
                Ok(0)
            }
            Step::AddFromFile { file, rate } => bedshift.add_from_file(file, *rate),
            Step::ShiftFromFile {
                file,
                rate,
                mean,
                stdev,
            } => bedshift
                .shift_from_file(file, *rate, *mean, *stdev)
                .map(|o| o.shifted),
            Step::DropFromFile { file, rate } => bedshift.drop_from_file(file, *rate),
        }
    }
}

/// An ordered list of steps
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Workflow {
    #[serde(rename = "step", default)]
    pub steps: Vec<Step>,
}

/// Count for one executed step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepReport {
    pub operation: String,
    pub count: usize,
}

/// Counts from one workflow run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WorkflowReport {
    pub steps: Vec<StepReport>,
    pub total: usize,
}

impl Workflow {
    /// Parse a workflow from TOML content.
    ///
    /// Relative file paths are kept as written.
    pub fn parse(content: &str) -> Result<Self, BedshiftError> {
        let workflow: Workflow = toml::from_str(content)?;
        if workflow.steps.is_empty() {
            return Err(BedshiftError::Config {
                msg: "workflow contains no [[step]] entries".to_string(),
            });
        }
        Ok(workflow)
    }

    /// Load a workflow file, resolving relative step paths against its directory.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, BedshiftError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| BedshiftError::Config {
            msg: format!("Failed to read workflow {}: {}", path.display(), e),
        })?;
        let mut workflow = Self::parse(&content).map_err(|e| match e {
            BedshiftError::Config { msg } => BedshiftError::Config {
                msg: format!("{}: {}", path.display(), msg),
            },
            other => other,
        })?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        for step in &mut workflow.steps {
            if let Some(file) = step.file_mut() {
                if file.is_relative() {
                    *file = base.join(&*file);
                }
            }
        }
        Ok(workflow)
    }

    /// Run every step in order.
    ///
    /// Stops at the first failing step; earlier steps stay applied.
    pub fn run<R: Rng>(&self, bedshift: &mut Bedshift<R>) -> Result<WorkflowReport, BedshiftError> {
        let mut report = WorkflowReport::default();
        for (i, step) in self.steps.iter().enumerate() {
            let count = step.run(bedshift)?;
            tracing::debug!(step = i + 1, operation = step.name(), count, "workflow step done");
            report.steps.push(StepReport {
                operation: step.name().to_string(),
                count,
            });
            report.total += count;
        }
        tracing::info!(steps = report.steps.len(), "{} regions changed in total", report.total);
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chrom_sizes::ChromSizes;
    use crate::region::Region;
    use std::io::Write;

    fn engine() -> Bedshift {
        let regions = (0..10)
            .map(|i| Region::new("chr1", i * 100, (i + 1) * 100))
            .collect();
        Bedshift::with_seed(regions, ChromSizes::from_pairs([("chr1", 1000)]), 5)
    }

    #[test]
    fn test_parse_defaults() {
        let workflow = Workflow::parse(
            r#"
[[step]]
operation = "add"
rate = 0.5

[[step]]
operation = "shift"
rate = 0.1
stdev = 20
"#,
        )
        .unwrap();
        assert_eq!(
            workflow.steps,
            vec![
                Step::Add {
                    rate: 0.5,
                    mean: 320.0,
                    stdev: 30.0
                },
                Step::Shift {
                    rate: 0.1,
                    mean: 0.0,
                    stdev: 20.0
                },
            ]
        );
    }

    #[test]
    fn test_parse_unknown_operation() {
        let err = Workflow::parse("[[step]]\noperation = \"flip\"\nrate = 0.1\n").unwrap_err();
        assert!(matches!(err, BedshiftError::Config { .. }));
    }

    #[test]
    fn test_parse_missing_rate() {
        let err = Workflow::parse("[[step]]\noperation = \"cut\"\n").unwrap_err();
        assert!(matches!(err, BedshiftError::Config { .. }));
    }

    #[test]
    fn test_parse_empty() {
        assert!(Workflow::parse("").is_err());
    }

    #[test]
    fn test_run_counts_per_step() {
        let workflow = Workflow::parse(
            r#"
[[step]]
operation = "cut"
rate = 0.2

[[step]]
operation = "drop"
rate = 0.5
"#,
        )
        .unwrap();
        let mut b = engine();
        let report = workflow.run(&mut b).unwrap();
        assert_eq!(report.steps.len(), 2);
        assert_eq!(report.steps[0].operation, "cut");
        assert_eq!(report.steps[0].count, 2);
        // 12 rows after the cut
        assert_eq!(report.steps[1].count, 6);
        assert_eq!(report.total, 8);
        assert_eq!(b.len(), 6);
    }

    #[test]
    fn test_from_file_resolves_relative_paths() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut bed = fs::File::create(dir.path().join("drop.bed")).unwrap();
        writeln!(bed, "chr1\t0\t250").unwrap();

        let workflow_path = dir.path().join("workflow.toml");
        fs::write(
            &workflow_path,
            "[[step]]\noperation = \"drop_from_file\"\nfile = \"drop.bed\"\nrate = 0.1\n",
        )
        .unwrap();

        let workflow = Workflow::from_file(&workflow_path).unwrap();
        assert_eq!(workflow.steps[0].file(), Some(dir.path().join("drop.bed").as_path()));

        let mut b = engine();
        let report = workflow.run(&mut b).unwrap();
        assert_eq!(report.total, 1);
        assert_eq!(b.len(), 9);
    }
}
