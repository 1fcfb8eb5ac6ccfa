//! Output formatting utilities for CLI operations

use crate::error::BedshiftError;
use crate::pipeline::PipelineReport;
use crate::workflow::WorkflowReport;
use serde::Serialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Output format for run summaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Plain text format (default)
    #[default]
    Text,
    /// One JSON object per replicate
    Json,
}

impl FromStr for OutputFormat {
    type Err = BedshiftError;

    /// Parse an output format from a string
    ///
    /// # Examples
    ///
    /// ```
    /// use ferro_bedshift::cli::OutputFormat;
    /// use std::str::FromStr;
    ///
    /// assert_eq!(OutputFormat::from_str("json").unwrap(), OutputFormat::Json);
    /// assert_eq!(OutputFormat::from_str("Text").unwrap(), OutputFormat::Text);
    /// assert!(OutputFormat::from_str("vcf").is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(BedshiftError::Config {
                msg: format!("Unknown summary format '{}', expected text or json", other),
            }),
        }
    }
}

/// Counts recorded for one replicate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplicateSummary {
    /// 1-based replicate number
    pub replicate: usize,
    /// Total regions changed
    pub changed: usize,
    pub output: PathBuf,
    /// Regions written
    pub regions: usize,
    /// Regions in the input
    pub original_regions: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pipeline: Option<PipelineReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow: Option<WorkflowReport>,
}

/// Write a replicate summary to the output
///
/// # Examples
///
/// ```
/// use ferro_bedshift::cli::{write_summary, OutputFormat, ReplicateSummary};
/// use std::io::Cursor;
/// use std::path::PathBuf;
///
/// let summary = ReplicateSummary {
///     replicate: 1,
///     changed: 2,
///     output: PathBuf::from("out.bed"),
///     regions: 8,
///     original_regions: 10,
///     pipeline: None,
///     workflow: None,
/// };
/// let mut buffer = Cursor::new(Vec::new());
/// write_summary(&mut buffer, &summary, OutputFormat::Text).unwrap();
/// let result = String::from_utf8(buffer.into_inner()).unwrap();
/// assert!(result.contains("2 regions changed"));
/// ```
pub fn write_summary<W: Write>(
    writer: &mut W,
    summary: &ReplicateSummary,
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer(&mut *writer, summary)?;
            writeln!(writer)
        }
        OutputFormat::Text => writeln!(
            writer,
            "Replicate {}: {} regions changed. The output bedfile located in {} has {} regions. \
             The original bedfile had {} regions.",
            summary.replicate,
            summary.changed,
            summary.output.display(),
            summary.regions,
            summary.original_regions
        ),
    }
}

/// Default output path for a BED file: `bedshifted_<basename>`
///
/// # Examples
///
/// ```
/// use ferro_bedshift::cli::default_output_path;
/// use std::path::{Path, PathBuf};
///
/// assert_eq!(
///     default_output_path(Path::new("data/peaks.bed")),
///     PathBuf::from("bedshifted_peaks.bed")
/// );
/// ```
pub fn default_output_path(bedfile: &Path) -> PathBuf {
    let name = bedfile
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    PathBuf::from(format!("bedshifted_{}", name))
}

/// Output path of replicate `replicate`: `rep<i>_<basename>` beside `output`
///
/// # Examples
///
/// ```
/// use ferro_bedshift::cli::replicate_output_path;
/// use std::path::{Path, PathBuf};
///
/// assert_eq!(
///     replicate_output_path(Path::new("out/shifted.bed"), 3),
///     PathBuf::from("out/rep3_shifted.bed")
/// );
/// ```
pub fn replicate_output_path(output: &Path, replicate: usize) -> PathBuf {
    let name = output
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = format!("rep{}_{}", replicate, name);
    match output.parent() {
        Some(parent) => parent.join(file_name),
        None => PathBuf::from(file_name),
    }
}
