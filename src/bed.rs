//! BED reading and writing.
//!
//! Only the first three columns (chromosome, start, end) are kept. A fourth
//! column holding a region tag code (as written by [`write_bed`]) is read
//! back as the tag; any other extra columns are discarded.

use crate::error::BedshiftError;
use crate::region::{Region, Tag};
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;

/// Default BED column delimiter
pub const DEFAULT_DELIMITER: char = '\t';

/// Read a BED file (plain or `.gz`) from a path.
pub fn read_bed<P: AsRef<Path>>(path: P, delimiter: char) -> Result<Vec<Region>, BedshiftError> {
    let path = path.as_ref();
    let source = path.display().to_string();
    let file = File::open(path)
        .map_err(|e| BedshiftError::unreadable(&source, format!("failed to open: {}", e)))?;

    let regions = if source.ends_with(".gz") {
        parse_bed(MultiGzDecoder::new(file), delimiter, &source)?
    } else {
        parse_bed(file, delimiter, &source)?
    };

    tracing::debug!(path = %source, regions = regions.len(), "read BED file");
    Ok(regions)
}

/// Parse BED content from a reader.
///
/// Skips blank lines, `#` comments and `track`/`browser` lines. The first
/// data line is treated as a header and skipped when its start column is
/// not an integer.
pub fn parse_bed<R: Read>(
    reader: R,
    delimiter: char,
    source: &str,
) -> Result<Vec<Region>, BedshiftError> {
    let mut regions = Vec::new();
    let mut seen_data = false;

    for (i, line_result) in BufReader::new(reader).lines().enumerate() {
        let line_num = i + 1;
        let line = line_result.map_err(|e| {
            BedshiftError::unreadable(source, format!("failed to read line {}: {}", line_num, e))
        })?;

        let line = line.trim_end_matches(['\r', '\n']);
        if is_skippable(line) {
            continue;
        }

        let fields: Vec<&str> = split_fields(line, delimiter);
        let is_first = !seen_data;
        seen_data = true;

        if is_first && fields.len() > 1 && !is_all_digits(fields[1].trim()) {
            // header row
            continue;
        }

        regions.push(parse_record(&fields, line_num, source)?);
    }

    Ok(regions)
}

fn is_skippable(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty()
        || trimmed.starts_with('#')
        || starts_with_word(trimmed, "track")
        || starts_with_word(trimmed, "browser")
}

/// `line` begins with `word` followed by whitespace or nothing.
fn starts_with_word(line: &str, word: &str) -> bool {
    line.strip_prefix(word)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
}

fn split_fields(line: &str, delimiter: char) -> Vec<&str> {
    if delimiter.is_whitespace() && delimiter != '\t' {
        line.split_whitespace().collect()
    } else {
        line.split(delimiter).collect()
    }
}

fn is_all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn parse_record(fields: &[&str], line_num: usize, source: &str) -> Result<Region, BedshiftError> {
    if fields.len() < 3 {
        return Err(BedshiftError::unreadable(
            source,
            format!(
                "expected at least 3 columns at line {}, got {}",
                line_num,
                fields.len()
            ),
        ));
    }

    let chrom = fields[0].trim();
    if chrom.is_empty() {
        return Err(BedshiftError::unreadable(
            source,
            format!("empty chromosome at line {}", line_num),
        ));
    }

    let start = parse_coordinate(fields[1], "start", line_num, source)?;
    let end = parse_coordinate(fields[2], "end", line_num, source)?;
    let tag = fields
        .get(3)
        .and_then(|code| Tag::from_code(code.trim()))
        .unwrap_or_default();

    Ok(Region::tagged(chrom, start, end, tag))
}

fn parse_coordinate(
    field: &str,
    column: &str,
    line_num: usize,
    source: &str,
) -> Result<u64, BedshiftError> {
    field.trim().parse::<u64>().map_err(|_| {
        BedshiftError::unreadable(
            source,
            format!("invalid {} '{}' at line {}", column, field.trim(), line_num),
        )
    })
}

/// Write regions as tab-separated `chrom start end tag` lines.
pub fn write_bed<W: Write>(writer: &mut W, regions: &[Region]) -> Result<(), BedshiftError> {
    for region in regions {
        writeln!(writer, "{}", region)?;
    }
    writer.flush()?;
    Ok(())
}
