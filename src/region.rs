//! Genomic regions and perturbation tags
//!
//! A [`Region`] is a half-open interval `[start, end)` on one chromosome,
//! plus a [`Tag`] recording which perturbation (if any) produced it.
//! Regions are never edited in place: operators build new values.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Which perturbation produced a region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Tag {
    /// Untouched input region
    #[default]
    Original,
    /// Added by `add` or `add_from_file`
    Added,
    /// Moved by `shift`
    Shifted,
    /// One half of a `cut`
    Cut,
    /// Product of a `merge`
    Merged,
}

impl Tag {
    /// Single-character code written to the fourth BED column
    ///
    /// # Examples
    ///
    /// ```
    /// use ferro_bedshift::Tag;
    ///
    /// assert_eq!(Tag::Original.code(), '-');
    /// assert_eq!(Tag::Shifted.code(), 'S');
    /// ```
    pub fn code(&self) -> char {
        match self {
            Tag::Original => '-',
            Tag::Added => 'A',
            Tag::Shifted => 'S',
            Tag::Cut => 'C',
            Tag::Merged => 'M',
        }
    }

    /// Parse a tag from its single-character code
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "-" => Some(Tag::Original),
            "A" => Some(Tag::Added),
            "S" => Some(Tag::Shifted),
            "C" => Some(Tag::Cut),
            "M" => Some(Tag::Merged),
            _ => None,
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Tag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tag::from_code(s).ok_or_else(|| format!("unknown region tag '{}'", s))
    }
}

/// One genomic interval
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Region {
    /// Chromosome (contig) name
    pub chrom: String,
    /// Start position (0-based, inclusive)
    pub start: u64,
    /// End position (0-based, exclusive)
    pub end: u64,
    /// Perturbation that produced this region
    pub tag: Tag,
}

impl Region {
    /// Create an untouched region
    pub fn new(chrom: impl Into<String>, start: u64, end: u64) -> Self {
        Self {
            chrom: chrom.into(),
            start,
            end,
            tag: Tag::Original,
        }
    }

    /// Create a region carrying `tag`
    pub fn tagged(chrom: impl Into<String>, start: u64, end: u64, tag: Tag) -> Self {
        Self {
            chrom: chrom.into(),
            start,
            end,
            tag,
        }
    }

    /// Copy of this region with a different tag
    pub fn with_tag(&self, tag: Tag) -> Self {
        Self {
            chrom: self.chrom.clone(),
            start: self.start,
            end: self.end,
            tag,
        }
    }

    /// Number of bases covered (0 for degenerate regions)
    pub fn width(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    /// Half-open overlap test: same chromosome and `start < other.end && other.start < end`
    ///
    /// # Examples
    ///
    /// ```
    /// use ferro_bedshift::Region;
    ///
    /// let a = Region::new("chr1", 100, 200);
    /// assert!(a.overlaps(&Region::new("chr1", 199, 300)));
    /// assert!(!a.overlaps(&Region::new("chr1", 200, 300)));
    /// assert!(!a.overlaps(&Region::new("chr2", 150, 160)));
    /// ```
    pub fn overlaps(&self, other: &Region) -> bool {
        self.chrom == other.chrom && self.start < other.end && other.start < self.end
    }

    /// Ordering by (chromosome, start, end), ignoring the tag
    pub fn cmp_position(&self, other: &Region) -> Ordering {
        self.chrom
            .cmp(&other.chrom)
            .then(self.start.cmp(&other.start))
            .then(self.end.cmp(&other.end))
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}\t{}\t{}", self.chrom, self.start, self.end, self.tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_codes_roundtrip() {
        for tag in [Tag::Original, Tag::Added, Tag::Shifted, Tag::Cut, Tag::Merged] {
            assert_eq!(Tag::from_code(&tag.code().to_string()), Some(tag));
        }
        assert_eq!(Tag::from_code("X"), None);
        assert!("Z".parse::<Tag>().is_err());
    }

    #[test]
    fn test_default_tag() {
        assert_eq!(Tag::default(), Tag::Original);
        assert_eq!(Region::new("chr1", 0, 10).tag, Tag::Original);
    }

    #[test]
    fn test_overlap_half_open() {
        let a = Region::new("chr1", 10, 20);
        assert!(a.overlaps(&Region::new("chr1", 0, 11)));
        assert!(a.overlaps(&Region::new("chr1", 15, 16)));
        assert!(a.overlaps(&Region::new("chr1", 0, 100)));
        assert!(!a.overlaps(&Region::new("chr1", 0, 10)));
        assert!(!a.overlaps(&Region::new("chr1", 20, 30)));
    }

    #[test]
    fn test_overlap_degenerate() {
        let point = Region::new("chr1", 15, 15);
        assert!(!point.overlaps(&Region::new("chr1", 10, 20)));
    }

    #[test]
    fn test_cmp_position_ignores_tag() {
        let a = Region::tagged("chr1", 5, 10, Tag::Cut);
        let b = Region::tagged("chr1", 5, 10, Tag::Added);
        assert_eq!(a.cmp_position(&b), Ordering::Equal);
        assert_eq!(
            Region::new("chr1", 5, 10).cmp_position(&Region::new("chr2", 0, 1)),
            Ordering::Less
        );
        assert_eq!(
            Region::new("chr1", 5, 11).cmp_position(&Region::new("chr1", 5, 10)),
            Ordering::Greater
        );
    }

    #[test]
    fn test_width() {
        assert_eq!(Region::new("chr1", 5, 10).width(), 5);
        assert_eq!(Region::new("chr1", 10, 5).width(), 0);
    }

    #[test]
    fn test_display() {
        let r = Region::tagged("chr2", 1, 9, Tag::Merged);
        assert_eq!(r.to_string(), "chr2\t1\t9\tM");
    }
}
