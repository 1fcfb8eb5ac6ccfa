//! Chromosome length map (chrom.sizes)
//!
//! Lengths keep the insertion order of the source file. Weighted chromosome
//! choice walks the entries in that order, so the same seed picks the same
//! chromosomes across runs.

use crate::error::BedshiftError;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// Mapping from chromosome name to length
#[derive(Debug, Clone, Default)]
pub struct ChromSizes {
    /// (name, length) in insertion order
    entries: Vec<(String, u64)>,
    /// Name to position in `entries`
    index: HashMap<String, usize>,
}

impl ChromSizes {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from (name, length) pairs.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        let mut sizes = Self::new();
        for (name, length) in pairs {
            sizes.insert(name, length);
        }
        sizes
    }

    /// Insert or update a chromosome length.
    ///
    /// Updating an existing name keeps its original position.
    pub fn insert(&mut self, name: impl Into<String>, length: u64) {
        let name = name.into();
        match self.index.get(&name) {
            Some(&i) => self.entries[i].1 = length,
            None => {
                self.index.insert(name.clone(), self.entries.len());
                self.entries.push((name, length));
            }
        }
    }

    /// Load a chrom.sizes file from a path.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, BedshiftError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            BedshiftError::unreadable(path.display().to_string(), format!("failed to open: {}", e))
        })?;
        Self::parse(file, &path.display().to_string())
    }

    /// Parse chrom.sizes content from a reader.
    ///
    /// Lines are `name<whitespace>length`; blank lines and `#` comments are skipped.
    pub fn parse<R: Read>(reader: R, source: &str) -> Result<Self, BedshiftError> {
        let mut sizes = Self::new();

        for (i, line_result) in BufReader::new(reader).lines().enumerate() {
            let line_num = i + 1;
            let line = line_result.map_err(|e| {
                BedshiftError::unreadable(source, format!("failed to read line {}: {}", line_num, e))
            })?;

            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut fields = line.split_whitespace();
            let (Some(name), Some(length)) = (fields.next(), fields.next()) else {
                return Err(BedshiftError::unreadable(
                    source,
                    format!("expected name and length at line {}", line_num),
                ));
            };

            let length: u64 = length.parse().map_err(|_| {
                BedshiftError::unreadable(
                    source,
                    format!("invalid length '{}' at line {}", length, line_num),
                )
            })?;
            if length == 0 {
                return Err(BedshiftError::unreadable(
                    source,
                    format!("chromosome '{}' has zero length at line {}", name, line_num),
                ));
            }

            sizes.insert(name, length);
        }

        Ok(sizes)
    }

    /// Length of a chromosome, if known.
    pub fn get(&self, chrom: &str) -> Option<u64> {
        self.index.get(chrom).map(|&i| self.entries[i].1)
    }

    /// Whether the chromosome is known.
    pub fn contains(&self, chrom: &str) -> bool {
        self.index.contains_key(chrom)
    }

    /// Number of chromosomes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no chromosome lengths were loaded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all chromosome lengths.
    pub fn total_length(&self) -> u64 {
        self.entries.iter().map(|(_, len)| len).sum()
    }

    /// Iterate (name, length) in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(name, len)| (name.as_str(), *len))
    }

    /// Probability weight of each chromosome: length / total length.
    pub fn weights(&self) -> Vec<f64> {
        let total = self.total_length() as f64;
        self.entries
            .iter()
            .map(|(_, len)| *len as f64 / total)
            .collect()
    }

    /// Length-weighted sampler over the chromosomes, or `None` when empty.
    pub fn sampler(&self) -> Option<ChromSampler<'_>> {
        let weights = WeightedIndex::new(self.entries.iter().map(|(_, len)| *len)).ok()?;
        Some(ChromSampler {
            sizes: self,
            weights,
        })
    }
}

/// Draws chromosomes with probability proportional to their length
#[derive(Debug, Clone)]
pub struct ChromSampler<'a> {
    sizes: &'a ChromSizes,
    weights: WeightedIndex<u64>,
}

impl ChromSampler<'_> {
    /// Choose one chromosome, returning its name and length.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> (&str, u64) {
        let (name, len) = &self.sizes.entries[self.weights.sample(rng)];
        (name.as_str(), *len)
    }
}
