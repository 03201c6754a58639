//! Index of ClinVar annotations keyed by reference-SNP identifier.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use regex::Regex;

use crate::error::{ClinvarAncestryError, Result};
use crate::lines::lossy_lines;
use crate::record::{AnnotationRecord, find_info_value, parse_record, split_rs_ids};

/// Whole-string filter on the raw GENEINFO value.
#[derive(Debug, Clone)]
pub struct GeneFilter {
    regex: Option<Regex>,
}

impl GeneFilter {
    /// Compile a gene-name pattern. The pattern must match the entire
    /// GENEINFO text, not a substring of it.
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(&format!("^(?:{})$", pattern))?;
        Ok(Self { regex: Some(regex) })
    }

    /// A filter that accepts every GENEINFO value.
    pub fn match_all() -> Self {
        Self { regex: None }
    }

    /// Returns true if `gene_info` matches the pattern in full.
    pub fn matches(&self, gene_info: &str) -> bool {
        self.regex
            .as_ref()
            .is_none_or(|regex| regex.is_match(gene_info))
    }
}

impl Default for GeneFilter {
    fn default() -> Self {
        Self::match_all()
    }
}

/// Counters collected while building an index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexStats {
    /// Data lines read (headers excluded).
    pub lines: usize,
    /// Lines without a GENEINFO entry.
    pub without_gene_info: usize,
    /// Lines rejected by the gene filter.
    pub filtered_out: usize,
    /// Lines with a matching gene but no RS entry.
    pub without_rs: usize,
    /// Lines with fewer than the required columns.
    pub malformed: usize,
}

/// Mapping from reference-SNP identifier (without `rs`) to its annotation.
///
/// When several lines carry the same identifier, the last one wins.
#[derive(Debug, Clone, Default)]
pub struct AnnotationIndex {
    records: HashMap<String, AnnotationRecord>,
    stats: IndexStats,
}

impl AnnotationIndex {
    /// Build an index from a ClinVar VCF file.
    ///
    /// Only a failure to open the file is reported as
    /// [`ClinvarAncestryError::Io`].
    pub fn from_path(path: impl AsRef<Path>, gene_filter: &GeneFilter) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| ClinvarAncestryError::io(path, e))?;
        Self::from_reader(BufReader::new(file), gene_filter)
    }

    /// Build an index from any buffered VCF source.
    ///
    /// Header lines (`#`) are skipped. A line is indexed only if it has a
    /// GENEINFO entry fully matching `gene_filter` and an RS entry; each
    /// of its RS identifiers receives its own copy of the record. Lines
    /// with invalid UTF-8 are decoded lossily rather than ending the scan.
    pub fn from_reader<R: BufRead>(reader: R, gene_filter: &GeneFilter) -> Result<Self> {
        let mut index = Self::default();

        for line in lossy_lines(reader) {
            let line = line?;
            let line = line.as_str();
            if line.starts_with('#') {
                continue;
            }
            index.stats.lines += 1;

            let Some(gene_info) = find_info_value(line, "GENEINFO") else {
                index.stats.without_gene_info += 1;
                continue;
            };
            if !gene_filter.matches(gene_info) {
                index.stats.filtered_out += 1;
                continue;
            }
            let Some(rs_value) = find_info_value(line, "RS") else {
                index.stats.without_rs += 1;
                continue;
            };

            let record = match parse_record(line, gene_info) {
                Ok(record) => record,
                Err(e) => {
                    tracing::warn!("{}", e);
                    index.stats.malformed += 1;
                    continue;
                }
            };

            for rs in split_rs_ids(rs_value) {
                index.records.insert(rs.to_string(), record.clone());
            }
        }

        tracing::debug!("ClinVar index stats: {:?}", index.stats);
        Ok(index)
    }

    /// Look up the annotation for an identifier (without `rs`).
    pub fn get(&self, rs_id: &str) -> Option<&AnnotationRecord> {
        self.records.get(rs_id)
    }

    /// Returns true if the identifier is indexed.
    pub fn contains(&self, rs_id: &str) -> bool {
        self.records.contains_key(rs_id)
    }

    /// Number of indexed identifiers.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if nothing was indexed.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Counters collected during the build.
    pub fn stats(&self) -> &IndexStats {
        &self.stats
    }
}
