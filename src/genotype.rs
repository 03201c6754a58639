//! AncestryDNA raw-data row parser.

use crate::error::{ClinvarAncestryError, Result};

/// Number of columns in an AncestryDNA data row.
pub const GENOTYPE_COLUMNS: usize = 5;

/// A parsed genotype row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenotypeRow {
    /// Reference-SNP identifier with any `rs` prefix stripped.
    pub rs_id: String,
    /// Chromosome as written in the export.
    pub chromosome: String,
    /// Position as written in the export.
    pub position: String,
    /// First observed allele.
    pub allele1: String,
    /// Second observed allele.
    pub allele2: String,
    /// The line as read, without trailing line terminators.
    pub raw: String,
}

impl GenotypeRow {
    /// Count of alleles equal to `ref_allele` (0, 1 or 2).
    pub fn ref_allele_count(&self, ref_allele: &str) -> usize {
        [&self.allele1, &self.allele2]
            .into_iter()
            .filter(|allele| *allele == ref_allele)
            .count()
    }
}

/// Strip the `rs` prefix from an identifier, if present.
pub fn strip_rs_prefix(id: &str) -> &str {
    id.strip_prefix("rs").unwrap_or(id)
}

/// Parse a single genotype data line.
///
/// Trailing `\r`/`\n` are removed before the line is split on whitespace.
/// Columns beyond the fifth are ignored.
pub fn parse_genotype_row(line: &str) -> Result<GenotypeRow> {
    let raw = line.trim_end_matches(['\r', '\n']);
    let fields: Vec<&str> = raw.split_whitespace().take(GENOTYPE_COLUMNS).collect();

    if fields.len() < GENOTYPE_COLUMNS {
        return Err(ClinvarAncestryError::MalformedRow {
            kind: "genotype",
            expected: GENOTYPE_COLUMNS,
            found: fields.len(),
            line: raw.to_string(),
        });
    }

    Ok(GenotypeRow {
        rs_id: strip_rs_prefix(fields[0]).to_string(),
        chromosome: fields[1].to_string(),
        position: fields[2].to_string(),
        allele1: fields[3].to_string(),
        allele2: fields[4].to_string(),
        raw: raw.to_string(),
    })
}
