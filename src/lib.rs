//! # ClinVar / AncestryDNA cross-referencing
//!
//! Cross-references a ClinVar VCF against an AncestryDNA raw-data export
//! and reports, per matched variant, whether the observed alleles agree
//! with the ClinVar reference allele.
//!
//! ## Pipeline
//!
//! 1. [`AnnotationIndex`] scans the ClinVar file once, keeps lines whose
//!    `GENEINFO` fully matches a [`GeneFilter`], and indexes them by each
//!    of their `RS` identifiers.
//! 2. [`GenotypeMatcher`] streams the genotype file through the index,
//!    classifies every row as a [`MatchResult`], writes log lines and
//!    collects JSON records in an [`OutputAccumulator`].
//!
//! ## Log tags
//!
//! - `-/-` both alleles equal REF (suppressed with `only_discrepancies`)
//! - `+/-` exactly one allele equals REF
//! - `+/+` neither allele equals REF
//! - `?/?` no ClinVar entry (only with `report_unmatched`)
//!
//! ## Example
//!
//! ```rust
//! use clinvar_ancestry::{AnnotationIndex, GeneFilter, GenotypeMatcher, MatchOptions};
//!
//! let vcf = "17\t43044295\t55601\tA\tG\t.\t.\tGENEINFO=BRCA1:672;RS=12345\n";
//! let index = AnnotationIndex::from_reader(vcf.as_bytes(), &GeneFilter::default()).unwrap();
//!
//! let genotypes = "rsid\tchromosome\tposition\tallele1\tallele2\nrs12345\t17\t43044295\tA\tG\n";
//! let mut log = Vec::new();
//! let report = GenotypeMatcher::new(&index, MatchOptions::default())
//!     .match_reader(genotypes.as_bytes(), &mut log)
//!     .unwrap();
//!
//! assert!(String::from_utf8(log).unwrap().starts_with("+/-\trs12345"));
//! assert_eq!(report.records.len(), 1);
//! ```

use std::io::Write;
use std::path::PathBuf;

pub mod error;
pub mod genotype;
pub mod index;
pub mod info;
pub mod lines;
pub mod matcher;
pub mod output;
pub mod record;
pub mod value;

pub use error::{ClinvarAncestryError, Result};
pub use genotype::{GenotypeRow, parse_genotype_row};
pub use index::{AnnotationIndex, GeneFilter, IndexStats};
pub use info::{ExpandedInfo, expand_info};
pub use matcher::{GenotypeMatcher, MatchOptions, MatchReport, MatchResult, MatchSummary};
pub use output::{DEFAULT_OUTPUT, OutputAccumulator};
pub use record::AnnotationRecord;
pub use value::{InfoItem, InfoValue};

/// Inputs and switches for one complete run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Path to the ClinVar VCF.
    pub clinvar: PathBuf,
    /// Path to the AncestryDNA raw-data file.
    pub genotypes: PathBuf,
    /// Whole-string GENEINFO pattern; `None` accepts every gene.
    pub gene_pattern: Option<String>,
    /// Emission switches for the matcher.
    pub options: MatchOptions,
    /// Destination of the JSON array.
    pub output: PathBuf,
}

/// Run both phases and write the JSON output.
///
/// An unreadable ClinVar file yields an empty index. An unreadable
/// genotype file ends the run early with `Ok(None)` and no output file.
/// Lines that cannot be decoded or parsed are reported and skipped.
/// Failing to write the output file is returned as an error.
pub fn run<W: Write>(config: &RunConfig, log: &mut W) -> Result<Option<MatchReport>> {
    let gene_filter = match &config.gene_pattern {
        Some(pattern) => GeneFilter::new(pattern)?,
        None => GeneFilter::match_all(),
    };

    tracing::info!("Indexing ClinVar records from {}", config.clinvar.display());
    let index = match AnnotationIndex::from_path(&config.clinvar, &gene_filter) {
        Ok(index) => index,
        Err(e @ ClinvarAncestryError::Io { .. }) => {
            tracing::error!("Error opening ClinVar VCF file: {}", e);
            AnnotationIndex::default()
        }
        Err(e) => return Err(e),
    };
    tracing::info!("Indexed {} RS identifiers", index.len());

    tracing::info!("Matching genotypes from {}", config.genotypes.display());
    let matcher = GenotypeMatcher::new(&index, config.options);
    let report = match matcher.match_path(&config.genotypes, log) {
        Ok(report) => report,
        Err(e @ ClinvarAncestryError::Io { .. }) => {
            tracing::error!("Error opening AncestryDNA file: {}", e);
            return Ok(None);
        }
        Err(e) => return Err(e),
    };
    log.flush()?;

    report.records.write_to(&config.output)?;

    let stats = index.stats();
    tracing::info!(
        "Read {} ClinVar lines: {} RS identifiers indexed, {} without GENEINFO, {} filtered out, {} without RS, {} malformed VCF lines",
        stats.lines,
        index.len(),
        stats.without_gene_info,
        stats.filtered_out,
        stats.without_rs,
        stats.malformed
    );
    let summary = &report.summary;
    tracing::info!(
        "Processed {} rows: {} concordant, {} heterozygous, {} homozygous, {} unmatched, {} malformed",
        summary.rows,
        summary.concordant,
        summary.heterozygous,
        summary.homozygous,
        summary.unmatched,
        summary.malformed
    );
    tracing::info!(
        "Wrote {} records to {}",
        report.records.len(),
        config.output.display()
    );

    Ok(Some(report))
}
