//! Genotype matching against the ClinVar annotation index.
//!
//! Each genotype row is looked up by RS identifier and classified by how
//! many of its alleles agree with the ClinVar reference allele. Emitted
//! rows go to the log stream as `<tag>\t<raw line>\t<INFO>` and, for
//! matched rows, to the JSON accumulator.

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use crate::error::{ClinvarAncestryError, Result};
use crate::genotype::{GenotypeRow, parse_genotype_row};
use crate::index::AnnotationIndex;
use crate::lines::lossy_lines;
use crate::output::{OutputAccumulator, build_record};
use crate::record::AnnotationRecord;

/// Message logged for rows without a ClinVar entry.
pub const UNMATCHED_MESSAGE: &str = "No match in clinvar.vcf!";

/// Classification of one genotype row against its annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchResult {
    /// Both alleles equal the reference allele.
    Concordant,
    /// Exactly one allele equals the reference allele.
    HeterozygousDiscordant,
    /// Neither allele equals the reference allele.
    HomozygousDiscordant,
    /// The identifier has no annotation.
    Unmatched,
}

impl MatchResult {
    /// Classify a row against an optional annotation.
    pub fn classify(row: &GenotypeRow, annotation: Option<&AnnotationRecord>) -> Self {
        let Some(annotation) = annotation else {
            return MatchResult::Unmatched;
        };
        match row.ref_allele_count(&annotation.ref_allele) {
            2 => MatchResult::Concordant,
            1 => MatchResult::HeterozygousDiscordant,
            _ => MatchResult::HomozygousDiscordant,
        }
    }

    /// The log stream tag for this classification.
    pub fn tag(&self) -> &'static str {
        match self {
            MatchResult::Concordant => "-/-",
            MatchResult::HeterozygousDiscordant => "+/-",
            MatchResult::HomozygousDiscordant => "+/+",
            MatchResult::Unmatched => "?/?",
        }
    }

    /// Returns true for either discordant classification.
    pub fn is_discrepancy(&self) -> bool {
        matches!(
            self,
            MatchResult::HeterozygousDiscordant | MatchResult::HomozygousDiscordant
        )
    }
}

/// Options controlling what the matcher emits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchOptions {
    /// Suppress rows whose alleles are fully concordant.
    /// Discordant rows are emitted either way.
    pub only_discrepancies: bool,
    /// Log rows whose identifier has no annotation.
    pub report_unmatched: bool,
}

impl MatchOptions {
    /// Returns true if a row with this classification is emitted as a record.
    fn emits_record(&self, result: MatchResult) -> bool {
        result.is_discrepancy() || (result == MatchResult::Concordant && !self.only_discrepancies)
    }
}

/// Per-classification counts for one matching run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchSummary {
    /// Data rows read (header and comments excluded).
    pub rows: usize,
    pub concordant: usize,
    pub heterozygous: usize,
    pub homozygous: usize,
    pub unmatched: usize,
    /// Rows with fewer than five columns.
    pub malformed: usize,
    /// Rows whose ClinVar position differs from the genotype position.
    pub position_mismatches: usize,
}

impl MatchSummary {
    fn count(&mut self, result: MatchResult) {
        match result {
            MatchResult::Concordant => self.concordant += 1,
            MatchResult::HeterozygousDiscordant => self.heterozygous += 1,
            MatchResult::HomozygousDiscordant => self.homozygous += 1,
            MatchResult::Unmatched => self.unmatched += 1,
        }
    }
}

/// Result of a matching run: the emitted records plus counters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchReport {
    pub records: OutputAccumulator,
    pub summary: MatchSummary,
}

/// Streams genotype rows through an annotation index.
#[derive(Debug, Clone)]
pub struct GenotypeMatcher<'a> {
    index: &'a AnnotationIndex,
    options: MatchOptions,
}

impl<'a> GenotypeMatcher<'a> {
    /// Create a matcher over a built index.
    pub fn new(index: &'a AnnotationIndex, options: MatchOptions) -> Self {
        Self { index, options }
    }

    /// Match a genotype file, writing log lines to `log`.
    pub fn match_path<W: Write>(
        &self,
        path: impl AsRef<Path>,
        log: &mut W,
    ) -> Result<MatchReport> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| ClinvarAncestryError::io(path, e))?;
        self.match_reader(BufReader::new(file), log)
    }

    /// Match any buffered genotype source, writing log lines to `log`.
    ///
    /// Comment lines (`#`) are skipped and the first remaining line is
    /// taken as the column header. Rows are processed in input order.
    /// Rows with invalid UTF-8 are decoded lossily and still matched.
    pub fn match_reader<R: BufRead, W: Write>(
        &self,
        reader: R,
        log: &mut W,
    ) -> Result<MatchReport> {
        let mut report = MatchReport::default();
        let mut header_seen = false;

        for line in lossy_lines(reader) {
            let line = line?;
            if line.starts_with('#') {
                continue;
            }
            if !header_seen {
                header_seen = true;
                continue;
            }
            report.summary.rows += 1;

            let row = match parse_genotype_row(&line) {
                Ok(row) => row,
                Err(e) => {
                    tracing::warn!("{}", e);
                    report.summary.malformed += 1;
                    continue;
                }
            };

            self.match_row(&row, log, &mut report)?;
        }

        Ok(report)
    }

    fn match_row<W: Write>(
        &self,
        row: &GenotypeRow,
        log: &mut W,
        report: &mut MatchReport,
    ) -> Result<()> {
        let annotation = self.index.get(&row.rs_id);
        let result = MatchResult::classify(row, annotation);
        report.summary.count(result);

        let Some(annotation) = annotation else {
            if self.options.report_unmatched {
                writeln!(log, "{}\t{}\t{}", result.tag(), row.raw, UNMATCHED_MESSAGE)?;
            }
            return Ok(());
        };

        if !self.options.emits_record(result) {
            return Ok(());
        }

        if annotation.pos != row.position {
            tracing::warn!(
                "clinvar position does not match dna raw data position: {} {}",
                annotation.pos,
                row.position
            );
            report.summary.position_mismatches += 1;
        }

        report.records.push(build_record(row, annotation)?);
        writeln!(log, "{}\t{}\t{}", result.tag(), row.raw, annotation.info)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::index::GeneFilter;

    const VCF: &str = "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO
17\t43044295\t55601\tA\tG\t.\t.\tCLNSIG=Benign;GENEINFO=BRCA1:672;RS=12345
";

    const GENOTYPES_HEADER: &str = "#AncestryDNA raw data download
#comment line
rsid\tchromosome\tposition\tallele1\tallele2
";

    fn index() -> AnnotationIndex {
        AnnotationIndex::from_reader(VCF.as_bytes(), &GeneFilter::default()).unwrap()
    }

    fn run(rows: &str, options: MatchOptions) -> (String, MatchReport) {
        let index = index();
        let input = format!("{}{}", GENOTYPES_HEADER, rows);
        let mut log = Vec::new();
        let report = GenotypeMatcher::new(&index, options)
            .match_reader(input.as_bytes(), &mut log)
            .unwrap();
        (String::from_utf8(log).unwrap(), report)
    }

    fn options(only_discrepancies: bool, report_unmatched: bool) -> MatchOptions {
        MatchOptions {
            only_discrepancies,
            report_unmatched,
        }
    }

    #[rstest]
    #[case("A", "A", MatchResult::Concordant)]
    #[case("A", "G", MatchResult::HeterozygousDiscordant)]
    #[case("G", "A", MatchResult::HeterozygousDiscordant)]
    #[case("G", "G", MatchResult::HomozygousDiscordant)]
    #[case("C", "T", MatchResult::HomozygousDiscordant)]
    fn test_classify(#[case] allele1: &str, #[case] allele2: &str, #[case] expected: MatchResult) {
        let index = index();
        let line = format!("rs12345\t17\t43044295\t{}\t{}", allele1, allele2);
        let row = parse_genotype_row(&line).unwrap();
        assert_eq!(MatchResult::classify(&row, index.get(&row.rs_id)), expected);
    }

    #[rstest]
    #[case(false, "A", "A", Some("-/-"))]
    #[case(true, "A", "A", None)]
    #[case(false, "A", "G", Some("+/-"))]
    #[case(true, "A", "G", Some("+/-"))]
    #[case(false, "G", "G", Some("+/+"))]
    #[case(true, "G", "G", Some("+/+"))]
    fn test_emission(
        #[case] only_discrepancies: bool,
        #[case] allele1: &str,
        #[case] allele2: &str,
        #[case] tag: Option<&str>,
    ) {
        let row = format!("rs12345\t17\t43044295\t{}\t{}\n", allele1, allele2);
        let (log, report) = run(&row, options(only_discrepancies, false));

        match tag {
            Some(tag) => {
                let info = "CLNSIG=Benign;GENEINFO=BRCA1:672;RS=12345";
                assert_eq!(log, format!("{}\t{}\t{}\n", tag, row.trim_end(), info));
                assert_eq!(report.records.len(), 1);
            }
            None => {
                assert_eq!(log, "");
                assert!(report.records.is_empty());
            }
        }
    }

    #[test]
    fn test_unmatched_row_is_silent_by_default() {
        let (log, report) = run("rs999\t1\t100\tA\tA\n", options(false, false));

        assert_eq!(log, "");
        assert!(report.records.is_empty());
        assert_eq!(report.summary.unmatched, 1);
    }

    #[test]
    fn test_unmatched_row_is_reported() {
        let (log, report) = run("rs999\t1\t100\tA\tA\r\n", options(false, true));

        assert_eq!(log, "?/?\trs999\t1\t100\tA\tA\tNo match in clinvar.vcf!\n");
        assert!(report.records.is_empty());
    }

    #[test]
    fn test_first_data_line_is_header() {
        let index = index();
        let input = "rs12345\t17\t43044295\tG\tG\nrs12345\t17\t43044295\tG\tG\n";
        let mut log = Vec::new();
        let report = GenotypeMatcher::new(&index, MatchOptions::default())
            .match_reader(input.as_bytes(), &mut log)
            .unwrap();

        assert_eq!(report.summary.rows, 1);
        assert_eq!(report.records.len(), 1);
    }

    #[test]
    fn test_position_mismatch_still_emits() {
        let (log, report) = run("rs12345\t17\t1\tA\tG\n", options(true, false));

        assert!(log.starts_with("+/-\t"));
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.summary.position_mismatches, 1);
        assert_eq!(report.records.records()[0]["position"], serde_json::json!("1"));
    }

    #[test]
    fn test_malformed_row_is_skipped() {
        let (log, report) = run("rs12345\t17\n12345\t17\t43044295\tA\tG\n", options(false, false));

        assert_eq!(report.summary.malformed, 1);
        assert_eq!(report.summary.heterozygous, 1);
        assert!(log.starts_with("+/-\t12345\t17"));
    }

    #[test]
    fn test_invalid_utf8_row_does_not_end_the_run() {
        let index = index();
        let input: &[u8] = b"rsid\tchromosome\tposition\tallele1\tallele2
rs12345\t17\t43044295\tA\tG
rs9\t1\t1\t\xff\tA
rs12345\t17\t43044295\tG\tG
";
        let mut log = Vec::new();
        let report = GenotypeMatcher::new(&index, options(false, true))
            .match_reader(input, &mut log)
            .unwrap();

        let log = String::from_utf8(log).unwrap();
        let tags: Vec<_> = log.lines().map(|line| &line[..3]).collect();
        assert_eq!(tags, vec!["+/-", "?/?", "+/+"]);
        assert!(log.contains("rs9\t1\t1\t\u{FFFD}\tA"));
        assert_eq!(report.records.len(), 2);
    }

    #[test]
    fn test_emitted_record_fields() {
        let (_, report) = run("rs12345\tchr17\t43044295\tA\tG\n", options(false, false));

        let record = &report.records.records()[0];
        assert_eq!(record["rsID"], serde_json::json!("12345"));
        assert_eq!(record["REF"], serde_json::json!("A"));
        assert_eq!(record["ALT"], serde_json::json!("G"));
        assert_eq!(record["ID"], serde_json::json!("55601"));
        assert_eq!(record["chromosome"], serde_json::json!("chr17"));
        assert_eq!(record["CLNSIG"], serde_json::json!([["Benign"]]));
    }

    #[test]
    fn test_summary_counts() {
        let rows = "rs12345\t17\t43044295\tA\tA
rs12345\t17\t43044295\tA\tT
rs12345\t17\t43044295\tT\tT
rs1\t1\t1\tA\tA
";
        let (_, report) = run(rows, options(true, true));

        assert_eq!(
            report.summary,
            MatchSummary {
                rows: 4,
                concordant: 1,
                heterozygous: 1,
                homozygous: 1,
                unmatched: 1,
                malformed: 0,
                position_mismatches: 0,
            }
        );
        assert_eq!(report.records.len(), 2);
    }

    #[test]
    fn test_is_discrepancy() {
        assert!(MatchResult::HomozygousDiscordant.is_discrepancy());
        assert!(MatchResult::HeterozygousDiscordant.is_discrepancy());
        assert!(!MatchResult::Concordant.is_discrepancy());
        assert!(!MatchResult::Unmatched.is_discrepancy());
    }
}
