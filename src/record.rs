//! ClinVar VCF record parsing.
//!
//! Tokenizes VCF data lines into `AnnotationRecord`s and extracts raw
//! INFO entries such as `GENEINFO` and `RS` straight from the line text.

use crate::error::{ClinvarAncestryError, Result};

/// Number of fixed VCF columns up to and including INFO.
pub const VCF_COLUMNS: usize = 8;

/// A single ClinVar variant entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationRecord {
    /// Chromosome (CHROM column).
    pub chrom: String,
    /// Position (POS column), kept as text.
    pub pos: String,
    /// ClinVar variation ID (ID column).
    pub id: String,
    /// Reference allele (REF column).
    pub ref_allele: String,
    /// Alternate allele (ALT column).
    pub alt_allele: String,
    /// Quality (QUAL column).
    pub qual: String,
    /// Filter status (FILTER column).
    pub filter: String,
    /// Raw GENEINFO value.
    pub gene_info: String,
    /// Raw INFO column, verbatim.
    pub info: String,
}

/// Find the value of an INFO key in a raw VCF line.
///
/// The key only matches at the start of a column or directly after a `;`,
/// so `RS` never matches the tail of a longer key. The value runs to the
/// next `;` or the end of the line.
pub fn find_info_value<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    let needle = format!("{}=", key);
    let mut search_from = 0;

    while let Some(offset) = line[search_from..].find(&needle) {
        let start = search_from + offset;
        let at_boundary = line[..start]
            .chars()
            .next_back()
            .is_none_or(|c| c == ';' || c.is_whitespace());

        if at_boundary {
            let value_start = start + needle.len();
            let value_end = line[value_start..]
                .find(';')
                .map(|i| value_start + i)
                .unwrap_or(line.len());
            return Some(&line[value_start..value_end]);
        }
        search_from = start + needle.len();
    }

    None
}

/// Split a raw `RS` value into its reference-SNP identifiers.
///
/// ClinVar merges historical RS numbers for one variant with `:`.
pub fn split_rs_ids(rs_value: &str) -> Vec<&str> {
    rs_value.split(':').filter(|rs| !rs.is_empty()).collect()
}

/// Parse a single VCF data line into an `AnnotationRecord`.
///
/// # Arguments
///
/// * `line` - A VCF data line (whitespace-separated, at least 8 columns)
/// * `gene_info` - The GENEINFO value already extracted from the line
pub fn parse_record(line: &str, gene_info: &str) -> Result<AnnotationRecord> {
    let fields: Vec<&str> = line.split_whitespace().take(VCF_COLUMNS).collect();

    if fields.len() < VCF_COLUMNS {
        return Err(ClinvarAncestryError::MalformedRow {
            kind: "VCF",
            expected: VCF_COLUMNS,
            found: fields.len(),
            line: line.to_string(),
        });
    }

    Ok(AnnotationRecord {
        chrom: fields[0].to_string(),
        pos: fields[1].to_string(),
        id: fields[2].to_string(),
        ref_allele: fields[3].to_string(),
        alt_allele: fields[4].to_string(),
        qual: fields[5].to_string(),
        filter: fields[6].to_string(),
        gene_info: gene_info.to_string(),
        info: fields[7].to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE: &str = "17\t43044295\t55601\tA\tG\t.\t.\tALLELEID=70052;CLNSIG=Benign;GENEINFO=BRCA1:672;RS=12345:67890";

    #[test]
    fn test_parse_simple_record() {
        let record = parse_record(LINE, "BRCA1:672").unwrap();

        assert_eq!(record.chrom, "17");
        assert_eq!(record.pos, "43044295");
        assert_eq!(record.id, "55601");
        assert_eq!(record.ref_allele, "A");
        assert_eq!(record.alt_allele, "G");
        assert_eq!(record.qual, ".");
        assert_eq!(record.filter, ".");
        assert_eq!(record.gene_info, "BRCA1:672");
        assert_eq!(
            record.info,
            "ALLELEID=70052;CLNSIG=Benign;GENEINFO=BRCA1:672;RS=12345:67890"
        );
    }

    #[test]
    fn test_short_line_is_malformed() {
        let err = parse_record("1\t100\t5\tA\tG\t.\t.", "").unwrap_err();
        assert!(matches!(
            err,
            ClinvarAncestryError::MalformedRow {
                expected: 8,
                found: 7,
                ..
            }
        ));
    }

    #[test]
    fn test_find_info_value() {
        assert_eq!(find_info_value(LINE, "GENEINFO"), Some("BRCA1:672"));
        assert_eq!(find_info_value(LINE, "RS"), Some("12345:67890"));
        assert_eq!(find_info_value(LINE, "CLNSIG"), Some("Benign"));
        assert_eq!(find_info_value(LINE, "ORIGIN"), None);
    }

    #[test]
    fn test_find_info_value_respects_key_boundary() {
        let line = "1\t10\t1\tA\tG\t.\t.\tXRS=1;RS=2";
        assert_eq!(find_info_value(line, "RS"), Some("2"));

        let line = "1\t10\t1\tA\tG\t.\t.\tXRS=1";
        assert_eq!(find_info_value(line, "RS"), None);
    }

    #[test]
    fn test_find_info_value_at_start_of_info() {
        let line = "1\t10\t1\tA\tG\t.\t.\tRS=99";
        assert_eq!(find_info_value(line, "RS"), Some("99"));
    }

    #[test]
    fn test_split_rs_ids() {
        assert_eq!(split_rs_ids("12345:67890"), vec!["12345", "67890"]);
        assert_eq!(split_rs_ids("12345"), vec!["12345"]);
        assert_eq!(split_rs_ids("12345:"), vec!["12345"]);
    }
}
