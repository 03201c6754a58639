//! JSON output accumulation.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde_json::{Map, Value as JsonValue};

use crate::error::{ClinvarAncestryError, Result};
use crate::genotype::GenotypeRow;
use crate::info::expand_info;
use crate::record::AnnotationRecord;

/// Default name of the JSON output file.
pub const DEFAULT_OUTPUT: &str = "filtered-DNA.json";

/// Build the JSON object emitted for a matched genotype row.
///
/// The fixed fields come first; expanded INFO keys are merged afterwards
/// and replace a fixed field of the same name.
pub fn build_record(
    row: &GenotypeRow,
    annotation: &AnnotationRecord,
) -> Result<Map<String, JsonValue>> {
    let mut object = Map::new();
    let fields = [
        ("rsID", &row.rs_id),
        ("allele1", &row.allele1),
        ("allele2", &row.allele2),
        ("chromosome", &row.chromosome),
        ("position", &row.position),
        ("REF", &annotation.ref_allele),
        ("ALT", &annotation.alt_allele),
        ("FILTER", &annotation.filter),
        ("QUAL", &annotation.qual),
        ("ID", &annotation.id),
    ];
    for (key, value) in fields {
        object.insert(key.to_string(), JsonValue::String(value.clone()));
    }

    for (key, value) in expand_info(&annotation.info) {
        object.insert(key, serde_json::to_value(value)?);
    }

    Ok(object)
}

/// Ordered, append-only collection of emitted records.
///
/// Serialized once, as a single JSON array, at the end of a run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputAccumulator {
    records: Vec<Map<String, JsonValue>>,
}

impl OutputAccumulator {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one record.
    pub fn push(&mut self, record: Map<String, JsonValue>) {
        self.records.push(record);
    }

    /// Number of records collected so far.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no record was collected.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The collected records, in emission order.
    pub fn records(&self) -> &[Map<String, JsonValue>] {
        &self.records
    }

    /// Serialize all records as one JSON array.
    pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer(writer, &self.records)?;
        Ok(())
    }

    /// Write all records as one JSON array to `path`, replacing the file.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| ClinvarAncestryError::io(path, e))?;
        let mut writer = BufWriter::new(file);
        self.to_writer(&mut writer)?;
        writer.flush().map_err(|e| ClinvarAncestryError::io(path, e))?;
        Ok(())
    }
}
