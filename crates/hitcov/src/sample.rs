//! Coverage samples as handed over by the collector.
//!
//! A sample pairs a script identifier with the `(line, count)` observations
//! reported for it during one collection pass. On disk, samples use the
//! collector's JSON layout where hits are flattened into alternating
//! line/count integers:
//!
//! ```text
//! {
//!   "type": "CodeCoverage",
//!   "coverage": [
//!     { "source": "package:app/main.dart", "hits": [10, 2, 11, 0] }
//!   ]
//! }
//! ```

use crate::result::{HitcovError, HitcovResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Per-script line observations from a single collection pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageSample {
    /// Opaque script identifier (absolute path or `scheme:tail` URI)
    pub script_id: String,
    /// `(line, count)` pairs in collector order; lines may repeat
    pub hits: Vec<(i64, i64)>,
}

impl CoverageSample {
    /// Create a sample for a script
    #[must_use]
    pub fn new(script_id: impl Into<String>, hits: Vec<(i64, i64)>) -> Self {
        Self {
            script_id: script_id.into(),
            hits,
        }
    }

    /// Check every observation has a 1-based line and a non-negative count
    ///
    /// # Errors
    ///
    /// Returns [`HitcovError::MalformedSample`] for the first bad pair.
    pub fn validate(&self) -> HitcovResult<()> {
        for &(line, count) in &self.hits {
            if line < 1 {
                return Err(HitcovError::malformed(
                    &self.script_id,
                    format!("line number {line} is not 1-based"),
                ));
            }
            if line > i64::from(u32::MAX) {
                return Err(HitcovError::malformed(
                    &self.script_id,
                    format!("line number {line} out of range"),
                ));
            }
            if count < 0 {
                return Err(HitcovError::malformed(
                    &self.script_id,
                    format!("negative hit count {count} on line {line}"),
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct CollectorDocument {
    #[serde(rename = "type", default = "default_document_type")]
    kind: String,
    #[serde(default)]
    coverage: Vec<CollectorEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CollectorEntry {
    source: String,
    #[serde(default)]
    hits: Vec<i64>,
}

fn default_document_type() -> String {
    "CodeCoverage".to_string()
}

/// Decode collector JSON into samples
///
/// # Errors
///
/// Returns a JSON error for invalid documents and
/// [`HitcovError::MalformedSample`] when a hits array has odd length.
pub fn parse_collector_json(json: &str) -> HitcovResult<Vec<CoverageSample>> {
    let document: CollectorDocument = serde_json::from_str(json)?;
    document
        .coverage
        .into_iter()
        .map(|entry| {
            if entry.hits.len() % 2 != 0 {
                return Err(HitcovError::malformed(
                    &entry.source,
                    format!("hits array has odd length {}", entry.hits.len()),
                ));
            }
            let hits = entry
                .hits
                .chunks_exact(2)
                .map(|pair| (pair[0], pair[1]))
                .collect();
            Ok(CoverageSample::new(entry.source, hits))
        })
        .collect()
}

/// Read and decode a collector JSON file
///
/// # Errors
///
/// Returns error if the file cannot be read or decoded
pub fn load_collector_file(path: &Path) -> HitcovResult<Vec<CoverageSample>> {
    let content = std::fs::read_to_string(path)?;
    parse_collector_json(&content)
}

/// Encode samples as collector JSON
///
/// # Errors
///
/// Returns error if serialization fails
pub fn to_collector_json(samples: &[CoverageSample]) -> HitcovResult<String> {
    let document = CollectorDocument {
        kind: default_document_type(),
        coverage: samples
            .iter()
            .map(|sample| CollectorEntry {
                source: sample.script_id.clone(),
                hits: sample
                    .hits
                    .iter()
                    .flat_map(|&(line, count)| [line, count])
                    .collect(),
            })
            .collect(),
    };
    Ok(serde_json::to_string_pretty(&document)?)
}
