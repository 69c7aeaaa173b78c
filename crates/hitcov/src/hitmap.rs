//! Hit map: per-script, per-line execution counts.
//!
//! A line stored with count 0 was reported as executable but never ran.
//! A line that is absent is not executable and is never reported. The two
//! cases stay distinct through construction and merging.

use crate::result::HitcovResult;
use crate::sample::CoverageSample;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// Line number (1-based) to aggregated hit count
pub type LineHits = BTreeMap<u32, u64>;

/// Totals over a hit map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HitSummary {
    /// Number of scripts
    pub scripts: usize,
    /// Executable lines recorded
    pub lines_found: usize,
    /// Lines with count > 0
    pub lines_hit: usize,
}

impl HitSummary {
    /// Line coverage percentage
    #[must_use]
    pub fn coverage_percent(&self) -> f64 {
        if self.lines_found == 0 {
            return 100.0;
        }
        (self.lines_hit as f64 / self.lines_found as f64) * 100.0
    }
}

/// Aggregated coverage for a set of scripts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HitMap {
    scripts: BTreeMap<String, LineHits>,
}

impl HitMap {
    /// Create an empty hit map
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a hit map from collector samples
    ///
    /// Repeated `(script, line)` observations are summed.
    ///
    /// # Errors
    ///
    /// Returns [`crate::HitcovError::MalformedSample`] if any sample carries a
    /// line below 1 or a negative count.
    pub fn from_samples<'a, I>(samples: I) -> HitcovResult<Self>
    where
        I: IntoIterator<Item = &'a CoverageSample>,
    {
        let mut map = Self::new();
        map.record_samples(samples)?;
        Ok(map)
    }

    /// Add samples into this map
    ///
    /// All samples are validated before anything is recorded, so a failed
    /// call leaves the map unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`crate::HitcovError::MalformedSample`] on the first invalid
    /// observation.
    pub fn record_samples<'a, I>(&mut self, samples: I) -> HitcovResult<()>
    where
        I: IntoIterator<Item = &'a CoverageSample>,
    {
        let samples: Vec<&CoverageSample> = samples.into_iter().collect();
        for sample in &samples {
            sample.validate()?;
        }

        for sample in samples {
            let lines = self.scripts.entry(sample.script_id.clone()).or_default();
            for &(line, count) in &sample.hits {
                // validated: 1 <= line <= u32::MAX, count >= 0
                let slot = lines.entry(line as u32).or_insert(0);
                *slot = slot.saturating_add(count as u64);
            }
        }
        Ok(())
    }

    /// Record hits for a single line
    pub fn record_hits(&mut self, script_id: &str, line: u32, count: u64) {
        let slot = self
            .scripts
            .entry(script_id.to_string())
            .or_default()
            .entry(line)
            .or_insert(0);
        *slot = slot.saturating_add(count);
    }

    /// Merge two hit maps into a new one
    #[must_use]
    pub fn merge(a: &Self, b: &Self) -> Self {
        let mut merged = a.clone();
        merged.merge_from(b);
        merged
    }

    /// Merge another hit map into this one, summing shared lines
    pub fn merge_from(&mut self, other: &Self) {
        for (script_id, other_lines) in &other.scripts {
            match self.scripts.entry(script_id.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(other_lines.clone());
                }
                Entry::Occupied(mut slot) => {
                    let lines = slot.get_mut();
                    for (&line, &count) in other_lines {
                        let hits = lines.entry(line).or_insert(0);
                        *hits = hits.saturating_add(count);
                    }
                }
            }
        }
    }

    /// Line hits for a script
    #[must_use]
    pub fn get(&self, script_id: &str) -> Option<&LineHits> {
        self.scripts.get(script_id)
    }

    /// Hit count for a line, `None` when the line is not executable
    #[must_use]
    pub fn hit_count(&self, script_id: &str, line: u32) -> Option<u64> {
        self.scripts.get(script_id)?.get(&line).copied()
    }

    /// Iterate scripts in identifier order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &LineHits)> {
        self.scripts
            .iter()
            .map(|(script_id, lines)| (script_id.as_str(), lines))
    }

    /// Script identifiers in sorted order
    pub fn scripts(&self) -> impl Iterator<Item = &str> {
        self.scripts.keys().map(String::as_str)
    }

    /// Number of scripts
    #[must_use]
    pub fn len(&self) -> usize {
        self.scripts.len()
    }

    /// Whether the map holds no scripts
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }

    /// Totals over all scripts
    #[must_use]
    pub fn summary(&self) -> HitSummary {
        self.scripts
            .values()
            .fold(HitSummary::default(), |mut summary, lines| {
                summary.scripts += 1;
                summary.lines_found += lines.len();
                summary.lines_hit += lines.values().filter(|&&count| count > 0).count();
                summary
            })
    }

    /// Convert back into samples, one per script
    ///
    /// Samples carry signed counts, so a count above `i64::MAX` is clamped
    /// to `i64::MAX`. Such a map does not survive the round trip exactly.
    #[must_use]
    pub fn to_samples(&self) -> Vec<CoverageSample> {
        self.iter()
            .map(|(script_id, lines)| {
                let hits = lines
                    .iter()
                    .map(|(&line, &count)| {
                        (i64::from(line), i64::try_from(count).unwrap_or(i64::MAX))
                    })
                    .collect();
                CoverageSample::new(script_id, hits)
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a HitMap {
    type Item = (&'a String, &'a LineHits);
    type IntoIter = std::collections::btree_map::Iter<'a, String, LineHits>;

    fn into_iter(self) -> Self::IntoIter {
        self.scripts.iter()
    }
}
