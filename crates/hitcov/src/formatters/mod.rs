//! Coverage Report Formatters
//!
//! LCOV and pretty-print generators. Both share the same front half: walk
//! the hit map in identifier order, resolve each script to a file, drop
//! what the filter rejects, and remember why each dropped script was
//! skipped so callers can report it.

mod lcov;
mod pretty;

pub use lcov::LcovFormatter;
pub use pretty::PrettyPrintFormatter;

use crate::filter::ReportFilter;
use crate::hitmap::{HitMap, LineHits};
use crate::resolver::Resolver;
use std::fmt;
use std::path::PathBuf;
use tracing::debug;

/// Why a script was left out of a report
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// No package root for the identifier
    Unresolvable,
    /// Rejected by the `report_on` prefixes
    Filtered,
    /// Source text could not be loaded
    SourceUnavailable(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unresolvable => write!(f, "unresolvable"),
            Self::Filtered => write!(f, "filtered"),
            Self::SourceUnavailable(message) => write!(f, "source unavailable: {message}"),
        }
    }
}

/// A script left out of a report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    /// Script identifier
    pub script_id: String,
    /// Reason it was skipped
    pub reason: SkipReason,
}

/// Rendered report plus bookkeeping about what was left out
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormattedReport {
    /// Report text
    pub text: String,
    /// Number of file records written
    pub files_written: usize,
    /// Scripts that were skipped
    pub skipped: Vec<SkippedFile>,
}

impl FormattedReport {
    /// Number of skipped scripts
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    /// Skipped scripts with a given reason
    pub fn skipped_with<'a>(
        &'a self,
        reason: &'a SkipReason,
    ) -> impl Iterator<Item = &'a str> + 'a {
        self.skipped
            .iter()
            .filter(move |skipped| &skipped.reason == reason)
            .map(|skipped| skipped.script_id.as_str())
    }
}

/// A hit map entry projected onto a file that passed the filter
#[derive(Debug, Clone)]
pub(crate) struct ResolvedFile<'a> {
    pub script_id: &'a str,
    pub path: PathBuf,
    pub display_path: String,
    pub hits: &'a LineHits,
}

/// Resolve and filter every script in identifier order
pub(crate) fn resolve_files<'a>(
    hitmap: &'a HitMap,
    resolver: &Resolver,
    filter: &ReportFilter,
) -> (Vec<ResolvedFile<'a>>, Vec<SkippedFile>) {
    let mut files = Vec::new();
    let mut skipped = Vec::new();

    for (script_id, hits) in hitmap.iter() {
        let path = match resolver.resolve(script_id) {
            Ok(path) => path,
            Err(err) => {
                debug!(script_id, error = %err, "skipping script");
                skipped.push(SkippedFile {
                    script_id: script_id.to_string(),
                    reason: SkipReason::Unresolvable,
                });
                continue;
            }
        };
        if !filter.accepts(&path) {
            debug!(script_id, path = %path.display(), "filtered out");
            skipped.push(SkippedFile {
                script_id: script_id.to_string(),
                reason: SkipReason::Filtered,
            });
            continue;
        }
        let display_path = filter.display_path(&path);
        files.push(ResolvedFile {
            script_id,
            path,
            display_path,
            hits,
        });
    }

    (files, skipped)
}
