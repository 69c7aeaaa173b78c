//! LCOV Report Formatter
//!
//! Generates LCOV tracefiles with line records only.
//!
//! ## LCOV Format
//!
//! ```text
//! SF:<source file>
//! DA:<line>,<execution count>
//! LF:<lines found>
//! LH:<lines hit>
//! end_of_record
//! ```

use super::{resolve_files, FormattedReport};
use crate::filter::ReportFilter;
use crate::hitmap::HitMap;
use crate::resolver::Resolver;
use crate::result::HitcovResult;
use std::fmt::Write;
use std::path::Path;
use tracing::info;

/// LCOV format report generator
#[derive(Debug, Clone, Copy)]
pub struct LcovFormatter<'a> {
    resolver: &'a Resolver,
    filter: &'a ReportFilter,
}

impl<'a> LcovFormatter<'a> {
    /// Create a new LCOV formatter
    #[must_use]
    pub fn new(resolver: &'a Resolver, filter: &'a ReportFilter) -> Self {
        Self { resolver, filter }
    }

    /// Generate the LCOV report for a hit map
    #[must_use]
    pub fn format(&self, hitmap: &HitMap) -> FormattedReport {
        let (files, skipped) = resolve_files(hitmap, self.resolver, self.filter);
        let mut output = String::new();

        for file in &files {
            let _ = writeln!(output, "SF:{}", file.display_path);

            let mut lines_hit = 0;
            for (line, count) in file.hits {
                let _ = writeln!(output, "DA:{line},{count}");
                if *count > 0 {
                    lines_hit += 1;
                }
            }

            let _ = writeln!(output, "LF:{}", file.hits.len());
            let _ = writeln!(output, "LH:{lines_hit}");
            output.push_str("end_of_record\n");
        }

        info!(
            files = files.len(),
            skipped = skipped.len(),
            "generated lcov report"
        );

        FormattedReport {
            text: output,
            files_written: files.len(),
            skipped,
        }
    }

    /// Write the LCOV report to a file
    ///
    /// # Errors
    ///
    /// Returns error if file write fails
    pub fn save(&self, hitmap: &HitMap, path: &Path) -> HitcovResult<FormattedReport> {
        let report = self.format(hitmap);
        std::fs::write(path, &report.text)?;
        Ok(report)
    }
}
