//! Pretty-print Report Formatter
//!
//! Annotates each source line with its hit count:
//!
//! ```text
//! lib/src/util.dart
//!  12|int twice(int x) {
//!  12|  return x * 2;
//!    |}
//!   0|int never() => 0;
//! ```
//!
//! The count column is as wide as the largest count in the file. A `0`
//! marks an executable line that never ran; a blank column marks a line
//! that is not executable.

use super::{resolve_files, FormattedReport, ResolvedFile, SkipReason, SkippedFile};
use crate::filter::ReportFilter;
use crate::hitmap::{HitMap, LineHits};
use crate::loader::SourceLoader;
use crate::resolver::Resolver;
use crate::result::HitcovResult;
use std::fmt::Write;
use std::path::Path;
use tracing::{info, warn};

/// Annotated-source report generator
#[derive(Clone, Copy)]
pub struct PrettyPrintFormatter<'a> {
    resolver: &'a Resolver,
    filter: &'a ReportFilter,
    loader: &'a dyn SourceLoader,
    parallel: bool,
}

impl std::fmt::Debug for PrettyPrintFormatter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintFormatter")
            .field("resolver", self.resolver)
            .field("filter", self.filter)
            .field("parallel", &self.parallel)
            .finish_non_exhaustive()
    }
}

impl<'a> PrettyPrintFormatter<'a> {
    /// Create a new pretty-print formatter
    #[must_use]
    pub fn new(
        resolver: &'a Resolver,
        filter: &'a ReportFilter,
        loader: &'a dyn SourceLoader,
    ) -> Self {
        Self {
            resolver,
            filter,
            loader,
            parallel: false,
        }
    }

    /// Load source files on worker threads
    #[must_use]
    pub const fn with_parallel_loading(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Generate the annotated report for a hit map
    #[must_use]
    pub fn format(&self, hitmap: &HitMap) -> FormattedReport {
        let (files, mut skipped) = resolve_files(hitmap, self.resolver, self.filter);
        let sources = if self.parallel && files.len() > 1 {
            load_concurrently(self.loader, &files)
        } else {
            files.iter().map(|file| self.loader.load(&file.path)).collect()
        };

        let mut output = String::new();
        let mut files_written = 0;
        for (file, source) in files.iter().zip(sources) {
            let _ = writeln!(output, "{}", file.display_path);
            match source {
                Ok(lines) => {
                    render_file(&mut output, &lines, file.hits);
                    files_written += 1;
                }
                Err(err) => {
                    warn!(script_id = file.script_id, error = %err, "skipping source");
                    let _ = writeln!(output, "<source unavailable: {err}>");
                    skipped.push(SkippedFile {
                        script_id: file.script_id.to_string(),
                        reason: SkipReason::SourceUnavailable(err.to_string()),
                    });
                }
            }
        }

        info!(
            files = files_written,
            skipped = skipped.len(),
            "generated pretty-print report"
        );

        FormattedReport {
            text: output,
            files_written,
            skipped,
        }
    }

    /// Write the annotated report to a file
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

/// Width of the count column, over the lines that are printed
fn count_width(hits: &LineHits, line_count: usize) -> usize {
    let last = u32::try_from(line_count).unwrap_or(u32::MAX);
    hits.range(..=last)
        .map(|(_, count)| count)
        .max()
        .map_or(1, |max| max.to_string().len())
}

fn render_file(output: &mut String, lines: &[String], hits: &LineHits) {
    let width = count_width(hits, lines.len());
    for (index, text) in lines.iter().enumerate() {
        let line = u32::try_from(index + 1).unwrap_or(u32::MAX);
        match hits.get(&line) {
            Some(count) => {
                let _ = writeln!(output, "{count:>width$}|{text}");
            }
            None => {
                let _ = writeln!(output, "{:width$}|{text}", "");
            }
        }
    }
}

/// Load sources on scoped threads, keeping results in `files` order
fn load_concurrently(
    loader: &dyn SourceLoader,
    files: &[ResolvedFile<'_>],
) -> Vec<HitcovResult<Vec<String>>> {
    let threads = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .min(files.len())
        .max(1);
    let chunk_size = files.len().div_ceil(threads);

    std::thread::scope(|scope| {
        let handles: Vec<_> = files
            .chunks(chunk_size)
            .map(|chunk| {
                scope.spawn(move || {
                    chunk
                        .iter()
                        .map(|file| loader.load(&file.path))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        handles
            .into_iter()
            .flat_map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
            })
            .collect()
    })
}
