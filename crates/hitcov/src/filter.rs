//! Report filtering and display paths.
//!
//! `report_on` prefixes restrict which resolved files appear in a report.
//! Prefixes are matched as plain strings against the normalized absolute
//! path with `/` separators; relative prefixes are first made absolute
//! against the filter's working directory, keeping any trailing `/`.

use crate::paths::{absolutize, relative_to, to_slash};
use crate::result::{HitcovError, HitcovResult};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Decides which files are reported and how their paths are printed
#[derive(Debug, Clone)]
pub struct ReportFilter {
    report_on: Vec<String>,
    base_path: Option<PathBuf>,
    working_dir: PathBuf,
}

impl Default for ReportFilter {
    fn default() -> Self {
        Self {
            report_on: Vec::new(),
            base_path: None,
            working_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/")),
        }
    }
}

impl ReportFilter {
    /// Accept every file and print absolute paths
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict the report to paths starting with one of `prefixes`
    #[must_use]
    pub fn with_report_on<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.report_on = prefixes.into_iter().map(Into::into).collect();
        self
    }

    /// Print paths relative to `base_path`
    #[must_use]
    pub fn with_base_path(mut self, base_path: impl Into<PathBuf>) -> Self {
        self.base_path = Some(base_path.into());
        self
    }

    /// Directory relative prefixes and base paths are taken against
    #[must_use]
    pub fn with_working_dir(mut self, working_dir: impl Into<PathBuf>) -> Self {
        self.working_dir = working_dir.into();
        self
    }

    /// Configured prefixes as written
    #[must_use]
    pub fn report_on(&self) -> &[String] {
        &self.report_on
    }

    /// Configured base path
    #[must_use]
    pub fn base_path(&self) -> Option<&Path> {
        self.base_path.as_deref()
    }

    fn absolute_prefix(&self, prefix: &str) -> String {
        let mut absolute = to_slash(&absolutize(Path::new(prefix), &self.working_dir));
        if (prefix.ends_with('/') || prefix.ends_with(std::path::MAIN_SEPARATOR))
            && !absolute.ends_with('/')
        {
            absolute.push('/');
        }
        absolute
    }

    /// Whether a resolved absolute path belongs in the report
    #[must_use]
    pub fn accepts(&self, absolute_path: &Path) -> bool {
        if self.report_on.is_empty() {
            return true;
        }
        let candidate = to_slash(&absolutize(absolute_path, &self.working_dir));
        self.report_on
            .iter()
            .any(|prefix| candidate.starts_with(&self.absolute_prefix(prefix)))
    }

    /// Path to print for a file, relative to the base path when one is set
    ///
    /// # Errors
    ///
    /// Returns [`HitcovError::FilterMisconfiguration`] when the file has no
    /// relative form under the base path.
    pub fn try_display_path(&self, absolute_path: &Path) -> HitcovResult<String> {
        let Some(base_path) = &self.base_path else {
            return Ok(to_slash(absolute_path));
        };
        let base = absolutize(base_path, &self.working_dir);
        relative_to(absolute_path, &base)
            .map(|relative| to_slash(&relative))
            .ok_or_else(|| HitcovError::FilterMisconfiguration {
                base_path: base_path.clone(),
                path: absolute_path.to_path_buf(),
            })
    }

    /// Path to print for a file, falling back to the absolute path
    #[must_use]
    pub fn display_path(&self, absolute_path: &Path) -> String {
        self.try_display_path(absolute_path).unwrap_or_else(|err| {
            warn!(error = %err, "falling back to absolute path");
            to_slash(absolute_path)
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn filter() -> ReportFilter {
        ReportFilter::new().with_working_dir("/repo")
    }

    #[test]
    fn test_empty_prefixes_accept_everything() {
        let filter = filter();
        assert!(filter.accepts(Path::new("/repo/lib/a.dart")));
        assert!(filter.accepts(Path::new("/elsewhere/b.dart")));
    }

    #[test]
    fn test_relative_prefix_is_absolutized() {
        let filter = filter().with_report_on(["lib/"]);
        assert!(filter.accepts(Path::new("/repo/lib/a.dart")));
        assert!(!filter.accepts(Path::new("/repo/test/a_test.dart")));
        assert!(!filter.accepts(Path::new("/repo/library/a.dart")));
        assert!(!filter.accepts(Path::new("/other/repo/lib/a.dart")));
    }

    #[test]
    fn test_prefix_without_slash_is_plain_string_prefix() {
        let filter = filter().with_report_on(["lib"]);
        assert!(filter.accepts(Path::new("/repo/lib/a.dart")));
        assert!(filter.accepts(Path::new("/repo/library/a.dart")));
    }

    #[test]
    fn test_any_prefix_matches() {
        let filter = filter().with_report_on(["/repo/lib/", "/repo/bin/"]);
        assert!(filter.accepts(Path::new("/repo/bin/main.dart")));
        assert!(filter.accepts(Path::new("/repo/lib/a.dart")));
        assert!(!filter.accepts(Path::new("/repo/tool/x.dart")));
    }

    #[test]
    fn test_prefix_matches_normalized_path() {
        let filter = filter().with_report_on(["lib/"]);
        assert!(filter.accepts(Path::new("/repo/test/../lib/a.dart")));
    }

    #[test]
    fn test_display_path_without_base_is_absolute() {
        let filter = filter();
        assert_eq!(
            filter.display_path(Path::new("/repo/lib/src/util.dart")),
            "/repo/lib/src/util.dart"
        );
    }

    #[test]
    fn test_display_path_relative_to_base() {
        let filter = filter().with_base_path("/repo/lib");
        assert_eq!(
            filter.display_path(Path::new("/repo/lib/src/util.dart")),
            "src/util.dart"
        );
    }

    #[test]
    fn test_display_path_outside_base_uses_parent_segments() {
        let filter = filter().with_base_path("/repo/lib");
        assert_eq!(
            filter.display_path(Path::new("/repo/test/a_test.dart")),
            "../test/a_test.dart"
        );
    }

    #[test]
    fn test_relative_base_is_taken_against_working_dir() {
        let filter = filter().with_base_path("lib");
        assert_eq!(filter.display_path(Path::new("/repo/lib/a.dart")), "a.dart");
    }

    #[test]
    fn test_unrelativizable_path_falls_back_to_absolute() {
        let filter = filter().with_base_path("/repo");
        let err = filter.try_display_path(Path::new("relative/a.dart")).unwrap_err();
        assert!(matches!(err, HitcovError::FilterMisconfiguration { .. }));
        assert_eq!(filter.display_path(Path::new("relative/a.dart")), "relative/a.dart");
    }
}
