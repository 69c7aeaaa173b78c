//! Report configuration.
//!
//! A configuration file can carry everything a report run needs besides
//! the coverage inputs:
//!
//! ```yaml
//! format: lcov
//! packages: .dart_tool/package_config.json
//! report_on:
//!   - lib/
//! base_path: .
//! parallel_loading: true
//! ```

use crate::filter::ReportFilter;
use crate::resolver::Resolver;
use crate::result::{HitcovError, HitcovResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Output format of a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportFormat {
    /// LCOV tracefile
    #[default]
    Lcov,
    /// Annotated source listing
    PrettyPrint,
}

/// Settings for one report run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    /// Output format
    pub format: ReportFormat,
    /// Package table file (`package_config.json` or `.packages`)
    pub packages: Option<PathBuf>,
    /// Path prefixes to report on, empty reports everything
    pub report_on: Vec<String>,
    /// Emit paths relative to this directory
    pub base_path: Option<PathBuf>,
    /// Output file, stdout when unset
    pub output: Option<PathBuf>,
    /// Load sources for pretty-print on worker threads
    pub parallel_loading: bool,
}

impl ReportConfig {
    /// Create a default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a YAML configuration
    ///
    /// # Errors
    ///
    /// Returns error if the document is not a valid configuration
    pub fn from_yaml_str(yaml: &str) -> HitcovResult<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON configuration
    ///
    /// # Errors
    ///
    /// Returns error if the document is not a valid configuration
    pub fn from_json_str(json: &str) -> HitcovResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file, JSON when the extension is `.json`
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed
    pub fn load(path: &Path) -> HitcovResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
    }

    /// Reject settings that cannot produce a report
    ///
    /// # Errors
    ///
    /// Returns [`HitcovError::Config`] describing the first problem
    pub fn validate(&self) -> HitcovResult<()> {
        if let Some(prefix) = self.report_on.iter().find(|prefix| prefix.is_empty()) {
            return Err(HitcovError::config(format!(
                "empty report_on prefix {prefix:?} would match every file"
            )));
        }
        if self
            .base_path
            .as_ref()
            .is_some_and(|base| base.as_os_str().is_empty())
        {
            return Err(HitcovError::config("base_path must not be empty"));
        }
        Ok(())
    }

    /// Set the output format
    #[must_use]
    pub const fn with_format(mut self, format: ReportFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the package table file
    #[must_use]
    pub fn with_packages(mut self, packages: impl Into<PathBuf>) -> Self {
        self.packages = Some(packages.into());
        self
    }

    /// Add a report prefix
    #[must_use]
    pub fn with_report_on(mut self, prefix: impl Into<String>) -> Self {
        self.report_on.push(prefix.into());
        self
    }

    /// Set the base path
    #[must_use]
    pub fn with_base_path(mut self, base_path: impl Into<PathBuf>) -> Self {
        self.base_path = Some(base_path.into());
        self
    }

    /// Set the output file
    #[must_use]
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    /// Build the resolver for this run
    ///
    /// # Errors
    ///
    /// Returns error if the package table cannot be loaded
    pub fn build_resolver(&self) -> HitcovResult<Resolver> {
        match &self.packages {
            Some(path) => Resolver::load(path),
            None => Ok(Resolver::new()),
        }
    }

    /// Build the report filter for this run
    #[must_use]
    pub fn build_filter(&self) -> ReportFilter {
        let filter = ReportFilter::new().with_report_on(self.report_on.iter().cloned());
        match &self.base_path {
            Some(base_path) => filter.with_base_path(base_path.clone()),
            None => filter,
        }
    }
}
