//! hitcov: line-hit coverage aggregation and reporting
//!
//! Turns per-line hit samples collected from a running program into LCOV
//! tracefiles and annotated source listings.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    HITCOV Architecture                           │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  Samples ──► HitMap ──► merge ──► Resolver ──► ReportFilter     │
//! │                                                   │              │
//! │                              ┌────────────────────┴───┐          │
//! │                              ▼                        ▼          │
//! │                        LcovFormatter     PrettyPrintFormatter    │
//! │                                           (+ SourceLoader)       │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use hitcov::{CoverageSample, HitMap, LcovFormatter, ReportFilter, Resolver};
//!
//! let samples = vec![CoverageSample::new("package:app/a.dart", vec![(10, 2), (11, 0)])];
//! let hitmap = HitMap::from_samples(&samples).unwrap();
//!
//! let resolver = Resolver::new().with_package("app", "/repo/lib");
//! let filter = ReportFilter::new();
//! let report = LcovFormatter::new(&resolver, &filter).format(&hitmap);
//!
//! assert!(report.text.contains("SF:/repo/lib/a.dart"));
//! assert!(report.text.contains("LH:1"));
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod filter;
pub mod formatters;
pub mod hitmap;
pub mod loader;
pub mod paths;
pub mod resolver;
mod result;
pub mod sample;

pub use config::{ReportConfig, ReportFormat};
pub use filter::ReportFilter;
pub use formatters::{
    FormattedReport, LcovFormatter, PrettyPrintFormatter, SkipReason, SkippedFile,
};
pub use hitmap::{HitMap, HitSummary, LineHits};
pub use loader::{FsLoader, MemoryLoader, SourceLoader};
pub use resolver::{Resolver, ScriptRef};
pub use result::{HitcovError, HitcovResult};
pub use sample::{load_collector_file, parse_collector_json, to_collector_json, CoverageSample};
