//! hitcov CLI Library
//!
//! Command-line front-end that merges collected coverage JSON and renders
//! LCOV or pretty-print reports with the `hitcov` library.

#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

mod commands;
mod config;
mod error;
pub mod handlers;
pub mod logging;

pub use commands::{Cli, ColorArg, Commands, FormatArgs, MergeArgs};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
