//! CLI command definitions using clap

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// hitcov: turn collected line-hit coverage into LCOV or annotated sources
#[derive(Parser, Debug)]
#[command(name = "hitcov")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Format coverage JSON as an LCOV or pretty-print report
    Format(FormatArgs),

    /// Merge coverage JSON files into one
    Merge(MergeArgs),
}

/// Arguments for the format command
#[derive(Args, Debug)]
pub struct FormatArgs {
    /// Coverage JSON files or directories to search for `*.json`
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Package table (`package_config.json` or `.packages`)
    #[arg(long)]
    pub packages: Option<PathBuf>,

    /// Only report files under this path prefix (repeatable)
    #[arg(long = "report-on")]
    pub report_on: Vec<String>,

    /// Emit paths relative to this directory
    #[arg(long = "base-directory")]
    pub base_directory: Option<PathBuf>,

    /// Write an LCOV tracefile
    #[arg(long, conflicts_with = "pretty_print")]
    pub lcov: bool,

    /// Write sources annotated with hit counts
    #[arg(long = "pretty-print")]
    pub pretty_print: bool,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Report configuration file (YAML or JSON)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Load sources on worker threads
    #[arg(long)]
    pub parallel: bool,
}

/// Arguments for the merge command
#[derive(Args, Debug)]
pub struct MergeArgs {
    /// Coverage JSON files or directories to search for `*.json`
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

/// Color argument for CLI
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_format_command() {
        let cli = Cli::parse_from([
            "hitcov",
            "format",
            "coverage/",
            "--packages",
            ".dart_tool/package_config.json",
            "--report-on",
            "lib/",
            "--report-on",
            "bin/",
            "--lcov",
        ]);
        if let Commands::Format(args) = cli.command {
            assert_eq!(args.inputs, vec![PathBuf::from("coverage/")]);
            assert_eq!(args.report_on, vec!["lib/", "bin/"]);
            assert!(args.lcov);
            assert!(!args.pretty_print);
        } else {
            panic!("expected Format command");
        }
    }

    #[test]
    fn test_lcov_conflicts_with_pretty_print() {
        let result = Cli::try_parse_from(["hitcov", "format", "a.json", "--lcov", "--pretty-print"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_format_requires_input() {
        assert!(Cli::try_parse_from(["hitcov", "format"]).is_err());
    }

    #[test]
    fn test_parse_merge_command() {
        let cli = Cli::parse_from(["hitcov", "merge", "a.json", "b.json", "-o", "all.json"]);
        if let Commands::Merge(args) = cli.command {
            assert_eq!(args.inputs.len(), 2);
            assert_eq!(args.out, Some(PathBuf::from("all.json")));
        } else {
            panic!("expected Merge command");
        }
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from(["hitcov", "-vv", "--color", "never", "merge", "a.json"]);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.color, ColorArg::Never));
    }
}
