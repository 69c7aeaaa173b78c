//! hitcov CLI: line-hit coverage reports
//!
//! ## Usage
//!
//! ```bash
//! hitcov format coverage/ --packages .dart_tool/package_config.json \
//!     --report-on lib/ --lcov -o coverage/lcov.info
//! hitcov format run.json --pretty-print --base-directory .
//! hitcov merge coverage/ -o merged.json
//! ```

use clap::Parser;
use hitcov_cli::{
    handlers::{format::execute_format, merge::execute_merge},
    logging::init_logging,
    Cli, CliConfig, CliResult, ColorChoice, Commands, Verbosity,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();
    let config = build_config(&cli);

    let color = config.color.should_color();
    console::set_colors_enabled_stderr(color);
    init_logging(config.verbosity, color);

    match cli.command {
        Commands::Format(args) => execute_format(&config, &args),
        Commands::Merge(args) => execute_merge(&config, &args),
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    let verbosity = Verbosity::from_flags(cli.verbose, cli.quiet);
    let color: ColorChoice = cli.color.clone().into();
    CliConfig::new().with_verbosity(verbosity).with_color(color)
}
