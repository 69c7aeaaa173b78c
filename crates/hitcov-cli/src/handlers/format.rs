//! Format command handler

use super::{load_hitmap, write_output};
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::FormatArgs;
use console::style;
use hitcov::{
    FormattedReport, FsLoader, HitMap, LcovFormatter, PrettyPrintFormatter, ReportConfig,
    ReportFormat,
};

/// Execute the format command
pub fn execute_format(config: &CliConfig, args: &FormatArgs) -> CliResult<()> {
    let report_config = build_report_config(args)?;
    let hitmap = load_hitmap(&args.inputs)?;

    let resolver = report_config.build_resolver()?;
    let filter = report_config.build_filter();

    let report = match report_config.format {
        ReportFormat::Lcov => LcovFormatter::new(&resolver, &filter).format(&hitmap),
        ReportFormat::PrettyPrint => PrettyPrintFormatter::new(&resolver, &filter, &FsLoader)
            .with_parallel_loading(report_config.parallel_loading)
            .format(&hitmap),
    };

    write_output(report_config.output.as_deref(), &report.text)?;

    if !config.verbosity.is_quiet() {
        eprintln!("{}", render_summary(&hitmap, &report));
    }
    if config.verbosity.is_verbose() {
        for skipped in &report.skipped {
            eprintln!(
                "  {} {} ({})",
                style("skipped").for_stderr().yellow(),
                skipped.script_id,
                skipped.reason
            );
        }
    }
    Ok(())
}

/// Merge the configuration file (if any) with command-line flags
///
/// Flags win over file values; `--report-on` prefixes replace the file's
/// list rather than extending it.
pub fn build_report_config(args: &FormatArgs) -> CliResult<ReportConfig> {
    let mut config = match &args.config {
        Some(path) => ReportConfig::load(path)?,
        None => ReportConfig::new(),
    };

    if args.lcov {
        config.format = ReportFormat::Lcov;
    } else if args.pretty_print {
        config.format = ReportFormat::PrettyPrint;
    }
    if let Some(packages) = &args.packages {
        config.packages = Some(packages.clone());
    }
    if !args.report_on.is_empty() {
        config.report_on = args.report_on.clone();
    }
    if let Some(base) = &args.base_directory {
        config.base_path = Some(base.clone());
    }
    if let Some(out) = &args.out {
        config.output = Some(out.clone());
    }
    if args.parallel {
        config.parallel_loading = true;
    }

    config.validate()?;
    Ok(config)
}

/// One-line summary of a report run
#[must_use]
pub fn render_summary(hitmap: &HitMap, report: &FormattedReport) -> String {
    let summary = hitmap.summary();
    format!(
        "{} {} file(s), {} skipped, {}/{} lines hit ({:.1}%)",
        style("Wrote").for_stderr().green().bold(),
        report.files_written,
        report.skipped_count(),
        summary.lines_hit,
        summary.lines_found,
        summary.coverage_percent()
    )
}
