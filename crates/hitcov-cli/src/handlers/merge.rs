//! Merge command handler

use super::{load_hitmap, write_output};
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::MergeArgs;
use console::style;
use hitcov::to_collector_json;

/// Execute the merge command
pub fn execute_merge(config: &CliConfig, args: &MergeArgs) -> CliResult<()> {
    let hitmap = load_hitmap(&args.inputs)?;
    let mut json = to_collector_json(&hitmap.to_samples())?;
    json.push('\n');
    write_output(args.out.as_deref(), &json)?;

    if !config.verbosity.is_quiet() {
        let summary = hitmap.summary();
        eprintln!(
            "{} {} script(s), {} line(s)",
            style("Merged").for_stderr().green().bold(),
            summary.scripts,
            summary.lines_found
        );
    }
    Ok(())
}
