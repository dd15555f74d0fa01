//! Analyze command - forecasts, anomalies and correlations in one report.

use anyhow::Result;

use crate::cli::{EngineArgs, OutputArgs, OutputFormat, SourceArgs};
use crate::format::format_report_text;
use crate::util::{build_analyzer, load_history, write_output};

use super::GlobalArgs;

pub fn cmd_analyze(
    source: &SourceArgs,
    engine: &EngineArgs,
    threshold: f64,
    computed: bool,
    output: &OutputArgs,
    global: GlobalArgs<'_>,
) -> Result<()> {
    let mut analyzer = build_analyzer(engine, threshold, computed)?;
    let history = load_history(source, global.database)?;
    let report = analyzer.analyze(&history);

    let opts = global.format_options(output.compact);
    let content = match output.format {
        OutputFormat::Json => opts.as_json(&report)?,
        OutputFormat::Text => format_report_text(&report, &opts),
    };
    write_output(global.output, &content)
}
