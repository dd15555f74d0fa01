//! Correlations command - relationships between metrics.

use anyhow::Result;

use smogwatch_core::{CorrelationMode, analyze_correlations};

use crate::cli::{OutputArgs, OutputFormat, SourceArgs};
use crate::format::format_correlations_text;
use crate::util::{load_history, metrics, write_output};

use super::GlobalArgs;

pub fn cmd_correlations(
    source: &SourceArgs,
    computed: bool,
    basic: bool,
    output: &OutputArgs,
    global: GlobalArgs<'_>,
) -> Result<()> {
    let mode = if computed {
        CorrelationMode::Computed
    } else {
        CorrelationMode::Static
    };
    let history = load_history(source, global.database)?;
    let insights = analyze_correlations(&history, &metrics(basic), mode);

    let opts = global.format_options(output.compact);
    let content = match output.format {
        OutputFormat::Json => opts.as_json(&insights)?,
        OutputFormat::Text => format_correlations_text(&insights, &opts),
    };
    write_output(global.output, &content)
}
