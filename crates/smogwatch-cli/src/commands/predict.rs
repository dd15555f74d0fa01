//! Predict command - one-hour-ahead forecasts.

use anyhow::Result;
use tracing::info;

use smogwatch_core::anomaly::DEFAULT_THRESHOLD;

use crate::cli::{EngineArgs, OutputArgs, OutputFormat, SourceArgs};
use crate::format::format_predictions_text;
use crate::util::{build_analyzer, load_history, write_output};

use super::GlobalArgs;

pub fn cmd_predict(
    source: &SourceArgs,
    engine: &EngineArgs,
    output: &OutputArgs,
    global: GlobalArgs<'_>,
) -> Result<()> {
    let history = load_history(source, global.database)?;
    let mut analyzer = build_analyzer(engine, DEFAULT_THRESHOLD, false)?;
    let predictions = analyzer.predictions(&history);
    info!(
        readings = history.len(),
        predictions = predictions.len(),
        "Generated forecasts"
    );

    let opts = global.format_options(output.compact);
    let content = match output.format {
        OutputFormat::Json => opts.as_json(&predictions)?,
        OutputFormat::Text => format_predictions_text(&predictions, &opts),
    };
    write_output(global.output, &content)
}
