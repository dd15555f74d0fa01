//! Anomalies command - Z-score outliers in the history window.

use anyhow::Result;

use smogwatch_core::AnomalyDetector;

use crate::cli::{OutputArgs, OutputFormat, SourceArgs};
use crate::format::format_anomalies_text;
use crate::util::{load_history, metrics, write_output};

use super::GlobalArgs;

pub fn cmd_anomalies(
    source: &SourceArgs,
    threshold: f64,
    basic: bool,
    output: &OutputArgs,
    global: GlobalArgs<'_>,
) -> Result<()> {
    let detector = AnomalyDetector::new(threshold)?.with_metrics(metrics(basic));
    let history = load_history(source, global.database)?;
    let anomalies = detector.detect(&history);

    let opts = global.format_options(output.compact);
    let content = match output.format {
        OutputFormat::Json => opts.as_json(&anomalies)?,
        OutputFormat::Text => format_anomalies_text(&anomalies, &opts),
    };
    write_output(global.output, &content)
}
