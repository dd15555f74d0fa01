//! Watch command - re-run the analysis on an interval.
//!
//! The store is opened once. Each run re-reads the window so readings
//! ingested by another process show up on the next tick. JSON output is one
//! compact report per line.

use std::time::Duration;

use anyhow::Result;
use owo_colors::OwoColorize;
use serde::Serialize;
use time::OffsetDateTime;
use tracing::{debug, warn};

use smogwatch_core::AnalysisReport;
use smogwatch_core::anomaly::DEFAULT_THRESHOLD;

use crate::cli::{EngineArgs, OutputArgs, OutputFormat, SourceArgs};
use crate::format::{FormatOptions, format_report_text};
use crate::util::{build_analyzer, load_store, read_window, write_output};

use super::GlobalArgs;

/// Arguments for the watch command.
pub struct WatchArgs<'a> {
    pub source: &'a SourceArgs,
    pub engine: &'a EngineArgs,
    pub interval: u64,
    pub count: u32,
    pub output: &'a OutputArgs,
    pub global: GlobalArgs<'a>,
}

/// One line of `--format json` watch output.
#[derive(Debug, Serialize)]
struct WatchRecord<'a> {
    #[serde(with = "time::serde::rfc3339")]
    timestamp: OffsetDateTime,
    #[serde(flatten)]
    report: &'a AnalysisReport,
}

pub async fn cmd_watch(args: WatchArgs<'_>) -> Result<()> {
    let WatchArgs {
        source,
        engine,
        interval,
        count,
        output,
        global,
    } = args;

    let store = load_store(source, global.database)?;
    let mut analyzer = build_analyzer(engine, DEFAULT_THRESHOLD, false)?;
    let opts = global.format_options(output.compact);

    let target = source.sensor.as_deref().unwrap_or("all sensors");
    let header = if opts.no_color {
        format!("Watching: {}", target)
    } else {
        format!("Watching: {}", target.cyan())
    };
    eprintln!("{}", header);
    if count > 0 {
        eprintln!(
            "Interval: {}s | Count: {} | Press Ctrl+C to stop",
            interval, count
        );
    } else {
        eprintln!("Interval: {}s | Press Ctrl+C to stop", interval);
    }
    eprintln!("{}", "-".repeat(50));

    let mut ticker = tokio::time::interval(Duration::from_secs(interval));
    let mut runs: u32 = 0;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                eprintln!("\nShutting down...");
                return Ok(());
            }
            _ = ticker.tick() => {}
        }

        match read_window(&store, source) {
            Ok(history) => {
                let report = analyzer.analyze(&history);
                let content = render(&report, OffsetDateTime::now_utc(), output.format, &opts)?;
                write_output(global.output, &content)?;
            }
            // Keep watching after a failed run
            Err(e) => warn!("Analysis run failed: {:#}", e),
        }

        runs += 1;
        debug!(runs, "Watch run complete");
        if count > 0 && runs >= count {
            eprintln!("Completed {} runs.", runs);
            return Ok(());
        }
    }
}

fn render(
    report: &AnalysisReport,
    at: OffsetDateTime,
    format: OutputFormat,
    opts: &FormatOptions,
) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let record = WatchRecord {
                timestamp: at,
                report,
            };
            opts.with_compact(true).as_json(&record)
        }
        OutputFormat::Text => {
            let stamp = at
                .format(&time::format_description::well_known::Rfc3339)
                .unwrap_or_default();
            Ok(format!(
                "[{}] {}\n",
                stamp,
                format_report_text(report, opts).trim_end()
            ))
        }
    }
}
