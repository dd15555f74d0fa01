use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod format;
mod util;

use cli::{Cli, Commands};
use commands::{
    GlobalArgs, WatchArgs, cmd_analyze, cmd_anomalies, cmd_correlations, cmd_import,
    cmd_predict, cmd_trend, cmd_watch,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // When quiet mode is enabled, suppress info-level logging
    let filter = if cli.quiet {
        EnvFilter::new("warn")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // Logs go to stderr so stdout stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let global = GlobalArgs {
        database: cli.database.as_deref(),
        output: cli.output.as_ref(),
        no_color: cli.no_color,
    };

    match &cli.command {
        Commands::Predict {
            source,
            engine,
            output,
        } => cmd_predict(source, engine, output, global),
        Commands::Anomalies {
            source,
            threshold,
            basic,
            output,
        } => cmd_anomalies(source, *threshold, *basic, output, global),
        Commands::Correlations {
            source,
            computed,
            basic,
            output,
        } => cmd_correlations(source, *computed, *basic, output, global),
        Commands::Trend {
            source,
            metric,
            output,
        } => cmd_trend(source, metric, output, global),
        Commands::Analyze {
            source,
            engine,
            threshold,
            computed,
            output,
        } => cmd_analyze(source, engine, *threshold, *computed, output, global),
        Commands::Import {
            file,
            sensor,
            location,
            output,
        } => cmd_import(file, sensor, location.as_deref(), output, global),
        Commands::Watch {
            source,
            engine,
            interval,
            count,
            output,
        } => {
            cmd_watch(WatchArgs {
                source,
                engine,
                interval: *interval,
                count: *count,
                output,
                global,
            })
            .await
        }
    }
}
