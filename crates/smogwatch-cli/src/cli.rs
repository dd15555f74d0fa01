//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use smogwatch_core::anomaly::DEFAULT_THRESHOLD;

/// Output format for commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Where the history window comes from.
#[derive(Debug, Clone, Args)]
pub struct SourceArgs {
    /// Sensor ID, or use SMOGWATCH_SENSOR env var (default: all sensors)
    #[arg(short, long, env = "SMOGWATCH_SENSOR")]
    pub sensor: Option<String>,

    /// Analyse a CSV file instead of the database
    #[arg(long, value_name = "FILE")]
    pub csv: Option<PathBuf>,

    /// Number of most recent readings to analyse
    #[arg(short, long, default_value = "24", value_parser = clap::value_parser!(u32).range(1..))]
    pub limit: u32,
}

/// Engine tuning shared by the analysis commands.
#[derive(Debug, Clone, Default, Args)]
pub struct EngineArgs {
    /// Track only AQI and CO2
    #[arg(long)]
    pub basic: bool,

    /// Disable the hour-of-day seasonal factor
    #[arg(long)]
    pub flat: bool,

    /// Seed the simulated weather for reproducible forecasts
    #[arg(long)]
    pub seed: Option<u64>,

    /// Forecast as if the local hour were this (0-23)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..24))]
    pub hour: Option<u8>,
}

/// Reusable output format arguments
#[derive(Debug, Clone, Args)]
pub struct OutputArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Output compact JSON (no pretty-printing)
    #[arg(long)]
    pub compact: bool,
}

#[derive(Parser)]
#[command(name = "smogwatch")]
#[command(author, version, about = "Pollution trend prediction and anomaly analysis", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Database path, or use SMOGWATCH_DB env var (default: platform data dir)
    #[arg(long, global = true, env = "SMOGWATCH_DB")]
    pub database: Option<PathBuf>,

    /// Write output to file instead of stdout
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Forecast each metric one hour ahead
    Predict {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        engine: EngineArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// List readings that deviate strongly from the window mean
    Anomalies {
        #[command(flatten)]
        source: SourceArgs,

        /// Z-score above which a reading is anomalous
        #[arg(short, long, default_value_t = DEFAULT_THRESHOLD)]
        threshold: f64,

        /// Track only AQI and CO2
        #[arg(long)]
        basic: bool,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Describe relationships between metrics
    Correlations {
        #[command(flatten)]
        source: SourceArgs,

        /// Compute Pearson coefficients instead of the fixed insight table
        #[arg(long)]
        computed: bool,

        /// Track only AQI and CO2
        #[arg(long)]
        basic: bool,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Compare the latest value with the previous day's average
    Trend {
        #[command(flatten)]
        source: SourceArgs,

        /// Metric to compare (aqi, pm25, pm10, co2)
        #[arg(short, long, default_value = "aqi")]
        metric: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Run forecasts, anomaly detection and correlations together
    Analyze {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        engine: EngineArgs,

        /// Z-score above which a reading is anomalous
        #[arg(short, long, default_value_t = DEFAULT_THRESHOLD)]
        threshold: f64,

        /// Compute Pearson coefficients instead of the fixed insight table
        #[arg(long)]
        computed: bool,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Import readings from a CSV file into the database
    Import {
        /// CSV file with a `timestamp` column and any of aqi, pm25, pm10, co2
        file: PathBuf,

        /// Sensor the readings belong to
        #[arg(short, long, env = "SMOGWATCH_SENSOR", default_value = "default")]
        sensor: String,

        /// Installation site stored with the sensor
        #[arg(long)]
        location: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Re-run the analysis on an interval
    Watch {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        engine: EngineArgs,

        /// Seconds between runs
        #[arg(short, long, default_value = "10", value_parser = clap::value_parser!(u64).range(1..))]
        interval: u64,

        /// Stop after this many runs (0 for unlimited)
        #[arg(short = 'n', long, default_value = "0")]
        count: u32,

        #[command(flatten)]
        output: OutputArgs,
    },
}
