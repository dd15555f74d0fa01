//! Shared helpers for the commands.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::{debug, warn};

use smogwatch_core::{
    Analyzer, AnomalyDetector, CorrelationMode, FixedClock, PredictorConfig, ReadingValidator,
    SeasonalModel, SimulatedWeather,
};
use smogwatch_store::Store;
use smogwatch_types::{Metric, Reading};

use crate::cli::{EngineArgs, SourceArgs};

/// Sensor ID used for readings loaded from `--csv`.
const CSV_SENSOR: &str = "csv";

/// Open the database at `path`, or the default location.
pub fn open_store(path: Option<&Path>) -> Result<Store> {
    match path {
        Some(path) => Store::open(path)
            .with_context(|| format!("Failed to open database {}", path.display())),
        None => Store::open_default().context("Failed to open database"),
    }
}

/// Load readings from the database or a CSV file into a store.
///
/// A `--csv` source is imported into an in-memory store, so both sources
/// are queried the same way.
pub fn load_store(source: &SourceArgs, database: Option<&Path>) -> Result<Store> {
    let Some(csv) = &source.csv else {
        return open_store(database);
    };

    let store = Store::open_in_memory().context("Failed to open in-memory store")?;
    let result = store
        .import_csv_file(csv, CSV_SENSOR)
        .with_context(|| format!("Failed to read {}", csv.display()))?;

    for error in &result.errors {
        warn!("{}: {}", csv.display(), error);
    }
    if result.imported == 0 && result.total > 0 {
        bail!("No valid readings in {}", csv.display());
    }
    debug!(imported = result.imported, "Loaded CSV readings");

    Ok(store)
}

/// The sensor filter to apply to a loaded store.
pub fn sensor_filter(source: &SourceArgs) -> Option<&str> {
    if source.csv.is_some() {
        None
    } else {
        source.sensor.as_deref()
    }
}

/// The most recent `--limit` readings, oldest first.
pub fn load_history(source: &SourceArgs, database: Option<&Path>) -> Result<Vec<Reading>> {
    let store = load_store(source, database)?;
    read_window(&store, source)
}

/// Read the analysis window from an open store and log ordering problems.
pub fn read_window(store: &Store, source: &SourceArgs) -> Result<Vec<Reading>> {
    let history = store
        .recent_history(sensor_filter(source), source.limit)
        .context("Failed to query readings")?;

    let validation = ReadingValidator::default().validate_series(&history);
    for warning in &validation.warnings {
        warn!("{}", warning);
    }

    debug!(readings = history.len(), "Loaded history window");
    Ok(history)
}

/// Metric set selected by `--basic`.
pub fn metrics(basic: bool) -> Vec<Metric> {
    if basic {
        Metric::BASIC.to_vec()
    } else {
        Metric::ALL.to_vec()
    }
}

/// Build an analyzer from the command-line engine options.
pub fn build_analyzer(engine: &EngineArgs, threshold: f64, computed: bool) -> Result<Analyzer> {
    let mut config = if engine.basic {
        PredictorConfig::basic()
    } else {
        PredictorConfig::default()
    };
    if engine.flat {
        config = config.seasonal(SeasonalModel::Flat);
    }

    let detector = AnomalyDetector::new(threshold)?.with_metrics(config.metrics.clone());
    let mode = if computed {
        CorrelationMode::Computed
    } else {
        CorrelationMode::Static
    };

    let mut analyzer = Analyzer::new(config)?
        .with_detector(detector)
        .with_correlation_mode(mode);
    if let Some(seed) = engine.seed {
        analyzer = analyzer.with_weather(SimulatedWeather::seeded(seed));
    }
    if let Some(hour) = engine.hour {
        analyzer = analyzer.with_clock(FixedClock(hour));
    }
    Ok(analyzer)
}

/// Write output to file or stdout.
pub fn write_output(output: Option<&PathBuf>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write to {}", path.display()))?;
        }
        None => {
            print!("{}", content);
            io::stdout().flush()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(csv: Option<PathBuf>, limit: u32) -> SourceArgs {
        SourceArgs {
            sensor: None,
            csv,
            limit,
        }
    }

    fn write_csv(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("readings.csv");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_history_from_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            dir.path(),
            "timestamp,aqi,co2\n3000,62,410\n1000,60,400\n2000,61,405\n",
        );

        let history = load_history(&source(Some(path), 2), None).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].aqi, 61);
        assert_eq!(history[1].aqi, 62);
    }

    #[test]
    fn test_load_history_csv_without_valid_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(dir.path(), "timestamp,aqi\nnot-a-time,60\n");

        let err = load_history(&source(Some(path), 24), None).unwrap_err();
        assert!(err.to_string().contains("No valid readings"));
    }

    #[test]
    fn test_load_history_missing_csv() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_history(&source(Some(dir.path().join("none.csv")), 24), None).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }

    #[test]
    fn test_load_history_from_database() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("data.db");
        {
            let store = Store::open(&db).unwrap();
            let readings: Vec<Reading> = (0..5)
                .map(|i| Reading {
                    timestamp: 1_000 * (i + 1),
                    aqi: 50 + i as u32,
                    ..Default::default()
                })
                .collect();
            store.insert_readings("S001", &readings).unwrap();
            store.insert_readings("S002", &readings[..1]).unwrap();
        }

        let mut args = source(None, 24);
        args.sensor = Some("S001".to_string());
        let history = load_history(&args, Some(&db)).unwrap();
        assert_eq!(history.len(), 5);
        assert_eq!(history[4].aqi, 54);
    }

    #[test]
    fn test_build_analyzer_options() {
        let engine = EngineArgs {
            basic: true,
            flat: true,
            seed: Some(3),
            hour: Some(12),
        };
        let analyzer = build_analyzer(&engine, 3.0, true).unwrap();
        assert_eq!(analyzer.detector().threshold(), 3.0);
        assert_eq!(analyzer.correlation_mode(), CorrelationMode::Computed);

        assert!(build_analyzer(&EngineArgs::default(), 0.0, false).is_err());
    }

    #[test]
    fn test_metrics_selection() {
        assert_eq!(metrics(true), vec![Metric::Aqi, Metric::Co2]);
        assert_eq!(metrics(false).len(), 4);
    }

    #[test]
    fn test_write_output_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        write_output(Some(&path), "hello\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello\n");
    }
}
