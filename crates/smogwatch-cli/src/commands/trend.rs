//! Trend command - latest value against the previous day's average.

use anyhow::{Context, Result, anyhow};
use time::OffsetDateTime;

use smogwatch_core::daily_trend;
use smogwatch_store::Store;
use smogwatch_types::Metric;

use crate::cli::{OutputArgs, OutputFormat, SourceArgs};
use crate::format::{TrendReport, format_trend_text};
use crate::util::{load_store, sensor_filter, write_output};

use super::GlobalArgs;

pub fn cmd_trend(
    source: &SourceArgs,
    metric: &str,
    output: &OutputArgs,
    global: GlobalArgs<'_>,
) -> Result<()> {
    let metric: Metric = metric.parse()?;
    let store = load_store(source, global.database)?;
    let report = daily_report(&store, sensor_filter(source), metric)?;

    let opts = global.format_options(output.compact);
    let content = match output.format {
        OutputFormat::Json => opts.as_json(&report)?,
        OutputFormat::Text => format_trend_text(&report, &opts),
    };
    write_output(global.output, &content)
}

/// Compare the newest reading with the average of the UTC day before it.
fn daily_report(store: &Store, sensor: Option<&str>, metric: Metric) -> Result<TrendReport> {
    let latest = store
        .latest_reading(sensor)?
        .ok_or_else(|| anyhow!("No readings available"))?;

    let taken_at = OffsetDateTime::from_unix_timestamp_nanos(i128::from(latest.timestamp) * 1_000_000)
        .context("Latest reading has an invalid timestamp")?;
    let previous_day_average = match taken_at.date().previous_day() {
        Some(day) => store.daily_average(sensor, metric, day)?,
        None => None,
    };

    let current = latest.to_reading().value(metric);
    Ok(TrendReport {
        metric: metric.label().to_string(),
        current_value: current,
        previous_day_average,
        trend: daily_trend(current, previous_day_average),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use smogwatch_types::{Reading, Trend};

    const DAY_MS: i64 = 86_400_000;

    fn reading(timestamp: i64, aqi: u32) -> Reading {
        Reading {
            timestamp,
            aqi,
            co2: 400.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_daily_report() {
        let store = Store::open_in_memory().unwrap();
        // 2023-11-14 and 2023-11-15 UTC
        let day1 = 1_699_920_000_000;
        store
            .insert_readings(
                "S001",
                &[
                    reading(day1 + 1_000, 90),
                    reading(day1 + 2_000, 110),
                    reading(day1 + DAY_MS + 1_000, 80),
                ],
            )
            .unwrap();

        let report = daily_report(&store, Some("S001"), Metric::Aqi).unwrap();
        assert_eq!(report.metric, "AQI");
        assert_eq!(report.current_value, 80.0);
        assert_eq!(report.previous_day_average, Some(100.0));
        assert_eq!(report.trend.percentage_change, -20);
        assert_eq!(report.trend.trend, Trend::Decreasing);
    }

    #[test]
    fn test_daily_report_without_previous_day() {
        let store = Store::open_in_memory().unwrap();
        store.insert_reading("S001", &reading(1_699_920_000_000, 50)).unwrap();

        let report = daily_report(&store, None, Metric::Co2).unwrap();
        assert_eq!(report.previous_day_average, None);
        assert_eq!(report.trend.percentage_change, 0);
        assert_eq!(report.trend.trend, Trend::Stable);
    }

    #[test]
    fn test_daily_report_empty_store() {
        let store = Store::open_in_memory().unwrap();
        let err = daily_report(&store, None, Metric::Aqi).unwrap_err();
        assert!(err.to_string().contains("No readings"));
    }
}
