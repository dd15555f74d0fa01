//! Output formatting for text and JSON output.

use anyhow::Result;
use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::builder::Builder;
use tabled::settings::Style;

use smogwatch_core::AnalysisReport;
use smogwatch_core::predict::highest_risk;
use smogwatch_store::ImportResult;
use smogwatch_types::{
    Anomaly, CorrelationInsight, DailyTrend, RiskLevel, Severity, Trend, TrendPrediction,
};

/// Formatting options for output.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatOptions {
    /// Disable colored output.
    pub no_color: bool,
    /// Use compact JSON output (no pretty-printing).
    pub compact: bool,
}

impl FormatOptions {
    pub fn new(no_color: bool) -> Self {
        Self {
            no_color,
            compact: false,
        }
    }

    /// Create with compact JSON option.
    pub fn with_compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }

    /// Serialize value to JSON string, respecting compact option.
    pub fn as_json<T: Serialize>(&self, value: &T) -> Result<String> {
        let json = if self.compact {
            serde_json::to_string(value)?
        } else {
            serde_json::to_string_pretty(value)?
        };
        Ok(json + "\n")
    }

    fn title(&self, text: &str) -> String {
        if self.no_color {
            text.to_string()
        } else {
            format!("{}", text.bold())
        }
    }

    /// Risk level label, colored by severity.
    #[must_use]
    pub fn risk(&self, risk: RiskLevel) -> String {
        let label = risk.to_string();
        if self.no_color {
            return label;
        }
        match risk {
            RiskLevel::Low => format!("{}", label.green()),
            RiskLevel::Medium => format!("{}", label.yellow()),
            RiskLevel::High => format!("{}", label.red()),
            RiskLevel::Critical => format!("{}", label.red().bold()),
        }
    }

    fn severity(&self, severity: Severity) -> String {
        let label = severity.to_string();
        match (self.no_color, severity) {
            (true, _) => label,
            (false, Severity::Moderate) => format!("{}", label.yellow()),
            (false, Severity::Severe) => format!("{}", label.red().bold()),
        }
    }
}

fn trend_arrow(trend: Trend) -> &'static str {
    match trend {
        Trend::Increasing => "↑",
        Trend::Decreasing => "↓",
        Trend::Stable => "→",
    }
}

fn timestamp_label(millis: i64) -> String {
    time::OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000)
        .ok()
        .and_then(|t| {
            t.format(&time::format_description::well_known::Rfc3339)
                .ok()
        })
        .unwrap_or_else(|| millis.to_string())
}

// ============================================================================
// Predictions
// ============================================================================

#[must_use]
pub fn format_predictions_text(predictions: &[TrendPrediction], opts: &FormatOptions) -> String {
    if predictions.is_empty() {
        return "Not enough readings to forecast (need at least 5).\n".to_string();
    }

    let mut builder = Builder::default();
    builder.push_record(["Metric", "Current", "Forecast", "Trend", "Confidence", "Risk"]);
    for p in predictions {
        builder.push_record([
            p.metric.clone(),
            format!("{}", p.current_value),
            format!("{}", p.predicted_value),
            format!("{} {}", trend_arrow(p.trend), p.trend),
            format!("{:.0}%", p.confidence * 100.0),
            opts.risk(p.risk_level),
        ]);
    }
    let mut table = builder.build();
    table.with(Style::rounded());

    let mut output = opts.title(&format!("Forecast ({})", predictions[0].timeframe));
    if let Some(risk) = highest_risk(predictions) {
        output.push_str(&format!("  highest risk: {}", opts.risk(risk)));
    }
    output.push_str(&format!("\n{}\n", table));
    for p in predictions {
        output.push_str(&format!("  {}: {}\n", p.metric, p.recommendation));
    }
    output
}

// ============================================================================
// Anomalies
// ============================================================================

#[must_use]
pub fn format_anomalies_text(anomalies: &[Anomaly], opts: &FormatOptions) -> String {
    if anomalies.is_empty() {
        return "No anomalies detected.\n".to_string();
    }

    let mut builder = Builder::default();
    builder.push_record(["Timestamp", "Metric", "Value", "Z-score", "Severity"]);
    for a in anomalies {
        builder.push_record([
            timestamp_label(a.timestamp),
            a.metric.clone(),
            format!("{}", a.value),
            format!("{:.2}", a.zscore),
            opts.severity(a.severity),
        ]);
    }
    let mut table = builder.build();
    table.with(Style::rounded());

    format!(
        "{}\n{}\n",
        opts.title(&format!("Anomalies ({})", anomalies.len())),
        table
    )
}

// ============================================================================
// Correlations
// ============================================================================

#[must_use]
pub fn format_correlations_text(insights: &[CorrelationInsight], opts: &FormatOptions) -> String {
    if insights.is_empty() {
        return "Not enough readings for correlations (need at least 10).\n".to_string();
    }

    let mut output = format!("{}\n", opts.title("Correlations"));
    for insight in insights {
        output.push_str(&format!(
            "  {} / {}  {:+.2}\n    {}\n",
            insight.metrics[0], insight.metrics[1], insight.correlation, insight.insight
        ));
    }
    output
}

// ============================================================================
// Daily trend
// ============================================================================

/// Day-over-day comparison for one metric.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendReport {
    pub metric: String,
    pub current_value: f64,
    pub previous_day_average: Option<f64>,
    #[serde(flatten)]
    pub trend: DailyTrend,
}

#[must_use]
pub fn format_trend_text(report: &TrendReport, opts: &FormatOptions) -> String {
    let mut output = format!("{}\n", opts.title(&format!("{} trend", report.metric)));
    output.push_str(&format!("  Latest:            {}\n", report.current_value));
    match report.previous_day_average {
        Some(avg) => output.push_str(&format!("  Previous day avg:  {:.1}\n", avg)),
        None => output.push_str("  Previous day avg:  (no data)\n"),
    }
    output.push_str(&format!(
        "  Change:            {:+}% {} {}\n",
        report.trend.percentage_change,
        trend_arrow(report.trend.trend),
        report.trend.trend
    ));
    output
}

// ============================================================================
// Full report
// ============================================================================

#[must_use]
pub fn format_report_text(report: &AnalysisReport, opts: &FormatOptions) -> String {
    format!(
        "Analysed {} readings\n\n{}\n{}\n{}",
        report.samples,
        format_predictions_text(&report.predictions, opts),
        format_anomalies_text(&report.anomalies, opts),
        format_correlations_text(&report.correlations, opts),
    )
}

// ============================================================================
// Import
// ============================================================================

#[must_use]
pub fn format_import_text(result: &ImportResult, sensor: &str) -> String {
    let mut output = format!(
        "Imported {} of {} rows for {} ({} skipped)\n",
        result.imported, result.total, sensor, result.skipped
    );
    for error in &result.errors {
        output.push_str(&format!("  {}\n", error));
    }
    output
}
