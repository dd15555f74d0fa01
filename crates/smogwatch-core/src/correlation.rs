//! Correlation insights between metrics.
//!
//! The default [`CorrelationMode::Static`] reports a fixed set of known
//! relationships; [`CorrelationMode::Computed`] measures Pearson
//! coefficients over the history window instead.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use smogwatch_types::{CorrelationInsight, Metric, Reading, series};

use crate::stats::{pearson, round_to};

/// Fewest readings for which correlations are reported.
pub const MIN_CORRELATION_SAMPLES: usize = 10;

/// Coefficient magnitude from which a relationship is called strong.
pub const STRONG_CORRELATION: f64 = 0.7;
/// Coefficient magnitude from which a relationship is called moderate.
pub const MODERATE_CORRELATION: f64 = 0.4;

/// How correlation insights are produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrelationMode {
    /// Fixed coefficients and advice, independent of the data.
    #[default]
    Static,
    /// Pearson coefficients computed from the history window.
    Computed,
}

impl fmt::Display for CorrelationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorrelationMode::Static => write!(f, "static"),
            CorrelationMode::Computed => write!(f, "computed"),
        }
    }
}

/// Report relationships between `metrics` over `history`.
///
/// Returns nothing for fewer than [`MIN_CORRELATION_SAMPLES`] readings.
///
/// ```
/// use smogwatch_core::correlation::{CorrelationMode, analyze_correlations};
/// use smogwatch_types::{Metric, Reading};
///
/// let history = vec![Reading::default(); 12];
/// let insights = analyze_correlations(&history, &Metric::ALL, CorrelationMode::Static);
/// assert_eq!(insights.len(), 3);
/// assert_eq!(insights[1].correlation, 0.92);
/// ```
pub fn analyze_correlations(
    history: &[Reading],
    metrics: &[Metric],
    mode: CorrelationMode,
) -> Vec<CorrelationInsight> {
    if history.len() < MIN_CORRELATION_SAMPLES {
        return Vec::new();
    }

    match mode {
        CorrelationMode::Static => static_insights(metrics),
        CorrelationMode::Computed => computed_insights(history, metrics),
    }
}

fn static_insights(metrics: &[Metric]) -> Vec<CorrelationInsight> {
    let tracks_particulates = metrics.iter().any(Metric::is_particulate);

    if tracks_particulates {
        vec![
            CorrelationInsight::new(
                "PM2.5",
                "PM10",
                0.85,
                "Fine and coarse particles are highly correlated. Joint control is more effective.",
            ),
            CorrelationInsight::new(
                "AQI",
                "PM2.5",
                0.92,
                "AQI is strongly driven by PM2.5. Focus on fine particle control.",
            ),
            CorrelationInsight::new(
                "CO₂",
                "Temperature",
                0.67,
                "CO₂ rises with temperature. Optimise cooling on hot days.",
            ),
        ]
    } else {
        vec![
            CorrelationInsight::new(
                "AQI",
                "CO₂",
                0.75,
                "Air quality and CO₂ move together. Combustion control improves both.",
            ),
            CorrelationInsight::new(
                "CO₂",
                "Temperature",
                0.67,
                "CO₂ rises with temperature. Optimise cooling on hot days.",
            ),
        ]
    }
}

fn computed_insights(history: &[Reading], metrics: &[Metric]) -> Vec<CorrelationInsight> {
    let columns: Vec<(Metric, Vec<f64>)> = metrics
        .iter()
        .map(|&metric| (metric, series(history, metric)))
        .collect();

    let mut insights = Vec::new();
    for (i, (a, xs)) in columns.iter().enumerate() {
        for (b, ys) in &columns[i + 1..] {
            let Some(r) = pearson(xs, ys) else {
                debug!(a = a.key(), b = b.key(), "Correlation undefined, skipping pair");
                continue;
            };
            let r = round_to(r, 2);
            insights.push(CorrelationInsight::new(
                a.display_name(),
                b.display_name(),
                r,
                &describe(*a, *b, r),
            ));
        }
    }
    insights
}

fn describe(a: Metric, b: Metric, r: f64) -> String {
    let strength = r.abs();
    if strength >= STRONG_CORRELATION {
        if r > 0.0 {
            format!("{a} and {b} rise and fall together. Controlling one will likely reduce the other.")
        } else {
            format!("{a} and {b} move in opposite directions. Check for a shared cause before acting.")
        }
    } else if strength >= MODERATE_CORRELATION {
        let direction = if r > 0.0 { "positively" } else { "negatively" };
        format!("{a} and {b} are moderately {direction} related. Monitor them together.")
    } else {
        format!("{a} and {b} show little relationship. Manage them independently.")
    }
}
