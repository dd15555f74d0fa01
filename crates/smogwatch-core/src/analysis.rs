//! Combined analysis run over one history window.

use serde::Serialize;
use tracing::info;

use smogwatch_types::{Anomaly, CorrelationInsight, Reading, TrendPrediction};

use crate::anomaly::AnomalyDetector;
use crate::correlation::{CorrelationMode, analyze_correlations};
use crate::error::Result;
use crate::predict::{Clock, Predictor, PredictorConfig};
use crate::weather::WeatherSource;

/// Everything the engine reports for one window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    /// Number of readings analysed.
    pub samples: usize,
    pub predictions: Vec<TrendPrediction>,
    pub anomalies: Vec<Anomaly>,
    pub correlations: Vec<CorrelationInsight>,
}

/// Runs prediction, anomaly detection and correlation together.
#[derive(Debug)]
pub struct Analyzer {
    predictor: Predictor,
    detector: AnomalyDetector,
    correlation_mode: CorrelationMode,
}

impl Analyzer {
    /// Create an analyzer; the detector tracks the same metrics as the predictor.
    pub fn new(config: PredictorConfig) -> Result<Self> {
        let detector = AnomalyDetector::default().with_metrics(config.metrics.clone());
        Ok(Self {
            predictor: Predictor::new(config)?,
            detector,
            correlation_mode: CorrelationMode::default(),
        })
    }

    /// Replace the anomaly detector.
    #[must_use]
    pub fn with_detector(mut self, detector: AnomalyDetector) -> Self {
        self.detector = detector;
        self
    }

    /// Replace the correlation mode.
    #[must_use]
    pub fn with_correlation_mode(mut self, mode: CorrelationMode) -> Self {
        self.correlation_mode = mode;
        self
    }

    /// Replace the predictor's weather source.
    #[must_use]
    pub fn with_weather(mut self, weather: impl WeatherSource + 'static) -> Self {
        self.predictor = self.predictor.with_weather(weather);
        self
    }

    /// Replace the predictor's clock.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.predictor = self.predictor.with_clock(clock);
        self
    }

    pub fn predictor_mut(&mut self) -> &mut Predictor {
        &mut self.predictor
    }

    pub fn detector(&self) -> &AnomalyDetector {
        &self.detector
    }

    pub fn correlation_mode(&self) -> CorrelationMode {
        self.correlation_mode
    }

    /// Forecast the tracked metrics.
    pub fn predictions(&mut self, history: &[Reading]) -> Vec<TrendPrediction> {
        self.predictor.generate_predictions(history)
    }

    /// Detect outliers with the configured detector.
    pub fn anomalies(&self, history: &[Reading]) -> Vec<Anomaly> {
        self.detector.detect(history)
    }

    /// Report metric relationships in the configured mode.
    pub fn correlations(&self, history: &[Reading]) -> Vec<CorrelationInsight> {
        analyze_correlations(
            history,
            &self.predictor.config().metrics,
            self.correlation_mode,
        )
    }

    /// Run every analysis over `history`.
    pub fn analyze(&mut self, history: &[Reading]) -> AnalysisReport {
        let report = AnalysisReport {
            samples: history.len(),
            predictions: self.predictions(history),
            anomalies: self.anomalies(history),
            correlations: self.correlations(history),
        };
        info!(
            samples = report.samples,
            predictions = report.predictions.len(),
            anomalies = report.anomalies.len(),
            correlations = report.correlations.len(),
            "Analysis complete"
        );
        report
    }
}
