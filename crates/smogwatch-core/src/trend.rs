//! Day-over-day trend of a single metric.

use smogwatch_types::{DailyTrend, Trend};

/// Percentage change beyond which the day-over-day trend is not stable.
pub const DAILY_TREND_BAND: f64 = 2.0;

/// Compare the latest value against the previous day's average.
///
/// Returns [`DailyTrend::UNCHANGED`] when there is no usable average.
///
/// ```
/// use smogwatch_core::trend::daily_trend;
/// use smogwatch_types::Trend;
///
/// let t = daily_trend(110.0, Some(100.0));
/// assert_eq!(t.percentage_change, 10);
/// assert_eq!(t.trend, Trend::Increasing);
/// ```
pub fn daily_trend(latest: f64, previous_day_average: Option<f64>) -> DailyTrend {
    let Some(average) = previous_day_average else {
        return DailyTrend::UNCHANGED;
    };
    if average == 0.0 || !average.is_finite() || !latest.is_finite() {
        return DailyTrend::UNCHANGED;
    }

    let change = (latest - average) / average * 100.0;
    let trend = if change > DAILY_TREND_BAND {
        Trend::Increasing
    } else if change < -DAILY_TREND_BAND {
        Trend::Decreasing
    } else {
        Trend::Stable
    };

    DailyTrend {
        percentage_change: change.round() as i64,
        trend,
    }
}
