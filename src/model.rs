use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One step of a daily price series.
///
/// `price` is the canonical value for both a historical close and a forecast
/// point-estimate. `high`/`low` carry the 90% confidence band and appear on
/// forecast points only. The indicator fields stay `None` until the
/// corresponding indicator has run, and through its warm-up window; absence
/// is never encoded as `0.0` or `NaN`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sma: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ema: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rsi: Option<f64>,
}

impl SeriesPoint {
    /// A plain historical point: no confidence band, no computed fields.
    pub fn historical(date: NaiveDate, price: f64) -> Self {
        Self {
            date,
            price,
            high: None,
            low: None,
            sma: None,
            ema: None,
            rsi: None,
        }
    }
}

/// One raw forecast entry as returned by the collaborator.
///
/// Dates are deliberately absent; the assembler stamps them from the last
/// historical date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastStep {
    pub price: f64,
    pub high: f64,
    pub low: f64,
}

/// Full result of a forecast call.
///
/// The declared metrics are optional: when the collaborator states them they
/// are passed through as given, otherwise the assembler derives them from
/// the steps.
#[derive(Debug, Clone)]
pub struct ForecastOutcome {
    pub steps: Vec<ForecastStep>,
    pub summary: String,
    pub predicted_high: Option<f64>,
    pub predicted_low: Option<f64>,
    pub percentage_change: Option<f64>,
}

/// Headline metrics shown alongside the combined series.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSummary {
    pub text: String,
    pub predicted_high: f64,
    pub predicted_low: f64,
    pub percentage_change: f64,
}
