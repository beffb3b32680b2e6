use error_stack::{Report, bail};

use crate::error::IndicatorError;
use crate::indicator::{Indicator, prices};
use crate::model::SeriesPoint;

/// RSI (Relative Strength Index) using Wilder's smoothing method.
pub struct Rsi {
    period: usize,
}

impl Rsi {
    pub fn new(period: usize) -> Result<Self, Report<IndicatorError>> {
        if period == 0 {
            bail!(IndicatorError::InvalidParameter {
                name: "period must be > 0".into(),
            });
        }
        Ok(Self { period })
    }

    /// Per-index RSI values; `None` through the warm-up window.
    ///
    /// The first value lands at index `period`, after `period` day-over-day
    /// deltas have been consumed to seed the gain/loss averages. There is no
    /// backfill and no interpolation for earlier indices.
    pub fn values(&self, prices: &[f64]) -> Vec<Option<f64>> {
        let mut out = vec![None; prices.len()];
        if prices.len() <= self.period {
            return out;
        }

        let deltas: Vec<f64> = prices.windows(2).map(|w| w[1] - w[0]).collect();

        // Seed using simple average of first `period` gains/losses
        let mut avg_gain: f64 = deltas[..self.period]
            .iter()
            .map(|&d| d.max(0.0))
            .sum::<f64>()
            / self.period as f64;
        let mut avg_loss: f64 = deltas[..self.period]
            .iter()
            .map(|&d| (-d).max(0.0))
            .sum::<f64>()
            / self.period as f64;

        out[self.period] = Some(rsi_value(avg_gain, avg_loss));

        // Wilder smoothing for subsequent values
        for (i, &delta) in deltas.iter().enumerate().skip(self.period) {
            let gain = delta.max(0.0);
            let loss = (-delta).max(0.0);
            avg_gain = (avg_gain * (self.period - 1) as f64 + gain) / self.period as f64;
            avg_loss = (avg_loss * (self.period - 1) as f64 + loss) / self.period as f64;
            out[i + 1] = Some(rsi_value(avg_gain, avg_loss));
        }

        out
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        "rsi"
    }

    fn min_points(&self) -> usize {
        self.period + 1
    }

    fn overlay(&self, series: &[SeriesPoint]) -> Vec<SeriesPoint> {
        series
            .iter()
            .cloned()
            .zip(self.values(&prices(series)))
            .map(|(mut point, value)| {
                point.rsi = value;
                point
            })
            .collect()
    }
}

/// A gain-only run drives RSI to 100; a fully flat run (no gains, no losses)
/// reads as neutral momentum, 50.
fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        if avg_gain == 0.0 {
            return 50.0;
        }
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}
