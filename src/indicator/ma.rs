use error_stack::{Report, bail};

use crate::error::IndicatorError;
use crate::indicator::{Indicator, prices};
use crate::model::SeriesPoint;

/// Simple Moving Average.
pub struct Sma {
    period: usize,
}

impl Sma {
    pub fn new(period: usize) -> Result<Self, Report<IndicatorError>> {
        if period == 0 {
            bail!(IndicatorError::InvalidParameter {
                name: "period must be > 0".into(),
            });
        }
        Ok(Self { period })
    }

    /// Per-index SMA values; `None` through the warm-up window.
    pub fn values(&self, prices: &[f64]) -> Vec<Option<f64>> {
        let mut out = vec![None; prices.len()];
        if prices.len() < self.period {
            return out;
        }
        for (i, window) in prices.windows(self.period).enumerate() {
            out[i + self.period - 1] = Some(window.iter().sum::<f64>() / self.period as f64);
        }
        out
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        "sma"
    }

    fn min_points(&self) -> usize {
        self.period
    }

    fn overlay(&self, series: &[SeriesPoint]) -> Vec<SeriesPoint> {
        series
            .iter()
            .cloned()
            .zip(self.values(&prices(series)))
            .map(|(mut point, value)| {
                point.sma = value;
                point
            })
            .collect()
    }
}

/// Exponential Moving Average.
pub struct Ema {
    period: usize,
}

impl Ema {
    pub fn new(period: usize) -> Result<Self, Report<IndicatorError>> {
        if period == 0 {
            bail!(IndicatorError::InvalidParameter {
                name: "period must be > 0".into(),
            });
        }
        Ok(Self { period })
    }

    /// Per-index EMA values; `None` through the warm-up window.
    ///
    /// The first value is the SMA of the first `period` prices, placed at
    /// index `period - 1`. Seeding from the SMA anchor (not the first price)
    /// is required for numeric parity with standard charting tools.
    pub fn values(&self, prices: &[f64]) -> Vec<Option<f64>> {
        let mut out = vec![None; prices.len()];
        if prices.len() < self.period {
            return out;
        }

        let k = 2.0 / (self.period as f64 + 1.0);
        let mut ema = prices[..self.period].iter().sum::<f64>() / self.period as f64;
        out[self.period - 1] = Some(ema);

        for (i, &price) in prices.iter().enumerate().skip(self.period) {
            ema = (price - ema) * k + ema;
            out[i] = Some(ema);
        }
        out
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        "ema"
    }

    fn min_points(&self) -> usize {
        self.period
    }

    fn overlay(&self, series: &[SeriesPoint]) -> Vec<SeriesPoint> {
        series
            .iter()
            .cloned()
            .zip(self.values(&prices(series)))
            .map(|(mut point, value)| {
                point.ema = value;
                point
            })
            .collect()
    }
}
