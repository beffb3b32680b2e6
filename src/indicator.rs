pub mod ma;
pub mod rsi;

use crate::model::SeriesPoint;

/// A technical indicator overlaid on an ordered daily series.
///
/// Points must be in ascending date order (oldest first). Indicators operate
/// positionally; calendar gaps between points are ignored.
pub trait Indicator: Send {
    /// Unique name of this indicator (e.g., "rsi", "sma").
    fn name(&self) -> &str;

    /// Minimum number of points required to produce at least one value.
    fn min_points(&self) -> usize;

    /// Return a copy of `series` with this indicator's field populated.
    ///
    /// Output length and date alignment match the input exactly. Indices
    /// inside the warm-up window keep the field `None`, and an input shorter
    /// than the warm-up yields all-`None` rather than an error. Input points
    /// are never mutated, so callers can re-run with a different period
    /// without re-fetching data.
    fn overlay(&self, series: &[SeriesPoint]) -> Vec<SeriesPoint>;
}

/// Extract prices from a slice of series points.
pub fn prices(series: &[SeriesPoint]) -> Vec<f64> {
    series.iter().map(|p| p.price).collect()
}
