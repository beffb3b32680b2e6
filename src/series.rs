pub mod assemble;
pub mod range;

use crate::model::{ForecastSummary, SeriesPoint};

/// A historical segment joined with a date-stamped forecast segment.
///
/// `forecast_start_index` marks the first projected point; everything before
/// it is actual data. Downstream consumers branch on the index instead of
/// re-deriving the boundary from dates.
#[derive(Debug, Clone)]
pub struct CombinedSeries {
    pub points: Vec<SeriesPoint>,
    pub forecast_start_index: usize,
    pub summary: ForecastSummary,
}
