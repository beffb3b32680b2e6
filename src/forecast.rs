pub mod gemini;

use error_stack::Report;
use futures::future::BoxFuture;

use crate::error::ForecastError;
use crate::model::{ForecastOutcome, SeriesPoint};

/// Capability that turns an ordered historical series into a multi-day
/// forecast.
///
/// Uses `BoxFuture` (from `futures` crate) instead of `async fn` in trait
/// to keep the trait object-safe (`dyn Forecaster`), so the pipeline can be
/// handed a test double instead of a live client.
pub trait Forecaster: Send + Sync {
    /// Provider name used in logs and error reports.
    fn provider(&self) -> &str;

    /// Request a `horizon_days`-step forecast anchored on `historical`.
    ///
    /// Implementations keep at most one request in flight and never retry;
    /// a failed call surfaces once and the caller decides whether to
    /// re-invoke. Any structural mismatch in the response (missing keys,
    /// wrong types, wrong step count) is a `ForecastError` — partial
    /// results are never returned.
    fn forecast(
        &self,
        historical: &[SeriesPoint],
        horizon_days: usize,
    ) -> BoxFuture<'_, Result<ForecastOutcome, Report<ForecastError>>>;
}
