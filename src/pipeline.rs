use chrono::NaiveDate;
use error_stack::{Report, ResultExt};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::error::PipelineError;
use crate::forecast::Forecaster;
use crate::indicator::Indicator;
use crate::indicator::ma::{Ema, Sma};
use crate::indicator::rsi::Rsi;
use crate::market;
use crate::model::{ForecastSummary, SeriesPoint};
use crate::series::assemble::assemble;
use crate::series::range::filter_range;

/// Finished dashboard state handed to the renderer.
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub points: Vec<SeriesPoint>,
    pub forecast_start_index: usize,
    pub summary: Option<ForecastSummary>,
}

/// Run the full dashboard pipeline: synthesize historical data, optionally
/// forecast and assemble, overlay enabled indicators on the combined series,
/// then restrict to the requested display window.
pub async fn run(
    config: &AppConfig,
    forecaster: Option<&dyn Forecaster>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<DashboardView, Report<PipelineError>> {
    let mut rng: StdRng = match config.market.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let historical = market::generate_series(
        config.market.historical_days,
        config.market.base_price,
        config.market.daily_volatility,
        &mut rng,
    );
    info!(points = historical.len(), "historical series generated");

    let (points, forecast_start_index, summary) = match forecaster {
        Some(forecaster) => {
            let outcome = forecaster
                .forecast(&historical, config.forecast.horizon_days)
                .await
                .change_context(PipelineError::Forecast)?;
            let combined =
                assemble(&historical, &outcome).change_context(PipelineError::Assembly)?;
            info!(
                provider = forecaster.provider(),
                projected = combined.points.len() - combined.forecast_start_index,
                "forecast assembled"
            );
            (
                combined.points,
                combined.forecast_start_index,
                Some(combined.summary),
            )
        }
        None => {
            let boundary = historical.len();
            (historical, boundary, None)
        }
    };

    // Indicators run over the combined series so overlays continue into the
    // projected segment.
    let points = apply_indicators(config, points)?;

    let view = match (from, to) {
        (None, None) => DashboardView {
            points,
            forecast_start_index,
            summary,
        },
        (from, to) => {
            let start = from.unwrap_or(NaiveDate::MIN);
            let end = to.unwrap_or(NaiveDate::MAX);
            let window = filter_range(&points, forecast_start_index, start, end);
            debug!(retained = window.points.len(), "display window applied");
            DashboardView {
                points: window.points,
                forecast_start_index: window.forecast_start_index,
                summary,
            }
        }
    };

    Ok(view)
}

fn apply_indicators(
    config: &AppConfig,
    mut points: Vec<SeriesPoint>,
) -> Result<Vec<SeriesPoint>, Report<PipelineError>> {
    for indicator in build_indicators(config)? {
        if points.len() < indicator.min_points() {
            debug!(
                indicator = indicator.name(),
                points = points.len(),
                required = indicator.min_points(),
                "series shorter than warm-up, values stay absent"
            );
        }
        points = indicator.overlay(&points);
    }
    Ok(points)
}

fn build_indicators(config: &AppConfig) -> Result<Vec<Box<dyn Indicator>>, Report<PipelineError>> {
    let cfg = &config.indicators;
    let mut indicators: Vec<Box<dyn Indicator>> = Vec::new();
    if cfg.sma_enabled {
        indicators.push(Box::new(
            Sma::new(cfg.sma_period).change_context(PipelineError::Indicator)?,
        ));
    }
    if cfg.ema_enabled {
        indicators.push(Box::new(
            Ema::new(cfg.ema_period).change_context(PipelineError::Indicator)?,
        ));
    }
    if cfg.rsi_enabled {
        indicators.push(Box::new(
            Rsi::new(cfg.rsi_period).change_context(PipelineError::Indicator)?,
        ));
    }
    Ok(indicators)
}
