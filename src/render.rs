use tracing::info;

use crate::pipeline::DashboardView;

/// Sink for a finished dashboard view.
pub trait Renderer: Send + Sync {
    fn render(&self, view: &DashboardView);
}

/// Writes the dashboard as structured log lines.
pub struct TerminalRenderer;

impl Renderer for TerminalRenderer {
    fn render(&self, view: &DashboardView) {
        let boundary = view.forecast_start_index.min(view.points.len());
        let (actual, projected) = view.points.split_at(boundary);

        info!(
            actual = actual.len(),
            projected = projected.len(),
            "price series ready"
        );

        if let Some(last) = actual.last() {
            info!(
                date = %last.date,
                price = last.price,
                sma = last.sma,
                ema = last.ema,
                rsi = last.rsi,
                "latest close"
            );
        }

        for point in projected {
            info!(
                date = %point.date,
                price = point.price,
                low = point.low,
                high = point.high,
                "projected close"
            );
        }

        if let Some(summary) = &view.summary {
            info!(
                predicted_high = summary.predicted_high,
                predicted_low = summary.predicted_low,
                change = %format!("{:+.2}%", summary.percentage_change),
                "forecast outlook"
            );
            info!("analysis: {}", summary.text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ForecastSummary, SeriesPoint};

    #[test]
    fn renderer_does_not_panic() {
        let date = "2024-01-10".parse().unwrap();
        let view = DashboardView {
            points: vec![SeriesPoint::historical(date, 19_500.0)],
            forecast_start_index: 1,
            summary: Some(ForecastSummary {
                text: "steady".into(),
                predicted_high: 19_700.0,
                predicted_low: 19_300.0,
                percentage_change: 0.4,
            }),
        };
        // Should not panic
        TerminalRenderer.render(&view);
    }

    #[test]
    fn renderer_handles_empty_view() {
        let view = DashboardView {
            points: Vec::new(),
            forecast_start_index: 0,
            summary: None,
        };
        TerminalRenderer.render(&view);
    }
}
