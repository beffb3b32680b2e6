use chrono::Days;
use error_stack::{Report, bail};

use crate::error::SeriesError;
use crate::model::{ForecastOutcome, ForecastStep, ForecastSummary, SeriesPoint};
use crate::series::CombinedSeries;

/// Join historical points with a raw forecast into one chartable sequence.
///
/// Historical dates are authoritative: forecast step `k` is stamped with the
/// last historical date plus `k + 1` calendar days. Plain day increments,
/// no trading-calendar or weekend skip on the forecast side.
pub fn assemble(
    historical: &[SeriesPoint],
    outcome: &ForecastOutcome,
) -> Result<CombinedSeries, Report<SeriesError>> {
    let Some(last) = historical.last() else {
        bail!(SeriesError::InsufficientHistory);
    };

    validate_steps(&outcome.steps)?;

    let mut points = historical.to_vec();
    points.reserve(outcome.steps.len());
    for (k, step) in outcome.steps.iter().enumerate() {
        let date = last
            .date
            .checked_add_days(Days::new(k as u64 + 1))
            .ok_or_else(|| Report::new(SeriesError::DateOutOfRange))?;
        points.push(SeriesPoint {
            date,
            price: step.price,
            high: Some(step.high),
            low: Some(step.low),
            sma: None,
            ema: None,
            rsi: None,
        });
    }

    let summary = build_summary(last, outcome);

    Ok(CombinedSeries {
        points,
        forecast_start_index: historical.len(),
        summary,
    })
}

fn validate_steps(steps: &[ForecastStep]) -> Result<(), Report<SeriesError>> {
    if steps.is_empty() {
        bail!(SeriesError::MalformedForecast {
            reason: "empty forecast".into(),
        });
    }
    for (k, step) in steps.iter().enumerate() {
        if !step.price.is_finite() || !step.high.is_finite() || !step.low.is_finite() {
            bail!(SeriesError::MalformedForecast {
                reason: format!("non-finite value at step {k}"),
            });
        }
        if step.low > step.high || step.price < step.low || step.price > step.high {
            bail!(SeriesError::MalformedForecast {
                reason: format!("confidence band does not bracket price at step {k}"),
            });
        }
    }
    Ok(())
}

/// Metrics declared by the collaborator are passed through as given; the
/// model's stated values are the reported ones. Missing metrics are derived
/// from the steps.
fn build_summary(last_historical: &SeriesPoint, outcome: &ForecastOutcome) -> ForecastSummary {
    let derived_high = outcome
        .steps
        .iter()
        .map(|s| s.high)
        .fold(f64::NEG_INFINITY, f64::max);
    let derived_low = outcome
        .steps
        .iter()
        .map(|s| s.low)
        .fold(f64::INFINITY, f64::min);
    let last_forecast_price = outcome
        .steps
        .last()
        .map(|s| s.price)
        .unwrap_or(last_historical.price);
    let derived_change =
        (last_forecast_price - last_historical.price) / last_historical.price * 100.0;

    ForecastSummary {
        text: outcome.summary.clone(),
        predicted_high: outcome.predicted_high.unwrap_or(derived_high),
        predicted_low: outcome.predicted_low.unwrap_or(derived_low),
        percentage_change: outcome.percentage_change.unwrap_or(derived_change),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn historical_ending(last: &str, len: usize) -> Vec<SeriesPoint> {
        let end = date(last);
        (0..len)
            .rev()
            .map(|back| {
                let d = end - chrono::Days::new(back as u64);
                SeriesPoint::historical(d, 100.0 + back as f64)
            })
            .collect()
    }

    fn outcome_with_steps(steps: Vec<ForecastStep>) -> ForecastOutcome {
        ForecastOutcome {
            steps,
            summary: "sideways drift expected".into(),
            predicted_high: None,
            predicted_low: None,
            percentage_change: None,
        }
    }

    fn step(price: f64, high: f64, low: f64) -> ForecastStep {
        ForecastStep { price, high, low }
    }

    #[test]
    fn forecast_dates_continue_from_last_historical_day() {
        let historical = historical_ending("2024-01-10", 3);
        let outcome = outcome_with_steps(vec![
            step(101.0, 103.0, 99.0),
            step(102.0, 104.0, 100.0),
            step(103.0, 105.0, 101.0),
            step(104.0, 106.0, 102.0),
            step(105.0, 107.0, 103.0),
        ]);
        let combined = assemble(&historical, &outcome).unwrap();
        let forecast_dates: Vec<NaiveDate> = combined.points[3..].iter().map(|p| p.date).collect();
        assert_eq!(
            forecast_dates,
            vec![
                date("2024-01-11"),
                date("2024-01-12"),
                date("2024-01-13"),
                date("2024-01-14"),
                date("2024-01-15"),
            ]
        );
    }

    #[test]
    fn boundary_equals_historical_length() {
        for len in [1usize, 60] {
            let historical = historical_ending("2024-03-01", len);
            let outcome = outcome_with_steps(vec![step(101.0, 103.0, 99.0)]);
            let combined = assemble(&historical, &outcome).unwrap();
            assert_eq!(combined.forecast_start_index, len);
            assert_eq!(combined.points.len(), len + 1);
        }
    }

    #[test]
    fn empty_historical_is_rejected() {
        let outcome = outcome_with_steps(vec![step(101.0, 103.0, 99.0)]);
        let result = assemble(&[], &outcome);
        assert!(result.is_err());
    }

    #[test]
    fn historical_points_are_carried_unchanged() {
        let historical = historical_ending("2024-01-10", 5);
        let outcome = outcome_with_steps(vec![step(101.0, 103.0, 99.0)]);
        let combined = assemble(&historical, &outcome).unwrap();
        assert_eq!(&combined.points[..5], &historical[..]);
    }

    #[test]
    fn forecast_points_carry_confidence_band() {
        let historical = historical_ending("2024-01-10", 2);
        let outcome = outcome_with_steps(vec![step(101.0, 103.0, 99.0)]);
        let combined = assemble(&historical, &outcome).unwrap();
        let projected = &combined.points[2];
        assert_eq!(projected.price, 101.0);
        assert_eq!(projected.high, Some(103.0));
        assert_eq!(projected.low, Some(99.0));
        assert!(projected.sma.is_none());
    }

    #[test]
    fn inverted_band_is_rejected() {
        let historical = historical_ending("2024-01-10", 2);
        let outcome = outcome_with_steps(vec![step(101.0, 99.0, 103.0)]);
        assert!(assemble(&historical, &outcome).is_err());
    }

    #[test]
    fn band_excluding_price_is_rejected() {
        let historical = historical_ending("2024-01-10", 2);
        let outcome = outcome_with_steps(vec![step(110.0, 105.0, 99.0)]);
        assert!(assemble(&historical, &outcome).is_err());
    }

    #[test]
    fn non_finite_step_is_rejected() {
        let historical = historical_ending("2024-01-10", 2);
        let outcome = outcome_with_steps(vec![step(f64::NAN, 103.0, 99.0)]);
        assert!(assemble(&historical, &outcome).is_err());
    }

    #[test]
    fn empty_forecast_is_rejected() {
        let historical = historical_ending("2024-01-10", 2);
        let outcome = outcome_with_steps(Vec::new());
        assert!(assemble(&historical, &outcome).is_err());
    }

    #[test]
    fn declared_metrics_pass_through_unchanged() {
        let historical = historical_ending("2024-01-10", 2);
        let mut outcome = outcome_with_steps(vec![step(101.0, 103.0, 99.0)]);
        outcome.predicted_high = Some(120.0);
        outcome.predicted_low = Some(95.0);
        outcome.percentage_change = Some(2.5);
        let combined = assemble(&historical, &outcome).unwrap();
        // Declared values win even when they disagree with the steps.
        assert_eq!(combined.summary.predicted_high, 120.0);
        assert_eq!(combined.summary.predicted_low, 95.0);
        assert_eq!(combined.summary.percentage_change, 2.5);
    }

    #[test]
    fn missing_metrics_are_derived_from_steps() {
        let historical = historical_ending("2024-01-10", 1);
        let last_price = historical.last().unwrap().price;
        let outcome = outcome_with_steps(vec![
            step(101.0, 103.0, 99.0),
            step(102.0, 108.0, 97.0),
        ]);
        let combined = assemble(&historical, &outcome).unwrap();
        assert_eq!(combined.summary.predicted_high, 108.0);
        assert_eq!(combined.summary.predicted_low, 97.0);
        let expected = (102.0 - last_price) / last_price * 100.0;
        assert!((combined.summary.percentage_change - expected).abs() < 1e-12);
    }

    #[test]
    fn summary_text_is_carried() {
        let historical = historical_ending("2024-01-10", 1);
        let outcome = outcome_with_steps(vec![step(101.0, 103.0, 99.0)]);
        let combined = assemble(&historical, &outcome).unwrap();
        assert_eq!(combined.summary.text, "sideways drift expected");
    }
}
