use chrono::NaiveDate;

use crate::model::SeriesPoint;

/// A window of a combined series, with the actual/projected boundary
/// recomputed for the retained points.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeView {
    pub points: Vec<SeriesPoint>,
    pub forecast_start_index: usize,
}

/// Restrict `points` to the inclusive `[start, end]` day window.
///
/// Comparison is at day granularity. `start > end` yields an empty view,
/// not an error. The recomputed boundary is the first retained point dated
/// on or after the first forecast date; when the window drops the forecast
/// entirely it equals the filtered length.
pub fn filter_range(
    points: &[SeriesPoint],
    forecast_start_index: usize,
    start: NaiveDate,
    end: NaiveDate,
) -> RangeView {
    if start > end {
        return RangeView {
            points: Vec::new(),
            forecast_start_index: 0,
        };
    }

    let retained: Vec<SeriesPoint> = points
        .iter()
        .filter(|p| p.date >= start && p.date <= end)
        .cloned()
        .collect();

    let boundary = match points.get(forecast_start_index) {
        Some(first_forecast) => retained
            .iter()
            .position(|p| p.date >= first_forecast.date)
            .unwrap_or(retained.len()),
        None => retained.len(),
    };

    RangeView {
        points: retained,
        forecast_start_index: boundary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    // 4 historical days ending 2024-01-10, then 3 forecast days
    fn combined() -> (Vec<SeriesPoint>, usize) {
        let days = [
            "2024-01-07",
            "2024-01-08",
            "2024-01-09",
            "2024-01-10",
            "2024-01-11",
            "2024-01-12",
            "2024-01-13",
        ];
        let points = days
            .iter()
            .enumerate()
            .map(|(i, d)| {
                let mut p = SeriesPoint::historical(date(d), 100.0 + i as f64);
                if i >= 4 {
                    p.high = Some(p.price + 2.0);
                    p.low = Some(p.price - 2.0);
                }
                p
            })
            .collect();
        (points, 4)
    }

    #[test]
    fn full_range_is_identity() {
        let (points, boundary) = combined();
        let view = filter_range(&points, boundary, date("2024-01-07"), date("2024-01-13"));
        assert_eq!(view.points, points);
        assert_eq!(view.forecast_start_index, boundary);
    }

    #[test]
    fn inverted_window_is_empty_not_an_error() {
        let (points, boundary) = combined();
        let view = filter_range(&points, boundary, date("2024-01-13"), date("2024-01-07"));
        assert!(view.points.is_empty());
        assert_eq!(view.forecast_start_index, 0);
    }

    #[test]
    fn window_outside_data_is_empty() {
        let (points, boundary) = combined();
        let view = filter_range(&points, boundary, date("2025-06-01"), date("2025-06-30"));
        assert!(view.points.is_empty());
        assert_eq!(view.forecast_start_index, 0);
    }

    #[test]
    fn boundaries_are_inclusive() {
        let (points, boundary) = combined();
        let view = filter_range(&points, boundary, date("2024-01-08"), date("2024-01-11"));
        let dates: Vec<NaiveDate> = view.points.iter().map(|p| p.date).collect();
        assert_eq!(
            dates,
            vec![
                date("2024-01-08"),
                date("2024-01-09"),
                date("2024-01-10"),
                date("2024-01-11"),
            ]
        );
    }

    #[test]
    fn boundary_shifts_when_history_is_trimmed() {
        let (points, boundary) = combined();
        let view = filter_range(&points, boundary, date("2024-01-09"), date("2024-01-13"));
        // 2 historical days retained, then the forecast
        assert_eq!(view.forecast_start_index, 2);
        assert_eq!(view.points.len(), 5);
    }

    #[test]
    fn boundary_equals_length_when_forecast_is_excluded() {
        let (points, boundary) = combined();
        let view = filter_range(&points, boundary, date("2024-01-07"), date("2024-01-10"));
        assert_eq!(view.points.len(), 4);
        assert_eq!(view.forecast_start_index, 4);
    }

    #[test]
    fn boundary_is_zero_when_history_is_excluded() {
        let (points, boundary) = combined();
        let view = filter_range(&points, boundary, date("2024-01-11"), date("2024-01-13"));
        assert_eq!(view.points.len(), 3);
        assert_eq!(view.forecast_start_index, 0);
    }

    #[test]
    fn boundary_handles_partially_trimmed_forecast() {
        let (points, boundary) = combined();
        let view = filter_range(&points, boundary, date("2024-01-12"), date("2024-01-13"));
        // First forecast day dropped; the retained tail is all projected.
        assert_eq!(view.points.len(), 2);
        assert_eq!(view.forecast_start_index, 0);
    }

    #[test]
    fn series_without_forecast_keeps_boundary_at_length() {
        let (points, _) = combined();
        let historical_only = &points[..4];
        let view = filter_range(historical_only, 4, date("2024-01-07"), date("2024-01-13"));
        assert_eq!(view.points.len(), 4);
        assert_eq!(view.forecast_start_index, 4);
    }
}
