use chrono::{Datelike, Days, NaiveDate, Utc, Weekday};
use rand::Rng;

use crate::model::SeriesPoint;

/// Jitter applied to the base price for the opening value, as a fraction.
const START_JITTER: f64 = 0.05;
/// Drift offset inside the random walk; slightly below 0.5 gives the series
/// a mild upward bias.
const WALK_DRIFT: f64 = 0.48;

/// Generate `days` weekday points ending at (or at the last weekday before)
/// today, following a random-walk price process.
///
/// This is a fixture: callers may rely on the series shape (strictly
/// increasing dates, non-negative prices) but not on its statistics.
pub fn generate_series(
    days: usize,
    base_price: f64,
    daily_volatility: f64,
    rng: &mut impl Rng,
) -> Vec<SeriesPoint> {
    generate_ending_at(Utc::now().date_naive(), days, base_price, daily_volatility, rng)
}

fn generate_ending_at(
    today: NaiveDate,
    days: usize,
    base_price: f64,
    daily_volatility: f64,
    rng: &mut impl Rng,
) -> Vec<SeriesPoint> {
    let mut dates = Vec::with_capacity(days);
    let mut date = today;
    while dates.len() < days {
        if !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            dates.push(date);
        }
        match date.checked_sub_days(Days::new(1)) {
            Some(previous) => date = previous,
            None => break,
        }
    }
    dates.reverse();

    let mut price = base_price + rng.gen_range(0.0..base_price * START_JITTER);
    dates
        .into_iter()
        .map(|date| {
            let change = (rng.gen_range(0.0..1.0) - WALK_DRIFT) * price * daily_volatility;
            price += change;
            if price < 0.0 {
                price = price.abs();
            }
            price = (price * 100.0).round() / 100.0;
            SeriesPoint::historical(date, price)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn generates_requested_number_of_points() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let series = generate_ending_at(today, 30, 19_500.0, 0.02, &mut rng());
        assert_eq!(series.len(), 30);
    }

    #[test]
    fn dates_are_strictly_increasing_weekdays() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let series = generate_ending_at(today, 30, 19_500.0, 0.02, &mut rng());
        for pair in series.windows(2) {
            assert!(pair[0].date < pair[1].date);
        }
        for point in &series {
            assert!(!matches!(point.date.weekday(), Weekday::Sat | Weekday::Sun));
        }
    }

    #[test]
    fn series_ends_at_last_weekday_on_or_before_today() {
        // 2024-01-13 is a Saturday; the series must end on Friday the 12th.
        let saturday = NaiveDate::from_ymd_opt(2024, 1, 13).unwrap();
        let series = generate_ending_at(saturday, 5, 19_500.0, 0.02, &mut rng());
        let last = series.last().unwrap().date;
        assert_eq!(last, NaiveDate::from_ymd_opt(2024, 1, 12).unwrap());
    }

    #[test]
    fn prices_are_non_negative_and_rounded() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let series = generate_ending_at(today, 60, 50.0, 0.5, &mut rng());
        for point in &series {
            assert!(point.price >= 0.0);
            let cents = point.price * 100.0;
            assert!((cents - cents.round()).abs() < 1e-6);
        }
    }

    #[test]
    fn generated_points_have_no_computed_fields() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let series = generate_ending_at(today, 10, 19_500.0, 0.02, &mut rng());
        for point in &series {
            assert!(point.high.is_none());
            assert!(point.low.is_none());
            assert!(point.sma.is_none());
        }
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let a = generate_ending_at(today, 30, 19_500.0, 0.02, &mut StdRng::seed_from_u64(42));
        let b = generate_ending_at(today, 30, 19_500.0, 0.02, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }
}
