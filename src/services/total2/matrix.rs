use crate::error::{AppError, Result};
use crate::models::PriceSeries;
use chrono::{Duration, NaiveDate};
use std::collections::BTreeMap;
use tracing::debug;

/// Close and volume values of every coin on one shared daily calendar.
///
/// Columns are stored per coin (`close[coin][day]`) in ascending coin-id
/// order. Missing observations are `f64::NAN`. The calendar covers every day
/// from the earliest first date to the latest last date, inclusive.
#[derive(Debug, Clone)]
pub struct AlignedMatrix {
    pub dates: Vec<NaiveDate>,
    pub coins: Vec<String>,
    pub close: Vec<Vec<f64>>,
    pub volume: Vec<Vec<f64>>,
}

impl AlignedMatrix {
    /// Reindex every series onto the union calendar.
    ///
    /// Volume is the quote-currency volume (`volume_to`). Empty series are
    /// ignored; an input without a single observation is an error.
    pub fn align(price_data: &BTreeMap<String, PriceSeries>) -> Result<Self> {
        let bounds = price_data
            .values()
            .filter_map(|s| Some((s.first_date()?, s.last_date()?)))
            .fold(None, |acc: Option<(NaiveDate, NaiveDate)>, (first, last)| match acc {
                None => Some((first, last)),
                Some((lo, hi)) => Some((lo.min(first), hi.max(last))),
            });

        let (start, end) = bounds.ok_or_else(|| {
            AppError::InsufficientData("No dates found in price data".to_string())
        })?;

        let num_days = (end - start).num_days() as usize + 1;
        let dates: Vec<NaiveDate> = (0..num_days)
            .map(|i| start + Duration::days(i as i64))
            .collect();

        let mut coins = Vec::new();
        let mut close = Vec::new();
        let mut volume = Vec::new();

        for (coin_id, series) in price_data {
            if series.is_empty() {
                continue;
            }
            let mut close_col = vec![f64::NAN; num_days];
            let mut volume_col = vec![f64::NAN; num_days];
            for bar in series.bars() {
                let idx = (bar.date - start).num_days() as usize;
                close_col[idx] = bar.close;
                volume_col[idx] = bar.volume_to;
            }
            coins.push(coin_id.clone());
            close.push(close_col);
            volume.push(volume_col);
        }

        debug!(
            coins = coins.len(),
            days = num_days,
            start = %start,
            end = %end,
            "Aligned price and volume matrices"
        );

        Ok(Self {
            dates,
            coins,
            close,
            volume,
        })
    }

    pub fn num_coins(&self) -> usize {
        self.coins.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PriceBar;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn series(coin: &str, days: &[u32]) -> PriceSeries {
        let bars = days
            .iter()
            .map(|&d| PriceBar::new(day(d), 1.0, 1.0, 1.0, d as f64, 0.0, 10.0 * d as f64))
            .collect();
        PriceSeries::from_bars(coin, "BTC", bars)
    }

    #[test]
    fn test_align_builds_gapless_calendar() {
        let mut data = BTreeMap::new();
        data.insert("eth".to_string(), series("eth", &[3, 4, 6]));
        data.insert("ada".to_string(), series("ada", &[1, 2]));

        let m = AlignedMatrix::align(&data).unwrap();

        assert_eq!(m.dates, (1..=6).map(day).collect::<Vec<_>>());
        assert_eq!(m.coins, vec!["ada", "eth"]);

        // ada: days 1-2 only
        assert_eq!(m.close[0][0], 1.0);
        assert!(m.close[0][2].is_nan());

        // eth: day 5 is a gap inside its history
        assert!(m.close[1][0].is_nan());
        assert_eq!(m.close[1][2], 3.0);
        assert!(m.volume[1][4].is_nan());
        assert_eq!(m.volume[1][5], 60.0);
    }

    #[test]
    fn test_align_empty_input_fails() {
        let data: BTreeMap<String, PriceSeries> = BTreeMap::new();
        assert!(matches!(
            AlignedMatrix::align(&data),
            Err(AppError::InsufficientData(_))
        ));
    }
}
