use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One daily OHLCV row for a (coin, quote currency) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    /// Calendar day (midnight UTC)
    pub date: NaiveDate,

    /// Opening price in the quote currency
    pub open: f64,

    /// Highest price in the quote currency
    pub high: f64,

    /// Lowest price in the quote currency
    pub low: f64,

    /// Closing price in the quote currency
    pub close: f64,

    /// Volume traded, in units of the coin
    pub volume_from: f64,

    /// Volume traded, in units of the quote currency
    pub volume_to: f64,
}

impl PriceBar {
    /// Create a new daily bar
    pub fn new(
        date: NaiveDate,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume_from: f64,
        volume_to: f64,
    ) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume_from,
            volume_to,
        }
    }

    /// Create a bar from a raw timestamp, normalized to its UTC calendar day
    pub fn from_timestamp(
        time: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume_from: f64,
        volume_to: f64,
    ) -> Self {
        Self::new(time.date_naive(), open, high, low, close, volume_from, volume_to)
    }
}

/// Daily price series for one coin quoted in one currency
///
/// Invariants established by [`PriceSeries::from_bars`]:
/// - dates strictly increasing, no duplicates
/// - the first bar has `close > 0` (pre-listing placeholder rows are trimmed)
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    pub coin_id: String,
    pub quote_currency: String,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Build a series from unordered bars.
    ///
    /// Bars are keyed by date; when a date repeats the last bar wins. Leading
    /// bars whose close is not positive are dropped.
    pub fn from_bars(coin_id: &str, quote_currency: &str, bars: Vec<PriceBar>) -> Self {
        let mut by_date: BTreeMap<NaiveDate, PriceBar> = BTreeMap::new();
        for bar in bars {
            by_date.insert(bar.date, bar);
        }

        let bars: Vec<PriceBar> = by_date
            .into_values()
            .skip_while(|bar| !(bar.close > 0.0))
            .collect();

        Self {
            coin_id: coin_id.to_lowercase(),
            quote_currency: quote_currency.to_uppercase(),
            bars,
        }
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.bars.first().map(|b| b.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.date)
    }
}
