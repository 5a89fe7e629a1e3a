use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One published TOTAL2 value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexPoint {
    pub date: NaiveDate,

    /// Σ(close × smoothed_volume) / Σ(smoothed_volume) over the basket
    pub total2_price: f64,

    /// Σ(smoothed_volume) over the basket (the weight basis)
    pub total_volume: f64,

    /// Number of coins in the basket
    pub coin_count: u32,
}

/// One constituent of the basket on one date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionRecord {
    pub date: NaiveDate,

    /// 1 = highest smoothed volume that day
    pub rank: u32,

    pub coin_id: String,

    /// Smoothed volume in the quote currency
    pub volume: f64,

    /// volume / total_volume of the parent index point
    pub weight: f64,

    /// Close price in the quote currency
    pub price: f64,
}

/// Output of a TOTAL2 computation
#[derive(Debug, Clone)]
pub struct Total2Result {
    /// Published index points, ascending by date
    pub index: Vec<IndexPoint>,

    /// Composition records, ascending by (date, rank)
    pub composition: Vec<CompositionRecord>,

    /// Number of coin series that entered the computation
    pub coins_processed: usize,

    /// First and last published dates
    pub date_range: (NaiveDate, NaiveDate),

    /// Mean basket size over published dates
    pub avg_coins_per_day: f64,
}

impl Total2Result {
    /// Look up the index point for a date
    pub fn point(&self, date: NaiveDate) -> Option<&IndexPoint> {
        self.index
            .binary_search_by_key(&date, |p| p.date)
            .ok()
            .map(|i| &self.index[i])
    }
}

/// Basket on a given date, ordered by rank
pub fn composition_for_date(records: &[CompositionRecord], date: NaiveDate) -> Vec<CompositionRecord> {
    let mut day: Vec<CompositionRecord> = records
        .iter()
        .filter(|r| r.date == date)
        .cloned()
        .collect();
    day.sort_by_key(|r| r.rank);
    day
}

/// Dates on which a coin was in the basket, ordered by date
pub fn coin_history(records: &[CompositionRecord], coin_id: &str) -> Vec<CompositionRecord> {
    let coin_id = coin_id.to_lowercase();
    let mut history: Vec<CompositionRecord> = records
        .iter()
        .filter(|r| r.coin_id == coin_id)
        .cloned()
        .collect();
    history.sort_by_key(|r| r.date);
    history
}
