use crate::models::CompositionRecord;
use chrono::NaiveDate;

/// Basket members of one day, ordered by rank
pub(crate) struct DayBasket<'a> {
    pub date: NaiveDate,
    pub day: usize,
    pub members: &'a [(usize, u32)],
    pub total_volume: f64,
}

/// Emit one record per basket member with its share of the day's volume
pub(crate) fn build_records(
    basket: &DayBasket<'_>,
    coins: &[String],
    close: &[Vec<f64>],
    smoothed_volume: &[Vec<f64>],
    out: &mut Vec<CompositionRecord>,
) {
    for &(coin, rank) in basket.members {
        let volume = smoothed_volume[coin][basket.day];
        out.push(CompositionRecord {
            date: basket.date,
            rank,
            coin_id: coins[coin].clone(),
            volume,
            weight: volume / basket.total_volume,
            price: close[coin][basket.day],
        });
    }
}
