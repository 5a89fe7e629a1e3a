use super::composition::{build_records, DayBasket};
use super::matrix::AlignedMatrix;
use super::ranking::{inclusion_mask, rank_by_volume};
use super::smoothing::{mask_warmup, smooth_columns};
use crate::error::{AppError, Result};
use crate::models::{CompositionRecord, IndexConfig, IndexPoint, PriceSeries, Total2Result};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Volume-weighted TOTAL2 index over already-eligible price series.
///
/// Algorithm:
/// 1. Align close and quote-volume on one daily calendar
/// 2. Smooth volume with a trailing SMA (`min_periods == window`)
/// 3. Clear each coin's close prices during its own warmup
/// 4. Rank coins per day by smoothed volume, keep rank <= top_n
/// 5. TOTAL2 = Σ(close × smoothed_volume) / Σ(smoothed_volume)
/// 6. Publish days with at least `min_constituents` coins
/// 7. Apply the optional date bounds
///
/// Date bounds are applied last: a value depends only on data up to its own
/// date, so computing over a longer history never revises a published day.
#[derive(Debug, Clone)]
pub struct Total2Engine {
    config: IndexConfig,
}

impl Total2Engine {
    pub fn new(config: IndexConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Compute index points and daily composition
    pub fn compute(&self, price_data: &BTreeMap<String, PriceSeries>) -> Result<Total2Result> {
        let window = self.config.volume_sma_window;
        let matrix = AlignedMatrix::align(price_data)?;

        let smoothed = smooth_columns(&matrix.volume, window);
        let mut close = matrix.close.clone();
        for (coin, col) in close.iter_mut().enumerate() {
            mask_warmup(col, &matrix.volume[coin], window);
        }

        let ranks = rank_by_volume(&smoothed, &close);
        let mask = inclusion_mask(&ranks, self.config.top_n);
        debug!(
            window = window,
            top_n = self.config.top_n,
            "Smoothed volume and ranked coins"
        );

        let mut index = Vec::new();
        let mut composition: Vec<CompositionRecord> = Vec::new();
        let mut members: Vec<(usize, u32)> =
            Vec::with_capacity(self.config.top_n.min(matrix.num_coins()));

        for (day, &date) in matrix.dates.iter().enumerate() {
            members.clear();
            let mut weighted_sum = 0.0;
            let mut total_volume = 0.0;

            for coin in 0..matrix.num_coins() {
                if !mask[coin][day] {
                    continue;
                }
                let volume = smoothed[coin][day];
                weighted_sum += close[coin][day] * volume;
                total_volume += volume;
                if let Some(rank) = ranks[coin][day] {
                    members.push((coin, rank));
                }
            }

            if members.len() < self.config.min_constituents || !self.config.in_range(date) {
                continue;
            }

            let total2_price = weighted_sum / total_volume;
            if !total2_price.is_finite() {
                continue;
            }

            members.sort_by_key(|&(_, rank)| rank);
            index.push(IndexPoint {
                date,
                total2_price,
                total_volume,
                coin_count: members.len() as u32,
            });

            let basket = DayBasket {
                date,
                day,
                members: &members,
                total_volume,
            };
            build_records(&basket, &matrix.coins, &close, &smoothed, &mut composition);
        }

        let (first, last) = match (index.first(), index.last()) {
            (Some(first), Some(last)) => (first.date, last.date),
            _ => {
                return Err(AppError::InsufficientData(format!(
                    "Could not calculate TOTAL2 for any date: no day has at least {} coins \
                     with {} days of volume history",
                    self.config.min_constituents, window
                )))
            }
        };

        let avg_coins_per_day =
            index.iter().map(|p| p.coin_count as f64).sum::<f64>() / index.len() as f64;

        info!(
            coins = matrix.num_coins(),
            days = index.len(),
            start = %first,
            end = %last,
            avg_coins = avg_coins_per_day,
            "Calculated TOTAL2 index"
        );

        Ok(Total2Result {
            index,
            composition,
            coins_processed: matrix.num_coins(),
            date_range: (first, last),
            avg_coins_per_day,
        })
    }
}
