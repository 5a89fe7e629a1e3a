use super::engine::Total2Engine;
use crate::error::{AppError, Result};
use crate::models::{CoinMetadata, IndexConfig, Total2Result};
use crate::services::price_store::PriceStore;
use crate::services::token_filter::{FilterPurpose, TokenFilter};
use tracing::info;

/// Runs a TOTAL2 calculation over the local price cache
pub struct Total2Processor {
    store: PriceStore,
    filter: TokenFilter,
    engine: Total2Engine,
}

impl Total2Processor {
    pub fn new(store: PriceStore, config: IndexConfig) -> Result<Self> {
        let filter = TokenFilter::new(&config.quote_currency)?;
        let engine = Total2Engine::new(config)?;
        Ok(Self {
            store,
            filter,
            engine,
        })
    }

    pub fn config(&self) -> &IndexConfig {
        self.engine.config()
    }

    /// Ids of the candidates eligible for the index basket
    pub fn eligible_coins(&self, candidates: &[CoinMetadata]) -> Vec<String> {
        self.filter
            .filter_coins(candidates, FilterPurpose::Index)
            .into_iter()
            .map(|c| c.id.to_lowercase())
            .collect()
    }

    /// Filter, load and compute.
    ///
    /// Without an explicit candidate list every coin cached against the
    /// configured quote currency is considered.
    pub fn calculate_total2(
        &self,
        candidates: Option<&[CoinMetadata]>,
        show_progress: bool,
    ) -> Result<Total2Result> {
        let quote = &self.config().quote_currency;

        let candidates = match candidates {
            Some(list) => list.to_vec(),
            None => {
                let cached = self.store.list_cached_coins(quote)?;
                if cached.is_empty() {
                    return Err(AppError::Config(format!(
                        "No cached price data found for quote currency {}. Run 'halvix import' first.",
                        quote
                    )));
                }
                cached.iter().map(|id| CoinMetadata::from_id(id)).collect()
            }
        };

        let eligible = self.eligible_coins(&candidates);
        info!(
            candidates = candidates.len(),
            eligible = eligible.len(),
            "Filtered coins for TOTAL2"
        );

        let price_data = self.store.load_all(&eligible, quote, show_progress)?;
        if price_data.is_empty() {
            return Err(AppError::Config(
                "No eligible coins found for TOTAL2 calculation".to_string(),
            ));
        }

        self.engine.compute(&price_data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PriceBar, PriceSeries};
    use chrono::{Duration, NaiveDate};
    use tempfile::TempDir;

    fn write_series(store: &PriceStore, coin: &str, close: f64, volume: f64) {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars = (0..10)
            .map(|i| PriceBar::new(start + Duration::days(i), close, close, close, close, 0.0, volume))
            .collect();
        store
            .set_prices(&PriceSeries::from_bars(coin, "BTC", bars))
            .unwrap();
    }

    fn small_config() -> IndexConfig {
        IndexConfig {
            volume_sma_window: 3,
            top_n: 10,
            min_constituents: 2,
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_cache_is_config_error() {
        let dir = TempDir::new().unwrap();
        let processor = Total2Processor::new(PriceStore::new(dir.path()), small_config()).unwrap();

        let err = processor.calculate_total2(None, false).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_only_ineligible_coins_is_config_error() {
        let dir = TempDir::new().unwrap();
        let store = PriceStore::new(dir.path());
        write_series(&store, "usdt", 1.0, 100.0);
        write_series(&store, "wbtc", 1.0, 100.0);

        let processor = Total2Processor::new(store, small_config()).unwrap();
        let err = processor.calculate_total2(None, false).unwrap_err();
        match err {
            AppError::Config(msg) => assert!(msg.contains("No eligible coins")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_cached_coins_are_filtered_before_compute() {
        let dir = TempDir::new().unwrap();
        let store = PriceStore::new(dir.path());
        write_series(&store, "eth", 0.05, 1000.0);
        write_series(&store, "ada", 0.00001, 500.0);
        write_series(&store, "usdt", 0.00002, 5000.0);

        let processor = Total2Processor::new(store, small_config()).unwrap();
        let result = processor.calculate_total2(None, false).unwrap();

        assert_eq!(result.coins_processed, 2);
        assert!(result.composition.iter().all(|r| r.coin_id != "usdt"));
    }
}
