use crate::constants::{
    DEFAULT_QUOTE_CURRENCY, DEFAULT_VOLUME_SMA_WINDOW, MIN_CONSTITUENTS, TOP_N_FOR_TOTAL2,
};
use crate::error::{AppError, Result};
use chrono::NaiveDate;

/// Configuration for a TOTAL2 computation
#[derive(Debug, Clone, PartialEq)]
pub struct IndexConfig {
    /// Trailing SMA window applied to daily volume (days)
    pub volume_sma_window: usize,

    /// Basket size: coins with rank <= top_n are included each day
    pub top_n: usize,

    /// Dates with fewer included coins are not published
    pub min_constituents: usize,

    /// Quote currency of all price series (e.g., "BTC")
    pub quote_currency: String,

    /// Optional first published date (applied after computation)
    pub start_date: Option<NaiveDate>,

    /// Optional last published date (applied after computation)
    pub end_date: Option<NaiveDate>,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            volume_sma_window: DEFAULT_VOLUME_SMA_WINDOW,
            top_n: TOP_N_FOR_TOTAL2,
            min_constituents: MIN_CONSTITUENTS,
            quote_currency: DEFAULT_QUOTE_CURRENCY.to_string(),
            start_date: None,
            end_date: None,
        }
    }
}

impl IndexConfig {
    /// Check that the configuration can produce an index
    pub fn validate(&self) -> Result<()> {
        if self.volume_sma_window == 0 {
            return Err(AppError::Config(
                "volume SMA window must be at least 1 day".to_string(),
            ));
        }
        if self.top_n == 0 {
            return Err(AppError::Config("top_n must be at least 1".to_string()));
        }
        if self.min_constituents == 0 {
            return Err(AppError::Config(
                "min_constituents must be at least 1".to_string(),
            ));
        }
        if self.quote_currency.trim().is_empty() {
            return Err(AppError::Config("quote currency is empty".to_string()));
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err(AppError::Config(format!(
                    "start date {} is after end date {}",
                    start, end
                )));
            }
        }
        Ok(())
    }

    /// Whether a date falls inside the optional publication bounds
    pub fn in_range(&self, date: NaiveDate) -> bool {
        self.start_date.map_or(true, |s| date >= s) && self.end_date.map_or(true, |e| date <= e)
    }
}

/// Parse a `YYYY-MM-DD` date argument
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| AppError::InvalidInput(format!("Invalid date '{}': {}", s, e)))
}
