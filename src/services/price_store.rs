//! Price Series Store
//!
//! One CSV file per (coin, quote currency) pair under the prices directory,
//! named `{coin_id}-{quote}.csv` in lower case (e.g., `eth-btc.csv`):
//!
//! ```text
//! date,open,high,low,close,volume_from,volume_to
//! 2024-01-01,0.0531,0.0540,0.0522,0.0535,18250.4,976.3
//! ```
//!
//! Dates may also be written as full timestamps; they are normalized to the
//! UTC calendar day on read.

use crate::constants::PRICE_CSV_HEADER;
use crate::error::{AppError, Result};
use crate::models::{PriceBar, PriceSeries};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Deserialize)]
struct PriceRow {
    date: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume_from: f64,
    volume_to: f64,
}

/// File-backed cache of daily price series
#[derive(Debug, Clone)]
pub struct PriceStore {
    prices_dir: PathBuf,
}

impl PriceStore {
    pub fn new(prices_dir: impl Into<PathBuf>) -> Self {
        Self {
            prices_dir: prices_dir.into(),
        }
    }

    pub fn prices_dir(&self) -> &Path {
        &self.prices_dir
    }

    fn price_path(&self, coin_id: &str, quote_currency: &str) -> PathBuf {
        self.prices_dir.join(format!(
            "{}-{}.csv",
            sanitize_id(coin_id),
            quote_currency.to_lowercase()
        ))
    }

    pub fn has_prices(&self, coin_id: &str, quote_currency: &str) -> bool {
        self.price_path(coin_id, quote_currency).exists()
    }

    /// Write a series, replacing any cached file for the pair
    pub fn set_prices(&self, series: &PriceSeries) -> Result<PathBuf> {
        fs::create_dir_all(&self.prices_dir)?;
        let path = self.price_path(&series.coin_id, &series.quote_currency);

        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(PRICE_CSV_HEADER)?;
        for bar in series.bars() {
            writer.write_record(&[
                bar.date.format("%Y-%m-%d").to_string(),
                bar.open.to_string(),
                bar.high.to_string(),
                bar.low.to_string(),
                bar.close.to_string(),
                bar.volume_from.to_string(),
                bar.volume_to.to_string(),
            ])?;
        }
        writer.flush()?;

        debug!(
            coin = %series.coin_id,
            quote = %series.quote_currency,
            rows = series.len(),
            "Saved price series"
        );
        Ok(path)
    }

    /// Read a cached series; `None` when the pair is not cached
    pub fn get_prices(&self, coin_id: &str, quote_currency: &str) -> Result<Option<PriceSeries>> {
        let path = self.price_path(coin_id, quote_currency);
        if !path.exists() {
            return Ok(None);
        }

        let mut reader = csv::Reader::from_path(&path)?;
        let mut bars = Vec::new();
        for (line, row) in reader.deserialize::<PriceRow>().enumerate() {
            let row = row?;
            let date = parse_row_date(&row.date).ok_or_else(|| {
                AppError::Parse(format!(
                    "{}: invalid date '{}' on row {}",
                    path.display(),
                    row.date,
                    line + 1
                ))
            })?;
            bars.push(PriceBar::new(
                date,
                row.open,
                row.high,
                row.low,
                row.close,
                row.volume_from,
                row.volume_to,
            ));
        }

        Ok(Some(PriceSeries::from_bars(coin_id, quote_currency, bars)))
    }

    pub fn get_last_date(&self, coin_id: &str, quote_currency: &str) -> Result<Option<NaiveDate>> {
        Ok(self
            .get_prices(coin_id, quote_currency)?
            .and_then(|s| s.last_date()))
    }

    pub fn delete_prices(&self, coin_id: &str, quote_currency: &str) -> Result<bool> {
        let path = self.price_path(coin_id, quote_currency);
        if path.exists() {
            fs::remove_file(path)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// All cached (coin, QUOTE) pairs, sorted
    pub fn list_cached_pairs(&self) -> Result<Vec<(String, String)>> {
        if !self.prices_dir.exists() {
            return Ok(Vec::new());
        }

        let mut pairs = Vec::new();
        for entry in fs::read_dir(&self.prices_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("csv") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if let Some((coin, quote)) = stem.rsplit_once('-') {
                if !coin.is_empty() && !quote.is_empty() {
                    pairs.push((coin.to_string(), quote.to_uppercase()));
                }
            }
        }
        pairs.sort();
        Ok(pairs)
    }

    /// Coin ids cached against a quote currency, sorted
    pub fn list_cached_coins(&self, quote_currency: &str) -> Result<Vec<String>> {
        let quote = quote_currency.to_uppercase();
        Ok(self
            .list_cached_pairs()?
            .into_iter()
            .filter(|(_, q)| *q == quote)
            .map(|(coin, _)| coin)
            .collect())
    }

    /// Load the series of every listed coin that has non-empty cached data
    pub fn load_all(
        &self,
        coin_ids: &[String],
        quote_currency: &str,
        show_progress: bool,
    ) -> Result<BTreeMap<String, PriceSeries>> {
        let pb = if show_progress && !coin_ids.is_empty() {
            let pb = ProgressBar::new(coin_ids.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}")
                    .map_err(|e| AppError::Config(format!("Invalid progress template: {}", e)))?
                    .progress_chars("#>-"),
            );
            pb.set_message("Loading price data");
            Some(pb)
        } else {
            None
        };

        let mut data = BTreeMap::new();
        for coin_id in coin_ids {
            match self.get_prices(coin_id, quote_currency)? {
                Some(series) if !series.is_empty() => {
                    data.insert(series.coin_id.clone(), series);
                }
                Some(_) => warn!(coin = %coin_id, "Cached price series is empty, skipping"),
                None => warn!(coin = %coin_id, "No cached price series, skipping"),
            }
            if let Some(pb) = &pb {
                pb.inc(1);
            }
        }

        if let Some(pb) = pb {
            pb.finish_with_message("Price data loaded");
        }

        info!(loaded = data.len(), requested = coin_ids.len(), "Loaded price series");
        Ok(data)
    }
}

fn sanitize_id(coin_id: &str) -> String {
    coin_id
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS` and RFC 3339 timestamps
fn parse_row_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.naive_utc().date()))
}
