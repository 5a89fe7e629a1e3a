//! CryptoCompare `histoday` payload import
//!
//! Converts a saved `/data/v2/histoday` response into a [`PriceSeries`].
//! Fetching the payload is left to the caller; this module only parses it.
//!
//! ```json
//! {"Response":"Success","Message":"","Data":{"Aggregated":false,
//!   "TimeFrom":1704067200,"TimeTo":1704153600,
//!   "Data":[{"time":1704067200,"high":0.054,"low":0.052,"open":0.053,
//!            "volumefrom":18250.4,"volumeto":976.3,"close":0.0535}]}}
//! ```

use crate::error::{AppError, Result};
use crate::models::{PriceBar, PriceSeries};
use chrono::DateTime;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct HistodayResponse {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Message")]
    #[serde(default)]
    message: String,
    #[serde(rename = "Data")]
    #[serde(default)]
    data: Option<HistodayData>,
}

#[derive(Debug, Deserialize)]
struct HistodayData {
    #[serde(rename = "Data")]
    #[serde(default)]
    data: Vec<HistodayCandle>,
}

#[derive(Debug, Deserialize)]
struct HistodayCandle {
    time: i64,
    high: f64,
    low: f64,
    open: f64,
    #[serde(rename = "volumefrom")]
    volume_from: f64,
    #[serde(rename = "volumeto")]
    volume_to: f64,
    close: f64,
}

/// Parse a histoday JSON payload for `coin_id` quoted in `quote_currency`
pub fn parse_histoday(coin_id: &str, quote_currency: &str, json: &str) -> Result<PriceSeries> {
    let response: HistodayResponse = serde_json::from_str(json)?;

    if response.response != "Success" {
        return Err(AppError::InvalidInput(format!(
            "CryptoCompare returned '{}' for {}/{}: {}",
            response.response, coin_id, quote_currency, response.message
        )));
    }

    let candles = response.data.map(|d| d.data).unwrap_or_default();
    let mut bars = Vec::with_capacity(candles.len());
    for candle in candles {
        let time = DateTime::from_timestamp(candle.time, 0).ok_or_else(|| {
            AppError::Parse(format!("Invalid timestamp {} for {}", candle.time, coin_id))
        })?;
        bars.push(PriceBar::from_timestamp(
            time,
            candle.open,
            candle.high,
            candle.low,
            candle.close,
            candle.volume_from,
            candle.volume_to,
        ));
    }

    Ok(PriceSeries::from_bars(coin_id, quote_currency, bars))
}

/// Read and parse a histoday payload from disk
pub fn load_histoday_file(coin_id: &str, quote_currency: &str, path: &Path) -> Result<PriceSeries> {
    if !path.exists() {
        return Err(AppError::NotFound(format!("Histoday file {}", path.display())));
    }
    let json = std::fs::read_to_string(path)?;
    parse_histoday(coin_id, quote_currency, &json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const PAYLOAD: &str = r#"{
        "Response": "Success",
        "Message": "",
        "HasWarning": false,
        "Type": 100,
        "Data": {
            "Aggregated": false,
            "TimeFrom": 1704067200,
            "TimeTo": 1704240000,
            "Data": [
                {"time": 1704067200, "high": 0, "low": 0, "open": 0, "volumefrom": 0, "volumeto": 0, "close": 0, "conversionType": "direct", "conversionSymbol": ""},
                {"time": 1704153600, "high": 0.055, "low": 0.051, "open": 0.052, "volumefrom": 1000.5, "volumeto": 53.2, "close": 0.054, "conversionType": "direct", "conversionSymbol": ""},
                {"time": 1704240000, "high": 0.056, "low": 0.053, "open": 0.054, "volumefrom": 900.0, "volumeto": 49.9, "close": 0.055, "conversionType": "direct", "conversionSymbol": ""}
            ]
        }
    }"#;

    #[test]
    fn test_parse_histoday_trims_pre_listing_rows() {
        let series = parse_histoday("ETH", "BTC", PAYLOAD).unwrap();
        assert_eq!(series.coin_id, "eth");
        assert_eq!(series.len(), 2);
        assert_eq!(series.first_date(), NaiveDate::from_ymd_opt(2024, 1, 2));
        assert_eq!(series.bars()[0].volume_to, 53.2);
    }

    #[test]
    fn test_parse_histoday_error_response() {
        let json = r#"{"Response":"Error","Message":"market does not exist","Data":{}}"#;
        let err = parse_histoday("nope", "BTC", json).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
        assert!(err.to_string().contains("market does not exist"));
    }

    #[test]
    fn test_load_histoday_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("eth-btc.json");
        std::fs::write(&path, PAYLOAD).unwrap();

        let series = load_histoday_file("eth", "btc", &path).unwrap();
        assert_eq!(series.quote_currency, "BTC");
        assert_eq!(series.last_date(), NaiveDate::from_ymd_opt(2024, 1, 3));

        let missing = load_histoday_file("eth", "btc", &dir.path().join("none.json"));
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }
}
