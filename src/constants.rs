//! Index Constants
//!
//! Defaults for the TOTAL2 computation and the on-disk layout.
//!
//! ## TOTAL2 Defaults
//!
//! | Setting              | Default | Meaning                                      |
//! |----------------------|---------|----------------------------------------------|
//! | volume SMA window    | 28      | Trailing days averaged to smooth volume      |
//! | basket size (top_n)  | 50      | Coins ranked by smoothed volume per day      |
//! | min constituents     | 3       | Days with fewer included coins are dropped   |
//! | quote currency       | BTC     | Currency every price series is quoted in     |

use chrono::NaiveDate;

/// Trailing window (days) for the volume simple moving average
pub const DEFAULT_VOLUME_SMA_WINDOW: usize = 28;

/// Number of coins in the daily TOTAL2 basket
pub const TOP_N_FOR_TOTAL2: usize = 50;

/// Minimum number of included coins for a date to be published
pub const MIN_CONSTITUENTS: usize = 3;

/// Currency the index is denominated in (never a constituent)
pub const DEFAULT_QUOTE_CURRENCY: &str = "BTC";

/// Full name of the base currency, matched against coin ids and names
pub const BASE_CURRENCY_NAME: &str = "bitcoin";

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "HALVIX_DATA_DIR";

/// Default data directory when `HALVIX_DATA_DIR` is unset
pub const DEFAULT_DATA_DIR: &str = "data";

/// Sub-directory holding `{coin}-{quote}.csv` price files
pub const PRICES_SUBDIR: &str = "prices";

/// Sub-directory holding computed results
pub const PROCESSED_SUBDIR: &str = "processed";

/// Parquet file with one row per published index date
pub const TOTAL2_INDEX_FILE: &str = "total2_index.parquet";

/// Parquet file with one row per (date, constituent)
pub const TOTAL2_COMPOSITION_FILE: &str = "total2_daily_composition.parquet";

/// Header of the per-coin price CSV files
pub const PRICE_CSV_HEADER: [&str; 7] = [
    "date",
    "open",
    "high",
    "low",
    "close",
    "volume_from",
    "volume_to",
];

/// Bitcoin block-reward halving dates (year, month, day)
pub const HALVING_DATES: [(i32, u32, u32); 4] = [
    (2012, 11, 28),
    (2016, 7, 9),
    (2020, 5, 11),
    (2024, 4, 19),
];

/// Days shown before and after each halving when slicing cycles
pub const DAYS_BEFORE_HALVING: i64 = 550;
pub const DAYS_AFTER_HALVING: i64 = 550;

/// Halving dates as `NaiveDate`
pub fn halving_dates() -> Vec<NaiveDate> {
    HALVING_DATES
        .iter()
        .filter_map(|&(y, m, d)| NaiveDate::from_ymd_opt(y, m, d))
        .collect()
}
