//! Halving cycle windows
//!
//! A cycle window spans `DAYS_BEFORE_HALVING` days before a halving through
//! `DAYS_AFTER_HALVING` days after it. The index engine never uses these;
//! they only slice published results for reporting.

use crate::constants::{halving_dates, DAYS_AFTER_HALVING, DAYS_BEFORE_HALVING};
use chrono::{Duration, NaiveDate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HalvingCycle {
    /// 1-based cycle number
    pub number: usize,
    pub start: NaiveDate,
    pub halving: NaiveDate,
    pub end: NaiveDate,
}

impl HalvingCycle {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Window around a single halving date
pub fn cycle_window(halving: NaiveDate) -> (NaiveDate, NaiveDate) {
    (
        halving - Duration::days(DAYS_BEFORE_HALVING),
        halving + Duration::days(DAYS_AFTER_HALVING),
    )
}

/// All known halving cycles in chronological order
pub fn all_cycles() -> Vec<HalvingCycle> {
    halving_dates()
        .into_iter()
        .enumerate()
        .map(|(i, halving)| {
            let (start, end) = cycle_window(halving);
            HalvingCycle {
                number: i + 1,
                start,
                halving,
                end,
            }
        })
        .collect()
}
