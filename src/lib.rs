//! halvix: a volume-weighted TOTAL2 altcoin index across Bitcoin halving cycles

pub mod cli;
pub mod commands;
pub mod constants;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use error::{AppError, Result};
