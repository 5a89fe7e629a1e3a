pub mod coin_history;
pub mod composition;
pub mod filter;
pub mod import;
pub mod status;
pub mod total2;
