pub mod histoday;
pub mod price_store;
pub mod result_store;
pub mod token_filter;
pub mod total2;

pub use histoday::{load_histoday_file, parse_histoday};
pub use price_store::PriceStore;
pub use result_store::ResultStore;
pub use token_filter::{
    audit, export_skipped_csv, EligibilityDecision, ExclusionReason, FilterPurpose, FilterReport,
    SkippedCoin, TokenFilter,
};
pub use total2::{Total2Engine, Total2Processor};
