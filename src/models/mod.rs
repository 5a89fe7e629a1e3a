mod coin;
mod halving;
mod index_config;
mod price_series;
mod total2;

pub use coin::{load_coin_list, parse_coin_list, CoinMetadata};
pub use halving::{all_cycles, cycle_window, HalvingCycle};
pub use index_config::{parse_date, IndexConfig};
pub use price_series::{PriceBar, PriceSeries};
pub use total2::{coin_history, composition_for_date, CompositionRecord, IndexPoint, Total2Result};
