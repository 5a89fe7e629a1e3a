use crate::error::Result;
use crate::services::{load_histoday_file, PriceStore};
use crate::utils::get_prices_dir;
use std::path::Path;

pub fn run(coin: &str, file: &Path, quote: &str) {
    match import(coin, file, quote) {
        Ok(()) => {}
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn import(coin: &str, file: &Path, quote: &str) -> Result<()> {
    let series = load_histoday_file(coin, quote, file)?;
    let store = PriceStore::new(get_prices_dir());
    let path = store.set_prices(&series)?;

    match (series.first_date(), series.last_date()) {
        (Some(first), Some(last)) => println!(
            "✅ Imported {} {}/{} bars ({} → {}) into {}",
            series.len(),
            series.coin_id,
            series.quote_currency,
            first,
            last,
            path.display()
        ),
        _ => println!(
            "⚠️  {} contained no priced bars; wrote empty series to {}",
            file.display(),
            path.display()
        ),
    }

    Ok(())
}
