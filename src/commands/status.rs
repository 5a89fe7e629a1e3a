use crate::error::Result;
use crate::services::{PriceStore, ResultStore};
use crate::utils::{get_data_dir, get_prices_dir, get_processed_dir};
use std::collections::BTreeMap;

pub fn run() {
    println!("📊 halvix Status\n");

    match show_status() {
        Ok(()) => {}
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn show_status() -> Result<()> {
    println!("📁 Data directory: {}\n", get_data_dir().display());

    let pairs = PriceStore::new(get_prices_dir()).list_cached_pairs()?;
    if pairs.is_empty() {
        println!("⚠️  No cached prices found. Run 'halvix import' first.");
    } else {
        let mut by_quote: BTreeMap<String, usize> = BTreeMap::new();
        for (_, quote) in &pairs {
            *by_quote.entry(quote.clone()).or_default() += 1;
        }
        println!("💱 Cached price series: {}", format_number(pairs.len()));
        for (quote, count) in by_quote {
            println!("   {:<6} {:>8} coins", quote, format_number(count));
        }
    }

    println!("\n═══════════════════════════════════════════════════════════\n");

    let results = ResultStore::new(get_processed_dir());
    if !results.has_results() {
        println!("⚠️  No complete TOTAL2 results saved. Run 'halvix total2' first.");
        return Ok(());
    }

    let index = results.load_index()?;
    let composition_rows = results.load_composition()?.len();
    match (index.first(), index.last()) {
        (Some(first), Some(last)) => {
            println!("📈 TOTAL2 index: {} days", format_number(index.len()));
            println!("   Range:  {} → {}", first.date, last.date);
            println!("   Latest: {:.8} ({} coins)", last.total2_price, last.coin_count);
        }
        _ => println!("📈 TOTAL2 index file is empty"),
    }
    println!("🧺 Composition rows: {}", format_number(composition_rows));

    Ok(())
}

fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(7), "7");
        assert_eq!(format_number(1234), "1,234");
        assert_eq!(format_number(1234567), "1,234,567");
    }
}
