//! TOTAL2 calculation command
//!
//! Usage:
//! - Defaults (top 50, 28-day volume SMA, BTC quote): `halvix total2`
//! - Custom basket: `halvix total2 --top-n 20 --window 14`
//! - Bounded output: `halvix total2 --start 2020-01-01 --end 2023-12-31`

use crate::error::Result;
use crate::models::{all_cycles, parse_date, IndexConfig, Total2Result};
use crate::services::{PriceStore, ResultStore, Total2Processor};
use crate::utils::{get_prices_dir, get_processed_dir};

/// Flags of the `total2` subcommand
#[derive(Debug, Clone)]
pub struct Total2Options {
    pub top_n: usize,
    pub window: usize,
    pub min_constituents: usize,
    pub quote: String,
    pub start: Option<String>,
    pub end: Option<String>,
    pub quiet: bool,
}

pub fn run(options: Total2Options) {
    println!("📈 Calculating TOTAL2 index\n");

    match calculate(&options) {
        Ok(result) => print_summary(&result),
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn calculate(options: &Total2Options) -> Result<Total2Result> {
    let config = IndexConfig {
        volume_sma_window: options.window,
        top_n: options.top_n,
        min_constituents: options.min_constituents,
        quote_currency: options.quote.to_uppercase(),
        start_date: options.start.as_deref().map(parse_date).transpose()?,
        end_date: options.end.as_deref().map(parse_date).transpose()?,
    };

    println!(
        "   Basket: top {} by {}-day volume SMA, min {} coins, quote {}",
        config.top_n, config.volume_sma_window, config.min_constituents, config.quote_currency
    );

    let processor = Total2Processor::new(PriceStore::new(get_prices_dir()), config)?;
    let result = processor.calculate_total2(None, !options.quiet)?;

    let (index_path, composition_path) = ResultStore::new(get_processed_dir()).save(&result)?;
    println!("💾 Saved {}", index_path.display());
    println!("💾 Saved {}\n", composition_path.display());

    Ok(result)
}

fn print_summary(result: &Total2Result) {
    let (first, last) = result.date_range;

    println!("═══════════════════════════════════════════════════════════\n");
    println!("✅ TOTAL2 calculated");
    println!("   Coins processed: {}", result.coins_processed);
    println!("   Days published:  {}", result.index.len());
    println!("   Date range:      {} → {}", first, last);
    println!("   Avg coins/day:   {:.1}", result.avg_coins_per_day);

    if let Some(latest) = result.index.last() {
        println!(
            "   Latest value:    {:.8} ({} coins on {})",
            latest.total2_price, latest.coin_count, latest.date
        );
    }

    println!("\n🔸 Halving cycle coverage");
    for cycle in all_cycles() {
        let days = result
            .index
            .iter()
            .filter(|p| cycle.contains(p.date))
            .count();
        let total = (cycle.end - cycle.start).num_days() + 1;
        println!(
            "   Cycle {} (halving {}): {:>5} / {} days",
            cycle.number, cycle.halving, days, total
        );
    }
}
