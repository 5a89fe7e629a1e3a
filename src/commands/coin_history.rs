use crate::error::Result;
use crate::models::coin_history;
use crate::services::ResultStore;
use crate::utils::get_processed_dir;

pub fn run(coin: &str) {
    match show_history(coin) {
        Ok(()) => {}
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn show_history(coin: &str) -> Result<()> {
    let store = ResultStore::new(get_processed_dir());
    let history = coin_history(&store.load_composition()?, coin);

    let (Some(first), Some(last)) = (history.first(), history.last()) else {
        println!("⚠️  {} was never part of the TOTAL2 basket", coin.to_lowercase());
        return Ok(());
    };

    let best_rank = history.iter().map(|r| r.rank).min().unwrap_or(first.rank);
    let avg_weight = history.iter().map(|r| r.weight).sum::<f64>() / history.len() as f64;
    let max_weight = history.iter().map(|r| r.weight).fold(0.0, f64::max);

    println!("🔹 {} in TOTAL2\n", first.coin_id);
    println!("   Days in basket: {}", history.len());
    println!("   First / last:   {} → {}", first.date, last.date);
    println!("   Best rank:      {}", best_rank);
    println!("   Avg weight:     {:.2}%", avg_weight * 100.0);
    println!("   Max weight:     {:.2}%", max_weight * 100.0);
    println!(
        "   Latest:         rank {} at {:.2}% on {}",
        last.rank,
        last.weight * 100.0,
        last.date
    );

    Ok(())
}
