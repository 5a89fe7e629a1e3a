use crate::error::Result;
use crate::models::{composition_for_date, parse_date, IndexPoint};
use crate::services::ResultStore;
use crate::utils::get_processed_dir;

pub fn run(date: &str) {
    match show_composition(date) {
        Ok(()) => {}
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn show_composition(date: &str) -> Result<()> {
    let date = parse_date(date)?;
    let store = ResultStore::new(get_processed_dir());

    let index = store.load_index()?;
    let point: Option<&IndexPoint> = index.iter().find(|p| p.date == date);
    let Some(point) = point else {
        println!("⚠️  No TOTAL2 value published for {}", date);
        if let (Some(first), Some(last)) = (index.first(), index.last()) {
            println!("   Available range: {} → {}", first.date, last.date);
        }
        return Ok(());
    };

    let records = composition_for_date(&store.load_composition()?, date);

    println!("🧺 TOTAL2 basket on {}\n", date);
    println!("   Value: {:.8}  ({} coins)\n", point.total2_price, point.coin_count);
    println!("   {:>4}  {:<12} {:>18} {:>9} {:>16}", "Rank", "Coin", "Volume (SMA)", "Weight", "Price");
    for r in &records {
        println!(
            "   {:>4}  {:<12} {:>18.2} {:>8.2}% {:>16.8}",
            r.rank,
            r.coin_id,
            r.volume,
            r.weight * 100.0,
            r.price
        );
    }

    Ok(())
}
