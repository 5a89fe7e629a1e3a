use crate::error::Result;
use crate::models::load_coin_list;
use crate::services::{audit, export_skipped_csv, FilterPurpose, TokenFilter};
use std::path::Path;

pub fn run(coins: &Path, export: Option<&Path>, quote: &str, download: bool) {
    match run_filter(coins, export, quote, download) {
        Ok(()) => {}
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn run_filter(coins: &Path, export: Option<&Path>, quote: &str, download: bool) -> Result<()> {
    let purpose = if download {
        FilterPurpose::Download
    } else {
        FilterPurpose::Index
    };

    let list = load_coin_list(coins)?;
    let filter = TokenFilter::new(quote)?;
    let report = audit(&filter, &list, purpose);

    println!("🔎 Eligibility filter ({:?})\n", purpose);
    println!("   Coins checked: {}", list.len());
    println!("   Accepted:      {}", report.accepted.len());
    println!("   Excluded:      {}", report.skipped.len());
    for (reason, count) in report.summary() {
        println!("     - {}: {}", reason, count);
    }

    if let Some(path) = export {
        export_skipped_csv(&report.skipped, path)?;
        println!("\n💾 Excluded coins written to {}", path.display());
    }

    Ok(())
}
