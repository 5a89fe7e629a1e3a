use std::cmp::Ordering;

/// Daily rank of every coin by smoothed volume, `rank[coin][day]`.
///
/// Only coins with both a smoothed volume and a close price on a day are
/// ranked. Rank 1 is the highest volume; equal volumes get successive ranks
/// in column order, so no two coins ever share a rank.
pub fn rank_by_volume(smoothed_volume: &[Vec<f64>], close: &[Vec<f64>]) -> Vec<Vec<Option<u32>>> {
    let num_coins = smoothed_volume.len();
    let num_days = smoothed_volume.first().map_or(0, |c| c.len());
    let mut ranks = vec![vec![None; num_days]; num_coins];

    let mut candidates: Vec<(usize, f64)> = Vec::with_capacity(num_coins);
    for day in 0..num_days {
        candidates.clear();
        for coin in 0..num_coins {
            let volume = smoothed_volume[coin][day];
            if volume.is_nan() || close[coin][day].is_nan() {
                continue;
            }
            candidates.push((coin, volume));
        }

        // Stable sort keeps column order among ties
        candidates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

        for (position, &(coin, _)) in candidates.iter().enumerate() {
            ranks[coin][day] = Some(position as u32 + 1);
        }
    }

    ranks
}

/// Inclusion mask: `true` where the coin's rank is within `top_n`
pub fn inclusion_mask(ranks: &[Vec<Option<u32>>], top_n: usize) -> Vec<Vec<bool>> {
    ranks
        .iter()
        .map(|col| {
            col.iter()
                .map(|r| r.map_or(false, |r| (r as usize) <= top_n))
                .collect()
        })
        .collect()
}
