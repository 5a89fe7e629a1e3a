//! Volume smoothing and per-coin warmup masking
//!
//! Each window is summed from scratch, so a smoothed value depends only on
//! the `window` raw values it covers. Extending the history therefore cannot
//! change any earlier smoothed value.

/// Trailing simple moving average with `min_periods == window`.
///
/// Element `i` is the mean of `values[i + 1 - window..=i]` when all of them
/// are present, `NaN` otherwise. A missing day resets the warmup.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    if window == 0 || values.len() < window {
        return out;
    }

    // Length of the run of present values ending at i
    let mut run = 0usize;
    for i in 0..values.len() {
        if values[i].is_nan() {
            run = 0;
            continue;
        }
        run += 1;
        if run >= window {
            let start_idx = i + 1 - window;
            let sum: f64 = values[start_idx..=i].iter().sum();
            out[i] = sum / window as f64;
        }
    }
    out
}

/// Smooth every column of a per-coin volume matrix
pub fn smooth_columns(volume: &[Vec<f64>], window: usize) -> Vec<Vec<f64>> {
    volume.iter().map(|col| rolling_mean(col, window)).collect()
}

/// Null the close prices of a coin before its first smoothed value can exist.
///
/// With the first raw observation at day `f`, days `..= f + window - 2` are
/// cleared; day `f + window - 1` (the first complete window) keeps its price.
pub fn mask_warmup(close: &mut [f64], raw_volume: &[f64], window: usize) {
    let Some(first) = raw_volume.iter().position(|v| !v.is_nan()) else {
        close.iter_mut().for_each(|c| *c = f64::NAN);
        return;
    };
    let warmup_end = first.saturating_add(window.saturating_sub(1)).min(close.len());
    for c in &mut close[..warmup_end] {
        *c = f64::NAN;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAN: f64 = f64::NAN;

    #[test]
    fn test_rolling_mean_requires_full_window() {
        let values = vec![10.0, 11.0, 12.0, 13.0, 14.0, 15.0];
        let ma3 = rolling_mean(&values, 3);

        assert!(ma3[0].is_nan());
        assert!(ma3[1].is_nan());
        assert_eq!(ma3[2], 11.0);
        assert_eq!(ma3[3], 12.0);
        assert_eq!(ma3[5], 14.0);
    }

    #[test]
    fn test_rolling_mean_gap_restarts_warmup() {
        let values = vec![NAN, 1.0, 2.0, 3.0, NAN, 4.0, 5.0, 6.0];
        let ma2 = rolling_mean(&values, 2);

        assert!(ma2[1].is_nan());
        assert_eq!(ma2[2], 1.5);
        assert_eq!(ma2[3], 2.5);
        assert!(ma2[4].is_nan());
        assert!(ma2[5].is_nan());
        assert_eq!(ma2[6], 4.5);
    }

    #[test]
    fn test_rolling_mean_short_input() {
        assert!(rolling_mean(&[1.0, 2.0], 3).iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_window_one_is_identity() {
        assert_eq!(rolling_mean(&[3.0, 4.0], 1), vec![3.0, 4.0]);
    }

    #[test]
    fn test_mask_warmup_keeps_first_complete_window() {
        let window = 3;
        let raw = vec![NAN, 5.0, 5.0, 5.0, 5.0];
        let mut close = vec![NAN, 1.0, 2.0, 3.0, 4.0];

        mask_warmup(&mut close, &raw, window);

        // First raw day is 1 → days 1 and 2 cleared, day 3 kept
        assert!(close[1].is_nan());
        assert!(close[2].is_nan());
        assert_eq!(close[3], 3.0);
        assert_eq!(close[4], 4.0);

        // Smoothed volume appears on exactly the first kept day
        let smoothed = rolling_mean(&raw, window);
        assert!(smoothed[2].is_nan());
        assert_eq!(smoothed[3], 5.0);
    }

    #[test]
    fn test_mask_warmup_huge_window_clears_all() {
        let raw = vec![NAN, NAN, 5.0, 5.0];
        let mut close = vec![NAN, NAN, 1.0, 2.0];
        mask_warmup(&mut close, &raw, usize::MAX);
        assert!(close.iter().all(|c| c.is_nan()));
    }

    #[test]
    fn test_mask_warmup_without_volume_clears_all() {
        let mut close = vec![1.0, 2.0];
        mask_warmup(&mut close, &[NAN, NAN], 3);
        assert!(close.iter().all(|c| c.is_nan()));
    }
}
