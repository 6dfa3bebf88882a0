//! Average True Range.
//!
//! TR[0] = high - low; TR[i] = bar.true_range(C[i-1]).
//! ATR(n)[i] = simple mean of TR over the trailing n bars.
//! Warmup: first (n-1) values are NaN.

use super::rolling;
use crate::domain::ohlcv::PriceBar;

pub fn calculate_atr(bars: &[PriceBar], period: usize) -> Vec<f64> {
    let tr_values: Vec<f64> = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            if i == 0 {
                bar.high - bar.low
            } else {
                bar.true_range(bars[i - 1].close)
            }
        })
        .collect();

    rolling(&tr_values, period, |window| {
        window.iter().sum::<f64>() / period as f64
    })
}
