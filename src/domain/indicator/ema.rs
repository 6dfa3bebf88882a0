//! Exponential Moving Average.
//!
//! k = 2/(n+1), EMA[i] = C[i]*k + EMA[i-1]*(1-k).
//!
//! Seeded with the first raw input rather than an SMA of the first n values,
//! so there is no warmup region. Leading NaN inputs stay NaN and the first
//! finite value becomes the seed.

use super::undefined;

pub fn calculate_ema(data: &[f64], period: usize) -> Vec<f64> {
    let mut values = undefined(data.len());
    if period == 0 {
        return values;
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut ema: Option<f64> = None;

    for (i, &x) in data.iter().enumerate() {
        let next = match ema {
            None if x.is_nan() => continue,
            None => x,
            Some(prev) => x * k + prev * (1.0 - k),
        };
        ema = Some(next);
        values[i] = next;
    }

    values
}
