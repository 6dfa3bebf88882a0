//! Bollinger Bands indicator.
//!
//! Bollinger Bands consist of:
//! - Middle: Simple Moving Average (SMA) over n periods
//! - Upper: Middle + (multiplier × StdDev)
//! - Lower: Middle - (multiplier × StdDev)
//!
//! Where StdDev is population standard deviation (divides by N, not N-1).
//!
//! Default parameters: period=20, multiplier=2.0
//! Warmup: first (period-1) values are NaN.

use super::{calculate_sma, calculate_stddev};

pub const DEFAULT_PERIOD: usize = 20;
pub const DEFAULT_MULTIPLIER: f64 = 2.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Bollinger {
    pub upper: Vec<f64>,
    pub middle: Vec<f64>,
    pub lower: Vec<f64>,
}

pub fn calculate_bollinger(data: &[f64], period: usize, multiplier: f64) -> Bollinger {
    let middle = calculate_sma(data, period);
    let stddev = calculate_stddev(data, period);

    let upper = middle
        .iter()
        .zip(&stddev)
        .map(|(m, sd)| m + multiplier * sd)
        .collect();
    let lower = middle
        .iter()
        .zip(&stddev)
        .map(|(m, sd)| m - multiplier * sd)
        .collect();

    Bollinger {
        upper,
        middle,
        lower,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zigzag(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| 100.0 + if i % 2 == 0 { 3.0 } else { -2.0 } + i as f64 * 0.1)
            .collect()
    }

    #[test]
    fn bollinger_warmup() {
        let bands = calculate_bollinger(&zigzag(25), DEFAULT_PERIOD, DEFAULT_MULTIPLIER);
        for i in 0..DEFAULT_PERIOD - 1 {
            assert!(bands.middle[i].is_nan());
            assert!(bands.upper[i].is_nan());
            assert!(bands.lower[i].is_nan());
        }
        assert!(!bands.middle[DEFAULT_PERIOD - 1].is_nan());
    }

    #[test]
    fn bollinger_band_ordering() {
        let bands = calculate_bollinger(&zigzag(40), DEFAULT_PERIOD, DEFAULT_MULTIPLIER);
        for i in (DEFAULT_PERIOD - 1)..40 {
            assert!(bands.upper[i] >= bands.middle[i]);
            assert!(bands.middle[i] >= bands.lower[i]);
        }
    }

    #[test]
    fn bollinger_known_values() {
        // window [1, 2, 3]: mean 2, population σ = sqrt(2/3)
        let bands = calculate_bollinger(&[1.0, 2.0, 3.0], 3, 2.0);
        let sd = (2.0f64 / 3.0).sqrt();
        assert!((bands.middle[2] - 2.0).abs() < 1e-12);
        assert!((bands.upper[2] - (2.0 + 2.0 * sd)).abs() < 1e-12);
        assert!((bands.lower[2] - (2.0 - 2.0 * sd)).abs() < 1e-12);
    }

    #[test]
    fn bollinger_constant_collapses_bands() {
        let bands = calculate_bollinger(&[10.0; 5], 3, 2.0);
        assert_eq!(bands.upper[4], 10.0);
        assert_eq!(bands.lower[4], 10.0);
    }
}
