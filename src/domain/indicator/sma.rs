//! Simple Moving Average.
//!
//! SMA(n)[i] = mean(C[i-n+1..=i]). First (n-1) values are NaN.

use super::rolling;

pub fn calculate_sma(data: &[f64], period: usize) -> Vec<f64> {
    rolling(data, period, |window| {
        window.iter().sum::<f64>() / period as f64
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sma_warmup_is_nan() {
        let sma = calculate_sma(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);
        assert_eq!(sma.len(), 5);
        assert!(sma[0].is_nan());
        assert!(sma[1].is_nan());
        assert!(!sma[2].is_nan());
    }

    #[test]
    fn sma_values() {
        let sma = calculate_sma(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);
        assert!((sma[2] - 2.0).abs() < f64::EPSILON);
        assert!((sma[3] - 3.0).abs() < f64::EPSILON);
        assert!((sma[4] - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn sma_period_longer_than_data() {
        let sma = calculate_sma(&[1.0, 2.0], 5);
        assert_eq!(sma.len(), 2);
        assert!(sma.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn sma_empty() {
        assert!(calculate_sma(&[], 3).is_empty());
    }

    #[test]
    fn sma_period_1_is_identity() {
        let data = [4.0, 8.0, 15.0];
        assert_eq!(calculate_sma(&data, 1), data.to_vec());
    }
}
