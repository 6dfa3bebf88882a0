//! Technical indicator implementations.
//!
//! Every indicator takes an ordered series and returns a `Vec<f64>` of the
//! same length. Positions without enough history hold `f64::NAN`; short
//! input never panics and a zero period yields an all-NaN series.
//!
//! Standard deviations are population (divide by N) throughout.

pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod normalize;
pub mod returns;
pub mod rsi;
pub mod sma;
pub mod stddev;

pub use atr::calculate_atr;
pub use bollinger::{calculate_bollinger, Bollinger};
pub use ema::calculate_ema;
pub use macd::{calculate_macd, calculate_macd_default, Macd};
pub use normalize::normalize;
pub use returns::{calculate_returns, rolling_volatility};
pub use rsi::calculate_rsi;
pub use sma::calculate_sma;
pub use stddev::calculate_stddev;

use std::fmt;

/// Indicator identity and parameters, used for labelling signals and logs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Ema(usize),
    Rsi(usize),
    Atr(usize),
    Stddev(usize),
    Macd {
        fast: usize,
        slow: usize,
        signal: usize,
    },
    Bollinger {
        period: usize,
        stddev_mult_x100: u32,
    },
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Ema(period) => write!(f, "EMA({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Atr(period) => write!(f, "ATR({})", period),
            IndicatorType::Stddev(period) => write!(f, "STDDEV({})", period),
            IndicatorType::Macd { fast, slow, signal } => {
                write!(f, "MACD({},{},{})", fast, slow, signal)
            }
            IndicatorType::Bollinger {
                period,
                stddev_mult_x100,
            } => {
                let mult = *stddev_mult_x100 as f64 / 100.0;
                write!(f, "BOLLINGER({},{})", period, mult)
            }
        }
    }
}

/// A series of `len` undefined values.
pub(crate) fn undefined(len: usize) -> Vec<f64> {
    vec![f64::NAN; len]
}

/// Applies `f` to every full trailing window of `period` values.
///
/// Windows that contain a NaN produce NaN, so undefined input propagates.
pub(crate) fn rolling<F>(data: &[f64], period: usize, f: F) -> Vec<f64>
where
    F: Fn(&[f64]) -> f64,
{
    let mut out = undefined(data.len());
    if period == 0 {
        return out;
    }
    for i in (period - 1)..data.len() {
        let window = &data[i + 1 - period..=i];
        if window.iter().any(|v| v.is_nan()) {
            continue;
        }
        out[i] = f(window);
    }
    out
}
