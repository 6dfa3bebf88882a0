//! MACD (Moving Average Convergence Divergence) indicator.
//!
//! MACD Line = EMA(fast) - EMA(slow)
//! Signal Line = EMA(signal) of MACD Line
//! Histogram = MACD Line - Signal Line
//!
//! Default parameters: fast=12, slow=26, signal=9
//! EMAs are seeded with the first input, so every component is defined from
//! the first value onward.

use super::{calculate_ema, undefined};

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

#[derive(Debug, Clone, PartialEq)]
pub struct Macd {
    pub line: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

pub fn calculate_macd(data: &[f64], fast: usize, slow: usize, signal_period: usize) -> Macd {
    if fast == 0 || slow == 0 || signal_period == 0 {
        return Macd {
            line: undefined(data.len()),
            signal: undefined(data.len()),
            histogram: undefined(data.len()),
        };
    }

    let ema_fast = calculate_ema(data, fast);
    let ema_slow = calculate_ema(data, slow);

    let line: Vec<f64> = ema_fast.iter().zip(&ema_slow).map(|(f, s)| f - s).collect();
    let signal = calculate_ema(&line, signal_period);
    let histogram = line.iter().zip(&signal).map(|(l, s)| l - s).collect();

    Macd {
        line,
        signal,
        histogram,
    }
}

pub fn calculate_macd_default(data: &[f64]) -> Macd {
    calculate_macd(data, DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL)
}
