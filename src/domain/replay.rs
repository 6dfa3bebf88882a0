//! Historical data, replay clock and point-in-time market snapshots.
//!
//! The primary instrument's bars drive the clock. Every other instrument is
//! resampled onto it by "most recent bar at or before the cursor": no
//! interpolation and no look-ahead.

use crate::domain::ohlcv::PriceBar;
use chrono::NaiveDateTime;
use std::collections::HashMap;

/// Ordered bar sequence for one instrument.
#[derive(Debug, Clone)]
pub struct InstrumentSeries {
    pub symbol: String,
    pub bars: Vec<PriceBar>,
}

impl InstrumentSeries {
    pub fn new(symbol: impl Into<String>, bars: Vec<PriceBar>) -> Self {
        Self {
            symbol: symbol.into(),
            bars,
        }
    }

    pub fn bar_count(&self) -> usize {
        self.bars.len()
    }

    /// Bars with timestamp <= cursor. Relies on bars being sorted.
    pub fn history_at(&self, cursor: NaiveDateTime) -> &[PriceBar] {
        let end = self.bars.partition_point(|b| b.timestamp <= cursor);
        &self.bars[..end]
    }
}

/// Read-only historical input for a run. The first instrument added is the
/// primary one and drives the replay clock.
#[derive(Debug, Clone, Default)]
pub struct HistoricalData {
    series: Vec<InstrumentSeries>,
}

impl HistoricalData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an instrument. Re-adding a symbol replaces its bars in place.
    pub fn with_instrument(mut self, symbol: impl Into<String>, bars: Vec<PriceBar>) -> Self {
        self.insert(symbol, bars);
        self
    }

    pub fn insert(&mut self, symbol: impl Into<String>, bars: Vec<PriceBar>) {
        let series = InstrumentSeries::new(symbol, bars);
        match self.series.iter_mut().find(|s| s.symbol == series.symbol) {
            Some(existing) => *existing = series,
            None => self.series.push(series),
        }
    }

    pub fn primary(&self) -> Option<&InstrumentSeries> {
        self.series.first()
    }

    pub fn instruments(&self) -> &[InstrumentSeries] {
        &self.series
    }

    pub fn get(&self, symbol: &str) -> Option<&InstrumentSeries> {
        self.series.iter().find(|s| s.symbol == symbol)
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Primary instrument timestamps inside the inclusive window.
    pub fn primary_clock(
        &self,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> Vec<NaiveDateTime> {
        let Some(primary) = self.primary() else {
            return Vec::new();
        };
        primary
            .bars
            .iter()
            .map(|b| b.timestamp)
            .filter(|ts| start.is_none_or(|s| *ts >= s) && end.is_none_or(|e| *ts <= e))
            .collect()
    }

    /// Market view visible at `cursor`. Instruments with no bar at or
    /// before the cursor are omitted.
    pub fn snapshot_at(&self, cursor: NaiveDateTime) -> MarketSnapshot<'_> {
        let instruments = self
            .series
            .iter()
            .filter_map(|s| {
                let history = s.history_at(cursor);
                let latest = history.last()?;
                Some((
                    s.symbol.clone(),
                    InstrumentView {
                        ticker: Ticker::from_bar(latest),
                        history,
                    },
                ))
            })
            .collect();

        MarketSnapshot {
            timestamp: cursor,
            instruments,
        }
    }
}

/// Synthetic quote derived from a bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ticker {
    pub last: f64,
    pub bid: f64,
    pub ask: f64,
    pub volume: f64,
}

impl Ticker {
    /// last = close, bid = low, ask = high
    pub fn from_bar(bar: &PriceBar) -> Self {
        Self {
            last: bar.close,
            bid: bar.low,
            ask: bar.high,
            volume: bar.volume,
        }
    }
}

#[derive(Debug, Clone)]
pub struct InstrumentView<'a> {
    pub ticker: Ticker,
    pub history: &'a [PriceBar],
}

/// Point-in-time market view handed to a strategy. Borrows the historical
/// data; never exposes bars after `timestamp`.
#[derive(Debug, Clone)]
pub struct MarketSnapshot<'a> {
    pub timestamp: NaiveDateTime,
    instruments: HashMap<String, InstrumentView<'a>>,
}

impl<'a> MarketSnapshot<'a> {
    pub fn get(&self, symbol: &str) -> Option<&InstrumentView<'a>> {
        self.instruments.get(symbol)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.instruments.contains_key(symbol)
    }

    /// Reference (last) price for a symbol.
    pub fn last_price(&self, symbol: &str) -> Option<f64> {
        self.instruments.get(symbol).map(|v| v.ticker.last)
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }
}
