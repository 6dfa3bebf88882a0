//! Historical data access port.

use crate::domain::error::QuantopsError;
use crate::domain::ohlcv::PriceBar;
use chrono::NaiveDateTime;

pub trait DataPort {
    /// Bars for `symbol` sorted by timestamp, limited to the inclusive
    /// window when bounds are given.
    fn fetch_bars(
        &self,
        symbol: &str,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> Result<Vec<PriceBar>, QuantopsError>;

    fn list_symbols(&self) -> Result<Vec<String>, QuantopsError>;

    /// First timestamp, last timestamp and bar count, or `None` when the
    /// symbol has no bars.
    fn data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDateTime, NaiveDateTime, usize)>, QuantopsError>;
}
