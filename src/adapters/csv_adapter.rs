//! CSV file data adapter.
//!
//! One file per symbol under `base_path`, named after the symbol with `/`
//! replaced by `_` (`BTC/USDT` lives in `BTC_USDT.csv`). Columns are
//! `timestamp,open,high,low,close,volume` with a header row.

use crate::domain::config_validation::parse_datetime;
use crate::domain::error::QuantopsError;
use crate::domain::ohlcv::PriceBar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDateTime;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    pub fn file_name(symbol: &str) -> String {
        format!("{}.csv", symbol.replace('/', "_"))
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(Self::file_name(symbol))
    }

    fn load(&self, symbol: &str) -> Result<Vec<PriceBar>, QuantopsError> {
        let path = self.csv_path(symbol);
        if !path.exists() {
            return Err(QuantopsError::NoData {
                symbol: symbol.to_string(),
            });
        }
        let content = fs::read_to_string(&path).map_err(|e| QuantopsError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for (row, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| QuantopsError::Data {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;
            let line = row + 2;

            let ts_str = record.get(0).ok_or_else(|| QuantopsError::Data {
                reason: format!("line {line}: missing timestamp column"),
            })?;
            let timestamp = parse_datetime(ts_str).ok_or_else(|| QuantopsError::Data {
                reason: format!("line {line}: invalid timestamp '{ts_str}'"),
            })?;

            bars.push(PriceBar {
                timestamp,
                open: parse_field(&record, 1, "open", line)?,
                high: parse_field(&record, 2, "high", line)?,
                low: parse_field(&record, 3, "low", line)?,
                close: parse_field(&record, 4, "close", line)?,
                volume: parse_field(&record, 5, "volume", line)?,
            });
        }

        bars.sort_by_key(|b| b.timestamp);
        debug!(symbol, path = %path.display(), bars = bars.len(), "loaded csv");
        Ok(bars)
    }
}

fn parse_field(
    record: &csv::StringRecord,
    index: usize,
    name: &str,
    line: usize,
) -> Result<f64, QuantopsError> {
    record
        .get(index)
        .ok_or_else(|| QuantopsError::Data {
            reason: format!("line {line}: missing {name} column"),
        })?
        .trim()
        .parse()
        .map_err(|e| QuantopsError::Data {
            reason: format!("line {line}: invalid {name} value: {e}"),
        })
}

impl DataPort for CsvAdapter {
    fn fetch_bars(
        &self,
        symbol: &str,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> Result<Vec<PriceBar>, QuantopsError> {
        let mut bars = self.load(symbol)?;
        bars.retain(|b| {
            start.is_none_or(|s| b.timestamp >= s) && end.is_none_or(|e| b.timestamp <= e)
        });
        Ok(bars)
    }

    /// Symbols are recovered from file names by mapping `_` back to `/`.
    fn list_symbols(&self) -> Result<Vec<String>, QuantopsError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| QuantopsError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| QuantopsError::Data {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();
            if let Some(stem) = name_str.strip_suffix(".csv") {
                symbols.push(stem.replace('_', "/"));
            }
        }

        symbols.sort();
        Ok(symbols)
    }

    fn data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDateTime, NaiveDateTime, usize)>, QuantopsError> {
        let bars = match self.load(symbol) {
            Ok(bars) => bars,
            Err(QuantopsError::NoData { .. }) => return Ok(None),
            Err(e) => return Err(e),
        };
        Ok(match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => Some((first.timestamp, last.timestamp, bars.len())),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn ts(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn setup_test_data() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();

        // deliberately out of order
        let csv_content = "timestamp,open,high,low,close,volume\n\
            2024-01-15 02:00:00,105.0,115.0,100.0,110.0,60.5\n\
            2024-01-15 01:00:00,100.0,110.0,90.0,105.0,50\n\
            2024-01-15T03:00:00,110.0,120.0,105.0,115.0,55\n";

        fs::write(path.join("BTC_USDT.csv"), csv_content).unwrap();
        fs::write(path.join("ETH_USDT.csv"), "timestamp,open,high,low,close,volume\n").unwrap();
        fs::write(path.join("notes.txt"), "ignore me").unwrap();

        (dir, path)
    }

    #[test]
    fn file_name_maps_slash() {
        assert_eq!(CsvAdapter::file_name("BTC/USDT"), "BTC_USDT.csv");
        assert_eq!(CsvAdapter::file_name("AAPL"), "AAPL.csv");
    }

    #[test]
    fn fetch_bars_returns_sorted_data() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let bars = adapter.fetch_bars("BTC/USDT", None, None).unwrap();

        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].timestamp, ts(15, 1));
        assert_eq!(bars[0].open, 100.0);
        assert_eq!(bars[0].high, 110.0);
        assert_eq!(bars[0].low, 90.0);
        assert_eq!(bars[0].close, 105.0);
        assert_eq!(bars[0].volume, 50.0);
        assert_eq!(bars[1].volume, 60.5);
        assert_eq!(bars[2].timestamp, ts(15, 3));
    }

    #[test]
    fn fetch_bars_filters_by_window() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let bars = adapter
            .fetch_bars("BTC/USDT", Some(ts(15, 2)), Some(ts(15, 2)))
            .unwrap();
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].timestamp, ts(15, 2));
    }

    #[test]
    fn fetch_bars_missing_file_is_no_data() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let err = adapter.fetch_bars("XYZ/USDT", None, None).unwrap_err();
        assert!(matches!(err, QuantopsError::NoData { symbol } if symbol == "XYZ/USDT"));
    }

    #[test]
    fn fetch_bars_rejects_bad_values() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("BAD.csv"),
            "timestamp,open,high,low,close,volume\n2024-01-01,1,2,0.5,abc,10\n",
        )
        .unwrap();
        let adapter = CsvAdapter::new(dir.path().to_path_buf());

        let err = adapter.fetch_bars("BAD", None, None).unwrap_err();
        assert!(matches!(err, QuantopsError::Data { reason } if reason.contains("close")));
    }

    #[test]
    fn list_symbols_maps_file_names_back() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let symbols = adapter.list_symbols().unwrap();
        assert_eq!(symbols, vec!["BTC/USDT", "ETH/USDT"]);
    }

    #[test]
    fn data_range_reports_bounds_and_count() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        assert_eq!(
            adapter.data_range("BTC/USDT").unwrap(),
            Some((ts(15, 1), ts(15, 3), 3))
        );
        assert_eq!(adapter.data_range("ETH/USDT").unwrap(), None);
        assert_eq!(adapter.data_range("XYZ").unwrap(), None);
    }
}
