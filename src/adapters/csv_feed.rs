//! CSV file bar feed adapter.
//!
//! Loads an entire OHLCV file (date,open,high,low,close,volume) into memory
//! at construction, sorted by date and tagged with a configured symbol, then
//! hands out bars forward-only. All I/O happens before the replay starts.

use chrono::NaiveDate;
use std::fs;
use std::path::Path;

use crate::domain::bar::Bar;
use crate::domain::error::BackonautError;
use crate::ports::data_feed::DataFeed;

pub struct CsvFeed {
    bars: Vec<Bar>,
    cursor: usize,
}

impl CsvFeed {
    pub fn from_path<P: AsRef<Path>>(path: P, symbol: &str) -> Result<Self, BackonautError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| BackonautError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| BackonautError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = record.get(0).ok_or_else(|| BackonautError::Data {
                reason: "missing date column".into(),
            })?;
            let timestamp = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                BackonautError::Data {
                    reason: format!("invalid date format: {}", e),
                }
            })?;

            let open = parse_price(&record, 1, "open")?;
            let high = parse_price(&record, 2, "high")?;
            let low = parse_price(&record, 3, "low")?;
            let close = parse_price(&record, 4, "close")?;

            let volume: i64 = record
                .get(5)
                .ok_or_else(|| BackonautError::Data {
                    reason: "missing volume column".into(),
                })?
                .parse()
                .map_err(|e| BackonautError::Data {
                    reason: format!("invalid volume value: {}", e),
                })?;

            bars.push(Bar {
                symbol: symbol.to_string(),
                timestamp,
                open,
                high,
                low,
                close,
                volume,
            });
        }

        bars.sort_by_key(|b| b.timestamp);
        Ok(CsvFeed { bars, cursor: 0 })
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// First and last bar date, for the `info` command.
    pub fn data_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.bars.first(), self.bars.last()) {
            (Some(first), Some(last)) => Some((first.timestamp, last.timestamp)),
            _ => None,
        }
    }
}

fn parse_price(
    record: &csv::StringRecord,
    index: usize,
    name: &str,
) -> Result<f64, BackonautError> {
    record
        .get(index)
        .ok_or_else(|| BackonautError::Data {
            reason: format!("missing {} column", name),
        })?
        .parse()
        .map_err(|e| BackonautError::Data {
            reason: format!("invalid {} value: {}", name, e),
        })
}

impl DataFeed for CsvFeed {
    fn next_bar(&mut self) -> Result<Option<Bar>, BackonautError> {
        let bar = self.bars.get(self.cursor).cloned();
        if bar.is_some() {
            self.cursor += 1;
        }
        Ok(bar)
    }
}
