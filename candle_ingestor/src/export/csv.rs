//! Optional CSV mirror of ingested pages.
//!
//! When export is enabled, each symbol loop owns one exporter and
//! appends every page it commits to storage, so the file holds exactly
//! the rows downloaded during this run.

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use crate::{errors::Error, models::candle::Candle, storage::table::table_name};

const HEADER: [&str; 6] = ["timestamp", "open", "high", "low", "close", "volume"];

pub struct CsvExporter {
    writer: csv::Writer<Box<dyn Write + Send>>,
    path: PathBuf,
    rows: u64,
}

impl CsvExporter {
    /// Creates or reopens `<table_name>.csv` under `dir` (created if
    /// missing). A fresh file gets the header row; an existing one is
    /// opened for append, so successive polling cycles accumulate rows
    /// instead of truncating the previous cycle's output.
    pub fn create(dir: &Path, symbol: &str) -> Result<Self, Error> {
        let table = table_name(symbol)?;
        fs::create_dir_all(dir)?;
        let path = dir.join(format!("{table}.csv"));

        let fresh = !path.exists();
        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)?;

        let mut exporter = Self::from_writer(Box::new(file), path);
        if fresh {
            exporter.writer.write_record(HEADER)?;
        }
        Ok(exporter)
    }

    /// Wraps an arbitrary destination. No header is written; `path` is
    /// only echoed back by [`CsvExporter::finish`].
    pub fn from_writer(writer: Box<dyn Write + Send>, path: PathBuf) -> Self {
        Self {
            writer: csv::WriterBuilder::new().has_headers(false).from_writer(writer),
            path,
            rows: 0,
        }
    }

    /// Appends one page of candles.
    pub fn append(&mut self, candles: &[Candle]) -> Result<(), Error> {
        for candle in candles {
            self.writer.serialize(candle)?;
        }
        self.rows += candles.len() as u64;
        Ok(())
    }

    /// Flushes the file and returns the row count and path.
    pub fn finish(mut self) -> Result<(u64, PathBuf), Error> {
        self.writer.flush()?;
        Ok((self.rows, self.path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle(timestamp: i64) -> Candle {
        Candle {
            timestamp,
            open: 1.0,
            high: 2.0,
            low: 0.5,
            close: 1.5,
            volume: 10.0,
        }
    }

    #[test]
    fn writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let mut exporter = CsvExporter::create(dir.path(), "BTC/USDT").unwrap();
        exporter.append(&[candle(1000), candle(1060)]).unwrap();
        let (rows, path) = exporter.finish().unwrap();

        assert_eq!(rows, 2);
        assert!(path.ends_with("BTCUSDT.csv"));

        let content = fs::read_to_string(path).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next().unwrap(),
            "timestamp,open,high,low,close,volume"
        );
        assert_eq!(lines.next().unwrap(), "1000,1.0,2.0,0.5,1.5,10.0");
        assert_eq!(lines.count(), 1);
    }

    #[test]
    fn reopening_appends_instead_of_truncating() {
        let dir = tempfile::tempdir().unwrap();

        let mut first = CsvExporter::create(dir.path(), "BTC/USDT").unwrap();
        first.append(&[candle(1000)]).unwrap();
        first.finish().unwrap();

        // A second cycle over the same directory, as --watch produces.
        let mut second = CsvExporter::create(dir.path(), "BTC/USDT").unwrap();
        second.append(&[candle(1060)]).unwrap();
        let (rows, path) = second.finish().unwrap();

        assert_eq!(rows, 1);
        let content = fs::read_to_string(path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(
            lines,
            vec![
                "timestamp,open,high,low,close,volume",
                "1000,1.0,2.0,0.5,1.5,10.0",
                "1060,1.0,2.0,0.5,1.5,10.0",
            ]
        );
    }

    #[test]
    fn empty_run_still_leaves_a_header() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = CsvExporter::create(dir.path(), "ETH/USDT").unwrap();
        let (rows, path) = exporter.finish().unwrap();

        assert_eq!(rows, 0);
        let content = fs::read_to_string(path).unwrap();
        assert_eq!(content.trim(), "timestamp,open,high,low,close,volume");
    }
}
