//! Daily OHLCV history loaded from the Yahoo Finance CSV export

use anyhow::{Context, Result};
use chrono::NaiveDate;
use ndarray::{Array1, Array2};
use serde::Deserialize;
use std::path::Path;

/// Feature column names, in matrix column order.
pub const FEATURE_NAMES: [&str; 5] = ["Open", "High", "Low", "Close", "Volume"];

/// Matrix column indices for the named features.
pub const OPEN: usize = 0;
pub const HIGH: usize = 1;
pub const LOW: usize = 2;
pub const CLOSE: usize = 3;
pub const VOLUME: usize = 4;

/// One row of the Yahoo Finance daily export.
///
/// The export carries [Date, Open, High, Low, Close, Adj Close, Volume];
/// Date is kept for reporting only and Adj Close is discarded entirely.
#[derive(Debug, Clone, Deserialize)]
pub struct DailyBar {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Open")]
    pub open: f64,
    #[serde(rename = "High")]
    pub high: f64,
    #[serde(rename = "Low")]
    pub low: f64,
    #[serde(rename = "Close")]
    pub close: f64,
    #[serde(rename = "Adj Close")]
    pub adj_close: f64,
    #[serde(rename = "Volume")]
    pub volume: f64,
}

/// Container for the daily price/volume history
#[derive(Debug, Clone)]
pub struct PriceHistory {
    /// Trading dates, chronological
    pub dates: Vec<NaiveDate>,
    /// Feature matrix (rows = trading days, cols = Open, High, Low, Close, Volume)
    pub features: Array2<f64>,
}

impl PriceHistory {
    /// Create a history from pre-built parts
    pub fn new(dates: Vec<NaiveDate>, features: Array2<f64>) -> Self {
        Self { dates, features }
    }

    /// Load the history from a CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = csv::Reader::from_path(path)
            .with_context(|| format!("failed to open {}", path.display()))?;

        let mut dates = Vec::new();
        let mut rows: Vec<[f64; 5]> = Vec::new();

        for result in reader.deserialize() {
            let bar: DailyBar =
                result.with_context(|| format!("malformed row in {}", path.display()))?;
            dates.push(bar.date);
            rows.push([bar.open, bar.high, bar.low, bar.close, bar.volume]);
        }

        if rows.is_empty() {
            anyhow::bail!("no data rows in {}", path.display());
        }

        let mut features = Array2::zeros((rows.len(), 5));
        for (i, row) in rows.iter().enumerate() {
            for (j, &value) in row.iter().enumerate() {
                features[[i, j]] = value;
            }
        }

        Ok(Self { dates, features })
    }

    /// Number of trading days
    pub fn n_days(&self) -> usize {
        self.dates.len()
    }

    /// Number of feature columns
    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }

    /// Average price per day: `open + close / 2`. The formula is kept
    /// literally (it is not the arithmetic mean of open and close) so the
    /// charts match the ones the narrative commentary describes.
    pub fn average_price(&self) -> Array1<f64> {
        let open = self.features.column(OPEN);
        let close = self.features.column(CLOSE);
        Array1::from_iter(open.iter().zip(close.iter()).map(|(&o, &c)| o + c / 2.0))
    }

    /// Average price computed from an already-transformed feature matrix
    /// (run 2 plots it from the normalized table).
    pub fn average_price_of(features: &Array2<f64>) -> Array1<f64> {
        let open = features.column(OPEN);
        let close = features.column(CLOSE);
        Array1::from_iter(open.iter().zip(close.iter()).map(|(&o, &c)| o + c / 2.0))
    }

    /// Daily volume column
    pub fn volume(&self) -> Array1<f64> {
        self.features.column(VOLUME).to_owned()
    }

    /// First and last trading date
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((*self.dates.first()?, *self.dates.last()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use std::io::Write;

    fn sample_history() -> PriceHistory {
        let dates = vec![
            NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2021, 1, 2).unwrap(),
            NaiveDate::from_ymd_opt(2021, 1, 3).unwrap(),
        ];
        let features = array![
            [100.0, 110.0, 90.0, 104.0, 1000.0],
            [104.0, 112.0, 101.0, 108.0, 1200.0],
            [108.0, 120.0, 107.0, 118.0, 900.0],
        ];
        PriceHistory::new(dates, features)
    }

    #[test]
    fn test_average_price_literal_formula() {
        let history = sample_history();
        let avg = history.average_price();

        // open + close / 2, NOT (open + close) / 2
        assert_eq!(avg.len(), 3);
        assert!((avg[0] - (100.0 + 104.0 / 2.0)).abs() < 1e-12);
        assert!((avg[1] - (104.0 + 108.0 / 2.0)).abs() < 1e-12);
        assert!((avg[2] - (108.0 + 118.0 / 2.0)).abs() < 1e-12);
    }

    #[test]
    fn test_volume_column() {
        let history = sample_history();
        let volume = history.volume();
        assert_eq!(volume.len(), 3);
        assert_eq!(volume[1], 1200.0);
    }

    #[test]
    fn test_from_csv() {
        let file = tempfile_path("btc_clusters_ohlcv_ok.csv");
        {
            let mut f = std::fs::File::create(&file).unwrap();
            writeln!(f, "Date,Open,High,Low,Close,Adj Close,Volume").unwrap();
            writeln!(f, "2021-01-01,100.0,110.0,90.0,104.0,103.5,1000").unwrap();
            writeln!(f, "2021-01-02,104.0,112.0,101.0,108.0,107.5,1200").unwrap();
        }

        let history = PriceHistory::from_csv(&file).unwrap();
        assert_eq!(history.n_days(), 2);
        assert_eq!(history.n_features(), 5);
        assert_eq!(history.features[[0, OPEN]], 100.0);
        assert_eq!(history.features[[0, HIGH]], 110.0);
        assert_eq!(history.features[[0, LOW]], 90.0);
        assert_eq!(history.features[[1, VOLUME]], 1200.0);
        // Adj Close must not land in the feature matrix
        assert_eq!(history.features[[1, CLOSE]], 108.0);

        let (first, last) = history.date_span().unwrap();
        assert_eq!(first, NaiveDate::from_ymd_opt(2021, 1, 1).unwrap());
        assert_eq!(last, NaiveDate::from_ymd_opt(2021, 1, 2).unwrap());

        std::fs::remove_file(&file).ok();
    }

    #[test]
    fn test_from_csv_missing_file() {
        let result = PriceHistory::from_csv("does_not_exist.csv");
        assert!(result.is_err());
    }

    #[test]
    fn test_from_csv_malformed_row() {
        let file = tempfile_path("btc_clusters_ohlcv_bad.csv");
        {
            let mut f = std::fs::File::create(&file).unwrap();
            writeln!(f, "Date,Open,High,Low,Close,Adj Close,Volume").unwrap();
            writeln!(f, "2021-01-01,not_a_number,110.0,90.0,104.0,103.5,1000").unwrap();
        }

        let result = PriceHistory::from_csv(&file);
        assert!(result.is_err());

        std::fs::remove_file(&file).ok();
    }

    fn tempfile_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(name)
    }
}
