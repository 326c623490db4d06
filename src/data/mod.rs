//! Data ingestion and preprocessing

pub mod ohlcv;
pub mod preprocessing;

pub use ohlcv::{DailyBar, PriceHistory, CLOSE, FEATURE_NAMES, HIGH, LOW, OPEN, VOLUME};
pub use preprocessing::{column_norms, normalize_columns};
