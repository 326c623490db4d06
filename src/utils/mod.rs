//! Summary statistics and terminal charts

pub mod statistics;
pub mod visualization;

pub use statistics::SummaryStats;
pub use visualization::{bar_chart, line_chart, scatter_chart, wait_for_dismiss};
