//! In-process metrics for the web validator, rendered by `/metrics`.

pub mod metrics;

pub use metrics::CheckerMetrics;
