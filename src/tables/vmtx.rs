//! `vmtx` — vertical metrics. Wire-identical to `hmtx`; reuses
//! [`super::hmtx::MetricsTable`].

pub use super::hmtx::MetricsTable as VerticalMetrics;
