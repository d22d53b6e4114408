//! Serializable diagnostics for post-processing runs.
//!
//! `PanelReport` is the summary written by the CLI: the resolved azimuth,
//! the line candidates behind it, cluster sizes and per-stage timings.

pub mod report;
pub mod timing;

pub use report::{LineReport, PanelReport};
pub use timing::{elapsed_ms, StageTiming, TimingBreakdown};
