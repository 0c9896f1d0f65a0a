//! Diagnostics data model: per-stage timings and work counters returned by
//! the detector next to its result.

pub mod report;
pub mod timing;

pub use report::{DetectionReport, DetectionStats, InputDescriptor};
pub use timing::{StageTiming, TimingBreakdown};
