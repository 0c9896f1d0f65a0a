#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod detector;
pub mod diagnostics;
pub mod image;
pub mod target;
pub mod types;

// Stage modules: public for tools and tests, but considered internals.
pub mod angle;
pub mod arcs;
pub mod cluster;
pub mod config;
pub mod edges;
pub mod fit;
pub mod pairing;
pub mod preprocess;
pub mod validate;

// --- High-level re-exports -------------------------------------------------

// Main entry points: detector + results.
pub use crate::detector::{DetectError, DetectorParams, EllipseDetector, ParamsError};
pub use crate::types::{top_n, BoundingBox, Ellipse};

// Diagnostics returned by `detect_with_diagnostics`.
pub use crate::diagnostics::{DetectionReport, DetectionStats, TimingBreakdown};

// Tolerances shared by the detector and callers merging their own results.
pub use crate::cluster::ClusterParams;

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use ellipse_detector::prelude::*;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let (w, h) = (640usize, 480usize);
/// let gray = vec![0u8; w * h];
/// let img = ImageU8::new(w, h, &gray);
///
/// let mut det = EllipseDetector::with_params(DetectorParams::default())?;
/// let ellipses = det.detect(img)?;
/// println!("found={} latency_ms={:.3}", ellipses.len(), det.exec_time_ms());
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::image::ImageU8;
    pub use crate::{DetectError, DetectorParams, Ellipse, EllipseDetector};
}
