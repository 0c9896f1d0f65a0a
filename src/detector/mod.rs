//! Ellipse detector orchestrating the edge-arc-triplet pipeline.
//!
//! Overview
//! - Blurs the frame, runs Canny and splits edge pixels into two directional
//!   maps by the sign of `gx·gy`.
//! - Labels connected components per map, filters them by length and
//!   oriented-box shape and assigns each survivor a quadrant class.
//! - Enumerates arc triplets over the four class rotations. Pairwise center
//!   estimates are memoized per call and gate which triplets are fitted.
//! - Fits each triplet by voting plus a least-squares refit, validates it
//!   against its own edge points and finally merges duplicates.
//!
//! Modules
//! - [`params`]: configuration types used by the detector and CLI.
//! - `pipeline`: the main [`EllipseDetector`] implementation.
//! - `error`: the [`DetectError`] returned by detection calls.
//! - `workspace`: reusable buffers (pair cache, vote histograms).
//!
//! Nothing is carried from one call to the next except allocations, so
//! results depend only on the frame and the parameters.

mod error;
pub mod params;
mod pipeline;
mod workspace;

pub use error::DetectError;
pub use params::{DetectorParams, ParamsError};
pub use pipeline::EllipseDetector;
pub use workspace::DetectorWorkspace;
