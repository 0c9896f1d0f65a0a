//! Edge detection building blocks: Sobel gradients and a Canny detector.
//!
//! - Gradient computation returns `gx`, `gy` and the L2 magnitude with
//!   replicated borders.
//! - [`canny`] thins the magnitude with direction-aligned non-maximum
//!   suppression and links pixels by hysteresis. Thresholds are derived from
//!   the magnitude histogram so that a single parameter set works across
//!   exposures.

pub mod canny;
pub mod grad;

pub use canny::{canny, canny_from_gradients, CannyParams, CannyThresholds};
pub use grad::{sobel_gradients, Grad};
