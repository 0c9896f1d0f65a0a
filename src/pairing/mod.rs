//! Arc pairing: center estimation per arc pair and its per-call cache.
pub mod cache;
pub mod center;

pub use cache::{compute_pair, ArcPairCache, PairKey, PairKind};
pub use center::{fast_center, intersect_lines, median_slope, ArcView, DiameterEstimate, EllipseData};
