//! Triplet grouping, ellipse parameter estimation and least-squares refinement.
pub mod accumulator;
pub mod estimate;
pub mod refine;
pub mod triplets;

pub use accumulator::{Accumulator, VoteAccumulators};
pub use estimate::{estimate_ellipse, fused_center, solve_shape};
pub use refine::{fit_ellipse_direct, refine_ellipse};
pub use triplets::{for_each_triplet, GroupingParams, Triplet, ROTATIONS};
