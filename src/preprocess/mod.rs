//! Preprocessing: smoothing, edge detection and the diagonal split.
//!
//! The split is what lets arc extraction assign curvature classes without any
//! per-pixel curvature estimate. An edge pixel whose gradient components have
//! opposite signs (`gx·gy < 0`) lies on a contour piece running along the
//! positive image diagonal, i.e. the top-right or bottom-left quarter of a convex
//! blob. Equal signs select the top-left and bottom-right quarters. Pixels
//! with a vanishing component mark the horizontal/vertical extremes where the
//! contour changes quarter and belong to neither map.

pub mod blur;

pub use blur::{gaussian_blur, GaussianKernel};

use crate::edges::{canny, CannyParams, Grad};
use crate::image::{EdgeMap, ImageF32, ImageU8};

/// Edge pixels partitioned by gradient-direction sign.
#[derive(Clone, Debug)]
pub struct EdgeSplit {
    /// `gx·gy < 0`: quadrant classes 1 and 3.
    pub positive: EdgeMap,
    /// `gx·gy > 0`: quadrant classes 2 and 4.
    pub negative: EdgeMap,
}

impl EdgeSplit {
    fn empty(w: usize, h: usize) -> Self {
        Self {
            positive: EdgeMap::new(w, h),
            negative: EdgeMap::new(w, h),
        }
    }
}

/// Blur, run Canny and split the edges of an 8-bit frame.
pub fn preprocess(gray: &ImageU8<'_>, kernel: &GaussianKernel, params: &CannyParams) -> EdgeSplit {
    let smooth = gaussian_blur(&ImageF32::from_u8(gray), kernel);
    let (edges, grad) = canny(&smooth, params);
    split_by_gradient(&edges, &grad)
}

/// Split edge pixels by the sign of `gx·gy`.
pub fn split_by_gradient(edges: &EdgeMap, grad: &Grad) -> EdgeSplit {
    let mut split = EdgeSplit::empty(edges.w, edges.h);
    for (idx, &e) in edges.data.iter().enumerate() {
        if e == 0 {
            continue;
        }
        let p = grad.gx.data[idx] * grad.gy.data[idx];
        if p < 0.0 {
            split.positive.data[idx] = 255;
        } else if p > 0.0 {
            split.negative.data[idx] = 255;
        }
    }
    split
}

/// Split a caller-supplied edge map using a gradient-direction map in
/// radians (`atan2(gy, gx)` convention). `sin 2φ` carries the sign of `gx·gy`.
pub fn split_by_orientation(edges: &EdgeMap, orientation: &ImageF32) -> EdgeSplit {
    let mut split = EdgeSplit::empty(edges.w, edges.h);
    for (idx, &e) in edges.data.iter().enumerate() {
        if e == 0 {
            continue;
        }
        let s = (2.0 * orientation.data[idx]).sin();
        if s < 0.0 {
            split.positive.data[idx] = 255;
        } else if s > 0.0 {
            split.negative.data[idx] = 255;
        }
    }
    split
}
