//! Canny edge detector with histogram-derived hysteresis thresholds.
//!
//! 1. Sobel gradients on the (already blurred) input.
//! 2. Non-maximum suppression along the gradient direction quantised to four
//!    sectors. A pixel survives when it is strictly greater than the neighbour
//!    behind it and not smaller than the one ahead, so plateaus of two equal
//!    pixels keep exactly one.
//! 3. Thresholds: the magnitude range `[0, max]` is split into 64 bins; the
//!    high threshold sits at the first bin whose cumulative count exceeds
//!    `percent_not_edges` of all pixels, the low threshold is
//!    `threshold_ratio · high`.
//! 4. Hysteresis: strong pixels seed an 8-connected flood over weak pixels.
//!
//! The outermost 1-pixel frame is never marked.
use super::grad::{sobel_gradients, Grad};
use crate::image::{EdgeMap, ImageF32, ImageView};
use serde::{Deserialize, Serialize};

const TAN_22_5_DEG: f32 = 0.414_213_56;
const NUM_BINS: usize = 64;

const NEIGH_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Automatic threshold selection knobs.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CannyParams {
    /// Fraction of pixels assumed not to be edges (0, 1).
    pub percent_not_edges: f32,
    /// Low threshold as a fraction of the high threshold (0, 1].
    pub threshold_ratio: f32,
}

impl Default for CannyParams {
    fn default() -> Self {
        Self {
            percent_not_edges: 0.7,
            threshold_ratio: 0.4,
        }
    }
}

/// Thresholds actually used for one image, in gradient-magnitude units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CannyThresholds {
    pub low: f32,
    pub high: f32,
}

impl CannyThresholds {
    /// Derive thresholds from the magnitude histogram. `None` when the image
    /// has no gradient at all.
    pub fn from_gradients(grad: &Grad, params: &CannyParams) -> Option<Self> {
        let max_mag = grad.max_magnitude();
        if !(max_mag > 0.0) {
            return None;
        }
        let mut hist = [0usize; NUM_BINS];
        for &m in &grad.mag.data {
            let bin = ((m / max_mag) * NUM_BINS as f32) as usize;
            hist[bin.min(NUM_BINS - 1)] += 1;
        }
        let total = grad.mag.data.len();
        let target = params.percent_not_edges * total as f32;
        let mut cumulative = 0usize;
        let mut high_bin = NUM_BINS - 1;
        for (i, &count) in hist.iter().enumerate() {
            cumulative += count;
            if cumulative as f32 > target {
                high_bin = i;
                break;
            }
        }
        let high = (high_bin + 1) as f32 / NUM_BINS as f32 * max_mag;
        Some(Self {
            low: params.threshold_ratio * high,
            high,
        })
    }
}

/// Run the full detector on a float image.
pub fn canny(l: &ImageF32, params: &CannyParams) -> (EdgeMap, Grad) {
    let grad = sobel_gradients(l);
    let edges = canny_from_gradients(&grad, params);
    (edges, grad)
}

/// Thin and link precomputed gradients into a binary edge map.
pub fn canny_from_gradients(grad: &Grad, params: &CannyParams) -> EdgeMap {
    let w = grad.mag.w;
    let h = grad.mag.h;
    let mut edges = EdgeMap::new(w, h);
    if w < 3 || h < 3 {
        return edges;
    }
    let Some(thresholds) = CannyThresholds::from_gradients(grad, params) else {
        return edges;
    };

    // 0 = suppressed, 1 = weak, 2 = strong
    let mut state = vec![0u8; w * h];
    let mut stack = Vec::with_capacity(256);
    for y in 1..h - 1 {
        let mag_prev = grad.mag.row(y - 1);
        let mag_row = grad.mag.row(y);
        let mag_next = grad.mag.row(y + 1);
        let gx_row = grad.gx.row(y);
        let gy_row = grad.gy.row(y);
        for x in 1..w - 1 {
            let mag = mag_row[x];
            if mag <= thresholds.low {
                continue;
            }
            let gx = gx_row[x];
            let gy = gy_row[x];
            let abs_gx = gx.abs();
            let abs_gy = gy.abs();
            // (behind, ahead) along the gradient direction
            let (behind, ahead) = if abs_gy <= abs_gx * TAN_22_5_DEG {
                if gx >= 0.0 {
                    (mag_row[x - 1], mag_row[x + 1])
                } else {
                    (mag_row[x + 1], mag_row[x - 1])
                }
            } else if abs_gx <= abs_gy * TAN_22_5_DEG {
                if gy >= 0.0 {
                    (mag_prev[x], mag_next[x])
                } else {
                    (mag_next[x], mag_prev[x])
                }
            } else if (gx > 0.0) == (gy > 0.0) {
                // gradient towards down-right or up-left
                if gx > 0.0 {
                    (mag_prev[x - 1], mag_next[x + 1])
                } else {
                    (mag_next[x + 1], mag_prev[x - 1])
                }
            } else if gx > 0.0 {
                // gradient towards up-right
                (mag_next[x - 1], mag_prev[x + 1])
            } else {
                (mag_prev[x + 1], mag_next[x - 1])
            };
            if mag > behind && mag >= ahead {
                let idx = y * w + x;
                if mag > thresholds.high {
                    state[idx] = 2;
                    stack.push(idx);
                } else {
                    state[idx] = 1;
                }
            }
        }
    }

    while let Some(idx) = stack.pop() {
        let x = idx % w;
        let y = idx / w;
        edges.mark(x, y);
        for (dx, dy) in NEIGH_OFFSETS {
            let nx = x as isize + dx;
            let ny = y as isize + dy;
            if nx < 1 || ny < 1 || nx >= (w - 1) as isize || ny >= (h - 1) as isize {
                continue;
            }
            let nidx = ny as usize * w + nx as usize;
            if state[nidx] == 1 {
                state[nidx] = 2;
                stack.push(nidx);
            }
        }
    }

    edges
}
