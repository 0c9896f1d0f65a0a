//! Separable Gaussian smoothing.
//!
//! The kernel is built from an odd tap count and a sigma; a non-positive sigma
//! is derived from the size with the usual `0.3·((k−1)/2 − 1) + 0.8` rule.
//! Borders replicate the outermost pixel.
use crate::image::{ImageF32, ImageView};

/// Normalised 1D Gaussian taps, applied horizontally then vertically.
#[derive(Clone, Debug, PartialEq)]
pub struct GaussianKernel {
    taps: Vec<f32>,
}

impl GaussianKernel {
    /// Build a kernel with `size` taps (must be odd and non-zero).
    pub fn new(size: usize, sigma: f64) -> Self {
        debug_assert!(size % 2 == 1, "gaussian kernel size must be odd");
        let sigma = if sigma > 0.0 {
            sigma
        } else {
            0.3 * ((size as f64 - 1.0) * 0.5 - 1.0) + 0.8
        };
        let radius = (size / 2) as isize;
        let denom = 2.0 * sigma * sigma;
        let mut taps: Vec<f64> = (-radius..=radius)
            .map(|i| (-(i * i) as f64 / denom).exp())
            .collect();
        let sum: f64 = taps.iter().sum();
        for t in &mut taps {
            *t /= sum;
        }
        Self {
            taps: taps.into_iter().map(|t| t as f32).collect(),
        }
    }

    pub fn taps(&self) -> &[f32] {
        &self.taps
    }

    pub fn radius(&self) -> usize {
        self.taps.len() / 2
    }
}

/// Blur `src` with the separable kernel.
pub fn gaussian_blur(src: &ImageF32, kernel: &GaussianKernel) -> ImageF32 {
    let (w, h) = (src.w, src.h);
    if w == 0 || h == 0 || kernel.taps().len() <= 1 {
        return src.clone();
    }
    let taps = kernel.taps();
    let radius = kernel.radius() as isize;

    let mut horiz = ImageF32::new(w, h);
    for y in 0..h {
        let row = src.row(y);
        let out = horiz.row_mut(y);
        for (x, dst) in out.iter_mut().enumerate() {
            let mut acc = 0.0;
            for (k, &t) in taps.iter().enumerate() {
                let sx = clamp_index(x as isize + k as isize - radius, w);
                acc += row[sx] * t;
            }
            *dst = acc;
        }
    }

    let mut out = ImageF32::new(w, h);
    for y in 0..h {
        for (k, &t) in taps.iter().enumerate() {
            let sy = clamp_index(y as isize + k as isize - radius, h);
            let src_row_start = sy * w;
            let dst_row = out.row_mut(y);
            for (x, dst) in dst_row.iter_mut().enumerate() {
                *dst += horiz.data[src_row_start + x] * t;
            }
        }
    }
    out
}

#[inline]
fn clamp_index(i: isize, len: usize) -> usize {
    i.clamp(0, len as isize - 1) as usize
}
