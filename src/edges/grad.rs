//! Sobel image gradients with magnitude.
//!
//! Convolves the 3×3 Sobel pair with border clamping and stores `gx`, `gy`
//! and `mag = sqrt(gx² + gy²)`. The sign of `gx·gy` is what later splits edge
//! pixels into the two diagonal families, so no orientation quantisation is
//! kept here.
use crate::image::{ImageF32, ImageView};

type Kernel3 = [[f32; 3]; 3];

const SOBEL_KERNEL_X: Kernel3 = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];
const SOBEL_KERNEL_Y: Kernel3 = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

/// Per-pixel gradient buffers.
#[derive(Clone, Debug)]
pub struct Grad {
    /// Horizontal derivative
    pub gx: ImageF32,
    /// Vertical derivative (image y points down)
    pub gy: ImageF32,
    /// Euclidean magnitude per pixel
    pub mag: ImageF32,
}

impl Grad {
    /// Largest magnitude in the buffer (0 for empty images).
    pub fn max_magnitude(&self) -> f32 {
        self.mag.data.iter().copied().fold(0.0f32, f32::max)
    }
}

/// Compute Sobel gradients on a single-channel float image.
pub fn sobel_gradients(l: &ImageF32) -> Grad {
    let w = l.w;
    let h = l.h;
    let mut gx = ImageF32::new(w, h);
    let mut gy = ImageF32::new(w, h);
    let mut mag = ImageF32::new(w, h);

    for y in 0..h {
        let rows = [
            l.row(y.saturating_sub(1)),
            l.row(y),
            l.row((y + 1).min(h - 1)),
        ];
        for x in 0..w {
            let xi = [x.saturating_sub(1), x, (x + 1).min(w - 1)];
            let mut sum_x = 0.0;
            let mut sum_y = 0.0;
            for (ky, row) in rows.iter().enumerate() {
                let kx_row = &SOBEL_KERNEL_X[ky];
                let ky_row = &SOBEL_KERNEL_Y[ky];
                for (kx, &sx) in xi.iter().enumerate() {
                    let v = row[sx];
                    sum_x += v * kx_row[kx];
                    sum_y += v * ky_row[kx];
                }
            }
            gx.set(x, y, sum_x);
            gy.set(x, y, sum_y);
            mag.set(x, y, (sum_x * sum_x + sum_y * sum_y).sqrt());
        }
    }

    Grad { gx, gy, mag }
}
