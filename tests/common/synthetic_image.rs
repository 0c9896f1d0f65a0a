//! Anti-aliased synthetic frames for end-to-end tests.

const SUBSAMPLES: usize = 4;

/// Ellipse outline to render, angle in radians (image coordinates).
#[derive(Clone, Copy, Debug)]
pub struct EllipseShape {
    pub cx: f32,
    pub cy: f32,
    pub a: f32,
    pub b: f32,
    pub angle: f32,
}

impl EllipseShape {
    pub fn new(cx: f32, cy: f32, a: f32, b: f32, angle: f32) -> Self {
        Self { cx, cy, a, b, angle }
    }

    fn contains(&self, x: f32, y: f32) -> bool {
        let (s, c) = self.angle.sin_cos();
        let dx = x - self.cx;
        let dy = y - self.cy;
        let u = dx * c + dy * s;
        let v = -dx * s + dy * c;
        (u / self.a).powi(2) + (v / self.b).powi(2) <= 1.0
    }
}

/// Grayscale canvas with coverage-weighted drawing.
pub struct Canvas {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl Canvas {
    pub fn new(width: usize, height: usize, background: u8) -> Self {
        assert!(width > 0 && height > 0, "image dimensions must be positive");
        Self {
            width,
            height,
            data: vec![background; width * height],
        }
    }

    /// Blend `value` into every pixel proportionally to the fraction of its
    /// 4×4 sub-samples for which `inside` holds.
    fn paint<F: Fn(f32, f32) -> bool>(&mut self, value: u8, inside: F) {
        let n = (SUBSAMPLES * SUBSAMPLES) as f32;
        for y in 0..self.height {
            for x in 0..self.width {
                let mut hits = 0usize;
                for sy in 0..SUBSAMPLES {
                    for sx in 0..SUBSAMPLES {
                        let px = x as f32 + (sx as f32 + 0.5) / SUBSAMPLES as f32 - 0.5;
                        let py = y as f32 + (sy as f32 + 0.5) / SUBSAMPLES as f32 - 0.5;
                        if inside(px, py) {
                            hits += 1;
                        }
                    }
                }
                if hits > 0 {
                    let cov = hits as f32 / n;
                    let idx = y * self.width + x;
                    let old = self.data[idx] as f32;
                    self.data[idx] = (old * (1.0 - cov) + value as f32 * cov).round() as u8;
                }
            }
        }
    }

    /// Filled ellipse.
    pub fn fill_ellipse(&mut self, shape: EllipseShape, value: u8) {
        self.paint(value, |x, y| shape.contains(x, y));
    }

    /// Elliptical ring between `outer` and `inner` (same center and angle).
    pub fn ring(&mut self, outer: EllipseShape, inner: EllipseShape, value: u8) {
        self.paint(value, |x, y| outer.contains(x, y) && !inner.contains(x, y));
    }

    /// Straight bar of the given thickness between two points.
    pub fn line(&mut self, p0: (f32, f32), p1: (f32, f32), thickness: f32, value: u8) {
        let (dx, dy) = (p1.0 - p0.0, p1.1 - p0.1);
        let len2 = dx * dx + dy * dy;
        let half = thickness * 0.5;
        self.paint(value, |x, y| {
            let t = (((x - p0.0) * dx + (y - p0.1) * dy) / len2).clamp(0.0, 1.0);
            let qx = p0.0 + t * dx - x;
            let qy = p0.1 + t * dy - y;
            qx * qx + qy * qy <= half * half
        });
    }
}
