use crate::angle::normalize_half_pi;
use serde::{Deserialize, Serialize};

/// A detected ellipse in image coordinates (x right, y down).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ellipse {
    pub cx: f32,
    pub cy: f32,
    pub semi_major: f32,
    pub semi_minor: f32,
    /// Direction of the major axis in `[0, π)`, clockwise from +x on screen.
    pub angle: f32,
    /// Fraction of supporting edge points lying on the contour.
    pub score: f32,
    /// Angular coverage of the supporting arcs, `[0, 1]`.
    pub reliability: f32,
}

impl Ellipse {
    pub fn new(cx: f32, cy: f32, semi_major: f32, semi_minor: f32, angle: f32) -> Self {
        let (semi_major, semi_minor, angle) = if semi_minor > semi_major {
            (semi_minor, semi_major, angle + std::f32::consts::FRAC_PI_2)
        } else {
            (semi_major, semi_minor, angle)
        };
        Self {
            cx,
            cy,
            semi_major,
            semi_minor,
            angle: normalize_half_pi(angle),
            score: 0.0,
            reliability: 0.0,
        }
    }

    /// `semi_minor / semi_major`, 0 for a degenerate ellipse.
    pub fn axis_ratio(&self) -> f32 {
        if self.semi_major > 0.0 {
            self.semi_minor / self.semi_major
        } else {
            0.0
        }
    }

    /// Point expressed in the ellipse frame (origin at the center, x along
    /// the major axis).
    #[inline]
    pub fn to_local(&self, x: f32, y: f32) -> (f32, f32) {
        let (s, c) = self.angle.sin_cos();
        let dx = x - self.cx;
        let dy = y - self.cy;
        (dx * c + dy * s, -dx * s + dy * c)
    }

    /// `x'²/a² + y'²/b² − 1` for an image point. Zero on the contour.
    pub fn contour_residual(&self, x: f32, y: f32) -> f32 {
        let (u, v) = self.to_local(x, y);
        let a2 = self.semi_major * self.semi_major;
        let b2 = self.semi_minor * self.semi_minor;
        u * u / a2 + v * v / b2 - 1.0
    }

    /// Smallest axis-aligned box containing the ellipse.
    pub fn bounding_box(&self) -> BoundingBox {
        let (s, c) = self.angle.sin_cos();
        let a = self.semi_major;
        let b = self.semi_minor;
        let ex = (a * a * c * c + b * b * s * s).sqrt();
        let ey = (a * a * s * s + b * b * c * c).sqrt();
        let x0 = (self.cx - ex).floor() as i32;
        let y0 = (self.cy - ey).floor() as i32;
        let x1 = (self.cx + ex).ceil() as i32;
        let y1 = (self.cy + ey).ceil() as i32;
        BoundingBox {
            x: x0,
            y: y0,
            width: x1 - x0 + 1,
            height: y1 - y0 + 1,
        }
    }
}

/// Integer pixel rectangle, `x..x+width` by `y..y+height`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl BoundingBox {
    /// Intersect with a `w × h` image. `None` when nothing is left.
    pub fn clip(&self, w: usize, h: usize) -> Option<BoundingBox> {
        let x0 = self.x.max(0);
        let y0 = self.y.max(0);
        let x1 = (self.x + self.width).min(w as i32);
        let y1 = (self.y + self.height).min(h as i32);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(BoundingBox {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        })
    }

    pub fn area(&self) -> i64 {
        self.width.max(0) as i64 * self.height.max(0) as i64
    }
}

/// The `n` highest-scoring ellipses, best first. Equal scores keep input order.
pub fn top_n(ellipses: &[Ellipse], n: usize) -> Vec<Ellipse> {
    let mut sorted = ellipses.to_vec();
    sorted.sort_by(|a, b| b.score.total_cmp(&a.score));
    sorted.truncate(n);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn new_swaps_axes_and_rotates() {
        let e = Ellipse::new(0.0, 0.0, 10.0, 20.0, 0.0);
        assert_eq!(e.semi_major, 20.0);
        assert_eq!(e.semi_minor, 10.0);
        assert!((e.angle - FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn contour_residual_vanishes_on_contour() {
        let e = Ellipse::new(50.0, 40.0, 30.0, 10.0, 0.5);
        let (s, c) = 0.5f32.sin_cos();
        let t = 1.1f32;
        let (u, v) = (30.0 * t.cos(), 10.0 * t.sin());
        let x = 50.0 + u * c - v * s;
        let y = 40.0 + u * s + v * c;
        assert!(e.contour_residual(x, y).abs() < 1e-4);
        assert!(e.contour_residual(50.0, 40.0) < -0.99);
    }

    #[test]
    fn bounding_box_of_rotated_ellipse_and_clip() {
        let e = Ellipse::new(10.0, 10.0, 20.0, 5.0, FRAC_PI_2);
        let bb = e.bounding_box();
        assert_eq!(bb.x, 5);
        assert_eq!(bb.y, -10);
        assert_eq!(bb.width, 11);
        assert_eq!(bb.height, 41);
        let clipped = bb.clip(12, 100).expect("overlap");
        assert_eq!(clipped, BoundingBox { x: 5, y: 0, width: 7, height: 31 });
        assert_eq!(clipped.area(), 217);
        assert!(bb.clip(3, 3).is_none());
    }

    #[test]
    fn top_n_orders_by_score() {
        let mut a = Ellipse::new(0.0, 0.0, 5.0, 5.0, 0.0);
        a.score = 0.8;
        let mut b = a;
        b.score = 0.95;
        let mut c = a;
        c.score = 0.9;
        let best = top_n(&[a, b, c], 2);
        assert_eq!(best.len(), 2);
        assert_eq!(best[0].score, 0.95);
        assert_eq!(best[1].score, 0.9);
        assert!(top_n(&[a], 0).is_empty());
    }
}
