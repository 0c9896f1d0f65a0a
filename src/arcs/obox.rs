//! Minimum-area oriented bounding box of a pixel set.
//!
//! Monotone-chain convex hull followed by rotating edges: the optimal box has
//! one side collinear with a hull edge, so it is enough to try each edge.
use super::types::Pixel;

/// Side lengths of an oriented box, `long >= short`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrientedBox {
    pub long: f32,
    pub short: f32,
}

impl OrientedBox {
    /// `long / short`, infinite for a degenerate box.
    pub fn aspect(&self) -> f32 {
        if self.short > 0.0 {
            self.long / self.short
        } else {
            f32::INFINITY
        }
    }
}

fn cross(o: [f32; 2], a: [f32; 2], b: [f32; 2]) -> f32 {
    (a[0] - o[0]) * (b[1] - o[1]) - (a[1] - o[1]) * (b[0] - o[0])
}

/// Convex hull in counter-clockwise order (x right, y up convention).
/// Collinear points are dropped.
pub fn convex_hull(points: &[Pixel]) -> Vec<[f32; 2]> {
    let mut sorted: Vec<[f32; 2]> = points.iter().map(|p| [p[0] as f32, p[1] as f32]).collect();
    sorted.sort_by(|a, b| a[0].total_cmp(&b[0]).then(a[1].total_cmp(&b[1])));
    sorted.dedup();
    if sorted.len() < 3 {
        return sorted;
    }

    let mut lower: Vec<[f32; 2]> = Vec::new();
    for &p in &sorted {
        while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0.0 {
            lower.pop();
        }
        lower.push(p);
    }
    let mut upper: Vec<[f32; 2]> = Vec::new();
    for &p in sorted.iter().rev() {
        while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0.0 {
            upper.pop();
        }
        upper.push(p);
    }
    lower.pop();
    upper.pop();
    lower.append(&mut upper);
    lower
}

/// Minimum-area box enclosing `points`.
pub fn min_area_box(points: &[Pixel]) -> OrientedBox {
    let hull = convex_hull(points);
    let n = hull.len();
    if n < 2 {
        return OrientedBox {
            long: 0.0,
            short: 0.0,
        };
    }

    let mut best_area = f32::INFINITY;
    let mut best = OrientedBox {
        long: 0.0,
        short: 0.0,
    };
    for i in 0..n {
        let a = hull[i];
        let b = hull[(i + 1) % n];
        let ex = b[0] - a[0];
        let ey = b[1] - a[1];
        let len = (ex * ex + ey * ey).sqrt();
        if len <= f32::EPSILON {
            continue;
        }
        let (ux, uy) = (ex / len, ey / len);
        let (mut min_u, mut max_u) = (f32::INFINITY, f32::NEG_INFINITY);
        let (mut min_v, mut max_v) = (f32::INFINITY, f32::NEG_INFINITY);
        for p in &hull {
            let dx = p[0] - a[0];
            let dy = p[1] - a[1];
            let u = dx * ux + dy * uy;
            let v = -dx * uy + dy * ux;
            min_u = min_u.min(u);
            max_u = max_u.max(u);
            min_v = min_v.min(v);
            max_v = max_v.max(v);
        }
        let w = max_u - min_u;
        let h = max_v - min_v;
        let area = w * h;
        if area < best_area {
            best_area = area;
            best = OrientedBox {
                long: w.max(h),
                short: w.min(h),
            };
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hull_of_square_with_interior_points() {
        let pts = vec![[0, 0], [4, 0], [4, 4], [0, 4], [2, 2], [1, 3], [2, 0]];
        let hull = convex_hull(&pts);
        assert_eq!(hull.len(), 4);
    }

    #[test]
    fn straight_line_has_zero_short_side() {
        let pts: Vec<Pixel> = (0..30).map(|i| [i, 2 * i + 1]).collect();
        let b = min_area_box(&pts);
        assert!(b.short.abs() < 1e-4);
        assert!((b.long - (29.0f32 * 29.0 + 58.0 * 58.0).sqrt()).abs() < 1e-3);
        assert!(b.aspect().is_infinite());
    }

    #[test]
    fn rotated_rectangle_is_recovered() {
        // 45° rectangle with sides 10·√2 and 3·√2
        let mut pts = Vec::new();
        for s in 0..=10 {
            for t in 0..=3 {
                pts.push([s + t, s - t]);
            }
        }
        let b = min_area_box(&pts);
        let sqrt2 = std::f32::consts::SQRT_2;
        assert!((b.long - 10.0 * sqrt2).abs() < 1e-3, "{b:?}");
        assert!((b.short - 3.0 * sqrt2).abs() < 1e-3, "{b:?}");
    }
}
