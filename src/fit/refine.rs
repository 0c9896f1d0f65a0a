//! Direct least-squares refinement of a voted ellipse (Fitzgibbon et al., 1999).
//!
//! Voting quantises the shape to whole-pixel semi-axes and 0.01 steps of
//! `N`, and the fused center inherits the pixel grid of the chord
//! midpoints. Refitting the conic to the triplet's edge points that already
//! lie near the voted contour removes that quantisation.

use nalgebra::{Matrix3, Matrix6, Vector3, Vector6};

use crate::arcs::Arc;
use crate::types::Ellipse;

/// Edge points with `|x'²/a² + y'²/b² − 1|` below this support the refit.
pub const REFINE_INLIER_RESIDUAL: f32 = 0.25;

/// Refit `candidate` to the points of `arcs` lying near its contour.
/// Falls back to `candidate` when there are too few supporting points or the
/// fitted conic is not an ellipse.
pub fn refine_ellipse(candidate: &Ellipse, arcs: [&Arc; 3]) -> Ellipse {
    if !(candidate.semi_major > 0.0 && candidate.semi_minor > 0.0) {
        return *candidate;
    }
    let inliers: Vec<[f64; 2]> = arcs
        .iter()
        .flat_map(|arc| arc.points.iter())
        .filter(|p| candidate.contour_residual(p[0] as f32, p[1] as f32).abs() < REFINE_INLIER_RESIDUAL)
        .map(|p| [p[0] as f64, p[1] as f64])
        .collect();
    fit_ellipse_direct(&inliers).unwrap_or(*candidate)
}

/// Fit an ellipse to at least six points. Returns `None` for degenerate
/// point sets and for conics that are not real ellipses.
pub fn fit_ellipse_direct(points: &[[f64; 2]]) -> Option<Ellipse> {
    if points.len() < 6 {
        return None;
    }
    let (mean_x, mean_y, scale) = normalization(points);

    // scatter matrix of the design rows [x², xy, y², x, y, 1]
    let mut s = Matrix6::<f64>::zeros();
    for &[px, py] in points {
        let x = (px - mean_x) * scale;
        let y = (py - mean_y) * scale;
        let row = Vector6::new(x * x, x * y, y * y, x, y, 1.0);
        s += row * row.transpose();
    }
    let s11: Matrix3<f64> = s.fixed_view::<3, 3>(0, 0).into_owned();
    let s12: Matrix3<f64> = s.fixed_view::<3, 3>(0, 3).into_owned();
    let s22: Matrix3<f64> = s.fixed_view::<3, 3>(3, 3).into_owned();

    let s22_inv = s22.try_inverse()?;
    let m = s11 - s12 * s22_inv * s12.transpose();
    // inverse of the constraint matrix [[0, 0, 2], [0, -1, 0], [2, 0, 0]]
    let c1_inv = Matrix3::new(0.0, 0.0, 0.5, 0.0, -1.0, 0.0, 0.5, 0.0, 0.0);
    let a1 = constrained_eigenvector(&(c1_inv * m))?;
    let a2 = -s22_inv * s12.transpose() * a1;

    let conic = denormalize([a1[0], a1[1], a1[2], a2[0], a2[1], a2[2]], mean_x, mean_y, scale);
    conic_to_ellipse(conic)
}

/// Centroid and the scale that brings the mean distance to the centroid to √2.
fn normalization(points: &[[f64; 2]]) -> (f64, f64, f64) {
    let n = points.len() as f64;
    let mean_x = points.iter().map(|p| p[0]).sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p[1]).sum::<f64>() / n;
    let mean_dist = points
        .iter()
        .map(|p| ((p[0] - mean_x).powi(2) + (p[1] - mean_y).powi(2)).sqrt())
        .sum::<f64>()
        / n;
    let scale = if mean_dist > 1e-12 {
        std::f64::consts::SQRT_2 / mean_dist
    } else {
        1.0
    };
    (mean_x, mean_y, scale)
}

/// Eigenvector of the reduced system satisfying `4AC − B² > 0`. When more
/// than one qualifies the smallest eigenvalue in magnitude wins.
fn constrained_eigenvector(system: &Matrix3<f64>) -> Option<Vector3<f64>> {
    let a = system;
    let trace = a.trace();
    let minors = a[(0, 0)] * a[(1, 1)] - a[(0, 1)] * a[(1, 0)] + a[(0, 0)] * a[(2, 2)]
        - a[(0, 2)] * a[(2, 0)]
        + a[(1, 1)] * a[(2, 2)]
        - a[(1, 2)] * a[(2, 1)];
    let mut best: Option<(f64, Vector3<f64>)> = None;
    for ev in real_cubic_roots(-trace, minors, -a.determinant()) {
        let Some(v) = null_vector(&(a - Matrix3::identity() * ev)) else {
            continue;
        };
        if 4.0 * v[0] * v[2] - v[1] * v[1] <= 0.0 {
            continue;
        }
        if best.as_ref().map_or(true, |(b, _)| ev.abs() < *b) {
            best = Some((ev.abs(), v));
        }
    }
    best.map(|(_, v)| v)
}

/// Null vector of a rank-2 matrix: the adjugate row with the largest norm.
fn null_vector(m: &Matrix3<f64>) -> Option<Vector3<f64>> {
    let rows = [
        Vector3::new(
            m[(1, 1)] * m[(2, 2)] - m[(1, 2)] * m[(2, 1)],
            -(m[(1, 0)] * m[(2, 2)] - m[(1, 2)] * m[(2, 0)]),
            m[(1, 0)] * m[(2, 1)] - m[(1, 1)] * m[(2, 0)],
        ),
        Vector3::new(
            -(m[(0, 1)] * m[(2, 2)] - m[(0, 2)] * m[(2, 1)]),
            m[(0, 0)] * m[(2, 2)] - m[(0, 2)] * m[(2, 0)],
            -(m[(0, 0)] * m[(2, 1)] - m[(0, 1)] * m[(2, 0)]),
        ),
        Vector3::new(
            m[(0, 1)] * m[(1, 2)] - m[(0, 2)] * m[(1, 1)],
            -(m[(0, 0)] * m[(1, 2)] - m[(0, 2)] * m[(1, 0)]),
            m[(0, 0)] * m[(1, 1)] - m[(0, 1)] * m[(1, 0)],
        ),
    ];
    let best = rows
        .iter()
        .max_by(|a, b| a.norm_squared().total_cmp(&b.norm_squared()))?;
    let norm = best.norm();
    (norm > 1e-15).then(|| best / norm)
}

/// Real roots of `x³ + b x² + c x + d`.
fn real_cubic_roots(b: f64, c: f64, d: f64) -> Vec<f64> {
    let p = c - b * b / 3.0;
    let q = 2.0 * b * b * b / 27.0 - b * c / 3.0 + d;
    let shift = -b / 3.0;
    if -4.0 * p * p * p - 27.0 * q * q >= 0.0 {
        let r = (-p / 3.0).max(0.0).sqrt();
        let cos_arg = if r < 1e-15 {
            0.0
        } else {
            (-q / (2.0 * r * r * r)).clamp(-1.0, 1.0)
        };
        let theta = cos_arg.acos();
        (0..3)
            .map(|k| 2.0 * r * ((theta + 2.0 * std::f64::consts::PI * k as f64) / 3.0).cos() + shift)
            .collect()
    } else {
        let root = (q * q / 4.0 + p * p * p / 27.0).sqrt();
        vec![(-q / 2.0 + root).cbrt() + (-q / 2.0 - root).cbrt() + shift]
    }
}

/// Map conic coefficients fitted in `x' = s(x − mx)`, `y' = s(y − my)` back
/// to image coordinates.
fn denormalize(c: [f64; 6], mx: f64, my: f64, s: f64) -> [f64; 6] {
    let [a, b, cc, d, e, f] = c;
    let s2 = s * s;
    [
        a * s2,
        b * s2,
        cc * s2,
        -2.0 * a * s2 * mx - b * s2 * my + d * s,
        -b * s2 * mx - 2.0 * cc * s2 * my + e * s,
        a * s2 * mx * mx + b * s2 * mx * my + cc * s2 * my * my - d * s * mx - e * s * my + f,
    ]
}

/// Geometric parameters of `Ax² + Bxy + Cy² + Dx + Ey + F = 0`.
fn conic_to_ellipse([a, b, c, d, e, f]: [f64; 6]) -> Option<Ellipse> {
    let det = 4.0 * a * c - b * b;
    if det <= 0.0 {
        return None;
    }
    let cx = (b * e - 2.0 * c * d) / det;
    let cy = (b * d - 2.0 * a * e) / det;
    let f0 = a * cx * cx + b * cx * cy + c * cy * cy + d * cx + e * cy + f;
    let theta = 0.5 * b.atan2(a - c);
    let q = |t: f64| {
        let (s, co) = t.sin_cos();
        a * co * co + b * co * s + c * s * s
    };
    let r1 = -f0 / q(theta);
    let r2 = -f0 / q(theta + std::f64::consts::FRAC_PI_2);
    if !(r1 > 0.0 && r2 > 0.0 && r1.is_finite() && r2.is_finite()) {
        return None;
    }
    Some(Ellipse::new(
        cx as f32,
        cy as f32,
        r1.sqrt() as f32,
        r2.sqrt() as f32,
        theta as f32,
    ))
}
