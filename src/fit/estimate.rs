//! Ellipse parameters from one arc triplet.
//!
//! The center is the median of several line intersections built from the two
//! pair records. Shape comes from conjugate slope pairs: a chord slope `q1`
//! and the slope `q2` of the diameter bisecting it satisfy, in the frame of
//! the ellipse axes, `m1·m2 = −N²` with `N = b/a`. Two such pairs fix the
//! axis direction `K = tan ρ` through a quadratic, then `N` follows. Every
//! combination of samples votes and the modes are elected.
use super::accumulator::{VoteAccumulators, N_BINS};
use crate::angle::degree_bin;
use crate::arcs::Arc;
use crate::pairing::{intersect_lines, DiameterEstimate, EllipseData};
use crate::types::Ellipse;
use nalgebra::Point2;

/// Coordinate-wise median of the two pair centers, the four cross
/// intersections of their diameter lines and the midpoint of the two centers.
pub fn fused_center(ij: &EllipseData, ik: &EllipseData) -> Point2<f32> {
    let mut xs = Vec::with_capacity(7);
    let mut ys = Vec::with_capacity(7);
    let mut push = |p: Point2<f32>| {
        xs.push(p.x);
        ys.push(p.y);
    };
    push(ij.center);
    push(ik.center);
    for a in [&ij.first, &ij.second] {
        for b in [&ik.first, &ik.second] {
            if let Some(p) = intersect_lines(a.median, a.median_slope, b.median, b.median_slope) {
                push(p);
            }
        }
    }
    push(nalgebra::center(&ij.center, &ik.center));

    let mid = xs.len() / 2;
    let x = *xs.select_nth_unstable_by(mid, f32::total_cmp).1;
    let y = *ys.select_nth_unstable_by(mid, f32::total_cmp).1;
    Point2::new(x, y)
}

/// Solve one conjugate-pair combination for `(N, ρ)`.
///
/// `q1`, `q2` are a chord slope and its diameter slope on one pair, `q3`,
/// `q4` the same on the other. Returns `None` for an imaginary solution.
pub fn solve_shape(q1: f64, q2: f64, q3: f64, q4: f64) -> Option<(f64, f64)> {
    let q1q2 = q1 * q2;
    let q3q4 = q3 * q4;
    let a = q1q2 - q3q4;
    let b = (q3q4 + 1.0) * (q1 + q2) - (q1q2 + 1.0) * (q3 + q4);
    let k = (-b + (b * b + 4.0 * a * a).sqrt()) / (2.0 * a);
    let z = (q1 - k) * (q2 - k) / ((1.0 + q1 * k) * (1.0 + q2 * k));
    if !z.is_finite() || z >= 0.0 {
        return None;
    }
    let mut n = (-z).sqrt();
    let mut rho = k.atan();
    if n > 1.0 {
        n = 1.0 / n;
        rho += std::f64::consts::FRAC_PI_2;
    }
    Some((n, rho))
}

fn vote_family(acc: &mut VoteAccumulators, fa: &DiameterEstimate, fb: &DiameterEstimate) {
    let q1 = fa.chord_slope as f64;
    let q3 = fb.chord_slope as f64;
    for &q2 in &fa.slopes {
        for &q4 in &fb.slopes {
            if let Some((n, rho)) = solve_shape(q1, q2 as f64, q3, q4 as f64) {
                let n_bin = (n * 100.0).round() as usize;
                if n_bin < N_BINS {
                    acc.n.vote(n_bin);
                    acc.rho.vote(degree_bin(rho));
                }
            }
        }
    }
}

/// Vote `(N, ρ)` over the four family combinations and elect both modes.
/// Returns `(N, ρ)` with ρ in radians.
pub fn vote_shape(acc: &mut VoteAccumulators, ij: &EllipseData, ik: &EllipseData) -> (f32, f32) {
    for fa in [&ij.first, &ij.second] {
        for fb in [&ik.first, &ik.second] {
            vote_family(acc, fa, fb);
        }
    }
    let n = acc.n.argmax() as f32 * 0.01;
    let rho = (acc.rho.argmax() as f32).to_radians();
    (n, rho)
}

/// Vote the semi-major axis over every point of the triplet and elect it.
pub fn vote_semi_major(
    acc: &mut VoteAccumulators,
    arcs: [&Arc; 3],
    center: Point2<f32>,
    n: f32,
    rho: f32,
) -> f32 {
    let (s, c) = rho.sin_cos();
    for arc in arcs {
        for p in &arc.points {
            let dx = p[0] as f32 - center.x;
            let dy = p[1] as f32 - center.y;
            let x0 = dx * c + dy * s;
            let y0 = (-dx * s + dy * c) / n;
            let a = (x0 * x0 + y0 * y0).sqrt();
            if a.is_finite() {
                acc.a.vote(a.round() as usize);
            }
        }
    }
    acc.a.argmax() as f32
}

/// Full parameter estimate for a triplet whose pair records are valid.
/// `a_bins` is the semi-major histogram size (`max(width, height)`).
pub fn estimate_ellipse(
    acc: &mut VoteAccumulators,
    arcs: [&Arc; 3],
    ij: &EllipseData,
    ik: &EllipseData,
    a_bins: usize,
) -> Ellipse {
    acc.reset(a_bins);
    let center = fused_center(ij, ik);
    let (n, rho) = vote_shape(acc, ij, ik);
    let a = vote_semi_major(acc, arcs, center, n, rho);
    Ellipse::new(center.x, center.y, a, a * n, rho)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Chord slope and conjugate diameter slope for an ellipse with axis
    /// ratio `n` rotated by `rho`, chord direction `phi` in the axis frame.
    fn conjugate(n: f64, rho: f64, phi: f64) -> (f64, f64) {
        let m1 = phi.tan();
        let m2 = -n * n / m1;
        let rot = |m: f64| (m + rho.tan()) / (1.0 - m * rho.tan());
        (rot(m1), rot(m2))
    }

    #[test]
    fn solve_shape_recovers_axis_ratio_and_rotation() {
        let (n, rho) = (0.6, 0.4);
        let (q1, q2) = conjugate(n, rho, 0.9);
        let (q3, q4) = conjugate(n, rho, -0.5);
        let (n_est, rho_est) = solve_shape(q1, q2, q3, q4).expect("real solution");
        assert!((n_est - n).abs() < 1e-6, "n={n_est}");
        let drho = crate::angle::axis_difference(rho_est as f32, rho as f32);
        assert!(drho < 1e-4, "rho={rho_est}");
    }

    #[test]
    fn solve_shape_swaps_when_ratio_exceeds_one() {
        // same ellipse described with the minor axis along K
        let (n, rho) = (0.5, 1.0);
        let (q1, q2) = conjugate(n, rho, 0.3);
        let (q3, q4) = conjugate(n, rho, 1.2);
        let (n_est, rho_est) = solve_shape(q1, q2, q3, q4).expect("real solution");
        assert!(n_est <= 1.0);
        assert!((n_est - n).abs() < 1e-6);
        let drho = crate::angle::axis_difference(rho_est as f32, rho as f32);
        assert!(drho < 1e-4, "rho={rho_est}");
    }

    #[test]
    fn fused_center_is_robust_to_one_bad_center() {
        let fam = |m: Point2<f32>, t: f32| DiameterEstimate {
            chord_slope: 0.0,
            slopes: vec![t],
            median: m,
            median_slope: t,
        };
        let c = Point2::new(10.0, 20.0);
        let ij = EllipseData {
            valid: true,
            first: fam(Point2::new(12.0, 22.0), 1.0),
            second: fam(Point2::new(10.0, 25.0), 1e4),
            center: c,
        };
        let ik = EllipseData {
            valid: true,
            first: fam(Point2::new(8.0, 22.0), -1.0),
            second: fam(Point2::new(15.0, 20.0), 0.0),
            center: Point2::new(40.0, 40.0),
        };
        let f = fused_center(&ij, &ik);
        assert!((f.x - 10.0).abs() < 0.01 && (f.y - 20.0).abs() < 0.01, "{f:?}");
    }
}
