//! Axis-orientation helpers. Ellipse axes are undirected, so every angle
//! here lives on the half turn `[0, π)`.
use std::f32::consts::{FRAC_PI_2, PI};

/// Wrap an angle into `[0, π)`.
#[inline]
pub fn normalize_half_pi(angle: f32) -> f32 {
    let norm = angle.rem_euclid(PI);
    if norm >= PI - 1e-6 {
        0.0
    } else {
        norm
    }
}

/// Unsigned difference between two axis directions, in `[0, π/2]`.
#[inline]
pub fn axis_difference(a: f32, b: f32) -> f32 {
    let diff = (a - b).abs().rem_euclid(PI);
    if diff > FRAC_PI_2 {
        PI - diff
    } else {
        diff
    }
}

/// Whole-degree bin of an axis direction, `0..180`.
#[inline]
pub fn degree_bin(angle: f64) -> usize {
    let deg = angle.rem_euclid(std::f64::consts::PI).to_degrees();
    (deg.round() as usize) % 180
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn normalize_half_pi_basic() {
        assert!(approx_eq(normalize_half_pi(0.5), 0.5));
        assert!(approx_eq(
            normalize_half_pi(-std::f32::consts::FRAC_PI_4),
            3.0 * std::f32::consts::FRAC_PI_4
        ));
        assert!(approx_eq(normalize_half_pi(PI), 0.0));
        assert!(approx_eq(normalize_half_pi(3.0 * PI), 0.0));
    }

    #[test]
    fn axis_difference_wraps_around_half_turn() {
        assert!(approx_eq(axis_difference(0.0, PI), 0.0));
        assert!(approx_eq(axis_difference(0.05, PI - 0.05), 0.1));
        assert!(approx_eq(axis_difference(0.0, FRAC_PI_2), FRAC_PI_2));
        assert!(approx_eq(axis_difference(0.25, 1.7), axis_difference(1.7, 0.25)));
    }

    #[test]
    fn degree_bin_rounds_and_wraps() {
        assert_eq!(degree_bin(0.0), 0);
        assert_eq!(degree_bin(10.4f64.to_radians()), 10);
        assert_eq!(degree_bin(179.6f64.to_radians()), 0);
        assert_eq!(degree_bin(-1.0f64.to_radians()), 179);
        assert_eq!(degree_bin(std::f64::consts::PI + 0.7f64.to_radians()), 1);
    }
}
