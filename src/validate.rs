//! Candidate scoring: contour support and arc coverage.
use crate::arcs::Arc;
use crate::types::Ellipse;

/// Acceptance thresholds for a fitted candidate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValidationParams {
    pub distance_to_contour: f32,
    pub min_score: f32,
    pub min_reliability: f32,
}

/// Fraction of the arcs' points whose normalised residual is below
/// `distance_to_contour`.
pub fn contour_score(ellipse: &Ellipse, arcs: [&Arc; 3], distance_to_contour: f32) -> f32 {
    let mut total = 0usize;
    let mut on_contour = 0usize;
    for arc in arcs {
        for p in &arc.points {
            total += 1;
            if ellipse.contour_residual(p[0] as f32, p[1] as f32).abs() < distance_to_contour {
                on_contour += 1;
            }
        }
    }
    if total == 0 {
        0.0
    } else {
        on_contour as f32 / total as f32
    }
}

/// How much of the contour the arcs span: the L1 extent between each arc's
/// end points in the ellipse frame, relative to `3(a + b)`, capped at 1.
pub fn reliability(ellipse: &Ellipse, arcs: [&Arc; 3]) -> f32 {
    let mut extent = 0.0f32;
    for arc in arcs {
        if arc.is_empty() {
            continue;
        }
        let f = arc.first();
        let l = arc.last();
        let (fx, fy) = ellipse.to_local(f[0] as f32, f[1] as f32);
        let (lx, ly) = ellipse.to_local(l[0] as f32, l[1] as f32);
        extent += (fx - lx).abs() + (fy - ly).abs();
    }
    let denom = 3.0 * (ellipse.semi_major + ellipse.semi_minor);
    (extent / denom).min(1.0)
}

/// Score a candidate and return it when it passes both thresholds.
pub fn validate(candidate: &Ellipse, arcs: [&Arc; 3], params: &ValidationParams) -> Option<Ellipse> {
    if !(candidate.semi_major > 0.0 && candidate.semi_minor > 0.0) {
        return None;
    }
    let score = contour_score(candidate, arcs, params.distance_to_contour);
    if score < params.min_score {
        return None;
    }
    let rel = reliability(candidate, arcs);
    if rel < params.min_reliability {
        return None;
    }
    let mut accepted = *candidate;
    accepted.score = score;
    accepted.reliability = rel;
    Some(accepted)
}
