//! Merging of duplicate detections among accepted candidates.
use crate::angle::axis_difference;
use crate::types::Ellipse;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Tolerances under which two ellipses count as the same detection.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterParams {
    /// Center distance as a fraction of the smaller semi-minor axis.
    pub center_ratio: f32,
    /// Relative semi-axis difference.
    pub axis_ratio: f32,
    /// Axis direction difference as a fraction of π.
    pub angle_ratio: f32,
    /// `b/a` above which orientation is ignored.
    pub circle_ratio: f32,
}

impl Default for ClusterParams {
    fn default() -> Self {
        Self {
            center_ratio: 0.1,
            axis_ratio: 0.1,
            angle_ratio: 0.1,
            circle_ratio: 0.9,
        }
    }
}

/// True when `e2` duplicates `e1` under `params`.
pub fn is_duplicate(e1: &Ellipse, e2: &Ellipse, params: &ClusterParams) -> bool {
    let min_b = e1.semi_minor.min(e2.semi_minor);
    let dx = e1.cx - e2.cx;
    let dy = e1.cy - e2.cy;
    let max_dc = params.center_ratio * min_b;
    if dx * dx + dy * dy > max_dc * max_dc {
        return false;
    }
    let da = (e1.semi_major - e2.semi_major).abs() / e1.semi_major.max(e2.semi_major);
    if !(da <= params.axis_ratio) {
        return false;
    }
    let db = (e1.semi_minor - e2.semi_minor).abs() / min_b;
    if !(db <= params.axis_ratio) {
        return false;
    }
    let circles = e1.axis_ratio() >= params.circle_ratio && e2.axis_ratio() >= params.circle_ratio;
    circles || axis_difference(e1.angle, e2.angle) / PI <= params.angle_ratio
}

/// Running score-weighted offsets of a group's members from its leader.
struct Group {
    leader: Ellipse,
    weight: f32,
    dx: f32,
    dy: f32,
    da: f32,
    db: f32,
    cos2: f32,
    sin2: f32,
}

impl Group {
    fn new(leader: Ellipse) -> Self {
        let mut group = Self {
            leader,
            weight: 0.0,
            dx: 0.0,
            dy: 0.0,
            da: 0.0,
            db: 0.0,
            cos2: 0.0,
            sin2: 0.0,
        };
        group.add(&leader);
        group
    }

    fn add(&mut self, e: &Ellipse) {
        let w = e.score.max(f32::EPSILON);
        let l = &self.leader;
        self.weight += w;
        self.dx += w * (e.cx - l.cx);
        self.dy += w * (e.cy - l.cy);
        self.da += w * (e.semi_major - l.semi_major);
        self.db += w * (e.semi_minor - l.semi_minor);
        // axis directions are averaged on the doubled angle
        let (s, c) = (2.0 * (e.angle - l.angle)).sin_cos();
        self.cos2 += w * c;
        self.sin2 += w * s;
    }

    fn representative(&self) -> Ellipse {
        let l = &self.leader;
        let mut e = Ellipse::new(
            l.cx + self.dx / self.weight,
            l.cy + self.dy / self.weight,
            l.semi_major + self.da / self.weight,
            l.semi_minor + self.db / self.weight,
            l.angle + 0.5 * self.sin2.atan2(self.cos2),
        );
        e.score = l.score;
        e.reliability = l.reliability;
        e
    }
}

/// Merge every group of duplicates into one representative.
///
/// Candidates are visited by descending score (ties keep input order) and
/// join the first group whose leader they duplicate, otherwise they lead a
/// new group. The representative has the score-weighted mean center,
/// semi-axes and axis direction of its members, and the leader's score and
/// reliability. Representatives that still duplicate a better one are
/// dropped, so no two outputs lie within tolerance of each other.
pub fn cluster_ellipses(candidates: Vec<Ellipse>, params: &ClusterParams) -> Vec<Ellipse> {
    let mut sorted = candidates;
    sorted.sort_by(|a, b| b.score.total_cmp(&a.score));

    let mut groups: Vec<Group> = Vec::new();
    for e in &sorted {
        match groups.iter_mut().find(|g| is_duplicate(&g.leader, e, params)) {
            Some(group) => group.add(e),
            None => groups.push(Group::new(*e)),
        }
    }

    let mut kept: Vec<Ellipse> = Vec::with_capacity(groups.len());
    for e in groups.iter().map(Group::representative) {
        if kept.iter().any(|k| is_duplicate(k, &e, params)) {
            continue;
        }
        kept.push(e);
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ell(cx: f32, cy: f32, a: f32, b: f32, angle: f32, score: f32) -> Ellipse {
        let mut e = Ellipse::new(cx, cy, a, b, angle);
        e.score = score;
        e
    }

    #[test]
    fn near_identical_candidates_merge_to_best_score() {
        let params = ClusterParams::default();
        let out = cluster_ellipses(
            vec![
                ell(100.0, 100.0, 50.0, 30.0, 0.3, 0.8),
                ell(100.5, 99.8, 51.0, 30.5, 0.32, 0.9),
                ell(200.0, 100.0, 50.0, 30.0, 0.3, 0.85),
            ],
            &params,
        );
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].score, 0.9);
        assert_eq!(out[1], ell(200.0, 100.0, 50.0, 30.0, 0.3, 0.85));
    }

    #[test]
    fn merged_representative_is_the_score_weighted_mean() {
        let params = ClusterParams::default();
        let out = cluster_ellipses(
            vec![
                ell(100.0, 100.0, 50.0, 30.0, 0.30, 1.0),
                ell(101.0, 99.0, 51.0, 31.0, 0.34, 1.0),
                ell(99.0, 101.0, 49.0, 29.0, 0.26, 1.0),
                ell(102.0, 100.0, 50.0, 30.0, 0.30, 0.5),
            ],
            &params,
        );
        assert_eq!(out.len(), 1);
        let e = &out[0];
        assert!((e.cx - (100.0 + 1.0 / 3.5)).abs() < 1e-4, "{e:?}");
        assert!((e.cy - 100.0).abs() < 1e-4, "{e:?}");
        assert!((e.semi_major - 50.0).abs() < 1e-4 && (e.semi_minor - 30.0).abs() < 1e-4);
        assert!((e.angle - 0.30).abs() < 1e-4, "{e:?}");
        assert_eq!(e.score, 1.0);
    }

    #[test]
    fn axis_directions_average_across_the_wrap() {
        let params = ClusterParams::default();
        let out = cluster_ellipses(
            vec![ell(50.0, 50.0, 40.0, 20.0, 0.04, 0.9), ell(50.0, 50.0, 40.0, 20.0, PI - 0.02, 0.9)],
            &params,
        );
        assert_eq!(out.len(), 1);
        assert!(axis_difference(out[0].angle, 0.01) < 1e-4, "{:?}", out[0]);
    }

    #[test]
    fn orientation_matters_only_for_elongated_ellipses() {
        let params = ClusterParams::default();
        let a = ell(50.0, 50.0, 40.0, 20.0, 0.0, 0.9);
        let b = ell(50.0, 50.0, 40.0, 20.0, 1.2, 0.8);
        assert!(!is_duplicate(&a, &b, &params));

        let c = ell(50.0, 50.0, 40.0, 39.0, 0.0, 0.9);
        let d = ell(50.0, 50.0, 40.0, 39.0, 1.2, 0.8);
        assert!(is_duplicate(&c, &d, &params));
    }

    #[test]
    fn axes_across_the_wrap_are_close() {
        let params = ClusterParams::default();
        let a = ell(50.0, 50.0, 40.0, 20.0, 0.02, 0.9);
        let b = ell(50.0, 50.0, 40.0, 20.0, PI - 0.02, 0.8);
        assert!(is_duplicate(&a, &b, &params));
    }

    #[test]
    fn concentric_rings_of_different_size_survive() {
        let params = ClusterParams::default();
        let out = cluster_ellipses(
            vec![ell(80.0, 80.0, 60.0, 60.0, 0.0, 0.9), ell(80.0, 80.0, 30.0, 30.0, 0.0, 0.95)],
            &params,
        );
        assert_eq!(out.len(), 2);
    }
}
