//! Center estimation from a pair of arcs by the parallel-chord construction.
//!
//! Midpoints of parallel chords of an ellipse lie on a diameter. Each arc pair
//! yields two chord families (one anchored on each arc), hence two diameter
//! lines whose intersection is the center. Every family also records the
//! chord slope and the slopes of its midpoint line: these conjugate slope
//! pairs are what the fitter votes with.
use crate::arcs::Pixel;
use nalgebra::{Matrix2, Point2, Vector2};

const SLOPE_EPS: f32 = 1e-5;
const PARALLEL_EPS: f32 = 1e-6;

/// Read-only view of an arc, optionally traversed back to front.
#[derive(Clone, Copy, Debug)]
pub struct ArcView<'a> {
    points: &'a [Pixel],
    reversed: bool,
}

impl<'a> ArcView<'a> {
    pub fn forward(points: &'a [Pixel]) -> Self {
        Self {
            points,
            reversed: false,
        }
    }

    pub fn reversed(points: &'a [Pixel]) -> Self {
        Self {
            points,
            reversed: true,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn at(&self, i: usize) -> Point2<f32> {
        let p = if self.reversed {
            self.points[self.points.len() - 1 - i]
        } else {
            self.points[i]
        };
        Point2::new(p[0] as f32, p[1] as f32)
    }
}

/// One chord family: the diameter its midpoints define.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DiameterEstimate {
    /// Slope of the reference chord.
    pub chord_slope: f32,
    /// Slopes between paired chord midpoints.
    pub slopes: Vec<f32>,
    /// Coordinate-wise median of the midpoints.
    pub median: Point2<f32>,
    /// Median of `slopes`.
    pub median_slope: f32,
}

/// Geometry shared by every triplet containing a given arc pair.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EllipseData {
    pub valid: bool,
    pub first: DiameterEstimate,
    pub second: DiameterEstimate,
    pub center: Point2<f32>,
}

impl EllipseData {
    pub fn invalid() -> Self {
        Self::default()
    }
}

/// Intersection of the lines through `p1` with slope `t1` and `p2` with slope `t2`.
pub fn intersect_lines(p1: Point2<f32>, t1: f32, p2: Point2<f32>, t2: f32) -> Option<Point2<f32>> {
    if !(t1.is_finite() && t2.is_finite()) || (t1 - t2).abs() < PARALLEL_EPS {
        return None;
    }
    // t·x − y = t·px − py for both lines
    let m = Matrix2::new(t1, -1.0, t2, -1.0);
    let rhs = Vector2::new(t1 * p1.x - p1.y, t2 * p2.x - p2.y);
    let sol = m.try_inverse()? * rhs;
    if sol.x.is_finite() && sol.y.is_finite() {
        Some(Point2::new(sol.x, sol.y))
    } else {
        None
    }
}

fn slope(dx: f32, dy: f32) -> f32 {
    let dx = if dx == 0.0 { SLOPE_EPS } else { dx };
    dy / dx
}

/// Median slope of a midpoint cloud and its coordinate-wise median point.
///
/// The midpoints are split into two halves; slopes are taken between
/// `med[i]` and `med[half + i]` so that every slope spans half the cloud.
pub fn median_slope(midpoints: &[Point2<f32>]) -> Option<(f32, Vec<f32>, Point2<f32>)> {
    let n = midpoints.len();
    if n < 2 {
        return None;
    }
    let half = n / 2;
    let slopes: Vec<f32> = (0..half)
        .map(|i| {
            let a = midpoints[i];
            let b = midpoints[half + i];
            slope(b.x - a.x, b.y - a.y)
        })
        .collect();

    let mut xs: Vec<f32> = midpoints.iter().map(|p| p.x).collect();
    let mut ys: Vec<f32> = midpoints.iter().map(|p| p.y).collect();
    let mx = *xs.select_nth_unstable_by(half, f32::total_cmp).1;
    let my = *ys.select_nth_unstable_by(half, f32::total_cmp).1;

    let mut sorted = slopes.clone();
    let ms = *sorted.select_nth_unstable_by(half / 2, f32::total_cmp).1;
    Some((ms, slopes, Point2::new(mx, my)))
}

/// One chord family: chords parallel to `e1[0] → e2[mid]`, anchored on the
/// second half of `e2` and closed on `e1`.
fn chord_family(e1: &ArcView<'_>, e2: &ArcView<'_>, ns: usize) -> Option<DiameterEstimate> {
    let n1 = e1.len();
    let n2 = e2.len();
    if n1 < 2 || n2 < 2 {
        return None;
    }
    let h2 = n2 / 2;
    let start = e1.at(0);
    let mid = e2.at(h2);
    let dx = start.x - mid.x;
    let mut dy = start.y - mid.y;
    if dy == 0.0 {
        dy = SLOPE_EPS;
    }
    let chord_slope = slope(dx, dy);

    let samples = ns.min(h2);
    let mut midpoints = Vec::with_capacity(samples);
    let bin = if ns < h2 { h2 / ns } else { 1 };
    for i in 0..samples {
        let idx = if ns < h2 { h2 + bin / 2 + i * bin } else { h2 + i };
        let p = e2.at(idx);
        // side of the chord-parallel line through p
        let side = |q: Point2<f32>| (q.x - p.x) * dy - (q.y - p.y) * dx;

        let (mut lo, mut hi) = (0usize, n1 - 1);
        let mut f_lo = side(e1.at(lo));
        let mut f_hi = side(e1.at(hi));
        if (f_lo > 0.0) == (f_hi > 0.0) {
            continue;
        }
        while hi - lo > 1 {
            let m = (lo + hi) / 2;
            let f_m = side(e1.at(m));
            if (f_m > 0.0) == (f_lo > 0.0) {
                lo = m;
                f_lo = f_m;
            } else {
                hi = m;
                f_hi = f_m;
            }
        }
        let t = f_lo / (f_lo - f_hi);
        let a = e1.at(lo);
        let b = e1.at(hi);
        let q = a + (b - a) * t;
        midpoints.push(Point2::new((p.x + q.x) * 0.5, (p.y + q.y) * 0.5));
    }

    let (median_slope, slopes, median) = median_slope(&midpoints)?;
    Some(DiameterEstimate {
        chord_slope,
        slopes,
        median,
        median_slope,
    })
}

/// Estimate the center of the ellipse through two arcs.
///
/// `e1` and `e2` must be oriented so that they run in opposite angular
/// directions, starting from the ends that are farthest apart.
pub fn fast_center(e1: ArcView<'_>, e2: ArcView<'_>, ns: usize) -> EllipseData {
    let Some(first) = chord_family(&e1, &e2, ns) else {
        return EllipseData::invalid();
    };
    let Some(second) = chord_family(&e2, &e1, ns) else {
        return EllipseData::invalid();
    };
    let Some(center) = intersect_lines(
        first.median,
        first.median_slope,
        second.median,
        second.median_slope,
    ) else {
        return EllipseData::invalid();
    };
    EllipseData {
        valid: true,
        first,
        second,
        center,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Rasterised arc of a circle, angles in degrees in image coordinates.
    pub(crate) fn circle_arc(cx: f32, cy: f32, r: f32, from_deg: f32, to_deg: f32) -> Vec<Pixel> {
        let mut pts: Vec<Pixel> = Vec::new();
        let steps = 600;
        for s in 0..=steps {
            let t = (from_deg + (to_deg - from_deg) * s as f32 / steps as f32).to_radians();
            let p = [(cx + r * t.cos()).round() as i32, (cy + r * t.sin()).round() as i32];
            if pts.last() != Some(&p) {
                pts.push(p);
            }
        }
        pts
    }

    #[test]
    fn intersect_lines_basic() {
        let p = intersect_lines(Point2::new(0.0, 0.0), 1.0, Point2::new(2.0, 0.0), -1.0)
            .expect("intersection");
        assert!((p.x - 1.0).abs() < 1e-5 && (p.y - 1.0).abs() < 1e-5);
        assert!(intersect_lines(Point2::new(0.0, 0.0), 2.0, Point2::new(1.0, 0.0), 2.0).is_none());
    }

    #[test]
    fn median_slope_of_collinear_midpoints() {
        let pts: Vec<Point2<f32>> = (0..9).map(|i| Point2::new(i as f32, 2.0 * i as f32 + 1.0)).collect();
        let (m, slopes, med) = median_slope(&pts).expect("slope");
        assert_eq!(slopes.len(), 4);
        assert!((m - 2.0).abs() < 1e-5);
        assert_eq!(med, Point2::new(4.0, 9.0));
        assert!(median_slope(&pts[..1]).is_none());
    }

    #[test]
    fn fast_center_of_circle_quarters() {
        let (cx, cy, r) = (100.0, 80.0, 40.0);
        // top-right quarter runs top -> right, bottom-right runs bottom -> right
        let arc1 = circle_arc(cx, cy, r, -85.0, -5.0);
        let arc4 = circle_arc(cx, cy, r, 85.0, 5.0);
        let data = fast_center(ArcView::forward(&arc1), ArcView::forward(&arc4), 16);
        assert!(data.valid);
        assert!((data.center.x - cx).abs() < 1.5, "{:?}", data.center);
        assert!((data.center.y - cy).abs() < 1.5, "{:?}", data.center);
        assert!(!data.first.slopes.is_empty() && !data.second.slopes.is_empty());
    }

    #[test]
    fn reversed_view_walks_backwards() {
        let pts = vec![[0, 0], [1, 2], [3, 4]];
        let v = ArcView::reversed(&pts);
        assert_eq!(v.at(0), Point2::new(3.0, 4.0));
        assert_eq!(v.at(2), Point2::new(0.0, 0.0));
    }
}
