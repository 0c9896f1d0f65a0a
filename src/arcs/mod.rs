//! Arc extraction: connected edge components filtered by shape and assigned
//! to one of the four quadrant classes by a convexity test.
//!
//! The positive map (`gx·gy < 0`) can only hold arcs of classes 1 and 3, the
//! negative map classes 2 and 4. Within the arc's axis-aligned box, the class
//! follows from which side of the curve covers more pixels: a top-right
//! quarter leaves little room above it and a lot below, a bottom-left quarter
//! the opposite.

pub mod labeling;
pub mod obox;
pub mod types;

pub use labeling::label_components;
pub use obox::{min_area_box, OrientedBox};
pub use types::{Arc, ArcSet, Pixel, QuadrantClass};

use crate::preprocess::EdgeSplit;
use crate::image::EdgeMap;

/// Shape filters applied to every component before classification.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArcFilter {
    pub min_edge_length: usize,
    pub min_oriented_rect_side: f32,
    pub max_rect_axes_ratio: f32,
}

/// Which of the two directional maps a component came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeDirection {
    /// `gx·gy < 0`
    Positive,
    /// `gx·gy > 0`
    Negative,
}

/// Extract and classify arcs from both directional maps.
pub fn extract_arcs(split: &EdgeSplit, filter: &ArcFilter) -> ArcSet {
    let mut set = ArcSet::default();
    collect(&split.positive, EdgeDirection::Positive, filter, &mut set);
    collect(&split.negative, EdgeDirection::Negative, filter, &mut set);
    set
}

fn collect(map: &EdgeMap, direction: EdgeDirection, filter: &ArcFilter, set: &mut ArcSet) {
    for points in label_components(map, filter.min_edge_length) {
        let obox = min_area_box(&points);
        if obox.short < filter.min_oriented_rect_side {
            continue;
        }
        if obox.aspect() > filter.max_rect_axes_ratio {
            continue;
        }
        if let Some(arc) = classify(points, direction) {
            set.push(arc);
        }
    }
}

/// Sort the component's points along the contour and decide its class.
/// Returns `None` when the areas above and below the curve are equal.
pub fn classify(mut points: Vec<Pixel>, direction: EdgeDirection) -> Option<Arc> {
    if points.is_empty() {
        return None;
    }
    match direction {
        EdgeDirection::Positive => points.sort_by(|a, b| a[0].cmp(&b[0]).then(a[1].cmp(&b[1]))),
        EdgeDirection::Negative => points.sort_by(|a, b| a[0].cmp(&b[0]).then(b[1].cmp(&a[1]))),
    }

    let left = points[0];
    let right = points[points.len() - 1];
    let width = (right[0] - left[0]).abs() as i64 + 1;
    let height = (right[1] - left[1]).abs() as i64 + 1;

    // pixels between the box edge on the start side and the curve, one column at a time
    let mut near = 0i64;
    let mut prev_x = left[0];
    for p in points.iter().skip(1) {
        if p[0] != prev_x {
            prev_x = p[0];
            near += match direction {
                EdgeDirection::Positive => (p[1] - left[1]) as i64,
                EdgeDirection::Negative => (left[1] - p[1]) as i64,
            };
        }
    }
    let far = width * height - points.len() as i64 - near;

    let class = match direction {
        // near = above the curve
        EdgeDirection::Positive if far > near => QuadrantClass::First,
        EdgeDirection::Positive if near > far => QuadrantClass::Third,
        // near = below the curve
        EdgeDirection::Negative if near > far => QuadrantClass::Second,
        EdgeDirection::Negative if far > near => QuadrantClass::Fourth,
        _ => return None,
    };
    Some(Arc { class, points })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Rasterised quarter of a circle of radius `r` centred at `(c, c)`.
    /// `sx`, `sy` select the quarter (+1 right / down).
    fn quarter(c: i32, r: f32, sx: i32, sy: i32) -> Vec<Pixel> {
        let mut pts = Vec::new();
        let steps = 400;
        for s in 0..=steps {
            let t = s as f32 / steps as f32 * std::f32::consts::FRAC_PI_2;
            let x = c + sx * (r * t.cos()).round() as i32;
            let y = c + sy * (r * t.sin()).round() as i32;
            let p = [x, y];
            if !pts.contains(&p) {
                pts.push(p);
            }
        }
        pts
    }

    #[test]
    fn quarter_arcs_get_their_classes() {
        let r = 30.0;
        let tr = classify(quarter(50, r, 1, -1), EdgeDirection::Positive).expect("class 1");
        assert_eq!(tr.class, QuadrantClass::First);
        let bl = classify(quarter(50, r, -1, 1), EdgeDirection::Positive).expect("class 3");
        assert_eq!(bl.class, QuadrantClass::Third);
        let tl = classify(quarter(50, r, -1, -1), EdgeDirection::Negative).expect("class 2");
        assert_eq!(tl.class, QuadrantClass::Second);
        let br = classify(quarter(50, r, 1, 1), EdgeDirection::Negative).expect("class 4");
        assert_eq!(br.class, QuadrantClass::Fourth);
    }

    #[test]
    fn points_follow_the_contour() {
        let tl = classify(quarter(50, 20.0, -1, -1), EdgeDirection::Negative).expect("arc");
        // class 2 runs from the left extreme up to the top
        assert_eq!(tl.first()[0], 30);
        assert_eq!(tl.last()[1], 30);
        let tr = classify(quarter(50, 20.0, 1, -1), EdgeDirection::Positive).expect("arc");
        assert_eq!(tr.first()[1], 30);
        assert_eq!(tr.last()[0], 70);
    }

    #[test]
    fn straight_component_is_filtered_by_shape() {
        let mut split = EdgeSplit {
            positive: EdgeMap::new(64, 64),
            negative: EdgeMap::new(64, 64),
        };
        for i in 5..45 {
            split.positive.mark(i, i + 3);
        }
        let filter = ArcFilter {
            min_edge_length: 16,
            min_oriented_rect_side: 3.0,
            max_rect_axes_ratio: 10.0,
        };
        assert_eq!(extract_arcs(&split, &filter).total(), 0);
    }
}
