use serde::Serialize;

/// Pixel coordinate `[x, y]` of an edge point.
pub type Pixel = [i32; 2];

/// Which quarter of an ellipse contour an arc can belong to (image y down).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum QuadrantClass {
    /// Top-right quarter.
    First = 1,
    /// Top-left quarter.
    Second = 2,
    /// Bottom-left quarter.
    Third = 3,
    /// Bottom-right quarter.
    Fourth = 4,
}

impl QuadrantClass {
    pub const ALL: [QuadrantClass; 4] = [
        QuadrantClass::First,
        QuadrantClass::Second,
        QuadrantClass::Third,
        QuadrantClass::Fourth,
    ];

    /// Zero-based slot used by [`ArcSet`].
    #[inline]
    pub fn index(self) -> usize {
        self as usize - 1
    }
}

/// Ordered pixels of one connected edge component.
///
/// Points run left to right; within a column classes 1/3 run top to bottom
/// and classes 2/4 bottom to top, which makes the sequence follow the contour.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Arc {
    pub class: QuadrantClass,
    pub points: Vec<Pixel>,
}

impl Arc {
    #[inline]
    pub fn first(&self) -> Pixel {
        self.points[0]
    }

    #[inline]
    pub fn last(&self) -> Pixel {
        self.points[self.points.len() - 1]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Arcs grouped by quadrant class.
#[derive(Clone, Debug, Default)]
pub struct ArcSet {
    classes: [Vec<Arc>; 4],
}

impl ArcSet {
    pub fn push(&mut self, arc: Arc) {
        self.classes[arc.class.index()].push(arc);
    }

    pub fn of(&self, class: QuadrantClass) -> &[Arc] {
        &self.classes[class.index()]
    }

    /// Arc counts in class order 1..=4.
    pub fn counts(&self) -> [usize; 4] {
        [
            self.classes[0].len(),
            self.classes[1].len(),
            self.classes[2].len(),
            self.classes[3].len(),
        ]
    }

    pub fn total(&self) -> usize {
        self.classes.iter().map(Vec::len).sum()
    }
}
