//! Per-call memo of pairwise arc geometry.
use super::center::{fast_center, ArcView, EllipseData};
use crate::arcs::ArcSet;
use crate::arcs::QuadrantClass;
use std::collections::HashMap;

/// Class combination of an arc pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PairKind {
    P12,
    P23,
    P34,
    P14,
}

impl PairKind {
    /// Classes of the `lo` and `hi` arc.
    pub fn classes(self) -> (QuadrantClass, QuadrantClass) {
        match self {
            PairKind::P12 => (QuadrantClass::First, QuadrantClass::Second),
            PairKind::P23 => (QuadrantClass::Second, QuadrantClass::Third),
            PairKind::P34 => (QuadrantClass::Third, QuadrantClass::Fourth),
            PairKind::P14 => (QuadrantClass::First, QuadrantClass::Fourth),
        }
    }
}

/// Arc pair identity: `lo` indexes the lower numbered class, `hi` the higher.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairKey {
    pub kind: PairKind,
    pub lo: usize,
    pub hi: usize,
}

impl PairKey {
    pub fn new(kind: PairKind, lo: usize, hi: usize) -> Self {
        Self { kind, lo, hi }
    }
}

/// Memoized [`EllipseData`] keyed by [`PairKey`].
#[derive(Debug, Default)]
pub struct ArcPairCache {
    entries: HashMap<PairKey, EllipseData>,
    computations: usize,
    hits: usize,
}

impl ArcPairCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.computations = 0;
        self.hits = 0;
    }

    /// Compute the entry for `key` unless present. Returns its validity.
    pub fn ensure<F>(&mut self, key: PairKey, compute: F) -> bool
    where
        F: FnOnce() -> EllipseData,
    {
        if let Some(data) = self.entries.get(&key) {
            self.hits += 1;
            return data.valid;
        }
        let data = compute();
        let valid = data.valid;
        self.computations += 1;
        self.entries.insert(key, data);
        valid
    }

    pub fn get(&self, key: &PairKey) -> Option<&EllipseData> {
        self.entries.get(key)
    }

    /// Number of distinct pairs computed since the last clear.
    pub fn computations(&self) -> usize {
        self.computations
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Run the center estimator for `key` with the canonical arc orientation of
/// its kind. Both views of a pair start at the ends that lie far apart, so the
/// two arcs are walked towards the end where they meet.
pub fn compute_pair(arcs: &ArcSet, key: PairKey, ns: usize) -> EllipseData {
    let (lo_class, hi_class) = key.kind.classes();
    let (Some(lo), Some(hi)) = (arcs.of(lo_class).get(key.lo), arcs.of(hi_class).get(key.hi)) else {
        return EllipseData::invalid();
    };
    let (e1, e2) = match key.kind {
        PairKind::P12 => (ArcView::forward(&hi.points), ArcView::reversed(&lo.points)),
        PairKind::P23 => (ArcView::reversed(&lo.points), ArcView::reversed(&hi.points)),
        PairKind::P34 => (ArcView::forward(&lo.points), ArcView::reversed(&hi.points)),
        PairKind::P14 => (ArcView::forward(&lo.points), ArcView::forward(&hi.points)),
    };
    fast_center(e1, e2, ns)
}
