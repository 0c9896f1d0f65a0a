//! Triplet enumeration over the four class rotations.
//!
//! A rotation `(i, j, k)` takes an arc of class `i`, its counter-clockwise
//! neighbour class `j` and its clockwise neighbour class `k`. Position checks
//! between the shared end points prune most combinations before any pair
//! geometry is computed.
use crate::arcs::{Arc, ArcSet, QuadrantClass};
use crate::pairing::{compute_pair, ArcPairCache, EllipseData, PairKey, PairKind};

type PositionCheck = fn(&Arc, &Arc, f32) -> bool;
type KeyBuilder = fn(usize, usize) -> PairKey;

/// One class rotation with its pair keys and position constraints.
pub struct Rotation {
    pub classes: [QuadrantClass; 3],
    /// Key of the `(i, j)` pair from `(i_idx, j_idx)`.
    pub ij_key: KeyBuilder,
    /// Key of the `(i, k)` pair from `(i_idx, k_idx)`.
    pub ik_key: KeyBuilder,
    pub ij_ok: PositionCheck,
    pub ik_ok: PositionCheck,
}

pub const ROTATIONS: [Rotation; 4] = [
    Rotation {
        classes: [QuadrantClass::First, QuadrantClass::Second, QuadrantClass::Fourth],
        ij_key: |i, j| PairKey::new(PairKind::P12, i, j),
        ik_key: |i, k| PairKey::new(PairKind::P14, i, k),
        ij_ok: |i, j, th| (j.last()[0] as f32) <= i.first()[0] as f32 + th,
        ik_ok: |i, k, th| (k.last()[1] as f32) >= i.last()[1] as f32 - th,
    },
    Rotation {
        classes: [QuadrantClass::Second, QuadrantClass::Third, QuadrantClass::First],
        ij_key: |i, j| PairKey::new(PairKind::P23, i, j),
        ik_key: |i, k| PairKey::new(PairKind::P12, k, i),
        ij_ok: |i, j, th| (j.first()[1] as f32) >= i.first()[1] as f32 - th,
        ik_ok: |i, k, th| (k.first()[0] as f32) >= i.last()[0] as f32 - th,
    },
    Rotation {
        classes: [QuadrantClass::Third, QuadrantClass::Fourth, QuadrantClass::Second],
        ij_key: |i, j| PairKey::new(PairKind::P34, i, j),
        ik_key: |i, k| PairKey::new(PairKind::P23, k, i),
        ij_ok: |i, j, th| (j.first()[0] as f32) >= i.last()[0] as f32 - th,
        ik_ok: |i, k, th| (k.first()[1] as f32) <= i.first()[1] as f32 + th,
    },
    Rotation {
        classes: [QuadrantClass::Fourth, QuadrantClass::First, QuadrantClass::Third],
        ij_key: |i, j| PairKey::new(PairKind::P14, j, i),
        ik_key: |i, k| PairKey::new(PairKind::P34, k, i),
        ij_ok: |i, j, th| (j.last()[1] as f32) <= i.last()[1] as f32 + th,
        ik_ok: |i, k, th| (k.last()[0] as f32) <= i.first()[0] as f32 + th,
    },
];

/// Grouping knobs, resolved for the current image.
#[derive(Clone, Copy, Debug)]
pub struct GroupingParams {
    pub position_threshold: f32,
    /// Absolute center distance in pixels.
    pub max_center_distance: f32,
    pub ns: usize,
}

/// A triplet that passed every grouping check.
pub struct Triplet<'a> {
    pub arcs: [&'a Arc; 3],
    pub ij: &'a EllipseData,
    pub ik: &'a EllipseData,
}

/// Enumerate all surviving triplets, calling `visit` on each. Returns the
/// number of triplets visited.
pub fn for_each_triplet<F>(
    arcs: &ArcSet,
    cache: &mut ArcPairCache,
    params: &GroupingParams,
    mut visit: F,
) -> usize
where
    F: FnMut(&Triplet<'_>),
{
    let th = params.position_threshold;
    let max_d2 = params.max_center_distance * params.max_center_distance;
    let mut visited = 0;
    for rot in &ROTATIONS {
        let [ci, cj, ck] = rot.classes;
        for (ii, arc_i) in arcs.of(ci).iter().enumerate() {
            for (jj, arc_j) in arcs.of(cj).iter().enumerate() {
                if !(rot.ij_ok)(arc_i, arc_j, th) {
                    continue;
                }
                let key_ij = (rot.ij_key)(ii, jj);
                if !cache.ensure(key_ij, || compute_pair(arcs, key_ij, params.ns)) {
                    continue;
                }
                for (kk, arc_k) in arcs.of(ck).iter().enumerate() {
                    if !(rot.ik_ok)(arc_i, arc_k, th) {
                        continue;
                    }
                    let key_ik = (rot.ik_key)(ii, kk);
                    if !cache.ensure(key_ik, || compute_pair(arcs, key_ik, params.ns)) {
                        continue;
                    }
                    let (Some(ij), Some(ik)) = (cache.get(&key_ij), cache.get(&key_ik)) else {
                        continue;
                    };
                    let d = ij.center - ik.center;
                    if d.norm_squared() > max_d2 {
                        continue;
                    }
                    visited += 1;
                    visit(&Triplet {
                        arcs: [arc_i, arc_j, arc_k],
                        ij,
                        ik,
                    });
                }
            }
        }
    }
    visited
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arc(class: QuadrantClass, first: [i32; 2], last: [i32; 2]) -> Arc {
        Arc {
            class,
            points: vec![first, last],
        }
    }

    #[test]
    fn rotation_classes_are_consistent_with_keys() {
        for rot in &ROTATIONS {
            let ij = (rot.ij_key)(0, 1);
            let ik = (rot.ik_key)(0, 1);
            let (lo, hi) = ij.kind.classes();
            assert!(lo == rot.classes[0] || hi == rot.classes[0]);
            assert!(lo == rot.classes[1] || hi == rot.classes[1]);
            let (lo, hi) = ik.kind.classes();
            assert!(lo == rot.classes[0] || hi == rot.classes[0]);
            assert!(lo == rot.classes[2] || hi == rot.classes[2]);
        }
    }

    #[test]
    fn first_rotation_checks_shared_end_points() {
        // circle centred at (50, 50), r = 20
        let a1 = arc(QuadrantClass::First, [50, 30], [70, 50]);
        let a2 = arc(QuadrantClass::Second, [30, 50], [50, 30]);
        let a4 = arc(QuadrantClass::Fourth, [50, 70], [70, 50]);
        let rot = &ROTATIONS[0];
        assert!((rot.ij_ok)(&a1, &a2, 1.0));
        assert!((rot.ik_ok)(&a1, &a4, 1.0));

        // a class-2 arc lying entirely right of the class-1 arc
        let far = arc(QuadrantClass::Second, [80, 50], [90, 30]);
        assert!(!(rot.ij_ok)(&a1, &far, 1.0));
        // a class-4 arc that ends above the class-1 arc
        let high = arc(QuadrantClass::Fourth, [50, 20], [70, 10]);
        assert!(!(rot.ik_ok)(&a1, &high, 1.0));
    }

    #[test]
    fn empty_arc_set_visits_nothing() {
        let mut cache = ArcPairCache::new();
        let params = GroupingParams {
            position_threshold: 1.0,
            max_center_distance: 10.0,
            ns: 16,
        };
        let n = for_each_triplet(&ArcSet::default(), &mut cache, &params, |_| {});
        assert_eq!(n, 0);
        assert_eq!(cache.computations(), 0);
    }
}
