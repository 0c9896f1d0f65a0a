//! 8-connected component labelling of a binary edge map.
use super::types::Pixel;
use crate::image::EdgeMap;

const NEIGH_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Collect every 8-connected component with at least `min_len` pixels.
///
/// Components are emitted in raster order of their first pixel, so the output
/// is deterministic for a given map.
pub fn label_components(edges: &EdgeMap, min_len: usize) -> Vec<Vec<Pixel>> {
    let (w, h) = (edges.w, edges.h);
    let mut visited = vec![false; w * h];
    let mut stack = Vec::with_capacity(64);
    let mut components = Vec::new();

    for seed in 0..w * h {
        if visited[seed] || edges.data[seed] == 0 {
            continue;
        }
        visited[seed] = true;
        stack.push(seed);
        let mut points = Vec::new();
        while let Some(idx) = stack.pop() {
            let x = (idx % w) as isize;
            let y = (idx / w) as isize;
            points.push([x as i32, y as i32]);
            for (dx, dy) in NEIGH_OFFSETS {
                let nx = x + dx;
                let ny = y + dy;
                if nx < 0 || ny < 0 || nx >= w as isize || ny >= h as isize {
                    continue;
                }
                let nidx = ny as usize * w + nx as usize;
                if !visited[nidx] && edges.data[nidx] != 0 {
                    visited[nidx] = true;
                    stack.push(nidx);
                }
            }
        }
        if points.len() >= min_len {
            components.push(points);
        }
    }
    components
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagonal_pixels_are_connected_and_short_specks_dropped() {
        let mut map = EdgeMap::new(10, 10);
        for i in 0..6 {
            map.mark(i, i);
        }
        map.mark(9, 0);
        let comps = label_components(&map, 2);
        assert_eq!(comps.len(), 1);
        assert_eq!(comps[0].len(), 6);

        let all = label_components(&map, 1);
        assert_eq!(all.len(), 2);
    }
}
