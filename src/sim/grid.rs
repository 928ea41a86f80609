//! Uniform spatial hash over dot centers.
//!
//! Cells are keyed by integer coordinates at a cell size on the order of
//! the largest dot radius, so a circle query only has to visit the cell
//! neighborhood covering the query circle inflated by that largest radius.
//! Dots move every relaxation step, so the grid is rebuilt per step rather
//! than updated incrementally.

use std::collections::HashMap;

use crate::sim::dot::{Dot, Vec2};

pub struct SpatialGrid {
    cell: f64,
    max_radius: f64,
    cells: HashMap<(i64, i64), Vec<usize>>,
}

impl SpatialGrid {
    pub fn build(dots: &[Dot]) -> Self {
        let max_radius = dots
            .iter()
            .map(Dot::radius)
            .fold(0.0f64, f64::max);
        // Cell size tracks the largest radius; the floor keeps keys finite
        // for empty or degenerate populations.
        let cell = max_radius.max(1e-3);
        let mut cells: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
        for (idx, dot) in dots.iter().enumerate() {
            cells.entry(Self::key(cell, dot.pos)).or_default().push(idx);
        }
        Self {
            cell,
            max_radius,
            cells,
        }
    }

    fn key(cell: f64, p: Vec2) -> (i64, i64) {
        ((p.x / cell).floor() as i64, (p.y / cell).floor() as i64)
    }

    /// Indices of every dot whose circle intersects the query circle,
    /// including the querying dot itself when it matches. Results come
    /// back in ascending index order so callers traverse reproducibly.
    pub fn query_circle(&self, dots: &[Dot], center: Vec2, radius: f64, out: &mut Vec<usize>) {
        out.clear();
        if self.cells.is_empty() {
            return;
        }
        // Any intersecting dot center lies within radius + max_radius.
        let reach = radius + self.max_radius;
        let lo = Self::key(self.cell, Vec2::new(center.x - reach, center.y - reach));
        let hi = Self::key(self.cell, Vec2::new(center.x + reach, center.y + reach));
        for cx in lo.0..=hi.0 {
            for cy in lo.1..=hi.1 {
                let Some(bucket) = self.cells.get(&(cx, cy)) else {
                    continue;
                };
                for &idx in bucket {
                    if dots[idx].intersects_circle(center, radius) {
                        out.push(idx);
                    }
                }
            }
        }
        out.sort_unstable();
    }
}
