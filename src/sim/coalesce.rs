//! Merging of settled dots into the next zoom level.
//!
//! Groups grow breadth-first from each unvisited coalescable seed: every
//! dot intersecting the frontier dot's circle inflated by the grouping
//! bias joins. Growth is accepted batch-by-batch; a batch that would push
//! the group radius past the level budget is reverted, so an emitted
//! group never exceeds its budget. A final sweep absorbs stragglers that
//! ended up fully inside the group circle, then sparse or single-member
//! groups are rejected and their dots carried over unmerged.

use std::collections::VecDeque;

use tracing::debug;

use crate::sim::dot::{Dot, Vec2};
use crate::sim::grid::SpatialGrid;

#[derive(Debug, Clone, Copy)]
pub struct CoalesceParams {
    /// Distance past a dot's radius still counted as adjacent.
    pub grouping_bias: f64,
    /// Hard cap on the radius of any group emitted this level.
    pub max_radius: f64,
    /// Minimum packing density (member circle area over group circle
    /// area). Groups below it read as misleading mega-circles and are
    /// rejected.
    pub min_fullness: f64,
}

/// Builds the next level from one settled level. Ungrouped dots pass
/// through with identity, radius, position, anchor, and flag intact.
pub fn coalesce(dots: &[Dot], params: &CoalesceParams) -> Vec<Dot> {
    let grid = SpatialGrid::build(dots);
    let mut grouped = vec![false; dots.len()];
    let mut out = Vec::new();
    let mut hits = Vec::new();

    for seed in 0..dots.len() {
        if grouped[seed] || !dots[seed].coalescable() {
            continue;
        }
        let group = grow_group(dots, &grid, &grouped, seed, params, &mut hits);

        // A merge of one is no merge; sparse groups mislead more than they
        // declutter. Rejected members stay eligible for later seeds.
        if group.indices.len() < 2 || group.fullness(dots) < params.min_fullness {
            continue;
        }

        let mut members = Vec::new();
        for &idx in &group.indices {
            grouped[idx] = true;
            members.extend_from_slice(dots[idx].members());
        }
        out.push(Dot::merged(members, group.radius, group.centroid));
    }

    let merged_count = out.len();
    for (idx, dot) in dots.iter().enumerate() {
        if !grouped[idx] {
            let mut carried = dot.clone();
            carried.vel = Vec2::zeros();
            out.push(carried);
        }
    }
    debug!(
        merged = merged_count,
        carried = out.len() - merged_count,
        "coalesced level"
    );
    out
}

struct Group {
    indices: Vec<usize>,
    centroid: Vec2,
    radius: f64,
}

impl Group {
    /// Packing density: summed member circle area over the group circle
    /// area (the π factors cancel).
    fn fullness(&self, dots: &[Dot]) -> f64 {
        let member_area: f64 = self
            .indices
            .iter()
            .map(|&i| dots[i].radius().powi(2))
            .sum();
        member_area / self.radius.powi(2)
    }
}

fn grow_group(
    dots: &[Dot],
    grid: &SpatialGrid,
    grouped: &[bool],
    seed: usize,
    params: &CoalesceParams,
    hits: &mut Vec<usize>,
) -> Group {
    let mut indices = vec![seed];
    let mut in_group = vec![false; dots.len()];
    in_group[seed] = true;
    let mut frontier = VecDeque::from([seed]);
    let mut centroid = dots[seed].pos;
    let mut radius = dots[seed].radius();

    while let Some(current) = frontier.pop_front() {
        grid.query_circle(
            dots,
            dots[current].pos,
            dots[current].radius() + params.grouping_bias,
            hits,
        );
        let batch_start = indices.len();
        for &cand in hits.iter() {
            if grouped[cand] || in_group[cand] || !dots[cand].coalescable() {
                continue;
            }
            in_group[cand] = true;
            indices.push(cand);
            frontier.push_back(cand);
        }
        if indices.len() == batch_start {
            continue;
        }

        let (new_centroid, new_radius) = geometry(dots, &indices);
        if new_radius > params.max_radius {
            // Revert this batch; the last accepted state stays within
            // budget.
            for &added in &indices[batch_start..] {
                in_group[added] = false;
            }
            frontier.truncate(frontier.len() - (indices.len() - batch_start));
            indices.truncate(batch_start);
            break;
        }
        centroid = new_centroid;
        radius = new_radius;
    }

    // Closing sweep: ordering during growth can strand a dot that now sits
    // entirely inside the final circle.
    grid.query_circle(dots, centroid, radius, hits);
    for &cand in hits.iter() {
        if grouped[cand] || in_group[cand] || !dots[cand].coalescable() {
            continue;
        }
        let inside =
            (dots[cand].pos - centroid).norm() + dots[cand].radius() <= radius + 1e-9;
        if inside {
            in_group[cand] = true;
            indices.push(cand);
        }
    }

    Group {
        indices,
        centroid,
        radius,
    }
}

/// Group centroid (mean of participating dot centers, one vote per dot)
/// and enclosing radius.
fn geometry(dots: &[Dot], indices: &[usize]) -> (Vec2, f64) {
    let mut centroid = Vec2::zeros();
    for &i in indices {
        centroid += dots[i].pos;
    }
    centroid /= indices.len() as f64;
    let radius = indices
        .iter()
        .map(|&i| (dots[i].pos - centroid).norm() + dots[i].radius())
        .fold(0.0f64, f64::max);
    (centroid, radius)
}
