//! Position relaxation.
//!
//! Each step damps velocity, pulls every dot toward its anchor with a
//! constant-magnitude impulse, integrates, then separates overlapping
//! circles along their center line with zero restitution. The anchor pull
//! is the only external force; it is what keeps clusters near their
//! data-true location instead of drifting under collision pressure.

use rand::Rng;
use tracing::warn;

use crate::sim::dot::{Dot, Vec2};
use crate::sim::grid::SpatialGrid;

#[derive(Debug, Clone, Copy)]
pub struct RelaxParams {
    pub steps: u32,
    pub dt: f64,
    /// Per-step velocity retention, `< 1`.
    pub damping: f64,
    /// Magnitude of the per-step anchor-seeking impulse.
    pub force: f64,
}

/// Displace starting positions by up to `amplitude` per axis so dots
/// sharing an anchor do not sit in perfect overlap. Anchors are left
/// untouched. The caller owns the seeded generator, so runs reproduce.
pub fn jitter<R: Rng + ?Sized>(dots: &mut [Dot], amplitude: f64, rng: &mut R) {
    if amplitude <= 0.0 {
        return;
    }
    for dot in dots.iter_mut() {
        let dx = rng.random_range(-amplitude..amplitude);
        let dy = rng.random_range(-amplitude..amplitude);
        dot.pos += Vec2::new(dx, dy);
    }
}

/// Run `params.steps` fixed steps over the population. With zero steps the
/// positions are left exactly as given.
pub fn relax(dots: &mut [Dot], params: &RelaxParams) {
    for _ in 0..params.steps {
        for dot in dots.iter_mut() {
            dot.vel *= params.damping;
            let to_anchor = dot.anchor() - dot.pos;
            let dist = to_anchor.norm();
            if dist > f64::EPSILON {
                dot.vel += to_anchor / dist * params.force;
            }
            dot.pos += dot.vel * params.dt;
        }
        // Guard before the grid build: an infinite coordinate would blow
        // up the cell range a query has to walk.
        guard_finite(dots);
        let grid = SpatialGrid::build(dots);
        separate_overlaps(dots, &grid);
    }
}

/// Push intersecting pairs apart along their center line. The correction is
/// split in inverse proportion to circle area, so large merged dots give
/// ground more slowly than the singles colliding with them. No restitution:
/// velocities are left alone.
fn separate_overlaps(dots: &mut [Dot], grid: &SpatialGrid) {
    let mut hits = Vec::new();
    for i in 0..dots.len() {
        grid.query_circle(dots, dots[i].pos, dots[i].radius(), &mut hits);
        for k in 0..hits.len() {
            let j = hits[k];
            if j <= i {
                continue;
            }
            let delta = dots[j].pos - dots[i].pos;
            let dist = delta.norm();
            let overlap = dots[i].radius() + dots[j].radius() - dist;
            if overlap <= 0.0 {
                continue;
            }
            let dir = if dist > f64::EPSILON {
                delta / dist
            } else {
                // Coincident centers: fixed separation axis keeps the
                // outcome independent of traversal order.
                Vec2::new(1.0, 0.0)
            };
            let (ai, aj) = (dots[i].radius().powi(2), dots[j].radius().powi(2));
            let total = ai + aj;
            dots[i].pos -= dir * (overlap * aj / total);
            dots[j].pos += dir * (overlap * ai / total);
        }
    }
}

/// Force/damping misconfiguration can diverge; clamp rather than let NaN
/// spread through the level.
fn guard_finite(dots: &mut [Dot]) {
    for (idx, dot) in dots.iter_mut().enumerate() {
        if !dot.vel.x.is_finite() || !dot.vel.y.is_finite() {
            warn!(idx, "non-finite velocity, zeroing");
            dot.vel = Vec2::zeros();
        }
        if !dot.pos.x.is_finite() || !dot.pos.y.is_finite() {
            warn!(idx, "non-finite position, snapping to anchor");
            dot.pos = dot.anchor();
        }
    }
}
