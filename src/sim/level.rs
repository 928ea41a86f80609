//! Per-axis-pair zoom level construction.
//!
//! Level 0 places one dot per item at its scaled coordinates. Every
//! subsequent level coalesces the previous one under a growing radius
//! budget and relaxes the result, down to the configured depth.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use crate::data::table::ItemTable;
use crate::data::value::FieldValue;
use crate::error::Result;
use crate::sim::coalesce::{coalesce, CoalesceParams};
use crate::sim::dot::{Dot, Vec2};
use crate::sim::relax::{jitter, relax, RelaxParams};
use crate::sim::scale::Scale;

/// One configured scatterplot: x field against y field. `pin_awarded`
/// keeps items matching the pin predicate visible at every zoom level.
#[derive(Debug, Clone)]
pub struct AxisPair {
    pub x: String,
    pub y: String,
    pub pin_awarded: bool,
}

/// Policy constants for one pipeline run, already resolved from config.
#[derive(Debug, Clone)]
pub struct LevelPolicy {
    pub zoom_levels: u32,
    pub base_radius: f64,
    pub relax: RelaxParams,
    pub grouping_bias: f64,
    /// Radius budget for level `n` is `radius_step * n`, capped.
    pub radius_step: f64,
    pub radius_cap: f64,
    pub min_fullness: f64,
    pub jitter: f64,
    pub seed: u64,
    /// Field whose positive values mark an item as pinned.
    pub pin_field: String,
}

impl LevelPolicy {
    fn budget(&self, level: u32) -> f64 {
        (self.radius_step * f64::from(level)).min(self.radius_cap)
    }
}

/// Builds all zoom levels for one axis pair. Level 0 of an empty table is
/// empty and no deeper levels are produced.
pub fn build_levels(
    table: &ItemTable,
    pair: &AxisPair,
    x_scale: &Scale,
    y_scale: &Scale,
    policy: &LevelPolicy,
) -> Result<Vec<Vec<Dot>>> {
    if table.is_empty() {
        return Ok(vec![Vec::new()]);
    }

    let mut level0 = Vec::with_capacity(table.len());
    for item in 0..table.len() {
        let x = x_scale.forward(table.value(&pair.x, item)?)?;
        let y = y_scale.forward(table.value(&pair.y, item)?)?;
        let coalescable = !(pair.pin_awarded && is_pinned(table, &policy.pin_field, item)?);
        level0.push(Dot::single(
            item,
            policy.base_radius,
            Vec2::new(x, y),
            coalescable,
        ));
    }

    let mut rng = StdRng::seed_from_u64(policy.seed);
    jitter(&mut level0, policy.jitter, &mut rng);
    relax(&mut level0, &policy.relax);
    info!(
        x = %pair.x,
        y = %pair.y,
        dots = level0.len(),
        "settled level 0"
    );

    let mut levels = vec![level0];
    for level in 1..policy.zoom_levels {
        let params = CoalesceParams {
            grouping_bias: policy.grouping_bias,
            max_radius: policy.budget(level),
            min_fullness: policy.min_fullness,
        };
        let mut next = coalesce(&levels[level as usize - 1], &params);
        relax(&mut next, &policy.relax);
        info!(x = %pair.x, y = %pair.y, level, dots = next.len(), "settled level");
        levels.push(next);
    }
    Ok(levels)
}

fn is_pinned(table: &ItemTable, field: &str, item: usize) -> Result<bool> {
    match table.value(field, item)? {
        FieldValue::Number(n) => Ok(*n > 0.0),
        _ => Ok(false),
    }
}
