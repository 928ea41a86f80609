//! Fan-out of axis-pair simulations.
//!
//! Pairs are independent: each worker owns its scales, dots, and spatial
//! index outright and only reads the shared item table. Workers report
//! back over a channel; rows are reassembled in configuration order so
//! output is stable no matter which pair finishes first.

use std::thread;

use tracing::info;

use crate::config::SimConfig;
use crate::data::table::ItemTable;
use crate::error::Result;
use crate::output::{rows_for_pair, OutputRow};
use crate::sim::level::{build_levels, AxisPair};
use crate::sim::scale::Scale;

pub fn run_all_pairs(table: &ItemTable, cfg: &SimConfig) -> Result<Vec<OutputRow>> {
    let pairs = cfg.axis_pairs();
    let (tx, rx) = crossbeam_channel::unbounded::<(usize, Result<Vec<OutputRow>>)>();

    thread::scope(|scope| {
        for (idx, pair) in pairs.iter().enumerate() {
            let tx = tx.clone();
            scope.spawn(move || {
                let result = run_pair(table, cfg, pair, idx);
                let _ = tx.send((idx, result));
            });
        }
        drop(tx);

        let mut per_pair: Vec<Option<Vec<OutputRow>>> = vec![None; pairs.len()];
        for (idx, result) in rx {
            per_pair[idx] = Some(result?);
        }
        let mut rows = Vec::new();
        for pair_rows in per_pair.into_iter().flatten() {
            rows.extend(pair_rows);
        }
        info!(pairs = pairs.len(), rows = rows.len(), "all pairs settled");
        Ok(rows)
    })
}

fn run_pair(
    table: &ItemTable,
    cfg: &SimConfig,
    pair: &AxisPair,
    pair_index: usize,
) -> Result<Vec<OutputRow>> {
    // An empty table has no extents to scale and nothing to place.
    if table.is_empty() {
        return Ok(Vec::new());
    }
    let target = cfg.target_range();

    let mut x_scale = field_scale(table, cfg, &pair.x)?;
    let mut y_scale = field_scale(table, cfg, &pair.y)?;
    x_scale.set_target_range(target);
    y_scale.set_target_range(target);

    // Offsetting the seed per pair keeps jitter independent across pairs
    // while the whole run stays reproducible.
    let mut policy = cfg.level_policy();
    policy.seed = policy.seed.wrapping_add(pair_index as u64);

    let levels = build_levels(table, pair, &x_scale, &y_scale, &policy)?;
    Ok(rows_for_pair(pair, &levels))
}

/// Field scale in source units; the caller assigns the target window.
fn field_scale(table: &ItemTable, cfg: &SimConfig, field: &str) -> Result<Scale> {
    let transform = cfg.transform_for(field);
    let source = cfg.source_range_for(field);
    Scale::for_field(table, field, transform, source, (0.0, 1.0))
}
