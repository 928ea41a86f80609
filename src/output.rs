//! Marker table rows and the one-shot CSV flush.
//!
//! One row per dot per level per axis pair. The member list serializes
//! space-separated in ascending item order; the ordinal is unique within
//! its (level, axis pair) group.

use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::sim::dot::Dot;
use crate::sim::level::AxisPair;

#[derive(Debug, Clone, Serialize)]
pub struct OutputRow {
    pub level: u32,
    pub x_axis: String,
    pub y_axis: String,
    pub x: f64,
    pub y: f64,
    pub r: f64,
    pub members: String,
    pub ordinal: usize,
}

pub fn rows_for_pair(pair: &AxisPair, levels: &[Vec<Dot>]) -> Vec<OutputRow> {
    let mut rows = Vec::with_capacity(levels.iter().map(Vec::len).sum());
    for (level, dots) in levels.iter().enumerate() {
        for (ordinal, dot) in dots.iter().enumerate() {
            rows.push(OutputRow {
                level: level as u32,
                x_axis: pair.x.clone(),
                y_axis: pair.y.clone(),
                x: dot.pos.x,
                y: dot.pos.y,
                r: dot.radius(),
                members: member_list(dot.members()),
                ordinal,
            });
        }
    }
    rows
}

fn member_list(members: &[usize]) -> String {
    let mut out = String::new();
    for (i, member) in members.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&member.to_string());
    }
    out
}

pub fn write_rows<P: AsRef<Path>>(path: P, rows: &[OutputRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path.as_ref())?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    info!(rows = rows.len(), path = %path.as_ref().display(), "wrote marker table");
    Ok(())
}
