use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::sim::level::{AxisPair, LevelPolicy};
use crate::sim::relax::RelaxParams;
use crate::sim::scale::Transform;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelaxConfig {
    #[serde(default = "RelaxConfig::default_steps")]
    pub steps: u32,
    #[serde(default = "RelaxConfig::default_dt")]
    pub dt: f64,
    #[serde(default = "RelaxConfig::default_damping")]
    pub damping: f64,
    #[serde(default = "RelaxConfig::default_force")]
    pub force: f64,
    #[serde(default = "RelaxConfig::default_jitter")]
    pub jitter: f64,
}

impl RelaxConfig {
    fn default_steps() -> u32 {
        20
    }
    fn default_dt() -> f64 {
        0.1
    }
    fn default_damping() -> f64 {
        0.01
    }
    fn default_force() -> f64 {
        0.1
    }
    fn default_jitter() -> f64 {
        0.001
    }
}

impl Default for RelaxConfig {
    fn default() -> Self {
        Self {
            steps: Self::default_steps(),
            dt: Self::default_dt(),
            damping: Self::default_damping(),
            force: Self::default_force(),
            jitter: Self::default_jitter(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoalesceConfig {
    #[serde(default = "CoalesceConfig::default_grouping_bias")]
    pub grouping_bias: f64,
    /// Per-level radius budget multiplier: level `n` may grow groups up to
    /// `radius_step * n`.
    #[serde(default = "CoalesceConfig::default_radius_step")]
    pub radius_step: f64,
    #[serde(default = "CoalesceConfig::default_radius_cap")]
    pub radius_cap: f64,
    #[serde(default = "CoalesceConfig::default_min_fullness")]
    pub min_fullness: f64,
}

impl CoalesceConfig {
    fn default_grouping_bias() -> f64 {
        0.1
    }
    fn default_radius_step() -> f64 {
        25.0
    }
    fn default_radius_cap() -> f64 {
        100.0
    }
    fn default_min_fullness() -> f64 {
        0.1
    }
}

impl Default for CoalesceConfig {
    fn default() -> Self {
        Self {
            grouping_bias: Self::default_grouping_bias(),
            radius_step: Self::default_radius_step(),
            radius_cap: Self::default_radius_cap(),
            min_fullness: Self::default_min_fullness(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairConfig {
    pub x: String,
    pub y: String,
    /// Keep award-nominated items individually visible on this pair.
    #[serde(default)]
    pub pin_awarded: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    #[serde(default = "SimConfig::default_zoom_levels")]
    pub zoom_levels: u32,
    /// Half-extent of the square simulation window; coordinates land in
    /// `[-sim_extent, sim_extent]` on both axes.
    #[serde(default = "SimConfig::default_sim_extent")]
    pub sim_extent: f64,
    #[serde(default = "SimConfig::default_base_radius")]
    pub base_radius: f64,
    #[serde(default = "SimConfig::default_seed")]
    pub seed: u64,
    #[serde(default = "SimConfig::default_pin_field")]
    pub pin_field: String,
    #[serde(default)]
    pub relax: RelaxConfig,
    #[serde(default)]
    pub coalesce: CoalesceConfig,
    #[serde(default = "SimConfig::default_pairs")]
    pub pairs: Vec<PairConfig>,
    /// Pre-transforms by field; unlisted fields scale linearly.
    #[serde(default = "SimConfig::default_transforms")]
    pub transforms: HashMap<String, Transform>,
    /// Pinned source ranges by field (scores and ratings use nominal
    /// ranges); unlisted fields take their range from the data extent.
    #[serde(default = "SimConfig::default_source_ranges")]
    pub source_ranges: HashMap<String, [f64; 2]>,
}

impl SimConfig {
    fn default_zoom_levels() -> u32 {
        5
    }
    fn default_sim_extent() -> f64 {
        1000.0
    }
    fn default_base_radius() -> f64 {
        1.0
    }
    fn default_seed() -> u64 {
        42
    }
    fn default_pin_field() -> String {
        "nominations".to_string()
    }

    fn default_pairs() -> Vec<PairConfig> {
        const Y_AXES: [&str; 6] = [
            "budget",
            "gross",
            "score",
            "nominations",
            "tomatometer_rating",
            "audience_rating",
        ];
        Y_AXES
            .iter()
            .map(|y| PairConfig {
                x: "released".to_string(),
                y: (*y).to_string(),
                pin_awarded: false,
            })
            .collect()
    }

    fn default_transforms() -> HashMap<String, Transform> {
        HashMap::from([("released".to_string(), Transform::DateDays)])
    }

    fn default_source_ranges() -> HashMap<String, [f64; 2]> {
        HashMap::from([
            ("score".to_string(), [0.0, 10.0]),
            ("tomatometer_rating".to_string(), [0.0, 100.0]),
            ("audience_rating".to_string(), [0.0, 100.0]),
        ])
    }

    pub fn target_range(&self) -> (f64, f64) {
        (-self.sim_extent, self.sim_extent)
    }

    pub fn transform_for(&self, field: &str) -> Transform {
        self.transforms.get(field).copied().unwrap_or_default()
    }

    pub fn source_range_for(&self, field: &str) -> Option<(f64, f64)> {
        self.source_ranges.get(field).map(|r| (r[0], r[1]))
    }

    pub fn axis_pairs(&self) -> Vec<AxisPair> {
        self.pairs
            .iter()
            .map(|p| AxisPair {
                x: p.x.clone(),
                y: p.y.clone(),
                pin_awarded: p.pin_awarded,
            })
            .collect()
    }

    pub fn level_policy(&self) -> LevelPolicy {
        LevelPolicy {
            zoom_levels: self.zoom_levels,
            base_radius: self.base_radius,
            relax: RelaxParams {
                steps: self.relax.steps,
                dt: self.relax.dt,
                damping: self.relax.damping,
                force: self.relax.force,
            },
            grouping_bias: self.coalesce.grouping_bias,
            radius_step: self.coalesce.radius_step,
            radius_cap: self.coalesce.radius_cap,
            min_fullness: self.coalesce.min_fullness,
            jitter: self.relax.jitter,
            seed: self.seed,
            pin_field: self.pin_field.clone(),
        }
    }

    /// Read the config at `path`, falling back to defaults on a missing or
    /// unparseable file. A missing file is written out with the defaults so
    /// the knobs are discoverable.
    pub fn load_or_default(path: &str) -> Self {
        let path_obj = Path::new(path);
        if path_obj.exists() {
            match fs::read_to_string(path_obj) {
                Ok(contents) => match toml::from_str(&contents) {
                    Ok(cfg) => return cfg,
                    Err(err) => {
                        warn!("failed to parse config {path}: {err}; using defaults");
                    }
                },
                Err(err) => {
                    warn!("failed to read config {path}: {err}; using defaults");
                }
            }
            return Self::default();
        }

        let default_cfg = Self::default();
        match toml::to_string_pretty(&default_cfg) {
            Ok(text) => {
                if let Err(err) = fs::write(path_obj, text) {
                    warn!("failed to write default config to {path}: {err}");
                }
            }
            Err(err) => warn!("failed to serialize default config: {err}"),
        }
        default_cfg
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            zoom_levels: Self::default_zoom_levels(),
            sim_extent: Self::default_sim_extent(),
            base_radius: Self::default_base_radius(),
            seed: Self::default_seed(),
            pin_field: Self::default_pin_field(),
            relax: RelaxConfig::default(),
            coalesce: CoalesceConfig::default(),
            pairs: Self::default_pairs(),
            transforms: Self::default_transforms(),
            source_ranges: Self::default_source_ranges(),
        }
    }
}
