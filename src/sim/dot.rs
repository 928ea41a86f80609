use nalgebra::Vector2;

pub type Vec2 = Vector2<f64>;

/// One simulation particle: a circle standing in for one or more source
/// items at a given zoom level. Membership, radius, and anchor are fixed at
/// creation; only position and velocity move during relaxation.
#[derive(Debug, Clone)]
pub struct Dot {
    members: Vec<usize>,
    radius: f64,
    anchor: Vec2,
    coalescable: bool,
    pub pos: Vec2,
    pub vel: Vec2,
}

impl Dot {
    /// Level-0 dot for a single item. Pinned items (`coalescable = false`)
    /// still collide and relax but never merge.
    pub fn single(item: usize, radius: f64, anchor: Vec2, coalescable: bool) -> Self {
        debug_assert!(radius > 0.0, "radius must be positive");
        Self {
            members: vec![item],
            radius,
            anchor,
            coalescable,
            pos: anchor,
            vel: Vec2::zeros(),
        }
    }

    /// Merged dot owning the union of its group's items. Starts at rest at
    /// the group centroid, which also becomes its anchor.
    pub fn merged(mut members: Vec<usize>, radius: f64, center: Vec2) -> Self {
        debug_assert!(!members.is_empty(), "merged dot needs members");
        debug_assert!(radius > 0.0, "radius must be positive");
        members.sort_unstable();
        Self {
            members,
            radius,
            anchor: center,
            coalescable: true,
            pos: center,
            vel: Vec2::zeros(),
        }
    }

    pub fn members(&self) -> &[usize] {
        &self.members
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn anchor(&self) -> Vec2 {
        self.anchor
    }

    pub fn coalescable(&self) -> bool {
        self.coalescable
    }

    pub fn intersects_circle(&self, center: Vec2, radius: f64) -> bool {
        (self.pos - center).norm() <= self.radius + radius
    }
}
