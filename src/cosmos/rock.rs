use super::{FloatRange, IntRange, Placement};
use crate::{Deactivator, PoolEntity, Prototype};
use core::f32::consts::TAU;
use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

const MIN_SEGMENTS: u32 = 3;
/// Most vertices a rock outline can have.
pub const MAX_SEGMENTS: u32 = 1024;

/// Template for rocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RockPrototype {
    /// Number of outline vertices to generate.
    pub segments: IntRange,
    /// Radius range used until a spawn request assigns one.
    pub radius: FloatRange,
    /// Survives context teardown.
    pub persistent: bool,
}

impl Default for RockPrototype {
    fn default() -> Self {
        RockPrototype {
            segments: IntRange::new(6, 10),
            radius: FloatRange::new(1.0, 1.5),
            persistent: false,
        }
    }
}

impl Prototype<Rock> for RockPrototype {
    fn instantiate(&self, deactivator: Deactivator) -> Rock {
        Rock {
            segments: self.segments,
            radius_range: self.radius,
            persistent: self.persistent,
            placement: Placement::default(),
            velocity: Vec2::ZERO,
            outline: Vec::with_capacity(self.segments.max.min(MAX_SEGMENTS) as usize),
            area: 0.0,
            outline_visible: false,
            deactivator,
        }
    }
}

/// A pooled rock with a randomly generated outline.
#[derive(Debug)]
pub struct Rock {
    segments: IntRange,
    radius_range: FloatRange,
    persistent: bool,
    placement: Placement,
    velocity: Vec2,
    outline: Vec<Vec2>,
    area: f32,
    outline_visible: bool,
    deactivator: Deactivator,
}

impl Rock {
    /// Rebuilds the outline: one vertex per angular sector, each at a
    /// distance drawn from the radius range.
    pub fn generate_random_rock<R: Rng>(&mut self, rng: &mut R) {
        let count = self.segments.sample(rng).clamp(MIN_SEGMENTS, MAX_SEGMENTS);
        let sector = TAU / count as f32;
        self.outline.clear();
        for i in 0..count {
            let start = i as f32 * sector;
            let end = start + sector;
            let angle = if end > start { rng.gen_range(start..end) } else { start };
            let radius = self.radius_range.sample(rng);
            self.outline.push(Vec2::new(angle.cos(), angle.sin()) * radius);
        }
        self.area = polygon_area(&self.outline);
    }

    /// Moves the rock along its velocity.
    pub fn tick(&mut self, dt: f32) {
        self.placement.position += self.velocity * dt;
    }

    /// Destroyed by an impact; the rock goes back to its pool on its next
    /// reclaim.
    pub fn shatter(&mut self) {
        self.deactivator.deactivate();
    }

    /// Current placement.
    pub fn placement(&self) -> Placement {
        self.placement
    }

    /// Current velocity.
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Sets the drift velocity.
    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    /// Radius range used by the next outline generation.
    pub fn radius_range(&self) -> FloatRange {
        self.radius_range
    }

    /// Sets the radius range used by the next outline generation.
    pub fn set_radius_range(&mut self, range: FloatRange) {
        self.radius_range = range;
    }

    /// Outline vertices relative to the rock's position.
    pub fn outline(&self) -> &[Vec2] {
        &self.outline
    }

    /// Area enclosed by the outline.
    pub fn area(&self) -> f32 {
        self.area
    }

    /// Whether the outline is drawn.
    pub fn outline_visible(&self) -> bool {
        self.outline_visible
    }
}

impl PoolEntity for Rock {
    type SpawnParams = Placement;

    fn on_object_creation(&mut self) {
        self.outline_visible = false;
    }

    fn place(&mut self, params: Placement) {
        self.placement = params;
    }

    fn on_object_reset(&mut self) {
        self.velocity = Vec2::ZERO;
        self.outline.clear();
        self.area = 0.0;
        self.outline_visible = true;
    }

    fn on_object_deactivation(&mut self) {
        self.outline_visible = false;
    }

    fn dont_destroy_on_load(&self) -> bool {
        self.persistent
    }
}

/// Shoelace area of a simple polygon.
fn polygon_area(points: &[Vec2]) -> f32 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let twice: f32 = (0..n)
        .map(|i| points[i].perp_dot(points[(i + 1) % n]))
        .sum();
    twice.abs() * 0.5
}
