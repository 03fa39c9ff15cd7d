//! Pooled entities of the Cosmos asteroids shooter and the facade that
//! spawns them.

mod particle;
mod pool_text;
mod projectile;
mod rock;
mod shoot;
mod spawner;

pub use particle::*;
pub use pool_text::*;
pub use projectile::*;
pub use rock::*;
pub use shoot::*;
pub use spawner::*;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// World placement applied to every Cosmos entity when it is recycled.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Placement {
    /// World position.
    pub position: Vec2,
    /// Rotation around the view axis, in radians.
    pub rotation: f32,
}

impl Placement {
    /// Creates a placement.
    pub fn new(position: Vec2, rotation: f32) -> Self {
        Placement { position, rotation }
    }
}

/// Opaque reference to whatever spawned an entity, such as a ship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OwnerId(pub u64);

/// Rotation that points an entity's right axis along `direction`.
///
/// Zero-length directions map to the identity rotation.
pub fn right_look_rotation(direction: Vec2) -> f32 {
    if direction.length_squared() > 0.0 {
        direction.y.atan2(direction.x)
    } else {
        0.0
    }
}

/// Inclusive range of floats.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FloatRange {
    /// Lower bound.
    pub min: f32,
    /// Upper bound.
    pub max: f32,
}

impl FloatRange {
    /// Creates a range, swapping the bounds if needed.
    pub fn new(a: f32, b: f32) -> Self {
        FloatRange {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Picks a value inside the range.
    ///
    /// Returns `min` when the range is empty or its width is not finite.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> f32 {
        if self.max > self.min && (self.max - self.min).is_finite() {
            rng.gen_range(self.min..=self.max)
        } else {
            self.min
        }
    }

    /// Returns `true` if `value` lies inside the range.
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

impl Default for FloatRange {
    fn default() -> Self {
        FloatRange { min: 1.0, max: 1.0 }
    }
}

/// Inclusive range of integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntRange {
    /// Lower bound.
    pub min: u32,
    /// Upper bound.
    pub max: u32,
}

impl IntRange {
    /// Creates a range, swapping the bounds if needed.
    pub fn new(a: u32, b: u32) -> Self {
        IntRange {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Picks a value inside the range.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> u32 {
        if self.max > self.min {
            rng.gen_range(self.min..=self.max)
        } else {
            self.min
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use core::f32::consts::FRAC_PI_2;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn look_rotation_follows_direction() {
        assert_relative_eq!(right_look_rotation(Vec2::X), 0.0);
        assert_relative_eq!(right_look_rotation(Vec2::new(0.0, 3.0)), FRAC_PI_2);
        assert_relative_eq!(right_look_rotation(Vec2::ZERO), 0.0);
    }

    #[test]
    fn ranges_sample_inside_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let floats = FloatRange::new(3.0, 1.0);
        let ints = IntRange::new(5, 8);
        for _ in 0..100 {
            assert!(floats.contains(floats.sample(&mut rng)));
            assert!((5..=8).contains(&ints.sample(&mut rng)));
        }
        assert_eq!(FloatRange::new(2.0, 2.0).sample(&mut rng), 2.0);
    }

    #[test]
    fn unbounded_float_range_samples_min() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(FloatRange::new(1.0, f32::INFINITY).sample(&mut rng), 1.0);
        assert_eq!(FloatRange::new(-f32::MAX, f32::MAX).sample(&mut rng), -f32::MAX);
        let nan = FloatRange { min: 0.5, max: f32::NAN };
        assert_eq!(nan.sample(&mut rng), 0.5);
    }
}
