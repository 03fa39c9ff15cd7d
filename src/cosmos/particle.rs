use super::Placement;
use crate::{Deactivator, PoolEntity, Prototype};
use serde::{Deserialize, Serialize};

/// Template for a one-shot particle effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleEffectPrototype {
    /// Unique name, used as the pool key.
    pub name: String,
    /// Seconds the effect plays before returning to its pool.
    pub duration: f32,
    /// Survives context teardown.
    pub persistent: bool,
}

impl Default for ParticleEffectPrototype {
    fn default() -> Self {
        ParticleEffectPrototype {
            name: String::from("particle-effect"),
            duration: 0.5,
            persistent: false,
        }
    }
}

impl Prototype<ParticleEffect> for ParticleEffectPrototype {
    fn instantiate(&self, deactivator: Deactivator) -> ParticleEffect {
        ParticleEffect {
            prototype: self.name.clone(),
            duration: self.duration,
            persistent: self.persistent,
            placement: Placement::default(),
            elapsed: 0.0,
            deactivator,
        }
    }
}

/// A pooled particle effect.
#[derive(Debug)]
pub struct ParticleEffect {
    prototype: String,
    duration: f32,
    persistent: bool,
    placement: Placement,
    elapsed: f32,
    deactivator: Deactivator,
}

impl ParticleEffect {
    /// Advances playback, asking to be deactivated once it has finished.
    pub fn tick(&mut self, dt: f32) {
        self.elapsed += dt;
        if self.elapsed >= self.duration {
            self.deactivator.deactivate();
        }
    }

    /// Name of the prototype this effect was built from.
    pub fn prototype(&self) -> &str {
        &self.prototype
    }

    /// Current placement.
    pub fn placement(&self) -> Placement {
        self.placement
    }

    /// Seconds played so far.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

impl PoolEntity for ParticleEffect {
    type SpawnParams = Placement;

    fn place(&mut self, params: Placement) {
        self.placement = params;
    }

    fn on_object_reset(&mut self) {
        self.elapsed = 0.0;
    }

    fn dont_destroy_on_load(&self) -> bool {
        self.persistent
    }
}
