use super::{OwnerId, Placement};
use crate::{Deactivator, PoolEntity, Prototype};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Template for a kind of projectile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectilePrototype {
    /// Unique name, used as the pool key.
    pub name: String,
    /// Travel speed in units per second.
    pub speed: f32,
    /// Seconds before the projectile expires.
    pub lifespan: f32,
    /// Survives context teardown.
    pub persistent: bool,
}

impl Default for ProjectilePrototype {
    fn default() -> Self {
        ProjectilePrototype {
            name: String::from("projectile"),
            speed: 10.0,
            lifespan: 1.0,
            persistent: false,
        }
    }
}

impl Prototype<Projectile> for ProjectilePrototype {
    fn instantiate(&self, deactivator: Deactivator) -> Projectile {
        Projectile {
            prototype: self.name.clone(),
            speed: self.speed,
            lifespan: self.lifespan,
            persistent: self.persistent,
            placement: Placement::default(),
            velocity: Vec2::ZERO,
            time: 0.0,
            shooter: None,
            tag: None,
            deactivator,
        }
    }
}

/// A pooled projectile.
#[derive(Debug)]
pub struct Projectile {
    prototype: String,
    speed: f32,
    lifespan: f32,
    persistent: bool,
    placement: Placement,
    velocity: Vec2,
    time: f32,
    shooter: Option<OwnerId>,
    tag: Option<String>,
    deactivator: Deactivator,
}

impl Projectile {
    /// Sends the projectile along `direction` at its prototype's speed.
    pub fn launch(&mut self, direction: Vec2) {
        self.velocity = direction.normalize_or_zero() * self.speed;
    }

    /// Moves the projectile and advances its lifespan timer.
    ///
    /// The projectile asks to be deactivated on the first tick that finds
    /// its timer at or past the lifespan.
    pub fn tick(&mut self, dt: f32) {
        self.placement.position += self.velocity * dt;
        if self.time >= self.lifespan {
            self.deactivator.deactivate();
        } else {
            self.time += dt;
        }
    }

    /// Hit something; the projectile is spent.
    ///
    /// The pool applies the request on its next reclaim. Until then the
    /// projectile still counts as active in its pool.
    pub fn on_impact(&mut self) {
        self.deactivator.deactivate();
    }

    /// Name of the prototype this projectile was built from.
    pub fn prototype(&self) -> &str {
        &self.prototype
    }

    /// Current placement.
    pub fn placement(&self) -> Placement {
        self.placement
    }

    /// Current velocity.
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Seconds lived so far.
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Seconds the projectile lives.
    pub fn lifespan(&self) -> f32 {
        self.lifespan
    }

    /// Who fired the projectile.
    pub fn shooter(&self) -> Option<OwnerId> {
        self.shooter
    }

    /// Sets who fired the projectile.
    pub fn set_shooter(&mut self, shooter: Option<OwnerId>) {
        self.shooter = shooter;
    }

    /// Classification tag, used by impact filters.
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Sets the classification tag.
    pub fn set_tag(&mut self, tag: impl Into<String>) {
        self.tag = Some(tag.into());
    }
}

impl PoolEntity for Projectile {
    type SpawnParams = Placement;

    fn place(&mut self, params: Placement) {
        self.placement = params;
    }

    fn on_object_reset(&mut self) {
        self.time = 0.0;
        self.velocity = Vec2::ZERO;
        self.shooter = None;
        self.tag = None;
    }

    fn dont_destroy_on_load(&self) -> bool {
        self.persistent
    }
}
