use super::{CosmosPools, OwnerId, ParticleEffectPrototype, ProjectilePrototype};
use crate::EntityHandle;
use glam::Vec2;

/// Which muzzles fire on each shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MuzzleShootType {
    /// Always the first muzzle.
    #[default]
    SingleMuzzle,
    /// Every muzzle at once, in order.
    FromAllMuzzles,
    /// One muzzle per shot, cycling through them.
    OneByOneMuzzle,
}

/// A point projectiles leave from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Muzzle {
    /// World position.
    pub position: Vec2,
    /// Firing direction.
    pub direction: Vec2,
}

/// Time that must pass between two shots.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Cooldown {
    duration: f32,
    remaining: f32,
}

impl Cooldown {
    /// Creates an inactive cooldown of `duration` seconds.
    pub fn new(duration: f32) -> Self {
        Cooldown {
            duration,
            remaining: 0.0,
        }
    }

    /// Returns `true` while shooting is blocked.
    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }

    /// Starts counting down from the full duration.
    pub fn start(&mut self) {
        self.remaining = self.duration;
    }

    /// Counts down by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        self.remaining = (self.remaining - dt).max(0.0);
    }
}

/// Fires pooled projectiles from a set of muzzles.
#[derive(Debug, Clone)]
pub struct ShootAbility {
    owner: OwnerId,
    projectile: Option<ProjectilePrototype>,
    muzzle_flash: Option<ParticleEffectPrototype>,
    shoot_type: MuzzleShootType,
    muzzles: Vec<Muzzle>,
    cooldown: Cooldown,
    projectile_tag: Option<String>,
    muzzle_index: usize,
}

impl ShootAbility {
    /// Creates an ability firing `projectile` on behalf of `owner`.
    pub fn new(owner: OwnerId, projectile: Option<ProjectilePrototype>, shoot_type: MuzzleShootType) -> Self {
        ShootAbility {
            owner,
            projectile,
            muzzle_flash: None,
            shoot_type,
            muzzles: Vec::new(),
            cooldown: Cooldown::default(),
            projectile_tag: None,
            muzzle_index: 0,
        }
    }

    /// Sets the muzzles, resetting the one-by-one cycle.
    pub fn with_muzzles(mut self, muzzles: Vec<Muzzle>) -> Self {
        self.muzzles = muzzles;
        self.muzzle_index = 0;
        self
    }

    /// Sets the particle effect spawned at a muzzle when it fires.
    pub fn with_muzzle_flash(mut self, effect: ParticleEffectPrototype) -> Self {
        self.muzzle_flash = Some(effect);
        self
    }

    /// Sets the cooldown between shots.
    pub fn with_cooldown(mut self, seconds: f32) -> Self {
        self.cooldown = Cooldown::new(seconds);
        self
    }

    /// Sets the tag given to every projectile fired.
    pub fn with_projectile_tag(mut self, tag: impl Into<String>) -> Self {
        self.projectile_tag = Some(tag.into());
        self
    }

    /// Mutable access to the muzzles, e.g. to follow the ship.
    pub fn muzzles_mut(&mut self) -> &mut [Muzzle] {
        &mut self.muzzles
    }

    /// Muzzle the next one-by-one shot leaves from.
    pub fn muzzle_index(&self) -> usize {
        self.muzzle_index
    }

    /// Current cooldown.
    pub fn cooldown(&self) -> &Cooldown {
        &self.cooldown
    }

    /// Counts the cooldown down.
    pub fn tick(&mut self, dt: f32) {
        self.cooldown.tick(dt);
    }

    /// Fires according to the shoot type.
    ///
    /// Returns `None` while cooling down. Otherwise returns one entry per
    /// muzzle that fired, in muzzle order; an entry is `None` when the pools
    /// could not provide a projectile.
    ///
    /// Firing starts the cooldown, even when the pools could not provide a
    /// projectile. An ability without muzzles fires nothing and never cools
    /// down.
    pub fn shoot(&mut self, pools: &mut CosmosPools) -> Option<Vec<Option<EntityHandle>>> {
        if self.cooldown.is_active() {
            return None;
        }
        if self.muzzles.is_empty() {
            return Some(Vec::new());
        }
        let fired = match self.shoot_type {
            MuzzleShootType::SingleMuzzle => 0..1,
            MuzzleShootType::FromAllMuzzles => 0..self.muzzles.len(),
            MuzzleShootType::OneByOneMuzzle => {
                let index = self.muzzle_index.min(self.muzzles.len() - 1);
                self.muzzle_index = (index + 1) % self.muzzles.len();
                index..index + 1
            }
        };
        let projectiles = fired.map(|i| self.fire(pools, self.muzzles[i])).collect();
        self.cooldown.start();
        Some(projectiles)
    }

    fn fire(&self, pools: &mut CosmosPools, muzzle: Muzzle) -> Option<EntityHandle> {
        let projectile = pools.request_projectile(
            self.projectile.as_ref(),
            muzzle.position,
            muzzle.direction,
            Some(self.owner),
            self.projectile_tag.as_deref(),
        );
        pools.request_particle_effect(self.muzzle_flash.as_ref(), muzzle.position, Vec2::ZERO);
        projectile
    }
}
