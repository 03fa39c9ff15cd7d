use super::{
    right_look_rotation, FloatRange, OwnerId, ParticleEffect, ParticleEffectPrototype, Placement,
    PoolText, PoolTextPrototype, Projectile, ProjectilePrototype, Rock, RockPrototype, WHITE,
};
use crate::config::CosmosPoolsConfig;
use crate::{EntityHandle, GrowthPolicy, ObjectPool, PoolEntity, PoolRegistry, Prototype};
use glam::Vec2;
use log::{debug, info, warn};
use rand::{rngs::StdRng, SeedableRng};

/// Registry of projectile pools, keyed by prototype name.
pub type ProjectilePools = PoolRegistry<String, ProjectilePrototype, Projectile>;
/// Registry of particle effect pools, keyed by prototype name.
pub type ParticleEffectPools = PoolRegistry<String, ParticleEffectPrototype, ParticleEffect>;

/// Entry point turning Cosmos spawn requests into recycled, configured
/// entities.
///
/// Built once when a game session starts and handed by reference to the
/// systems that spawn things. Every request returns `None` instead of
/// failing when the prototype it needs was never configured.
#[derive(Debug)]
pub struct CosmosPools {
    projectiles: ProjectilePools,
    particle_effects: ParticleEffectPools,
    rocks: Option<ObjectPool<RockPrototype, Rock>>,
    pool_texts: Option<ObjectPool<PoolTextPrototype, PoolText>>,
    default_projectile: Option<String>,
    rng: StdRng,
}

impl CosmosPools {
    /// Builds every pool described by `config`, each prefilled with
    /// `config.initial_count` entities.
    pub fn from_config(config: &CosmosPoolsConfig) -> Self {
        let count = config.initial_count;
        let policy = config.growth;
        let projectiles: ProjectilePools = PoolRegistry::populated_with_policy(
            count,
            policy,
            config.projectiles.iter().map(|p| (p.name.clone(), p.clone())),
        );
        let particle_effects: ParticleEffectPools = PoolRegistry::populated_with_policy(
            count,
            policy,
            config
                .particle_effects
                .iter()
                .map(|p| (p.name.clone(), p.clone())),
        );
        let rocks: Option<ObjectPool<RockPrototype, Rock>> =
            config.rock.clone().map(|p| prefilled(count, policy, p));
        if rocks.is_none() {
            warn!("no rock prototype configured, rock requests will be skipped");
        }
        let pool_texts: Option<ObjectPool<PoolTextPrototype, PoolText>> =
            config.pool_text.clone().map(|p| prefilled(count, policy, p));
        if pool_texts.is_none() {
            warn!("no pool text prototype configured, text requests will be skipped");
        }
        if let Some(name) = &config.default_projectile {
            if !projectiles.contains(name) {
                warn!("default projectile {name:?} has no prototype, default requests will be skipped");
            }
        }
        info!(
            "cosmos pools ready: {} projectile pools, {} particle effect pools",
            projectiles.len(),
            particle_effects.len()
        );
        CosmosPools {
            projectiles,
            particle_effects,
            rocks,
            pool_texts,
            default_projectile: config.default_projectile.clone(),
            rng: StdRng::seed_from_u64(config.seed),
        }
    }

    /// Spawns a projectile of `prototype` at `position`, flying along
    /// `direction`.
    ///
    /// `shooter` is recorded on the projectile and a non-empty `tag`
    /// replaces its classification tag. Returns `None` when `prototype` is
    /// `None` or has no pool.
    pub fn request_projectile(
        &mut self,
        prototype: Option<&ProjectilePrototype>,
        position: Vec2,
        direction: Vec2,
        shooter: Option<OwnerId>,
        tag: Option<&str>,
    ) -> Option<EntityHandle> {
        let prototype = prototype?;
        self.spawn_projectile(&prototype.name, position, direction, shooter, tag)
    }

    /// Same as [`Self::request_projectile`], using the configured default
    /// projectile prototype.
    pub fn request_default_projectile(
        &mut self,
        position: Vec2,
        direction: Vec2,
        shooter: Option<OwnerId>,
        tag: Option<&str>,
    ) -> Option<EntityHandle> {
        let name = self.default_projectile.clone()?;
        self.spawn_projectile(&name, position, direction, shooter, tag)
    }

    fn spawn_projectile(
        &mut self,
        name: &str,
        position: Vec2,
        direction: Vec2,
        shooter: Option<OwnerId>,
        tag: Option<&str>,
    ) -> Option<EntityHandle> {
        let Some(pool) = self.projectiles.try_get_mut(name) else {
            debug!("projectile request skipped: no pool for {name:?}");
            return None;
        };
        let placement = Placement::new(position, right_look_rotation(direction));
        let handle = pool.recycle(placement).ok()?;
        let projectile = pool.get_mut(handle)?;
        projectile.launch(direction);
        projectile.set_shooter(shooter);
        if let Some(tag) = tag.filter(|t| !t.is_empty()) {
            projectile.set_tag(tag);
        }
        Some(handle)
    }

    /// Spawns a rock with a fresh outline whose vertices lie within
    /// `radius_range`.
    pub fn request_rock(
        &mut self,
        position: Vec2,
        rotation: f32,
        radius_range: FloatRange,
    ) -> Option<EntityHandle> {
        let pool = self.rocks.as_mut()?;
        let handle = pool.recycle(Placement::new(position, rotation)).ok()?;
        let rock = pool.get_mut(handle)?;
        rock.set_radius_range(radius_range);
        rock.generate_random_rock(&mut self.rng);
        Some(handle)
    }

    /// Spawns a particle effect of `prototype` at `position`, facing
    /// `direction` when it is not zero.
    pub fn request_particle_effect(
        &mut self,
        prototype: Option<&ParticleEffectPrototype>,
        position: Vec2,
        direction: Vec2,
    ) -> Option<EntityHandle> {
        let prototype = prototype?;
        let placement = Placement::new(position, right_look_rotation(direction));
        let handle = self.particle_effects.recycle(&prototype.name, placement);
        if handle.is_none() {
            debug!("particle effect request skipped for {:?}", prototype.name);
        }
        handle
    }

    /// Spawns a floating white text at an already converted screen position.
    pub fn request_pool_text(&mut self, screen_position: Vec2, text: &str) -> Option<EntityHandle> {
        let pool = self.pool_texts.as_mut()?;
        let handle = pool.recycle(screen_position).ok()?;
        let pool_text = pool.get_mut(handle)?;
        pool_text.set_text(text);
        pool_text.set_color(WHITE);
        Some(handle)
    }

    /// Advances every active entity by `dt` seconds, then returns the ones
    /// whose life ended to their pools.
    pub fn tick(&mut self, dt: f32) {
        for pool in self.projectiles.pools_mut() {
            pool.iter_active_mut().for_each(|(_, p)| p.tick(dt));
        }
        for pool in self.particle_effects.pools_mut() {
            pool.iter_active_mut().for_each(|(_, e)| e.tick(dt));
        }
        if let Some(pool) = &mut self.rocks {
            pool.iter_active_mut().for_each(|(_, r)| r.tick(dt));
        }
        if let Some(pool) = &mut self.pool_texts {
            pool.iter_active_mut().for_each(|(_, t)| t.tick(dt));
        }
        self.reclaim();
    }

    /// Applies every pending self-deactivation.
    pub fn reclaim(&mut self) -> usize {
        self.projectiles.reclaim_all()
            + self.particle_effects.reclaim_all()
            + self.rocks.as_mut().map_or(0, ObjectPool::reclaim)
            + self.pool_texts.as_mut().map_or(0, ObjectPool::reclaim)
    }

    /// Returns every non-persistent entity to its pool, as when the current
    /// scene unloads.
    pub fn unload_context(&mut self) -> usize {
        let released = self.projectiles.teardown_context()
            + self.particle_effects.teardown_context()
            + self.rocks.as_mut().map_or(0, ObjectPool::teardown_context)
            + self.pool_texts.as_mut().map_or(0, ObjectPool::teardown_context);
        info!("context unloaded, {released} pooled entities released");
        released
    }

    /// Resolves a projectile handle.
    pub fn projectile(&self, handle: EntityHandle) -> Option<&Projectile> {
        self.projectiles.entity(handle)
    }

    /// Mutably resolves a projectile handle.
    ///
    /// Pending self-deactivations are applied first, so a projectile that
    /// asked to be deactivated resolves to `None`.
    pub fn projectile_mut(&mut self, handle: EntityHandle) -> Option<&mut Projectile> {
        self.projectiles.reclaim_all();
        self.projectiles.entity_mut(handle)
    }

    /// Resolves a rock handle.
    pub fn rock(&self, handle: EntityHandle) -> Option<&Rock> {
        self.rocks.as_ref()?.get(handle)
    }

    /// Mutably resolves a rock handle, after applying pending
    /// self-deactivations.
    pub fn rock_mut(&mut self, handle: EntityHandle) -> Option<&mut Rock> {
        let rocks = self.rocks.as_mut()?;
        rocks.reclaim();
        rocks.get_mut(handle)
    }

    /// Resolves a particle effect handle.
    pub fn particle_effect(&self, handle: EntityHandle) -> Option<&ParticleEffect> {
        self.particle_effects.entity(handle)
    }

    /// Resolves a pool text handle.
    pub fn pool_text(&self, handle: EntityHandle) -> Option<&PoolText> {
        self.pool_texts.as_ref()?.get(handle)
    }

    /// Projectile pools.
    pub fn projectiles(&self) -> &ProjectilePools {
        &self.projectiles
    }

    /// Particle effect pools.
    pub fn particle_effects(&self) -> &ParticleEffectPools {
        &self.particle_effects
    }

    /// Rock pool, if a rock prototype was configured.
    pub fn rocks(&self) -> Option<&ObjectPool<RockPrototype, Rock>> {
        self.rocks.as_ref()
    }

    /// Floating text pool, if a text prototype was configured.
    pub fn pool_texts(&self) -> Option<&ObjectPool<PoolTextPrototype, PoolText>> {
        self.pool_texts.as_ref()
    }
}

fn prefilled<P, T>(count: usize, policy: GrowthPolicy, prototype: P) -> ObjectPool<P, T>
where
    P: Prototype<T>,
    T: PoolEntity,
{
    let mut pool = ObjectPool::with_policy(prototype, policy);
    pool.prefill(count);
    pool
}
