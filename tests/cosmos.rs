use cosmos_pool::config::CosmosPoolsConfig;
use cosmos_pool::cosmos::*;
use glam::{Vec2, Vec4};

fn laser() -> ProjectilePrototype {
    ProjectilePrototype {
        name: "laser".into(),
        speed: 10.0,
        lifespan: 1.0,
        persistent: false,
    }
}

fn mine() -> ProjectilePrototype {
    ProjectilePrototype {
        name: "mine".into(),
        speed: 0.0,
        lifespan: 30.0,
        persistent: true,
    }
}

fn flash() -> ParticleEffectPrototype {
    ParticleEffectPrototype {
        name: "flash".into(),
        duration: 0.5,
        persistent: false,
    }
}

fn config() -> CosmosPoolsConfig {
    CosmosPoolsConfig {
        initial_count: 1,
        seed: 11,
        default_projectile: Some("laser".into()),
        projectiles: vec![laser(), mine()],
        particle_effects: vec![flash()],
        rock: Some(RockPrototype {
            segments: IntRange::new(5, 8),
            ..RockPrototype::default()
        }),
        pool_text: Some(PoolTextPrototype {
            lifespan: 1.0,
            persistent: false,
        }),
        ..CosmosPoolsConfig::default()
    }
}

fn pools() -> CosmosPools {
    let _ = env_logger::builder().is_test(true).try_init();
    CosmosPools::from_config(&config())
}

#[test]
fn test_missing_prototype_spawns_nothing() {
    let mut pools = pools();
    assert!(pools
        .request_projectile(None, Vec2::ZERO, Vec2::X, None, None)
        .is_none());
    assert!(pools.request_particle_effect(None, Vec2::ZERO, Vec2::X).is_none());
    let pool = pools.projectiles().try_get("laser").unwrap();
    assert_eq!(pool.active_count(), 0);
    assert_eq!(pool.len(), 1);
}

#[test]
fn test_unknown_prototype_spawns_nothing() {
    let mut pools = pools();
    let rogue = ProjectilePrototype {
        name: "rogue".into(),
        ..laser()
    };
    assert!(pools
        .request_projectile(Some(&rogue), Vec2::ZERO, Vec2::X, None, None)
        .is_none());
    assert!(!pools.projectiles().contains("rogue"));
}

#[test]
fn test_request_projectile_configures_instance() {
    let mut pools = pools();
    let handle = pools
        .request_projectile(
            Some(&laser()),
            Vec2::new(1.0, 2.0),
            Vec2::new(0.0, 2.0),
            Some(OwnerId(7)),
            Some("Player"),
        )
        .unwrap();
    let projectile = pools.projectile(handle).unwrap();
    assert_eq!(projectile.prototype(), "laser");
    assert_eq!(projectile.placement().position, Vec2::new(1.0, 2.0));
    assert!((projectile.placement().rotation - core::f32::consts::FRAC_PI_2).abs() < 1e-6);
    assert_eq!(projectile.velocity(), Vec2::new(0.0, 10.0));
    assert_eq!(projectile.shooter(), Some(OwnerId(7)));
    assert_eq!(projectile.tag(), Some("Player"));

    let untagged = pools
        .request_projectile(Some(&laser()), Vec2::ZERO, Vec2::X, None, Some(""))
        .unwrap();
    assert_ne!(untagged, handle);
    assert_eq!(pools.projectile(untagged).unwrap().tag(), None);
}

#[test]
fn test_projectile_expires_and_resets() {
    let mut pools = pools();
    let handle = pools
        .request_default_projectile(Vec2::ZERO, Vec2::X, Some(OwnerId(1)), Some("Enemy"))
        .unwrap();
    pools.tick(0.5);
    pools.tick(0.5);
    let projectile = pools.projectile(handle).unwrap();
    assert_eq!(projectile.time(), 1.0);
    assert_eq!(projectile.placement().position, Vec2::new(10.0, 0.0));
    assert!(pools.projectiles().try_get("laser").unwrap().is_active(handle));

    pools.tick(0.5);
    assert!(!pools.projectiles().try_get("laser").unwrap().is_active(handle));

    let next = pools
        .request_default_projectile(Vec2::ZERO, Vec2::Y, None, None)
        .unwrap();
    assert_eq!(next.slot(), handle.slot());
    let projectile = pools.projectile(next).unwrap();
    assert_eq!(projectile.time(), 0.0);
    assert_eq!(projectile.shooter(), None);
    assert_eq!(projectile.tag(), None);
    assert_eq!(pools.projectiles().try_get("laser").unwrap().len(), 1);
}

#[test]
fn test_projectile_impact() {
    let mut pools = pools();
    let handle = pools
        .request_projectile(Some(&laser()), Vec2::ZERO, Vec2::X, None, None)
        .unwrap();
    pools.projectile_mut(handle).unwrap().on_impact();
    assert_eq!(pools.reclaim(), 1);
    assert!(pools.projectile_mut(handle).is_none());
}

#[test]
fn test_spent_projectile_is_not_mutable() {
    let mut pools = pools();
    let handle = pools
        .request_projectile(Some(&laser()), Vec2::ZERO, Vec2::X, None, None)
        .unwrap();
    pools.projectile_mut(handle).unwrap().on_impact();
    assert!(pools.projectile_mut(handle).is_none());
    let lasers = pools.projectiles().try_get("laser").unwrap();
    assert_eq!(lasers.active_count(), 0);
    assert_eq!(pools.reclaim(), 0);
}

#[test]
fn test_shattered_rock_is_not_mutable() {
    let mut pools = pools();
    let handle = pools
        .request_rock(Vec2::ZERO, 0.0, FloatRange::new(1.0, 2.0))
        .unwrap();
    pools.rock_mut(handle).unwrap().shatter();
    assert!(pools.rock_mut(handle).is_none());
    assert_eq!(pools.rocks().unwrap().active_count(), 0);
}

#[test]
fn test_rock_with_unbounded_radius() {
    let mut pools = pools();
    let range = FloatRange::new(1.5, f32::INFINITY);
    let handle = pools.request_rock(Vec2::ZERO, 0.0, range).unwrap();
    let rock = pools.rock(handle).unwrap();
    assert!((5..=8).contains(&rock.outline().len()));
    for vertex in rock.outline() {
        approx::assert_relative_eq!(vertex.length(), 1.5, epsilon = 1e-4);
    }
}

#[test]
fn test_request_rock() {
    let mut pools = pools();
    let range = FloatRange::new(2.0, 3.0);
    let handle = pools.request_rock(Vec2::new(5.0, 5.0), 0.3, range).unwrap();
    let rock = pools.rock(handle).unwrap();
    assert_eq!(rock.placement(), Placement::new(Vec2::new(5.0, 5.0), 0.3));
    assert_eq!(rock.radius_range(), range);
    assert!((5..=8).contains(&rock.outline().len()));
    for vertex in rock.outline() {
        let radius = vertex.length();
        assert!(radius > 2.0 - 1e-4 && radius < 3.0 + 1e-4);
    }
    assert!(rock.area() > 0.0);
    assert!(rock.area() <= core::f32::consts::PI * 9.0);
    assert!(rock.outline_visible());

    pools.rock_mut(handle).unwrap().shatter();
    pools.reclaim();
    assert!(!pools.rock(handle).unwrap().outline_visible());
}

#[test]
fn test_rocks_follow_seed() {
    let range = FloatRange::new(1.0, 4.0);
    let mut a = pools();
    let mut b = pools();
    let ha = a.request_rock(Vec2::ZERO, 0.0, range).unwrap();
    let hb = b.request_rock(Vec2::ZERO, 0.0, range).unwrap();
    assert_eq!(a.rock(ha).unwrap().outline(), b.rock(hb).unwrap().outline());
}

#[test]
fn test_missing_rock_prototype() {
    let config = CosmosPoolsConfig {
        rock: None,
        ..config()
    };
    let mut pools = CosmosPools::from_config(&config);
    assert!(pools.rocks().is_none());
    assert!(pools
        .request_rock(Vec2::ZERO, 0.0, FloatRange::new(1.0, 2.0))
        .is_none());
}

#[test]
fn test_particle_effect() {
    let mut pools = pools();
    let still = pools
        .request_particle_effect(Some(&flash()), Vec2::ONE, Vec2::ZERO)
        .unwrap();
    let aimed = pools
        .request_particle_effect(Some(&flash()), Vec2::ONE, Vec2::new(-1.0, 0.0))
        .unwrap();
    assert_eq!(pools.particle_effect(still).unwrap().placement().rotation, 0.0);
    assert!(
        (pools.particle_effect(aimed).unwrap().placement().rotation - core::f32::consts::PI).abs()
            < 1e-6
    );

    pools.tick(0.25);
    let pool = pools.particle_effects().try_get("flash").unwrap();
    assert_eq!(pool.active_count(), 2);
    pools.tick(0.25);
    let pool = pools.particle_effects().try_get("flash").unwrap();
    assert_eq!(pool.active_count(), 0);
    assert_eq!(pool.len(), 2);
}

#[test]
fn test_pool_text() {
    let mut pools = pools();
    let handle = pools.request_pool_text(Vec2::new(40.0, 12.0), "+100").unwrap();
    let text = pools.pool_text(handle).unwrap();
    assert_eq!(text.text(), "+100");
    assert_eq!(text.color(), WHITE);
    assert_eq!(text.screen_position(), Vec2::new(40.0, 12.0));

    pools.tick(1.0);
    let again = pools.request_pool_text(Vec2::ZERO, "+5").unwrap();
    assert_eq!(again.slot(), handle.slot());
    assert_eq!(pools.pool_text(again).unwrap().text(), "+5");
    assert_ne!(pools.pool_text(again).unwrap().color(), Vec4::ZERO);
}

#[test]
fn test_unload_context_keeps_persistent() {
    let mut pools = pools();
    let laser_shot = pools
        .request_projectile(Some(&laser()), Vec2::ZERO, Vec2::X, None, None)
        .unwrap();
    let mine_shot = pools
        .request_projectile(Some(&mine()), Vec2::ZERO, Vec2::X, None, None)
        .unwrap();
    pools.request_particle_effect(Some(&flash()), Vec2::ZERO, Vec2::ZERO);
    assert_eq!(pools.unload_context(), 2);
    assert!(pools.projectile_mut(laser_shot).is_none());
    assert!(pools.projectile_mut(mine_shot).is_some());
}

#[test]
fn test_shoot_from_all_muzzles_in_order() {
    let mut pools = pools();
    let muzzles = vec![
        Muzzle {
            position: Vec2::new(-1.0, 0.0),
            direction: Vec2::Y,
        },
        Muzzle {
            position: Vec2::new(0.0, 0.0),
            direction: Vec2::Y,
        },
        Muzzle {
            position: Vec2::new(1.0, 0.0),
            direction: Vec2::Y,
        },
    ];
    let mut ability = ShootAbility::new(OwnerId(3), Some(laser()), MuzzleShootType::FromAllMuzzles)
        .with_muzzles(muzzles.clone())
        .with_muzzle_flash(flash())
        .with_projectile_tag("Player")
        .with_cooldown(0.2);

    let shots = ability.shoot(&mut pools).unwrap();
    assert_eq!(shots.len(), 3);
    for (i, shot) in shots.iter().enumerate() {
        let handle = shot.unwrap();
        assert_eq!(handle.slot(), i);
        let projectile = pools.projectile(handle).unwrap();
        assert_eq!(projectile.placement().position, muzzles[i].position);
        assert_eq!(projectile.shooter(), Some(OwnerId(3)));
        assert_eq!(projectile.tag(), Some("Player"));
    }
    let flashes = pools.particle_effects().try_get("flash").unwrap();
    assert_eq!(flashes.active_count(), 3);

    assert!(ability.cooldown().is_active());
    assert!(ability.shoot(&mut pools).is_none());
    ability.tick(0.2);
    assert!(ability.shoot(&mut pools).is_some());
}

#[test]
fn test_shoot_one_by_one_cycles() {
    let mut pools = pools();
    let muzzles: Vec<_> = (0..2)
        .map(|i| Muzzle {
            position: Vec2::new(i as f32, 0.0),
            direction: Vec2::X,
        })
        .collect();
    let mut ability = ShootAbility::new(OwnerId(1), Some(laser()), MuzzleShootType::OneByOneMuzzle)
        .with_muzzles(muzzles);
    let positions: Vec<f32> = (0..3)
        .map(|_| {
            let shots = ability.shoot(&mut pools).unwrap();
            assert_eq!(shots.len(), 1);
            pools.projectile(shots[0].unwrap()).unwrap().placement().position.x
        })
        .collect();
    assert_eq!(positions, vec![0.0, 1.0, 0.0]);
    assert_eq!(ability.muzzle_index(), 1);
}

#[test]
fn test_shoot_without_prototype() {
    let mut pools = pools();
    let mut ability = ShootAbility::new(OwnerId(1), None, MuzzleShootType::SingleMuzzle)
        .with_muzzles(vec![Muzzle {
            position: Vec2::ZERO,
            direction: Vec2::X,
        }]);
    assert_eq!(ability.shoot(&mut pools), Some(vec![None]));
    let mut empty = ShootAbility::new(OwnerId(1), Some(laser()), MuzzleShootType::SingleMuzzle);
    assert_eq!(empty.shoot(&mut pools), Some(Vec::new()));
}

#[test]
fn test_shoot_starts_cooldown_even_without_projectile() {
    let mut pools = pools();
    let muzzle = Muzzle {
        position: Vec2::ZERO,
        direction: Vec2::X,
    };
    let mut ability = ShootAbility::new(OwnerId(1), None, MuzzleShootType::SingleMuzzle)
        .with_muzzles(vec![muzzle])
        .with_cooldown(0.5);
    assert_eq!(ability.shoot(&mut pools), Some(vec![None]));
    assert!(ability.cooldown().is_active());
    assert!(ability.shoot(&mut pools).is_none());

    let mut empty = ShootAbility::new(OwnerId(1), Some(laser()), MuzzleShootType::SingleMuzzle)
        .with_cooldown(0.5);
    assert_eq!(empty.shoot(&mut pools), Some(Vec::new()));
    assert!(!empty.cooldown().is_active());
}

#[test]
fn test_pools_from_ron_config() {
    let source = r#"(
        initial_count: 2,
        projectiles: [(name: "laser")],
        rock: Some((segments: (min: 4, max: 6))),
    )"#;
    let config = CosmosPoolsConfig::from_ron_str(source).unwrap();
    let pools = CosmosPools::from_config(&config);
    assert_eq!(pools.projectiles().try_get("laser").unwrap().len(), 2);
    assert_eq!(pools.rocks().unwrap().len(), 2);
    assert!(pools.pool_texts().is_none());
}
