use cosmos_pool::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Kind {
    A,
    B,
    C,
}

#[derive(Debug)]
struct Shot {
    kind: Kind,
    owner: Option<u8>,
}

impl PoolEntity for Shot {
    type SpawnParams = ();

    fn place(&mut self, _: ()) {}

    fn on_object_reset(&mut self) {
        self.owner = None;
    }
}

#[derive(Debug, Clone, Copy)]
struct ShotPrototype(Kind);

impl Prototype<Shot> for ShotPrototype {
    fn instantiate(&self, _: Deactivator) -> Shot {
        Shot {
            kind: self.0,
            owner: None,
        }
    }
}

type Shots = PoolRegistry<Kind, ShotPrototype, Shot>;

fn registry() -> Shots {
    PoolRegistry::populated(1, [Kind::A, Kind::B].map(|k| (k, ShotPrototype(k))))
}

#[test]
fn test_populated() {
    let registry = registry();
    assert_eq!(registry.len(), 2);
    assert_eq!(registry.try_get(&Kind::A).unwrap().len(), 1);
    assert_eq!(registry.try_get(&Kind::B).unwrap().available_count(), 1);
    assert!(registry.try_get(&Kind::C).is_none());
}

#[test]
fn test_two_prototypes_scenario() {
    let mut registry = registry();
    let a1 = registry.recycle(&Kind::A, ()).unwrap();
    let a2 = registry.recycle(&Kind::A, ()).unwrap();
    assert_ne!(a1, a2);
    assert_eq!(registry.try_get(&Kind::A).unwrap().len(), 2);

    let b = registry.recycle(&Kind::B, ()).unwrap();
    assert_ne!(b.pool(), a1.pool());
    assert_ne!(b, a1);
    assert_ne!(b, a2);
    assert_eq!(registry.entity(b).unwrap().kind, Kind::B);
    assert_eq!(registry.entity(a2).unwrap().kind, Kind::A);
}

#[test]
fn test_pools_never_share_entities() {
    let mut registry = registry();
    let a: Vec<_> = (0..5).map(|_| registry.recycle(&Kind::A, ()).unwrap()).collect();
    let b: Vec<_> = (0..5).map(|_| registry.recycle(&Kind::B, ()).unwrap()).collect();
    let pool_a = registry.try_get(&Kind::A).unwrap();
    let pool_b = registry.try_get(&Kind::B).unwrap();
    assert!(a.iter().all(|&h| pool_a.get(h).is_some() && pool_b.get(h).is_none()));
    assert!(b.iter().all(|&h| pool_b.get(h).is_some() && pool_a.get(h).is_none()));
}

#[test]
fn test_lookup_miss() {
    let mut registry = registry();
    assert!(registry.recycle(&Kind::C, ()).is_none());
    assert!(!registry.contains(&Kind::C));
    assert_eq!(registry.len(), 2);
}

#[test]
fn test_get_or_create() {
    let mut registry = registry();
    let created = registry.get_or_create(Kind::C, || ShotPrototype(Kind::C));
    assert!(created.is_empty());
    let handle = created.recycle(()).unwrap();
    assert_eq!(registry.entity(handle).unwrap().kind, Kind::C);

    let existing_id = registry.try_get(&Kind::A).unwrap().id();
    let existing = registry.get_or_create(Kind::A, || unreachable!());
    assert_eq!(existing.id(), existing_id);
    assert_eq!(registry.len(), 3);
}

#[test]
fn test_duplicate_keys_keep_first() {
    let registry: Shots = PoolRegistry::populated(
        2,
        [(Kind::A, ShotPrototype(Kind::A)), (Kind::A, ShotPrototype(Kind::B))],
    );
    assert_eq!(registry.len(), 1);
    let pool = registry.try_get(&Kind::A).unwrap();
    assert_eq!(pool.prototype().0, Kind::A);
    assert_eq!(pool.len(), 2);
}

#[test]
fn test_entity_mut_and_deactivate() {
    let mut registry = registry();
    let handle = registry.recycle(&Kind::B, ()).unwrap();
    registry.entity_mut(handle).unwrap().owner = Some(3);
    assert!(registry.deactivate(handle));
    assert!(!registry.deactivate(handle));
    assert!(registry.entity_mut(handle).is_none());

    let again = registry.recycle(&Kind::B, ()).unwrap();
    assert_eq!(registry.entity(again).unwrap().owner, None);
}

#[test]
fn test_teardown_context() {
    let mut registry = registry();
    registry.recycle(&Kind::A, ()).unwrap();
    registry.recycle(&Kind::B, ()).unwrap();
    registry.recycle(&Kind::B, ()).unwrap();
    assert_eq!(registry.teardown_context(), 3);
    assert!(registry.pools().all(|pool| pool.active_count() == 0));
    assert_eq!(registry.reclaim_all(), 0);
}
