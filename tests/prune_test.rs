use ecm_framework::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq)]
struct Health(i32);

impl Component for Health {}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Shield(i32);

impl Component for Shield {}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Hit(u32);

impl Component for Hit {
    const TAGS: TagSet = TagSet::new().with(Tag::Stack);
}

#[test]
fn reads_of_missing_components_materialise_listed_sentinels() {
    let mut ecm = EntityComponentManager::new();

    ecm.add(1, Health(100));
    let sentinel = ecm.get::<Shield>(1);
    assert!(sentinel.is_empty_sentinel());
    assert_eq!(sentinel.len(), 0);

    assert_eq!(ecm.get_entity_ids::<Shield>(), &[1]);
}

#[test]
fn prune_drops_an_all_empty_set_entirely() {
    let mut ecm = EntityComponentManager::new();

    ecm.add(1, Health(100));
    ecm.get::<Shield>(1);
    assert_eq!(ecm.get_entity_ids::<Shield>(), &[1]);

    ecm.prune::<Shield>();
    assert!(ecm.get_entity_ids::<Shield>().is_empty());

    // A later read recreates the set and the sentinel.
    assert!(ecm.get::<Shield>(1).is_empty_sentinel());
    assert_eq!(ecm.get_entity_ids::<Shield>(), &[1]);
}

#[test]
fn prune_removes_exactly_the_empty_wrappers() {
    let mut ecm = EntityComponentManager::new();

    ecm.add(1, Hit(10));
    ecm.add(2, Hit(20));
    ecm.get::<Hit>(3);

    // Drain entity 2 without touching entity 1.
    ecm.get::<Hit>(2).remove(|_| true);

    ecm.prune::<Hit>();
    assert_eq!(ecm.get_entity_ids::<Hit>(), &[1]);
}

#[test]
fn prune_is_idempotent() {
    let mut ecm = EntityComponentManager::new();

    ecm.add(1, Hit(10));
    ecm.get::<Hit>(2);

    ecm.prune::<Hit>();
    let after_first: Vec<EntityId> = ecm.get_entity_ids::<Hit>().to_vec();

    ecm.prune::<Hit>();
    assert_eq!(ecm.get_entity_ids::<Hit>(), after_first.as_slice());
}

#[test]
fn prune_of_an_unreferenced_type_is_a_no_op() {
    let mut ecm = EntityComponentManager::new();
    ecm.prune::<Health>();
    assert!(ecm.get_entity_ids::<Health>().is_empty());
}

#[test]
fn add_erase_prune_restores_the_pre_add_state() {
    let mut ecm = EntityComponentManager::new();
    let entity = ecm.create_entity();

    ecm.add(entity, Health(50));
    ecm.get_all::<Health>().erase(entity);
    ecm.prune::<Health>();

    assert!(ecm.get_entity_ids::<Health>().is_empty());
}

#[test]
fn prune_accepts_a_tuple_of_types() {
    let mut ecm = EntityComponentManager::new();

    ecm.get::<Health>(1);
    ecm.get::<Shield>(2);
    ecm.add(3, Hit(1));
    ecm.get::<Hit>(4);

    ecm.prune::<(Health, Shield, Hit)>();

    assert!(ecm.get_entity_ids::<Health>().is_empty());
    assert!(ecm.get_entity_ids::<Shield>().is_empty());
    assert_eq!(ecm.get_entity_ids::<Hit>(), &[3]);
}
