use ecm_framework::prelude::*;
use ecm_framework::NO_ENTITY;

#[derive(Clone, Copy, Debug, PartialEq)]
struct Player {
    score: u32,
}

impl Component for Player {
    const TAGS: TagSet = TagSet::new().with(Tag::Unique);
}

#[test]
fn first_add_locks_the_set_against_other_entities() {
    let mut ecm = EntityComponentManager::new();

    ecm.add(42, Player { score: 1 });
    ecm.add(43, Player { score: 2 });

    // The second add was refused; the set holds exactly the first owner.
    assert_eq!(ecm.get_entity_ids::<Player>(), &[42]);
    let (owner, wrapper) = ecm.get_unique::<Player>();
    assert_eq!(owner, 42);
    assert_eq!(wrapper.len(), 1);
    assert_eq!(wrapper.peek(|p| p.score), 1);
}

#[test]
fn repeat_add_for_the_owner_is_also_refused() {
    let mut ecm = EntityComponentManager::new();

    ecm.add(42, Player { score: 1 });
    ecm.add(42, Player { score: 9 });

    let (_, wrapper) = ecm.get_unique::<Player>();
    assert_eq!(wrapper.len(), 1);
    assert_eq!(wrapper.peek(|p| p.score), 1);
}

#[test]
fn reads_materialise_sentinels_through_the_lock() {
    let mut ecm = EntityComponentManager::new();
    ecm.add(42, Player { score: 1 });

    let sentinel = ecm.get::<Player>(99);
    assert!(sentinel.is_empty_sentinel());
    assert_eq!(sentinel.len(), 0);

    let mut ids: Vec<EntityId> = ecm.get_entity_ids::<Player>().to_vec();
    ids.sort_unstable();
    assert_eq!(ids, vec![42, 99]);

    // The set stays locked after the sentinel insert.
    ecm.add(99, Player { score: 5 });
    assert!(!ecm.get::<Player>(99).is_populated());

    ecm.prune::<Player>();
    assert_eq!(ecm.get_entity_ids::<Player>(), &[42]);

    let (owner, wrapper) = ecm.get_unique::<Player>();
    assert_eq!(owner, 42);
    assert_eq!(wrapper.len(), 1);
}

#[test]
fn singleton_read_of_an_empty_set_yields_the_null_sentinel() {
    let mut ecm = EntityComponentManager::new();

    let (owner, wrapper) = ecm.get_unique::<Player>();
    assert_eq!(owner, NO_ENTITY);
    assert!(wrapper.is_empty_sentinel());
    assert_eq!(wrapper.len(), 0);
}

#[test]
fn singleton_scan_reclaims_sentinels_in_passing() {
    let mut ecm = EntityComponentManager::new();
    ecm.add(42, Player { score: 1 });

    ecm.get::<Player>(7);
    ecm.get::<Player>(8);

    let (owner, _) = ecm.get_unique::<Player>();
    assert_eq!(owner, 42);

    // The scan pruned both sentinels without an explicit prune call.
    assert_eq!(ecm.get_entity_ids::<Player>(), &[42]);
}

#[test]
fn overwrite_by_the_owner_replaces_the_instance() {
    let mut ecm = EntityComponentManager::new();
    ecm.add(42, Player { score: 1 });

    ecm.overwrite(42, Player { score: 2 });

    let (owner, wrapper) = ecm.get_unique::<Player>();
    assert_eq!(owner, 42);
    assert_eq!(wrapper.len(), 1);
    assert_eq!(wrapper.peek(|p| p.score), 2);
}

#[cfg(debug_assertions)]
#[test]
#[should_panic(expected = "not the owning entity")]
fn overwrite_by_a_non_owner_is_fatal_in_debug() {
    let mut ecm = EntityComponentManager::new();
    ecm.add(42, Player { score: 1 });

    ecm.overwrite(43, Player { score: 2 });
}
