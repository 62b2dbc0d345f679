use ecm_framework::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq)]
struct InputEvent(u8);

impl Component for InputEvent {
    const TAGS: TagSet = TagSet::new().with(Tag::Event);
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct CollisionEvent(u8);

impl Component for CollisionEvent {
    const TAGS: TagSet = TagSet::new().with(Tag::Event).with(Tag::NoStack);
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Sprite(u8);

impl Component for Sprite {}

#[derive(Clone, Copy, Debug, PartialEq)]
struct GameMeta(u32);

impl Component for GameMeta {
    const TAGS: TagSet = TagSet::new().with(Tag::Required);
}

#[test]
fn clear_by_tag_drops_every_tagged_set_and_nothing_else() {
    let mut ecm = EntityComponentManager::new();

    ecm.add(1, InputEvent(1));
    ecm.add(1, CollisionEvent(2));
    ecm.add(1, Sprite(3));

    ecm.clear_by_tag(Tag::Event);

    assert!(ecm.get_entity_ids::<InputEvent>().is_empty());
    assert!(ecm.get_entity_ids::<CollisionEvent>().is_empty());
    assert_eq!(ecm.get_entity_ids::<Sprite>(), &[1]);
}

#[test]
fn clear_by_tag_twice_is_a_no_op() {
    let mut ecm = EntityComponentManager::new();

    ecm.add(1, InputEvent(1));
    ecm.clear_by_tag(Tag::Event);
    ecm.clear_by_tag(Tag::Event);

    assert!(ecm.get_entity_ids::<InputEvent>().is_empty());
}

#[test]
fn cleared_event_sets_are_recreated_on_demand() {
    let mut ecm = EntityComponentManager::new();

    ecm.add(1, InputEvent(1));
    ecm.clear_by_tag(Tag::Event);

    // The per-frame cycle: events re-accumulate after the sweep.
    ecm.add(2, InputEvent(4));
    assert_eq!(ecm.get_entity_ids::<InputEvent>(), &[2]);
    assert_eq!(ecm.get::<InputEvent>(2).peek(|e| e.0), 4);
}

#[test]
fn clear_accepts_a_tuple_of_types() {
    let mut ecm = EntityComponentManager::new();

    ecm.add(1, InputEvent(1));
    ecm.add(1, Sprite(2));

    ecm.clear::<(InputEvent, Sprite)>();

    assert!(ecm.get_entity_ids::<InputEvent>().is_empty());
    assert!(ecm.get_entity_ids::<Sprite>().is_empty());
}

#[test]
fn clear_twice_is_a_no_op() {
    let mut ecm = EntityComponentManager::new();

    ecm.add(1, Sprite(2));
    ecm.clear::<Sprite>();
    ecm.clear::<Sprite>();

    assert!(ecm.get_entity_ids::<Sprite>().is_empty());
}

#[test]
fn each_by_tag_exposes_structure_only() {
    let mut ecm = EntityComponentManager::new();

    ecm.add(1, InputEvent(1));
    ecm.add(2, InputEvent(2));
    ecm.add(3, CollisionEvent(3));
    ecm.get::<CollisionEvent>(4);

    let mut seen = Vec::new();
    ecm.each_by_tag(Tag::Event, |id, size| seen.push((id, size)));
    seen.sort_unstable();

    // Sentinels are visible with size zero; untagged sets are not visited.
    assert_eq!(seen, vec![(1, 1), (2, 1), (3, 1), (4, 0)]);
}

#[test]
#[should_panic(expected = "required component")]
fn reading_a_required_component_without_a_set_is_fatal() {
    let mut ecm = EntityComponentManager::new();
    let _ = ecm.get::<GameMeta>(1);
}

#[test]
fn required_components_read_normally_once_added() {
    let mut ecm = EntityComponentManager::new();

    ecm.add(1, GameMeta(60));
    assert_eq!(ecm.get::<GameMeta>(1).peek(|m| m.0), 60);

    // Other entities read sentinels once the set exists.
    assert!(ecm.get::<GameMeta>(2).is_empty_sentinel());
}

#[test]
fn each_by_tag_on_an_unused_tag_visits_nothing() {
    let mut ecm = EntityComponentManager::new();
    ecm.add(1, Sprite(1));

    let mut visits = 0;
    ecm.each_by_tag(Tag::Effect, |_, _| visits += 1);
    assert_eq!(visits, 0);
}
