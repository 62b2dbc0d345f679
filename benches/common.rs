#![allow(dead_code)]

use ecm_framework::prelude::*;

pub const ENTITIES_SMALL: usize = 1_000;
pub const ENTITIES_MED: usize = 10_000;

#[derive(Clone, Copy)]
pub struct Wealth {
    pub value: f32,
}

impl Component for Wealth {}

#[derive(Clone, Copy)]
pub struct Hit {
    pub amount: u32,
}

impl Component for Hit {
    const TAGS: TagSet = TagSet::new().with(Tag::Stack);
}

/// Builds a manager holding one `Wealth` per entity.
pub fn populate_wealth(count: usize) -> EntityComponentManager {
    let mut ecm = EntityComponentManager::new();
    for _ in 0..count {
        let id = ecm.create_entity();
        ecm.add(id, Wealth { value: 1.0 });
    }
    ecm
}

/// Builds a manager where every other entity holds only a sentinel.
pub fn populate_with_sentinels(count: usize) -> EntityComponentManager {
    let mut ecm = EntityComponentManager::new();
    for index in 0..count {
        let id = ecm.create_entity();
        if index % 2 == 0 {
            ecm.add(id, Wealth { value: 1.0 });
        } else {
            ecm.get::<Wealth>(id);
        }
    }
    ecm
}
