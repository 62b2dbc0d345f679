//! # Entity-Component Manager
//!
//! Top-level registry dispatching operations to per-type sparse sets.
//!
//! ## Purpose
//! [`EntityComponentManager`] owns every component set, the tag index, the
//! transformation registry, and the entity id allocator. Callers obtain an
//! id, then `add`, `get`, `gather`, `clear`, and `prune` through the
//! manager; it dispatches on the component's `TypeId`, fetches (or creates)
//! the matching sparse set behind its erased handle, recovers the concrete
//! type with a verified downcast, and performs the operation.
//!
//! ## Sentinel-on-read
//! Reading a component an entity does not have materialises an `EMPTY`
//! sentinel wrapper, so the returned reference is always valid and call
//! sites need no null checks. Sentinels are visible in the dense id lists,
//! invisible to `each`, and reclaimed by [`prune`] (or opportunistically
//! during iteration).
//!
//! ## Uniqueness locking
//! A `Unique`-tagged set locks after its first real add. The lock is a
//! write-only gate: further adds are refused with a warning, while reads
//! unlock around sentinel insertion and re-lock, preserving the always-valid
//! reference contract.
//!
//! ## Concurrency
//! Single-threaded by design. Every operation takes `&mut self` and returns
//! borrows that end with the next manager call; no internal synchronisation
//! exists. Callers wanting threads must serialise outside.
//!
//! ## Errors
//! Fatal conditions (type mismatch behind an erased handle, required
//! component with no set) panic with a structured error message and mutate
//! nothing. Recoverable refusals (stacking, locked set, overwrite of an
//! absent wrapper) log through the `log` facade and return benignly.
//!
//! [`prune`]: EntityComponentManager::prune

use std::any::{Any, TypeId, type_name};
use std::rc::Rc;

use ahash::{AHashMap, AHashSet};

use crate::engine::component::Components;
use crate::engine::entity::EntityAllocator;
use crate::engine::error::{
    EcmError, LockedSetError, MissingRequiredComponentError, NoStackError, TypeMismatchError,
    UniqueOwnershipError,
};
use crate::engine::gather::{ComponentList, Gather};
use crate::engine::sparse_set::{ErasedComponentSet, SparseSet};
use crate::engine::tags::{Component, Tag, TagSet, is_required, is_unique, should_stack};
use crate::engine::types::{EntityId, MIN_SET_SIZE, NO_ENTITY, STANDARD_SET_SIZE};


type SetMap = AHashMap<TypeId, Box<dyn ErasedComponentSet>>;
type TagIndex = AHashMap<Tag, AHashSet<TypeId>>;
type TransformMap = AHashMap<TypeId, Box<dyn Any>>;

/// Registered transformation for component type `T`, applied lazily on
/// read paths.
pub type Transformation<T> = Rc<dyn Fn(EntityId, &T) -> T>;

/// Type-erased, tag-aware container of heterogeneous component data keyed
/// by entity id.
pub struct EntityComponentManager {
    sets: SetMap,
    tag_index: TagIndex,
    transformations: TransformMap,
    entities: EntityAllocator,
    min_set_size: usize,
    standard_set_size: usize,
}

impl Default for EntityComponentManager {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityComponentManager {
    /// Creates a manager with the default set sizing policy.
    pub fn new() -> Self {
        Self::with_set_sizes(MIN_SET_SIZE, STANDARD_SET_SIZE)
    }

    /// Creates a manager with an explicit sizing policy: `min_set_size` for
    /// sets created on iteration-only surfaces, `standard_set_size` for
    /// sets created on read/write paths.
    pub fn with_set_sizes(min_set_size: usize, standard_set_size: usize) -> Self {
        Self {
            sets: AHashMap::new(),
            tag_index: AHashMap::new(),
            transformations: AHashMap::new(),
            entities: EntityAllocator::new(),
            min_set_size,
            standard_set_size,
        }
    }

    /// Returns a fresh entity id. Monotonic; never reused.
    pub fn create_entity(&mut self) -> EntityId {
        self.entities.allocate()
    }

    /// Adds one instance of `T` for `id`.
    ///
    /// ## Behavior
    /// - `id == 0` is a no-op.
    /// - `Unique` components lock their set after the add; a later add for
    ///   any entity is refused with a warning.
    /// - Without the `Stack` tag, a second instance for the same entity is
    ///   refused with a warning and the wrapper is left unchanged.
    /// - A registered transformation is installed on the wrapper after a
    ///   successful write.
    pub fn add<T: Component>(&mut self, id: EntityId, component: T) {
        if id == NO_ENTITY {
            return;
        }

        if is_unique::<T>() {
            self.add_unique(id, component);
            return;
        }

        self.add_component(id, component);
    }

    /// Replaces the wrapper of `id` with exactly one freshly constructed
    /// instance.
    ///
    /// ## Behavior
    /// - `id == 0` is a no-op.
    /// - For `Unique` components, `id` must be the current sole owner:
    ///   fatal in debug builds, a logged refusal otherwise.
    /// - Overwriting an entity with no wrapper is a logged refusal.
    /// - The replacement wrapper gets the registered transformation, so
    ///   transformed reads survive the overwrite.
    pub fn overwrite<T: Component>(&mut self, id: EntityId, component: T) {
        if id == NO_ENTITY {
            return;
        }

        if is_unique::<T>() {
            let set = set_entry::<T>(&mut self.sets, &mut self.tag_index, self.standard_set_size);
            let owner = scan_for_owner(set);
            if owner != id {
                let error = EcmError::from(UniqueOwnershipError {
                    entity: id,
                    owner,
                    name: type_name::<T>(),
                });
                debug_assert!(false, "{error}");
                log::warn!("{error}");
                return;
            }
        }

        self.overwrite_component(id, component);
    }

    /// Borrows the wrapper of `id`, materialising an `EMPTY` sentinel if
    /// the entity has none. The reference is always valid.
    ///
    /// Creates the set on first reference.
    ///
    /// ## Panics
    /// Panics (`MissingRequiredComponent`) when `T` is `Required` and no
    /// set exists, and (`TypeMismatch`) when the stored set fails the
    /// downcast.
    pub fn get<T: Component>(&mut self, id: EntityId) -> &mut Components<T> {
        if is_required::<T>() && !self.sets.contains_key(&TypeId::of::<T>()) {
            panic!(
                "{}",
                EcmError::from(MissingRequiredComponentError { name: type_name::<T>() })
            );
        }

        let set = set_entry::<T>(&mut self.sets, &mut self.tag_index, self.standard_set_size);
        get_or_create_wrapper(set, id, &self.transformations)
    }

    /// Singleton read for a `Unique` component: the owning entity and its
    /// wrapper.
    ///
    /// Scans the set without short-circuiting so that sentinels encountered
    /// along the way are pruned in passing; dense order is unstable, so the
    /// result is "some non-empty owner". An empty set yields
    /// `(0, EMPTY sentinel)`.
    pub fn get_unique<T: Component>(&mut self) -> (EntityId, &mut Components<T>) {
        const {
            assert!(
                T::TAGS.contains(Tag::Unique),
                "singleton access requires a Unique-tagged component type"
            )
        };

        let set = set_entry::<T>(&mut self.sets, &mut self.tag_index, self.standard_set_size);

        let owner = scan_for_owner(set);
        if owner != NO_ENTITY {
            let wrapper = set.get_mut(owner).expect("owner observed during scan");
            return (owner, wrapper);
        }

        let sentinel = get_or_create_wrapper(set, NO_ENTITY, &self.transformations);
        (NO_ENTITY, sentinel)
    }

    /// Borrows the wrappers of `N` pairwise distinct entities at once, each
    /// materialised if necessary.
    ///
    /// ## Panics
    /// Panics if the ids are not pairwise distinct.
    pub fn get_many<T: Component, const N: usize>(
        &mut self,
        ids: [EntityId; N],
    ) -> [&mut Components<T>; N] {
        for id in ids {
            self.get::<T>(id);
        }
        let set = set_entry::<T>(&mut self.sets, &mut self.tag_index, self.standard_set_size);
        set.get_disjoint_mut(ids)
    }

    /// Borrows one wrapper per member of `G` for a single entity, each
    /// materialised if necessary.
    ///
    /// `G` is a component type or a tuple of up to four distinct component
    /// types: `ecm.gather::<(Position, Velocity)>(id)`.
    pub fn gather<G: Gather>(&mut self, id: EntityId) -> G::Wrappers<'_> {
        G::gather(self, id)
    }

    /// Borrows the sparse set of every member of `G` for bulk iteration.
    pub fn gather_all<G: Gather>(&mut self) -> G::Sets<'_> {
        G::gather_all(self)
    }

    /// Borrows the sparse set of `T`, creating it (at the minimum size) on
    /// first reference.
    pub fn get_all<T: Component>(&mut self) -> &mut SparseSet<T> {
        let min = self.min_set_size;
        set_entry::<T>(&mut self.sets, &mut self.tag_index, min)
    }

    /// The dense entity id array of `T`'s set. Sentinels count as present;
    /// order is unstable across erasures.
    pub fn get_entity_ids<T: Component>(&mut self) -> &[EntityId] {
        let min = self.min_set_size;
        set_entry::<T>(&mut self.sets, &mut self.tag_index, min).ids()
    }

    /// Drops the entire set of every member of `L`.
    ///
    /// Debug builds warn when a member is `Required`.
    pub fn clear<L: ComponentList>(&mut self) {
        L::for_each_type(&mut |type_id, name, tags| {
            debug_check_required(name, tags, "clear");
            self.sets.remove(&type_id);
        });
    }

    /// Drops every set whose component type carries `tag`, then the tag
    /// entry itself.
    pub fn clear_by_tag(&mut self, tag: Tag) {
        let Some(type_ids) = self.tag_index.remove(&tag) else {
            return;
        };
        for type_id in type_ids {
            self.sets.remove(&type_id);
        }
    }

    /// Erases `id` from the set of every member of `L`. Sets that do not
    /// exist are skipped.
    pub fn clear_by_entity<L: ComponentList>(&mut self, id: EntityId) {
        L::for_each_type(&mut |type_id, name, tags| {
            debug_check_required(name, tags, "clear by entity");
            if let Some(set) = self.sets.get_mut(&type_id) {
                set.erase(id);
            }
        });
    }

    /// Erases `id` from every stored set. The entity is dead afterwards;
    /// any later `get` materialises a fresh sentinel.
    pub fn clear_entity(&mut self, id: EntityId) {
        for set in self.sets.values_mut() {
            set.erase(id);
        }
    }

    /// Removes every wrapper with no elements (sentinels and drained
    /// wrappers alike) from the set of each member of `L`, dropping a set
    /// entirely when everything in it was empty. Idempotent.
    pub fn prune<L: ComponentList>(&mut self) {
        L::for_each_type(&mut |type_id, _, _| prune_set(&mut self.sets, type_id));
    }

    /// Registers a transformation applied lazily on every read of `T`.
    ///
    /// Wrappers that already exist are retrofitted, so a registration after
    /// adds takes effect on the next read. Writes are never transformed.
    pub fn register_transformation<T: Component>(
        &mut self,
        transformation: impl Fn(EntityId, &T) -> T + 'static,
    ) {
        let stored: Transformation<T> = Rc::new(transformation);
        self.transformations
            .insert(TypeId::of::<T>(), Box::new(Rc::clone(&stored)));

        if let Some(set) = self.sets.get_mut(&TypeId::of::<T>()) {
            let set = cast_set_mut::<T>(set.as_mut());
            set.each_with_empty_mut(|id, wrapper| {
                let transformation = Rc::clone(&stored);
                wrapper.set_transformer(Rc::new(move |component| {
                    transformation.as_ref()(id, component)
                }));
            });
        }
    }

    /// Structural iteration over every set registered under `tag`: calls
    /// `f` with `(entity, wrapper element count)` for every wrapper,
    /// sentinels included.
    ///
    /// Element access through a tag is not expressible; the erased handles
    /// only surface structure.
    pub fn each_by_tag(&self, tag: Tag, mut f: impl FnMut(EntityId, usize)) {
        let Some(type_ids) = self.tag_index.get(&tag) else {
            return;
        };
        for type_id in type_ids {
            if let Some(set) = self.sets.get(type_id) {
                set.each_sizes(&mut f);
            }
        }
    }

    fn add_unique<T: Component>(&mut self, id: EntityId, component: T) {
        self.add_component(id, component);
        let min = self.min_set_size;
        set_entry::<T>(&mut self.sets, &mut self.tag_index, min).lock();
    }

    fn add_component<T: Component>(&mut self, id: EntityId, component: T) {
        let set = set_entry::<T>(&mut self.sets, &mut self.tag_index, self.standard_set_size);

        if set.is_locked() {
            log::warn!(
                "{}",
                EcmError::from(LockedSetError { entity: id, name: type_name::<T>() })
            );
            return;
        }

        match set.get_mut(id) {
            None => {
                let Some(wrapper) = set.emplace(id, component) else {
                    return;
                };
                install_transformer(&self.transformations, id, wrapper);
            }
            Some(wrapper) => {
                if !should_stack::<T>() && wrapper.len() >= 1 {
                    log::warn!(
                        "{}",
                        EcmError::from(NoStackError { entity: id, name: type_name::<T>() })
                    );
                    return;
                }
                wrapper.push(component);
                install_transformer(&self.transformations, id, wrapper);
            }
        }
    }

    fn overwrite_component<T: Component>(&mut self, id: EntityId, component: T) {
        let set = set_entry::<T>(&mut self.sets, &mut self.tag_index, self.standard_set_size);

        if !set.contains(id) {
            log::warn!(
                "entity {id} does not contain {}, overwrite failed",
                type_name::<T>()
            );
            return;
        }

        set.overwrite(id, Components::single(component));
        let wrapper = set.get_mut(id).expect("wrapper present after overwrite");
        install_transformer(&self.transformations, id, wrapper);
    }

    /// Raw pointer to the wrapper of `id`, which must have been
    /// materialised beforehand. Used by tuple gathering to split borrows
    /// across distinct sets.
    pub(crate) fn wrapper_ptr<T: Component>(&mut self, id: EntityId) -> *mut Components<T> {
        let set = set_entry::<T>(&mut self.sets, &mut self.tag_index, self.standard_set_size);
        set.get_mut(id).expect("wrapper materialised before the pointer is taken")
    }

    /// Raw pointer to the set of `T`, created at the minimum size if
    /// missing. Used by tuple gathering to split borrows.
    pub(crate) fn set_ptr<T: Component>(&mut self) -> *mut SparseSet<T> {
        let min = self.min_set_size;
        set_entry::<T>(&mut self.sets, &mut self.tag_index, min)
    }
}

/// Fetches the set of `T`, creating it (and registering its tags) on first
/// reference.
fn set_entry<'a, T: Component>(
    sets: &'a mut SetMap,
    tag_index: &mut TagIndex,
    capacity: usize,
) -> &'a mut SparseSet<T> {
    const {
        assert!(
            T::TAGS.is_coherent(),
            "component type declares both Stack and NoStack"
        )
    };

    let type_id = TypeId::of::<T>();
    if !sets.contains_key(&type_id) {
        sets.insert(type_id, Box::new(SparseSet::<T>::with_capacity(capacity)));
        for tag in T::TAGS.iter() {
            tag_index.entry(tag).or_default().insert(type_id);
        }
        log::debug!("created component set for {}", type_name::<T>());
    }

    let set = sets.get_mut(&type_id).expect("set entry just ensured");
    cast_set_mut::<T>(set.as_mut())
}

/// Recovers the concrete set type from an erased handle.
///
/// Checked by default; the `unsafe-casts` feature downgrades this to an
/// unchecked pointer cast on the grounds that the map key already matched
/// on `TypeId`.
fn cast_set_mut<T: Component>(set: &mut dyn ErasedComponentSet) -> &mut SparseSet<T> {
    #[cfg(feature = "unsafe-casts")]
    {
        unsafe { &mut *(set as *mut dyn ErasedComponentSet as *mut SparseSet<T>) }
    }
    #[cfg(not(feature = "unsafe-casts"))]
    {
        let actual = set.element_type_name();
        match set.as_any_mut().downcast_mut::<SparseSet<T>>() {
            Some(concrete) => concrete,
            None => panic!(
                "{}",
                EcmError::from(TypeMismatchError { expected: type_name::<T>(), actual })
            ),
        }
    }
}

/// Scans a set for its current owning entity, without short-circuiting so
/// that sentinels encountered along the way are reclaimed in passing.
/// Returns `NO_ENTITY` when no wrapper survives the scan.
fn scan_for_owner<T: Component>(set: &mut SparseSet<T>) -> EntityId {
    let mut owner = NO_ENTITY;
    set.each(|id, _| {
        if owner == NO_ENTITY {
            owner = id;
        }
    });
    owner
}

/// Borrows the wrapper of `id`, inserting an `EMPTY` sentinel when absent.
/// A locked set is unlocked around the insert and re-locked.
fn get_or_create_wrapper<'a, T: Component>(
    set: &'a mut SparseSet<T>,
    id: EntityId,
    transformations: &TransformMap,
) -> &'a mut Components<T> {
    let created = !set.contains(id);
    if created {
        let sentinel = Components::empty_sentinel();
        if set.is_locked() {
            set.unlock();
            set.insert(id, sentinel);
            set.lock();
        } else {
            set.insert(id, sentinel);
        }
    }

    let wrapper = set.get_mut(id).expect("wrapper present after sentinel insert");
    if created {
        install_transformer(transformations, id, wrapper);
    }
    wrapper
}

/// Installs the registered transformation for `T` (if any) on a wrapper,
/// bound to the owning entity.
fn install_transformer<T: Component>(
    transformations: &TransformMap,
    id: EntityId,
    wrapper: &mut Components<T>,
) {
    let Some(stored) = transformations.get(&TypeId::of::<T>()) else {
        return;
    };
    let Some(transformation) = stored.downcast_ref::<Transformation<T>>() else {
        panic!(
            "{}",
            EcmError::from(TypeMismatchError {
                expected: type_name::<T>(),
                actual: "stored transformation of another type",
            })
        );
    };

    let transformation = Rc::clone(transformation);
    wrapper.set_transformer(Rc::new(move |component| transformation.as_ref()(id, component)));
}

/// Erases every empty wrapper of one set; drops the set when everything in
/// it was empty.
fn prune_set(sets: &mut SetMap, type_id: TypeId) {
    let Some(set) = sets.get_mut(&type_id) else {
        return;
    };

    let mut drained = Vec::new();
    set.each_sizes(&mut |id, size| {
        if size == 0 {
            drained.push(id);
        }
    });

    let drop_all = drained.len() == set.len();
    if !drop_all {
        for id in drained {
            set.erase(id);
        }
    }

    if drop_all || set.len() == 0 {
        sets.remove(&type_id);
    }
}

fn debug_check_required(name: &'static str, tags: TagSet, operation: &str) {
    if cfg!(debug_assertions) && tags.contains(Tag::Required) {
        log::warn!("{operation} performed on required component {name}");
    }
}
