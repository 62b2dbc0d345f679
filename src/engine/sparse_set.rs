//! # Sparse-Set Component Storage
//!
//! Maps entity ids to component wrappers with O(1) insert, erase, and
//! lookup plus dense iteration.
//!
//! ## Design
//! [`SparseSet<T>`] is the classic triple:
//!
//! - `sparse` — indexed by entity id, holding the dense slot (or a vacancy
//!   sentinel),
//! - `dense` — packed wrapper storage,
//! - `ids` — the entity id owning each dense slot.
//!
//! Erasure swap-removes to preserve density, so dense order is **not**
//! stable across erasures; callers must not rely on iteration order
//! matching insertion order across lifetime events.
//!
//! ## Locking
//! A set is locked after a `Unique`-tagged component gains its first real
//! owner. The lock gates `insert` and `emplace` only; `erase` and
//! `overwrite` pass through, and the manager is permitted to unlock around
//! sentinel creation and re-lock.
//!
//! ## Erasure of the element type
//! [`ErasedComponentSet`] is the structural vtable the manager stores sets
//! behind: size, erase-by-id, dense ids, per-wrapper sizes, and a verified
//! route back to the concrete set via `Any`. Element access through the
//! erased handle is deliberately not expressible; tag-driven iteration is
//! therefore restricted to structural operations by construction.

use std::any::{Any, TypeId, type_name};

use crate::engine::component::Components;
use crate::engine::tags::Component;
use crate::engine::types::{EntityId, NO_ENTITY};


/// Vacancy marker in the sparse index.
const VACANT: usize = usize::MAX;

/// Dense storage of [`Components<T>`] keyed by entity id.
pub struct SparseSet<T: Component> {
    sparse: Vec<usize>,
    dense: Vec<Components<T>>,
    ids: Vec<EntityId>,
    locked: bool,
}

impl<T: Component> SparseSet<T> {
    /// Creates an empty set with `capacity` pre-sized sparse slots.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            sparse: vec![VACANT; capacity],
            dense: Vec::new(),
            ids: Vec::new(),
            locked: false,
        }
    }

    /// Number of stored wrappers, sentinels included.
    #[inline]
    pub fn len(&self) -> usize {
        self.dense.len()
    }

    /// Returns `true` if no wrapper is stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    /// Returns `true` if the set refuses inserts.
    #[inline]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Refuse further inserts. Set once a unique component has an owner.
    #[inline]
    pub fn lock(&mut self) {
        self.locked = true;
    }

    /// Accept inserts again.
    #[inline]
    pub fn unlock(&mut self) {
        self.locked = false;
    }

    /// The dense entity id array. Order is dense order: unstable across
    /// erasures.
    #[inline]
    pub fn ids(&self) -> &[EntityId] {
        &self.ids
    }

    #[inline]
    fn slot(&self, id: EntityId) -> Option<usize> {
        match self.sparse.get(id as usize) {
            Some(&slot) if slot != VACANT => Some(slot),
            _ => None,
        }
    }

    fn ensure_sparse(&mut self, id: EntityId) {
        let index = id as usize;
        if index >= self.sparse.len() {
            self.sparse.resize(index + 1, VACANT);
        }
    }

    /// Returns `true` if a wrapper (sentinel or not) is stored for `id`.
    #[inline]
    pub fn contains(&self, id: EntityId) -> bool {
        self.slot(id).is_some()
    }

    /// Borrows the wrapper for `id`, if present. Never materialises a
    /// sentinel; that is a manager-level concern.
    pub fn get(&self, id: EntityId) -> Option<&Components<T>> {
        self.slot(id).map(|slot| &self.dense[slot])
    }

    /// Mutably borrows the wrapper for `id`, if present.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Components<T>> {
        let slot = self.slot(id)?;
        Some(&mut self.dense[slot])
    }

    /// Writes a wrapper at the dense tail and indexes it under `id`.
    ///
    /// Refused (returning `false`) when the set is locked or `id` is
    /// already present; an existing wrapper is replaced only through
    /// [`overwrite`](Self::overwrite).
    pub fn insert(&mut self, id: EntityId, components: Components<T>) -> bool {
        // Id 0 carries only the singleton sentinel.
        debug_assert!(id != NO_ENTITY || components.is_empty_sentinel());
        if self.locked || self.contains(id) {
            return false;
        }
        self.ensure_sparse(id);
        self.sparse[id as usize] = self.dense.len();
        self.dense.push(components);
        self.ids.push(id);
        true
    }

    /// Constructs a one-element wrapper in place for `id`.
    ///
    /// Returns the wrapper on success, or `None` when the set is locked
    /// (the null indicator the manager surfaces as a refused add).
    pub fn emplace(&mut self, id: EntityId, component: T) -> Option<&mut Components<T>> {
        if !self.insert(id, Components::single(component)) {
            return None;
        }
        self.get_mut(id)
    }

    /// Replaces the stored wrapper for `id`. Passes through the lock so a
    /// unique owner can be overwritten in place.
    ///
    /// Returns `false` if `id` is not present.
    pub fn overwrite(&mut self, id: EntityId, components: Components<T>) -> bool {
        match self.slot(id) {
            Some(slot) => {
                self.dense[slot] = components;
                true
            }
            None => false,
        }
    }

    /// Removes the wrapper for `id`, swap-filling the dense hole from the
    /// tail. Returns `true` if a wrapper was removed.
    pub fn erase(&mut self, id: EntityId) -> bool {
        let Some(slot) = self.slot(id) else {
            return false;
        };

        self.dense.swap_remove(slot);
        self.ids.swap_remove(slot);

        // The former tail wrapper now lives at `slot`; re-point its sparse
        // entry (unless the tail itself was removed).
        if slot < self.ids.len() {
            let moved = self.ids[slot];
            self.sparse[moved as usize] = slot;
        }
        self.sparse[id as usize] = VACANT;
        true
    }

    /// Visits every non-sentinel wrapper in dense order.
    ///
    /// Sentinels encountered along the way are pruned opportunistically,
    /// which keeps singleton scans from tripping over stale dummies.
    pub fn each(&mut self, mut f: impl FnMut(EntityId, &mut Components<T>)) {
        let mut slot = 0;
        while slot < self.dense.len() {
            if self.dense[slot].is_empty_sentinel() {
                // Swap-remove refills this slot from the tail; revisit it.
                let id = self.ids[slot];
                self.erase(id);
                continue;
            }
            f(self.ids[slot], &mut self.dense[slot]);
            slot += 1;
        }
    }

    /// Visits every wrapper, sentinels included. This is the view pruning
    /// walks.
    pub fn each_with_empty(&self, mut f: impl FnMut(EntityId, &Components<T>)) {
        for (slot, components) in self.dense.iter().enumerate() {
            f(self.ids[slot], components);
        }
    }

    /// Mutable variant of [`each_with_empty`](Self::each_with_empty).
    pub fn each_with_empty_mut(&mut self, mut f: impl FnMut(EntityId, &mut Components<T>)) {
        for (slot, components) in self.dense.iter_mut().enumerate() {
            f(self.ids[slot], components);
        }
    }

    /// Mutably borrows the wrappers of `N` pairwise distinct, present ids
    /// at once.
    ///
    /// ## Panics
    /// Panics if any id is absent or the ids are not pairwise distinct.
    pub fn get_disjoint_mut<const N: usize>(
        &mut self,
        ids: [EntityId; N],
    ) -> [&mut Components<T>; N] {
        let slots = ids.map(|id| match self.slot(id) {
            Some(slot) => slot,
            None => panic!("no {} wrapper stored for entity {id}", type_name::<T>()),
        });
        match self.dense.get_disjoint_mut(slots) {
            Ok(wrappers) => wrappers,
            Err(_) => panic!("disjoint wrapper access requires pairwise distinct entity ids"),
        }
    }
}

/// Structural view of a sparse set with the element type erased.
///
/// The manager stores every set behind this trait and recovers the concrete
/// type with a verified downcast through [`as_any`](Self::as_any). The
/// structural surface is everything tag-driven iteration is allowed to do.
pub trait ErasedComponentSet: Any {
    /// Number of stored wrappers, sentinels included.
    fn len(&self) -> usize;

    /// Returns `true` if the set refuses inserts.
    fn is_locked(&self) -> bool;

    /// The dense entity id array.
    fn ids(&self) -> &[EntityId];

    /// Removes the wrapper for `id`. Returns `true` if one was removed.
    fn erase(&mut self, id: EntityId) -> bool;

    /// Visits `(entity, wrapper element count)` for every wrapper,
    /// sentinels included.
    fn each_sizes(&self, f: &mut dyn FnMut(EntityId, usize));

    /// `TypeId` of the element type `T`.
    fn element_type_id(&self) -> TypeId;

    /// Name of the element type, for diagnostics.
    fn element_type_name(&self) -> &'static str;

    /// Upcast for the verified concrete-type downcast.
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for the verified concrete-type downcast.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> ErasedComponentSet for SparseSet<T> {
    fn len(&self) -> usize {
        self.dense.len()
    }

    fn is_locked(&self) -> bool {
        self.locked
    }

    fn ids(&self) -> &[EntityId] {
        &self.ids
    }

    fn erase(&mut self, id: EntityId) -> bool {
        SparseSet::erase(self, id)
    }

    fn each_sizes(&self, f: &mut dyn FnMut(EntityId, usize)) {
        for (slot, components) in self.dense.iter().enumerate() {
            f(self.ids[slot], components.len());
        }
    }

    fn element_type_id(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn element_type_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
