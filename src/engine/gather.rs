//! # Multi-Component Access
//!
//! Variadic surface over the manager: operate on several component types in
//! one call.
//!
//! ## Purpose
//! The manager's single-type operations generalise to groups through two
//! traits:
//!
//! - [`ComponentList`] — structural enumeration of a group's type keys,
//!   backing `clear`, `prune`, and `clear_by_entity`.
//! - [`Gather`] — typed split-borrows: a tuple of wrapper references for one
//!   entity (`gather`) or a tuple of set references for bulk iteration
//!   (`gather_all`).
//!
//! Both are implemented for bare component types and for tuples up to four
//! elements, so `ecm.clear::<Position>()` and
//! `ecm.gather::<(Position, Velocity)>(id)` read the same way.
//!
//! ## Safety
//! Tuple gathering hands out simultaneous `&mut` borrows into different
//! sparse sets. Every requested wrapper/set is materialised first, the
//! element types are asserted pairwise distinct, and only then are the raw
//! pointers taken; distinct element types resolve to distinct sets, so the
//! borrows never alias. Requesting the same type twice panics.

use std::any::{TypeId, type_name};

use crate::engine::component::Components;
use crate::engine::manager::EntityComponentManager;
use crate::engine::sparse_set::SparseSet;
use crate::engine::tags::{Component, TagSet};
use crate::engine::types::EntityId;


/// Structural enumeration of a group of component types.
pub trait ComponentList {
    /// Calls `f` with the type key, type name, and tag set of every member.
    fn for_each_type(f: &mut dyn FnMut(TypeId, &'static str, TagSet));
}

impl<T: Component> ComponentList for T {
    fn for_each_type(f: &mut dyn FnMut(TypeId, &'static str, TagSet)) {
        f(TypeId::of::<T>(), type_name::<T>(), T::TAGS);
    }
}

/// Typed split-borrow access to a group of component types.
pub trait Gather: ComponentList {
    /// Wrapper references for one entity, one per member type.
    type Wrappers<'w>;

    /// Set references, one per member type.
    type Sets<'w>;

    /// Materialises (if necessary) and borrows the wrappers of `id`.
    fn gather(ecm: &mut EntityComponentManager, id: EntityId) -> Self::Wrappers<'_>;

    /// Creates (if necessary) and borrows the sparse sets.
    fn gather_all(ecm: &mut EntityComponentManager) -> Self::Sets<'_>;
}

impl<T: Component> Gather for T {
    type Wrappers<'w> = &'w mut Components<T>;
    type Sets<'w> = &'w mut SparseSet<T>;

    fn gather(ecm: &mut EntityComponentManager, id: EntityId) -> Self::Wrappers<'_> {
        ecm.get::<T>(id)
    }

    fn gather_all(ecm: &mut EntityComponentManager) -> Self::Sets<'_> {
        ecm.get_all::<T>()
    }
}

fn assert_distinct(type_ids: &[TypeId]) {
    for (index, first) in type_ids.iter().enumerate() {
        for second in &type_ids[index + 1..] {
            assert!(
                first != second,
                "gather requires pairwise distinct component types"
            );
        }
    }
}

macro_rules! impl_gather_for_tuple {
    ($($t:ident),+) => {
        impl<$($t: Component),+> ComponentList for ($($t,)+) {
            fn for_each_type(f: &mut dyn FnMut(TypeId, &'static str, TagSet)) {
                $( f(TypeId::of::<$t>(), type_name::<$t>(), $t::TAGS); )+
            }
        }

        impl<$($t: Component),+> Gather for ($($t,)+) {
            type Wrappers<'w> = ($(&'w mut Components<$t>,)+);
            type Sets<'w> = ($(&'w mut SparseSet<$t>,)+);

            fn gather(ecm: &mut EntityComponentManager, id: EntityId) -> Self::Wrappers<'_> {
                assert_distinct(&[$(TypeId::of::<$t>()),+]);
                $( ecm.get::<$t>(id); )+
                // Distinct element types resolve to distinct sets; the
                // pointers below never alias.
                #[allow(non_snake_case)]
                let ($($t,)+) = ($(ecm.wrapper_ptr::<$t>(id),)+);
                unsafe { ($(&mut *$t,)+) }
            }

            fn gather_all(ecm: &mut EntityComponentManager) -> Self::Sets<'_> {
                assert_distinct(&[$(TypeId::of::<$t>()),+]);
                #[allow(non_snake_case)]
                let ($($t,)+) = ($(ecm.set_ptr::<$t>(),)+);
                unsafe { ($(&mut *$t,)+) }
            }
        }
    };
}

impl_gather_for_tuple!(A);
impl_gather_for_tuple!(A, B);
impl_gather_for_tuple!(A, B, C);
impl_gather_for_tuple!(A, B, C, D);
