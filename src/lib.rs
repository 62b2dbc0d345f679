//! # ECM Framework
//!
//! Type-erased, tag-aware **Entity-Component Manager** organising
//! heterogeneous component data around stable integer entity identifiers.
//!
//! ## Design Goals
//! - Sparse-set storage: O(1) insert/erase/lookup, dense iteration
//! - Compile-time tag policies (Unique, Stack/NoStack, Required, Event,
//!   Effect, Transform) with no branching at call sites
//! - Sentinel-on-read: references returned by the manager are always valid
//! - Single-threaded, synchronous, externally scheduled
//!
//! Systems are external free functions that consume the manager; this crate
//! schedules nothing and renders nothing.
//!
//! ## Example
//! ```rust
//! use ecm_framework::prelude::*;
//!
//! #[derive(Debug, PartialEq)]
//! struct Hit(u32);
//!
//! impl Component for Hit {
//!     const TAGS: TagSet = TagSet::new().with(Tag::Stack);
//! }
//!
//! let mut ecm = EntityComponentManager::new();
//! let player = ecm.create_entity();
//!
//! ecm.add(player, Hit(5));
//! ecm.add(player, Hit(7));
//! assert_eq!(ecm.get::<Hit>(player).len(), 2);
//! ```

#![forbid(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]

pub mod engine;

// ─────────────────────────────────────────────────────────────────────────────
// Re-exports (Public API)
// ─────────────────────────────────────────────────────────────────────────────

// Core manager types

pub use engine::manager::{
    EntityComponentManager,
    Transformation,
};

pub use engine::component::{
    Components,
    ComponentFlags,
    FilteredComponents,
};

pub use engine::sparse_set::{
    SparseSet,
    ErasedComponentSet,
};

pub use engine::tags::{
    Component,
    Tag,
    TagSet,
    is_event,
    is_effect,
    is_stacked,
    is_not_stacked,
    is_transform,
    is_required,
    is_unique,
    should_stack,
};

pub use engine::gather::{ComponentList, Gather};

pub use engine::entity::EntityAllocator;

pub use engine::effect::{EffectState, Timer};

pub use engine::error::{
    EcmError,
    TypeMismatchError,
    MissingRequiredComponentError,
    ReadEmptyComponentError,
    UniqueOwnershipError,
    LockedSetError,
    NoStackError,
};

pub use engine::types::{
    EntityId,
    NO_ENTITY,
    RESERVED_ENTITIES,
    MIN_SET_SIZE,
    STANDARD_SET_SIZE,
};

// ─────────────────────────────────────────────────────────────────────────────
// Prelude (Optional but recommended)
// ─────────────────────────────────────────────────────────────────────────────

/// Commonly used manager types.
///
/// Import with:
/// ```rust
/// use ecm_framework::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        EntityComponentManager,
        Components,
        SparseSet,
        Component,
        Tag,
        TagSet,
        EntityId,
        EffectState,
    };
}
