//! # Component Tags
//!
//! Compile-time storage and access policies for component types.
//!
//! ## Purpose
//! A component type may declare membership in any subset of seven orthogonal
//! tag families. Membership alters how the manager stores and serves the
//! component — uniqueness locking, stacking, required-read assertions, lazy
//! transformation, and the event/effect conventions — without any branching
//! at call sites.
//!
//! ## Declaration model
//! Tags are declared through the [`Component`] trait's `TAGS` constant:
//!
//! ```rust
//! use ecm_framework::engine::tags::{Component, Tag, TagSet};
//!
//! struct Hit(u32);
//!
//! impl Component for Hit {
//!     const TAGS: TagSet = TagSet::new().with(Tag::Stack);
//! }
//! ```
//!
//! Predicates over the set are `const` and evaluate to constants after
//! monomorphisation, so policy checks compile down to straight-line code.
//!
//! ## Invariants
//! - `Stack` and `NoStack` are mutually exclusive; every manager entry point
//!   that touches a set asserts coherence in a `const` block, so a type
//!   declaring both fails to compile.
//! - The default, when neither stacking tag is declared, is `NoStack`
//!   semantics: a wrapper holds at most one instance.

/// Policy tag families a component type may belong to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tag {
    /// Indexed under the event tag; conventionally consumed and cleared
    /// each frame.
    Event,
    /// Indexed under the effect tag; carries cleanup state and an optional
    /// timer (see [`crate::engine::effect`]).
    Effect,
    /// A wrapper may hold multiple instances for one entity.
    Stack,
    /// A wrapper holds at most one instance; a second add is refused.
    NoStack,
    /// A registered transformation function is applied on read.
    Transform,
    /// Reads assert the set exists; clears warn in debug builds.
    Required,
    /// The set locks after the first real add; only one entity may own a
    /// populated wrapper.
    Unique,
}

impl Tag {
    /// Every tag family, in declaration order.
    pub const ALL: [Tag; 7] = [
        Tag::Event,
        Tag::Effect,
        Tag::Stack,
        Tag::NoStack,
        Tag::Transform,
        Tag::Required,
        Tag::Unique,
    ];

    #[inline]
    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Bitset of [`Tag`] memberships, buildable in `const` context.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TagSet(u8);

impl TagSet {
    /// The empty tag set.
    #[inline]
    pub const fn new() -> Self {
        Self(0)
    }

    /// Returns this set with `tag` added.
    #[inline]
    pub const fn with(self, tag: Tag) -> Self {
        Self(self.0 | tag.bit())
    }

    /// Returns `true` if `tag` is a member.
    #[inline]
    pub const fn contains(self, tag: Tag) -> bool {
        self.0 & tag.bit() != 0
    }

    /// Returns `true` if no tag is a member.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns `false` if the set asserts both `Stack` and `NoStack`.
    #[inline]
    pub const fn is_coherent(self) -> bool {
        !(self.contains(Tag::Stack) && self.contains(Tag::NoStack))
    }

    /// Iterates over the member tags.
    pub fn iter(self) -> impl Iterator<Item = Tag> {
        Tag::ALL.into_iter().filter(move |tag| self.contains(*tag))
    }
}

/// A component type storable in the manager.
///
/// Implementations are plain data records; the trait only contributes the
/// tag declaration. The manager imposes no layout constraints.
pub trait Component: Sized + 'static {
    /// Tag memberships for this component type.
    const TAGS: TagSet = TagSet::new();
}

/// Returns `true` if `T` carries the `Event` tag.
#[inline]
pub const fn is_event<T: Component>() -> bool {
    T::TAGS.contains(Tag::Event)
}

/// Returns `true` if `T` carries the `Effect` tag.
#[inline]
pub const fn is_effect<T: Component>() -> bool {
    T::TAGS.contains(Tag::Effect)
}

/// Returns `true` if `T` carries the `Stack` tag.
#[inline]
pub const fn is_stacked<T: Component>() -> bool {
    T::TAGS.contains(Tag::Stack)
}

/// Returns `true` if `T` carries the `NoStack` tag.
#[inline]
pub const fn is_not_stacked<T: Component>() -> bool {
    T::TAGS.contains(Tag::NoStack)
}

/// Returns `true` if `T` carries the `Transform` tag.
#[inline]
pub const fn is_transform<T: Component>() -> bool {
    T::TAGS.contains(Tag::Transform)
}

/// Returns `true` if `T` carries the `Required` tag.
#[inline]
pub const fn is_required<T: Component>() -> bool {
    T::TAGS.contains(Tag::Required)
}

/// Returns `true` if `T` carries the `Unique` tag.
#[inline]
pub const fn is_unique<T: Component>() -> bool {
    T::TAGS.contains(Tag::Unique)
}

/// Stacking policy for `T`: only an explicit `Stack` tag permits more than
/// one instance per entity.
#[inline]
pub const fn should_stack<T: Component>() -> bool {
    T::TAGS.contains(Tag::Stack)
}
