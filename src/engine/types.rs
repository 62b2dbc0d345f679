//! Core identifier types and sizing constants shared across the ECM.
//!
//! Entities are plain unsigned integers. They have no object representation:
//! an entity exists exactly inasmuch as at least one component set contains
//! it. Id `0` is reserved to mean "no entity", and a small band of low ids is
//! held back for singleton bookkeeping, so the allocator starts above the
//! watermark and counts up monotonically for the lifetime of the process.

/// Opaque entity identifier.
pub type EntityId = u32;

/// Reserved id meaning "no entity / dummy". Never allocated.
pub const NO_ENTITY: EntityId = 0;

/// Ids below this watermark are reserved for singletons and are never
/// handed out by [`crate::engine::entity::EntityAllocator`].
pub const RESERVED_ENTITIES: EntityId = 10;

/// Initial sparse capacity for sets created only to be iterated or erased
/// from, where no component data is expected yet.
pub const MIN_SET_SIZE: usize = 100;

/// Initial sparse capacity for sets created on a read or write path.
pub const STANDARD_SET_SIZE: usize = 10_024;

const _: [(); 1] = [(); (RESERVED_ENTITIES > NO_ENTITY) as usize];
const _: [(); 1] = [(); (MIN_SET_SIZE <= STANDARD_SET_SIZE) as usize];
const _: [(); 1] = [(); (MIN_SET_SIZE > 0) as usize];
