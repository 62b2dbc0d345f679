//! Error types for component storage and manager operations.
//!
//! This module declares focused, composable error types used across the
//! sparse-set storage and manager layers. Each error carries enough context
//! to make failures actionable while remaining small and cheap to pass
//! around or convert into the aggregate [`EcmError`].
//!
//! ## Propagation model
//! The taxonomy splits into two severities:
//!
//! * **Fatal** — [`TypeMismatchError`], [`MissingRequiredComponentError`],
//!   [`ReadEmptyComponentError`], and (in debug builds)
//!   [`UniqueOwnershipError`]. These indicate corruption or a broken caller
//!   contract; the operation panics with the error's `Display` output and
//!   never partially mutates state.
//! * **Recoverable** — [`NoStackError`], [`LockedSetError`], and (in release
//!   builds) [`UniqueOwnershipError`]. The operation is refused, the error is
//!   surfaced through the `log` facade, and a benign value is returned.
//!
//! ## Display vs. Debug
//! * `Display` is optimized for operator logs (short, imperative phrasing).
//! * `Debug` (derived) retains full structure for diagnostics.

use std::fmt;

use crate::engine::types::EntityId;


/// Returned when an erased set handle cannot be downcast to the requested
/// concrete element type.
///
/// This indicates data corruption or a wrong type key in the component-type
/// index, and is always fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeMismatchError {
    /// Type name the caller requested.
    pub expected: &'static str,

    /// Type name the erased handle actually stores.
    pub actual: &'static str,
}

impl fmt::Display for TypeMismatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "type mismatch: expected set of {}, found set of {}",
            self.expected, self.actual
        )
    }
}

impl std::error::Error for TypeMismatchError {}

/// Returned when a read targets a `Required`-tagged component type whose
/// set does not exist. Fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingRequiredComponentError {
    /// Name of the required component type.
    pub name: &'static str,
}

impl fmt::Display for MissingRequiredComponentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "read against required component {} with no stored set", self.name)
    }
}

impl std::error::Error for MissingRequiredComponentError {}

/// Returned when `peek` is applied to a wrapper with no elements.
///
/// Empty wrappers arise as read-materialised sentinels or after every
/// element has been removed; neither has a first element to inspect. Fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadEmptyComponentError {
    /// Name of the component type that was peeked.
    pub name: &'static str,
}

impl fmt::Display for ReadEmptyComponentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "peek on an empty {} wrapper", self.name)
    }
}

impl std::error::Error for ReadEmptyComponentError {}

/// Returned when `overwrite` targets a `Unique` component through an entity
/// that is not the current sole owner.
///
/// Fatal in debug builds, downgraded to a logged warning otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniqueOwnershipError {
    /// Entity the caller supplied.
    pub entity: EntityId,

    /// Entity that actually owns the unique component.
    pub owner: EntityId,

    /// Name of the unique component type.
    pub name: &'static str,
}

impl fmt::Display for UniqueOwnershipError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "entity {} is not the owning entity ({}) of unique component {}",
            self.entity, self.owner, self.name
        )
    }
}

impl std::error::Error for UniqueOwnershipError {}

/// Returned when `add` targets a locked (`Unique`) set after its initial
/// owner was established.
///
/// The add is refused and the set is left unchanged. Reads are unaffected:
/// sentinel creation unlocks around the insert and re-locks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockedSetError {
    /// Entity whose add was refused.
    pub entity: EntityId,

    /// Name of the unique component type.
    pub name: &'static str,
}

impl fmt::Display for LockedSetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "add of {} for entity {} refused: set is locked by a unique owner",
            self.name, self.entity
        )
    }
}

impl std::error::Error for LockedSetError {}

/// Returned when a second `add` targets a `NoStack` component an entity
/// already holds. The add is refused and the wrapper keeps its one element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoStackError {
    /// Entity whose add was refused.
    pub entity: EntityId,

    /// Name of the non-stacking component type.
    pub name: &'static str,
}

impl fmt::Display for NoStackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "entity {} already contains non-stacking {}, add refused",
            self.entity, self.name
        )
    }
}

impl std::error::Error for NoStackError {}

/// Aggregate error for manager operations.
///
/// Conversions (`From<T>`) are implemented for every low-level error so
/// logging and panic sites can format a single expressive type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EcmError {
    /// An erased set handle failed the downcast to its requested type.
    TypeMismatch(TypeMismatchError),

    /// A required component was read with no stored set.
    MissingRequired(MissingRequiredComponentError),

    /// A wrapper with no elements was peeked.
    ReadEmpty(ReadEmptyComponentError),

    /// A unique component was overwritten through a non-owning entity.
    UniqueOwnership(UniqueOwnershipError),

    /// An add targeted a locked unique set.
    LockedSet(LockedSetError),

    /// A second add targeted a non-stacking component.
    NoStack(NoStackError),
}

impl fmt::Display for EcmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EcmError::TypeMismatch(e) => write!(f, "{e}"),
            EcmError::MissingRequired(e) => write!(f, "{e}"),
            EcmError::ReadEmpty(e) => write!(f, "{e}"),
            EcmError::UniqueOwnership(e) => write!(f, "{e}"),
            EcmError::LockedSet(e) => write!(f, "{e}"),
            EcmError::NoStack(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for EcmError {}

impl From<TypeMismatchError> for EcmError {
    fn from(e: TypeMismatchError) -> Self { EcmError::TypeMismatch(e) }
}
impl From<MissingRequiredComponentError> for EcmError {
    fn from(e: MissingRequiredComponentError) -> Self { EcmError::MissingRequired(e) }
}
impl From<ReadEmptyComponentError> for EcmError {
    fn from(e: ReadEmptyComponentError) -> Self { EcmError::ReadEmpty(e) }
}
impl From<UniqueOwnershipError> for EcmError {
    fn from(e: UniqueOwnershipError) -> Self { EcmError::UniqueOwnership(e) }
}
impl From<LockedSetError> for EcmError {
    fn from(e: LockedSetError) -> Self { EcmError::LockedSet(e) }
}
impl From<NoStackError> for EcmError {
    fn from(e: NoStackError) -> Self { EcmError::NoStack(e) }
}
