use crate::entry::{LocalId, TypeKey};
use thiserror::Error;

/// Contract violations a table rejects outright.
///
/// None of these are "not found"; misses are signalled with [`Option`] and
/// [`bool`] returns instead. Every variant here means the caller handed the
/// table input it must not accept, and the table is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// Local id 0 is the "not allocated" sentinel and can never be stored.
    #[error("local id 0 is reserved and cannot be registered (type key {type_key})")]
    ReservedId { type_key: TypeKey },

    /// Sub-object names are display names, but an empty one would make the
    /// `(type key, name)` key useless.
    #[error("sub-object name cannot be empty (type key {type_key})")]
    EmptyName { type_key: TypeKey },

    /// The `(type key, local id)` pair is already present.
    #[error("local id {local_id} is already registered for type key {type_key}")]
    DuplicateId { type_key: TypeKey, local_id: LocalId },

    /// The `(type key, name)` pair is already present.
    #[error("name '{name}' is already registered for type key {type_key}")]
    DuplicateName { type_key: TypeKey, name: String },

    /// A batch rename was handed old/new slices of different lengths.
    #[error("rename batch length mismatch: {old_len} old names against {new_len} new names")]
    BatchLengthMismatch { old_len: usize, new_len: usize },
}
