use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Stable numeric identifier for a sub-object kind (animation clip, material
/// slot, embedded mesh and so on).
///
/// The mapping from kind to number is supplied by the host, either through a
/// [`KindRegistry`](crate::kind::KindRegistry) or from its own numbering
/// scheme. Whatever produces it, the number must never change between
/// imports; it is half of every table key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeKey(i32);

impl TypeKey {
    /// Creates a new [`TypeKey`] from a raw numeric kind identifier.
    pub fn new(raw: impl Into<i32>) -> Self {
        Self(raw.into())
    }

    /// Returns the raw/primitive [`i32`] value.
    pub fn raw(&self) -> i32 {
        self.0
    }
}

impl Display for TypeKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable 64-bit identifier for one sub-object, scoped per [`TypeKey`].
///
/// Zero is reserved as the "not allocated" sentinel. A [`LocalId`] stored
/// inside a table is always non-zero; the allocator retries derivation until
/// it has one. Downstream systems hold these across re-imports, which is the
/// whole point: the id stays put while the display name moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LocalId(i64);

impl LocalId {
    /// Creates a new [`LocalId`].
    ///
    /// This does not check the reserved-zero rule; that is enforced where
    /// ids enter a table.
    pub fn new(raw: impl Into<i64>) -> Self {
        Self(raw.into())
    }

    /// Returns the raw/primitive [`i64`] value.
    pub fn raw(&self) -> i64 {
        self.0
    }

    /// Whether this is the reserved zero sentinel.
    pub fn is_reserved(&self) -> bool {
        self.0 == 0
    }
}

impl Display for LocalId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One persisted record of an identity table: which kind of sub-object,
/// which stable id, and the name it currently goes by.
///
/// Serialized as-is; the on-disk table is the ordered sequence of these and
/// must round-trip in the exact same order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdEntry {
    pub type_key: TypeKey,
    pub local_id: LocalId,
    pub name: String,
}

impl IdEntry {
    /// Creates a new [`IdEntry`].
    pub fn new(type_key: TypeKey, local_id: LocalId, name: impl Into<String>) -> Self {
        Self {
            type_key,
            local_id,
            name: name.into(),
        }
    }
}

impl Display for IdEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}:{}] {}", self.type_key, self.local_id, self.name)
    }
}
