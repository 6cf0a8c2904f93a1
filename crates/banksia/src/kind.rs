use crate::entry::TypeKey;
use serde::{Deserialize, Serialize};

/// Owned lookup from sub-object kind name to its stable [`TypeKey`].
///
/// Hosts that already carry a stable numbering (engine class ids and the
/// like) can skip this entirely and build [`TypeKey`] values themselves;
/// this is for the ones that don't. Keys are handed out sequentially from 1
/// in registration order, so a registry persisted next to the project keeps
/// its numbering stable across sessions.
///
/// Deliberately an owned value, constructed where it is needed, not a
/// process-wide static.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindRegistry {
    kinds: Vec<String>,
}

impl KindRegistry {
    /// Creates an empty [`KindRegistry`].
    pub fn new() -> Self {
        Self { kinds: Vec::new() }
    }

    /// Registers a kind name and returns its [`TypeKey`].
    ///
    /// Re-registering a known name returns the key it already has.
    pub fn register(&mut self, name: impl Into<String>) -> TypeKey {
        let name = name.into();
        if let Some(existing) = self.resolve(&name) {
            return existing;
        }
        self.kinds.push(name);
        TypeKey::new(self.kinds.len() as i32)
    }

    /// Resolves a kind name to its [`TypeKey`], if registered.
    pub fn resolve(&self, name: &str) -> Option<TypeKey> {
        self.kinds
            .iter()
            .position(|kind| kind == name)
            .map(|index| TypeKey::new(index as i32 + 1))
    }

    /// Fetches the kind name behind a [`TypeKey`].
    pub fn name_of(&self, key: TypeKey) -> Option<&str> {
        let index = usize::try_from(key.raw().checked_sub(1)?).ok()?;
        self.kinds.get(index).map(String::as_str)
    }

    /// Iterates over all registered kinds in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (TypeKey, &str)> {
        self.kinds
            .iter()
            .enumerate()
            .map(|(index, name)| (TypeKey::new(index as i32 + 1), name.as_str()))
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}
