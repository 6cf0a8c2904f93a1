use crate::entry::{LocalId, TypeKey};
use sha2::{Digest, Sha256};

/// The id-generation seam of the table.
///
/// [`IdentityTable::allocate_or_lookup`](crate::table::IdentityTable::allocate_or_lookup)
/// asks a deriver for candidate ids. Implementations must be pure: the same
/// `(type_key, name, salt)` always derives the same id. The salt starts at 0
/// and only advances when the table rejects a candidate (zero, or already
/// taken for that type key), so a fresh table allocates deterministically.
///
/// Returning the reserved zero id is allowed; the table treats it as "try
/// the next salt".
pub trait IdDeriver {
    /// Derives a candidate [`LocalId`] for a named sub-object.
    fn derive_id(&self, type_key: TypeKey, name: &str, salt: u64) -> LocalId;
}

/// Default deriver: a SHA-256 content hash of the key material.
///
/// Hashes the little-endian type key, the raw name bytes and the
/// little-endian salt, then takes the first 8 digest bytes as a
/// little-endian [`i64`]. Ids therefore span the full 64-bit range,
/// negatives included.
#[derive(Clone, Copy, Debug, Default)]
pub struct ContentHashDeriver;

impl IdDeriver for ContentHashDeriver {
    fn derive_id(&self, type_key: TypeKey, name: &str, salt: u64) -> LocalId {
        let mut hasher = Sha256::new();
        hasher.update(type_key.raw().to_le_bytes());
        hasher.update(name.as_bytes());
        hasher.update(salt.to_le_bytes());
        let digest = hasher.finalize();

        let mut raw = [0u8; 8];
        raw.copy_from_slice(&digest[..8]);
        LocalId::new(i64::from_le_bytes(raw))
    }
}
