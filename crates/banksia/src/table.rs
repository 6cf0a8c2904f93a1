use crate::derive::IdDeriver;
use crate::entry::{IdEntry, LocalId, TypeKey};
use crate::error::TableError;
use serde::{Deserialize, Serialize};

/// The identity table an importer keeps next to each asset: an ordered list
/// of `(type key, local id, name)` records giving every named sub-object a
/// stable 64-bit id.
///
/// Names are the mutable half. A clip renamed in the source file keeps its
/// id through [`IdentityTable::rename`] / [`IdentityTable::rename_batch`],
/// so downstream references survive the re-import. Within one table,
/// `(type key, local id)` and `(type key, name)` pairs are both unique.
///
/// Entry order is insertion order. It carries no meaning beyond stable
/// serialization, but removal compacts in place rather than swapping with
/// the tail, so the survivors keep their relative order.
///
/// A table belongs to exactly one asset and is edited synchronously by its
/// owner; clone it or wrap it in a lock yourself if you need anything
/// fancier.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityTable {
    entries: Vec<IdEntry>,
}

impl IdentityTable {
    /// Creates an empty [`IdentityTable`].
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends a new entry.
    ///
    /// The id must be non-zero and the name non-empty, and neither may
    /// already be taken for this type key. Violations are rejected without
    /// touching the table; routing allocation through
    /// [`IdentityTable::allocate_or_lookup`] guarantees them by
    /// construction.
    pub fn register(
        &mut self,
        type_key: TypeKey,
        local_id: LocalId,
        name: impl Into<String>,
    ) -> Result<(), TableError> {
        let name = name.into();
        if local_id.is_reserved() {
            return Err(TableError::ReservedId { type_key });
        }
        if name.is_empty() {
            return Err(TableError::EmptyName { type_key });
        }
        if self.contains_id(type_key, local_id) {
            return Err(TableError::DuplicateId { type_key, local_id });
        }
        if self.contains(type_key, &name) {
            return Err(TableError::DuplicateName { type_key, name });
        }

        self.entries.push(IdEntry::new(type_key, local_id, name));
        Ok(())
    }

    /// Removes the entry matching all three fields exactly.
    ///
    /// Returns whether an entry was removed; a miss is a no-op, not an
    /// error. The remaining entries keep their relative order.
    pub fn unregister(&mut self, type_key: TypeKey, local_id: LocalId, name: &str) -> bool {
        let position = self.entries.iter().position(|entry| {
            entry.type_key == type_key && entry.local_id == local_id && entry.name == name
        });
        match position {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Fetches the id registered for `(type_key, name)`, if any.
    ///
    /// First match wins.
    pub fn lookup(&self, type_key: TypeKey, name: &str) -> Option<LocalId> {
        self.entries
            .iter()
            .find(|entry| entry.type_key == type_key && entry.name == name)
            .map(|entry| entry.local_id)
    }

    /// Returns the id for `(type_key, name)`, allocating one on first sight.
    ///
    /// A name already in the table gets its existing id back unchanged;
    /// repeated imports of an unrenamed sub-object always resolve to the
    /// same id. A fresh name gets a candidate from `deriver` at salt 0; the
    /// salt advances only while the candidate is zero or collides with an
    /// id already stored for this type key, so allocation into a fresh
    /// table is a pure function of `(type_key, name)`.
    pub fn allocate_or_lookup<D: IdDeriver + ?Sized>(
        &mut self,
        type_key: TypeKey,
        name: &str,
        deriver: &D,
    ) -> Result<LocalId, TableError> {
        if let Some(existing) = self.lookup(type_key, name) {
            return Ok(existing);
        }
        if name.is_empty() {
            return Err(TableError::EmptyName { type_key });
        }

        let mut salt = 0u64;
        let local_id = loop {
            let candidate = deriver.derive_id(type_key, name, salt);
            if !candidate.is_reserved() && !self.contains_id(type_key, candidate) {
                break candidate;
            }
            log::debug!(
                "derived id {} for '{}' (type key {}) at salt {} is unusable, retrying",
                candidate,
                name,
                type_key,
                salt
            );
            salt += 1;
        };

        self.entries.push(IdEntry::new(type_key, local_id, name));
        log::debug!("allocated id {} for '{}' (type key {})", local_id, name, type_key);
        Ok(local_id)
    }

    /// Renames the entry registered under `(type_key, old_name)`, keeping
    /// its id.
    ///
    /// Returns the preserved id, or [`None`] when no such entry exists:
    /// the asset had no sub-object with that name, so there is nothing to
    /// migrate. The caller is responsible for not renaming onto a name the
    /// type key already holds.
    pub fn rename(
        &mut self,
        type_key: TypeKey,
        old_name: &str,
        new_name: impl Into<String>,
    ) -> Option<LocalId> {
        let entry = self
            .entries
            .iter_mut()
            .find(|entry| entry.type_key == type_key && entry.name == old_name)?;
        entry.name = new_name.into();
        Some(entry.local_id)
    }

    /// Applies `old_names[i] -> new_names[i]` renames in one pass.
    ///
    /// Every entry is matched against the names the table held when the
    /// batch started: the scan visits each entry once and never revisits
    /// one it already rewrote, so swaps (`A -> B` alongside `B -> A`) land
    /// on the right entries instead of chasing each other. Each requested
    /// pair matches at most once and the scan stops as soon as all pairs
    /// have matched.
    ///
    /// Returns how many renames were applied; pairs whose old name is not
    /// in the table are skipped silently. Mismatched slice lengths are
    /// rejected before anything is touched. Assumes names are unique per
    /// type key, in the table and in `old_names` alike.
    pub fn rename_batch(
        &mut self,
        type_key: TypeKey,
        old_names: &[&str],
        new_names: &[&str],
    ) -> Result<usize, TableError> {
        if old_names.len() != new_names.len() {
            return Err(TableError::BatchLengthMismatch {
                old_len: old_names.len(),
                new_len: new_names.len(),
            });
        }

        let mut matched = vec![false; old_names.len()];
        let mut remaining = old_names.len();
        for entry in &mut self.entries {
            if remaining == 0 {
                break;
            }
            if entry.type_key != type_key {
                continue;
            }
            let pair = (0..old_names.len()).find(|&i| !matched[i] && entry.name == old_names[i]);
            if let Some(index) = pair {
                entry.name = new_names[index].to_string();
                matched[index] = true;
                remaining -= 1;
            }
        }

        if remaining > 0 {
            log::warn!(
                "batch rename for type key {} matched {} of {} requested names",
                type_key,
                old_names.len() - remaining,
                old_names.len()
            );
        }
        Ok(old_names.len() - remaining)
    }

    /// Fetches the current name behind `(type_key, local_id)`: the reverse
    /// read re-import code performs when it rebuilds sub-objects from
    /// stored ids.
    pub fn name_of(&self, type_key: TypeKey, local_id: LocalId) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.type_key == type_key && entry.local_id == local_id)
            .map(|entry| entry.name.as_str())
    }

    /// Whether `(type_key, name)` is registered.
    pub fn contains(&self, type_key: TypeKey, name: &str) -> bool {
        self.lookup(type_key, name).is_some()
    }

    fn contains_id(&self, type_key: TypeKey, local_id: LocalId) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.type_key == type_key && entry.local_id == local_id)
    }

    /// Iterates over all entries in table order.
    pub fn iter(&self) -> impl Iterator<Item = &IdEntry> {
        self.entries.iter()
    }

    /// Iterates over the entries of one type key, in table order.
    pub fn entries_of(&self, type_key: TypeKey) -> impl Iterator<Item = &IdEntry> {
        self.entries
            .iter()
            .filter(move |entry| entry.type_key == type_key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<'a> IntoIterator for &'a IdentityTable {
    type Item = &'a IdEntry;
    type IntoIter = std::slice::Iter<'a, IdEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::ContentHashDeriver;

    fn clip() -> TypeKey {
        TypeKey::new(74)
    }

    fn slot() -> TypeKey {
        TypeKey::new(21)
    }

    fn id(raw: i64) -> LocalId {
        LocalId::new(raw)
    }

    #[test]
    fn test_allocate_is_idempotent() {
        let mut table = IdentityTable::new();
        let deriver = ContentHashDeriver;
        let first = table.allocate_or_lookup(clip(), "Run", &deriver).unwrap();
        let second = table.allocate_or_lookup(clip(), "Run", &deriver).unwrap();
        assert_eq!(first, second);
        assert_eq!(table.len(), 1);
        assert!(!first.is_reserved());
    }

    #[test]
    fn test_allocation_is_scoped_per_type_key() {
        let mut table = IdentityTable::new();
        let deriver = ContentHashDeriver;
        let clip_id = table.allocate_or_lookup(clip(), "Run", &deriver).unwrap();
        let slot_id = table.allocate_or_lookup(slot(), "Run", &deriver).unwrap();
        assert_ne!(clip_id, slot_id);
        assert_eq!(table.lookup(clip(), "Run"), Some(clip_id));
        assert_eq!(table.lookup(slot(), "Run"), Some(slot_id));
    }

    #[test]
    fn test_lookup_miss_is_none() {
        let table = IdentityTable::new();
        assert_eq!(table.lookup(clip(), "Run"), None);
    }

    #[test]
    fn test_rename_keeps_the_id() {
        let mut table = IdentityTable::new();
        table.register(clip(), id(10), "Run").unwrap();
        assert_eq!(table.rename(clip(), "Run", "Sprint"), Some(id(10)));
        assert_eq!(table.lookup(clip(), "Sprint"), Some(id(10)));
        assert_eq!(table.lookup(clip(), "Run"), None);
    }

    #[test]
    fn test_rename_missing_name_is_a_noop() {
        let mut table = IdentityTable::new();
        table.register(clip(), id(10), "Run").unwrap();
        assert_eq!(table.rename(clip(), "Walk", "Stroll"), None);
        assert_eq!(table.lookup(clip(), "Run"), Some(id(10)));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_batch_rename_swaps_without_collision() {
        let mut table = IdentityTable::new();
        table.register(clip(), id(10), "A").unwrap();
        table.register(clip(), id(11), "B").unwrap();

        let applied = table.rename_batch(clip(), &["A", "B"], &["B", "A"]).unwrap();
        assert_eq!(applied, 2);
        assert_eq!(table.lookup(clip(), "B"), Some(id(10)));
        assert_eq!(table.lookup(clip(), "A"), Some(id(11)));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_batch_rename_three_way_rotation() {
        let mut table = IdentityTable::new();
        table.register(clip(), id(1), "A").unwrap();
        table.register(clip(), id(2), "B").unwrap();
        table.register(clip(), id(3), "C").unwrap();

        let applied = table
            .rename_batch(clip(), &["A", "B", "C"], &["B", "C", "A"])
            .unwrap();
        assert_eq!(applied, 3);
        assert_eq!(table.lookup(clip(), "B"), Some(id(1)));
        assert_eq!(table.lookup(clip(), "C"), Some(id(2)));
        assert_eq!(table.lookup(clip(), "A"), Some(id(3)));
    }

    #[test]
    fn test_batch_rename_skips_unmatched_names() {
        let mut table = IdentityTable::new();
        table.register(clip(), id(10), "Run").unwrap();
        let applied = table
            .rename_batch(clip(), &["Run", "Walk"], &["Sprint", "Stroll"])
            .unwrap();
        assert_eq!(applied, 1);
        assert_eq!(table.lookup(clip(), "Sprint"), Some(id(10)));
        assert_eq!(table.lookup(clip(), "Stroll"), None);
    }

    #[test]
    fn test_batch_rename_ignores_other_type_keys() {
        let mut table = IdentityTable::new();
        table.register(clip(), id(10), "Run").unwrap();
        table.register(slot(), id(10), "Run").unwrap();

        table.rename_batch(clip(), &["Run"], &["Sprint"]).unwrap();
        assert_eq!(table.lookup(slot(), "Run"), Some(id(10)));
        assert_eq!(table.lookup(clip(), "Sprint"), Some(id(10)));
    }

    #[test]
    fn test_batch_rename_rejects_mismatched_lengths() {
        let mut table = IdentityTable::new();
        table.register(clip(), id(10), "Run").unwrap();
        let result = table.rename_batch(clip(), &["Run"], &["Sprint", "Stroll"]);
        assert_eq!(
            result,
            Err(TableError::BatchLengthMismatch {
                old_len: 1,
                new_len: 2
            })
        );
        assert_eq!(table.lookup(clip(), "Run"), Some(id(10)));
    }

    #[test]
    fn test_unregister_then_lookup() {
        let mut table = IdentityTable::new();
        table.register(clip(), id(5), "X").unwrap();
        assert!(table.unregister(clip(), id(5), "X"));
        assert_eq!(table.lookup(clip(), "X"), None);
        assert!(!table.unregister(clip(), id(5), "X"));
    }

    #[test]
    fn test_unregister_requires_exact_match() {
        let mut table = IdentityTable::new();
        table.register(clip(), id(5), "X").unwrap();
        assert!(!table.unregister(clip(), id(6), "X"));
        assert!(!table.unregister(clip(), id(5), "Y"));
        assert!(!table.unregister(slot(), id(5), "X"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_removal_preserves_order() {
        let mut table = IdentityTable::new();
        table.register(clip(), id(1), "E1").unwrap();
        table.register(clip(), id(2), "E2").unwrap();
        table.register(clip(), id(3), "E3").unwrap();
        table.register(clip(), id(4), "E4").unwrap();

        assert!(table.unregister(clip(), id(2), "E2"));
        let names: Vec<&str> = table.iter().map(|entry| entry.name.as_str()).collect();
        assert_eq!(names, vec!["E1", "E3", "E4"]);
    }

    #[test]
    fn test_register_rejects_duplicates_without_mutating() {
        let mut table = IdentityTable::new();
        table.register(clip(), id(10), "Run").unwrap();

        assert_eq!(
            table.register(clip(), id(10), "Walk"),
            Err(TableError::DuplicateId {
                type_key: clip(),
                local_id: id(10)
            })
        );
        assert_eq!(
            table.register(clip(), id(11), "Run"),
            Err(TableError::DuplicateName {
                type_key: clip(),
                name: "Run".to_string()
            })
        );
        assert_eq!(table.len(), 1);

        // same id and name under another type key is fine
        table.register(slot(), id(10), "Run").unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_register_rejects_reserved_id_and_empty_name() {
        let mut table = IdentityTable::new();
        assert_eq!(
            table.register(clip(), id(0), "Run"),
            Err(TableError::ReservedId { type_key: clip() })
        );
        assert_eq!(
            table.register(clip(), id(10), ""),
            Err(TableError::EmptyName { type_key: clip() })
        );
        assert!(table.is_empty());
    }

    #[test]
    fn test_allocate_rejects_empty_name() {
        let mut table = IdentityTable::new();
        let result = table.allocate_or_lookup(clip(), "", &ContentHashDeriver);
        assert_eq!(result, Err(TableError::EmptyName { type_key: clip() }));
        assert!(table.is_empty());
    }

    /// Derives `base + salt`, so the first few salts can be made to land on
    /// ids the test pre-registered.
    struct SequentialDeriver {
        base: i64,
    }

    impl IdDeriver for SequentialDeriver {
        fn derive_id(&self, _type_key: TypeKey, _name: &str, salt: u64) -> LocalId {
            LocalId::new(self.base + salt as i64)
        }
    }

    #[test]
    fn test_allocate_salts_past_collisions() {
        let mut table = IdentityTable::new();
        table.register(clip(), id(100), "Taken").unwrap();
        table.register(clip(), id(101), "AlsoTaken").unwrap();

        let deriver = SequentialDeriver { base: 100 };
        let fresh = table.allocate_or_lookup(clip(), "Fresh", &deriver).unwrap();
        assert_eq!(fresh, id(102));

        // settled now; later calls resolve by lookup, not derivation
        assert_eq!(
            table.allocate_or_lookup(clip(), "Fresh", &deriver).unwrap(),
            id(102)
        );
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_allocate_salts_past_the_zero_sentinel() {
        let mut table = IdentityTable::new();
        let deriver = SequentialDeriver { base: 0 };
        let allocated = table.allocate_or_lookup(clip(), "Fresh", &deriver).unwrap();
        assert_eq!(allocated, id(1));
    }

    #[test]
    fn test_uniqueness_holds_across_an_editing_session() {
        let mut table = IdentityTable::new();
        let deriver = ContentHashDeriver;
        for name in ["Idle", "Run", "Walk", "Jump"] {
            table.allocate_or_lookup(clip(), name, &deriver).unwrap();
        }
        table.rename(clip(), "Walk", "Stroll");
        let jump = table.lookup(clip(), "Jump").unwrap();
        table.unregister(clip(), jump, "Jump");
        table.rename_batch(clip(), &["Idle", "Run"], &["Run", "Idle"]).unwrap();

        for entry in table.iter() {
            let same_id = table
                .iter()
                .filter(|other| other.type_key == entry.type_key && other.local_id == entry.local_id)
                .count();
            let same_name = table
                .iter()
                .filter(|other| other.type_key == entry.type_key && other.name == entry.name)
                .count();
            assert_eq!(same_id, 1);
            assert_eq!(same_name, 1);
        }
    }

    #[test]
    fn test_name_of_reads_back_the_current_name() {
        let mut table = IdentityTable::new();
        table.register(clip(), id(10), "Run").unwrap();
        assert_eq!(table.name_of(clip(), id(10)), Some("Run"));
        table.rename(clip(), "Run", "Sprint");
        assert_eq!(table.name_of(clip(), id(10)), Some("Sprint"));
        assert_eq!(table.name_of(slot(), id(10)), None);
    }

    #[test]
    fn test_entries_of_filters_by_type_key() {
        let mut table = IdentityTable::new();
        table.register(clip(), id(1), "Run").unwrap();
        table.register(slot(), id(2), "Body").unwrap();
        table.register(clip(), id(3), "Walk").unwrap();

        let clips: Vec<&str> = table.entries_of(clip()).map(|e| e.name.as_str()).collect();
        assert_eq!(clips, vec!["Run", "Walk"]);
    }
}
