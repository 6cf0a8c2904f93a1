//! banksia - stable internal ids for imported asset sub-objects.
//!
//! When an importer turns a source file into engine objects, the named
//! pieces inside it (animation clips, material slots, embedded meshes) need
//! ids that survive re-imports and renames, otherwise every reference into
//! the asset breaks the moment an artist renames a clip. [`IdentityTable`]
//! is that id book-keeping: a small ordered table of
//! `(type key, local id, name)` records persisted next to the asset.
//!
//! Check out [`IdentityTable::allocate_or_lookup`] to get started; it is
//! the only way ids come into existence. [`ImportMetadata`] handles the
//! load/save side.
//!
//! # Usage
//! ```rust
//! use banksia::{ContentHashDeriver, IdentityTable, TypeKey};
//!
//! let clip = TypeKey::new(74);
//! let mut table = IdentityTable::new();
//!
//! // first import: allocates. every later import: looks up.
//! let run = table.allocate_or_lookup(clip, "Run", &ContentHashDeriver).unwrap();
//! assert_eq!(table.allocate_or_lookup(clip, "Run", &ContentHashDeriver).unwrap(), run);
//!
//! // the artist renames the clip; the id stays put.
//! table.rename(clip, "Run", "Sprint");
//! assert_eq!(table.lookup(clip, "Sprint"), Some(run));
//! ```

pub mod derive;
pub mod entry;
pub mod error;
pub mod kind;
pub mod metadata;
pub mod table;

pub use derive::{ContentHashDeriver, IdDeriver};
pub use entry::{IdEntry, LocalId, TypeKey};
pub use error::TableError;
pub use kind::KindRegistry;
pub use metadata::{ImportMetadata, INTERNAL_ID_TABLE};
pub use table::IdentityTable;
