//! The serialized metadata document that owns the identity tables.
//!
//! One [`ImportMetadata`] lives next to each imported asset and is loaded and
//! saved whole; there is no partial or incremental persistence. Tables hang
//! off the document under a name; most assets only ever touch the default
//! [`INTERNAL_ID_TABLE`].

use crate::table::IdentityTable;
use indexmap::IndexMap;
use ron::ser::PrettyConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Field name of the table every importer writes to unless it has a reason
/// not to.
pub const INTERNAL_ID_TABLE: &str = "internal_id_table";

/// Format version written into new documents.
const METADATA_VERSION: u32 = 1;

/// Metadata persisted alongside one imported asset.
///
/// Holds the source reference the asset was imported from plus the named
/// identity tables for its sub-objects. The tables map is insertion-ordered
/// so a document round-trips with its tables (and their entries) in the
/// exact order they were written.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportMetadata {
    /// Reference to the source asset this metadata belongs to, e.g. a
    /// project-relative path.
    pub source: String,

    #[serde(default)]
    pub version: u32,

    #[serde(default)]
    pub tables: IndexMap<String, IdentityTable>,
}

impl ImportMetadata {
    /// Creates metadata for a freshly imported asset, with no tables yet.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            version: METADATA_VERSION,
            tables: IndexMap::new(),
        }
    }

    /// Fetches a named table if the document has one.
    pub fn table(&self, name: &str) -> Option<&IdentityTable> {
        self.tables.get(name)
    }

    /// Fetches a named table mutably, creating it empty on first touch.
    pub fn table_mut(&mut self, name: &str) -> &mut IdentityTable {
        self.tables.entry(name.to_string()).or_default()
    }

    /// Read access to the default internal-id table.
    ///
    /// Returns an empty-table view semantically: [`None`] just means no
    /// sub-object has been registered yet.
    pub fn internal_ids(&self) -> Option<&IdentityTable> {
        self.table(INTERNAL_ID_TABLE)
    }

    /// Mutable access to the default internal-id table, creating it on
    /// first touch.
    pub fn internal_ids_mut(&mut self) -> &mut IdentityTable {
        self.table_mut(INTERNAL_ID_TABLE)
    }

    /// Writes the whole document to a file as pretty RON.
    ///
    /// # Parameters
    /// * path - The metadata **file** path, conventionally next to the
    ///   source asset.
    pub fn write_to(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let ron_str = ron::ser::to_string_pretty(&self, PrettyConfig::default())
            .map_err(|e| anyhow::anyhow!("RON serialization error: {}", e))?;
        fs::write(path.as_ref(), ron_str).map_err(|e| anyhow::anyhow!(e.to_string()))?;
        log::debug!(
            "wrote import metadata for '{}' ({} table(s))",
            self.source,
            self.tables.len()
        );
        Ok(())
    }

    /// Reads a whole document back from a file.
    ///
    /// Either the complete document deserializes or this returns an error;
    /// a bad file never yields a half-applied document.
    pub fn read_from(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let ron_str = fs::read_to_string(path.as_ref())?;
        let metadata: ImportMetadata = ron::de::from_str(ron_str.as_str())?;
        log::debug!(
            "loaded import metadata for '{}' ({} table(s))",
            metadata.source,
            metadata.tables.len()
        );
        Ok(metadata)
    }
}
