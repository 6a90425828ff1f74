//! Durable storage for the element collection.
//!
//! The store calls [`Persist::save`] after every mutation. Only the element
//! collection is written; selection and other UI state are not. The record
//! layout is `{"state":{"elements":[...]},"version":0}` under the key
//! [`STORAGE_KEY`], so records written by the browser editor load unchanged.

use abspos_core::model::Element;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Fixed storage name for the persisted record.
pub const STORAGE_KEY: &str = "element-storage";

/// Record format version.
pub const STORAGE_VERSION: u32 = 0;

// ─── Errors ──────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("could not serialize elements: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("persisted record is malformed: {0}")]
    Deserialize(#[source] serde_json::Error),

    #[error("storage backend error: {0}")]
    Backend(String),
}

// ─── Save capability ─────────────────────────────────────────────────────

/// The save capability injected into the element store.
pub trait Persist {
    /// Write the full element collection, replacing any previous record.
    fn save(&mut self, elements: &[Element]) -> Result<(), PersistError>;
}

impl<P: Persist + ?Sized> Persist for Box<P> {
    fn save(&mut self, elements: &[Element]) -> Result<(), PersistError> {
        (**self).save(elements)
    }
}

// ─── Record codec ────────────────────────────────────────────────────────

#[derive(Serialize)]
struct RecordRef<'a> {
    state: StateRef<'a>,
    version: u32,
}

#[derive(Serialize)]
struct StateRef<'a> {
    elements: &'a [Element],
}

#[derive(Deserialize)]
struct Record {
    state: State,
    #[serde(default)]
    version: u32,
}

#[derive(Deserialize)]
struct State {
    #[serde(default)]
    elements: Vec<Element>,
}

/// Serialize the element collection as a persisted record.
pub fn encode_record(elements: &[Element]) -> Result<String, PersistError> {
    let record = RecordRef {
        state: StateRef { elements },
        version: STORAGE_VERSION,
    };
    serde_json::to_string(&record).map_err(PersistError::Serialize)
}

/// Parse a persisted record back into the element collection.
pub fn decode_record(text: &str) -> Result<Vec<Element>, PersistError> {
    let record: Record = serde_json::from_str(text).map_err(PersistError::Deserialize)?;
    if record.version != STORAGE_VERSION {
        log::warn!(
            "persisted record has version {}, expected {STORAGE_VERSION}; loading anyway",
            record.version
        );
    }
    Ok(record.state.elements)
}

// ─── Implementations ─────────────────────────────────────────────────────

/// Discards every save. For hosts without durable storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPersist;

impl Persist for NullPersist {
    fn save(&mut self, _elements: &[Element]) -> Result<(), PersistError> {
        Ok(())
    }
}

/// Keeps the last saved record in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    record: Option<String>,
    saves: usize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent record text, if anything was saved.
    pub fn record(&self) -> Option<&str> {
        self.record.as_deref()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.saves
    }

    /// Decode the most recent record. Empty if nothing was saved.
    pub fn load(&self) -> Result<Vec<Element>, PersistError> {
        match &self.record {
            Some(text) => decode_record(text),
            None => Ok(Vec::new()),
        }
    }
}

impl Persist for MemoryStorage {
    fn save(&mut self, elements: &[Element]) -> Result<(), PersistError> {
        self.record = Some(encode_record(elements)?);
        self.saves += 1;
        Ok(())
    }
}

/// Stores the record as `{dir}/element-storage.json`.
///
/// Writes go to a sibling temp file first and are renamed into place, so a
/// crash mid-write leaves the previous record intact.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Storage file under `dir`, named after [`STORAGE_KEY`].
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{STORAGE_KEY}.json")),
        }
    }

    /// Storage at an explicit file path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the record. A missing file is an empty collection.
    pub fn load(&self) -> Result<Vec<Element>, PersistError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => decode_record(&text),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl Persist for FileStorage {
    fn save(&mut self, elements: &[Element]) -> Result<(), PersistError> {
        let text = encode_record(elements)?;
        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, text)?;
        fs::rename(&tmp, &self.path)?;
        log::trace!("saved {} elements to {}", elements.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use abspos_core::id::ElementId;
    use abspos_core::model::ElementDraft;

    fn sample() -> Vec<Element> {
        vec![
            ElementDraft::new("div", 1.0, 2.0, 30.0, 40.0)
                .into_element(ElementId::intern("element-p-1"), 1),
        ]
    }

    #[test]
    fn record_layout() {
        let text = encode_record(&sample()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["version"], 0);
        assert_eq!(json["state"]["elements"][0]["id"], "element-p-1");
        assert!(json["state"].get("selectedElementId").is_none());
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(matches!(
            decode_record("not json"),
            Err(PersistError::Deserialize(_))
        ));
    }

    #[test]
    fn decode_tolerates_missing_version() {
        let elements = decode_record(r#"{"state":{"elements":[]}}"#).unwrap();
        assert!(elements.is_empty());
    }

    #[test]
    fn memory_storage_counts_saves() {
        let mut storage = MemoryStorage::new();
        assert!(storage.load().unwrap().is_empty());
        storage.save(&sample()).unwrap();
        storage.save(&sample()).unwrap();
        assert_eq!(storage.save_count(), 2);
        assert_eq!(storage.load().unwrap(), sample());
    }
}
