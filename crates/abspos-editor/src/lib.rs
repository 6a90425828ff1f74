pub mod export;
pub mod persist;
pub mod store;

pub use export::{ExportTab, is_fallback, recover, render_tab};
pub use persist::{
    FileStorage, MemoryStorage, NullPersist, Persist, PersistError, STORAGE_KEY, decode_record,
    encode_record,
};
pub use store::{ElementStore, ZDirection};

// Re-export the model so hosts only need this crate
pub use abspos_core::{CssOptions, Element, ElementDraft, ElementId, ElementPatch};
