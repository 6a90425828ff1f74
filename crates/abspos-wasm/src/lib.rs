//! WASM bridge for the layout editor: exposes the element store and the
//! export panel to the browser UI.
//!
//! Compiled via `wasm-pack build --target web`. Structured values cross the
//! boundary as JSON strings; ids cross as plain strings.

use abspos_core::id::ElementId;
use abspos_core::model::{Element, ElementDraft, ElementPatch};
use abspos_core::options::CssOptions;
use abspos_core::presets::{CustomElement, PRESETS, preset};
use abspos_editor::export::{ExportTab, render_tab};
use abspos_editor::persist::{Persist, PersistError, STORAGE_KEY, decode_record, encode_record};
use abspos_editor::store::{ElementStore, ZDirection};
use wasm_bindgen::prelude::*;

// ─── Browser storage ─────────────────────────────────────────────────────

/// Saves the persisted record to `window.localStorage`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStoragePersist;

impl LocalStoragePersist {
    fn storage() -> Result<web_sys::Storage, PersistError> {
        web_sys::window()
            .ok_or_else(|| PersistError::Backend("no window".into()))?
            .local_storage()
            .map_err(|e| PersistError::Backend(format!("{e:?}")))?
            .ok_or_else(|| PersistError::Backend("localStorage unavailable".into()))
    }

    /// Read the stored collection. No record means an empty collection.
    pub fn load(&self) -> Result<Vec<Element>, PersistError> {
        let text = Self::storage()?
            .get_item(STORAGE_KEY)
            .map_err(|e| PersistError::Backend(format!("{e:?}")))?;
        match text {
            Some(text) => decode_record(&text),
            None => Ok(Vec::new()),
        }
    }
}

impl Persist for LocalStoragePersist {
    fn save(&mut self, elements: &[Element]) -> Result<(), PersistError> {
        let text = encode_record(elements)?;
        Self::storage()?
            .set_item(STORAGE_KEY, &text)
            .map_err(|e| PersistError::Backend(format!("{e:?}")))
    }
}

// ─── Editor handle ───────────────────────────────────────────────────────

/// The main WASM-facing editor controller.
///
/// Owns the element store. Every canvas, tree panel, and export panel
/// interaction from JS goes through this struct.
#[wasm_bindgen]
pub struct Editor {
    store: ElementStore<LocalStoragePersist>,
}

#[wasm_bindgen]
impl Editor {
    /// Create the editor, rehydrating from `localStorage` when a record exists.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        console_error_panic_hook_setup();

        let persist = LocalStoragePersist;
        let elements = persist.load().unwrap_or_else(|e| {
            log::warn!("starting with an empty layout: {e}");
            Vec::new()
        });
        Self {
            store: ElementStore::hydrate(elements, persist),
        }
    }

    // ─── Mutations ───────────────────────────────────────────────────────

    /// Add an element from a JSON draft. Returns the new id, or an empty
    /// string if the JSON is malformed.
    pub fn add(&mut self, draft_json: &str) -> String {
        match serde_json::from_str::<ElementDraft>(draft_json) {
            Ok(draft) => self.store.add(draft).as_str().to_string(),
            Err(e) => {
                log::warn!("rejected element draft: {e}");
                String::new()
            }
        }
    }

    /// Add a library element (`div`, `button`, `text`, `image`, `input`) at
    /// the drop point. Returns the new id, or an empty string for an
    /// unknown kind.
    pub fn add_preset(&mut self, kind: &str, x: f64, y: f64) -> String {
        preset(kind)
            .map(|p| self.store.add(p.draft_at(x, y)).as_str().to_string())
            .unwrap_or_default()
    }

    /// Add a custom element from the custom-element form's JSON.
    pub fn add_custom(&mut self, custom_json: &str) -> String {
        match serde_json::from_str::<CustomElement>(custom_json) {
            Ok(custom) => self.store.add(custom.draft()).as_str().to_string(),
            Err(e) => {
                log::warn!("rejected custom element: {e}");
                String::new()
            }
        }
    }

    /// Shallow-merge a JSON patch into an element.
    /// Returns `false` if the JSON is malformed or the id is unknown.
    pub fn update(&mut self, id: &str, patch_json: &str) -> bool {
        let Ok(patch) = serde_json::from_str::<ElementPatch>(patch_json) else {
            return false;
        };
        let id = ElementId::intern(id);
        if self.store.get(id).is_none() {
            return false;
        }
        self.store.update(id, patch);
        true
    }

    /// Remove an element and its descendants.
    pub fn remove(&mut self, id: &str) {
        self.store.remove(ElementId::intern(id));
    }

    /// Select an element by id; an empty string clears the selection.
    pub fn select(&mut self, id: &str) {
        let id = (!id.is_empty()).then(|| ElementId::intern(id));
        self.store.set_selected(id);
    }

    /// Reparent an element; an empty `parent` detaches it to the root.
    /// Returns `false` when rejected (cycle) or the child is unknown.
    pub fn set_parent(&mut self, child: &str, parent: &str) -> bool {
        let parent = (!parent.is_empty()).then(|| ElementId::intern(parent));
        self.store.set_parent(ElementId::intern(child), parent)
    }

    /// Restack among siblings: `up`, `down`, `top` or `bottom`.
    pub fn adjust_z(&mut self, id: &str, direction: &str) -> bool {
        match direction.parse::<ZDirection>() {
            Ok(dir) => {
                self.store.adjust_z(ElementId::intern(id), dir);
                true
            }
            Err(e) => {
                log::warn!("{e}");
                false
            }
        }
    }

    pub fn rotate_to(&mut self, id: &str, degrees: f64, snap: bool) {
        self.store.rotate_to(ElementId::intern(id), degrees, snap);
    }

    /// Finish a drag: move to `(x, y)` snapped to `grid`.
    pub fn move_to(&mut self, id: &str, x: f64, y: f64, grid: f64) {
        self.store.move_to(ElementId::intern(id), x, y, grid);
    }

    pub fn nudge(&mut self, id: &str, dx: f64, dy: f64) {
        self.store.nudge(ElementId::intern(id), dx, dy);
    }

    pub fn resize_by(&mut self, id: &str, dw: f64, dh: f64, min: f64) {
        self.store.resize_by(ElementId::intern(id), dw, dh, min);
    }

    pub fn set_size(&mut self, id: &str, width: f64, height: f64, min: f64) {
        self.store.set_size(ElementId::intern(id), width, height, min);
    }

    pub fn set_visible(&mut self, id: &str, visible: bool) {
        self.store.set_visible(ElementId::intern(id), visible);
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    /// Currently selected id, or empty string if none.
    pub fn selected_id(&self) -> String {
        self.store
            .selected_id()
            .map(|id| id.as_str().to_string())
            .unwrap_or_default()
    }

    /// The selected element as JSON, or `null`.
    pub fn selected_element_json(&self) -> String {
        serde_json::to_string(&self.store.selected_element()).unwrap_or_else(|_| "null".into())
    }

    /// The whole collection as a JSON array.
    pub fn elements_json(&self) -> String {
        serde_json::to_string(self.store.elements()).unwrap_or_else(|_| "[]".into())
    }

    /// Direct children of `id` as a JSON array, in collection order.
    pub fn children_of_json(&self, id: &str) -> String {
        serde_json::to_string(&self.store.children_of(ElementId::intern(id)))
            .unwrap_or_else(|_| "[]".into())
    }

    pub fn max_z_index(&self) -> i32 {
        self.store.max_z_index()
    }

    // ─── Export ──────────────────────────────────────────────────────────

    /// Render an export tab (`css`, `html`, `combined`) with JSON options.
    /// Empty or malformed options fall back to the defaults.
    pub fn export(&self, tab: &str, options_json: &str) -> String {
        let tab = tab.parse::<ExportTab>().unwrap_or_else(|e| {
            log::warn!("{e}");
            ExportTab::default()
        });
        render_tab(tab, self.store.elements(), &parse_options(options_json))
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Standalone functions (no editor needed) ─────────────────────────────

/// Kinds available in the element library, in display order.
#[wasm_bindgen]
pub fn preset_kinds() -> js_sys::Array {
    PRESETS
        .iter()
        .map(|p| JsValue::from_str(p.kind))
        .collect()
}

/// Generator options from the option panel's JSON state.
fn parse_options(json: &str) -> CssOptions {
    if json.trim().is_empty() {
        return CssOptions::default();
    }
    serde_json::from_str(json).unwrap_or_else(|e| {
        log::warn!("ignoring malformed export options: {e}");
        CssOptions::default()
    })
}

// ─── Panic hook for WASM debugging ───────────────────────────────────────

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("layout editor panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn blank_options_are_defaults() {
        assert_eq!(parse_options(""), CssOptions::default());
        assert_eq!(parse_options("  "), CssOptions::default());
        assert_eq!(parse_options("{not json"), CssOptions::default());
    }

    #[test]
    fn partial_options_keep_other_defaults() {
        let opts = parse_options(r##"{"usePixels":false,"prefix":"#box"}"##);
        assert!(!opts.use_pixels);
        assert_eq!(opts.prefix, "#box");
        assert!(opts.include_comments);
        assert!(!opts.include_prefix);
    }
}
