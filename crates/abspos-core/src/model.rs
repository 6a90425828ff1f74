//! Core data model for the layout editor.
//!
//! The document is a flat collection of `Element` values. Tree structure is
//! derived from `parent_id` links; stacking order from `z_index`. Insertion
//! order carries no meaning beyond "collection order", which queries and
//! generators preserve when they filter.

use crate::id::ElementId;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// ─── Style map ───────────────────────────────────────────────────────────

/// Style keys that are editor-only layout hints. They steer the canvas
/// preview but never appear in generated absolute-positioning CSS.
pub const EDITOR_ONLY_STYLE_KEYS: [&str; 5] =
    ["position", "display", "alignItems", "justifyContent", "padding"];

/// A single style entry. `css_name` is the kebab-case property name,
/// computed once when the entry is inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleDecl {
    /// camelCase key as the editor stores it (`backgroundColor`).
    pub key: String,
    /// kebab-case CSS property name (`background-color`).
    pub css_name: String,
    pub value: String,
}

impl StyleDecl {
    /// Whether this entry is an editor-only hint (see [`EDITOR_ONLY_STYLE_KEYS`]).
    pub fn is_editor_only(&self) -> bool {
        EDITOR_ONLY_STYLE_KEYS.contains(&self.key.as_str())
    }
}

/// Ordered mapping of camelCase style key → CSS value.
///
/// Serialized as a plain JSON object in insertion order. Non-string values
/// (numbers, booleans) are stored in their textual form; `null` entries are
/// dropped on load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleMap {
    decls: Vec<StyleDecl>,
}

impl StyleMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    /// Look up a value by its camelCase key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.decls
            .iter()
            .find(|d| d.key == key)
            .map(|d| d.value.as_str())
    }

    /// Insert or replace an entry. Replacing keeps the original position.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if let Some(decl) = self.decls.iter_mut().find(|d| d.key == key) {
            decl.value = value;
            return;
        }
        let css_name = kebab_case(&key);
        self.decls.push(StyleDecl {
            key,
            css_name,
            value,
        });
    }

    /// Remove an entry, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let pos = self.decls.iter().position(|d| d.key == key)?;
        Some(self.decls.remove(pos).value)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StyleDecl> {
        self.decls.iter()
    }

    /// Entries that belong in generated CSS (editor-only hints excluded).
    pub fn exported(&self) -> impl Iterator<Item = &StyleDecl> {
        self.decls.iter().filter(|d| !d.is_editor_only())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StyleMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = StyleMap::new();
        for (k, v) in iter {
            map.set(k, v);
        }
        map
    }
}

impl<'a> IntoIterator for &'a StyleMap {
    type Item = &'a StyleDecl;
    type IntoIter = std::slice::Iter<'a, StyleDecl>;

    fn into_iter(self) -> Self::IntoIter {
        self.decls.iter()
    }
}

impl Serialize for StyleMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.decls.len()))?;
        for decl in &self.decls {
            map.serialize_entry(&decl.key, &decl.value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for StyleMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct StyleMapVisitor;

        impl<'de> Visitor<'de> for StyleMapVisitor {
            type Value = StyleMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of style property names to values")
            }

            fn visit_unit<E: serde::de::Error>(self) -> Result<StyleMap, E> {
                Ok(StyleMap::new())
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<StyleMap, A::Error> {
                let mut map = StyleMap::new();
                while let Some((key, value)) =
                    access.next_entry::<String, serde_json::Value>()?
                {
                    match value {
                        serde_json::Value::Null => {}
                        serde_json::Value::String(s) => map.set(key, s),
                        other => map.set(key, other.to_string()),
                    }
                }
                Ok(map)
            }
        }

        deserializer.deserialize_any(StyleMapVisitor)
    }
}

/// Convert a camelCase style key to a kebab-case CSS property name.
///
/// Every ASCII uppercase letter becomes `-` + its lowercase form, so vendor
/// keys like `WebkitTransform` map to `-webkit-transform`.
pub fn kebab_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.extend(c.to_lowercase());
        }
    }
    out
}

// ─── Positioning ─────────────────────────────────────────────────────────

/// The `position` style hint, which doubles as a semantic field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Positioning<'a> {
    Absolute,
    Relative,
    /// Any other CSS position keyword, passed through untouched.
    Other(&'a str),
}

impl<'a> Positioning<'a> {
    pub fn as_str(&self) -> &'a str {
        match *self {
            Positioning::Absolute => "absolute",
            Positioning::Relative => "relative",
            Positioning::Other(s) => s,
        }
    }
}

// ─── Elements ────────────────────────────────────────────────────────────

/// One positioned node in the layout tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: ElementId,

    /// Free-form tag (`div`, `button`, `custom`), used as the HTML tag name.
    #[serde(rename = "type")]
    pub kind: String,

    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,

    /// Degrees, [0, 360) when set through the rotation helpers.
    #[serde(default)]
    pub rotation: f64,

    #[serde(default)]
    pub z_index: i32,

    /// `None` for root elements.
    #[serde(default)]
    pub parent_id: Option<ElementId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(default, skip_serializing_if = "StyleMap::is_empty")]
    pub style: StyleMap,
}

impl Element {
    pub fn short_id(&self) -> &str {
        self.id.short_id()
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Positioning mode from the `position` style hint (default: absolute).
    pub fn positioning(&self) -> Positioning<'_> {
        match self.style.get("position") {
            None | Some("absolute") => Positioning::Absolute,
            Some("relative") => Positioning::Relative,
            Some(other) => Positioning::Other(other),
        }
    }

    /// Whether the element is hidden via the `display: none` hint.
    pub fn is_hidden(&self) -> bool {
        self.style.get("display") == Some("none")
    }

    /// Shallow-merge a patch: every `Some` field replaces the current value.
    pub fn apply_patch(&mut self, patch: ElementPatch) {
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        if let Some(width) = patch.width {
            self.width = width;
        }
        if let Some(height) = patch.height {
            self.height = height;
        }
        if let Some(rotation) = patch.rotation {
            self.rotation = rotation;
        }
        if let Some(z_index) = patch.z_index {
            self.z_index = z_index;
        }
        if let Some(content) = patch.content {
            self.content = Some(content);
        }
        if let Some(style) = patch.style {
            self.style = style;
        }
    }
}

/// Everything needed to create an element, minus the id.
///
/// `rotation`, `z_index` and `parent_id` are optional; the store fills them in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ElementDraft {
    #[serde(rename = "type")]
    pub kind: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: Option<f64>,
    pub z_index: Option<i32>,
    pub parent_id: Option<ElementId>,
    pub content: Option<String>,
    pub style: StyleMap,
}

impl ElementDraft {
    pub fn new(kind: impl Into<String>, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            kind: kind.into(),
            x,
            y,
            width,
            height,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_parent(mut self, parent: ElementId) -> Self {
        self.parent_id = Some(parent);
        self
    }

    #[must_use]
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = Some(z_index);
        self
    }

    #[must_use]
    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = Some(rotation);
        self
    }

    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: StyleMap) -> Self {
        self.style = style;
        self
    }

    /// Materialize the draft with an assigned id and resolved defaults.
    pub fn into_element(self, id: ElementId, default_z: i32) -> Element {
        Element {
            id,
            kind: self.kind,
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
            rotation: self.rotation.unwrap_or(0.0),
            // zero counts as "unset", matching how the editor UI passes drafts
            z_index: self.z_index.filter(|z| *z != 0).unwrap_or(default_z),
            parent_id: self.parent_id,
            content: self.content.filter(|c| !c.is_empty()),
            style: self.style,
        }
    }
}

/// A partial set of element fields for `update`. `id` and `parent_id` are
/// deliberately absent: ids are immutable and reparenting has its own
/// cycle-checked operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ElementPatch {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub rotation: Option<f64>,
    pub z_index: Option<i32>,
    pub content: Option<String>,
    pub style: Option<StyleMap>,
}

impl ElementPatch {
    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Default::default()
        }
    }

    pub fn size(width: f64, height: f64) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Default::default()
        }
    }

    pub fn z_index(z_index: i32) -> Self {
        Self {
            z_index: Some(z_index),
            ..Default::default()
        }
    }
}

// ─── Geometry helpers ────────────────────────────────────────────────────

/// Normalize an angle in degrees to [0, 360).
pub fn normalize_degrees(degrees: f64) -> f64 {
    let d = ((degrees % 360.0) + 360.0) % 360.0;
    // -0.0 and float noise at the wrap point both collapse to 0
    if d >= 360.0 || d == 0.0 { 0.0 } else { d }
}

/// Round `value` to the nearest multiple of `grid` (halves round up).
/// A non-positive grid leaves the value untouched.
pub fn snap_to_grid(value: f64, grid: f64) -> f64 {
    if grid <= 0.0 {
        return value;
    }
    (value / grid + 0.5).floor() * grid
}
