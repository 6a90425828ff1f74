//! The element tree store: the authoritative collection of elements plus
//! the selection pointer.
//!
//! The store is an explicit context object. The host builds one at startup
//! (empty, or rehydrated from storage) and hands it to whatever drives the
//! canvas, tree panel, and exporter. Every mutation writes the collection
//! through the injected [`Persist`] capability; save failures are logged
//! and otherwise ignored.
//!
//! Operations addressed by an unknown id are silent no-ops. The only
//! rejected mutation is a reparent that would create a cycle.

use crate::persist::{NullPersist, Persist};
use abspos_core::id::ElementId;
use abspos_core::lint::{LintSeverity, lint_elements};
use abspos_core::model::{Element, ElementDraft, ElementPatch, normalize_degrees, snap_to_grid};
use abspos_core::tree::ElementTree;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Rotation snap increment in degrees.
pub const ROTATION_SNAP: f64 = 15.0;

// ─── Z-order ─────────────────────────────────────────────────────────────

/// Direction for [`ElementStore::adjust_z`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZDirection {
    /// Just above the next sibling with a greater z-index.
    Up,
    /// Just below the next sibling with a lower z-index.
    Down,
    /// Above every sibling.
    Top,
    /// Below every sibling.
    Bottom,
}

impl FromStr for ZDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(ZDirection::Up),
            "down" => Ok(ZDirection::Down),
            "top" => Ok(ZDirection::Top),
            "bottom" => Ok(ZDirection::Bottom),
            other => Err(format!("unknown z-order direction `{other}`")),
        }
    }
}

impl fmt::Display for ZDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ZDirection::Up => "up",
            ZDirection::Down => "down",
            ZDirection::Top => "top",
            ZDirection::Bottom => "bottom",
        })
    }
}

// ─── Store ───────────────────────────────────────────────────────────────

pub struct ElementStore<P = NullPersist> {
    elements: Vec<Element>,
    selected: Option<ElementId>,
    persist: P,
}

impl Default for ElementStore<NullPersist> {
    fn default() -> Self {
        Self::new(NullPersist)
    }
}

impl<P: Persist> ElementStore<P> {
    /// An empty store.
    pub fn new(persist: P) -> Self {
        Self {
            elements: Vec::new(),
            selected: None,
            persist,
        }
    }

    /// A store over a previously persisted collection. Nothing is selected.
    /// Integrity problems in the loaded data are logged, not repaired.
    pub fn hydrate(elements: Vec<Element>, persist: P) -> Self {
        for diag in lint_elements(&elements) {
            match diag.severity {
                LintSeverity::Warning => log::warn!("[{}] {}", diag.rule, diag.message),
                LintSeverity::Info => log::info!("[{}] {}", diag.rule, diag.message),
            }
        }
        log::debug!("hydrated store with {} elements", elements.len());
        Self {
            elements,
            selected: None,
            persist,
        }
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    /// The full collection, in collection order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|el| el.id == id)
    }

    pub fn selected_id(&self) -> Option<ElementId> {
        self.selected
    }

    /// The selected element, if the selection points at one that exists.
    pub fn selected_element(&self) -> Option<&Element> {
        self.selected.and_then(|id| self.get(id))
    }

    /// Elements whose parent is `parent`, in collection order (not z-sorted).
    pub fn children_of(&self, parent: ElementId) -> Vec<&Element> {
        self.elements
            .iter()
            .filter(|el| el.parent_id == Some(parent))
            .collect()
    }

    /// Root elements, in collection order.
    pub fn roots(&self) -> Vec<&Element> {
        self.elements.iter().filter(|el| el.is_root()).collect()
    }

    /// Highest z-index across the whole collection, or 0 when empty.
    pub fn max_z_index(&self) -> i32 {
        self.elements.iter().map(|el| el.z_index).max().unwrap_or(0)
    }

    pub fn storage(&self) -> &P {
        &self.persist
    }

    // ─── Mutations ───────────────────────────────────────────────────────

    /// Create an element from `draft`, select it, and return its id.
    ///
    /// Fills rotation (0), z-index (one above the current maximum), and
    /// parent (root) when the draft leaves them unset.
    pub fn add(&mut self, draft: ElementDraft) -> ElementId {
        let id = self.fresh_id();
        let default_z = match draft.z_index {
            Some(z) if z != 0 => z,
            _ => self.max_z_index().saturating_add(1),
        };
        let element = draft.into_element(id, default_z);
        log::debug!("add {} <{}> z={}", id, element.kind, element.z_index);
        self.elements.push(element);
        self.selected = Some(id);
        self.save();
        id
    }

    /// Shallow-merge `patch` into the element. No-op for unknown ids.
    pub fn update(&mut self, id: ElementId, patch: ElementPatch) {
        let Some(element) = self.elements.iter_mut().find(|el| el.id == id) else {
            return;
        };
        element.apply_patch(patch);
        self.save();
    }

    /// Remove the element and all of its descendants. Clears the selection
    /// if it pointed into the removed subtree. No-op for unknown ids.
    pub fn remove(&mut self, id: ElementId) {
        let doomed = ElementTree::build(&self.elements).subtree(id);
        if doomed.is_empty() {
            return;
        }
        self.elements.retain(|el| !doomed.contains(&el.id));
        if self.selected.is_some_and(|sel| doomed.contains(&sel)) {
            self.selected = None;
        }
        log::debug!("removed {} and {} descendants", id, doomed.len() - 1);
        self.save();
    }

    /// Replace the selection pointer. The id is not checked.
    pub fn set_selected(&mut self, id: Option<ElementId>) {
        self.selected = id;
    }

    /// Make `parent` the parent of `child` (`None` detaches it to the root).
    ///
    /// Rejected when `parent` is `child` or one of its descendants: the
    /// collection is left untouched, an error is logged, and `false` is
    /// returned. Unknown `child` is a no-op that also returns `false`.
    pub fn set_parent(&mut self, child: ElementId, parent: Option<ElementId>) -> bool {
        if self.get(child).is_none() {
            log::debug!("set_parent: unknown element {child}");
            return false;
        }
        if let Some(parent) = parent {
            let tree = ElementTree::build(&self.elements);
            if tree.would_cycle(child, parent) {
                log::error!(
                    "cannot make {parent} the parent of {child}: would create a circular parent-child relationship"
                );
                return false;
            }
            if !tree.contains(parent) {
                log::warn!("reparenting {child} under unknown element {parent}");
            }
        }
        let Some(element) = self.elements.iter_mut().find(|el| el.id == child) else {
            return false;
        };
        element.parent_id = parent;
        self.save();
        true
    }

    /// Restack the element among its siblings (same parent).
    ///
    /// Siblings are ordered by z-index with a stable sort; ties keep
    /// collection order. An element without siblings keeps its z-index.
    pub fn adjust_z(&mut self, id: ElementId, direction: ZDirection) {
        let Some(current) = self.get(id) else {
            return;
        };
        let z = current.z_index;
        let mut siblings: Vec<i32> = self
            .elements
            .iter()
            .filter(|el| el.parent_id == current.parent_id && el.id != id)
            .map(|el| el.z_index)
            .collect();
        siblings.sort();

        let new_z = match direction {
            ZDirection::Up => siblings.iter().find(|&&s| s > z).map(|s| s.saturating_add(1)),
            ZDirection::Down => siblings.iter().rev().find(|&&s| s < z).map(|s| s.saturating_sub(1)),
            ZDirection::Top => siblings.last().map(|s| s.saturating_add(1)),
            ZDirection::Bottom => siblings.first().map(|s| s.saturating_sub(1)),
        }
        .unwrap_or(z);

        log::debug!("adjust z {id} {direction}: {z} → {new_z}");
        self.update(id, ElementPatch::z_index(new_z));
    }

    // ─── Editing helpers ─────────────────────────────────────────────────

    /// Set rotation, normalized to [0, 360). With `snap`, rounds to the
    /// nearest 15°.
    pub fn rotate_to(&mut self, id: ElementId, degrees: f64, snap: bool) {
        let degrees = if snap {
            (degrees / ROTATION_SNAP).round() * ROTATION_SNAP
        } else {
            degrees
        };
        self.update(
            id,
            ElementPatch {
                rotation: Some(normalize_degrees(degrees)),
                ..Default::default()
            },
        );
    }

    /// Move by `(dx, dy)`, clamping both offsets at 0.
    pub fn nudge(&mut self, id: ElementId, dx: f64, dy: f64) {
        let Some(el) = self.get(id) else {
            return;
        };
        let patch = ElementPatch::position((el.x + dx).max(0.0), (el.y + dy).max(0.0));
        self.update(id, patch);
    }

    /// Drop at `(x, y)` snapped to `grid` (0 disables snapping), clamped at 0.
    pub fn move_to(&mut self, id: ElementId, x: f64, y: f64, grid: f64) {
        let x = snap_to_grid(x, grid).max(0.0);
        let y = snap_to_grid(y, grid).max(0.0);
        self.update(id, ElementPatch::position(x, y));
    }

    /// Grow or shrink by `(dw, dh)`, never below `min` on either axis.
    pub fn resize_by(&mut self, id: ElementId, dw: f64, dh: f64, min: f64) {
        let Some(el) = self.get(id) else {
            return;
        };
        let patch = ElementPatch::size((el.width + dw).max(min), (el.height + dh).max(min));
        self.update(id, patch);
    }

    /// Set an explicit size, never below `min` on either axis.
    pub fn set_size(&mut self, id: ElementId, width: f64, height: f64, min: f64) {
        self.update(id, ElementPatch::size(width.max(min), height.max(min)));
    }

    /// Show or hide the element on the canvas via the `display` hint.
    /// Showing drops any `display` value, including layout hints like `flex`.
    pub fn set_visible(&mut self, id: ElementId, visible: bool) {
        let Some(el) = self.get(id) else {
            return;
        };
        let mut style = el.style.clone();
        if visible {
            style.remove("display");
        } else {
            style.set("display", "none");
        }
        self.update(
            id,
            ElementPatch {
                style: Some(style),
                ..Default::default()
            },
        );
    }

    // ─── Internals ───────────────────────────────────────────────────────

    /// A generated id whose short id is not used by any current element.
    fn fresh_id(&self) -> ElementId {
        loop {
            let id = ElementId::generate();
            let short = id.short_id();
            if !self.elements.iter().any(|el| el.short_id() == short) {
                return id;
            }
        }
    }

    fn save(&mut self) {
        if let Err(e) = self.persist.save(&self.elements) {
            log::warn!("failed to persist {} elements: {e}", self.elements.len());
        }
    }
}
