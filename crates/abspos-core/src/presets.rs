//! Element library: the stock element kinds the editor can drop onto the
//! canvas, plus the custom-element builder.

use crate::model::{ElementDraft, StyleMap};
use serde::{Deserialize, Serialize};

/// Where new library elements land on the canvas.
pub const DROP_X: f64 = 50.0;
pub const DROP_Y: f64 = 50.0;

/// A stock element kind with its default size, content, and style.
#[derive(Debug, Clone, Copy)]
pub struct ElementPreset {
    /// Element type / HTML tag.
    pub kind: &'static str,
    /// Display name in the library panel.
    pub name: &'static str,
    pub default_width: f64,
    pub default_height: f64,
    pub content: Option<&'static str>,
    pub style: &'static [(&'static str, &'static str)],
}

impl ElementPreset {
    /// A draft at the default drop point, ready for `ElementStore::add`.
    pub fn draft(&self) -> ElementDraft {
        self.draft_at(DROP_X, DROP_Y)
    }

    pub fn draft_at(&self, x: f64, y: f64) -> ElementDraft {
        let mut draft = ElementDraft::new(self.kind, x, y, self.default_width, self.default_height)
            .with_style(self.style.iter().copied().collect());
        if let Some(content) = self.content {
            draft = draft.with_content(content);
        }
        draft
    }
}

/// The library, in panel order.
pub const PRESETS: &[ElementPreset] = &[
    ElementPreset {
        kind: "div",
        name: "Container",
        default_width: 200.0,
        default_height: 200.0,
        content: None,
        style: &[("backgroundColor", "#f0f0f0"), ("border", "1px solid #ccc")],
    },
    ElementPreset {
        kind: "button",
        name: "Button",
        default_width: 120.0,
        default_height: 40.0,
        content: Some("Button"),
        style: &[
            ("backgroundColor", "#3b82f6"),
            ("color", "#ffffff"),
            ("borderRadius", "4px"),
            ("border", "none"),
            ("display", "flex"),
            ("alignItems", "center"),
            ("justifyContent", "center"),
            ("cursor", "pointer"),
            ("fontWeight", "bold"),
        ],
    },
    ElementPreset {
        kind: "text",
        name: "Text",
        default_width: 150.0,
        default_height: 24.0,
        content: Some("Text element"),
        style: &[("fontFamily", "sans-serif"), ("color", "#333333")],
    },
    ElementPreset {
        kind: "image",
        name: "Image",
        default_width: 150.0,
        default_height: 150.0,
        content: Some("📷"),
        style: &[
            ("backgroundColor", "#e2e8f0"),
            ("display", "flex"),
            ("alignItems", "center"),
            ("justifyContent", "center"),
            ("fontSize", "24px"),
            ("color", "#94a3b8"),
        ],
    },
    ElementPreset {
        kind: "input",
        name: "Input",
        default_width: 200.0,
        default_height: 40.0,
        content: Some("Input field"),
        style: &[
            ("border", "1px solid #ccc"),
            ("borderRadius", "4px"),
            ("padding", "8px 12px"),
        ],
    },
];

/// Look up a preset by element kind.
pub fn preset(kind: &str) -> Option<&'static ElementPreset> {
    PRESETS.iter().find(|p| p.kind == kind)
}

/// Parameters of the "custom element" dialog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CustomElement {
    pub width: f64,
    pub height: f64,
    pub background_color: String,
    pub border_width: f64,
    pub border_color: String,
    pub border_radius: f64,
    pub text: String,
}

impl Default for CustomElement {
    fn default() -> Self {
        Self {
            width: 150.0,
            height: 150.0,
            background_color: "#e2e8f0".into(),
            border_width: 1.0,
            border_color: "#cccccc".into(),
            border_radius: 0.0,
            text: String::new(),
        }
    }
}

impl CustomElement {
    /// A `custom` draft at the default drop point. The flex/padding hints
    /// only affect the canvas preview.
    pub fn draft(&self) -> ElementDraft {
        let mut style = StyleMap::new();
        style.set("backgroundColor", self.background_color.as_str());
        style.set("borderWidth", format!("{}px", self.border_width));
        style.set("borderStyle", "solid");
        style.set("borderColor", self.border_color.as_str());
        style.set("borderRadius", format!("{}px", self.border_radius));
        style.set("display", "flex");
        style.set("alignItems", "center");
        style.set("justifyContent", "center");
        style.set("padding", "8px");

        ElementDraft::new("custom", DROP_X, DROP_Y, self.width, self.height)
            .with_content(self.text.as_str())
            .with_style(style)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_lookup() {
        let button = preset("button").unwrap();
        assert_eq!(button.name, "Button");
        assert!(preset("marquee").is_none());
    }

    #[test]
    fn preset_draft_carries_defaults() {
        let draft = preset("text").unwrap().draft();
        assert_eq!((draft.x, draft.y), (DROP_X, DROP_Y));
        assert_eq!((draft.width, draft.height), (150.0, 24.0));
        assert_eq!(draft.content.as_deref(), Some("Text element"));
        assert_eq!(draft.style.get("fontFamily"), Some("sans-serif"));
    }

    #[test]
    fn custom_element_builds_border_style() {
        let custom = CustomElement {
            border_width: 2.0,
            border_radius: 6.0,
            text: "Hi".into(),
            ..Default::default()
        };
        let draft = custom.draft();
        assert_eq!(draft.kind, "custom");
        assert_eq!(draft.style.get("borderWidth"), Some("2px"));
        assert_eq!(draft.style.get("borderRadius"), Some("6px"));
        assert_eq!(draft.content.as_deref(), Some("Hi"));
    }

    #[test]
    fn custom_element_form_json() {
        let custom: CustomElement =
            serde_json::from_str(r##"{"width":80,"backgroundColor":"#fff"}"##).unwrap();
        assert_eq!(custom.width, 80.0);
        assert_eq!(custom.height, 150.0);
        assert_eq!(custom.background_color, "#fff");
    }
}
