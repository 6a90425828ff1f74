//! Export panel: picks a generator per tab and guards it.
//!
//! Each tab always produces readable text. An empty collection yields a
//! placeholder comment; a generator that panics yields the tab's fallback
//! text instead of propagating.

use abspos_core::model::Element;
use abspos_core::options::CssOptions;
use abspos_core::{generate_combined_code, generate_css_file, generate_html};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::str::FromStr;

/// Marker carried on the first line of every fallback text.
pub const FALLBACK_MARKER: &str = "generation failed - fallback content";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportTab {
    /// Standalone stylesheet.
    #[default]
    Css,
    /// Markup only.
    Html,
    /// One HTML document with the stylesheet inlined.
    Combined,
}

impl ExportTab {
    pub const ALL: [ExportTab; 3] = [ExportTab::Css, ExportTab::Html, ExportTab::Combined];

    pub fn label(self) -> &'static str {
        match self {
            ExportTab::Css => "css",
            ExportTab::Html => "html",
            ExportTab::Combined => "combined",
        }
    }

    /// Shown when there are no elements to export.
    pub fn placeholder(self) -> &'static str {
        match self {
            ExportTab::Css => "/* No elements to generate CSS for */",
            ExportTab::Html => "<!-- No elements to generate HTML for -->",
            ExportTab::Combined => "<!-- No elements to generate code for -->",
        }
    }

    /// Shown when the generator fails.
    pub fn fallback(self) -> &'static str {
        match self {
            ExportTab::Css => {
                "/* CSS generation failed - fallback content */\n.element {\n  position: relative;\n}"
            }
            ExportTab::Html => {
                "<!-- HTML generation failed - fallback content -->\n<div class=\"element\">Content</div>"
            }
            ExportTab::Combined => {
                "<!-- Combined generation failed - fallback content -->\n\
                 <!DOCTYPE html>\n<html>\n<head>\n  <title>Combined View</title>\n</head>\n\
                 <body>\n  <div>Content</div>\n</body>\n</html>"
            }
        }
    }

    /// Run this tab's generator without any guard.
    pub fn generate(self, elements: &[Element], options: &CssOptions) -> String {
        match self {
            ExportTab::Css => generate_css_file(elements, options),
            ExportTab::Html => generate_html(elements, options),
            ExportTab::Combined => generate_combined_code(elements, options),
        }
    }
}

impl fmt::Display for ExportTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ExportTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "css" => Ok(ExportTab::Css),
            "html" => Ok(ExportTab::Html),
            "combined" => Ok(ExportTab::Combined),
            other => Err(format!("unknown export tab `{other}` (expected css, html or combined)")),
        }
    }
}

/// Render one export tab for the panel.
pub fn render_tab(tab: ExportTab, elements: &[Element], options: &CssOptions) -> String {
    if elements.is_empty() {
        return tab.placeholder().to_string();
    }
    let text = recover(tab, || tab.generate(elements, options));
    log::debug!("{tab} export: {} bytes", text.len());
    text
}

/// Run `generate`, substituting the tab's fallback text if it panics.
pub fn recover<F>(tab: ExportTab, generate: F) -> String
where
    F: FnOnce() -> String,
{
    match panic::catch_unwind(AssertUnwindSafe(generate)) {
        Ok(text) => text,
        Err(payload) => {
            let reason = payload
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            log::error!("{tab} export failed: {reason}");
            tab.fallback().to_string()
        }
    }
}

/// Whether `text` is fallback output rather than generated code.
pub fn is_fallback(text: &str) -> bool {
    text.lines()
        .next()
        .is_some_and(|first| first.contains(FALLBACK_MARKER))
}
