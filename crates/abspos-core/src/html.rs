//! HTML generator: element snapshot → indented markup.
//!
//! Walks the tree in the same order as the CSS generator and tags every
//! element with the class name its CSS rule selects on.

use crate::css::{children, class_name};
use crate::id::ElementId;
use crate::model::Element;
use crate::options::{CssOptions, TOOL_NAME, banner_timestamp};
use chrono::{DateTime, Local};
use std::collections::HashSet;
use std::fmt::Write;

/// Banner marking the HTML-structure export. The combined document omits it.
pub const HTML_TAB_BANNER: &str = "<!-- HTML STRUCTURE TAB -->\n\
<!-- This is the HTML structure with element classes -->\n\
<!-- Use this with the CSS code from the CSS tab -->\n\n";

/// Generate the HTML structure export: tab banner, optional generation
/// banner, then the element markup.
#[must_use]
pub fn generate_html(elements: &[Element], options: &CssOptions) -> String {
    generate_html_at(elements, options, &Local::now())
}

/// [`generate_html`] with an explicit banner timestamp.
#[must_use]
pub fn generate_html_at(elements: &[Element], options: &CssOptions, at: &DateTime<Local>) -> String {
    let mut html = String::from(HTML_TAB_BANNER);
    html.push_str(&html_body_at(elements, options, at));
    html
}

/// Generation banner (when comments are enabled) followed by the markup.
/// This is what the combined document embeds in `<body>`.
pub(crate) fn html_body_at(elements: &[Element], options: &CssOptions, at: &DateTime<Local>) -> String {
    let mut html = String::with_capacity(512);
    if options.include_comments {
        let _ = write!(
            html,
            "<!-- HTML Generated by {TOOL_NAME} -->\n<!-- Created on: {} -->\n\n",
            banner_timestamp(at)
        );
    }
    html.push_str(&html_fragment(elements, options));
    html
}

/// Markup for every root element and its descendants, with no banners.
#[must_use]
pub fn html_fragment(elements: &[Element], options: &CssOptions) -> String {
    let mut html = String::with_capacity(512);
    let mut visited = HashSet::new();
    for root in elements.iter().filter(|el| el.is_root()) {
        emit_element(&mut html, root, elements, options, 0, &mut visited);
    }
    html
}

fn emit_element(
    out: &mut String,
    element: &Element,
    elements: &[Element],
    options: &CssOptions,
    depth: usize,
    visited: &mut HashSet<ElementId>,
) {
    if !visited.insert(element.id) {
        return;
    }
    let indent = options.indent();
    let nl = options.newline();
    let pad = indent.repeat(depth);
    let tag = &element.kind;

    let _ = write!(out, "{pad}<{tag} class=\"{}\">{nl}", class_name(element));
    if let Some(content) = element.content.as_deref().filter(|c| !c.is_empty()) {
        let _ = write!(out, "{pad}{indent}{content}{nl}");
    }
    for child in children(elements, element.id) {
        emit_element(out, child, elements, options, depth + 1, visited);
    }
    let _ = write!(out, "{pad}</{tag}>{nl}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ElementDraft;
    use pretty_assertions::assert_eq;

    fn el(id: &str, kind: &str, parent: Option<&str>, content: Option<&str>) -> Element {
        let mut draft = ElementDraft::new(kind, 0.0, 0.0, 10.0, 10.0);
        draft.parent_id = parent.map(ElementId::intern);
        draft.content = content.map(str::to_string);
        draft.into_element(ElementId::intern(id), 1)
    }

    #[test]
    fn nested_markup_is_indented() {
        let elements = [
            el("element-1-1", "div", None, None),
            el("element-1-2", "button", Some("element-1-1"), Some("Go")),
        ];
        assert_eq!(
            html_fragment(&elements, &CssOptions::default()),
            "<div class=\"element-div-1\">\n  \
             <button class=\"element-button-2\">\n    Go\n  </button>\n\
             </div>\n"
        );
    }

    #[test]
    fn minified_markup() {
        let elements = [el("element-2-1", "p", None, Some("hi"))];
        let opts = CssOptions {
            format_output: false,
            ..Default::default()
        };
        assert_eq!(
            html_fragment(&elements, &opts),
            "<p class=\"element-p-1\">hi</p>"
        );
    }

    #[test]
    fn tab_banner_always_present() {
        let opts = CssOptions {
            include_comments: false,
            ..Default::default()
        };
        assert_eq!(generate_html(&[], &opts), HTML_TAB_BANNER);

        let with_comments = generate_html(&[], &CssOptions::default());
        assert!(with_comments.contains("<!-- HTML Generated by Absolute Positioning CSS Generator Tool -->"));
    }

    #[test]
    fn orphans_are_not_emitted() {
        let elements = [
            el("element-3-1", "div", None, None),
            el("element-3-2", "span", Some("element-3-404"), None),
        ];
        let html = html_fragment(&elements, &CssOptions::default());
        assert!(!html.contains("element-span-2"));
    }
}
