//! CSS generator: element snapshot → absolute-positioning stylesheet.
//!
//! Traversal is depth-first, parent before children, roots and siblings in
//! collection order. The HTML generator walks the same order so every rule
//! lines up with one element in the markup.

use crate::id::ElementId;
use crate::model::{Element, Positioning};
use crate::options::{
    CssOptions, DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH, TOOL_NAME, banner_timestamp,
    format_num, format_percent,
};
use chrono::{DateTime, Local};
use smallvec::SmallVec;
use std::collections::HashSet;
use std::fmt::Write;

/// Banner placed above the stylesheet when it is exported as its own file.
pub const CSS_FILE_BANNER: &str = "/* CSS STYLES TAB */\n\
/* This is the content for the standalone CSS file (styles.css) */\n\
/* Save this code as \"styles.css\" to use with your HTML */\n\n";

// ─── Selectors ───────────────────────────────────────────────────────────

/// Class name shared by the CSS selector and the HTML `class` attribute:
/// `element-{type}-{shortId}`.
pub fn class_name(element: &Element) -> String {
    format!("element-{}-{}", element.kind, element.short_id())
}

/// Selector for the element alone, without its ancestors.
fn own_selector(element: &Element, options: &CssOptions) -> String {
    let kind = &element.kind;
    let short = element.short_id();
    if !options.include_prefix {
        return format!("{kind}.{}", class_name(element));
    }
    let prefix = options.prefix.as_str();
    if prefix.starts_with('#') {
        format!("{prefix}{short}")
    } else if prefix.starts_with('.') {
        format!("{kind}{prefix}{short}")
    } else {
        format!("{kind}.{prefix}-{short}")
    }
}

/// Full selector for an element: its ancestors' selectors joined with the
/// child combinator, root first (`div.a > button.b`).
///
/// The chain stops at a parent id that does not resolve, or at an element
/// already on the chain if the snapshot contains a cycle.
pub fn selector_for<'a>(
    element: &'a Element,
    options: &CssOptions,
    elements: &'a [Element],
) -> String {
    let mut chain: SmallVec<[&Element; 8]> = SmallVec::new();
    let mut seen: SmallVec<[ElementId; 8]> = SmallVec::new();
    chain.push(element);
    seen.push(element.id);

    let mut current = element;
    while let Some(parent) = current.parent_id.and_then(|pid| find(elements, pid)) {
        if seen.contains(&parent.id) {
            break;
        }
        chain.push(parent);
        seen.push(parent.id);
        current = parent;
    }

    chain
        .iter()
        .rev()
        .map(|el| own_selector(el, options))
        .collect::<Vec<_>>()
        .join(" > ")
}

// ─── Declarations ────────────────────────────────────────────────────────

/// Percentage base for one axis: the parent's dimension, or the canvas
/// dimension when there is no parent or the parent's is zero.
fn base_dimension(parent: Option<f64>, canvas: f64) -> f64 {
    match parent {
        Some(d) if d != 0.0 && !d.is_nan() => d,
        _ => canvas,
    }
}

/// Ordered `(property, value)` pairs for one element.
///
/// `parent` is the percentage base for offsets and sizes; `None` means the
/// canvas (1200×800).
pub fn declaration_list(
    element: &Element,
    options: &CssOptions,
    parent: Option<&Element>,
) -> Vec<(String, String)> {
    let mut decls: Vec<(String, String)> = Vec::with_capacity(8 + element.style.len());
    let positioning = element.positioning();
    decls.push(("position".into(), positioning.as_str().into()));

    let base_w = base_dimension(parent.map(|p| p.width), DEFAULT_CANVAS_WIDTH);
    let base_h = base_dimension(parent.map(|p| p.height), DEFAULT_CANVAS_HEIGHT);

    match positioning {
        Positioning::Absolute => {
            if options.use_pixels {
                decls.push(("left".into(), format!("{}px", format_num(element.x))));
                decls.push(("top".into(), format!("{}px", format_num(element.y))));
            } else {
                decls.push(("left".into(), format_percent(element.x, base_w)));
                decls.push(("top".into(), format_percent(element.y, base_h)));
            }
        }
        // Relative offsets stay in pixels even in percentage mode.
        Positioning::Relative => {
            if element.x != 0.0 || element.y != 0.0 {
                decls.push(("left".into(), format!("{}px", format_num(element.x))));
                decls.push(("top".into(), format!("{}px", format_num(element.y))));
            }
        }
        Positioning::Other(_) => {}
    }

    if options.use_pixels {
        decls.push(("width".into(), format!("{}px", format_num(element.width))));
        decls.push(("height".into(), format!("{}px", format_num(element.height))));
    } else {
        decls.push(("width".into(), format_percent(element.width, base_w)));
        decls.push(("height".into(), format_percent(element.height, base_h)));
    }

    if element.z_index != 0 {
        decls.push(("z-index".into(), element.z_index.to_string()));
    }

    if element.rotation != 0.0 && !element.rotation.is_nan() {
        decls.push((
            "transform".into(),
            format!("rotate({}deg)", format_num(element.rotation)),
        ));
    }

    for decl in element.style.exported() {
        decls.push((decl.css_name.clone(), decl.value.clone()));
    }

    decls
}

/// One complete CSS rule for `element`, preceded by a one-line comment when
/// comments are enabled.
pub fn declarations_for(
    element: &Element,
    options: &CssOptions,
    parent: Option<&Element>,
    elements: &[Element],
) -> String {
    let indent = options.indent();
    let nl = options.newline();
    let mut css = String::with_capacity(256);

    if options.include_comments {
        let _ = write!(
            css,
            "/* {} element - ID: {} */{nl}",
            element.kind,
            element.short_id()
        );
    }

    let _ = write!(css, "{} {{{nl}", selector_for(element, options, elements));
    for (property, value) in declaration_list(element, options, parent) {
        let _ = write!(css, "{indent}{property}: {value};{nl}");
    }
    let _ = write!(css, "}}{nl}");

    log::trace!("CSS rule {}", element.id);
    css
}

// ─── Traversal ───────────────────────────────────────────────────────────

pub(crate) fn find(elements: &[Element], id: ElementId) -> Option<&Element> {
    elements.iter().find(|el| el.id == id)
}

/// Direct children of `id`, in collection order.
pub(crate) fn children<'a>(
    elements: &'a [Element],
    id: ElementId,
) -> impl Iterator<Item = &'a Element> {
    elements.iter().filter(move |el| el.parent_id == Some(id))
}

/// The rule for `element` followed by the rules of all its descendants,
/// depth-first, parent before children.
///
/// When `parent` is `None` the element's parent is looked up by id.
pub fn generate_element_and_children_css(
    element: &Element,
    elements: &[Element],
    options: &CssOptions,
    parent: Option<&Element>,
) -> String {
    let mut out = String::new();
    let mut visited = HashSet::new();
    emit_subtree(&mut out, element, elements, options, parent, &mut visited);
    out
}

fn emit_subtree<'a>(
    out: &mut String,
    element: &'a Element,
    elements: &'a [Element],
    options: &CssOptions,
    parent: Option<&'a Element>,
    visited: &mut HashSet<ElementId>,
) {
    if !visited.insert(element.id) {
        return;
    }
    let parent = parent.or_else(|| element.parent_id.and_then(|pid| find(elements, pid)));
    out.push_str(&declarations_for(element, options, parent, elements));

    let mut kids = children(elements, element.id).peekable();
    if kids.peek().is_some() {
        out.push_str(options.newline());
        for child in kids {
            emit_subtree(out, child, elements, options, Some(element), visited);
        }
    }
}

// ─── Entry points ────────────────────────────────────────────────────────

/// Generate the stylesheet for every root element and its descendants.
#[must_use]
pub fn generate_css(elements: &[Element], options: &CssOptions) -> String {
    generate_css_at(elements, options, &Local::now())
}

/// [`generate_css`] with an explicit banner timestamp.
#[must_use]
pub fn generate_css_at(elements: &[Element], options: &CssOptions, at: &DateTime<Local>) -> String {
    let mut css = String::with_capacity(1024);

    if options.include_comments {
        let _ = write!(
            css,
            "/* CSS Generated by {TOOL_NAME} */\n/* Created on: {} */\n\n",
            banner_timestamp(at)
        );
    }

    let mut visited = HashSet::new();
    for root in elements.iter().filter(|el| el.is_root()) {
        emit_subtree(&mut css, root, elements, options, None, &mut visited);
        css.push_str(options.newline());
    }

    log::debug!("generated CSS for {} elements ({} bytes)", visited.len(), css.len());
    css
}

/// The stylesheet prefixed with the standalone-file banner.
#[must_use]
pub fn generate_css_file(elements: &[Element], options: &CssOptions) -> String {
    generate_css_file_at(elements, options, &Local::now())
}

/// [`generate_css_file`] with an explicit banner timestamp.
#[must_use]
pub fn generate_css_file_at(
    elements: &[Element],
    options: &CssOptions,
    at: &DateTime<Local>,
) -> String {
    let mut out = String::from(CSS_FILE_BANNER);
    out.push_str(&generate_css_at(elements, options, at));
    out
}
