//! Integration tests: element snapshot → CSS / HTML / combined document.
//!
//! Exercises the generators together on the same trees to check that their
//! outputs agree with each other.

use abspos_core::id::ElementId;
use abspos_core::model::*;
use abspos_core::options::CssOptions;
use abspos_core::{
    class_name, generate_combined_code_at, generate_css_at, generate_css_file_at,
    generate_element_and_children_css, generate_html_at, html_fragment, selector_for,
};
use chrono::{Local, TimeZone};
use pretty_assertions::assert_eq;

// ─── Helpers ─────────────────────────────────────────────────────────────

fn at() -> chrono::DateTime<Local> {
    Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap()
}

fn el(id: &str, kind: &str, parent: Option<&str>, rect: (f64, f64, f64, f64)) -> Element {
    let (x, y, w, h) = rect;
    let mut draft = ElementDraft::new(kind, x, y, w, h);
    draft.parent_id = parent.map(ElementId::intern);
    draft.into_element(ElementId::intern(id), 1)
}

/// A page, a card inside it, and a button plus caption inside the card.
fn card_tree() -> Vec<Element> {
    let mut button = el("element-10-btn", "button", Some("element-10-card"), (20.0, 150.0, 120.0, 40.0));
    button.content = Some("Buy".into());
    button.style = [("backgroundColor", "#4a90e2"), ("display", "flex")]
        .into_iter()
        .collect();
    vec![
        el("element-10-page", "div", None, (0.0, 0.0, 1200.0, 800.0)),
        el("element-10-card", "div", Some("element-10-page"), (300.0, 100.0, 400.0, 300.0)),
        button,
        el("element-10-cap", "text", Some("element-10-card"), (20.0, 20.0, 150.0, 24.0)),
        el("element-10-aside", "div", None, (900.0, 0.0, 300.0, 800.0)),
    ]
}

fn quiet() -> CssOptions {
    CssOptions {
        include_comments: false,
        ..Default::default()
    }
}

// ─── Selector / class correspondence ─────────────────────────────────────

#[test]
fn every_html_class_has_a_css_rule() {
    let elements = card_tree();
    let opts = CssOptions::default();
    let css = generate_css_at(&elements, &opts, &at());
    let html = generate_html_at(&elements, &opts, &at());

    for element in &elements {
        let class = class_name(element);
        assert!(html.contains(&format!("class=\"{class}\"")), "{class} missing from HTML");
        let selector = selector_for(element, &opts, &elements);
        assert!(selector.ends_with(&format!("{}.{class}", element.kind)));
        assert!(css.contains(&format!("{selector} {{")), "{selector} missing from CSS");
    }
}

#[test]
fn nested_selector_chain() {
    let elements = card_tree();
    assert_eq!(
        selector_for(&elements[2], &CssOptions::default(), &elements),
        "div.element-div-page > div.element-div-card > button.element-button-btn"
    );
}

#[test]
fn prefixed_selectors() {
    let elements = card_tree();
    let with_prefix = |prefix: &str| CssOptions {
        include_prefix: true,
        prefix: prefix.into(),
        ..Default::default()
    };
    assert_eq!(selector_for(&elements[0], &with_prefix("#box"), &elements), "#boxpage");
    assert_eq!(selector_for(&elements[0], &with_prefix(".box"), &elements), "div.boxpage");
    assert_eq!(selector_for(&elements[0], &with_prefix("box"), &elements), "div.box-page");
}

// ─── Percent conversion ──────────────────────────────────────────────────

#[test]
fn root_percentages_use_canvas() {
    let elements = [el("element-20-a", "div", None, (600.0, 200.0, 1200.0, 400.0))];
    let opts = CssOptions {
        use_pixels: false,
        ..quiet()
    };
    let css = generate_css_at(&elements, &opts, &at());
    assert!(css.contains("left: 50.00%;"));
    assert!(css.contains("top: 25.00%;"));
    assert!(css.contains("width: 100.00%;"));
    assert!(css.contains("height: 50.00%;"));
}

#[test]
fn half_hundredth_percentages_round_up() {
    let elements = [el("element-20-b", "div", None, (1.5, 1.0, 300.0, 200.0))];
    let opts = CssOptions {
        use_pixels: false,
        ..quiet()
    };
    let css = generate_css_at(&elements, &opts, &at());
    assert!(css.contains("left: 0.13%;"));
    assert!(css.contains("top: 0.13%;"));
}

#[test]
fn child_percentages_use_parent() {
    let elements = card_tree();
    let opts = CssOptions {
        use_pixels: false,
        ..quiet()
    };
    let rule = generate_element_and_children_css(&elements[3], &elements, &opts, None);
    // caption: 20/400, 20/300, 150/400, 24/300
    assert!(rule.contains("left: 5.00%;"));
    assert!(rule.contains("top: 6.67%;"));
    assert!(rule.contains("width: 37.50%;"));
    assert!(rule.contains("height: 8.00%;"));
}

#[test]
fn zero_sized_parent_falls_back_to_canvas() {
    let elements = [
        el("element-21-p", "div", None, (0.0, 0.0, 0.0, 0.0)),
        el("element-21-c", "div", Some("element-21-p"), (120.0, 80.0, 600.0, 400.0)),
    ];
    let opts = CssOptions {
        use_pixels: false,
        ..quiet()
    };
    let rule = generate_element_and_children_css(&elements[1], &elements, &opts, None);
    assert!(rule.contains("left: 10.00%;"));
    assert!(rule.contains("height: 50.00%;"));
    assert!(!rule.contains("inf"));
    assert!(!rule.contains("NaN"));
}

// ─── Full outputs ────────────────────────────────────────────────────────

#[test]
fn css_file_exact_output() {
    let elements = [el("element-30-a", "div", None, (10.0, 20.0, 100.0, 50.0))];
    let css = generate_css_file_at(&elements, &CssOptions::default(), &at());
    assert_eq!(
        css,
        "/* CSS STYLES TAB */\n\
         /* This is the content for the standalone CSS file (styles.css) */\n\
         /* Save this code as \"styles.css\" to use with your HTML */\n\n\
         /* CSS Generated by Absolute Positioning CSS Generator Tool */\n\
         /* Created on: 3/9/2024, 2:05:07 PM */\n\n\
         /* div element - ID: a */\n\
         div.element-div-a {\n  \
         position: absolute;\n  \
         left: 10px;\n  \
         top: 20px;\n  \
         width: 100px;\n  \
         height: 50px;\n  \
         z-index: 1;\n\
         }\n\n"
    );
}

#[test]
fn editor_only_hints_never_reach_css() {
    let elements = card_tree();
    let css = generate_css_at(&elements, &quiet(), &at());
    assert!(css.contains("background-color: #4a90e2;"));
    assert!(!css.contains("display"));
}

#[test]
fn combined_document_embeds_css_and_markup() {
    let elements = card_tree();
    let opts = CssOptions::default();
    let doc = generate_combined_code_at(&elements, &opts, &at());

    assert!(doc.starts_with("<!DOCTYPE html>"));
    assert_eq!(doc.matches("<style>").count(), 1);
    assert_eq!(doc.matches("</style>").count(), 1);

    let style_end = doc.find("</style>").unwrap();
    let body_start = doc.find("<body>").unwrap();
    let body_end = doc.find("</body>").unwrap();
    let css = generate_css_at(&elements, &opts, &at());
    for line in css.lines().filter(|l| !l.is_empty()) {
        let pos = doc.find(line).unwrap_or_else(|| panic!("missing CSS line {line:?}"));
        assert!(pos < style_end);
    }
    for line in html_fragment(&elements, &opts).lines() {
        let pos = doc[body_start..]
            .find(line)
            .unwrap_or_else(|| panic!("missing HTML line {line:?}"));
        assert!(body_start + pos < body_end);
    }
    assert!(!doc.contains("HTML STRUCTURE TAB"));
}

#[test]
fn minified_output_has_no_line_breaks_in_rules() {
    let elements = card_tree();
    let opts = CssOptions {
        format_output: false,
        ..quiet()
    };
    let css = generate_css_at(&elements, &opts, &at());
    assert!(!css.contains('\n'));
    assert!(css.starts_with("div.element-div-page {position: absolute;left: 0px;"));
}
