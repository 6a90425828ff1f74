//! Combined export: one standalone HTML document with the stylesheet
//! inlined in a `<style>` block and the markup in `<body>`.

use crate::css::generate_css_at;
use crate::html::html_body_at;
use crate::model::Element;
use crate::options::CssOptions;
use chrono::{DateTime, Local};

/// Generate a complete HTML document with inlined CSS.
#[must_use]
pub fn generate_combined_code(elements: &[Element], options: &CssOptions) -> String {
    generate_combined_code_at(elements, options, &Local::now())
}

/// [`generate_combined_code`] with an explicit banner timestamp.
#[must_use]
pub fn generate_combined_code_at(
    elements: &[Element],
    options: &CssOptions,
    at: &DateTime<Local>,
) -> String {
    let css = generate_css_at(elements, options, at);
    let html = html_body_at(elements, options, at);

    let mut doc = String::with_capacity(css.len() + html.len() + 512);
    doc.push_str("<!DOCTYPE html>\n");
    doc.push_str("<html lang=\"en\">\n");
    doc.push_str("<head>\n");
    doc.push_str("  <meta charset=\"UTF-8\">\n");
    doc.push_str(
        "  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
    );
    doc.push_str("  <title>Generated Layout</title>\n");
    doc.push_str("  <!-- Internal CSS styles - ready to use immediately -->\n");
    doc.push_str("  <style>\n");
    doc.push_str(&indent_lines(&css, "    "));
    doc.push_str("\n  </style>\n");
    doc.push_str("  <!-- \n");
    doc.push_str("    COMBINED VIEW: \n");
    doc.push_str("    This HTML includes all CSS styles internally, so you can copy and\n");
    doc.push_str(
        "    paste this complete code into a single file to see the result immediately.\n",
    );
    doc.push_str("  -->\n");
    doc.push_str("</head>\n");
    doc.push_str("<body>\n\n");
    doc.push_str(&indent_lines(&html, "  "));
    doc.push_str("\n</body>\n");
    doc.push_str("</html>");
    doc
}

/// Prefix every line (including a trailing empty one) with `pad`.
fn indent_lines(text: &str, pad: &str) -> String {
    text.split('\n')
        .map(|line| format!("{pad}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::ElementId;
    use crate::model::ElementDraft;

    #[test]
    fn indent_lines_pads_each_line() {
        assert_eq!(indent_lines("a\nb\n", "  "), "  a\n  b\n  ");
    }

    #[test]
    fn empty_document_skeleton() {
        let doc = generate_combined_code(&[], &CssOptions::default());
        assert!(doc.starts_with("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n"));
        assert!(doc.ends_with("\n</body>\n</html>"));
        assert_eq!(doc.matches("<style>").count(), 1);
        assert_eq!(doc.matches("</style>").count(), 1);
    }

    #[test]
    fn css_is_inside_style_block() {
        let elements = [ElementDraft::new("div", 1.0, 2.0, 3.0, 4.0)
            .into_element(ElementId::intern("element-d-1"), 1)];
        let doc = generate_combined_code(&elements, &CssOptions::default());
        let open = doc.find("<style>").unwrap();
        let close = doc.find("</style>").unwrap();
        let rule = doc.find("    div.element-div-1 {").unwrap();
        assert!(open < rule && rule < close);
        assert!(!doc.contains("HTML STRUCTURE TAB"));
    }
}
