pub mod css;
pub mod document;
pub mod html;
pub mod id;
pub mod lint;
pub mod model;
pub mod options;
pub mod presets;
pub mod tree;

pub use css::{
    class_name, declaration_list, declarations_for, generate_css, generate_css_at,
    generate_css_file, generate_css_file_at, generate_element_and_children_css, selector_for,
};
pub use document::{generate_combined_code, generate_combined_code_at};
pub use html::{generate_html, generate_html_at, html_fragment};
pub use id::ElementId;
pub use lint::{LintDiagnostic, LintSeverity, lint_elements};
pub use model::*;
pub use options::CssOptions;
pub use presets::{CustomElement, ElementPreset, PRESETS};
pub use tree::ElementTree;
