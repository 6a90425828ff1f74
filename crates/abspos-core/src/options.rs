//! Code-generation configuration shared by the CSS, HTML, and combined
//! document generators.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Canvas width used as the percentage base for elements without a parent.
pub const DEFAULT_CANVAS_WIDTH: f64 = 1200.0;
/// Canvas height used as the percentage base for elements without a parent.
pub const DEFAULT_CANVAS_HEIGHT: f64 = 800.0;

/// Tool name written into generation banners.
pub const TOOL_NAME: &str = "Absolute Positioning CSS Generator Tool";

// ─── Config ───────────────────────────────────────────────────────────────

/// Configuration for the code generators.
///
/// Field names serialize camelCase so a browser UI can pass its option
/// panel state straight through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CssOptions {
    /// Emit `px` offsets and sizes. When false, absolute offsets and all
    /// sizes become percentages of the parent (or canvas). Default: **true**.
    pub use_pixels: bool,

    /// Emit banner and per-rule comments. Default: **true**.
    pub include_comments: bool,

    /// Pretty-print with two-space indentation and newlines. Default: **true**.
    pub format_output: bool,

    /// Derive selectors from `prefix` instead of the generated class name.
    /// Default: **false**.
    pub include_prefix: bool,

    /// `#p` → ID selector `#p{short}`, `.p` → class selector `{type}.p{short}`,
    /// anything else → class selector `{type}.{prefix}-{short}`.
    /// Default: `"element"`.
    pub prefix: String,
}

impl Default for CssOptions {
    fn default() -> Self {
        Self {
            use_pixels: true,
            include_comments: true,
            format_output: true,
            include_prefix: false,
            prefix: "element".into(),
        }
    }
}

impl CssOptions {
    /// Indentation unit: two spaces when formatting, nothing when minified.
    pub fn indent(&self) -> &'static str {
        if self.format_output { "  " } else { "" }
    }

    /// Line break: `\n` when formatting, nothing when minified.
    pub fn newline(&self) -> &'static str {
        if self.format_output { "\n" } else { "" }
    }
}

// ─── Formatting helpers ───────────────────────────────────────────────────

/// Local time as written into "Created on:" banners.
pub fn banner_timestamp(at: &DateTime<Local>) -> String {
    at.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
}

/// Shortest decimal form of a number: `50`, `50.5`, `-3`.
pub(crate) fn format_num(n: f64) -> String {
    if n == 0.0 {
        // avoid `-0`
        return "0".into();
    }
    format!("{n}")
}

/// Two-decimal percentage of `part` relative to `whole`. Ties round away
/// from zero (`0.125` → `0.13`), as browser `toFixed(2)` does.
pub(crate) fn format_percent(part: f64, whole: f64) -> String {
    let pct = part / whole * 100.0;
    format!("{:.2}%", (pct * 100.0).round() / 100.0)
}
