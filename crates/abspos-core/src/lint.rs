//! Integrity diagnostics for element collections.
//!
//! Reports structural issues without modifying the collection. The store
//! runs this after rehydration; the exporter logs the results.

use crate::id::ElementId;
use crate::model::Element;
use crate::tree::ElementTree;
use std::collections::HashSet;

// ─── Diagnostic types ────────────────────────────────────────────────────

/// Severity of a lint finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintSeverity {
    /// Breaks a tree invariant; export output will be incomplete.
    Warning,
    /// Suspicious value the editor tolerates.
    Info,
}

/// A single lint diagnostic for an element.
#[derive(Debug, Clone)]
pub struct LintDiagnostic {
    pub element_id: ElementId,
    pub message: String,
    pub severity: LintSeverity,
    /// Short rule identifier (e.g. "dangling-parent", "duplicate-id").
    pub rule: &'static str,
}

// ─── Public API ───────────────────────────────────────────────────────────

/// Run all lint rules over the snapshot and return diagnostics.
#[must_use]
pub fn lint_elements(elements: &[Element]) -> Vec<LintDiagnostic> {
    let mut diags = Vec::new();
    lint_duplicate_ids(elements, &mut diags);
    lint_dangling_parents(elements, &mut diags);
    lint_parent_cycles(elements, &mut diags);
    lint_geometry(elements, &mut diags);
    diags
}

// ─── Rules ────────────────────────────────────────────────────────────────

fn lint_duplicate_ids(elements: &[Element], diags: &mut Vec<LintDiagnostic>) {
    let mut seen = HashSet::with_capacity(elements.len());
    for el in elements {
        if !seen.insert(el.id) {
            diags.push(LintDiagnostic {
                element_id: el.id,
                message: format!("Element id `{}` appears more than once.", el.id),
                severity: LintSeverity::Warning,
                rule: "duplicate-id",
            });
        }
    }
}

/// Elements whose parent is missing are skipped by every generator: they
/// are not roots and no root reaches them.
fn lint_dangling_parents(elements: &[Element], diags: &mut Vec<LintDiagnostic>) {
    let ids: HashSet<ElementId> = elements.iter().map(|el| el.id).collect();
    for el in elements {
        if let Some(parent) = el.parent_id
            && !ids.contains(&parent)
        {
            diags.push(LintDiagnostic {
                element_id: el.id,
                message: format!(
                    "Element `{}` points at missing parent `{parent}` and will not be exported.",
                    el.id
                ),
                severity: LintSeverity::Warning,
                rule: "dangling-parent",
            });
        }
    }
}

fn lint_parent_cycles(elements: &[Element], diags: &mut Vec<LintDiagnostic>) {
    let tree = ElementTree::build(elements);
    for cycle in tree.cycles() {
        let members = cycle
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(" → ");
        for id in cycle {
            diags.push(LintDiagnostic {
                element_id: id,
                message: format!("Element `{id}` is part of a parent cycle ({members})."),
                severity: LintSeverity::Warning,
                rule: "parent-cycle",
            });
        }
    }
}

fn lint_geometry(elements: &[Element], diags: &mut Vec<LintDiagnostic>) {
    for el in elements {
        let values = [el.x, el.y, el.width, el.height, el.rotation];
        if values.iter().any(|v| !v.is_finite()) {
            diags.push(LintDiagnostic {
                element_id: el.id,
                message: format!("Element `{}` has a non-finite position, size, or rotation.", el.id),
                severity: LintSeverity::Warning,
                rule: "non-finite-geometry",
            });
        } else if el.width <= 0.0 || el.height <= 0.0 {
            diags.push(LintDiagnostic {
                element_id: el.id,
                message: format!(
                    "Element `{}` has a non-positive size ({}×{}).",
                    el.id, el.width, el.height
                ),
                severity: LintSeverity::Info,
                rule: "non-positive-size",
            });
        }
    }
}
