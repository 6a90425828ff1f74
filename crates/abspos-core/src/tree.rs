//! On-demand parent → child graph over an element snapshot.
//!
//! The element collection stores only `parent_id` back-links. Cycle checks,
//! cascading deletes, and integrity lints need forward adjacency, so this
//! module builds a throwaway `petgraph` view whenever one is asked for.
//! No index is cached between calls.

use crate::id::ElementId;
use crate::model::Element;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use std::collections::{HashMap, HashSet};

/// Forward adjacency for a snapshot of elements.
///
/// Edges go parent → child. Elements whose `parent_id` does not resolve are
/// left without an incoming edge (they behave as roots for traversal).
pub struct ElementTree {
    graph: DiGraph<ElementId, ()>,
    index: HashMap<ElementId, NodeIndex>,
}

impl ElementTree {
    /// Build the graph from a snapshot. Duplicate ids collapse onto the first
    /// occurrence.
    pub fn build(elements: &[Element]) -> Self {
        let mut graph = DiGraph::with_capacity(elements.len(), elements.len());
        let mut index = HashMap::with_capacity(elements.len());
        for el in elements {
            index.entry(el.id).or_insert_with(|| graph.add_node(el.id));
        }
        for el in elements {
            if let Some(parent) = el.parent_id
                && let (Some(&p), Some(&c)) = (index.get(&parent), index.get(&el.id))
            {
                graph.update_edge(p, c, ());
            }
        }
        Self { graph, index }
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.index.contains_key(&id)
    }

    /// Whether `to` is reachable from `from` by following parent → child
    /// links. An element reaches itself.
    ///
    /// Depth-first; terminates even on corrupt data that already contains a
    /// parent cycle.
    pub fn reaches(&self, from: ElementId, to: ElementId) -> bool {
        if from == to {
            return true;
        }
        let (Some(&start), Some(&goal)) = (self.index.get(&from), self.index.get(&to)) else {
            return false;
        };
        let mut dfs = Dfs::new(&self.graph, start);
        while let Some(nx) = dfs.next(&self.graph) {
            if nx == goal {
                return true;
            }
        }
        false
    }

    /// Whether making `new_parent` the parent of `child` would close a loop,
    /// i.e. `new_parent` is `child` itself or one of its descendants.
    pub fn would_cycle(&self, child: ElementId, new_parent: ElementId) -> bool {
        self.reaches(child, new_parent)
    }

    /// `root` plus all of its transitive descendants. Empty if `root` is unknown.
    pub fn subtree(&self, root: ElementId) -> HashSet<ElementId> {
        let mut out = HashSet::new();
        let Some(&start) = self.index.get(&root) else {
            return out;
        };
        let mut dfs = Dfs::new(&self.graph, start);
        while let Some(nx) = dfs.next(&self.graph) {
            out.insert(self.graph[nx]);
        }
        out
    }

    /// Groups of elements caught in a parent cycle (including self-parenting).
    ///
    /// The store never creates these, but a hand-edited or corrupted persisted
    /// record can contain them.
    pub fn cycles(&self) -> Vec<Vec<ElementId>> {
        petgraph::algo::tarjan_scc(&self.graph)
            .into_iter()
            .filter(|scc| match scc.as_slice() {
                [single] => self.graph.contains_edge(*single, *single),
                _ => true,
            })
            .map(|scc| scc.into_iter().map(|nx| self.graph[nx]).collect())
            .collect()
    }
}
