//! Frontier bookkeeping shared by the engines

use std::collections::HashSet;
use trellis_core::Node;

/// A node discovered during traversal, with its query similarity and its
/// graph distance from the nearest seed.
#[derive(Debug, Clone)]
pub(crate) struct Discovered {
    pub node: Node,
    pub score: f64,
    pub depth: usize,
}

/// Deterministic traversal order: descending query similarity, ties broken
/// by ascending id.
pub(crate) fn sort_by_score_then_id(candidates: &mut [Discovered]) {
    candidates.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.node.id.cmp(&b.node.id))
    });
}

/// Ids seen by a single traversal call.
///
/// A node is expanded at most once per call; `insert` returns false for
/// nodes that were already discovered.
#[derive(Debug, Default)]
pub(crate) struct Visited {
    ids: HashSet<String>,
}

impl Visited {
    pub fn insert(&mut self, id: &str) -> bool {
        self.ids.insert(id.to_string())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }
}
