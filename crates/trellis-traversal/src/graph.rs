//! Breadth-complete graph traversal
//!
//! Seeds come from similarity search; every unseen neighbor at each depth
//! joins the result set until the depth bound, the result cap, or an empty
//! frontier ends the walk. Within a depth, nodes are emitted by descending
//! similarity to the original query, ties broken by ascending id, so a
//! traversal over an unchanged store always yields the same ordered result.

use crate::expand::neighbors_or_skip;
use crate::frontier::{sort_by_score_then_id, Discovered, Visited};
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use trellis_core::{cosine_similarity, Node, Result, TraversalAdapter, TraversalConfig};

/// Graph traversal engine over an injected backend adapter.
pub struct GraphTraversal<A: TraversalAdapter + ?Sized> {
    adapter: Arc<A>,
    config: TraversalConfig,
}

impl<A: TraversalAdapter + ?Sized> GraphTraversal<A> {
    /// Create an engine, validating the configuration up front
    pub fn new(adapter: Arc<A>, config: TraversalConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { adapter, config })
    }

    pub fn config(&self) -> &TraversalConfig {
        &self.config
    }

    /// Run a traversal to completion
    pub async fn traverse(&self, query: &[f32]) -> Result<Vec<Node>> {
        self.traverse_with_cancellation(query, CancellationToken::new())
            .await
    }

    /// Run a traversal, observing `cancel` at each depth boundary.
    ///
    /// On cancellation the nodes selected so far are returned; in-flight
    /// neighbor fetches complete and are discarded.
    pub async fn traverse_with_cancellation(
        &self,
        query: &[f32],
        cancel: CancellationToken,
    ) -> Result<Vec<Node>> {
        // Seeding failures are fatal: without seeds there is nothing to walk
        let seeds = self
            .adapter
            .similarity_search(query, self.config.k)
            .await?;

        let mut visited = Visited::default();
        let mut results: Vec<Node> = Vec::new();

        let mut frontier: Vec<Discovered> = seeds
            .into_iter()
            .filter(|scored| visited.insert(scored.id()))
            .map(|scored| Discovered {
                score: scored.score,
                node: scored.node,
                depth: 0,
            })
            .collect();
        sort_by_score_then_id(&mut frontier);
        frontier.truncate(self.config.max_results);

        for discovered in &frontier {
            results.push(discovered.node.clone());
        }

        let mut depth = 0;
        while !frontier.is_empty()
            && depth < self.config.depth_bound
            && results.len() < self.config.max_results
        {
            if cancel.is_cancelled() {
                debug!(depth, selected = results.len(), "traversal cancelled");
                return Ok(results);
            }

            let next = self.expand_frontier(&frontier, query, &mut visited).await?;
            depth += 1;
            debug!(depth, discovered = next.len(), "expanded frontier");

            let remaining = self.config.max_results - results.len();
            frontier = next;
            frontier.truncate(remaining);
            for discovered in &frontier {
                results.push(discovered.node.clone());
            }
        }

        Ok(results)
    }

    /// Fetch neighbors for every frontier node, concurrently up to the
    /// fan-out limit, and collect the unseen ones in deterministic order.
    async fn expand_frontier(
        &self,
        frontier: &[Discovered],
        query: &[f32],
        visited: &mut Visited,
    ) -> Result<Vec<Discovered>> {
        let depth = frontier.first().map(|d| d.depth).unwrap_or(0);

        let fetches: Vec<Result<Option<Vec<Node>>>> = stream::iter(frontier.iter().map(|parent| {
            let adapter = Arc::clone(&self.adapter);
            let edge_fields = self.config.edge_fields.clone();
            let node = parent.node.clone();
            async move { neighbors_or_skip(adapter.as_ref(), &node, &edge_fields).await }
        }))
        .buffer_unordered(self.config.fan_out)
        .collect()
        .await;

        // Deduplicate across parents before ordering; completion order of
        // the fetches must not leak into the result
        let mut unseen: HashMap<String, Node> = HashMap::new();
        for fetched in fetches {
            let Some(neighbors) = fetched? else {
                continue;
            };
            for neighbor in neighbors {
                if !visited.contains(&neighbor.id) {
                    unseen.entry(neighbor.id.clone()).or_insert(neighbor);
                }
            }
        }

        let mut next: Vec<Discovered> = unseen
            .into_values()
            .map(|node| Discovered {
                score: cosine_similarity(query, &node.embedding),
                node,
                depth: depth + 1,
            })
            .collect();
        sort_by_score_then_id(&mut next);

        for discovered in &next {
            visited.insert(&discovered.node.id);
        }
        Ok(next)
    }
}
