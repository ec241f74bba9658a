//! Maximal-marginal-relevance traversal
//!
//! Same seeding and expansion primitive as the graph engine, but selection
//! is one candidate per step: the candidate maximizing
//! `lambda * relevance(c, query) - (1 - lambda) * max_sim(c, selected)`.
//! Only the selected node's neighbors join the candidate pool, so the walk
//! follows diversity rather than breadth. The redundancy term of every
//! pooled candidate is updated incrementally after each selection instead
//! of being recomputed against the whole selected set.

use crate::expand::neighbors_or_skip;
use crate::frontier::Visited;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use trellis_core::{cosine_similarity, MmrConfig, Node, Result, TraversalAdapter};

/// One pool entry: relevance is fixed at discovery, redundancy grows as
/// similar nodes are selected.
#[derive(Debug, Clone)]
struct Candidate {
    node: Node,
    depth: usize,
    relevance: f64,
    redundancy: f64,
}

impl Candidate {
    fn blended(&self, lambda: f64) -> f64 {
        lambda * self.relevance - (1.0 - lambda) * self.redundancy
    }
}

/// MMR traversal engine over an injected backend adapter.
pub struct MmrTraversal<A: TraversalAdapter + ?Sized> {
    adapter: Arc<A>,
    config: MmrConfig,
}

impl<A: TraversalAdapter + ?Sized> std::fmt::Debug for MmrTraversal<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MmrTraversal")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<A: TraversalAdapter + ?Sized> MmrTraversal<A> {
    /// Create an engine, validating the configuration up front
    pub fn new(adapter: Arc<A>, config: MmrConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { adapter, config })
    }

    pub fn config(&self) -> &MmrConfig {
        &self.config
    }

    /// Run a traversal to completion
    pub async fn traverse(&self, query: &[f32]) -> Result<Vec<Node>> {
        self.traverse_with_cancellation(query, CancellationToken::new())
            .await
    }

    /// Run a traversal, observing `cancel` before each selection step.
    ///
    /// On cancellation the nodes selected so far are returned.
    pub async fn traverse_with_cancellation(
        &self,
        query: &[f32],
        cancel: CancellationToken,
    ) -> Result<Vec<Node>> {
        let traversal = &self.config.traversal;
        let lambda = self.config.lambda;

        // Seeding failures are fatal, as in the graph engine
        let seeds = self.adapter.similarity_search(query, traversal.k).await?;

        let mut visited = Visited::default();
        let mut pool: Vec<Candidate> = Vec::new();
        for scored in seeds {
            if visited.insert(scored.id()) {
                pool.push(Candidate {
                    relevance: scored.score,
                    redundancy: 0.0,
                    node: scored.node,
                    depth: 0,
                });
            }
        }

        let mut selected: Vec<Node> = Vec::new();
        while selected.len() < traversal.max_results && !pool.is_empty() {
            if cancel.is_cancelled() {
                debug!(selected = selected.len(), "mmr traversal cancelled");
                return Ok(selected);
            }

            let best = take_best(&mut pool, lambda);
            debug!(
                node_id = %best.node.id,
                depth = best.depth,
                relevance = best.relevance,
                redundancy = best.redundancy,
                "selected candidate"
            );

            // Remaining candidates become more redundant the more the
            // selection resembles them
            for candidate in &mut pool {
                let similarity =
                    cosine_similarity(&candidate.node.embedding, &best.node.embedding);
                if similarity > candidate.redundancy {
                    candidate.redundancy = similarity;
                }
            }

            if best.depth < traversal.depth_bound {
                let fetched = neighbors_or_skip(
                    self.adapter.as_ref(),
                    &best.node,
                    &traversal.edge_fields,
                )
                .await?;
                if let Some(neighbors) = fetched {
                    for neighbor in neighbors {
                        if !visited.insert(&neighbor.id) {
                            continue;
                        }
                        pool.push(Candidate {
                            relevance: cosine_similarity(query, &neighbor.embedding),
                            redundancy: max_similarity(&neighbor, &selected, &best.node),
                            node: neighbor,
                            depth: best.depth + 1,
                        });
                    }
                }
            }

            selected.push(best.node);
        }

        Ok(selected)
    }
}

/// Remove and return the pool entry with the highest blended score, ties
/// broken by ascending id.
fn take_best(pool: &mut Vec<Candidate>, lambda: f64) -> Candidate {
    let mut best_index = 0;
    for index in 1..pool.len() {
        let challenger = pool[index].blended(lambda);
        let incumbent = pool[best_index].blended(lambda);
        match challenger.total_cmp(&incumbent) {
            std::cmp::Ordering::Greater => best_index = index,
            std::cmp::Ordering::Equal if pool[index].node.id < pool[best_index].node.id => {
                best_index = index;
            }
            _ => {}
        }
    }
    pool.swap_remove(best_index)
}

/// Highest cosine similarity between a newly discovered node and the
/// already-selected set (including the node being selected this step).
fn max_similarity(node: &Node, selected: &[Node], current: &Node) -> f64 {
    selected
        .iter()
        .chain(std::iter::once(current))
        .map(|chosen| cosine_similarity(&node.embedding, &chosen.embedding))
        .fold(0.0, f64::max)
}
