//! In-memory node store

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use trellis_core::adapter::{validate_dimension, validate_k};
use trellis_core::edges::nodes_adjacent;
use trellis_core::{
    cosine_similarity, EdgeFields, Node, Result, RetrievalError, ScoredNode, TraversalAdapter,
};

/// In-memory store over a node map.
///
/// Inserts are upserts keyed by node id. Reads take a shared lock, so the
/// store is safe for concurrent use by multiple traversal calls.
pub struct MemoryStore {
    dimension: usize,
    nodes: Arc<RwLock<HashMap<String, Node>>>,
}

impl MemoryStore {
    /// Create an empty store for vectors of the given dimension
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            nodes: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Expected embedding dimension
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Insert or replace a node, validating its embedding dimension
    pub async fn insert(&self, node: Node) -> Result<()> {
        if node.embedding.len() != self.dimension {
            return Err(RetrievalError::InvalidQuery(format!(
                "node '{}' has embedding dimension {}, store expects {}",
                node.id,
                node.embedding.len(),
                self.dimension
            )));
        }
        self.nodes.write().await.insert(node.id.clone(), node);
        Ok(())
    }

    /// Insert a batch of nodes
    pub async fn insert_many(&self, nodes: impl IntoIterator<Item = Node>) -> Result<()> {
        for node in nodes {
            self.insert(node).await?;
        }
        Ok(())
    }

    /// Number of stored nodes
    pub async fn len(&self) -> usize {
        self.nodes.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.nodes.read().await.is_empty()
    }

    /// Fetch a node by id
    pub async fn get(&self, id: &str) -> Option<Node> {
        self.nodes.read().await.get(id).cloned()
    }
}

#[async_trait]
impl TraversalAdapter for MemoryStore {
    async fn similarity_search(&self, query: &[f32], k: usize) -> Result<Vec<ScoredNode>> {
        validate_k(k)?;
        validate_dimension(query, self.dimension)?;

        let nodes = self.nodes.read().await;
        let mut scored: Vec<ScoredNode> = nodes
            .values()
            .map(|node| ScoredNode::new(node.clone(), cosine_similarity(query, &node.embedding)))
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.id().cmp(b.id()))
        });
        scored.truncate(k);
        Ok(scored)
    }

    async fn neighbors(&self, node: &Node, edge_fields: &EdgeFields) -> Result<Vec<Node>> {
        let nodes = self.nodes.read().await;
        let mut adjacent: Vec<Node> = nodes
            .values()
            .filter(|candidate| candidate.id != node.id && nodes_adjacent(node, candidate, edge_fields))
            .cloned()
            .collect();

        // Stable output keeps traversal runs reproducible
        adjacent.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(adjacent)
    }
}
