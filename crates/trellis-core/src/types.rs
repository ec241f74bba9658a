//! Document model shared by backends and engines

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Metadata attached to a node: payload for the caller, edge source for the
/// traversal engines.
pub type Metadata = HashMap<String, serde_json::Value>;

/// A retrievable document node.
///
/// Nodes are created by ingestion (outside this workspace) and are read-only
/// during traversal. Every node returned by an adapter carries its embedding
/// and metadata; the engines rely on both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier within a store
    pub id: String,
    /// Text content
    pub content: String,
    /// Metadata mapping, also the source of edge definitions
    #[serde(default)]
    pub metadata: Metadata,
    /// Embedding vector, fixed dimension per store
    pub embedding: Vec<f32>,
}

impl Node {
    /// Create a node with empty metadata
    pub fn new(id: impl Into<String>, content: impl Into<String>, embedding: Vec<f32>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            metadata: Metadata::new(),
            embedding,
        }
    }

    /// Attach metadata, consuming self
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }
}

/// A node paired with its similarity score to the query that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredNode {
    pub node: Node,
    pub score: f64,
}

impl ScoredNode {
    pub fn new(node: Node, score: f64) -> Self {
        Self { node, score }
    }

    /// Identifier of the underlying node
    pub fn id(&self) -> &str {
        &self.node.id
    }
}
