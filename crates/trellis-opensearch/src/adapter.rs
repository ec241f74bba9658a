//! OpenSearch REST adapter

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use trellis_core::adapter::{validate_dimension, validate_k};
use trellis_core::{
    EdgeFields, Metadata, Node, Result, RetrievalError, ScoredNode, TraversalAdapter,
};

/// Connection settings for an OpenSearch index
#[derive(Debug, Clone)]
pub struct OpenSearchConfig {
    /// Base URL, e.g. `http://localhost:9200`
    pub base_url: String,
    /// Index holding the documents
    pub index: String,
    /// Embedding dimension the index was created with
    pub dimension: usize,
    /// Per-request timeout
    pub timeout: Duration,
    /// Cap on neighbors returned per `neighbors` call
    pub neighbor_limit: usize,
}

impl OpenSearchConfig {
    pub fn new(base_url: impl Into<String>, index: impl Into<String>, dimension: usize) -> Self {
        Self {
            base_url: base_url.into(),
            index: index.into(),
            dimension,
            timeout: Duration::from_secs(30),
            neighbor_limit: 100,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_neighbor_limit(mut self, neighbor_limit: usize) -> Self {
        self.neighbor_limit = neighbor_limit;
        self
    }
}

/// Adapter over one OpenSearch index.
///
/// Holds a connection-pooled client; cloning is cheap and instances are
/// safe for concurrent use.
#[derive(Debug, Clone)]
pub struct OpenSearchAdapter {
    client: reqwest::Client,
    config: OpenSearchConfig,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: HitsEnvelope,
}

#[derive(Debug, Deserialize)]
struct HitsEnvelope {
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct Hit {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_score", default)]
    score: Option<f64>,
    #[serde(rename = "_source")]
    source: HitSource,
}

#[derive(Debug, Deserialize)]
struct HitSource {
    #[serde(default)]
    content: String,
    #[serde(default)]
    metadata: Metadata,
    embedding: Vec<f32>,
}

impl Hit {
    fn into_node(self) -> Node {
        Node::new(self.id, self.source.content, self.source.embedding)
            .with_metadata(self.source.metadata)
    }
}

impl OpenSearchAdapter {
    pub fn new(config: OpenSearchConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn search_url(&self) -> String {
        format!(
            "{}/{}/_search",
            self.config.base_url.trim_end_matches('/'),
            self.config.index
        )
    }

    async fn search(&self, body: serde_json::Value) -> Result<SearchResponse> {
        let url = self.search_url();
        let response = self
            .client
            .post(&url)
            .json(&body)
            .timeout(self.config.timeout)
            .send()
            .await
            .map_err(|err| RetrievalError::backend_with_source("request to OpenSearch failed", err))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(RetrievalError::backend(format!(
                "OpenSearch returned {status}: {detail}"
            )));
        }

        response
            .json::<SearchResponse>()
            .await
            .map_err(|err| RetrievalError::backend_with_source("malformed OpenSearch response", err))
    }

    /// Values of one metadata field as a flat list for a terms clause
    fn term_values(value: &serde_json::Value) -> Vec<serde_json::Value> {
        match value {
            serde_json::Value::Array(items) => {
                items.iter().filter(|v| !v.is_null()).cloned().collect()
            }
            serde_json::Value::Null => Vec::new(),
            scalar => vec![scalar.clone()],
        }
    }
}

#[async_trait]
impl TraversalAdapter for OpenSearchAdapter {
    async fn similarity_search(&self, query: &[f32], k: usize) -> Result<Vec<ScoredNode>> {
        validate_k(k)?;
        validate_dimension(query, self.config.dimension)?;

        let body = serde_json::json!({
            "size": k,
            "query": {
                "knn": {
                    "embedding": {
                        "vector": query,
                        "k": k,
                    }
                }
            },
            "_source": ["content", "metadata", "embedding"],
        });

        let response = self.search(body).await?;
        debug!(hits = response.hits.hits.len(), index = %self.config.index, "knn search");

        let mut scored: Vec<ScoredNode> = response
            .hits
            .hits
            .into_iter()
            .map(|hit| {
                let score = hit.score.unwrap_or(0.0);
                ScoredNode::new(hit.into_node(), score)
            })
            .collect();

        // OpenSearch orders by score already; re-sorting pins down the
        // tie order across shards
        scored.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.id().cmp(b.id()))
        });
        scored.truncate(k);
        Ok(scored)
    }

    async fn neighbors(&self, node: &Node, edge_fields: &EdgeFields) -> Result<Vec<Node>> {
        let mut should: Vec<serde_json::Value> = Vec::new();
        for field in edge_fields.iter() {
            let Some(value) = node.metadata.get(field) else {
                continue;
            };
            let values = Self::term_values(value);
            if values.is_empty() {
                continue;
            }
            let mut terms = serde_json::Map::new();
            terms.insert(format!("metadata.{field}"), serde_json::Value::Array(values));
            should.push(serde_json::json!({ "terms": terms }));
        }

        // A node with none of the edge fields set has no edges
        if should.is_empty() {
            return Ok(Vec::new());
        }

        let body = serde_json::json!({
            "size": self.config.neighbor_limit,
            "query": {
                "bool": {
                    "should": should,
                    "minimum_should_match": 1,
                    "must_not": [
                        { "ids": { "values": [node.id] } }
                    ],
                }
            },
            "_source": ["content", "metadata", "embedding"],
        });

        let response = self.search(body).await?;
        debug!(
            node_id = %node.id,
            neighbors = response.hits.hits.len(),
            "neighbor query"
        );

        let mut nodes: Vec<Node> = response
            .hits
            .hits
            .into_iter()
            .map(Hit::into_node)
            // `neighbors` must never include the source node
            .filter(|neighbor| neighbor.id != node.id)
            .collect();
        nodes.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(nodes)
    }
}
