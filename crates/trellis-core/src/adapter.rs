//! Uniform backend contract for traversal engines
//!
//! Both engines consume the same two operations; a backend only has to
//! translate them onto its native query API. The engines never construct
//! adapters themselves: the caller picks a backend, builds it, and injects
//! it at engine construction.

use crate::edges::EdgeFields;
use crate::error::{Result, RetrievalError};
use crate::types::{Node, ScoredNode};
use async_trait::async_trait;

/// Uniform retrieval interface implemented by every storage backend.
///
/// # Guarantees
///
/// - Nodes returned by either operation always carry their embedding and
///   metadata.
/// - `neighbors` never returns the input node itself.
/// - Implementations are safe for concurrent use by multiple simultaneous
///   traversal calls.
///
/// # Errors
///
/// - [`RetrievalError::BackendUnavailable`] on connection or transport
///   failure.
/// - [`RetrievalError::InvalidQuery`] on malformed input (wrong vector
///   dimension, `k == 0`).
#[async_trait]
pub trait TraversalAdapter: Send + Sync {
    /// Top-`k` nodes by similarity to the query vector, descending score,
    /// ties broken by ascending id. `k` must be greater than zero.
    async fn similarity_search(&self, query: &[f32], k: usize) -> Result<Vec<ScoredNode>>;

    /// Nodes adjacent to `node` under the given edge fields, excluding
    /// `node` itself. Order is unspecified; the engines re-order.
    async fn neighbors(&self, node: &Node, edge_fields: &EdgeFields) -> Result<Vec<Node>>;
}

/// Reject a zero `k` before it reaches the backend
pub fn validate_k(k: usize) -> Result<()> {
    if k == 0 {
        return Err(RetrievalError::InvalidQuery("k must be greater than zero".to_string()));
    }
    Ok(())
}

/// Reject a query vector whose dimension does not match the store's
pub fn validate_dimension(query: &[f32], expected: usize) -> Result<()> {
    if query.len() != expected {
        return Err(RetrievalError::InvalidQuery(format!(
            "query vector has dimension {}, store expects {}",
            query.len(),
            expected
        )));
    }
    Ok(())
}
