//! Neighbor fetching with the shared failure policy
//!
//! Transport failures during expansion are retried once; if the retry also
//! fails, the node is omitted from expansion and the omission is logged.
//! Malformed-query errors are never retried and abort the traversal.

use tracing::{debug, warn};
use trellis_core::{EdgeFields, Node, Result, TraversalAdapter};

/// Fetch neighbors for one node under the engine failure policy.
///
/// Returns `Ok(None)` when the node was skipped after a failed retry.
pub(crate) async fn neighbors_or_skip<A>(
    adapter: &A,
    node: &Node,
    edge_fields: &EdgeFields,
) -> Result<Option<Vec<Node>>>
where
    A: TraversalAdapter + ?Sized,
{
    match adapter.neighbors(node, edge_fields).await {
        Ok(nodes) => Ok(Some(nodes)),
        Err(err) if err.is_retryable() => {
            debug!(node_id = %node.id, error = %err, "neighbor fetch failed, retrying once");
            match adapter.neighbors(node, edge_fields).await {
                Ok(nodes) => Ok(Some(nodes)),
                Err(retry_err) if retry_err.is_retryable() => {
                    warn!(
                        node_id = %node.id,
                        error = %retry_err,
                        "neighbor fetch failed after retry, node omitted from expansion"
                    );
                    Ok(None)
                }
                Err(retry_err) => Err(retry_err),
            }
        }
        Err(err) => Err(err),
    }
}
