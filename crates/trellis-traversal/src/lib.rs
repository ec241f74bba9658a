//! Traversal engines for trellis
//!
//! Two engines share the same skeleton: seed via similarity search, expand
//! along metadata-defined edges, stop at a depth bound or result cap. They
//! differ in what "expand" admits into the result set:
//!
//! - [`GraphTraversal`] is breadth-complete: every unseen neighbor at each
//!   depth joins the result set, ordered by similarity to the query.
//! - [`MmrTraversal`] selects one candidate per step by maximal marginal
//!   relevance, trading relevance against diversity, and only the selected
//!   node's neighbors join the candidate pool.
//!
//! Both run against any [`trellis_core::TraversalAdapter`] injected at
//! construction. A single call is logically sequential, but neighbor
//! fetches within one expansion step run concurrently up to the configured
//! fan-out. Cancellation is observed at step boundaries; the call returns
//! the nodes selected so far.

mod expand;
mod frontier;
mod graph;
mod mmr;

pub use graph::GraphTraversal;
pub use mmr::MmrTraversal;
