//! OpenSearch backend for trellis
//!
//! Speaks the OpenSearch REST API directly: approximate k-NN search for
//! [`trellis_core::TraversalAdapter::similarity_search`] and a bool/terms
//! filter query over the configured edge fields for `neighbors`. Documents
//! are expected to carry `content`, `metadata`, and a k-NN `embedding`
//! field; the document `_id` is the node id.

mod adapter;

pub use adapter::{OpenSearchAdapter, OpenSearchConfig};
