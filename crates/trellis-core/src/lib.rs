//! Core types and contracts for trellis graph-guided retrieval
//!
//! Trellis layers graph traversal on top of vector similarity search.
//! Documents carry embeddings and metadata; metadata keys designated as
//! *edge fields* define adjacency between documents. This crate holds the
//! pieces shared by every backend and engine:
//!
//! - [`Node`] / [`ScoredNode`] — the document model
//! - [`TraversalAdapter`] — the uniform backend contract
//! - [`EdgeFields`] — validated adjacency configuration
//! - [`TraversalConfig`] / [`MmrConfig`] — traversal parameters
//! - [`RetrievalError`] — the error taxonomy shared across the workspace
//!
//! Backends implement [`TraversalAdapter`]; the engines in
//! `trellis-traversal` run unmodified against any implementation.

pub mod adapter;
pub mod config;
pub mod edges;
pub mod error;
pub mod similarity;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_support;

pub use adapter::TraversalAdapter;
pub use config::{MmrConfig, TraversalConfig, DEFAULT_LAMBDA};
pub use edges::EdgeFields;
pub use error::{RetrievalError, Result};
pub use similarity::cosine_similarity;
pub use types::{Metadata, Node, ScoredNode};
