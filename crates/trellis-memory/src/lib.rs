//! In-memory backend for trellis
//!
//! Brute-force scans over a node map. This is the reference implementation
//! of [`trellis_core::TraversalAdapter`]: integration tests run against it,
//! and new backends should match its observable behavior (deterministic
//! ordering, self-exclusion in `neighbors`, dimension validation).

mod store;

pub use store::MemoryStore;
