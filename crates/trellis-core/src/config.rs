//! Traversal configuration
//!
//! Parameters travel in a config struct rather than a long argument list.
//! Construction requires the edge fields (there is no sensible default);
//! everything else has defaults and builder-style setters. Engines call
//! `validate()` once at construction and trust the config afterwards.

use crate::edges::EdgeFields;
use crate::error::{Result, RetrievalError};
use serde::{Deserialize, Serialize};

/// Default number of similarity seeds
pub const DEFAULT_K: usize = 4;
/// Default depth bound for graph expansion
pub const DEFAULT_DEPTH_BOUND: usize = 2;
/// Default cap on the result set size
pub const DEFAULT_MAX_RESULTS: usize = 20;
/// Default concurrent neighbor-fetch limit per expansion step
pub const DEFAULT_FAN_OUT: usize = 8;
/// Default relevance/diversity trade-off for MMR
pub const DEFAULT_LAMBDA: f64 = 0.5;

/// Parameters shared by both traversal engines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraversalConfig {
    /// Number of seed nodes fetched via similarity search
    pub k: usize,
    /// Maximum graph distance from any seed
    pub depth_bound: usize,
    /// Cap on the result set size
    pub max_results: usize,
    /// Concurrent neighbor fetches per expansion step
    pub fan_out: usize,
    /// Metadata keys that define adjacency
    pub edge_fields: EdgeFields,
}

impl TraversalConfig {
    pub fn new(edge_fields: EdgeFields) -> Self {
        Self {
            k: DEFAULT_K,
            depth_bound: DEFAULT_DEPTH_BOUND,
            max_results: DEFAULT_MAX_RESULTS,
            fan_out: DEFAULT_FAN_OUT,
            edge_fields,
        }
    }

    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    pub fn with_depth_bound(mut self, depth_bound: usize) -> Self {
        self.depth_bound = depth_bound;
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_fan_out(mut self, fan_out: usize) -> Self {
        self.fan_out = fan_out;
        self
    }

    /// Check value ranges; engines call this once at construction
    pub fn validate(&self) -> Result<()> {
        if self.k == 0 {
            return Err(RetrievalError::InvalidConfig(
                "k must be greater than zero".to_string(),
            ));
        }
        if self.max_results == 0 {
            return Err(RetrievalError::InvalidConfig(
                "max_results must be greater than zero".to_string(),
            ));
        }
        if self.fan_out == 0 {
            return Err(RetrievalError::InvalidConfig(
                "fan_out must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// MMR traversal parameters: the shared config plus the trade-off weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MmrConfig {
    #[serde(flatten)]
    pub traversal: TraversalConfig,
    /// Relevance/diversity trade-off in `[0, 1]`: 1 is pure relevance,
    /// 0 is pure diversity
    pub lambda: f64,
}

impl MmrConfig {
    pub fn new(edge_fields: EdgeFields) -> Self {
        Self {
            traversal: TraversalConfig::new(edge_fields),
            lambda: DEFAULT_LAMBDA,
        }
    }

    pub fn with_lambda(mut self, lambda: f64) -> Self {
        self.lambda = lambda;
        self
    }

    pub fn with_k(mut self, k: usize) -> Self {
        self.traversal.k = k;
        self
    }

    pub fn with_depth_bound(mut self, depth_bound: usize) -> Self {
        self.traversal.depth_bound = depth_bound;
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.traversal.max_results = max_results;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.traversal.validate()?;
        if !(0.0..=1.0).contains(&self.lambda) {
            return Err(RetrievalError::InvalidConfig(format!(
                "lambda must be within [0, 1], got {}",
                self.lambda
            )));
        }
        Ok(())
    }
}
