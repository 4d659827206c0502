//! Plain-data result types returned by the engine.

use serde::{Deserialize, Serialize};

use crate::core::catalog::{self, SetRecord};
use crate::core::stats::AttributeSummary;

/// Sets sharing a cluster with the target of a similarity query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarSets {
    /// Identifier of the query target (the sentinel id for synthetic targets)
    pub target_id: String,
    /// Co-clustered sets, in candidate-pool order
    pub sets: Vec<SetRecord>,
}

/// Subset-vs-catalog statistics for one attribute.
///
/// The engine runs the statistics engine twice by convention, once over the
/// caller-selected subset and once over the entire catalog, so callers can
/// compare the two distributions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeReport {
    /// Attribute name as requested by the caller
    pub attribute: String,
    /// Statistics over the caller-selected subset
    pub subset: AttributeSummary,
    /// Statistics over the entire catalog
    pub catalog: AttributeSummary,
}

/// Aggregate view of an arbitrary pool (e.g. a favourites list).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolSummary {
    /// Number of sets in the pool
    pub set_count: usize,
    /// Average price; 0 for an empty pool
    pub average_price: f64,
    /// Average piece count; 0 for an empty pool
    pub average_pieces: f64,
    /// Most frequent theme, if the pool is non-empty
    pub most_common_theme: Option<String>,
}

impl PoolSummary {
    /// Summarize a pool
    pub fn from_pool(pool: &[SetRecord]) -> Self {
        Self {
            set_count: pool.len(),
            average_price: catalog::average_price(pool),
            average_pieces: catalog::average_pieces(pool),
            most_common_theme: catalog::most_common_theme(pool),
        }
    }
}
