//! Public API facade.
//!
//! Results produced here are plain data: formatting, printing, and image or
//! link rendering belong to the presentation layer.

mod engine;
mod results;

pub use engine::BricklensEngine;
pub use results::{AttributeReport, PoolSummary, SimilarSets};
