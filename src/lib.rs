//! # Bricklens: Catalog Similarity & Statistics Engine
//!
//! A recommendation and analysis library for collectible construction-toy set
//! catalogs. The catalog is static and processed in a single pass per call;
//! the library provides:
//!
//! - **Similarity search**: seeded k-means over standardized feature vectors,
//!   returning the sets that share a cluster with a target set
//! - **Preference-based recommendation**: a synthetic target built from stated
//!   preferences (theme, ideal price, ideal minifig count) resolved against a
//!   theme-filtered candidate pool
//! - **Descriptive statistics**: mean, median, population standard deviation,
//!   and a Student's-t confidence interval for any numeric attribute, over a
//!   subset and over the whole catalog
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                      API Layer                          │
//! ├─────────────────────────────────────────────────────────┤
//! │   Core Engine          │   I/O                          │
//! │ • Catalog & records    │ • CSV ingestion (validating)   │
//! │ • Feature vectorizer   │ • Subset export                │
//! │ • Seeded k-means       │                                │
//! │ • Similarity resolver  │                                │
//! │ • Statistics           │                                │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bricklens::api::BricklensEngine;
//! use bricklens::core::config::BricklensConfig;
//! use bricklens::io::csv::load_catalog;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = BricklensConfig::default();
//!     let catalog = load_catalog("sets.csv", &config.catalog)?;
//!     let engine = BricklensEngine::new(catalog, config)?;
//!
//!     let similar = engine.find_similar_to("10276-1")?;
//!     println!("{} similar sets found", similar.sets.len());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

// Core analysis engine modules
pub mod core {
    //! Core algorithms and data structures.

    pub mod catalog;
    pub mod clustering;
    pub mod config;
    pub mod errors;
    pub mod featureset;
    pub mod similarity;
    pub mod stats;
}

// Public API facade
pub mod api;

// I/O and persistence
pub mod io {
    //! Catalog ingestion and export.

    pub mod csv;
}

// Re-export commonly used types at the crate root
pub use crate::api::{AttributeReport, BricklensEngine, PoolSummary, SimilarSets};
pub use crate::core::catalog::{Catalog, SetRecord, ThemeGroup};
pub use crate::core::config::BricklensConfig;
pub use crate::core::errors::{BricklensError, Result};
pub use crate::core::similarity::SetPreferences;
pub use crate::core::stats::{AttributeSummary, DistributionSummary, NumericAttribute};
