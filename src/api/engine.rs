//! Main engine implementation.

use rand::seq::SliceRandom;
use tracing::info;

use crate::api::results::{AttributeReport, PoolSummary, SimilarSets};
use crate::core::catalog::{Catalog, SetRecord};
use crate::core::config::BricklensConfig;
use crate::core::errors::{BricklensError, Result};
use crate::core::featureset::FeatureSpace;
use crate::core::similarity::{self, SetPreferences, SYNTHETIC_PREFERENCE_ID};
use crate::core::stats::{self, AttributeSummary, NumericAttribute};

/// Recommendation and analysis engine over a static catalog.
///
/// Each call is a one-shot, blocking computation over an in-memory pool;
/// there is no shared mutable state across calls, and the catalog is
/// read-only throughout.
#[derive(Debug)]
pub struct BricklensEngine {
    catalog: Catalog,
    config: BricklensConfig,
}

impl BricklensEngine {
    /// Create a new engine. The configuration is validated up front so that
    /// later calls can rely on it.
    pub fn new(catalog: Catalog, config: BricklensConfig) -> Result<Self> {
        config.validate()?;
        if catalog.get(SYNTHETIC_PREFERENCE_ID).is_some() {
            return Err(BricklensError::validation_field(
                format!("catalog must not contain the reserved id '{SYNTHETIC_PREFERENCE_ID}'"),
                "id",
            ));
        }
        info!(sets = catalog.len(), "bricklens engine initialized");
        Ok(Self { catalog, config })
    }

    /// The underlying catalog
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The engine configuration
    pub fn config(&self) -> &BricklensConfig {
        &self.config
    }

    /// Find sets similar to a catalog set.
    ///
    /// The candidate pool is the target's theme subset; it is clustered in
    /// the detailed feature space and the target's co-clustered sets are
    /// returned.
    pub fn find_similar_to(&self, set_id: &str) -> Result<SimilarSets> {
        let target = self.catalog.get(set_id).ok_or_else(|| {
            BricklensError::validation_field(format!("unknown set id '{set_id}'"), "id")
        })?;

        let pool = self.catalog.by_theme(&target.theme);
        let sets = similarity::find_similar(
            target,
            &pool,
            FeatureSpace::Detailed,
            &self.config.clustering,
        )?;

        info!(target = set_id, found = sets.len(), "similarity query resolved");
        Ok(SimilarSets {
            target_id: set_id.to_string(),
            sets,
        })
    }

    /// Recommend sets matching stated preferences.
    ///
    /// A synthetic target is built from the preferences, resolved against
    /// the theme-filtered pool in the reduced feature space, and discarded;
    /// the catalog is never mutated.
    pub fn recommend_tailored(&self, preferences: &SetPreferences) -> Result<SimilarSets> {
        let sets = similarity::recommend_from_preferences(
            &self.catalog,
            preferences,
            &self.config.clustering,
            &self.config.preferences,
        )?;

        info!(
            theme = %preferences.theme,
            found = sets.len(),
            "tailored recommendation resolved"
        );
        Ok(SimilarSets {
            target_id: SYNTHETIC_PREFERENCE_ID.to_string(),
            sets,
        })
    }

    /// Analyze a numeric attribute over a subset and over the whole catalog.
    ///
    /// Unknown attribute names report no data for both pools rather than
    /// failing.
    pub fn analyze_attribute(
        &self,
        subset: &[SetRecord],
        attribute_name: &str,
    ) -> Result<AttributeReport> {
        let Some(attribute) = NumericAttribute::from_name(attribute_name) else {
            return Ok(AttributeReport {
                attribute: attribute_name.to_string(),
                subset: AttributeSummary::NoData,
                catalog: AttributeSummary::NoData,
            });
        };

        let subset_summary = stats::analyze(
            subset,
            attribute,
            &self.config.statistics,
            &self.config.derived,
        )?;
        let catalog_pool = self.catalog.all_items();
        let catalog_summary = stats::analyze(
            &catalog_pool,
            attribute,
            &self.config.statistics,
            &self.config.derived,
        )?;

        Ok(AttributeReport {
            attribute: attribute.name().to_string(),
            subset: subset_summary,
            catalog: catalog_summary,
        })
    }

    /// Pick a random set from the catalog.
    pub fn random_recommendation(&self) -> Result<SetRecord> {
        let pool = self.catalog.all_items();
        pool.choose(&mut rand::thread_rng())
            .cloned()
            .ok_or_else(|| BricklensError::validation("catalog is empty"))
    }

    /// Summarize an arbitrary pool (e.g. a favourites list).
    pub fn pool_summary(&self, pool: &[SetRecord]) -> PoolSummary {
        PoolSummary::from_pool(pool)
    }
}
