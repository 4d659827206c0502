//! Similarity resolution and preference synthesis.
//!
//! `find_similar` clusters a candidate pool together with a target set and
//! returns the co-clustered sets. The target may be a real catalog set
//! (detailed feature space) or a synthetic one built from stated user
//! preferences (reduced space, since a synthetic set's theme and year are
//! not comparable signals beyond the theme filter already applied).
//!
//! Synthetic targets never reach the catalog: resolution happens over an
//! owned candidate pool that is dropped on every exit path, so the store is
//! left untouched even when clustering fails.

use tracing::debug;

use crate::core::catalog::{Catalog, SetRecord};
use crate::core::clustering::cluster;
use crate::core::config::{ClusteringConfig, PreferenceConfig};
use crate::core::errors::{BricklensError, Result};
use crate::core::featureset::FeatureSpace;

/// Reserved identifier for synthetic preference targets. No catalog record
/// may use it.
pub const SYNTHETIC_PREFERENCE_ID: &str = "synthetic-preference";

/// User-stated preferences for a tailored recommendation.
#[derive(Debug, Clone, PartialEq)]
pub struct SetPreferences {
    /// Chosen theme group
    pub theme_group: String,
    /// Chosen theme within the group
    pub theme: String,
    /// Ideal price in USD
    pub ideal_price: f64,
    /// Ideal minifigure count
    pub ideal_minifigs: u32,
}

/// Sets sharing the target's cluster, excluding the target itself.
///
/// The target is appended to the pool if absent, the combined pool is
/// clustered, and the pool is filtered by equality with the target's label.
/// An empty result is not an error: it simply means no other set landed in
/// the target's cluster.
pub fn find_similar(
    target: &SetRecord,
    pool: &[SetRecord],
    space: FeatureSpace,
    config: &ClusteringConfig,
) -> Result<Vec<SetRecord>> {
    let mut candidates: Vec<SetRecord> = pool.to_vec();
    if !candidates.iter().any(|r| r.id == target.id) {
        candidates.push(target.clone());
    }

    let assignment = cluster(&candidates, space, config)?;
    let target_label = assignment.label_of(&target.id).ok_or_else(|| {
        BricklensError::internal(format!(
            "target '{}' missing from its own cluster assignment",
            target.id
        ))
    })?;

    let similar: Vec<SetRecord> = candidates
        .into_iter()
        .filter(|r| r.id != target.id && assignment.label_of(&r.id) == Some(target_label))
        .collect();

    debug!(
        target = %target.id,
        label = target_label,
        found = similar.len(),
        "resolved co-clustered sets"
    );
    Ok(similar)
}

/// Derive a piece count from an ideal price via the fitted linear relation,
/// rounded and clamped to a non-negative integer.
pub fn derive_pieces(price: f64, config: &PreferenceConfig) -> u32 {
    let pieces = config.pieces_intercept + config.pieces_slope * price;
    pieces.round().max(0.0) as u32
}

/// Build a synthetic set record from stated preferences.
///
/// The record carries the reserved sentinel id and a placeholder year; both
/// are excluded from the reduced feature space it is clustered in.
pub fn synthesize(preferences: &SetPreferences, config: &PreferenceConfig) -> SetRecord {
    SetRecord::new(SYNTHETIC_PREFERENCE_ID, "Preference target")
        .with_theme(preferences.theme.clone(), preferences.theme_group.clone())
        .with_price(preferences.ideal_price)
        .with_pieces(derive_pieces(preferences.ideal_price, config))
        .with_minifigs(preferences.ideal_minifigs)
}

/// Recommend catalog sets matching stated preferences.
///
/// Builds the synthetic target, injects it into an owned theme-filtered
/// pool, resolves similarity in the reduced feature space, and discards the
/// pool. The catalog is never mutated.
pub fn recommend_from_preferences(
    catalog: &Catalog,
    preferences: &SetPreferences,
    clustering: &ClusteringConfig,
    prefs_config: &PreferenceConfig,
) -> Result<Vec<SetRecord>> {
    let pool = catalog.by_theme(&preferences.theme);
    if pool.is_empty() {
        return Err(BricklensError::validation_field(
            format!("no catalog sets with theme '{}'", preferences.theme),
            "theme",
        ));
    }

    let target = synthesize(preferences, prefs_config);
    debug!(
        theme = %preferences.theme,
        price = preferences.ideal_price,
        pieces = target.pieces,
        pool_size = pool.len(),
        "resolving tailored recommendation"
    );
    find_similar(&target, &pool, FeatureSpace::Reduced, clustering)
}
