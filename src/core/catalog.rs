//! Catalog store and set records.
//!
//! The catalog is a static, in-memory collection of [`SetRecord`]s, read-only
//! to the engines: clustering never mutates records, and cluster labels live
//! in a per-run side table rather than on the record itself.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::config::DerivedFieldsConfig;
use crate::core::errors::{BricklensError, Result};

/// Unique identifier of a set (e.g. `10276-1`).
pub type SetId = String;

/// Coarse classification of a set, mapped to a fixed numeric code for
/// clustering. The code is an unordered categorical surrogate; the integer
/// values carry no ordering semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeGroup {
    /// Pre-school sets
    PreSchool,
    /// Junior sets
    Junior,
    /// Art and crafts sets
    ArtAndCrafts,
    /// Action and adventure sets
    ActionAndAdventure,
    /// Construction sets
    Construction,
    /// Educational sets
    Educational,
    /// Basic sets
    Basic,
    /// Modern day sets
    ModernDay,
    /// Licensed sets
    Licensed,
    /// Historical sets
    Historical,
    /// Model making sets
    ModelMaking,
    /// Technical sets
    Technical,
    /// Anything not in the known list
    Other,
}

impl ThemeGroup {
    /// Map a theme-group name to its variant. Unknown names map to
    /// [`ThemeGroup::Other`]; the mapping is total.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Pre-School" => Self::PreSchool,
            "Junior" => Self::Junior,
            "Art and Crafts" => Self::ArtAndCrafts,
            "Action & Adventure" => Self::ActionAndAdventure,
            "Construction" => Self::Construction,
            "Educational" => Self::Educational,
            "Basic" => Self::Basic,
            "Modern Day" => Self::ModernDay,
            "Licensed" => Self::Licensed,
            "Historical" => Self::Historical,
            "Model Making" => Self::ModelMaking,
            "Technical" => Self::Technical,
            _ => Self::Other,
        }
    }

    /// Numeric surrogate used by the clustering feature space.
    pub fn code(self) -> u8 {
        match self {
            Self::PreSchool => 1,
            Self::Junior => 2,
            Self::ArtAndCrafts => 3,
            Self::ActionAndAdventure => 4,
            Self::Construction => 5,
            Self::Educational => 6,
            Self::Basic => 7,
            Self::ModernDay => 8,
            Self::Licensed => 9,
            Self::Historical => 10,
            Self::ModelMaking => 11,
            Self::Technical => 12,
            Self::Other => 13,
        }
    }
}

/// A single catalog record.
///
/// Records are plain data: every numeric attribute is non-negative, and the
/// release year is bounds-checked at ingestion, before records reach the
/// engines. Cluster labels are not stored here (they are only valid for one
/// clustering run; see [`crate::core::clustering::ClusterAssignment`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetRecord {
    /// Unique set identifier
    pub id: SetId,
    /// Release year
    pub year: i32,
    /// Theme (more specific than the theme group)
    pub theme: String,
    /// Coarse theme group
    pub theme_group: String,
    /// Subtheme (more specific than the theme)
    pub subtheme: String,
    /// Display name
    pub name: String,
    /// Unique part of the set's image URL
    pub image: String,
    /// Recommended retail price in USD
    pub price: f64,
    /// Piece count
    pub pieces: u32,
    /// Minifigure count
    pub minifigs: u32,
    /// Packaging type (e.g. Box, Polybag)
    pub packaging: String,
    /// Number of users who own the set
    pub own_count: u32,
    /// Number of users who want the set
    pub want_count: u32,
}

impl SetRecord {
    /// Create a new record with the given id and name; remaining fields start
    /// empty or zero and can be filled with the builder methods.
    pub fn new(id: impl Into<SetId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            year: 0,
            theme: String::new(),
            theme_group: String::new(),
            subtheme: String::new(),
            name: name.into(),
            image: String::new(),
            price: 0.0,
            pieces: 0,
            minifigs: 0,
            packaging: String::new(),
            own_count: 0,
            want_count: 0,
        }
    }

    /// Set the release year
    pub fn with_year(mut self, year: i32) -> Self {
        self.year = year;
        self
    }

    /// Set the theme and theme group
    pub fn with_theme(mut self, theme: impl Into<String>, theme_group: impl Into<String>) -> Self {
        self.theme = theme.into();
        self.theme_group = theme_group.into();
        self
    }

    /// Set the price
    pub fn with_price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    /// Set the piece count
    pub fn with_pieces(mut self, pieces: u32) -> Self {
        self.pieces = pieces;
        self
    }

    /// Set the minifigure count
    pub fn with_minifigs(mut self, minifigs: u32) -> Self {
        self.minifigs = minifigs;
        self
    }

    /// Theme-group variant for this record, recomputed from the string on
    /// every call since records may arrive without the derived value.
    pub fn theme_group_kind(&self) -> ThemeGroup {
        ThemeGroup::from_name(&self.theme_group)
    }

    /// Estimated build hours: `pieces / divisor`, forced to zero for sets
    /// below the configured minimum piece count. Always non-negative.
    pub fn build_hours(&self, derived: &DerivedFieldsConfig) -> f64 {
        if self.pieces < derived.min_pieces_for_build_hours {
            0.0
        } else {
            f64::from(self.pieces) / derived.build_hours_divisor
        }
    }

    /// Canonical brickset URL for this set.
    pub fn brickset_link(&self) -> String {
        let slug: String = self
            .name
            .chars()
            .filter_map(|c| match c {
                ' ' => Some('-'),
                ':' | '.' | '\'' => None,
                other => Some(other),
            })
            .collect();
        format!("https://brickset.com/sets/{}-1/{}", self.id, slug)
    }
}

/// In-memory catalog store.
///
/// Insertion order is preserved so that pools derived from the catalog are
/// stable across calls, which keeps clustering deterministic.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: IndexMap<SetId, SetRecord>,
}

impl Catalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from a list of records. Duplicate ids are rejected.
    pub fn from_records(records: impl IntoIterator<Item = SetRecord>) -> Result<Self> {
        let mut catalog = Self::new();
        for record in records {
            catalog.insert(record)?;
        }
        Ok(catalog)
    }

    /// Insert a record; duplicate ids are rejected.
    pub fn insert(&mut self, record: SetRecord) -> Result<()> {
        if self.records.contains_key(&record.id) {
            return Err(BricklensError::validation_field(
                format!("duplicate set id '{}'", record.id),
                "id",
            ));
        }
        self.records.insert(record.id.clone(), record);
        Ok(())
    }

    /// Number of sets in the catalog
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the catalog holds no sets
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a record by id
    pub fn get(&self, id: &str) -> Option<&SetRecord> {
        self.records.get(id)
    }

    /// Iterate over all records in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &SetRecord> {
        self.records.values()
    }

    /// Owned copy of every record, in insertion order. Pools handed to the
    /// engines are owned so the store itself is never touched.
    pub fn all_items(&self) -> Vec<SetRecord> {
        self.records.values().cloned().collect()
    }

    /// Owned subset of records matching a predicate
    pub fn filter<P>(&self, predicate: P) -> Vec<SetRecord>
    where
        P: Fn(&SetRecord) -> bool,
    {
        self.records
            .values()
            .filter(|r| predicate(r))
            .cloned()
            .collect()
    }

    /// Subset of sets with the given theme
    pub fn by_theme(&self, theme: &str) -> Vec<SetRecord> {
        self.filter(|r| r.theme == theme)
    }

    /// Subset of sets with the given theme group
    pub fn by_theme_group(&self, theme_group: &str) -> Vec<SetRecord> {
        self.filter(|r| r.theme_group == theme_group)
    }

    /// Subset of sets whose name contains the keyword (case-insensitive)
    pub fn by_keyword(&self, keyword: &str) -> Vec<SetRecord> {
        let needle = keyword.to_lowercase();
        self.filter(|r| r.name.to_lowercase().contains(&needle))
    }

    /// Subset of sets released in the given year
    pub fn by_year(&self, year: i32) -> Vec<SetRecord> {
        self.filter(|r| r.year == year)
    }

    /// Distinct theme groups in catalog order
    pub fn theme_groups(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for record in self.records.values() {
            if !seen.contains(&record.theme_group) {
                seen.push(record.theme_group.clone());
            }
        }
        seen
    }

    /// Distinct themes within a theme group, in catalog order
    pub fn themes_in_group(&self, theme_group: &str) -> Vec<String> {
        let mut seen = Vec::new();
        for record in self.records.values() {
            if record.theme_group == theme_group && !seen.contains(&record.theme) {
                seen.push(record.theme.clone());
            }
        }
        seen
    }
}

/// Average price over a pool; 0 for an empty pool.
pub fn average_price(pool: &[SetRecord]) -> f64 {
    if pool.is_empty() {
        return 0.0;
    }
    pool.iter().map(|r| r.price).sum::<f64>() / pool.len() as f64
}

/// Average piece count over a pool; 0 for an empty pool.
pub fn average_pieces(pool: &[SetRecord]) -> f64 {
    if pool.is_empty() {
        return 0.0;
    }
    pool.iter().map(|r| f64::from(r.pieces)).sum::<f64>() / pool.len() as f64
}

/// Most frequent theme in a pool, ties broken by first appearance.
pub fn most_common_theme(pool: &[SetRecord]) -> Option<String> {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for record in pool {
        *counts.entry(record.theme.as_str()).or_insert(0) += 1;
    }
    let mut best: Option<(&str, usize)> = None;
    for (theme, &count) in &counts {
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((theme, count)),
        }
    }
    best.map(|(theme, _)| theme.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample_record(id: &str, theme: &str) -> SetRecord {
        SetRecord::new(id, format!("Set {id}"))
            .with_year(2020)
            .with_theme(theme, "Licensed")
            .with_price(49.99)
            .with_pieces(500)
            .with_minifigs(3)
    }

    #[test]
    fn test_theme_group_codes_are_total() {
        assert_eq!(ThemeGroup::from_name("Pre-School").code(), 1);
        assert_eq!(ThemeGroup::from_name("Junior").code(), 2);
        assert_eq!(ThemeGroup::from_name("Art and Crafts").code(), 3);
        assert_eq!(ThemeGroup::from_name("Action & Adventure").code(), 4);
        assert_eq!(ThemeGroup::from_name("Construction").code(), 5);
        assert_eq!(ThemeGroup::from_name("Educational").code(), 6);
        assert_eq!(ThemeGroup::from_name("Basic").code(), 7);
        assert_eq!(ThemeGroup::from_name("Modern Day").code(), 8);
        assert_eq!(ThemeGroup::from_name("Licensed").code(), 9);
        assert_eq!(ThemeGroup::from_name("Historical").code(), 10);
        assert_eq!(ThemeGroup::from_name("Model Making").code(), 11);
        assert_eq!(ThemeGroup::from_name("Technical").code(), 12);
        // Unknown and unlisted groups share the fallback code
        assert_eq!(ThemeGroup::from_name("Galaxy Defenders").code(), 13);
        assert_eq!(ThemeGroup::from_name("").code(), 13);
    }

    #[test]
    fn test_build_hours() {
        let derived = DerivedFieldsConfig::default();

        let record = sample_record("1-1", "Star Wars").with_pieces(500);
        assert_relative_eq!(record.build_hours(&derived), 2.0);

        // Below the minimum piece count the estimate is forced to zero
        let tiny = sample_record("2-1", "Star Wars").with_pieces(9);
        assert_eq!(tiny.build_hours(&derived), 0.0);

        let exactly_min = sample_record("3-1", "Star Wars").with_pieces(10);
        assert_relative_eq!(exactly_min.build_hours(&derived), 10.0 / 250.0);
    }

    #[test]
    fn test_brickset_link_formatting() {
        let record = SetRecord::new("10276-1", "St. Peter's Square: Rome");
        assert_eq!(
            record.brickset_link(),
            "https://brickset.com/sets/10276-1-1/St-Peters-Square-Rome"
        );
    }

    #[test]
    fn test_catalog_rejects_duplicate_ids() {
        let mut catalog = Catalog::new();
        catalog.insert(sample_record("1-1", "City")).unwrap();
        let err = catalog.insert(sample_record("1-1", "City")).unwrap_err();
        assert!(matches!(err, BricklensError::Validation { .. }));
    }

    #[test]
    fn test_catalog_subsets() {
        let catalog = Catalog::from_records(vec![
            sample_record("1-1", "Star Wars"),
            sample_record("2-1", "City").with_year(2010),
            sample_record("3-1", "Star Wars"),
        ])
        .unwrap();

        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.by_theme("Star Wars").len(), 2);
        assert_eq!(catalog.by_theme_group("Licensed").len(), 3);
        assert_eq!(catalog.by_year(2010).len(), 1);
        assert_eq!(catalog.by_keyword("set 2").len(), 1);
        assert_eq!(catalog.by_keyword("SET").len(), 3);
        assert!(catalog.by_theme("Friends").is_empty());
    }

    #[test]
    fn test_theme_listings_preserve_order() {
        let catalog = Catalog::from_records(vec![
            sample_record("1-1", "Star Wars"),
            sample_record("2-1", "Harry Potter"),
            sample_record("3-1", "Star Wars"),
        ])
        .unwrap();

        assert_eq!(catalog.theme_groups(), vec!["Licensed".to_string()]);
        assert_eq!(
            catalog.themes_in_group("Licensed"),
            vec!["Star Wars".to_string(), "Harry Potter".to_string()]
        );
    }

    #[test]
    fn test_pool_summaries() {
        let pool = vec![
            sample_record("1-1", "Star Wars").with_price(10.0).with_pieces(100),
            sample_record("2-1", "City").with_price(20.0).with_pieces(300),
            sample_record("3-1", "Star Wars").with_price(30.0).with_pieces(200),
        ];

        assert_relative_eq!(average_price(&pool), 20.0);
        assert_relative_eq!(average_pieces(&pool), 200.0);
        assert_eq!(most_common_theme(&pool), Some("Star Wars".to_string()));

        assert_eq!(average_price(&[]), 0.0);
        assert_eq!(most_common_theme(&[]), None);
    }
}
