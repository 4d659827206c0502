//! End-to-end tests: CSV ingestion through similarity and statistics.

use approx::assert_relative_eq;

use bricklens::api::BricklensEngine;
use bricklens::core::config::BricklensConfig;
use bricklens::core::similarity::{SetPreferences, SYNTHETIC_PREFERENCE_ID};
use bricklens::core::stats::AttributeSummary;
use bricklens::io::csv::read_catalog;

const CATALOG_CSV: &str = "\
id,year,theme,themegroup,subtheme,name,image,price,pieces,minifigs,packaging,owncount,wantcount
sw-a1,2018,Star Wars,Licensed,Starfighters,Small Fighter A,img1,10.00,100,1,Box,50,120
sw-a2,2018,Star Wars,Licensed,Starfighters,Small Fighter B,img2,11.00,110,1,Box,55,130
sw-a3,2019,Star Wars,Licensed,Starfighters,Small Fighter C,img3,12.00,120,1,Box,60,140
sw-b1,2020,Star Wars,Licensed,Capital Ships,Mid Cruiser A,img4,100.00,1000,5,Box,200,400
sw-b2,2020,Star Wars,Licensed,Capital Ships,Mid Cruiser B,img5,105.00,1050,5,Box,210,410
sw-b3,2021,Star Wars,Licensed,Capital Ships,Mid Cruiser C,img6,110.00,1100,6,Box,220,420
sw-c1,2022,Star Wars,Licensed,Ultimate Collector Series,Huge Flagship A,img7,400.00,4000,10,Box,500,900
sw-c2,2022,Star Wars,Licensed,Ultimate Collector Series,Huge Flagship B,img8,410.00,4100,10,Box,510,910
sw-c3,2023,Star Wars,Licensed,Ultimate Collector Series,Huge Flagship C,img9,420.00,4200,11,Box,520,920
city-1,2020,City,Modern Day,Police,Police Station,img10,50.00,500,3,Box,100,200
city-2,2021,City,Modern Day,Fire,Fire Station,img11,60.00,600,4,Box,110,210
city-3,2022,City,Modern Day,Space,Space Port,img12,70.00,700,5,Box,120,220
";

fn engine() -> BricklensEngine {
    let config = BricklensConfig::default();
    let catalog = read_catalog(CATALOG_CSV.as_bytes(), &config.catalog).unwrap();
    BricklensEngine::new(catalog, config).unwrap()
}

#[test]
fn similar_sets_share_theme_and_exclude_target() {
    let engine = engine();
    let result = engine.find_similar_to("sw-b1").unwrap();

    assert_eq!(result.target_id, "sw-b1");
    assert!(result.sets.iter().all(|r| r.id != "sw-b1"));
    assert!(result.sets.iter().all(|r| r.theme == "Star Wars"));
    // The mid-priced cruisers are each other's nearest neighbours
    assert!(result.sets.iter().any(|r| r.id.starts_with("sw-b")));
}

#[test]
fn similarity_is_deterministic_across_calls() {
    let engine = engine();
    let first = engine.find_similar_to("sw-a2").unwrap();
    let second = engine.find_similar_to("sw-a2").unwrap();

    let first_ids: Vec<&str> = first.sets.iter().map(|r| r.id.as_str()).collect();
    let second_ids: Vec<&str> = second.sets.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(first_ids, second_ids);
}

#[test]
fn tailored_recommendation_round_trip() {
    let engine = engine();
    let before = engine.catalog().len();

    let preferences = SetPreferences {
        theme_group: "Licensed".to_string(),
        theme: "Star Wars".to_string(),
        ideal_price: 100.0,
        ideal_minifigs: 5,
    };
    let result = engine.recommend_tailored(&preferences).unwrap();

    // The synthetic target must never persist in the catalog
    assert_eq!(engine.catalog().len(), before);
    assert!(engine.catalog().get(SYNTHETIC_PREFERENCE_ID).is_none());
    assert!(result.sets.iter().all(|r| r.id != SYNTHETIC_PREFERENCE_ID));

    // price 100 derives round(-19.079 + 9.288 * 100) = 910 pieces, which
    // places the target with the mid-priced cruisers in the reduced space
    assert!(result.sets.iter().any(|r| r.id.starts_with("sw-b")));
}

#[test]
fn statistics_subset_versus_catalog() {
    let engine = engine();
    let subset = engine.catalog().by_theme("City");
    let report = engine.analyze_attribute(&subset, "price").unwrap();

    let subset_summary = report.subset.summary().unwrap();
    assert_eq!(subset_summary.n_samples, 3);
    assert_relative_eq!(subset_summary.mean, 60.0);
    assert_relative_eq!(subset_summary.median, 60.0);
    assert_relative_eq!(subset_summary.std_dev, 8.16497, epsilon = 1e-4);
    assert_relative_eq!(subset_summary.confidence_interval.0, 39.716, epsilon = 1e-2);
    assert_relative_eq!(subset_summary.confidence_interval.1, 80.284, epsilon = 1e-2);

    let catalog_summary = report.catalog.summary().unwrap();
    assert_eq!(catalog_summary.n_samples, 12);
    assert!(catalog_summary.mean > subset_summary.mean);
}

#[test]
fn statistics_on_derived_attribute() {
    let engine = engine();
    let subset = engine.catalog().by_theme("City");
    let report = engine.analyze_attribute(&subset, "build_hours").unwrap();

    // 500/250, 600/250, 700/250 -> mean 2.4 hours
    let summary = report.subset.summary().unwrap();
    assert_relative_eq!(summary.mean, 2.4);
}

#[test]
fn statistics_unknown_attribute_is_no_data() {
    let engine = engine();
    let subset = engine.catalog().all_items();
    let report = engine.analyze_attribute(&subset, "sparkle").unwrap();
    assert_eq!(report.subset, AttributeSummary::NoData);
    assert_eq!(report.catalog, AttributeSummary::NoData);
}

#[test]
fn statistics_empty_subset_is_no_data() {
    let engine = engine();
    let subset = engine.catalog().by_theme("Friends");
    let report = engine.analyze_attribute(&subset, "pieces").unwrap();
    assert_eq!(report.subset, AttributeSummary::NoData);
    assert!(report.catalog.summary().is_some());
}

#[test]
fn pool_summary_over_keyword_subset() {
    let engine = engine();
    let pool = engine.catalog().by_keyword("station");
    let summary = engine.pool_summary(&pool);

    assert_eq!(summary.set_count, 2);
    assert_relative_eq!(summary.average_price, 55.0);
    assert_eq!(summary.most_common_theme, Some("City".to_string()));
}
