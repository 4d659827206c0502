//! Catalog CSV ingestion and subset export.
//!
//! Ingestion is where record validation happens: malformed numerics and
//! out-of-bounds years are rejected here with row context, so the core
//! engines can assume validated numeric types.

use std::io::{Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};
use tracing::info;

use crate::core::catalog::{Catalog, SetRecord};
use crate::core::config::CatalogConfig;
use crate::core::errors::{BricklensError, Result};

/// Expected column order of a catalog CSV (header row required).
const CATALOG_COLUMNS: usize = 13;

/// Load a catalog from a CSV file.
pub fn load_catalog(path: impl AsRef<Path>, config: &CatalogConfig) -> Result<Catalog> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|e| {
        BricklensError::io(format!("Failed to open catalog file: {}", path.display()), e)
    })?;
    let catalog = read_catalog(file, config)?;
    info!(sets = catalog.len(), path = %path.display(), "catalog loaded");
    Ok(catalog)
}

/// Read a catalog from any CSV source.
///
/// Column layout: id, year, theme, themegroup, subtheme, name, image,
/// price, pieces, minifigs, packaging, owncount, wantcount.
pub fn read_catalog<R: Read>(reader: R, config: &CatalogConfig) -> Result<Catalog> {
    config.validate()?;

    let mut csv_reader = ReaderBuilder::new().has_headers(true).from_reader(reader);
    let mut catalog = Catalog::new();

    for (index, row) in csv_reader.records().enumerate() {
        let row_number = index + 1;
        let row = row?;
        let record = parse_row(&row, row_number, config)?;
        catalog.insert(record).map_err(|e| {
            BricklensError::ingest_at_row(format!("duplicate record: {e}"), row_number)
        })?;
    }

    Ok(catalog)
}

fn parse_row(row: &csv::StringRecord, row_number: usize, config: &CatalogConfig) -> Result<SetRecord> {
    if row.len() != CATALOG_COLUMNS {
        return Err(BricklensError::ingest_at_row(
            format!("expected {CATALOG_COLUMNS} columns, found {}", row.len()),
            row_number,
        ));
    }

    let field = |i: usize| row.get(i).unwrap_or("").trim().to_string();

    let id = field(0);
    if id.is_empty() {
        return Err(BricklensError::ingest_at_row("empty set id", row_number));
    }

    let year = parse_int(&field(1), "year", row_number)?;
    if year < config.min_year || year > config.max_year {
        return Err(BricklensError::ingest_at_row(
            format!(
                "year {year} outside configured bounds [{}, {}]",
                config.min_year, config.max_year
            ),
            row_number,
        ));
    }

    let price = parse_float(&field(7), "price", row_number)?;
    if price < 0.0 {
        return Err(BricklensError::ingest_at_row(
            format!("negative price {price}"),
            row_number,
        ));
    }

    Ok(SetRecord {
        id,
        year,
        theme: field(2),
        theme_group: field(3),
        subtheme: field(4),
        name: field(5),
        image: field(6),
        price,
        pieces: parse_uint(&field(8), "pieces", row_number)?,
        minifigs: parse_uint(&field(9), "minifigs", row_number)?,
        packaging: field(10),
        own_count: parse_uint(&field(11), "owncount", row_number)?,
        want_count: parse_uint(&field(12), "wantcount", row_number)?,
    })
}

fn parse_int(value: &str, column: &str, row_number: usize) -> Result<i32> {
    value.parse().map_err(|_| {
        BricklensError::ingest_at_row(
            format!("invalid integer '{value}' in column '{column}'"),
            row_number,
        )
    })
}

fn parse_uint(value: &str, column: &str, row_number: usize) -> Result<u32> {
    value.parse().map_err(|_| {
        BricklensError::ingest_at_row(
            format!("invalid non-negative integer '{value}' in column '{column}'"),
            row_number,
        )
    })
}

fn parse_float(value: &str, column: &str, row_number: usize) -> Result<f64> {
    value.parse().map_err(|_| {
        BricklensError::ingest_at_row(
            format!("invalid number '{value}' in column '{column}'"),
            row_number,
        )
    })
}

/// Export a pool of sets (e.g. a favourites list) to a CSV file, including
/// the formatted brickset link.
pub fn export_pool(path: impl AsRef<Path>, pool: &[SetRecord]) -> Result<()> {
    let path = path.as_ref();
    let file = std::fs::File::create(path).map_err(|e| {
        BricklensError::io(format!("Failed to create export file: {}", path.display()), e)
    })?;
    write_pool(file, pool)?;
    info!(sets = pool.len(), path = %path.display(), "pool exported");
    Ok(())
}

/// Write a pool of sets to any CSV sink.
pub fn write_pool<W: Write>(writer: W, pool: &[SetRecord]) -> Result<()> {
    let mut csv_writer = WriterBuilder::new().from_writer(writer);

    csv_writer.write_record([
        "ID", "Name", "Year", "Theme", "ThemeGroup", "Subtheme", "Image", "Price", "Pieces",
        "Minifigs", "Packaging", "OwnCount", "WantCount", "Link",
    ])?;

    for record in pool {
        let row = [
            record.id.clone(),
            record.name.clone(),
            record.year.to_string(),
            record.theme.clone(),
            record.theme_group.clone(),
            record.subtheme.clone(),
            record.image.clone(),
            record.price.to_string(),
            record.pieces.to_string(),
            record.minifigs.to_string(),
            record.packaging.clone(),
            record.own_count.to_string(),
            record.want_count.to_string(),
            record.brickset_link(),
        ];
        csv_writer.write_record(&row)?;
    }

    csv_writer.flush().map_err(|e| BricklensError::io("failed to flush export", e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "id,year,theme,themegroup,subtheme,name,image,price,pieces,minifigs,packaging,owncount,wantcount\n";

    fn sample_csv() -> String {
        format!(
            "{HEADER}\
             10276-1,2021,Creator Expert,Model Making,Modular Buildings,Colosseum,10276,549.99,9036,0,Box,1200,3400\n\
             75309-1,2021,Star Wars,Licensed,Ultimate Collector Series,Republic Gunship,75309,399.99,3292,3,Box,800,2100\n"
        )
    }

    #[test]
    fn test_read_catalog() {
        let catalog = read_catalog(sample_csv().as_bytes(), &CatalogConfig::default()).unwrap();
        assert_eq!(catalog.len(), 2);

        let colosseum = catalog.get("10276-1").unwrap();
        assert_eq!(colosseum.year, 2021);
        assert_eq!(colosseum.pieces, 9036);
        assert_eq!(colosseum.theme_group, "Model Making");
        assert_eq!(colosseum.price, 549.99);
        assert_eq!(colosseum.want_count, 3400);
    }

    #[test]
    fn test_rejects_out_of_bounds_year() {
        let csv = format!(
            "{HEADER}1-1,1995,City,Modern Day,,Old Set,img,10.0,100,1,Box,0,0\n"
        );
        let err = read_catalog(csv.as_bytes(), &CatalogConfig::default()).unwrap_err();
        match err {
            BricklensError::Ingest { row, message } => {
                assert_eq!(row, Some(1));
                assert!(message.contains("1995"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_rejects_malformed_numeric() {
        let csv = format!(
            "{HEADER}1-1,2020,City,Modern Day,,Bad Set,img,abc,100,1,Box,0,0\n"
        );
        let err = read_catalog(csv.as_bytes(), &CatalogConfig::default()).unwrap_err();
        match err {
            BricklensError::Ingest { row, message } => {
                assert_eq!(row, Some(1));
                assert!(message.contains("price"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_rejects_wrong_column_count() {
        let csv = format!("{HEADER}1-1,2020,City\n");
        let err = read_catalog(csv.as_bytes(), &CatalogConfig::default()).unwrap_err();
        assert!(matches!(err, BricklensError::Ingest { .. }));
    }

    #[test]
    fn test_rejects_duplicate_ids_with_row() {
        let csv = format!(
            "{HEADER}\
             1-1,2020,City,Modern Day,,First,img,10.0,100,1,Box,0,0\n\
             1-1,2021,City,Modern Day,,Second,img,20.0,200,2,Box,0,0\n"
        );
        let err = read_catalog(csv.as_bytes(), &CatalogConfig::default()).unwrap_err();
        match err {
            BricklensError::Ingest { row, .. } => assert_eq!(row, Some(2)),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_export_round_trip_via_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("favourites.csv");

        let catalog = read_catalog(sample_csv().as_bytes(), &CatalogConfig::default()).unwrap();
        let pool = catalog.all_items();
        export_pool(&path, &pool).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert!(lines.next().unwrap().starts_with("ID,Name,Year"));
        assert_eq!(lines.clone().count(), 2);
        assert!(content.contains("https://brickset.com/sets/10276-1-1/Colosseum"));
    }

    #[test]
    fn test_custom_year_bounds() {
        let config = CatalogConfig {
            min_year: 1990,
            max_year: 1999,
        };
        let csv = format!(
            "{HEADER}1-1,1995,City,Modern Day,,Old Set,img,10.0,100,1,Box,0,0\n"
        );
        let catalog = read_catalog(csv.as_bytes(), &config).unwrap();
        assert_eq!(catalog.len(), 1);
    }
}
