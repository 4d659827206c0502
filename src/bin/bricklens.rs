//! Bricklens CLI - catalog similarity and statistics from the command line.
//!
//! Non-interactive front end over the engine: load a catalog CSV, then run
//! one similarity or statistics query and print the result as JSON.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use bricklens::api::BricklensEngine;
use bricklens::core::config::BricklensConfig;
use bricklens::core::similarity::SetPreferences;
use bricklens::io::csv::{export_pool, load_catalog};

#[derive(Parser)]
#[command(name = "bricklens", about = "Construction-toy set recommender and analyzer", version)]
struct Cli {
    /// Path to the catalog CSV
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Path to a YAML configuration file (defaults apply when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find sets similar to a catalog set
    Similar {
        /// Target set id
        #[arg(long)]
        id: String,
    },
    /// Recommend sets from stated preferences
    Tailored {
        /// Theme group the preferences belong to
        #[arg(long)]
        theme_group: String,
        /// Theme within the group
        #[arg(long)]
        theme: String,
        /// Ideal price in USD
        #[arg(long)]
        price: f64,
        /// Ideal minifigure count
        #[arg(long, default_value_t = 0)]
        minifigs: u32,
    },
    /// Analyze a numeric attribute over a subset and the whole catalog
    Stats {
        /// Attribute name (price, pieces, minifigs, year, own_count,
        /// want_count, build_hours)
        #[arg(long)]
        attribute: String,
        /// Restrict the subset to a theme
        #[arg(long)]
        theme: Option<String>,
        /// Restrict the subset to a theme group
        #[arg(long)]
        theme_group: Option<String>,
        /// Restrict the subset to names containing a keyword
        #[arg(long)]
        keyword: Option<String>,
        /// Restrict the subset to a release year
        #[arg(long)]
        year: Option<i32>,
    },
    /// Pick a random set from the catalog
    Random,
    /// Export a theme subset to CSV
    Export {
        /// Theme to export
        #[arg(long)]
        theme: String,
        /// Output CSV path
        #[arg(long)]
        output: PathBuf,
    },
    /// Print the default configuration as YAML
    PrintDefaultConfig,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    if let Commands::PrintDefaultConfig = cli.command {
        print!("{}", serde_yaml::to_string(&BricklensConfig::default())?);
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => BricklensConfig::from_yaml_file(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => BricklensConfig::default(),
    };

    let catalog_path = cli
        .catalog
        .as_ref()
        .context("--catalog is required for this command")?;
    let catalog = load_catalog(catalog_path, &config.catalog)
        .with_context(|| format!("loading catalog from {}", catalog_path.display()))?;
    let engine = BricklensEngine::new(catalog, config)?;

    match cli.command {
        Commands::Similar { id } => {
            let result = engine.find_similar_to(&id)?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Tailored {
            theme_group,
            theme,
            price,
            minifigs,
        } => {
            let preferences = SetPreferences {
                theme_group,
                theme,
                ideal_price: price,
                ideal_minifigs: minifigs,
            };
            let result = engine.recommend_tailored(&preferences)?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Stats {
            attribute,
            theme,
            theme_group,
            keyword,
            year,
        } => {
            let subset = if let Some(theme) = theme {
                engine.catalog().by_theme(&theme)
            } else if let Some(group) = theme_group {
                engine.catalog().by_theme_group(&group)
            } else if let Some(keyword) = keyword {
                engine.catalog().by_keyword(&keyword)
            } else if let Some(year) = year {
                engine.catalog().by_year(year)
            } else {
                engine.catalog().all_items()
            };

            let report = engine.analyze_attribute(&subset, &attribute)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Random => {
            let pick = engine.random_recommendation()?;
            println!("{}", serde_json::to_string_pretty(&pick)?);
        }
        Commands::Export { theme, output } => {
            let pool = engine.catalog().by_theme(&theme);
            export_pool(&output, &pool)?;
            println!("{} sets exported to {}", pool.len(), output.display());
        }
        Commands::PrintDefaultConfig => unreachable!("handled before catalog loading"),
    }

    Ok(())
}
