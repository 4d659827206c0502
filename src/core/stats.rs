//! Descriptive statistics for numeric set attributes.
//!
//! Computes mean, median, population standard deviation, and a two-sided
//! Student's-t confidence interval for a named attribute over a pool of
//! sets. Degenerate inputs have defined fallbacks: zero eligible values
//! report no data, a single value reports zero spread and an interval that
//! collapses to the mean. Division by zero can never occur.

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::core::catalog::SetRecord;
use crate::core::config::{DerivedFieldsConfig, StatisticsConfig};
use crate::core::errors::{BricklensError, Result};

/// Numeric attributes that can be analyzed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NumericAttribute {
    /// Recommended retail price
    Price,
    /// Piece count
    Pieces,
    /// Minifigure count
    Minifigs,
    /// Release year
    Year,
    /// Number of users owning the set
    OwnCount,
    /// Number of users wanting the set
    WantCount,
    /// Estimated build hours (derived)
    BuildHours,
}

impl NumericAttribute {
    /// Resolve an attribute by name. Unknown names yield `None`, which the
    /// engine reports as "no data" rather than an error.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "price" => Some(Self::Price),
            "pieces" => Some(Self::Pieces),
            "minifigs" => Some(Self::Minifigs),
            "year" => Some(Self::Year),
            "own_count" | "owncount" => Some(Self::OwnCount),
            "want_count" | "wantcount" => Some(Self::WantCount),
            "build_hours" | "hours_to_build" => Some(Self::BuildHours),
            _ => None,
        }
    }

    /// Canonical name of this attribute
    pub fn name(self) -> &'static str {
        match self {
            Self::Price => "price",
            Self::Pieces => "pieces",
            Self::Minifigs => "minifigs",
            Self::Year => "year",
            Self::OwnCount => "own_count",
            Self::WantCount => "want_count",
            Self::BuildHours => "build_hours",
        }
    }

    /// Read this attribute off a record
    pub fn read(self, record: &SetRecord, derived: &DerivedFieldsConfig) -> f64 {
        match self {
            Self::Price => record.price,
            Self::Pieces => f64::from(record.pieces),
            Self::Minifigs => f64::from(record.minifigs),
            Self::Year => f64::from(record.year),
            Self::OwnCount => f64::from(record.own_count),
            Self::WantCount => f64::from(record.want_count),
            Self::BuildHours => record.build_hours(derived),
        }
    }
}

/// Summary statistics for one attribute over one pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionSummary {
    /// Arithmetic mean
    pub mean: f64,
    /// Median (midpoint of the two central values for even counts)
    pub median: f64,
    /// Population standard deviation (divisor n); 0 when n = 1
    pub std_dev: f64,
    /// Two-sided Student's-t confidence interval; (mean, mean) when n = 1
    pub confidence_interval: (f64, f64),
    /// Number of values the summary was computed from
    pub n_samples: usize,
}

/// Outcome of analyzing an attribute over a pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AttributeSummary {
    /// No eligible values (empty pool or unknown attribute)
    NoData,
    /// Computed summary statistics
    Summary(DistributionSummary),
}

impl AttributeSummary {
    /// The computed summary, if there was data
    pub fn summary(&self) -> Option<&DistributionSummary> {
        match self {
            Self::NoData => None,
            Self::Summary(s) => Some(s),
        }
    }
}

/// Analyze one attribute over a pool of sets.
pub fn analyze(
    pool: &[SetRecord],
    attribute: NumericAttribute,
    statistics: &StatisticsConfig,
    derived: &DerivedFieldsConfig,
) -> Result<AttributeSummary> {
    statistics.validate()?;

    let values: Vec<f64> = pool
        .iter()
        .map(|r| attribute.read(r, derived))
        .filter(|v| v.is_finite())
        .collect();

    analyze_values(&values, statistics)
}

/// Analyze a bare list of values.
pub fn analyze_values(values: &[f64], statistics: &StatisticsConfig) -> Result<AttributeSummary> {
    let n = values.len();
    if n == 0 {
        return Ok(AttributeSummary::NoData);
    }

    let mean = values.iter().sum::<f64>() / n as f64;
    let median = median_of(values);

    // Population standard deviation (divisor n); defined as 0 for n = 1
    let std_dev = if n > 1 {
        (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64).sqrt()
    } else {
        0.0
    };

    // Two-sided t interval with n-1 degrees of freedom; degenerates to
    // (mean, mean) when there is no spread to estimate
    let confidence_interval = if n > 1 {
        let dof = (n - 1) as f64;
        let t = StudentsT::new(0.0, 1.0, dof)
            .map_err(|e| {
                BricklensError::math_with_context(
                    format!("Student's-t distribution rejected parameters: {e}"),
                    format!("dof = {dof}"),
                )
            })?
            .inverse_cdf(0.5 + statistics.confidence_level / 2.0);
        let half_width = t * std_dev / (n as f64).sqrt();
        (mean - half_width, mean + half_width)
    } else {
        (mean, mean)
    };

    Ok(AttributeSummary::Summary(DistributionSummary {
        mean,
        median,
        std_dev,
        confidence_interval,
        n_samples: n,
    }))
}

fn median_of(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}
