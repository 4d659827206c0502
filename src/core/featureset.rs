//! Feature vectorization and pool standardization.
//!
//! Maps set records to numeric feature vectors and standardizes the feature
//! space across the current pool. The scaler is fit fresh per call and never
//! reused across pools: pools vary in composition, and a globally fit scaler
//! would bias small subsets.

use ndarray::{Array2, Axis};

use crate::core::catalog::SetRecord;
use crate::core::errors::{BricklensError, Result};

/// Which features participate in clustering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureSpace {
    /// `[theme_group_code, price, pieces, minifigs, year]` — used when the
    /// target is a real catalog set.
    Detailed,
    /// `[price, pieces, minifigs]` — used when the target is synthetic and
    /// its theme and year are not comparable signals.
    Reduced,
}

impl FeatureSpace {
    /// Number of features in this space
    pub fn dimensions(self) -> usize {
        match self {
            Self::Detailed => 5,
            Self::Reduced => 3,
        }
    }

    /// Vectorize a single record. The theme-group code is recomputed from
    /// the record's theme-group string on every call.
    pub fn vector(self, record: &SetRecord) -> Vec<f64> {
        match self {
            Self::Detailed => vec![
                f64::from(record.theme_group_kind().code()),
                record.price,
                f64::from(record.pieces),
                f64::from(record.minifigs),
                f64::from(record.year),
            ],
            Self::Reduced => vec![
                record.price,
                f64::from(record.pieces),
                f64::from(record.minifigs),
            ],
        }
    }
}

/// Build the feature matrix for a pool, one row per record.
///
/// An empty pool is a caller error: the clustering engine must reject it
/// rather than silently degenerate.
pub fn feature_matrix(pool: &[SetRecord], space: FeatureSpace) -> Result<Array2<f64>> {
    if pool.is_empty() {
        return Err(BricklensError::validation(
            "cannot build a feature matrix for an empty pool",
        ));
    }

    let dims = space.dimensions();
    let mut matrix = Array2::zeros((pool.len(), dims));
    for (row, record) in pool.iter().enumerate() {
        for (col, value) in space.vector(record).into_iter().enumerate() {
            matrix[[row, col]] = value;
        }
    }
    Ok(matrix)
}

/// Standardize each column to zero mean and unit variance, fit on this
/// matrix only. Columns with zero variance map to 0.0 rather than NaN.
pub fn standardize(matrix: &mut Array2<f64>) {
    let n = matrix.nrows();
    if n == 0 {
        return;
    }

    for mut column in matrix.axis_iter_mut(Axis(1)) {
        let mean = column.sum() / n as f64;
        let variance = column.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64;
        let std_dev = variance.sqrt();

        if std_dev > f64::EPSILON {
            column.mapv_inplace(|v| (v - mean) / std_dev);
        } else {
            column.fill(0.0);
        }
    }
}

/// Vectorize and standardize a pool in one step.
pub fn standardized_matrix(pool: &[SetRecord], space: FeatureSpace) -> Result<Array2<f64>> {
    let mut matrix = feature_matrix(pool, space)?;
    standardize(&mut matrix);
    Ok(matrix)
}
