//! Seeded k-means clustering over standardized feature matrices.
//!
//! Cluster count is derived from the pool size rather than user-supplied:
//! `k = max(1, pool_size / items_per_cluster)`. The ratio targets a usable
//! number of similar candidates per cluster instead of a fixed cluster
//! count, since pools range from a handful of sets to thousands.
//!
//! Labels are written to a per-run side table, never onto the records: a
//! label is only meaningful relative to the pool it was computed from, and
//! comparing labels across two runs is undefined.

use indexmap::IndexMap;
use ndarray::{Array1, Array2, ArrayView1};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::core::catalog::{SetId, SetRecord};
use crate::core::config::ClusteringConfig;
use crate::core::errors::{BricklensError, Result};
use crate::core::featureset::{standardized_matrix, FeatureSpace};

/// Per-run cluster labels for one specific pool.
///
/// Entries are insertion-ordered by pool position, so iterating an
/// assignment visits sets in the same order as the pool it was computed
/// from.
#[derive(Debug, Clone)]
pub struct ClusterAssignment {
    labels: IndexMap<SetId, usize>,
    cluster_count: usize,
}

impl ClusterAssignment {
    /// Label assigned to a set in this run, if the set was in the pool
    pub fn label_of(&self, id: &str) -> Option<usize> {
        self.labels.get(id).copied()
    }

    /// Number of clusters in this run
    pub fn cluster_count(&self) -> usize {
        self.cluster_count
    }

    /// Number of labeled sets
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// True when no sets were labeled
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Iterate over `(set id, label)` pairs in pool order
    pub fn iter(&self) -> impl Iterator<Item = (&SetId, usize)> {
        self.labels.iter().map(|(id, &label)| (id, label))
    }

    /// Ids of the sets carrying the given label, in pool order
    pub fn members_of(&self, label: usize) -> Vec<&SetId> {
        self.labels
            .iter()
            .filter(|(_, &l)| l == label)
            .map(|(id, _)| id)
            .collect()
    }
}

/// Derive the cluster count for a pool: `max(1, pool_size / items_per_cluster)`.
pub fn derive_cluster_count(pool_size: usize, items_per_cluster: usize) -> usize {
    (pool_size / items_per_cluster.max(1)).max(1)
}

/// Cluster a pool of records in the given feature space.
///
/// The pool is vectorized, standardized against itself, and partitioned with
/// seeded k-means. An empty pool is rejected: it must never silently become
/// one cluster of size zero.
pub fn cluster(
    pool: &[SetRecord],
    space: FeatureSpace,
    config: &ClusteringConfig,
) -> Result<ClusterAssignment> {
    if pool.is_empty() {
        return Err(BricklensError::validation(
            "cannot cluster an empty pool of sets",
        ));
    }
    config.validate()?;

    let matrix = standardized_matrix(pool, space)?;
    let k = derive_cluster_count(pool.len(), config.items_per_cluster);
    debug!(
        pool_size = pool.len(),
        clusters = k,
        "partitioning pool with seeded k-means"
    );

    let labels = kmeans(&matrix, k, config)?;

    let mut table = IndexMap::with_capacity(pool.len());
    for (record, label) in pool.iter().zip(labels) {
        table.insert(record.id.clone(), label);
    }

    Ok(ClusterAssignment {
        labels: table,
        cluster_count: k,
    })
}

/// Lloyd's algorithm with k-means++ initialization and a fixed seed.
fn kmeans(data: &Array2<f64>, k: usize, config: &ClusteringConfig) -> Result<Vec<usize>> {
    let n = data.nrows();
    let k = k.min(n);
    let mut rng = StdRng::seed_from_u64(config.seed);

    let mut centroids = plus_plus_init(data, k, &mut rng);
    let mut assignments = vec![0usize; n];
    let mut prev_inertia = f64::MAX;

    for _ in 0..config.max_iterations {
        // Assignment step
        for (i, row) in data.rows().into_iter().enumerate() {
            assignments[i] = nearest_centroid(row, &centroids);
        }

        // Update step
        let dims = data.ncols();
        let mut sums = vec![Array1::<f64>::zeros(dims); k];
        let mut counts = vec![0usize; k];
        for (i, row) in data.rows().into_iter().enumerate() {
            let c = assignments[i];
            sums[c] += &row;
            counts[c] += 1;
        }
        for (c, sum) in sums.into_iter().enumerate() {
            if counts[c] > 0 {
                centroids[c] = sum / counts[c] as f64;
            } else {
                // Empty cluster: reseed deterministically from the pool
                let idx = rng.gen_range(0..n);
                centroids[c] = data.row(idx).to_owned();
            }
        }

        // Convergence check on the inertia delta
        let inertia: f64 = data
            .rows()
            .into_iter()
            .zip(&assignments)
            .map(|(row, &c)| squared_distance(row, centroids[c].view()))
            .sum();
        if (prev_inertia - inertia).abs() < config.tolerance {
            break;
        }
        prev_inertia = inertia;
    }

    Ok(assignments)
}

/// k-means++ seeding: first centroid uniform, the rest weighted by squared
/// distance to the nearest already-chosen centroid.
fn plus_plus_init(data: &Array2<f64>, k: usize, rng: &mut StdRng) -> Vec<Array1<f64>> {
    let n = data.nrows();
    let mut centroids = Vec::with_capacity(k);

    let first = rng.gen_range(0..n);
    centroids.push(data.row(first).to_owned());

    for _ in 1..k {
        let distances: Vec<f64> = data
            .rows()
            .into_iter()
            .map(|row| {
                centroids
                    .iter()
                    .map(|c| squared_distance(row, c.view()))
                    .fold(f64::MAX, f64::min)
            })
            .collect();

        let total: f64 = distances.iter().sum();
        if total <= f64::EPSILON {
            // All points coincide with existing centroids
            let idx = rng.gen_range(0..n);
            centroids.push(data.row(idx).to_owned());
            continue;
        }

        let threshold = rng.gen::<f64>() * total;
        let mut cumulative = 0.0;
        let mut selected = n - 1;
        for (i, d) in distances.iter().enumerate() {
            cumulative += d;
            if cumulative >= threshold {
                selected = i;
                break;
            }
        }
        centroids.push(data.row(selected).to_owned());
    }

    centroids
}

fn nearest_centroid(row: ArrayView1<'_, f64>, centroids: &[Array1<f64>]) -> usize {
    let mut best = 0;
    let mut best_distance = f64::MAX;
    for (i, centroid) in centroids.iter().enumerate() {
        let distance = squared_distance(row, centroid.view());
        if distance < best_distance {
            best_distance = distance;
            best = i;
        }
    }
    best
}

fn squared_distance(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum()
}
