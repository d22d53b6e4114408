//! Label assignment from a spectral embedding by discretization.
//!
//! Rows of the embedding are normalized onto the unit sphere and an
//! orthogonal rotation is sought that brings them closest to the one-hot
//! label vectors (Yu & Shi, "Multiclass spectral clustering", 2003). The
//! rotation is updated by SVD until the normalized-cut objective settles;
//! a failed SVD restarts from a new random row.
use crate::error::ClusteringError;
use crate::params::DiscretizeParams;
use log::debug;
use nalgebra::{DMatrix, SVD};
use rand::rngs::StdRng;
use rand::Rng;

/// Cluster label in `[0, k)` for every row of `embedding` (`n × k`).
pub fn discretize(
    embedding: &DMatrix<f64>,
    params: &DiscretizeParams,
    rng: &mut StdRng,
) -> Result<Vec<usize>, ClusteringError> {
    let vectors = normalized_rows(embedding)?;
    let (n, k) = vectors.shape();

    let mut restarts = 0;
    while restarts < params.max_svd_restarts {
        let mut rotation = initial_rotation(&vectors, rng);
        let mut last_objective = 0.0;
        let mut iterations = 0;
        loop {
            iterations += 1;
            let labels = assign(&vectors, &rotation);

            // Sum of the embedding rows per label.
            let mut t_svd = DMatrix::<f64>::zeros(k, k);
            for (i, &label) in labels.iter().enumerate() {
                let mut row = t_svd.row_mut(label);
                row += vectors.row(i);
            }
            let svd = SVD::try_new(t_svd, true, true, f64::EPSILON, 0);
            let Some((u, v_t, singular_sum)) = svd.and_then(|s| {
                let sum = s.singular_values.sum();
                Some((s.u?, s.v_t?, sum))
            }) else {
                restarts += 1;
                debug!("discretize: SVD failed, restart {}", restarts);
                break;
            };

            let ncut = 2.0 * (n as f64 - singular_sum);
            if (ncut - last_objective).abs() < f64::EPSILON || iterations > params.max_iterations
            {
                debug!(
                    "discretize: n={} k={} ncut={:.4} after {} iterations",
                    n, k, ncut, iterations
                );
                return Ok(labels);
            }
            last_objective = ncut;
            rotation = v_t.transpose() * u.transpose();
        }
    }
    Err(ClusteringError::DiscretizationFailed { restarts })
}

/// Columns scaled to norm `sqrt(n)` with a non-positive first entry, then
/// rows scaled to unit norm.
fn normalized_rows(embedding: &DMatrix<f64>) -> Result<DMatrix<f64>, ClusteringError> {
    if embedding.iter().any(|v| !v.is_finite()) {
        return Err(ClusteringError::NonFiniteEmbedding);
    }
    let (n, _) = embedding.shape();
    let norm_ones = (n as f64).sqrt();
    let mut vectors = embedding.clone();
    for mut col in vectors.column_iter_mut() {
        let norm = col.norm();
        if norm > 0.0 {
            col *= norm_ones / norm;
        }
        let first = col[0];
        if first != 0.0 {
            col *= -first.signum();
        }
    }
    for mut row in vectors.row_iter_mut() {
        let norm = row.norm();
        if norm > 0.0 {
            row /= norm;
        }
    }
    Ok(vectors)
}

/// A random row, then repeatedly the row least aligned with those chosen.
fn initial_rotation(vectors: &DMatrix<f64>, rng: &mut StdRng) -> DMatrix<f64> {
    let (n, k) = vectors.shape();
    let mut rotation = DMatrix::zeros(k, k);
    let first = rng.gen_range(0..n);
    rotation.set_column(0, &vectors.row(first).transpose());
    let mut alignment = vec![0.0; n];
    for j in 1..k {
        let dots = vectors * rotation.column(j - 1);
        for (acc, d) in alignment.iter_mut().zip(dots.iter()) {
            *acc += d.abs();
        }
        let next = argmin(&alignment);
        rotation.set_column(j, &vectors.row(next).transpose());
    }
    rotation
}

fn assign(vectors: &DMatrix<f64>, rotation: &DMatrix<f64>) -> Vec<usize> {
    let projected = vectors * rotation;
    projected
        .row_iter()
        .map(|row| argmax(row.iter().copied()))
        .collect()
}

/// First index of the maximum.
fn argmax(values: impl Iterator<Item = f64>) -> usize {
    let mut best = (0, f64::NEG_INFINITY);
    for (i, v) in values.enumerate() {
        if v > best.1 {
            best = (i, v);
        }
    }
    best.0
}

/// First index of the minimum.
fn argmin(values: &[f64]) -> usize {
    argmax(values.iter().map(|v| -v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn separated_groups_get_distinct_labels() {
        // Three groups of rows pointing in clearly different directions.
        let dirs = [[1.0, 0.1, 0.0], [0.1, 1.0, 0.2], [0.0, 0.3, 1.0]];
        let embedding = DMatrix::from_fn(30, 3, |i, j| dirs[i / 10][j] * (1.0 + 0.01 * i as f64));
        let mut rng = StdRng::seed_from_u64(3);
        let labels = discretize(&embedding, &DiscretizeParams::default(), &mut rng).unwrap();

        for group in labels.chunks(10) {
            assert!(group.iter().all(|&l| l == group[0]), "labels={labels:?}");
        }
        let mut firsts = vec![labels[0], labels[10], labels[20]];
        firsts.sort_unstable();
        firsts.dedup();
        assert_eq!(firsts.len(), 3);
        assert!(labels.iter().all(|&l| l < 3));
    }

    #[test]
    fn single_column_labels_everything_zero() {
        let embedding = DMatrix::from_element(5, 1, 0.4);
        let mut rng = StdRng::seed_from_u64(0);
        let labels = discretize(&embedding, &DiscretizeParams::default(), &mut rng).unwrap();
        assert_eq!(labels, vec![0; 5]);
    }

    #[test]
    fn non_finite_embedding_is_rejected() {
        let mut embedding = DMatrix::from_element(4, 2, 1.0);
        embedding[(2, 1)] = f64::NAN;
        let mut rng = StdRng::seed_from_u64(0);
        let err = discretize(&embedding, &DiscretizeParams::default(), &mut rng).unwrap_err();
        assert_eq!(err, ClusteringError::NonFiniteEmbedding);
    }

    #[test]
    fn argmax_prefers_first_of_equals() {
        assert_eq!(argmax([1.0, 3.0, 3.0].into_iter()), 1);
        assert_eq!(argmin(&[2.0, 0.5, 0.5]), 1);
    }
}
