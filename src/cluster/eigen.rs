//! Leading eigenpairs of the normalized adjacency.
//!
//! Small graphs go through a dense symmetric decomposition. Larger ones use a
//! block LOBPCG iteration: each step orthonormalizes `[X, R, P]` (current
//! Ritz block, residuals, previous search direction) with a Householder QR
//! and runs Rayleigh–Ritz on that basis, so only sparse products with the
//! operator are needed.
use super::graph::NormalizedAdjacency;
use crate::error::ClusteringError;
use crate::params::EigenSolverParams;
use log::debug;
use nalgebra::{DMatrix, SymmetricEigen};
use rand::rngs::StdRng;
use rand::Rng;

/// Eigenvalues in descending order with matching unit eigenvector columns.
#[derive(Clone, Debug)]
pub struct Eigenpairs {
    pub values: Vec<f64>,
    pub vectors: DMatrix<f64>,
}

/// The `k` algebraically largest eigenpairs of `op`.
pub fn top_eigenpairs(
    op: &NormalizedAdjacency,
    k: usize,
    params: &EigenSolverParams,
    rng: &mut StdRng,
) -> Result<Eigenpairs, ClusteringError> {
    let n = op.len();
    if k == 0 || k > n {
        return Err(ClusteringError::TooManyClusters {
            requested: k,
            nodes: n,
        });
    }
    let block = (k + params.block_oversample).min(n);
    if n <= params.dense_limit || 3 * block > n {
        dense_top(op, k)
    } else {
        lobpcg_top(op, k, block, params, rng)
    }
}

fn descending_order(values: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[b].total_cmp(&values[a]));
    order
}

fn dense_top(op: &NormalizedAdjacency, k: usize) -> Result<Eigenpairs, ClusteringError> {
    let eig = SymmetricEigen::try_new(op.to_dense(), f64::EPSILON, 0).ok_or(
        ClusteringError::SolverDidNotConverge {
            iterations: 0,
            residual: f64::INFINITY,
        },
    )?;
    let order = descending_order(eig.eigenvalues.as_slice());
    let keep = &order[..k];
    Ok(Eigenpairs {
        values: keep.iter().map(|&i| eig.eigenvalues[i]).collect(),
        vectors: eig.eigenvectors.select_columns(keep.iter()),
    })
}

/// Rayleigh–Ritz on an orthonormal `basis`: the `p` leading Ritz values and
/// the coefficient matrix (`basis.ncols() × p`) of their Ritz vectors.
fn rayleigh_ritz(
    basis: &DMatrix<f64>,
    a_basis: &DMatrix<f64>,
    p: usize,
) -> Option<(DMatrix<f64>, Vec<f64>)> {
    let h = basis.transpose() * a_basis;
    let h = (&h + h.transpose()) * 0.5;
    let eig = SymmetricEigen::try_new(h, f64::EPSILON, 0)?;
    let order = descending_order(eig.eigenvalues.as_slice());
    let keep = &order[..p];
    Some((
        eig.eigenvectors.select_columns(keep.iter()),
        keep.iter().map(|&i| eig.eigenvalues[i]).collect(),
    ))
}

fn lobpcg_top(
    op: &NormalizedAdjacency,
    k: usize,
    p: usize,
    params: &EigenSolverParams,
    rng: &mut StdRng,
) -> Result<Eigenpairs, ClusteringError> {
    let n = op.len();
    let failed = |iterations: usize, residual: f64| ClusteringError::SolverDidNotConverge {
        iterations,
        residual,
    };

    let start: DMatrix<f64> = DMatrix::from_fn(n, p, |_, _| rng.gen_range(-0.5..0.5));
    let basis = start.qr().q();
    let a_basis = op.apply(&basis);
    let (coeffs, mut theta) =
        rayleigh_ritz(&basis, &a_basis, p).ok_or_else(|| failed(0, f64::INFINITY))?;
    let mut x = &basis * &coeffs;
    let mut ax = &a_basis * &coeffs;
    let mut direction: Option<DMatrix<f64>> = None;
    let mut residual = f64::INFINITY;

    for iter in 1..=params.max_iterations {
        let mut r = ax.clone();
        for j in 0..p {
            r.column_mut(j).axpy(-theta[j], &x.column(j), 1.0);
        }
        residual = (0..k).map(|j| r.column(j).norm()).fold(0.0, f64::max);
        if residual < params.tolerance {
            debug!(
                "lobpcg: n={} block={} converged in {} iterations (residual {:.2e})",
                n, p, iter, residual
            );
            return Ok(Eigenpairs {
                values: theta[..k].to_vec(),
                vectors: x.columns(0, k).into_owned(),
            });
        }

        let blocks = if direction.is_some() { 3 } else { 2 };
        let mut span: DMatrix<f64> = DMatrix::zeros(n, blocks * p);
        span.columns_mut(0, p).copy_from(&x);
        span.columns_mut(p, p).copy_from(&r);
        if let Some(dir) = &direction {
            span.columns_mut(2 * p, p).copy_from(dir);
        }
        let basis = span.qr().q();
        let a_basis = op.apply(&basis);
        let (coeffs, values) =
            rayleigh_ritz(&basis, &a_basis, p).ok_or_else(|| failed(iter, residual))?;

        // Component of the update outside the old Ritz block.
        let m = basis.ncols();
        direction = Some(basis.columns(p, m - p) * coeffs.rows(p, m - p));
        x = &basis * &coeffs;
        ax = &a_basis * &coeffs;
        theta = values;
    }

    debug!(
        "lobpcg: n={} block={} stopped after {} iterations (residual {:.2e})",
        n, p, params.max_iterations, residual
    );
    Err(failed(params.max_iterations, residual))
}
