//! Spectral clustering of masked panel pixels.
//!
//! Pipeline per call:
//! 1. Reference channel as `f64` intensities.
//! 2. 4-neighbour pixel graph over the mask, weights `exp(-|Δ| / std) + ε`
//!    (`graph`).
//! 3. `k` leading eigenvectors of `D^-1/2 W D^-1/2` (`eigen`), rescaled by
//!    `D^-1/2` into the spectral embedding.
//! 4. Discretized labels (`discretize`), scattered into a `LabelGrid`.
//! 5. One image per label, zeroed outside that label's pixels.
//!
//! The random draws (eigen-solver start block and discretization restarts)
//! come from a single generator seeded with `ClusterParams::random_seed`, so
//! repeated calls give identical labels.

pub mod discretize;
pub mod eigen;
pub mod graph;

pub use discretize::discretize;
pub use eigen::{top_eigenpairs, Eigenpairs};
pub use graph::{NormalizedAdjacency, PixelGraph};

use crate::error::{ClusteringError, PanelError, Result};
use crate::image::{ensure_same_dims, BinaryMask, ImageRgb8};
use crate::params::ClusterParams;
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

/// Per-pixel cluster labels; unmasked pixels hold `LabelGrid::UNASSIGNED`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LabelGrid {
    pub w: usize,
    pub h: usize,
    pub data: Vec<i32>,
}

impl LabelGrid {
    pub const UNASSIGNED: i32 = -1;

    pub fn unassigned(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            data: vec![Self::UNASSIGNED; w * h],
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> i32 {
        self.data[y * self.w + x]
    }

    /// Number of pixels carrying `label`.
    pub fn count(&self, label: i32) -> usize {
        self.data.iter().filter(|&&l| l == label).count()
    }

    pub fn assigned(&self) -> usize {
        self.data.iter().filter(|&&l| l != Self::UNASSIGNED).count()
    }
}

#[derive(Clone, Debug)]
pub struct ClusterOutput {
    pub labels: LabelGrid,
    /// One image per label `0..k`, zero wherever the label differs.
    pub images: Vec<ImageRgb8>,
}

impl ClusterOutput {
    /// Pixel count per label, indexed by label.
    pub fn sizes(&self) -> Vec<usize> {
        (0..self.images.len())
            .map(|k| self.labels.count(k as i32))
            .collect()
    }
}

/// Partition the masked pixels of `image` into `number_clusters` groups.
///
/// An all-false mask is an error (`ClusteringError::EmptyMask`) rather than
/// a set of empty images.
pub fn cluster(
    image: &ImageRgb8,
    mask: &BinaryMask,
    number_clusters: usize,
    params: &ClusterParams,
) -> Result<ClusterOutput> {
    ensure_same_dims("cluster", image, mask)?;
    if number_clusters == 0 {
        return Err(PanelError::InputType(
            "number_clusters must be at least 1".to_string(),
        ));
    }
    let intensity = image.channel(params.reference_channel)?;
    let nodes = mask.count();
    if nodes == 0 {
        return Err(ClusteringError::EmptyMask.into());
    }
    if number_clusters > nodes {
        return Err(ClusteringError::TooManyClusters {
            requested: number_clusters,
            nodes,
        }
        .into());
    }

    let mut graph = PixelGraph::from_mask(&intensity, mask);
    let node_labels = if number_clusters == 1 {
        vec![0; nodes]
    } else {
        graph.reweight_similarity(params.weight_epsilon);
        spectral_labels(&graph, number_clusters, params)?
    };

    let mut labels = LabelGrid::unassigned(image.w, image.h);
    for (&pixel, &label) in graph.pixels().iter().zip(&node_labels) {
        labels.data[pixel] = label as i32;
    }
    let images = render_clusters(image, &labels, number_clusters);
    let output = ClusterOutput { labels, images };
    debug!(
        "cluster: {} pixels into {} groups, sizes {:?}",
        nodes,
        number_clusters,
        output.sizes()
    );
    Ok(output)
}

fn spectral_labels(
    graph: &PixelGraph,
    k: usize,
    params: &ClusterParams,
) -> std::result::Result<Vec<usize>, ClusteringError> {
    let components = graph.connected_components();
    if components > 1 {
        warn!(
            "cluster: pixel graph is not fully connected ({} components for {} clusters)",
            components, k
        );
    }
    let mut rng = StdRng::seed_from_u64(params.random_seed);
    let op = NormalizedAdjacency::new(graph);
    let pairs = top_eigenpairs(&op, k, &params.solver, &mut rng)?;

    let mut embedding = pairs.vectors;
    for (mut row, &dd) in embedding.row_iter_mut().zip(op.sqrt_degrees()) {
        row /= dd;
    }
    discretize(&embedding, &params.discretize, &mut rng)
}

/// Copies of `image` keeping only the pixels of each label.
pub fn render_clusters(image: &ImageRgb8, labels: &LabelGrid, k: usize) -> Vec<ImageRgb8> {
    (0..k as i32)
        .map(|label| {
            let mut out = image.clone();
            for (px, &l) in out.data.iter_mut().zip(&labels.data) {
                if l != label {
                    *px = [0; 3];
                }
            }
            out
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::EigenSolverParams;

    fn blocks(w: usize, h: usize, rects: &[(usize, usize, usize, usize)]) -> BinaryMask {
        BinaryMask::from_fn(w, h, |x, y| {
            rects
                .iter()
                .any(|&(x0, y0, x1, y1)| x >= x0 && x < x1 && y >= y0 && y < y1)
        })
    }

    fn textured(w: usize, h: usize) -> ImageRgb8 {
        ImageRgb8::from_fn(w, h, |x, y| [40, 80, (100 + (x * 7 + y * 3) % 40) as u8])
    }

    fn assert_partition(out: &ClusterOutput, mask: &BinaryMask) {
        for y in 0..mask.h {
            for x in 0..mask.w {
                let owners = out
                    .images
                    .iter()
                    .filter(|img| img.get(x, y) != [0, 0, 0])
                    .count();
                assert_eq!(owners, usize::from(mask.get(x, y)), "pixel ({x}, {y})");
                assert_eq!(out.labels.get(x, y) >= 0, mask.get(x, y));
            }
        }
    }

    #[test]
    fn disjoint_blocks_form_their_own_clusters() {
        let mask = blocks(24, 24, &[(2, 2, 10, 10), (14, 12, 22, 22)]);
        let img = textured(24, 24);
        let out = cluster(&img, &mask, 2, &ClusterParams::default()).unwrap();
        assert_eq!(out.images.len(), 2);
        assert_partition(&out, &mask);
        let a = out.labels.get(3, 3);
        let b = out.labels.get(15, 15);
        assert_ne!(a, b);
        assert_eq!(out.labels.count(a), 64);
        assert_eq!(out.labels.count(b), 80);
    }

    #[test]
    fn disconnected_mask_with_fewer_clusters_still_partitions() {
        let mask = blocks(30, 12, &[(1, 1, 9, 11), (11, 1, 19, 11), (21, 1, 29, 11)]);
        let graph = PixelGraph::from_mask(&vec![0.0; 30 * 12], &mask);
        assert_eq!(graph.connected_components(), 3);

        let img = textured(30, 12);
        let out = cluster(&img, &mask, 2, &ClusterParams::default()).unwrap();
        assert_partition(&out, &mask);
        assert_eq!(out.sizes().iter().sum::<usize>(), 240);
    }

    #[test]
    fn iterative_solver_separates_three_blocks() {
        let mask = blocks(30, 12, &[(1, 1, 9, 11), (11, 1, 19, 11), (21, 1, 29, 11)]);
        let img = textured(30, 12);
        let params = ClusterParams {
            solver: EigenSolverParams {
                dense_limit: 0,
                ..EigenSolverParams::default()
            },
            ..ClusterParams::default()
        };
        let out = cluster(&img, &mask, 3, &params).unwrap();
        assert_partition(&out, &mask);
        let mut seen: Vec<i32> = [(4, 5), (14, 5), (24, 5)]
            .iter()
            .map(|&(x, y)| out.labels.get(x, y))
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2]);
        assert_eq!(out.sizes(), vec![80, 80, 80]);
    }

    #[test]
    fn intensity_step_splits_a_connected_region() {
        let mask = blocks(16, 12, &[(2, 0, 14, 12)]);
        let img = ImageRgb8::from_fn(16, 12, |x, _| if x < 8 { [0, 0, 200] } else { [0, 0, 20] });
        let out = cluster(&img, &mask, 2, &ClusterParams::default()).unwrap();
        assert_partition(&out, &mask);
        let left = out.labels.get(2, 0);
        let right = out.labels.get(13, 11);
        assert_ne!(left, right);
        for y in 0..12 {
            for x in 2..14 {
                let expected = if x < 8 { left } else { right };
                assert_eq!(out.labels.get(x, y), expected, "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn single_cluster_is_the_masked_image() {
        let mask = blocks(10, 10, &[(1, 1, 6, 6)]);
        let img = textured(10, 10);
        let out = cluster(&img, &mask, 1, &ClusterParams::default()).unwrap();
        assert_eq!(out.images.len(), 1);
        assert_eq!(out.labels.assigned(), 25);
        assert_partition(&out, &mask);
    }

    #[test]
    fn repeated_runs_are_identical() {
        let mask = blocks(20, 20, &[(0, 0, 9, 20), (11, 0, 20, 20)]);
        let img = textured(20, 20);
        let a = cluster(&img, &mask, 2, &ClusterParams::default()).unwrap();
        let b = cluster(&img, &mask, 2, &ClusterParams::default()).unwrap();
        assert_eq!(a.labels, b.labels);
    }

    #[test]
    fn empty_mask_is_a_clustering_error() {
        let err = cluster(
            &textured(8, 8),
            &BinaryMask::new(8, 8),
            2,
            &ClusterParams::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            PanelError::Clustering(ClusteringError::EmptyMask)
        ));
    }

    #[test]
    fn more_clusters_than_pixels_is_rejected() {
        let mask = blocks(8, 8, &[(0, 0, 2, 1)]);
        let err = cluster(&textured(8, 8), &mask, 3, &ClusterParams::default()).unwrap_err();
        assert!(matches!(
            err,
            PanelError::Clustering(ClusteringError::TooManyClusters {
                requested: 3,
                nodes: 2
            })
        ));
    }

    #[test]
    fn invalid_arguments_fail_before_work() {
        let img = textured(8, 8);
        let mask = blocks(8, 8, &[(0, 0, 4, 4)]);
        assert!(matches!(
            cluster(&img, &mask, 0, &ClusterParams::default()),
            Err(PanelError::InputType(_))
        ));
        assert!(matches!(
            cluster(&img, &BinaryMask::new(8, 9), 2, &ClusterParams::default()),
            Err(PanelError::Shape { .. })
        ));
        let params = ClusterParams {
            reference_channel: 3,
            ..ClusterParams::default()
        };
        assert!(matches!(
            cluster(&img, &mask, 2, &params),
            Err(PanelError::InputType(_))
        ));
    }
}
