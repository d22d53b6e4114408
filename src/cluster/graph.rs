//! Pixel adjacency graph restricted to a mask.
//!
//! Nodes are masked pixels in row-major order. Edges join 4-neighbours that
//! are both masked and are stored in CSR form (both directions), initially
//! weighted by the absolute intensity difference of their endpoints.
use crate::image::BinaryMask;
use nalgebra::DMatrix;

#[derive(Clone, Debug)]
pub struct PixelGraph {
    width: usize,
    height: usize,
    /// Pixel index (`y * width + x`) of each node.
    pixels: Vec<usize>,
    offsets: Vec<usize>,
    neighbors: Vec<usize>,
    weights: Vec<f64>,
}

impl PixelGraph {
    /// Build the graph of `mask` with intensity-difference weights.
    ///
    /// `intensity` is row-major with one value per pixel of the mask.
    pub fn from_mask(intensity: &[f64], mask: &BinaryMask) -> Self {
        let (w, h) = (mask.w, mask.h);
        debug_assert_eq!(intensity.len(), w * h);

        let mut node_of = vec![usize::MAX; w * h];
        let mut pixels = Vec::with_capacity(mask.count());
        for (x, y) in mask.points() {
            node_of[y * w + x] = pixels.len();
            pixels.push(y * w + x);
        }

        let mut offsets = Vec::with_capacity(pixels.len() + 1);
        let mut neighbors = Vec::with_capacity(pixels.len() * 4);
        let mut weights = Vec::with_capacity(pixels.len() * 4);
        offsets.push(0);
        for &p in &pixels {
            let (x, y) = (p % w, p / w);
            // Ascending pixel order: up, left, right, down.
            let mut candidates = [None; 4];
            if y > 0 {
                candidates[0] = Some(p - w);
            }
            if x > 0 {
                candidates[1] = Some(p - 1);
            }
            if x + 1 < w {
                candidates[2] = Some(p + 1);
            }
            if y + 1 < h {
                candidates[3] = Some(p + w);
            }
            for q in candidates.into_iter().flatten() {
                let node = node_of[q];
                if node != usize::MAX {
                    neighbors.push(node);
                    weights.push((intensity[p] - intensity[q]).abs());
                }
            }
            offsets.push(neighbors.len());
        }

        Self {
            width: w,
            height: h,
            pixels,
            offsets,
            neighbors,
            weights,
        }
    }

    pub fn node_count(&self) -> usize {
        self.pixels.len()
    }

    /// Stored (directed) edge entries; each undirected edge counts twice.
    pub fn edge_entries(&self) -> usize {
        self.neighbors.len()
    }

    pub fn pixels(&self) -> &[usize] {
        &self.pixels
    }

    pub fn dims(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// `(neighbor, weight)` pairs of `node`.
    pub fn edges_of(&self, node: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let range = self.offsets[node]..self.offsets[node + 1];
        self.neighbors[range.clone()]
            .iter()
            .copied()
            .zip(self.weights[range].iter().copied())
    }

    /// Turn distances into similarities: `exp(-d / std(d)) + eps`.
    ///
    /// The standard deviation is the population one over every stored entry.
    /// A zero (or undefined) spread means every difference is equal, and all
    /// weights become `1 + eps`.
    pub fn reweight_similarity(&mut self, eps: f64) {
        let n = self.weights.len();
        if n == 0 {
            return;
        }
        let mean = self.weights.iter().sum::<f64>() / n as f64;
        let var = self.weights.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / n as f64;
        let std = var.sqrt();
        for wgt in &mut self.weights {
            let scaled = if std > 0.0 { *wgt / std } else { 0.0 };
            *wgt = (-scaled).exp() + eps;
        }
    }

    pub fn degrees(&self) -> Vec<f64> {
        (0..self.node_count())
            .map(|i| self.edges_of(i).map(|(_, w)| w).sum())
            .collect()
    }

    /// Number of connected components (isolated nodes count individually).
    pub fn connected_components(&self) -> usize {
        let n = self.node_count();
        let mut seen = vec![false; n];
        let mut stack = Vec::new();
        let mut components = 0;
        for start in 0..n {
            if seen[start] {
                continue;
            }
            components += 1;
            seen[start] = true;
            stack.push(start);
            while let Some(i) = stack.pop() {
                for &j in &self.neighbors[self.offsets[i]..self.offsets[i + 1]] {
                    if !seen[j] {
                        seen[j] = true;
                        stack.push(j);
                    }
                }
            }
        }
        components
    }
}

/// Symmetric normalized adjacency `D^-1/2 W D^-1/2` of a `PixelGraph`.
///
/// Its top eigenvectors are the bottom eigenvectors of the normalized
/// Laplacian. Isolated nodes carry a unit self-loop, matching a Laplacian
/// whose isolated rows are zero.
#[derive(Clone, Debug)]
pub struct NormalizedAdjacency {
    offsets: Vec<usize>,
    neighbors: Vec<usize>,
    values: Vec<f64>,
    self_loops: Vec<f64>,
    sqrt_degrees: Vec<f64>,
}

impl NormalizedAdjacency {
    pub fn new(graph: &PixelGraph) -> Self {
        let degrees = graph.degrees();
        let sqrt_degrees: Vec<f64> = degrees
            .iter()
            .map(|&d| if d > 0.0 { d.sqrt() } else { 1.0 })
            .collect();
        let self_loops = degrees
            .iter()
            .map(|&d| if d > 0.0 { 0.0 } else { 1.0 })
            .collect();
        let mut values = Vec::with_capacity(graph.edge_entries());
        for i in 0..graph.node_count() {
            for (j, w) in graph.edges_of(i) {
                values.push(w / (sqrt_degrees[i] * sqrt_degrees[j]));
            }
        }
        Self {
            offsets: graph.offsets.clone(),
            neighbors: graph.neighbors.clone(),
            values,
            self_loops,
            sqrt_degrees,
        }
    }

    pub fn len(&self) -> usize {
        self.self_loops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.self_loops.is_empty()
    }

    /// `sqrt(degree)` per node, 1 for isolated nodes.
    pub fn sqrt_degrees(&self) -> &[f64] {
        &self.sqrt_degrees
    }

    fn apply_column(&self, x: &[f64], y: &mut [f64]) {
        for (i, out) in y.iter_mut().enumerate() {
            let mut acc = self.self_loops[i] * x[i];
            for k in self.offsets[i]..self.offsets[i + 1] {
                acc += self.values[k] * x[self.neighbors[k]];
            }
            *out = acc;
        }
    }

    /// `A · X` for a block of column vectors.
    pub fn apply(&self, x: &DMatrix<f64>) -> DMatrix<f64> {
        let n = self.len();
        let mut out = DMatrix::zeros(n, x.ncols());
        if n == 0 {
            return out;
        }
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            out.as_mut_slice()
                .par_chunks_mut(n)
                .zip(x.as_slice().par_chunks(n))
                .for_each(|(y, col)| self.apply_column(col, y));
        }
        #[cfg(not(feature = "parallel"))]
        {
            for (y, col) in out.as_mut_slice().chunks_mut(n).zip(x.as_slice().chunks(n)) {
                self.apply_column(col, y);
            }
        }
        out
    }

    pub fn to_dense(&self) -> DMatrix<f64> {
        let n = self.len();
        let mut m = DMatrix::zeros(n, n);
        for i in 0..n {
            m[(i, i)] = self.self_loops[i];
            for k in self.offsets[i]..self.offsets[i + 1] {
                m[(i, self.neighbors[k])] += self.values[k];
            }
        }
        m
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_by_two() -> (Vec<f64>, BinaryMask) {
        // Intensities 0 1 / 4 9, all masked.
        (vec![0.0, 1.0, 4.0, 9.0], BinaryMask::from_fn(2, 2, |_, _| true))
    }

    #[test]
    fn edges_follow_four_neighbourhood() {
        let (intensity, mask) = two_by_two();
        let graph = PixelGraph::from_mask(&intensity, &mask);
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_entries(), 8);
        let edges: Vec<_> = graph.edges_of(0).collect();
        assert_eq!(edges, vec![(1, 1.0), (2, 4.0)]);
        let edges: Vec<_> = graph.edges_of(3).collect();
        assert_eq!(edges, vec![(1, 8.0), (2, 5.0)]);
    }

    #[test]
    fn unmasked_pixels_are_not_nodes() {
        let intensity = vec![0.0; 9];
        let mask = BinaryMask::from_fn(3, 3, |x, y| x != 1 || y == 0);
        let graph = PixelGraph::from_mask(&intensity, &mask);
        assert_eq!(graph.node_count(), 7);
        assert_eq!(graph.pixels(), &[0, 1, 2, 3, 5, 6, 8]);
        assert_eq!(graph.connected_components(), 1);
    }

    #[test]
    fn similarity_is_decreasing_in_difference() {
        let (intensity, mask) = two_by_two();
        let mut graph = PixelGraph::from_mask(&intensity, &mask);
        graph.reweight_similarity(1e-3);
        let w01 = graph.edges_of(0).next().unwrap().1;
        let w02 = graph.edges_of(0).nth(1).unwrap().1;
        assert!(w01 > w02);
        assert!(graph.weights().iter().all(|&w| w > 1e-3 && w <= 1.0 + 1e-3));
    }

    #[test]
    fn uniform_intensity_gives_unit_weights() {
        let mask = BinaryMask::from_fn(3, 3, |_, _| true);
        let mut graph = PixelGraph::from_mask(&[7.0; 9], &mask);
        graph.reweight_similarity(1e-3);
        assert!(graph.weights().iter().all(|&w| (w - 1.001).abs() < 1e-12));
    }

    #[test]
    fn normalized_adjacency_has_unit_top_eigenvalue() {
        let (intensity, mask) = two_by_two();
        let mut graph = PixelGraph::from_mask(&intensity, &mask);
        graph.reweight_similarity(1e-3);
        let op = NormalizedAdjacency::new(&graph);
        // D^1/2 * 1 is an eigenvector with eigenvalue 1.
        let v = DMatrix::from_column_slice(4, 1, op.sqrt_degrees());
        let av = op.apply(&v);
        assert!((&av - &v).norm() < 1e-12);
        let dense = op.to_dense();
        assert!((&dense - dense.transpose()).norm() < 1e-12);
    }

    #[test]
    fn isolated_pixels_get_a_self_loop() {
        let mask = BinaryMask::from_fn(3, 1, |x, _| x != 1);
        let graph = PixelGraph::from_mask(&[1.0, 2.0, 3.0], &mask);
        assert_eq!(graph.connected_components(), 2);
        let op = NormalizedAdjacency::new(&graph);
        let dense = op.to_dense();
        assert_eq!(dense, DMatrix::identity(2, 2));
    }
}
