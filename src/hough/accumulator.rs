//! Straight-line Hough accumulator over (distance, angle).
//!
//! Layout is row-major with distance as rows and angle as columns. Angle
//! column `i` is `-90° + 180°·i / steps`; distance row `r` is `r - offset`
//! with `offset = ceil(sqrt(w² + h²))`, so every line through the image has
//! a bin. Each edge pixel `(x, y)` votes once per angle at
//! `round(x·cosθ + y·sinθ)`.
use crate::angle::axis_angle_deg;
use crate::image::EdgeMap;

#[derive(Clone, Debug)]
pub struct HoughAccumulator {
    votes: Vec<u32>,
    distance_bins: usize,
    angle_steps: usize,
    offset: usize,
    cos_table: Vec<f64>,
    sin_table: Vec<f64>,
}

impl HoughAccumulator {
    /// Empty accumulator sized for a `w × h` edge map.
    pub fn new(w: usize, h: usize, angle_steps: usize) -> Self {
        let offset = ((w * w + h * h) as f64).sqrt().ceil() as usize;
        let distance_bins = 2 * offset + 1;
        let (sin_table, cos_table): (Vec<f64>, Vec<f64>) = (0..angle_steps)
            .map(|i| axis_angle_deg(i, angle_steps).to_radians().sin_cos())
            .unzip();
        Self {
            votes: vec![0; distance_bins * angle_steps],
            distance_bins,
            angle_steps,
            offset,
            cos_table,
            sin_table,
        }
    }

    /// Accumulate votes from every set pixel of `edges`.
    pub fn from_edges(edges: &EdgeMap, angle_steps: usize) -> Self {
        let mut acc = Self::new(edges.w, edges.h, angle_steps);
        let points: Vec<(usize, usize)> = edges.points().collect();
        acc.vote_points(&points);
        acc
    }

    #[cfg(not(feature = "parallel"))]
    fn vote_points(&mut self, points: &[(usize, usize)]) {
        for &(x, y) in points {
            for a in 0..self.angle_steps {
                let r = self.distance_index(x, y, a);
                self.votes[r * self.angle_steps + a] += 1;
            }
        }
    }

    #[cfg(feature = "parallel")]
    fn vote_points(&mut self, points: &[(usize, usize)]) {
        use rayon::prelude::*;

        // One column per angle, filled independently and scattered back.
        let columns: Vec<Vec<u32>> = (0..self.angle_steps)
            .into_par_iter()
            .map(|a| {
                let mut column = vec![0u32; self.distance_bins];
                for &(x, y) in points {
                    column[self.distance_index(x, y, a)] += 1;
                }
                column
            })
            .collect();
        for (a, column) in columns.iter().enumerate() {
            for (r, &v) in column.iter().enumerate() {
                self.votes[r * self.angle_steps + a] = v;
            }
        }
    }

    #[inline]
    fn distance_index(&self, x: usize, y: usize, a: usize) -> usize {
        let rho = x as f64 * self.cos_table[a] + y as f64 * self.sin_table[a];
        let idx = rho.round() as isize + self.offset as isize;
        idx.clamp(0, self.distance_bins as isize - 1) as usize
    }

    #[inline]
    pub fn get(&self, distance_idx: usize, angle_idx: usize) -> u32 {
        self.votes[distance_idx * self.angle_steps + angle_idx]
    }

    pub fn votes(&self) -> &[u32] {
        &self.votes
    }

    pub fn distance_bins(&self) -> usize {
        self.distance_bins
    }

    pub fn angle_steps(&self) -> usize {
        self.angle_steps
    }

    pub fn max_votes(&self) -> u32 {
        self.votes.iter().copied().max().unwrap_or(0)
    }

    /// Angle in degrees of column `angle_idx`.
    pub fn angle_deg(&self, angle_idx: usize) -> f64 {
        axis_angle_deg(angle_idx, self.angle_steps)
    }

    /// Signed distance in pixels of row `distance_idx`.
    pub fn distance(&self, distance_idx: usize) -> f64 {
        distance_idx as f64 - self.offset as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimensions_cover_the_diagonal() {
        let acc = HoughAccumulator::new(3, 4, 360);
        assert_eq!(acc.distance_bins(), 11);
        assert_eq!(acc.distance(0), -5.0);
        assert_eq!(acc.distance(10), 5.0);
        assert_eq!(acc.votes().len(), 11 * 360);
    }

    #[test]
    fn vertical_line_peaks_at_zero_degrees() {
        let edges = EdgeMap::from_fn(20, 20, |x, _| x == 7);
        let acc = HoughAccumulator::from_edges(&edges, 360);
        // theta = 0 -> rho = x
        let a0 = 180;
        assert_eq!(acc.angle_deg(a0), 0.0);
        let r = (7.0 - acc.distance(0)) as usize;
        assert_eq!(acc.get(r, a0), 20);
        assert_eq!(acc.max_votes(), 20);
    }

    #[test]
    fn every_point_votes_once_per_angle() {
        let edges = EdgeMap::from_fn(9, 9, |x, y| x == y);
        let acc = HoughAccumulator::from_edges(&edges, 36);
        let total: u64 = acc.votes().iter().map(|&v| v as u64).sum();
        assert_eq!(total, 9 * 36);
    }
}
