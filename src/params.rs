//! Parameter types configuring the post-processing stages.
//!
//! Every knob has the value the panel pipeline was tuned with as its default,
//! so `PostprocessParams::default()` reproduces the reference behaviour. All
//! structs deserialize from partial JSON (`#[serde(default)]`).

use serde::{Deserialize, Serialize};

/// Pipeline-wide parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PostprocessParams {
    /// Confidence at or above which a mask pixel counts as panel.
    pub mask_threshold: f32,
    /// Number of Hough peaks examined when voting on the azimuth.
    pub number_lines: usize,
    /// Cluster count used by `process_one`; `None` skips clustering.
    pub number_clusters: Option<usize>,
    pub canny: CannyParams,
    pub hough: HoughParams,
    pub cluster: ClusterParams,
}

impl Default for PostprocessParams {
    fn default() -> Self {
        Self {
            mask_threshold: 0.9,
            number_lines: 10,
            number_clusters: None,
            canny: CannyParams::default(),
            hough: HoughParams::default(),
            cluster: ClusterParams::default(),
        }
    }
}

/// Dual-threshold edge operator on the 0–255 luma scale (3×3 Sobel aperture).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CannyParams {
    pub low_threshold: f32,
    pub high_threshold: f32,
}

impl Default for CannyParams {
    fn default() -> Self {
        Self {
            low_threshold: 50.0,
            high_threshold: 150.0,
        }
    }
}

/// Line accumulator and peak search.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct HoughParams {
    /// Angle steps spanning [-90°, 90°).
    pub angle_steps: usize,
    /// Half-size of the peak suppression window along the distance axis (bins).
    pub min_distance: usize,
    /// Half-size of the peak suppression window along the angle axis (bins).
    pub min_angle: usize,
    /// Peaks below `threshold_ratio × max(accumulator)` are discarded.
    pub threshold_ratio: f32,
}

impl Default for HoughParams {
    fn default() -> Self {
        Self {
            angle_steps: 360,
            min_distance: 9,
            min_angle: 10,
            threshold_ratio: 0.25,
        }
    }
}

/// Spectral clustering of the masked pixel graph.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterParams {
    /// Channel whose intensity drives the edge weights.
    pub reference_channel: usize,
    /// Added to every similarity weight so no edge vanishes.
    pub weight_epsilon: f64,
    /// Seed for the eigen-solver start block and discretization restarts.
    pub random_seed: u64,
    pub solver: EigenSolverParams,
    pub discretize: DiscretizeParams,
}

impl Default for ClusterParams {
    fn default() -> Self {
        Self {
            reference_channel: 2,
            weight_epsilon: 1e-3,
            random_seed: 0,
            solver: EigenSolverParams::default(),
            discretize: DiscretizeParams::default(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct EigenSolverParams {
    /// Graphs with at most this many nodes use a dense symmetric eigensolver.
    pub dense_limit: usize,
    /// Extra block vectors carried by LOBPCG beyond the requested count.
    pub block_oversample: usize,
    pub max_iterations: usize,
    /// Convergence bound on the largest residual norm of the wanted pairs.
    pub tolerance: f64,
}

impl Default for EigenSolverParams {
    fn default() -> Self {
        Self {
            dense_limit: 400,
            block_oversample: 2,
            max_iterations: 2000,
            tolerance: 1e-5,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscretizeParams {
    pub max_svd_restarts: usize,
    pub max_iterations: usize,
}

impl Default for DiscretizeParams {
    fn default() -> Self {
        Self {
            max_svd_restarts: 30,
            max_iterations: 20,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let params: PostprocessParams =
            serde_json::from_str(r#"{ "hough": { "min_angle": 4 }, "number_clusters": 3 }"#)
                .expect("valid params");
        assert_eq!(params.hough.min_angle, 4);
        assert_eq!(params.hough.angle_steps, 360);
        assert_eq!(params.number_clusters, Some(3));
        assert!((params.mask_threshold - 0.9).abs() < f32::EPSILON);
        assert_eq!(params.cluster.reference_channel, 2);
    }
}
