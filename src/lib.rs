#![doc = include_str!("../README.md")]

// Stage modules, leaves first.
pub mod mask;
pub mod edges;
pub mod hough;
pub mod azimuth;
pub mod cluster;

// Shared types and the post-processing surface.
pub mod angle;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod image;
pub mod metrics;
pub mod params;
pub mod postprocess;
pub mod segmenter;
pub mod types;

// --- High-level re-exports -------------------------------------------------

pub use crate::azimuth::{estimate_azimuth, AzimuthEstimate, Resolution};
pub use crate::cluster::{cluster, ClusterOutput, LabelGrid};
pub use crate::error::{ClusteringError, PanelError, Result};
pub use crate::mask::{threshold_and_crop, CroppedImage, MaskBatch};
pub use crate::params::PostprocessParams;
pub use crate::postprocess::{PanelAnalysis, PanelPostprocessor};
pub use crate::segmenter::{ModelSelection, PanelPipeline, Segmenter};
pub use crate::types::{Azimuth, LineCandidate, PanelProbability};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use panel_segmentation::prelude::*;
///
/// # fn main() -> panel_segmentation::Result<()> {
/// let image = ImageRgb8::from_fn(640, 640, |x, _| if x < 320 { [200, 200, 200] } else { [0, 0, 0] });
/// let mask = ImageF32::from_fn(640, 640, |x, _| if x < 320 { 1.0 } else { 0.0 });
///
/// let post = PanelPostprocessor::new(PostprocessParams {
///     number_clusters: Some(2),
///     ..Default::default()
/// });
/// let analysis = post.process_one(&image, &mask)?;
/// println!("azimuth={}", analysis.azimuth.azimuth);
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::image::{BinaryMask, ImageF32, ImageRgb8};
    pub use crate::{
        Azimuth, CroppedImage, MaskBatch, PanelPostprocessor, PostprocessParams,
    };
}
