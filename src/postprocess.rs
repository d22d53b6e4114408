//! Post-processing facade over the individual stages.
//!
//! `PanelPostprocessor` carries the parameters explicitly and exposes the
//! stages as methods plus two whole-image entry points: `process_one` for a
//! single image/mask pair and `process_batch` for a slice of images paired
//! through a `MaskBatch`. Batches are validated up front and, with the
//! `parallel` feature, processed image-per-task.
use crate::azimuth::{estimate_azimuth_detailed, AzimuthEstimate};
use crate::cluster::{cluster, ClusterOutput};
use crate::diagnostics::{LineReport, PanelReport, TimingBreakdown};
use crate::error::{PanelError, Result};
use crate::image::{ImageF32, ImageRgb8, ImageView};
use crate::mask::{threshold_and_crop, CroppedImage, MaskBatch};
use crate::params::PostprocessParams;
use log::debug;
use std::time::Instant;

/// Everything derived from one image and its confidence mask.
#[derive(Clone, Debug)]
pub struct PanelAnalysis {
    pub cropped: CroppedImage,
    pub azimuth: AzimuthEstimate,
    pub clusters: Option<ClusterOutput>,
    pub timings: TimingBreakdown,
}

impl PanelAnalysis {
    pub fn report(&self) -> PanelReport {
        let image = self.cropped.image();
        PanelReport {
            width: image.w,
            height: image.h,
            panel_pixels: self.cropped.mask().count(),
            azimuth: self.azimuth.azimuth,
            resolution: self.azimuth.resolution,
            lines: self
                .azimuth
                .candidates
                .iter()
                .map(|&c| LineReport::new(c, image.w))
                .collect(),
            cluster_sizes: self.clusters.as_ref().map(ClusterOutput::sizes),
            timings: self.timings.clone(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct PanelPostprocessor {
    params: PostprocessParams,
}

impl PanelPostprocessor {
    pub fn new(params: PostprocessParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &PostprocessParams {
        &self.params
    }

    /// Argument checks shared by every entry point.
    fn validate(&self) -> Result<()> {
        let p = &self.params;
        if !p.mask_threshold.is_finite() {
            return Err(PanelError::InputType(format!(
                "mask threshold must be finite, got {}",
                p.mask_threshold
            )));
        }
        if p.number_lines == 0 {
            return Err(PanelError::InputType(
                "number_lines must be at least 1".to_string(),
            ));
        }
        if p.number_clusters == Some(0) {
            return Err(PanelError::InputType(
                "number_clusters must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn threshold_and_crop(&self, image: &ImageRgb8, mask: &ImageF32) -> Result<CroppedImage> {
        threshold_and_crop(image, mask, self.params.mask_threshold)
    }

    pub fn estimate_azimuth(&self, cropped: &CroppedImage) -> Result<AzimuthEstimate> {
        estimate_azimuth_detailed(
            cropped.image(),
            self.params.number_lines,
            &self.params.canny,
            &self.params.hough,
        )
    }

    pub fn cluster(&self, cropped: &CroppedImage, number_clusters: usize) -> Result<ClusterOutput> {
        cluster(
            cropped.image(),
            cropped.mask(),
            number_clusters,
            &self.params.cluster,
        )
    }

    /// Crop, estimate the azimuth and, when `number_clusters` is set,
    /// cluster one image.
    pub fn process_one(&self, image: &ImageRgb8, mask: &ImageF32) -> Result<PanelAnalysis> {
        self.validate()?;
        if image.dims() != mask.dims() {
            return Err(PanelError::shape("process_one", image.dims(), mask.dims()));
        }
        self.run(image, mask)
    }

    /// `process_one` over a batch. The whole batch is validated before any
    /// image is processed; the first failure aborts the batch.
    pub fn process_batch(
        &self,
        images: &[ImageRgb8],
        masks: MaskBatch<'_>,
    ) -> Result<Vec<PanelAnalysis>> {
        self.validate()?;
        masks.validate(images)?;
        let started = Instant::now();

        let pair = |i: usize| {
            masks
                .get(i)
                .ok_or_else(|| PanelError::shape("process_batch", images[i].dims(), (0, 0)))
        };

        #[cfg(feature = "parallel")]
        let results: Result<Vec<PanelAnalysis>> = {
            use rayon::prelude::*;
            images
                .par_iter()
                .enumerate()
                .map(|(i, image)| self.run(image, pair(i)?))
                .collect()
        };
        #[cfg(not(feature = "parallel"))]
        let results: Result<Vec<PanelAnalysis>> = images
            .iter()
            .enumerate()
            .map(|(i, image)| self.run(image, pair(i)?))
            .collect();

        debug!(
            "process_batch: {} images in {:.1} ms",
            images.len(),
            crate::diagnostics::elapsed_ms(started)
        );
        results
    }

    fn run(&self, image: &ImageRgb8, mask: &ImageF32) -> Result<PanelAnalysis> {
        let started = Instant::now();
        let mut timings = TimingBreakdown::default();
        let cropped = timings.time("threshold_and_crop", || self.threshold_and_crop(image, mask))?;
        let azimuth = timings.time("azimuth", || self.estimate_azimuth(&cropped))?;
        let clusters = match self.params.number_clusters {
            Some(k) => Some(timings.time("cluster", || self.cluster(&cropped, k))?),
            None => None,
        };
        timings.finish(started);
        debug!(
            "process_one: {}x{} panel_pixels={} azimuth={} total={:.1} ms",
            image.w,
            image.h,
            cropped.mask().count(),
            azimuth.azimuth,
            timings.total_ms
        );
        Ok(PanelAnalysis {
            cropped,
            azimuth,
            clusters,
            timings,
        })
    }
}
