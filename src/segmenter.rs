//! Seam for the segmentation and classification model.
//!
//! The network itself lives outside this crate. A `Segmenter` predicts a
//! per-pixel panel confidence mask and a panel/no-panel probability pair;
//! `PanelPipeline` chains classification, segmentation and post-processing
//! for one image.
use crate::error::{PanelError, Result};
use crate::image::{ImageF32, ImageRgb8, ImageView};
use crate::postprocess::{PanelAnalysis, PanelPostprocessor};
use crate::types::PanelProbability;
use log::debug;

pub trait Segmenter: Send + Sync {
    /// Panel confidence in [0,1] for every pixel of `image`.
    fn predict_mask(&self, image: &ImageRgb8) -> Result<ImageF32>;

    /// Probability that `image` contains panels at all.
    fn classify(&self, image: &ImageRgb8) -> Result<PanelProbability>;
}

/// Which model a pipeline call uses.
#[derive(Clone, Copy)]
pub enum ModelSelection<'a> {
    /// The model the pipeline was built with.
    UseDefault,
    /// Another model for this call only.
    UseOverride(&'a dyn Segmenter),
}

pub struct PanelPipeline<S: Segmenter> {
    default_model: S,
    postprocessor: PanelPostprocessor,
}

impl<S: Segmenter> PanelPipeline<S> {
    pub fn new(default_model: S, postprocessor: PanelPostprocessor) -> Self {
        Self {
            default_model,
            postprocessor,
        }
    }

    pub fn postprocessor(&self) -> &PanelPostprocessor {
        &self.postprocessor
    }

    fn model<'a>(&'a self, selection: ModelSelection<'a>) -> &'a dyn Segmenter {
        match selection {
            ModelSelection::UseDefault => &self.default_model,
            ModelSelection::UseOverride(model) => model,
        }
    }

    /// Classify `image`; when panels are present, segment and post-process
    /// it. `Ok(None)` means the classifier found no panels.
    pub fn analyze(
        &self,
        image: &ImageRgb8,
        selection: ModelSelection<'_>,
    ) -> Result<Option<PanelAnalysis>> {
        let model = self.model(selection);
        let probability = model.classify(image)?;
        if !probability.has_panels() {
            debug!(
                "pipeline: no panels (p_panel={:.3}, p_none={:.3})",
                probability.panel, probability.no_panel
            );
            return Ok(None);
        }
        let mask = model.predict_mask(image)?;
        if mask.dims() != image.dims() {
            return Err(PanelError::shape("segmenter output", image.dims(), mask.dims()));
        }
        self.postprocessor.process_one(image, &mask).map(Some)
    }
}
