//! Mask thresholding and panel cropping.
//!
//! A confidence mask becomes binary by `value >= threshold`; the crop keeps
//! panel pixels untouched and zeroes every channel elsewhere. Both steps
//! allocate new buffers.
use crate::error::{PanelError, Result};
use crate::image::{ensure_same_dims, BinaryMask, ImageF32, ImageRgb8, ImageView};

/// Image restricted to its panel mask. Pixels outside `mask` are `[0, 0, 0]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CroppedImage {
    image: ImageRgb8,
    mask: BinaryMask,
}

impl CroppedImage {
    pub fn image(&self) -> &ImageRgb8 {
        &self.image
    }

    pub fn mask(&self) -> &BinaryMask {
        &self.mask
    }

    pub fn into_parts(self) -> (ImageRgb8, BinaryMask) {
        (self.image, self.mask)
    }
}

/// How masks pair with the images of a batch.
#[derive(Clone, Copy, Debug)]
pub enum MaskBatch<'a> {
    /// One mask applied to every image.
    Shared(&'a ImageF32),
    /// One mask per image, in the same order.
    PerImage(&'a [ImageF32]),
}

impl<'a> MaskBatch<'a> {
    /// Mask belonging to image `index`.
    pub fn get(&self, index: usize) -> Option<&'a ImageF32> {
        match *self {
            MaskBatch::Shared(mask) => Some(mask),
            MaskBatch::PerImage(masks) => masks.get(index),
        }
    }

    /// Check the pairing against `images` before any work is done.
    pub fn validate(&self, images: &[ImageRgb8]) -> Result<()> {
        if let MaskBatch::PerImage(masks) = self {
            if masks.len() != images.len() {
                return Err(PanelError::shape(
                    "mask batch",
                    (images.len(), 1),
                    (masks.len(), 1),
                ));
            }
        }
        for (i, image) in images.iter().enumerate() {
            if let Some(mask) = self.get(i) {
                ensure_same_dims("mask batch", image, mask)?;
            }
        }
        Ok(())
    }
}

/// Zero every pixel of `image` outside `mask`.
pub fn crop(image: &ImageRgb8, mask: &BinaryMask) -> Result<CroppedImage> {
    ensure_same_dims("crop", image, mask)?;
    let mut out = image.clone();
    for (px, &keep) in out.data.iter_mut().zip(&mask.data) {
        if !keep {
            *px = [0; 3];
        }
    }
    Ok(CroppedImage {
        image: out,
        mask: mask.clone(),
    })
}

/// Binarize `mask` at `threshold` and crop `image` with the result.
pub fn threshold_and_crop(
    image: &ImageRgb8,
    mask: &ImageF32,
    threshold: f32,
) -> Result<CroppedImage> {
    if mask.dims() != image.dims() {
        return Err(PanelError::shape("threshold_and_crop", image.dims(), mask.dims()));
    }
    let binary = BinaryMask::from_probabilities(mask, threshold)?;
    crop(image, &binary)
}

/// `threshold_and_crop` for every image of a batch. Pairing and shapes are
/// validated for the whole batch first.
pub fn threshold_and_crop_batch(
    images: &[ImageRgb8],
    masks: MaskBatch<'_>,
    threshold: f32,
) -> Result<Vec<CroppedImage>> {
    masks.validate(images)?;
    images
        .iter()
        .enumerate()
        .map(|(i, image)| {
            let mask = masks
                .get(i)
                .ok_or_else(|| PanelError::shape("mask batch", image.dims(), (0, 0)))?;
            threshold_and_crop(image, mask, threshold)
        })
        .collect()
}
