//! Overlap metrics between predicted and ground-truth masks.
use crate::error::{PanelError, Result};
use crate::image::{ImageF32, ImageView};

/// Smoothed Sørensen–Dice coefficient of two masks with values in [0,1]:
/// `(2·Σ t·p + smooth) / (Σ t + Σ p + smooth)`.
///
/// `smooth` keeps the ratio defined for two empty masks (which score 1).
pub fn dice_coefficient(truth: &ImageF32, pred: &ImageF32, smooth: f64) -> Result<f64> {
    if truth.dims() != pred.dims() {
        return Err(PanelError::shape("dice_coefficient", truth.dims(), pred.dims()));
    }
    if !(smooth.is_finite() && smooth >= 0.0) {
        return Err(PanelError::InputType(format!(
            "dice smoothing must be a non-negative number, got {smooth}"
        )));
    }
    let (mut intersection, mut total) = (0.0f64, 0.0f64);
    for (t, p) in truth.rows().zip(pred.rows()) {
        for (&a, &b) in t.iter().zip(p) {
            intersection += a as f64 * b as f64;
            total += a as f64 + b as f64;
        }
    }
    let denom = total + smooth;
    if denom == 0.0 {
        return Err(PanelError::InputType(
            "dice coefficient of two empty masks needs a positive smoothing term".to_string(),
        ));
    }
    Ok((2.0 * intersection + smooth) / denom)
}

/// Mean Dice coefficient over paired masks.
pub fn mean_dice_coefficient(truth: &[ImageF32], pred: &[ImageF32], smooth: f64) -> Result<f64> {
    if truth.len() != pred.len() || truth.is_empty() {
        return Err(PanelError::shape(
            "mean_dice_coefficient",
            (truth.len(), 1),
            (pred.len(), 1),
        ));
    }
    let mut sum = 0.0;
    for (t, p) in truth.iter().zip(pred) {
        sum += dice_coefficient(t, p, smooth)?;
    }
    Ok(sum / truth.len() as f64)
}

/// `1 - dice`, with the smoothing term of 1 used during training.
pub fn dice_loss(truth: &ImageF32, pred: &ImageF32) -> Result<f64> {
    Ok(1.0 - dice_coefficient(truth, pred, 1.0)?)
}
