//! Non‑maximum suppression on gradient magnitude with direction alignment.
//!
//! For each pixel the gradient direction is quantized into four sectors
//! (0°, 45°, 90°, 135°) and the magnitude is compared against the two
//! neighbours along that direction. A pixel survives when it is strictly
//! greater than the first neighbour and not smaller than the second, so a
//! two-pixel-wide plateau on a sharp step keeps exactly one side.
//!
//! Survivors are classified against the dual thresholds of the Canny
//! operator. The outermost 1‑pixel frame is never an edge.
use crate::edges::grad::Grad;
use crate::image::ImageView;

const TAN_22_5_DEG: f32 = 0.41421356237;

/// Classification of a pixel after suppression.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeStrength {
    None,
    /// Above the low threshold, kept only if connected to a strong pixel.
    Weak,
    /// Above the high threshold.
    Strong,
}

/// Suppress non-maxima and classify survivors. Returns one entry per pixel
/// (row-major) plus the number of strong pixels.
pub fn suppress_non_maxima(grad: &Grad, low: f32, high: f32) -> (Vec<EdgeStrength>, usize) {
    let w = grad.gx.w;
    let h = grad.gx.h;
    let mut classes = vec![EdgeStrength::None; w * h];
    if w < 3 || h < 3 {
        return (classes, 0);
    }

    let mut strong = 0usize;
    for y in 1..h - 1 {
        let mag_prev = grad.mag.row(y - 1);
        let mag_row = grad.mag.row(y);
        let mag_next = grad.mag.row(y + 1);
        let gx_row = grad.gx.row(y);
        let gy_row = grad.gy.row(y);

        for x in 1..w - 1 {
            let mag = mag_row[x];
            if mag <= low {
                continue;
            }

            let gx = gx_row[x];
            let gy = gy_row[x];
            let abs_gx = gx.abs();
            let abs_gy = gy.abs();
            // Same sign: the gradient points along the (+x, +y) diagonal.
            let same_sign = (gx >= 0.0 && gy >= 0.0) || (gx <= 0.0 && gy <= 0.0);

            let (neighbor1, neighbor2) = if abs_gy <= abs_gx * TAN_22_5_DEG {
                (mag_row[x - 1], mag_row[x + 1])
            } else if abs_gx <= abs_gy * TAN_22_5_DEG {
                (mag_prev[x], mag_next[x])
            } else if same_sign {
                (mag_prev[x - 1], mag_next[x + 1])
            } else {
                (mag_prev[x + 1], mag_next[x - 1])
            };

            if mag <= neighbor1 || mag < neighbor2 {
                continue;
            }

            let idx = y * w + x;
            if mag > high {
                classes[idx] = EdgeStrength::Strong;
                strong += 1;
            } else {
                classes[idx] = EdgeStrength::Weak;
            }
        }
    }

    (classes, strong)
}
