//! Dual-threshold (Canny) edge operator.
//!
//! Sobel gradients → direction-aligned non-maximum suppression → hysteresis.
//! Weak pixels survive only when 8-connected to a strong pixel, so the sharp
//! silhouette of a cropped panel survives while isolated texture responses
//! are dropped.
use crate::edges::grad::sobel_gradients;
use crate::edges::nms::{suppress_non_maxima, EdgeStrength};
use crate::image::{EdgeMap, ImageF32, ImageRgb8};
use crate::params::CannyParams;
use log::debug;

/// Run the Canny operator on a single-channel intensity image (0–255 scale).
pub fn canny(l: &ImageF32, params: &CannyParams) -> EdgeMap {
    let (low, high) = if params.low_threshold <= params.high_threshold {
        (params.low_threshold, params.high_threshold)
    } else {
        (params.high_threshold, params.low_threshold)
    };
    let grad = sobel_gradients(l);
    let (classes, strong) = suppress_non_maxima(&grad, low, high);
    let edges = hysteresis(l.w, l.h, &classes);
    debug!(
        "canny: {}x{} strong={} edges={}",
        l.w,
        l.h,
        strong,
        edges.count()
    );
    edges
}

/// Canny on the luma of an RGB image.
pub fn canny_rgb(image: &ImageRgb8, params: &CannyParams) -> EdgeMap {
    canny(&image.luma(), params)
}

fn hysteresis(w: usize, h: usize, classes: &[EdgeStrength]) -> EdgeMap {
    let mut edges = EdgeMap::new(w, h);
    let mut stack: Vec<usize> = classes
        .iter()
        .enumerate()
        .filter(|(_, c)| **c == EdgeStrength::Strong)
        .map(|(i, _)| i)
        .collect();
    for &i in &stack {
        edges.data[i] = true;
    }

    while let Some(i) = stack.pop() {
        let x = i % w;
        let y = i / w;
        for ny in y.saturating_sub(1)..=(y + 1).min(h - 1) {
            for nx in x.saturating_sub(1)..=(x + 1).min(w - 1) {
                let j = ny * w + nx;
                if !edges.data[j] && classes[j] == EdgeStrength::Weak {
                    edges.data[j] = true;
                    stack.push(j);
                }
            }
        }
    }
    edges
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weak_pixels_need_a_strong_neighbour() {
        // Row 0: strong, weak, weak chain; row 2: isolated weak.
        let w = 5;
        let h = 3;
        let mut classes = vec![EdgeStrength::None; w * h];
        classes[0] = EdgeStrength::Strong;
        classes[1] = EdgeStrength::Weak;
        classes[w + 2] = EdgeStrength::Weak;
        classes[2 * w + 4] = EdgeStrength::Weak;
        let edges = hysteresis(w, h, &classes);
        assert!(edges.get(0, 0));
        assert!(edges.get(1, 0));
        assert!(edges.get(2, 1));
        assert!(!edges.get(4, 2));
    }

    #[test]
    fn filled_square_yields_closed_outline() {
        let img = ImageRgb8::from_fn(40, 40, |x, y| {
            if (10..30).contains(&x) && (10..30).contains(&y) {
                [200, 180, 160]
            } else {
                [0, 0, 0]
            }
        });
        let edges = canny_rgb(&img, &CannyParams::default());
        assert!(edges.count() > 60, "edges={}", edges.count());
        // Nothing far from the silhouette.
        assert!(!edges.get(20, 20));
        assert!(!edges.get(2, 2));
    }

    #[test]
    fn black_image_has_no_edges() {
        let edges = canny_rgb(&ImageRgb8::new(32, 32), &CannyParams::default());
        assert_eq!(edges.count(), 0);
    }
}
