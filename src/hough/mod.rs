//! Edge-based line search over a cropped panel image.
//!
//! `LineSearch` owns the Canny edge map and the Hough accumulator built from
//! it, so callers can query the peaks more than once (the azimuth resolver
//! asks for the `number_lines` strongest peaks and, on a flat vote, for the
//! single strongest one) without redoing the transform.

pub mod accumulator;
pub mod peaks;

pub use accumulator::HoughAccumulator;
pub use peaks::find_peaks;

use crate::edges::canny_rgb;
use crate::error::{PanelError, Result};
use crate::image::{EdgeMap, ImageRgb8};
use crate::params::{CannyParams, HoughParams};
use crate::types::LineCandidate;
use log::debug;

#[derive(Clone, Debug)]
pub struct LineSearch {
    edges: EdgeMap,
    accumulator: HoughAccumulator,
    params: HoughParams,
}

impl LineSearch {
    /// Build the accumulator from an existing edge map.
    pub fn from_edges(edges: EdgeMap, params: &HoughParams) -> Result<Self> {
        if params.angle_steps == 0 {
            return Err(PanelError::InputType(
                "line search needs at least one angle step".to_string(),
            ));
        }
        if !(params.threshold_ratio.is_finite() && params.threshold_ratio >= 0.0) {
            return Err(PanelError::InputType(format!(
                "peak threshold ratio must be a non-negative number, got {}",
                params.threshold_ratio
            )));
        }
        let accumulator = HoughAccumulator::from_edges(&edges, params.angle_steps);
        debug!(
            "line search: {}x{} edges={} max_votes={}",
            edges.w,
            edges.h,
            edges.count(),
            accumulator.max_votes()
        );
        Ok(Self {
            edges,
            accumulator,
            params: params.clone(),
        })
    }

    /// Run the edge operator on `image` and build the accumulator.
    pub fn from_image(image: &ImageRgb8, canny: &CannyParams, hough: &HoughParams) -> Result<Self> {
        Self::from_edges(canny_rgb(image, canny), hough)
    }

    /// The `num_peaks` strongest line candidates, descending by votes.
    pub fn peaks(&self, num_peaks: usize) -> Vec<LineCandidate> {
        find_peaks(&self.accumulator, &self.params, num_peaks)
    }

    pub fn edges(&self) -> &EdgeMap {
        &self.edges
    }

    pub fn accumulator(&self) -> &HoughAccumulator {
        &self.accumulator
    }
}

/// Up to `number_lines` line candidates for one cropped image. An image
/// without edges yields an empty list.
pub fn extract_line_candidates(
    image: &ImageRgb8,
    number_lines: usize,
    canny: &CannyParams,
    hough: &HoughParams,
) -> Result<Vec<LineCandidate>> {
    if number_lines == 0 {
        return Err(PanelError::InputType(
            "number_lines must be at least 1".to_string(),
        ));
    }
    Ok(LineSearch::from_image(image, canny, hough)?.peaks(number_lines))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_lines_is_rejected() {
        let img = ImageRgb8::new(8, 8);
        let err = extract_line_candidates(&img, 0, &CannyParams::default(), &HoughParams::default())
            .unwrap_err();
        assert!(matches!(err, PanelError::InputType(_)));
    }

    #[test]
    fn black_image_yields_no_candidates() {
        let img = ImageRgb8::new(32, 32);
        let lines =
            extract_line_candidates(&img, 10, &CannyParams::default(), &HoughParams::default())
                .unwrap();
        assert!(lines.is_empty());
    }

    #[test]
    fn rectangle_outline_yields_both_orientations() {
        let img = ImageRgb8::from_fn(96, 96, |x, y| {
            if (20..76).contains(&x) && (30..60).contains(&y) {
                [220, 220, 220]
            } else {
                [0, 0, 0]
            }
        });
        let search =
            LineSearch::from_image(&img, &CannyParams::default(), &HoughParams::default()).unwrap();
        let lines = search.peaks(10);
        assert!(!lines.is_empty());
        assert!(lines.windows(2).all(|w| w[0].votes >= w[1].votes));
        // A 30 px edge ties over a few neighbouring angle bins, so its peak
        // may land up to three bins from 0°.
        let has_vertical = lines.iter().any(|l| l.angle_deg.abs() <= 1.5);
        let has_horizontal = lines.iter().any(|l| l.angle_deg < -89.0 || l.angle_deg > 89.0);
        assert!(has_vertical && has_horizontal, "lines={lines:?}");
        assert_eq!(search.peaks(1), lines[..1].to_vec());
    }

    #[test]
    fn long_vertical_edge_peaks_at_zero_degrees() {
        let img = ImageRgb8::from_fn(640, 640, |x, _| {
            if x >= 320 {
                [230, 230, 230]
            } else {
                [0, 0, 0]
            }
        });
        let lines =
            extract_line_candidates(&img, 10, &CannyParams::default(), &HoughParams::default())
                .unwrap();
        assert_eq!(lines[0].angle_deg, 0.0, "lines={lines:?}");
    }
}
