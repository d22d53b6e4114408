use super::timing::TimingBreakdown;
use crate::azimuth::Resolution;
use crate::types::{Azimuth, LineCandidate};
use serde::Serialize;

/// A detected line with its drawable extent across the image.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineReport {
    #[serde(flatten)]
    pub candidate: LineCandidate,
    /// `y` at `x = 0` and at `x = width`; absent for vertical lines.
    pub endpoints: Option<[f64; 2]>,
}

impl LineReport {
    pub fn new(candidate: LineCandidate, width: usize) -> Self {
        Self {
            candidate,
            endpoints: candidate.endpoints(width).map(|(y0, y1)| [y0, y1]),
        }
    }
}

/// Serializable summary of one post-processed image.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelReport {
    pub width: usize,
    pub height: usize,
    pub panel_pixels: usize,
    pub azimuth: Azimuth,
    pub resolution: Resolution,
    pub lines: Vec<LineReport>,
    /// Pixels per cluster label; absent when clustering was not requested.
    pub cluster_sizes: Option<Vec<usize>>,
    pub timings: TimingBreakdown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_fields_are_flattened() {
        let line = LineReport::new(
            LineCandidate {
                angle_deg: 0.0,
                distance: 12.0,
                votes: 40,
            },
            64,
        );
        let json = serde_json::to_value(&line).unwrap();
        assert_eq!(json["angleDeg"], 0.0);
        assert_eq!(json["votes"], 40);
        assert!(json["endpoints"].is_null());
    }
}
