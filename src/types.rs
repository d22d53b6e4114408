use serde::{Deserialize, Serialize};
use std::fmt;

/// Resolved panel orientation in whole degrees, `[0, 360)`.
///
/// Derived from an undirected line angle, so it is an orientation modulo
/// 180°: `Azimuth(135)` and `Azimuth(315)` describe the same array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Azimuth(pub u16);

impl Azimuth {
    pub fn degrees(self) -> u16 {
        self.0
    }
}

impl fmt::Display for Azimuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.0)
    }
}

/// One Hough peak.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineCandidate {
    /// Angle of the line normal in degrees, `[-90, 90)`.
    pub angle_deg: f64,
    /// Signed perpendicular distance from the image origin in pixels.
    pub distance: f64,
    /// Accumulator votes at the peak.
    pub votes: u32,
}

impl LineCandidate {
    pub fn angle_rad(&self) -> f64 {
        self.angle_deg.to_radians()
    }

    /// `y` of the line at `x = 0` and `x = width`, `None` for vertical lines.
    pub fn endpoints(&self, width: usize) -> Option<(f64, f64)> {
        let (sin, cos) = self.angle_rad().sin_cos();
        if sin.abs() < 1e-9 {
            return None;
        }
        let y0 = self.distance / sin;
        let y1 = (self.distance - width as f64 * cos) / sin;
        Some((y0, y1))
    }
}

/// Classifier output: probability of "no panel" (index 0) and "panel"
/// (index 1).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelProbability {
    pub no_panel: f32,
    pub panel: f32,
}

impl PanelProbability {
    pub fn has_panels(&self) -> bool {
        self.panel > self.no_panel
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_of_diagonal_line() {
        // Normal at 45°: x + y = distance * sqrt(2).
        let line = LineCandidate {
            angle_deg: 45.0,
            distance: 10.0 * std::f64::consts::SQRT_2,
            votes: 1,
        };
        let (y0, y1) = line.endpoints(10).unwrap();
        assert!((y0 - 20.0).abs() < 1e-9);
        assert!((y1 - 10.0).abs() < 1e-9);
    }

    #[test]
    fn vertical_line_has_no_endpoints() {
        let line = LineCandidate {
            angle_deg: 0.0,
            distance: 5.0,
            votes: 1,
        };
        assert!(line.endpoints(10).is_none());
    }

    #[test]
    fn ties_mean_no_panel() {
        let p = PanelProbability {
            no_panel: 0.5,
            panel: 0.5,
        };
        assert!(!p.has_panels());
        assert!(PanelProbability {
            no_panel: 0.2,
            panel: 0.8
        }
        .has_panels());
    }
}
