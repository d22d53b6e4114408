//! Angle utilities shared by the line search and the azimuth resolver.

/// Angle (degrees) of step `index` on an axis of `steps` uniform steps
/// spanning [-90°, 90°).
#[inline]
pub fn axis_angle_deg(index: usize, steps: usize) -> f64 {
    -90.0 + 180.0 * index as f64 / steps as f64
}

/// Maps a Hough normal angle (degrees, `[-90, 90)`) onto the compass
/// convention used for azimuths.
///
/// The angle is first truncated toward zero to whole degrees; non-negative
/// angles map to `90 + d`, negative ones to `270 + d`. The result lies in
/// [90, 270) and is an orientation modulo 180°.
#[inline]
pub fn azimuth_bin(angle_deg: f64) -> i32 {
    let d = angle_deg.trunc() as i32;
    if d >= 0 {
        90 + d
    } else {
        270 + d
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_is_half_open() {
        assert_eq!(axis_angle_deg(0, 360), -90.0);
        assert_eq!(axis_angle_deg(180, 360), 0.0);
        assert_eq!(axis_angle_deg(270, 360), 45.0);
        assert_eq!(axis_angle_deg(359, 360), 89.5);
    }

    #[test]
    fn azimuth_mapping_matches_compass_convention() {
        assert_eq!(azimuth_bin(45.0), 135);
        assert_eq!(azimuth_bin(0.0), 90);
        assert_eq!(azimuth_bin(89.5), 179);
        assert_eq!(azimuth_bin(-90.0), 180);
        assert_eq!(azimuth_bin(-45.5), 225);
    }

    #[test]
    fn truncation_happens_before_the_sign_test() {
        // -0.5 truncates to 0 and therefore takes the non-negative branch.
        assert_eq!(azimuth_bin(-0.5), 90);
        assert_eq!(azimuth_bin(-1.0), 269);
    }
}
