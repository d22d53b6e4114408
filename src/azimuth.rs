//! Consensus azimuth from Hough line candidates.
//!
//! Every candidate angle is mapped to an integer azimuth bin
//! (`angle::azimuth_bin`). The most frequent bin wins, ties going to the
//! lowest azimuth. When every bin occurs exactly once there is no consensus
//! and the strongest peak alone decides.
//!
//! The result is an orientation modulo 180°: a south-facing and a
//! north-facing array with parallel rows produce the same value.
use crate::angle::azimuth_bin;
use crate::error::{PanelError, Result};
use crate::hough::LineSearch;
use crate::image::ImageRgb8;
use crate::params::{CannyParams, HoughParams};
use crate::types::{Azimuth, LineCandidate};
use log::debug;
use serde::Serialize;
use std::collections::BTreeMap;

/// How the azimuth was decided.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Resolution {
    /// Most frequent bin among the candidates.
    Mode,
    /// All bins distinct; the strongest peak decided.
    StrongestPeak,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AzimuthEstimate {
    pub azimuth: Azimuth,
    pub resolution: Resolution,
    pub candidates: Vec<LineCandidate>,
}

/// `(bin, count)` pairs in ascending bin order.
pub fn bin_frequencies(candidates: &[LineCandidate]) -> Vec<(i32, usize)> {
    let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
    for c in candidates {
        *counts.entry(azimuth_bin(c.angle_deg)).or_default() += 1;
    }
    counts.into_iter().collect()
}

/// Lowest bin among the most frequent ones, or `None` when no bin repeats.
fn mode_bin(candidates: &[LineCandidate]) -> Option<i32> {
    let mut best: Option<(i32, usize)> = None;
    for (bin, count) in bin_frequencies(candidates) {
        // Strict comparison keeps the first (lowest) bin among ties.
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((bin, count));
        }
    }
    best.filter(|&(_, count)| count > 1).map(|(bin, _)| bin)
}

fn to_azimuth(bin: i32) -> Azimuth {
    Azimuth(bin.rem_euclid(360) as u16)
}

/// Resolve one azimuth from a candidate list.
///
/// Without a repeated bin the candidate with the most votes decides (the
/// earliest one among equals, since line searches emit descending order).
pub fn resolve_azimuth(candidates: &[LineCandidate]) -> Result<(Azimuth, Resolution)> {
    if candidates.is_empty() {
        return Err(PanelError::NoCandidates);
    }
    if let Some(bin) = mode_bin(candidates) {
        return Ok((to_azimuth(bin), Resolution::Mode));
    }
    let strongest = candidates
        .iter()
        .fold(&candidates[0], |best, c| if c.votes > best.votes { c } else { best });
    Ok((
        to_azimuth(azimuth_bin(strongest.angle_deg)),
        Resolution::StrongestPeak,
    ))
}

/// Full azimuth estimate for one cropped image, keeping the candidates.
pub fn estimate_azimuth_detailed(
    image: &ImageRgb8,
    number_lines: usize,
    canny: &CannyParams,
    hough: &HoughParams,
) -> Result<AzimuthEstimate> {
    if number_lines == 0 {
        return Err(PanelError::InputType(
            "number_lines must be at least 1".to_string(),
        ));
    }
    let search = LineSearch::from_image(image, canny, hough)?;
    let candidates = search.peaks(number_lines);
    if candidates.is_empty() {
        debug!(
            "azimuth: no line candidates ({} edge pixels)",
            search.edges().count()
        );
        return Err(PanelError::NoCandidates);
    }

    let (azimuth, resolution) = match mode_bin(&candidates) {
        Some(bin) => (to_azimuth(bin), Resolution::Mode),
        None => {
            // No consensus: ask the accumulator for its single strongest line.
            let strongest = search.peaks(1);
            let (azimuth, _) = resolve_azimuth(&strongest)?;
            (azimuth, Resolution::StrongestPeak)
        }
    };
    debug!(
        "azimuth: {} via {:?} from {} candidates",
        azimuth,
        resolution,
        candidates.len()
    );
    Ok(AzimuthEstimate {
        azimuth,
        resolution,
        candidates,
    })
}

/// Azimuth of the panels in a cropped image.
pub fn estimate_azimuth(
    image: &ImageRgb8,
    number_lines: usize,
    canny: &CannyParams,
    hough: &HoughParams,
) -> Result<Azimuth> {
    estimate_azimuth_detailed(image, number_lines, canny, hough).map(|e| e.azimuth)
}
