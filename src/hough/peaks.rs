//! Prominent-peak extraction from a Hough accumulator.
//!
//! 1. A separable maximum filter (half-sizes `min_distance` × `min_angle`,
//!    zero padding) marks cells equal to their neighbourhood maximum.
//! 2. Marked cells with at least `threshold_ratio × max` votes are grouped
//!    into 8-connected plateaus; each plateau is represented by its rounded
//!    centroid.
//! 3. Plateaus are visited from the strongest down. An accepted peak clears
//!    its neighbourhood in the filtered accumulator so weaker neighbours of
//!    the same line are skipped. The angle axis wraps: stepping past ±90°
//!    reflects the distance (`rows - r`), since (θ, ρ) and (θ ± 180°, −ρ)
//!    describe the same line.
use super::accumulator::HoughAccumulator;
use crate::params::HoughParams;
use crate::types::LineCandidate;
use log::debug;

struct Plateau {
    row: usize,
    col: usize,
    intensity: u32,
}

/// At most `num_peaks` candidates ordered by descending votes.
pub fn find_peaks(
    acc: &HoughAccumulator,
    params: &HoughParams,
    num_peaks: usize,
) -> Vec<LineCandidate> {
    let rows = acc.distance_bins();
    let cols = acc.angle_steps();
    let max = acc.max_votes();
    if num_peaks == 0 || max == 0 || cols == 0 {
        return Vec::new();
    }
    let threshold = params.threshold_ratio as f64 * max as f64;

    let mut filtered = max_filter(
        acc.votes(),
        rows,
        cols,
        params.min_distance,
        params.min_angle,
    );
    let plateaus = plateaus(acc.votes(), &filtered, rows, cols, threshold);

    let min_d = params.min_distance as isize;
    let min_a = params.min_angle as isize;
    let mut peaks = Vec::with_capacity(num_peaks.min(plateaus.len()));
    for p in plateaus {
        if peaks.len() >= num_peaks {
            break;
        }
        let accum = filtered[p.row * cols + p.col];
        if accum == 0 || (accum as f64) < threshold {
            continue;
        }
        for dr in -min_d..=min_d {
            let r = p.row as isize + dr;
            if r <= 0 || r >= rows as isize {
                continue;
            }
            for dc in -min_a..=min_a {
                let mut c = p.col as isize + dc;
                let mut rr = r;
                if c < 0 {
                    rr = rows as isize - r;
                    c += cols as isize;
                } else if c >= cols as isize {
                    rr = rows as isize - r;
                    c -= cols as isize;
                }
                if c < 0 || c >= cols as isize {
                    continue;
                }
                filtered[rr as usize * cols + c as usize] = 0;
            }
        }
        peaks.push(LineCandidate {
            angle_deg: acc.angle_deg(p.col),
            distance: acc.distance(p.row),
            votes: accum,
        });
    }

    debug!(
        "hough peaks: max_votes={} threshold={:.1} accepted={}",
        max,
        threshold,
        peaks.len()
    );
    peaks
}

/// Separable sliding maximum with zero padding: rows first, then columns.
fn max_filter(
    votes: &[u32],
    rows: usize,
    cols: usize,
    half_rows: usize,
    half_cols: usize,
) -> Vec<u32> {
    let mut along_rows = vec![0u32; votes.len()];
    for c in 0..cols {
        for r in 0..rows {
            let lo = r.saturating_sub(half_rows);
            let hi = (r + half_rows).min(rows - 1);
            along_rows[r * cols + c] = (lo..=hi)
                .map(|rr| votes[rr * cols + c])
                .max()
                .unwrap_or(0);
        }
    }
    let mut out = vec![0u32; votes.len()];
    for r in 0..rows {
        let row = &along_rows[r * cols..(r + 1) * cols];
        for c in 0..cols {
            let lo = c.saturating_sub(half_cols);
            let hi = (c + half_cols).min(cols - 1);
            out[r * cols + c] = row[lo..=hi].iter().copied().max().unwrap_or(0);
        }
    }
    out
}

/// Group local-maximum cells above `threshold` into 8-connected plateaus,
/// sorted strongest first (later plateaus first among equals).
fn plateaus(
    votes: &[u32],
    filtered: &[u32],
    rows: usize,
    cols: usize,
    threshold: f64,
) -> Vec<Plateau> {
    let is_peak =
        |i: usize| votes[i] > 0 && votes[i] == filtered[i] && votes[i] as f64 >= threshold;
    let mut visited = vec![false; votes.len()];
    let mut out = Vec::new();
    let mut stack = Vec::new();

    for start in 0..votes.len() {
        if visited[start] || !is_peak(start) {
            continue;
        }
        visited[start] = true;
        stack.push(start);
        let (mut sum_r, mut sum_c, mut n, mut intensity) = (0usize, 0usize, 0usize, 0u32);
        while let Some(i) = stack.pop() {
            let (r, c) = (i / cols, i % cols);
            sum_r += r;
            sum_c += c;
            n += 1;
            intensity = intensity.max(filtered[i]);
            for nr in r.saturating_sub(1)..=(r + 1).min(rows - 1) {
                for nc in c.saturating_sub(1)..=(c + 1).min(cols - 1) {
                    let j = nr * cols + nc;
                    if !visited[j] && is_peak(j) {
                        visited[j] = true;
                        stack.push(j);
                    }
                }
            }
        }
        out.push(Plateau {
            row: (sum_r as f64 / n as f64).round_ties_even() as usize,
            col: (sum_c as f64 / n as f64).round_ties_even() as usize,
            intensity,
        });
    }

    out.sort_by_key(|p| p.intensity);
    out.reverse();
    out
}
