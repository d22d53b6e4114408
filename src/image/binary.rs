//! Boolean raster used for thresholded panel masks and Canny edge maps.
use crate::error::{PanelError, Result};
use crate::image::ImageF32;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BinaryMask {
    pub w: usize,
    pub h: usize,
    pub stride: usize,
    pub data: Vec<bool>,
}

/// Binary edge grid produced by the Canny operator.
pub type EdgeMap = BinaryMask;

impl BinaryMask {
    /// All-false mask of size `w × h`.
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            stride: w,
            data: vec![false; w * h],
        }
    }

    pub fn from_fn(w: usize, h: usize, mut f: impl FnMut(usize, usize) -> bool) -> Self {
        let mut mask = Self::new(w, h);
        for y in 0..h {
            for x in 0..w {
                mask.data[y * w + x] = f(x, y);
            }
        }
        mask
    }

    /// Threshold a continuous confidence mask: `value >= threshold` is panel.
    ///
    /// Non-finite confidences are rejected rather than silently classified.
    pub fn from_probabilities(probabilities: &ImageF32, threshold: f32) -> Result<Self> {
        if let Some(pos) = probabilities.data.iter().position(|v| !v.is_finite()) {
            return Err(PanelError::InputType(format!(
                "mask value at ({}, {}) is not a finite number",
                pos % probabilities.w.max(1),
                pos / probabilities.w.max(1)
            )));
        }
        let data = probabilities.data.iter().map(|&v| v >= threshold).collect();
        Ok(Self {
            w: probabilities.w,
            h: probabilities.h,
            stride: probabilities.w,
            data,
        })
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.stride + x
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.data[self.idx(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: bool) {
        let i = self.idx(x, y);
        self.data[i] = v;
    }

    /// Number of set pixels.
    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&v| v).count()
    }

    /// `(x, y)` of every set pixel in row-major order.
    pub fn points(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let w = self.w.max(1);
        self.data
            .iter()
            .enumerate()
            .filter(|(_, v)| **v)
            .map(move |(i, _)| (i % w, i / w))
    }

    /// Back to a 0/1 float raster.
    pub fn to_f32(&self) -> ImageF32 {
        let mut out = ImageF32::new(self.w, self.h);
        for (dst, &v) in out.data.iter_mut().zip(&self.data) {
            *dst = if v { 1.0 } else { 0.0 };
        }
        out
    }
}

impl crate::image::traits::ImageView for BinaryMask {
    type Pixel = bool;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn stride(&self) -> usize {
        self.stride
    }
    #[inline]
    fn row(&self, y: usize) -> &[bool] {
        let start = y * self.stride;
        &self.data[start..start + self.w]
    }
    #[inline]
    fn as_slice(&self) -> Option<&[bool]> {
        (self.stride == self.w).then_some(&self.data[..self.w * self.h])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_is_inclusive() {
        let probs = ImageF32::from_vec(4, 1, vec![0.0, 0.89, 0.9, 1.0]).unwrap();
        let mask = BinaryMask::from_probabilities(&probs, 0.9).unwrap();
        assert_eq!(mask.data, vec![false, false, true, true]);
    }

    #[test]
    fn nan_confidence_is_rejected() {
        let probs = ImageF32::from_vec(2, 1, vec![0.5, f32::NAN]).unwrap();
        let err = BinaryMask::from_probabilities(&probs, 0.9).unwrap_err();
        assert!(matches!(err, PanelError::InputType(_)), "got {err:?}");
    }

    #[test]
    fn points_are_row_major() {
        let mask = BinaryMask::from_fn(3, 2, |x, y| (x + y) % 2 == 0);
        let pts: Vec<_> = mask.points().collect();
        assert_eq!(pts, vec![(0, 0), (2, 0), (1, 1)]);
        assert_eq!(mask.count(), 3);
    }
}
