//! Owned 3-channel 8-bit image, one `[u8; 3]` per pixel, row-major.
use crate::error::{PanelError, Result};

/// One pixel, channels in the order they were loaded.
pub type Rgb = [u8; 3];

pub const CHANNELS: usize = 3;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageRgb8 {
    /// Image width in pixels
    pub w: usize,
    /// Image height in pixels
    pub h: usize,
    /// Pixels between consecutive rows (equals `w`)
    pub stride: usize,
    pub data: Vec<Rgb>,
}

impl ImageRgb8 {
    /// Black image of size `w × h`.
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            stride: w,
            data: vec![[0; CHANNELS]; w * h],
        }
    }

    /// Wrap an interleaved `RGBRGB...` byte buffer.
    pub fn from_raw(w: usize, h: usize, raw: Vec<u8>) -> Result<Self> {
        if raw.len() != w * h * CHANNELS {
            return Err(PanelError::InputType(format!(
                "byte buffer of {} values cannot hold a {w}x{h}x{CHANNELS} image",
                raw.len()
            )));
        }
        let data = raw
            .chunks_exact(CHANNELS)
            .map(|px| [px[0], px[1], px[2]])
            .collect();
        Ok(Self {
            w,
            h,
            stride: w,
            data,
        })
    }

    pub fn from_fn(w: usize, h: usize, mut f: impl FnMut(usize, usize) -> Rgb) -> Self {
        let mut img = Self::new(w, h);
        for y in 0..h {
            for x in 0..w {
                img.data[y * w + x] = f(x, y);
            }
        }
        img
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.stride + x
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.data[self.idx(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, px: Rgb) {
        let i = self.idx(x, y);
        self.data[i] = px;
    }

    /// Interleaved bytes, the layout the `image` crate expects.
    pub fn to_raw(&self) -> Vec<u8> {
        self.data.iter().flat_map(|px| px.iter().copied()).collect()
    }

    /// Number of pixels with at least one non-zero channel.
    pub fn count_nonzero(&self) -> usize {
        self.data.iter().filter(|px| px.iter().any(|&c| c != 0)).count()
    }

    /// Rec.601 luma on a 0–255 scale.
    pub fn luma(&self) -> crate::image::ImageF32 {
        let mut out = crate::image::ImageF32::new(self.w, self.h);
        for (dst, px) in out.data.iter_mut().zip(&self.data) {
            *dst = 0.299 * px[0] as f32 + 0.587 * px[1] as f32 + 0.114 * px[2] as f32;
        }
        out
    }

    /// A single channel widened to f64, row-major.
    pub fn channel(&self, channel: usize) -> Result<Vec<f64>> {
        if channel >= CHANNELS {
            return Err(PanelError::InputType(format!(
                "channel index {channel} out of range for a {CHANNELS}-channel image"
            )));
        }
        Ok(self.data.iter().map(|px| px[channel] as f64).collect())
    }
}

impl crate::image::traits::ImageView for ImageRgb8 {
    type Pixel = Rgb;

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
    fn row(&self, y: usize) -> &[Rgb] {
        let start = y * self.stride;
        &self.data[start..start + self.w]
    }
    #[inline]
    fn as_slice(&self) -> Option<&[Rgb]> {
        (self.stride == self.w).then_some(&self.data[..self.w * self.h])
    }
}

impl crate::image::traits::ImageViewMut for ImageRgb8 {
    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [Rgb] {
        let start = y * self.stride;
        let end = start + self.w;
        &mut self.data[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_rejects_truncated_buffer() {
        let err = ImageRgb8::from_raw(4, 4, vec![0; 4 * 4 * 3 - 1]).unwrap_err();
        assert!(matches!(err, PanelError::InputType(_)), "got {err:?}");
    }

    #[test]
    fn raw_layout_is_interleaved() {
        let img = ImageRgb8::from_raw(2, 1, vec![1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(img.get(1, 0), [4, 5, 6]);
        assert_eq!(img.to_raw(), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn channel_index_is_checked() {
        let img = ImageRgb8::new(2, 2);
        assert!(img.channel(2).is_ok());
        assert!(matches!(img.channel(3), Err(PanelError::InputType(_))));
    }

    #[test]
    fn luma_of_white_is_full_scale() {
        let img = ImageRgb8::from_fn(3, 3, |_, _| [255, 255, 255]);
        let luma = img.luma();
        assert!(luma.data.iter().all(|&v| (v - 255.0).abs() < 1e-3));
    }
}
