use panel_segmentation::image::{ImageF32, ImageRgb8, Rgb};

/// Axis-aligned rectangle `[x0, x1) × [y0, y1)` with a fill colour.
#[derive(Clone, Copy, Debug)]
pub struct Block {
    pub x0: usize,
    pub y0: usize,
    pub x1: usize,
    pub y1: usize,
    pub color: Rgb,
}

impl Block {
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }

    pub fn area(&self) -> usize {
        (self.x1 - self.x0) * (self.y1 - self.y0)
    }
}

/// Image that is `bright` where `x + y >= offset` and black elsewhere.
///
/// The step runs at 45° to the axes, so its normal is at +45°.
pub fn diagonal_half_plane(size: usize, offset: usize, bright: Rgb) -> ImageRgb8 {
    assert!(size > 0, "image dimensions must be positive");
    ImageRgb8::from_fn(size, size, |x, y| if x + y >= offset { bright } else { [0, 0, 0] })
}

/// Panel blocks on a uniform background plus the matching confidence mask
/// (0.97 inside a block, 0.05 outside).
pub fn panel_blocks(w: usize, h: usize, background: Rgb, blocks: &[Block]) -> (ImageRgb8, ImageF32) {
    assert!(w > 0 && h > 0, "image dimensions must be positive");
    let image = ImageRgb8::from_fn(w, h, |x, y| {
        blocks
            .iter()
            .find(|b| b.contains(x, y))
            .map_or(background, |b| b.color)
    });
    let mask = ImageF32::from_fn(w, h, |x, y| {
        if blocks.iter().any(|b| b.contains(x, y)) {
            0.97
        } else {
            0.05
        }
    });
    (image, mask)
}
