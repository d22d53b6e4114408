use crate::error::{PanelError, Result};

pub trait ImageView {
    type Pixel: Copy;

    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn stride(&self) -> usize;

    fn row(&self, y: usize) -> &[Self::Pixel];

    fn rows(&self) -> Rows<'_, Self>
    where
        Self: Sized,
    {
        Rows { image: self, y: 0 }
    }

    /// `(width, height)` pair, the unit every shape check compares.
    fn dims(&self) -> (usize, usize) {
        (self.width(), self.height())
    }

    fn is_contiguous(&self) -> bool {
        self.stride() == self.width()
    }

    fn as_slice(&self) -> Option<&[Self::Pixel]> {
        None
    }
}

pub trait ImageViewMut: ImageView {
    fn row_mut(&mut self, y: usize) -> &mut [Self::Pixel];
}

/// Fails with a shape error unless both rasters have identical spatial size.
pub fn ensure_same_dims<A, B>(context: &'static str, expected: &A, found: &B) -> Result<()>
where
    A: ImageView,
    B: ImageView,
{
    if expected.dims() != found.dims() {
        return Err(PanelError::shape(context, expected.dims(), found.dims()));
    }
    Ok(())
}

pub struct Rows<'a, I: ?Sized + ImageView> {
    image: &'a I,
    y: usize,
}

impl<'a, I: ImageView> Iterator for Rows<'a, I> {
    type Item = &'a [I::Pixel];

    fn next(&mut self) -> Option<Self::Item> {
        if self.y >= self.image.height() {
            return None;
        }
        let y = self.y;
        self.y += 1;
        Some(self.image.row(y))
    }
}
