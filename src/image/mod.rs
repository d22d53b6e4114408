pub mod binary;
pub mod f32;
pub mod io;
pub mod rgb;
pub mod traits;

pub use self::binary::{BinaryMask, EdgeMap};
pub use self::f32::ImageF32;
pub use self::rgb::{ImageRgb8, Rgb};
pub use self::traits::{ensure_same_dims, ImageView, ImageViewMut, Rows};
