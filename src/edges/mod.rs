//! Edge processing: image gradients, non‑maximum suppression and the
//! dual-threshold (Canny) operator.
//!
//! - Gradient computation (3×3 Sobel) returning `gx`, `gy` and L1 magnitude.
//! - Direction-aligned non‑maximum suppression with weak/strong
//!   classification.
//! - Hysteresis tracking producing a binary `EdgeMap`.
//!
//! Design goals
//! - Favor clarity and cache‑friendly row access over micro‑optimizations.
//! - Handle borders by clamping indices (replicate).

pub mod canny;
pub mod grad;
pub mod nms;

pub use canny::{canny, canny_rgb};
pub use grad::{sobel_gradients, Grad};
pub use nms::{suppress_non_maxima, EdgeStrength};
