//! Image rendering.
//!
//! This module provides:
//! - Square thumbnail rendering (JPEG, PNG, WebP)
//! - Dominant color extraction
//! - The reference image used to derive the dictionary prefix

pub mod color;
pub mod renderer;

pub use color::{COLOR_DELTA, most_common_color};
pub use renderer::ImageCrateRenderer;
