//! Color conversion and text contrast module
//!
//! This module handles hex and HSL conversions, relative luminance,
//! and the selection of legible text colors for a background.

pub mod conversion;
pub mod contrast;

pub use conversion::{rgb_to_hex, hex_to_rgb, HslTriple, Rgb};
pub use contrast::{contrast_ratio, ContrastResolver, ContrastThresholds, TextColors};
