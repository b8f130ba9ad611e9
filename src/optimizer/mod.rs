//! Image optimization module
//!
//! Provides the transformation side of the pipeline:
//! - Path-based parameter parsing and cache key derivation
//! - Fit-inside resize (aspect-preserving, never enlarging)
//! - Multiple encoder support (WebP, AVIF, JPEG, PNG)
//!
//! # URL Format
//!
//! ```text
//! /{width}x{height}/{quality}/{format}/{image-path}
//! /800x600/80/webp/projects/screenshot.png
//! ```
//!
//! Either dimension may be left empty (`800x`, `x600`) to derive the other
//! side from the aspect ratio.

pub mod encoder;
pub mod params;
pub mod processor;

// Re-export commonly used types
pub use encoder::{EncodedImage, EncoderFactory, ImageEncoder};
pub use params::{OutputFormat, TransformRequest};
pub use processor::{transform, TransformedImage};
