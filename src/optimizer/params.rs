//! Transformation parameter parsing
//!
//! Decodes request paths of the shape
//! `/{width}x{height}/{quality}/{format}/{image-path...}` into a validated
//! [`TransformRequest`], and derives the deterministic cache key a derived
//! artifact is stored under.

use crate::constants::{CACHE_KEY_PREFIX, DEFAULT_QUALITY, MAX_QUALITY, MIN_QUALITY};

/// Output image format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    WebP,
    Avif,
    Jpeg,
    Png,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WebP => "webp",
            Self::Avif => "avif",
            Self::Jpeg => "jpeg",
            Self::Png => "png",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::WebP => "image/webp",
            Self::Avif => "image/avif",
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }

    /// Parses a format segment, falling back to WebP for anything
    /// unrecognized rather than erroring. `jpg` is an alias for `jpeg`.
    pub fn parse_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "webp" => Self::WebP,
            "avif" => Self::Avif,
            "jpeg" | "jpg" => Self::Jpeg,
            "png" => Self::Png,
            _ => Self::WebP,
        }
    }
}

/// A fully validated transformation request, derived once per invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformRequest {
    /// Object-storage key of the original asset
    pub source_key: String,
    /// Target width in pixels; `None` derives it from the aspect ratio
    pub width: Option<u32>,
    /// Target height in pixels
    pub height: Option<u32>,
    /// Compression quality, always within [1, 100]
    pub quality: u8,
    pub format: OutputFormat,
}

impl TransformRequest {
    /// Parses a request path into a `TransformRequest`
    ///
    /// Returns `None` when the path has fewer than four non-empty segments.
    /// All other inputs produce a valid request: bad quality values fall
    /// back to the default and clamp, unknown formats fall back to WebP.
    /// Pure function, no side effects.
    pub fn from_path(path: &str) -> Option<Self> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        if segments.len() < 4 {
            return None;
        }

        let (width, height) = parse_dimensions(segments[0]);
        let quality = parse_quality(segments[1]);
        let format = OutputFormat::parse_or_default(segments[2]);
        // The asset path may itself contain slashes
        let source_key = segments[3..].join("/");

        Some(Self {
            source_key,
            width,
            height,
            quality,
            format,
        })
    }

    /// Derives the cache key for this request
    ///
    /// Deterministic function of the effective parameters: identical
    /// requests always resolve to the identical key. Absent dimensions are
    /// substituted with `auto` so the key stays collision-free.
    pub fn cache_key(&self) -> String {
        format!(
            "{}/{}x{}/{}/{}/{}",
            CACHE_KEY_PREFIX,
            dimension_label(self.width),
            dimension_label(self.height),
            self.quality,
            self.format.as_str(),
            self.source_key
        )
    }

    /// Whether a resize pass is requested at all
    pub fn wants_resize(&self) -> bool {
        self.width.is_some() || self.height.is_some()
    }
}

fn dimension_label(value: Option<u32>) -> String {
    value.map_or_else(|| "auto".to_string(), |px| px.to_string())
}

/// Splits a dimension segment like `800x600`, `800x`, or `x600`
fn parse_dimensions(segment: &str) -> (Option<u32>, Option<u32>) {
    match segment.split_once('x') {
        Some((width, height)) => (parse_dimension(width), parse_dimension(height)),
        // No separator at all means "width only"
        None => (parse_dimension(segment), None),
    }
}

/// Zero and unparseable values are treated as absent
fn parse_dimension(s: &str) -> Option<u32> {
    s.parse::<u32>().ok().filter(|&px| px > 0)
}

/// Parse failure substitutes the default; the result always clamps to [1, 100]
fn parse_quality(s: &str) -> u8 {
    s.parse::<i64>()
        .unwrap_or(i64::from(DEFAULT_QUALITY))
        .clamp(i64::from(MIN_QUALITY), i64::from(MAX_QUALITY)) as u8
}
