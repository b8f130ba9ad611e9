//! Read-through optimization pipeline
//!
//! Control flow per invocation:
//!
//! ```text
//! parse → cache lookup → hit  → respond
//!                      → miss → origin fetch → transform → populate → respond
//! ```
//!
//! Cache failures on either side degrade to regeneration; only a malformed
//! path or an unreadable source surfaces an error. Each invocation is a
//! stateless, linear sequence — concurrency across requests belongs to the
//! hosting layer.

pub mod gateway;

use bytes::Bytes;
use serde_json::json;

use crate::constants::CACHE_TTL_SECS;
use crate::error::OptimizeError;
use crate::optimizer::params::TransformRequest;
use crate::optimizer::processor;
use crate::storage::{GetOutcome, ObjectStore};

/// Artifact produced by the pipeline, cached or freshly generated
#[derive(Debug)]
pub struct OptimizedImage {
    pub body: Bytes,
    pub content_type: &'static str,
    pub from_cache: bool,
}

/// Fetches the optimized artifact for a request, populating the cache on miss
pub async fn get_optimized(
    store: &dyn ObjectStore,
    request: &TransformRequest,
) -> Result<OptimizedImage, OptimizeError> {
    let cache_key = request.cache_key();

    match store.get(&cache_key).await {
        GetOutcome::Found(body) => {
            tracing::debug!(key = %cache_key, "cache hit");
            return Ok(OptimizedImage {
                body,
                content_type: request.format.content_type(),
                from_cache: true,
            });
        }
        GetOutcome::Missing => {
            tracing::debug!(key = %cache_key, "cache miss");
        }
        // A degraded cache regenerates instead of failing the request
        GetOutcome::Unavailable(reason) => {
            tracing::warn!(key = %cache_key, %reason, "cache read failed, regenerating");
        }
    }

    let original = match store.get(&request.source_key).await {
        GetOutcome::Found(body) => body,
        GetOutcome::Missing => {
            return Err(OptimizeError::source_not_found(&request.source_key));
        }
        GetOutcome::Unavailable(reason) => {
            return Err(OptimizeError::storage_unavailable(reason));
        }
    };

    let transformed = processor::transform(&original, request)?;
    tracing::info!(
        key = %cache_key,
        bytes = transformed.data.len(),
        output_width = transformed.output_size.0,
        output_height = transformed.output_size.1,
        "generated optimized image"
    );

    let body = Bytes::from(transformed.data);

    // Best effort: the transformed bytes are served regardless of whether
    // caching them succeeds
    if let Err(err) = store
        .put(&cache_key, body.clone(), transformed.content_type, &cache_control())
        .await
    {
        tracing::warn!(key = %cache_key, error = %err, "failed to cache optimized image");
    }

    Ok(OptimizedImage {
        body,
        content_type: transformed.content_type,
        from_cache: false,
    })
}

/// Handles one request path end to end, converting every failure into a
/// structured response
pub async fn handle_path(store: &dyn ObjectStore, path: &str) -> ImageResponse {
    let Some(request) = TransformRequest::from_path(path) else {
        return ImageResponse::bad_request();
    };

    match get_optimized(store, &request).await {
        Ok(image) => ImageResponse::optimized(image),
        Err(err) => {
            tracing::error!(path, error = %err, "image optimization failed");
            ImageResponse::error(&err)
        }
    }
}

fn cache_control() -> String {
    format!("public, max-age={}", CACHE_TTL_SECS)
}

/// HTTP-level response produced at the pipeline boundary
#[derive(Debug)]
pub struct ImageResponse {
    pub status: u16,
    pub content_type: &'static str,
    /// `Cache-Control` value; only set on successful image responses
    pub cache_control: Option<String>,
    /// `X-Optimized` diagnostic value: `cache` or `generated`
    pub optimized_from: Option<&'static str>,
    pub body: Bytes,
}

impl ImageResponse {
    fn optimized(image: OptimizedImage) -> Self {
        Self {
            status: 200,
            content_type: image.content_type,
            cache_control: Some(cache_control()),
            optimized_from: Some(if image.from_cache { "cache" } else { "generated" }),
            body: image.body,
        }
    }

    fn bad_request() -> Self {
        let body = json!({
            "error": "Invalid path format. Use: /{width}x{height}/{quality}/{format}/{image-path}",
            "example": "/800x600/80/webp/projects/screenshot.png",
        });
        Self::json(400, body)
    }

    fn error(err: &OptimizeError) -> Self {
        Self::json(err.to_http_status(), json!({ "error": err.to_string() }))
    }

    fn json(status: u16, body: serde_json::Value) -> Self {
        Self {
            status,
            content_type: "application/json",
            cache_control: None,
            optimized_from: None,
            body: Bytes::from(body.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use std::io::Cursor;

    fn seed_png(store: &MemoryStore, key: &str, width: u32, height: u32) {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([10, 200, 30, 255]));
        let mut buffer = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut buffer, image::ImageFormat::Png)
            .unwrap();
        store.insert(key, Bytes::from(buffer.into_inner()), "image/png");
    }

    #[tokio::test]
    async fn test_miss_generates_and_populates() {
        let store = MemoryStore::new();
        seed_png(&store, "logo.png", 16, 16);

        let request = TransformRequest::from_path("/8x8/80/webp/logo.png").unwrap();
        let image = get_optimized(&store, &request).await.unwrap();

        assert!(!image.from_cache);
        assert_eq!(image.content_type, "image/webp");

        let cached = store.object(&request.cache_key()).expect("cache populated");
        assert_eq!(cached.body, image.body);
        assert_eq!(cached.content_type, "image/webp");
        assert_eq!(cached.cache_control, "public, max-age=31536000");
    }

    #[tokio::test]
    async fn test_hit_skips_transform() {
        let store = MemoryStore::new();
        let request = TransformRequest::from_path("/8x8/80/webp/logo.png").unwrap();
        // Pre-populate the cache key with sentinel bytes; no source object
        // exists, so a miss would fail
        store.insert(
            &request.cache_key(),
            Bytes::from_static(b"cached-artifact"),
            "image/webp",
        );

        let image = get_optimized(&store, &request).await.unwrap();
        assert!(image.from_cache);
        assert_eq!(image.body, Bytes::from_static(b"cached-artifact"));
    }

    #[tokio::test]
    async fn test_missing_source_surfaces_error() {
        let store = MemoryStore::new();
        let request = TransformRequest::from_path("/8x8/80/webp/absent.png").unwrap();

        let err = get_optimized(&store, &request).await.unwrap_err();
        assert!(matches!(err, OptimizeError::SourceNotFound { .. }));
    }

    #[tokio::test]
    async fn test_handle_path_rejects_short_paths() {
        let store = MemoryStore::new();
        let response = handle_path(&store, "/80/webp/onlytwo").await;

        assert_eq!(response.status, 400);
        assert_eq!(response.content_type, "application/json");
        let body = String::from_utf8(response.body.to_vec()).unwrap();
        assert!(body.contains("/800x600/80/webp/projects/screenshot.png"));
        assert!(body.contains("Invalid path format"));
    }

    #[tokio::test]
    async fn test_handle_path_source_not_found_is_404() {
        let store = MemoryStore::new();
        let response = handle_path(&store, "/800x600/80/webp/absent.png").await;

        assert_eq!(response.status, 404);
        let body = String::from_utf8(response.body.to_vec()).unwrap();
        assert!(body.contains("absent.png"));
    }
}
