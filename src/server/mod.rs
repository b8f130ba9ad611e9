//! HTTP front end
//!
//! Minimal hyper HTTP/1 server mapping request paths onto the pipeline.
//! Bodies go out as raw bytes here; the base64 gateway envelope only applies
//! when the service sits behind a proxy integration (see
//! [`crate::pipeline::gateway`]).

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::pipeline::{self, ImageResponse};
use crate::storage::ObjectStore;

/// Accept loop; runs until the process is terminated
pub async fn run(config: &ServerConfig, store: Arc<dyn ObjectStore>) -> std::io::Result<()> {
    let addr = format!("{}:{}", config.address, config.port);
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!(address = %addr, "Starting optipix image optimization service");

    loop {
        let (stream, peer) = listener.accept().await?;
        let io = TokioIo::new(stream);
        let store = Arc::clone(&store);

        tokio::spawn(async move {
            let service = service_fn(move |request: Request<Incoming>| {
                let store = Arc::clone(&store);
                async move {
                    let response =
                        pipeline::handle_path(store.as_ref(), request.uri().path()).await;
                    Ok::<_, Infallible>(into_http(response))
                }
            });

            if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                tracing::debug!(peer = %peer, error = %err, "connection closed with error");
            }
        });
    }
}

fn into_http(response: ImageResponse) -> Response<Full<Bytes>> {
    let mut builder = Response::builder()
        .status(response.status)
        .header("Content-Type", response.content_type);

    if let Some(cache_control) = &response.cache_control {
        builder = builder.header("Cache-Control", cache_control.as_str());
    }
    if let Some(origin) = response.optimized_from {
        builder = builder.header("X-Optimized", origin);
    }

    match builder.body(Full::new(response.body)) {
        Ok(http_response) => http_response,
        Err(_) => {
            let mut fallback = Response::new(Full::new(Bytes::new()));
            *fallback.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            fallback
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_http_sets_image_headers() {
        let response = ImageResponse {
            status: 200,
            content_type: "image/avif",
            cache_control: Some("public, max-age=31536000".to_string()),
            optimized_from: Some("cache"),
            body: Bytes::from_static(b"bytes"),
        };

        let http_response = into_http(response);
        assert_eq!(http_response.status(), StatusCode::OK);
        assert_eq!(http_response.headers()["Content-Type"], "image/avif");
        assert_eq!(
            http_response.headers()["Cache-Control"],
            "public, max-age=31536000"
        );
        assert_eq!(http_response.headers()["X-Optimized"], "cache");
    }

    #[test]
    fn test_into_http_error_omits_cache_headers() {
        let response = ImageResponse {
            status: 400,
            content_type: "application/json",
            cache_control: None,
            optimized_from: None,
            body: Bytes::from_static(b"{}"),
        };

        let http_response = into_http(response);
        assert_eq!(http_response.status(), StatusCode::BAD_REQUEST);
        assert!(!http_response.headers().contains_key("Cache-Control"));
        assert!(!http_response.headers().contains_key("X-Optimized"));
    }
}
