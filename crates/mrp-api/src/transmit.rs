//! # File Transmission
//!
//! Turns a resolved file or an in-memory payload into a 200 response.
//! `Content-Length` is always the exact byte count and is set before any
//! body bytes. Under HEAD the length is kept and the body is omitted.

use axum::body::Body;
use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::{HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use mrp_core::{ProxyError, ResolvedFile};
use tokio_util::io::ReaderStream;

pub const OCTET_STREAM: &str = "application/octet-stream";
pub const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
pub const APPLICATION_XML: &str = "application/xml";

/// Whether the client asked for the body or only the headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// GET: headers and full body.
    Full,
    /// HEAD: headers only, with the length the body would have had.
    HeadersOnly,
}

impl Delivery {
    pub fn for_method(method: &Method) -> Self {
        if *method == Method::HEAD {
            Self::HeadersOnly
        } else {
            Self::Full
        }
    }

    pub fn wants_body(self) -> bool {
        self == Self::Full
    }
}

/// Stream a file from disk, full length, unmodified.
///
/// The length comes from the opened handle's metadata, not the resolver.
pub async fn send_file(file: &ResolvedFile, delivery: Delivery) -> Result<Response, ProxyError> {
    let path = file.path();
    let io_err = |source| ProxyError::Io {
        path: path.to_path_buf(),
        source,
    };
    let handle = tokio::fs::File::open(path).await.map_err(io_err)?;
    let len = handle.metadata().await.map_err(io_err)?.len();

    let body = if delivery.wants_body() {
        Body::from_stream(ReaderStream::new(handle))
    } else {
        Body::empty()
    };
    Ok(ok_response(OCTET_STREAM, len, body))
}

/// Send an in-memory payload such as a digest string or a metadata document.
pub fn send_bytes(
    content_type: &'static str,
    bytes: impl Into<Vec<u8>>,
    delivery: Delivery,
) -> Response {
    let bytes = bytes.into();
    let len = bytes.len() as u64;
    let body = if delivery.wants_body() {
        Body::from(bytes)
    } else {
        Body::empty()
    };
    ok_response(content_type, len, body)
}

fn ok_response(content_type: &'static str, len: u64, body: Body) -> Response {
    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, HeaderValue::from_static(content_type)),
            (CONTENT_LENGTH, HeaderValue::from(len)),
        ],
        body,
    )
        .into_response()
}
