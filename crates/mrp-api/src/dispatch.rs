//! # Request Dispatcher
//!
//! Entry point for one repository request:
//!
//! ```text
//! (method, path) → strip '/' → Path Grammar ─┬─ Artifact ─ resolve ─┬─ checksum? ─ sidecar | computed digest
//!                                             │                      └─ File Transmission
//!                                             ├─ Metadata ─ synthesize ─┬─ checksum? ─ digest of document
//!                                             │                         └─ XML document
//!                                             └─ Malformed ─ 404
//! ```
//!
//! Resolver calls, sidecar checks, hashing and metadata synthesis are all
//! blocking, so each request runs them as one unit on the blocking pool.
//! The resolver always completes before a digest is computed or a file is
//! sent, and a request ends in exactly one of those two.

use axum::extract::State;
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use mrp_core::checksum::artifact_checksum;
use mrp_core::metadata::{render_metadata, synthesize, write_metadata};
use mrp_core::{
    ArtifactCoordinate, ChecksumAlgorithm, ChecksumBody, DigestWriter, ErrorClass,
    MetadataRequest, ProxyError, RepositoryRequest, RequestTarget, ResolvedFile,
};

use crate::error::ApiError;
use crate::state::AppState;
use crate::transmit::{self, Delivery, APPLICATION_XML, TEXT_PLAIN};

/// Axum handler for the wildcard repository route (GET and HEAD).
pub async fn serve(State(state): State<AppState>, method: Method, uri: Uri) -> Response {
    dispatch(&state, Delivery::for_method(&method), uri.path()).await
}

/// Handle one request for `raw_path`, which must start with `/`.
///
/// Axum always supplies the slash. Without it the request is logged and
/// answered with a bare 404.
pub async fn dispatch(state: &AppState, delivery: Delivery, raw_path: &str) -> Response {
    let Some(path) = raw_path.strip_prefix('/') else {
        tracing::error!(path = raw_path, "expected request path starting with '/'");
        return StatusCode::NOT_FOUND.into_response();
    };

    let request = match RepositoryRequest::parse(path) {
        Ok(request) => request,
        Err(err) => {
            tracing::debug!(path, reason = %err, "returning 404 for malformed path");
            return ApiError::from(ProxyError::from(err)).into_response();
        }
    };

    let checksum = request.checksum;
    let outcome = match &request.target {
        RequestTarget::Artifact(coordinate) => {
            serve_artifact(state, delivery, coordinate.clone(), checksum).await
        }
        RequestTarget::Metadata(metadata) => {
            serve_metadata(state, delivery, metadata.clone(), checksum).await
        }
    };

    match outcome {
        Ok(response) => response,
        Err(err) => {
            match err.class() {
                ErrorClass::NotFound => {
                    tracing::debug!(path, %request, error = %err, "returning 404")
                }
                ErrorClass::Internal => {
                    tracing::error!(path, %request, error = %err, "request failed")
                }
            }
            ApiError::from(err).into_response()
        }
    }
}

// -- Artifact path ------------------------------------------------------------

enum ArtifactBody {
    File(ResolvedFile),
    Digest(String),
}

async fn serve_artifact(
    state: &AppState,
    delivery: Delivery,
    coordinate: ArtifactCoordinate,
    checksum: Option<ChecksumAlgorithm>,
) -> Result<Response, ProxyError> {
    let resolver = state.resolver.clone();
    let prepared = blocking(move || {
        let file = resolver.resolve(&coordinate)?;
        tracing::debug!(
            %coordinate,
            checksum = checksum.map(|alg| alg.as_str()),
            file = %file.path().display(),
            "resolved artifact"
        );
        let Some(algorithm) = checksum else {
            return Ok(ArtifactBody::File(file));
        };
        Ok(match artifact_checksum(&file, algorithm)? {
            ChecksumBody::Sidecar(sidecar) => ArtifactBody::File(sidecar),
            ChecksumBody::Computed(hex) => ArtifactBody::Digest(hex),
        })
    })
    .await?;

    match prepared {
        ArtifactBody::File(file) => transmit::send_file(&file, delivery).await,
        ArtifactBody::Digest(hex) => Ok(transmit::send_bytes(TEXT_PLAIN, hex, delivery)),
    }
}

// -- Metadata path ------------------------------------------------------------

async fn serve_metadata(
    state: &AppState,
    delivery: Delivery,
    request: MetadataRequest,
    checksum: Option<ChecksumAlgorithm>,
) -> Result<Response, ProxyError> {
    let plugins = state.plugins.clone();
    let ranges = state.ranges.clone();
    let response = blocking(move || {
        let versions = synthesize(&request, &plugins, ranges.as_ref())?;
        Ok(match checksum {
            Some(algorithm) => {
                let mut sink = DigestWriter::new(algorithm);
                write_metadata(&mut sink, &request, &versions)?;
                transmit::send_bytes(TEXT_PLAIN, sink.finish(), delivery)
            }
            // HEAD still renders so the advertised length matches GET.
            None => transmit::send_bytes(
                APPLICATION_XML,
                render_metadata(&request, &versions)?,
                delivery,
            ),
        })
    })
    .await?;
    Ok(response)
}

/// Run `work` on the blocking pool. A panicked or cancelled task is internal.
async fn blocking<T, F>(work: F) -> Result<T, ProxyError>
where
    F: FnOnce() -> Result<T, ProxyError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ProxyError::Task(e.to_string()))?
}
