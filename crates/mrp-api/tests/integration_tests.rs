//! # Integration Tests for mrp-api
//!
//! Drives the router end to end with in-memory resolver fakes: artifact
//! transmission under GET and HEAD, sidecar and computed checksums,
//! metadata synthesis from the plugin table and from version ranges, and
//! the 404/500 mapping. The last tests start the real server on a loopback
//! port and speak raw HTTP/1.1 to it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::body::Body;
use axum::http::header::CONTENT_LENGTH;
use axum::http::{HeaderMap, Method, Request, StatusCode};
use http_body_util::BodyExt;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tower::ServiceExt;

use mrp_api::state::AppState;
use mrp_api::ProxyServer;
use mrp_core::checksum::digest_bytes;
use mrp_core::{
    ArtifactCoordinate, ArtifactResolver, ChecksumAlgorithm, KnownPluginVersions, LocalRepository,
    RangeResolutionError, ResolutionError, ResolvedFile, VersionRangeRequest,
    VersionRangeResolver, VersionRangeResult,
};

const JAR_PATH: &str = "/com/example/foo-plugin/1.2.0/foo-plugin-1.2.0.jar";
const METADATA_PATH: &str = "/com/example/foo-plugin/maven-metadata.xml";
const JAR_BYTES: &[u8; 37] = b"0123456789abcdefghijklmnopqrstuvwxyz!";

// -- Fakes --------------------------------------------------------------------

/// Resolves coordinates (by their `g:a:ext[:c]:v` rendering) to fixed files.
#[derive(Default)]
struct MapResolver {
    files: HashMap<String, PathBuf>,
}

impl MapResolver {
    fn with(mut self, coordinate: &str, path: PathBuf) -> Self {
        self.files.insert(coordinate.to_string(), path);
        self
    }
}

impl ArtifactResolver for MapResolver {
    fn resolve(&self, coordinate: &ArtifactCoordinate) -> Result<ResolvedFile, ResolutionError> {
        let key = coordinate.to_string();
        let path = self
            .files
            .get(&key)
            .ok_or_else(|| ResolutionError::NotFound {
                coordinate: key.clone(),
            })?;
        ResolvedFile::from_path(path).map_err(|e| ResolutionError::Failed {
            coordinate: key,
            reason: e.to_string(),
        })
    }
}

struct FixedRanges(Vec<&'static str>);

impl VersionRangeResolver for FixedRanges {
    fn resolve_range(
        &self,
        _request: &VersionRangeRequest,
    ) -> Result<VersionRangeResult, RangeResolutionError> {
        Ok(VersionRangeResult::new(
            self.0.iter().map(|v| v.to_string()).collect(),
        ))
    }
}

struct FailingRanges;

impl VersionRangeResolver for FailingRanges {
    fn resolve_range(
        &self,
        request: &VersionRangeRequest,
    ) -> Result<VersionRangeResult, RangeResolutionError> {
        Err(RangeResolutionError::Failed {
            coordinate: request.describe(),
            reason: "remote repository unreachable".to_string(),
        })
    }
}

// -- Helpers ------------------------------------------------------------------

/// A temp directory holding the 37-byte jar, plus a resolver that maps the
/// foo-plugin coordinate onto it.
struct Fixture {
    dir: tempfile::TempDir,
    jar: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let jar = dir.path().join("foo-plugin-1.2.0.jar");
        std::fs::write(&jar, JAR_BYTES).unwrap();
        Self { dir, jar }
    }

    fn resolver(&self) -> MapResolver {
        MapResolver::default().with("com.example:foo-plugin:jar:1.2.0", self.jar.clone())
    }

    fn app(&self) -> axum::Router {
        app_with(self.resolver(), FixedRanges(vec![]), KnownPluginVersions::default())
    }
}

fn app_with(
    resolver: impl ArtifactResolver + 'static,
    ranges: impl VersionRangeResolver + 'static,
    plugins: KnownPluginVersions,
) -> axum::Router {
    mrp_api::app(AppState::new(Arc::new(resolver), Arc::new(ranges), plugins))
}

fn foo_plugin_table() -> KnownPluginVersions {
    [("com.example:foo-plugin".to_string(), "1.2.0".to_string())]
        .into_iter()
        .collect()
}

async fn send(app: axum::Router, method: Method, uri: &str) -> (StatusCode, HeaderMap, Vec<u8>) {
    let response = app
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, headers, bytes.to_vec())
}

fn content_length(headers: &HeaderMap) -> u64 {
    headers[CONTENT_LENGTH].to_str().unwrap().parse().unwrap()
}

// -- Artifact transmission ----------------------------------------------------

#[tokio::test]
async fn get_serves_full_artifact() {
    let fixture = Fixture::new();
    let (status, headers, body) = send(fixture.app(), Method::GET, JAR_PATH).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_length(&headers), 37);
    assert_eq!(body, JAR_BYTES);
}

#[tokio::test]
async fn head_reports_same_length_without_body() {
    let fixture = Fixture::new();
    let (get_status, get_headers, _) = send(fixture.app(), Method::GET, JAR_PATH).await;
    let (head_status, head_headers, head_body) = send(fixture.app(), Method::HEAD, JAR_PATH).await;
    assert_eq!(get_status, StatusCode::OK);
    assert_eq!(head_status, StatusCode::OK);
    assert_eq!(content_length(&head_headers), content_length(&get_headers));
    assert!(head_body.is_empty());
}

#[tokio::test]
async fn unresolvable_artifact_is_404_without_body() {
    let fixture = Fixture::new();
    let (status, _, body) = send(
        fixture.app(),
        Method::GET,
        "/com/example/foo-plugin/9.9.9/foo-plugin-9.9.9.jar",
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.is_empty());
}

#[tokio::test]
async fn malformed_paths_are_404() {
    let fixture = Fixture::new();
    for path in [
        "/com/example/foo-plugin/1.2.0",
        "/com/example/foo-plugin/1.2.0/",
        "/com/example/foo-plugin/1.2.0/other-1.2.0.jar",
        "/com/example/foo-plugin/1.2.0/foo-plugin-1.2.0-sources",
        "/com/example/foo-plugin/1.2.0/foo-plugin-1.2.0",
        "/foo-plugin/maven-metadata.xml",
        "/maven-metadata.xml",
    ] {
        let (status, _, body) = send(fixture.app(), Method::GET, path).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{path}");
        assert!(body.is_empty(), "{path}");
    }
}

#[tokio::test]
async fn other_methods_fall_through() {
    let fixture = Fixture::new();
    let (status, _, _) = send(fixture.app(), Method::POST, JAR_PATH).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

// -- Artifact checksums -------------------------------------------------------

#[tokio::test]
async fn sha1_computed_when_no_sidecar() {
    let fixture = Fixture::new();
    let (status, headers, body) =
        send(fixture.app(), Method::GET, &format!("{JAR_PATH}.sha1")).await;
    assert_eq!(status, StatusCode::OK);
    let hex = String::from_utf8(body).unwrap();
    assert_eq!(hex.len(), 40);
    assert!(hex.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    assert_eq!(hex, digest_bytes(ChecksumAlgorithm::Sha1, JAR_BYTES));
    assert_eq!(content_length(&headers), 40);
}

#[tokio::test]
async fn md5_computed_when_no_sidecar() {
    let fixture = Fixture::new();
    let (status, _, body) = send(fixture.app(), Method::GET, &format!("{JAR_PATH}.md5")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        String::from_utf8(body).unwrap(),
        digest_bytes(ChecksumAlgorithm::Md5, JAR_BYTES)
    );
}

#[tokio::test]
async fn sidecar_served_verbatim() {
    let fixture = Fixture::new();
    let sidecar = b"b3e8f0c6d1a7e4f2a9c0d5b6e7f8a1b2c3d4e5f6  foo-plugin-1.2.0.jar\n";
    std::fs::write(fixture.dir.path().join("foo-plugin-1.2.0.jar.sha1"), sidecar).unwrap();

    let (status, headers, body) =
        send(fixture.app(), Method::GET, &format!("{JAR_PATH}.sha1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, sidecar);
    assert_eq!(content_length(&headers), sidecar.len() as u64);
}

#[tokio::test]
async fn head_on_checksum_has_length_and_no_body() {
    let fixture = Fixture::new();
    let (status, headers, body) =
        send(fixture.app(), Method::HEAD, &format!("{JAR_PATH}.sha1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_length(&headers), 40);
    assert!(body.is_empty());
}

#[tokio::test]
async fn checksum_of_unresolvable_artifact_is_404() {
    let fixture = Fixture::new();
    let (status, _, body) = send(
        fixture.app(),
        Method::GET,
        "/com/example/foo-plugin/9.9.9/foo-plugin-9.9.9.jar.md5",
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.is_empty());
}

// -- Metadata -----------------------------------------------------------------

#[tokio::test]
async fn metadata_from_known_plugin_version() {
    let app = app_with(MapResolver::default(), FailingRanges, foo_plugin_table());
    let (status, _, body) = send(app, Method::GET, METADATA_PATH).await;
    assert_eq!(status, StatusCode::OK);
    let xml = String::from_utf8(body).unwrap();
    assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
    assert!(xml.contains("<groupId>com.example</groupId>"));
    assert!(xml.contains("<artifactId>foo-plugin</artifactId>"));
    assert!(xml.contains("<latest>1.2.0</latest>"));
    assert!(xml.contains("<versions><version>1.2.0</version></versions>"));
    assert_eq!(xml.matches("<version>").count(), 1);
}

#[tokio::test]
async fn metadata_from_version_range() {
    let app = app_with(
        MapResolver::default(),
        FixedRanges(vec!["1.0.0", "1.1.0", "1.2.0"]),
        KnownPluginVersions::default(),
    );
    let (status, headers, body) = send(app, Method::GET, METADATA_PATH).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers["content-type"], "application/xml");
    let xml = String::from_utf8(body).unwrap();
    assert!(xml.contains("<latest>1.2.0</latest>"));
    assert!(xml.contains(concat!(
        "<versions>",
        "<version>1.0.0</version>",
        "<version>1.1.0</version>",
        "<version>1.2.0</version>",
        "</versions>",
    )));
    assert!(!xml.contains("<release>"));
    assert!(!xml.contains("<lastUpdated>"));
}

#[tokio::test]
async fn metadata_with_no_versions_is_404() {
    let app = app_with(
        MapResolver::default(),
        FixedRanges(vec![]),
        KnownPluginVersions::default(),
    );
    let (status, _, body) = send(app, Method::GET, METADATA_PATH).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.is_empty());
}

#[tokio::test]
async fn range_resolver_failure_is_500() {
    let app = app_with(MapResolver::default(), FailingRanges, KnownPluginVersions::default());
    let (status, _, body) = send(app, Method::GET, METADATA_PATH).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.is_empty());
}

#[tokio::test]
async fn metadata_digest_is_hash_of_document() {
    let app = || app_with(MapResolver::default(), FailingRanges, foo_plugin_table());
    let (_, _, document) = send(app(), Method::GET, METADATA_PATH).await;

    for alg in ChecksumAlgorithm::ALL {
        let (status, _, body) = send(app(), Method::GET, &format!("{METADATA_PATH}.{alg}")).await;
        assert_eq!(status, StatusCode::OK);
        let hex = String::from_utf8(body).unwrap();
        assert_eq!(hex, digest_bytes(alg, &document));
        assert!(!hex.contains('<'));
    }
}

#[tokio::test]
async fn head_on_metadata_writes_no_document() {
    let app = || app_with(MapResolver::default(), FailingRanges, foo_plugin_table());
    let (_, get_headers, _) = send(app(), Method::GET, METADATA_PATH).await;
    let (status, headers, body) = send(app(), Method::HEAD, METADATA_PATH).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());
    assert_eq!(content_length(&headers), content_length(&get_headers));
}

#[tokio::test]
async fn head_on_missing_metadata_is_404() {
    let app = app_with(
        MapResolver::default(),
        FixedRanges(vec![]),
        KnownPluginVersions::default(),
    );
    let (status, _, _) = send(app, Method::HEAD, METADATA_PATH).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// -- Real server --------------------------------------------------------------

fn local_repository_with_jar(root: &Path) -> AppState {
    let dir = root.join("com/example/foo-plugin/1.2.0");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("foo-plugin-1.2.0.jar"), JAR_BYTES).unwrap();
    std::fs::write(dir.join("foo-plugin-1.2.0.pom"), b"<project/>").unwrap();
    let repo = Arc::new(LocalRepository::new(vec![root.to_path_buf()]));
    AppState::new(repo.clone(), repo, KnownPluginVersions::default())
}

#[tokio::test]
async fn local_repository_does_not_serve_outside_its_root() {
    let outside = tempfile::Builder::new().prefix("outside").tempdir().unwrap();
    let secret_dir = outside.path().join("secret/1");
    std::fs::create_dir_all(&secret_dir).unwrap();
    std::fs::write(secret_dir.join("secret-1.txt"), b"TOP-SECRET").unwrap();

    let base = tempfile::tempdir().unwrap();
    let root = base.path().join("repo");
    std::fs::create_dir_all(root.join("g")).unwrap();
    std::fs::write(base.path().join("..-...jar"), b"TOP-SECRET").unwrap();
    let app = mrp_api::app(local_repository_with_jar(&root));

    // `/.tmp/x` would become the group `.tmp.x` and render as `/tmp/x`.
    let absolute = outside.path().to_str().unwrap();
    let dotted = format!("/.{}/secret/1/secret-1.txt", absolute.trim_start_matches('/'));
    for path in [
        dotted.as_str(),
        "/g/../../..-...jar",
        "/com/example/../maven-metadata.xml",
    ] {
        let (status, _, body) = send(app.clone(), Method::GET, path).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{path}");
        assert!(body.is_empty(), "{path}");
    }

    let (status, _, body) = send(app, Method::GET, JAR_PATH).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, JAR_BYTES);
}

async fn raw_request(addr: std::net::SocketAddr, method: &str, path: &str) -> String {
    let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
    let request = format!("{method} {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
    stream.write_all(request.as_bytes()).await.unwrap();
    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    String::from_utf8(response).unwrap()
}

#[tokio::test]
async fn real_server_serves_get_and_head() {
    let root = tempfile::tempdir().unwrap();
    let state = local_repository_with_jar(root.path());
    let server = ProxyServer::start(state, "127.0.0.1:0".parse().unwrap())
        .await
        .unwrap();

    let head = raw_request(server.local_addr(), "HEAD", JAR_PATH).await;
    assert!(head.starts_with("HTTP/1.1 200 OK\r\n"), "{head}");
    assert!(head.to_ascii_lowercase().contains("content-length: 37\r\n"), "{head}");
    assert!(head.ends_with("\r\n\r\n"), "{head}");

    let get = raw_request(server.local_addr(), "GET", JAR_PATH).await;
    assert!(get.starts_with("HTTP/1.1 200 OK\r\n"), "{get}");
    assert!(get.ends_with(std::str::from_utf8(JAR_BYTES).unwrap()), "{get}");

    let metadata = raw_request(server.local_addr(), "GET", METADATA_PATH).await;
    assert!(metadata.contains("<latest>1.2.0</latest>"), "{metadata}");

    let missing = raw_request(
        server.local_addr(),
        "GET",
        "/com/example/foo-plugin/2.0.0/foo-plugin-2.0.0.jar",
    )
    .await;
    assert!(missing.starts_with("HTTP/1.1 404 Not Found\r\n"), "{missing}");

    server.stop().await.unwrap();
}

#[tokio::test]
async fn stopped_server_refuses_connections() {
    let root = tempfile::tempdir().unwrap();
    let state = local_repository_with_jar(root.path());
    let server = ProxyServer::start(state, "127.0.0.1:0".parse().unwrap())
        .await
        .unwrap();
    let addr = server.local_addr();
    server.stop().await.unwrap();
    assert!(tokio::net::TcpStream::connect(addr).await.is_err());
}
