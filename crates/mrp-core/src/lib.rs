//! # mrp-core: Request Translation for the Maven Resolver Proxy
//!
//! The resolver proxy emulates the standard Maven repository layout over
//! HTTP so that tooling which only understands repository URLs can read
//! artifacts that live in a local build's resolved dependency graph or
//! reactor output. This crate holds everything that is not HTTP:
//!
//! - **Path Grammar** ([`path`]): classify a repository-relative path as an
//!   artifact request, a `maven-metadata.xml` request, or malformed, after
//!   stripping any checksum suffix.
//! - **Checksum Adapter** ([`checksum`]): recognise `.md5`/`.sha1` suffixes,
//!   prefer sidecar files, otherwise hash the resolved bytes.
//! - **Metadata Synthesizer** ([`metadata`]): build a `maven-metadata.xml`
//!   document from the known plugin versions or a version-range lookup.
//! - **Capabilities** ([`resolver`]): the artifact resolver and version-range
//!   resolver contracts, plus a directory-backed implementation ([`local`]).
//!
//! ## Crate Policy
//!
//! - No HTTP types. The dispatcher in `mrp-api` owns status codes.
//! - No cross-request mutable state. The only shared value is the immutable
//!   [`KnownPluginVersions`] table.
//! - No `.unwrap()` outside tests.

pub mod checksum;
pub mod coordinate;
pub mod error;
pub mod local;
pub mod metadata;
pub mod path;
pub mod resolver;
pub mod version;

// Re-export primary types for ergonomic imports.
pub use checksum::{ChecksumAlgorithm, ChecksumBody, DigestWriter};
pub use coordinate::{ArtifactCoordinate, MetadataRequest};
pub use error::{ErrorClass, ProxyError};
pub use local::LocalRepository;
pub use metadata::{KnownPluginVersions, VersionSet};
pub use path::{PathError, RepositoryRequest, RequestTarget};
pub use resolver::{
    ArtifactResolver, RangeResolutionError, ResolutionError, ResolvedFile, VersionRangeRequest,
    VersionRangeResolver, VersionRangeResult,
};
pub use version::MavenVersion;
