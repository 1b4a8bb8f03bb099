//! # Resolver Capabilities
//!
//! The proxy never locates artifacts itself. It depends on two injected
//! capabilities:
//!
//! - [`ArtifactResolver`]: coordinate → local file, or a not-found error.
//! - [`VersionRangeResolver`]: group:artifact plus a range → the known
//!   versions, in the resolver's own order.
//!
//! Both are synchronous and may block on disk or network I/O. Callers in
//! async contexts run them on a blocking thread.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::checksum::ChecksumAlgorithm;
use crate::coordinate::ArtifactCoordinate;
use crate::version::MavenVersion;

/// Range matching every version: `[0,)`.
pub const ANY_VERSION_RANGE: &str = "[0,)";

/// Errors from an [`ArtifactResolver`]. Always a not-found outcome.
#[derive(Error, Debug)]
pub enum ResolutionError {
    /// No source knows this coordinate.
    #[error("artifact {coordinate} could not be resolved")]
    NotFound { coordinate: String },

    /// A source knows the coordinate but could not produce the file.
    #[error("artifact {coordinate} could not be resolved: {reason}")]
    Failed { coordinate: String, reason: String },
}

/// Errors from a [`VersionRangeResolver`].
#[derive(Error, Debug)]
pub enum RangeResolutionError {
    /// The range expression is not understood by this resolver.
    #[error("unsupported version range: {0}")]
    UnsupportedRange(String),

    /// The lookup itself failed.
    #[error("version range resolution failed for {coordinate}: {reason}")]
    Failed { coordinate: String, reason: String },
}

// -- ResolvedFile -------------------------------------------------------------

/// A local file produced by a resolver, with its size at resolution time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFile {
    path: PathBuf,
    size: u64,
}

impl ResolvedFile {
    pub fn new(path: impl Into<PathBuf>, size: u64) -> Self {
        Self {
            path: path.into(),
            size,
        }
    }

    /// Stat a path and wrap it.
    pub fn from_path(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let size = fs::metadata(path)?.len();
        Ok(Self::new(path, size))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Path of the `<file>.<algorithm>` sidecar next to this file.
    pub fn sidecar_path(&self, algorithm: ChecksumAlgorithm) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".");
        name.push(algorithm.as_str());
        self.path.with_file_name(name)
    }
}

// -- ArtifactResolver ---------------------------------------------------------

/// Locates the local file for an artifact coordinate.
pub trait ArtifactResolver: Send + Sync {
    fn resolve(&self, coordinate: &ArtifactCoordinate) -> Result<ResolvedFile, ResolutionError>;
}

// -- VersionRangeResolver -----------------------------------------------------

/// Query for all versions of a coordinate inside a range.
///
/// For metadata synthesis this is the "virtual parent POM" of the pair:
/// no classifier, `pom` extension, range [`ANY_VERSION_RANGE`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRangeRequest {
    pub group_id: String,
    pub artifact_id: String,
    pub classifier: String,
    pub extension: String,
    pub range: String,
}

impl VersionRangeRequest {
    /// Every version of the POM of `group_id:artifact_id`.
    pub fn all_pom_versions(group_id: &str, artifact_id: &str) -> Self {
        Self {
            group_id: group_id.to_string(),
            artifact_id: artifact_id.to_string(),
            classifier: String::new(),
            extension: "pom".to_string(),
            range: ANY_VERSION_RANGE.to_string(),
        }
    }

    /// `groupId:artifactId:extension[:classifier]:range` for logs.
    pub fn describe(&self) -> String {
        if self.classifier.is_empty() {
            format!(
                "{}:{}:{}:{}",
                self.group_id, self.artifact_id, self.extension, self.range
            )
        } else {
            format!(
                "{}:{}:{}:{}:{}",
                self.group_id, self.artifact_id, self.extension, self.classifier, self.range
            )
        }
    }
}

/// Versions returned by a [`VersionRangeResolver`], in the resolver's order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionRangeResult {
    pub versions: Vec<String>,
}

impl VersionRangeResult {
    pub fn new(versions: Vec<String>) -> Self {
        Self { versions }
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// Highest version by Maven precedence. Ties keep the later entry.
    pub fn highest(&self) -> Option<&str> {
        self.versions
            .iter()
            .max_by(|a, b| MavenVersion::new(a).cmp(&MavenVersion::new(b)))
            .map(String::as_str)
    }
}

/// Lists the known versions of a coordinate within a range.
pub trait VersionRangeResolver: Send + Sync {
    fn resolve_range(
        &self,
        request: &VersionRangeRequest,
    ) -> Result<VersionRangeResult, RangeResolutionError>;
}
