//! # Path Grammar
//!
//! Classifies a repository-relative path (leading `/` already removed)
//! into an artifact request or a metadata request.
//!
//! ## Order of Operations
//!
//! 1. Strip a trailing `.md5` / `.sha1` from the whole path and remember
//!    the algorithm. Stripping first is what lets `maven-metadata.xml.sha1`
//!    reach the metadata branch.
//! 2. A path ending in `/maven-metadata.xml` with at least one group
//!    segment is a [`MetadataRequest`].
//! 3. Anything else must read, from the right,
//!    `<group-path>/<artifactId>/<version>/<artifactId>-<version><rest>`
//!    where `<rest>` is `.<extension>` or `-<classifier>.<extension>`.
//!
//! `/` is the only separator. There is no partial result: a path either
//! parses completely or yields a [`PathError`], which callers treat as
//! not-found.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::checksum::ChecksumAlgorithm;
use crate::coordinate::{ArtifactCoordinate, CoordinateError, MetadataRequest, METADATA_FILE_NAME};

/// Why a path did not match the repository layout.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// Fewer than the required `/`-separated segments.
    #[error("expected <group>/<artifactId>/<version>/<file>")]
    TooFewSegments,

    /// The metadata file has no group directory above its artifact directory.
    #[error("metadata path needs <group>/<artifactId>/maven-metadata.xml")]
    MetadataWithoutGroup,

    /// The file name does not start with `<artifactId>-<version>`.
    #[error("file name `{file}` does not start with `{expected}`")]
    ForeignFile { file: String, expected: String },

    /// Nothing follows `<artifactId>-<version>` in the file name.
    #[error("file name has no extension")]
    MissingExtension,

    /// A classifier dash is not followed by a `.` and extension.
    #[error("classifier has no following extension")]
    ClassifierWithoutExtension,

    /// The text after `<artifactId>-<version>` starts with neither `-` nor `.`.
    #[error("unexpected `{0}` after version in file name")]
    UnexpectedSeparator(char),

    /// The pieces parsed but violate a coordinate invariant.
    #[error(transparent)]
    InvalidCoordinate(#[from] CoordinateError),
}

/// What a parsed path refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RequestTarget {
    Artifact(ArtifactCoordinate),
    Metadata(MetadataRequest),
}

/// A fully classified repository request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryRequest {
    pub target: RequestTarget,
    /// Set when the path asked for a checksum of the target rather than the target.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checksum: Option<ChecksumAlgorithm>,
}

impl RepositoryRequest {
    /// Strip any checksum suffix, then classify the remaining path.
    pub fn parse(path: &str) -> Result<Self, PathError> {
        let (stripped, checksum) = ChecksumAlgorithm::strip_suffix(path);
        let target = parse_target(stripped)?;
        Ok(Self { target, checksum })
    }
}

impl fmt::Display for RepositoryRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            RequestTarget::Artifact(coordinate) => write!(f, "artifact {coordinate}")?,
            RequestTarget::Metadata(request) => write!(f, "metadata {request}")?,
        }
        if let Some(alg) = self.checksum {
            write!(f, " ({alg})")?;
        }
        Ok(())
    }
}

/// Classify a path that carries no checksum suffix.
pub fn parse_target(path: &str) -> Result<RequestTarget, PathError> {
    if path == METADATA_FILE_NAME || path.ends_with(&format!("/{METADATA_FILE_NAME}")) {
        return parse_metadata_path(path).map(RequestTarget::Metadata);
    }
    parse_artifact_path(path).map(RequestTarget::Artifact)
}

/// Parse `<group-path>/<artifactId>/maven-metadata.xml`.
pub fn parse_metadata_path(path: &str) -> Result<MetadataRequest, PathError> {
    let file_slash = path.rfind('/').ok_or(PathError::MetadataWithoutGroup)?;
    let artifact_slash = path[..file_slash]
        .rfind('/')
        .ok_or(PathError::MetadataWithoutGroup)?;
    let group_id = path[..artifact_slash].replace('/', ".");
    let artifact_id = &path[artifact_slash + 1..file_slash];
    Ok(MetadataRequest::new(group_id, artifact_id)?)
}

/// Parse `<group-path>/<artifactId>/<version>/<artifactId>-<version>[-<classifier>].<extension>`.
pub fn parse_artifact_path(path: &str) -> Result<ArtifactCoordinate, PathError> {
    let file_slash = path.rfind('/').ok_or(PathError::TooFewSegments)?;
    let version_slash = path[..file_slash]
        .rfind('/')
        .ok_or(PathError::TooFewSegments)?;
    let artifact_slash = path[..version_slash]
        .rfind('/')
        .ok_or(PathError::TooFewSegments)?;

    let group_id = path[..artifact_slash].replace('/', ".");
    let artifact_id = &path[artifact_slash + 1..version_slash];
    let version = &path[version_slash + 1..file_slash];
    let file = &path[file_slash + 1..];

    let expected = format!("{artifact_id}-{version}");
    let remainder = file
        .strip_prefix(expected.as_str())
        .ok_or_else(|| PathError::ForeignFile {
            file: file.to_string(),
            expected: expected.clone(),
        })?;

    let (classifier, extension) = split_remainder(remainder)?;
    Ok(ArtifactCoordinate::new(
        group_id,
        artifact_id,
        version,
        classifier.map(str::to_string),
        extension,
    )?)
}

/// Split `.ext` or `-classifier.ext`.
fn split_remainder(remainder: &str) -> Result<(Option<&str>, &str), PathError> {
    let mut chars = remainder.chars();
    match chars.next() {
        None => Err(PathError::MissingExtension),
        Some('-') => {
            let rest = chars.as_str();
            let dot = rest.find('.').ok_or(PathError::ClassifierWithoutExtension)?;
            Ok((Some(&rest[..dot]), &rest[dot + 1..]))
        }
        Some('.') => Ok((None, chars.as_str())),
        Some(other) => Err(PathError::UnexpectedSeparator(other)),
    }
}
