//! # Coordinates
//!
//! The two request shapes the Path Grammar produces: an
//! [`ArtifactCoordinate`] naming one file, and a [`MetadataRequest`] naming
//! a group:artifact pair whose versions are being asked for.
//!
//! Both types are immutable once built and validate their invariants in
//! the constructor, so a value in hand is always well-formed.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::checksum::ChecksumAlgorithm;

/// File name of the repository metadata document.
pub const METADATA_FILE_NAME: &str = "maven-metadata.xml";

/// A coordinate field failed validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoordinateError {
    /// A mandatory field was empty.
    #[error("{0} must not be empty")]
    Empty(&'static str),

    /// The extension is itself a checksum algorithm name.
    #[error("extension `{0}` names a checksum algorithm")]
    ChecksumExtension(String),

    /// A field would not map onto a single directory or file name.
    #[error("{field} `{value}` is not a valid repository path segment")]
    InvalidSegment { field: &'static str, value: String },
}

/// Build the `groupId:artifactId` key used by the known plugin versions table.
pub fn plugin_key(group_id: &str, artifact_id: &str) -> String {
    format!("{group_id}:{artifact_id}")
}

// -- ArtifactCoordinate -------------------------------------------------------

/// The (group, artifact, version, classifier, extension) tuple identifying
/// one artifact file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ArtifactCoordinate {
    group_id: String,
    artifact_id: String,
    version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    classifier: Option<String>,
    extension: String,
}

impl ArtifactCoordinate {
    /// Create a coordinate, rejecting empty fields and checksum extensions.
    ///
    /// An empty classifier is rejected rather than treated as absent; pass
    /// `None` for an unclassified artifact.
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
        classifier: Option<String>,
        extension: impl Into<String>,
    ) -> Result<Self, CoordinateError> {
        let coordinate = Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
            classifier,
            extension: extension.into(),
        };
        coordinate.validate()?;
        Ok(coordinate)
    }

    fn validate(&self) -> Result<(), CoordinateError> {
        if self.group_id.is_empty() {
            return Err(CoordinateError::Empty("groupId"));
        }
        if self.artifact_id.is_empty() {
            return Err(CoordinateError::Empty("artifactId"));
        }
        if self.version.is_empty() {
            return Err(CoordinateError::Empty("version"));
        }
        if matches!(self.classifier.as_deref(), Some("")) {
            return Err(CoordinateError::Empty("classifier"));
        }
        if self.extension.is_empty() {
            return Err(CoordinateError::Empty("extension"));
        }
        check_group(&self.group_id)?;
        check_directory("artifactId", &self.artifact_id)?;
        check_directory("version", &self.version)?;
        if let Some(classifier) = &self.classifier {
            check_file_part("classifier", classifier)?;
        }
        check_file_part("extension", &self.extension)?;
        let last = self
            .extension
            .rsplit_once('.')
            .map_or(self.extension.as_str(), |(_, last)| last);
        if ChecksumAlgorithm::from_suffix(last).is_some() {
            return Err(CoordinateError::ChecksumExtension(self.extension.clone()));
        }
        Ok(())
    }

    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    pub fn artifact_id(&self) -> &str {
        &self.artifact_id
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn classifier(&self) -> Option<&str> {
        self.classifier.as_deref()
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// File name in the standard layout: `artifactId-version[-classifier].extension`.
    pub fn file_name(&self) -> String {
        match &self.classifier {
            Some(classifier) => format!(
                "{}-{}-{}.{}",
                self.artifact_id, self.version, classifier, self.extension
            ),
            None => format!("{}-{}.{}", self.artifact_id, self.version, self.extension),
        }
    }

    /// Repository-relative path of the artifact file, without a leading slash.
    pub fn repository_path(&self) -> String {
        format!(
            "{}/{}/{}/{}",
            group_path(&self.group_id),
            self.artifact_id,
            self.version,
            self.file_name()
        )
    }
}

impl fmt::Display for ArtifactCoordinate {
    /// Renders `groupId:artifactId:extension[:classifier]:version`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.extension)?;
        if let Some(classifier) = &self.classifier {
            write!(f, ":{classifier}")?;
        }
        write!(f, ":{}", self.version)
    }
}

// -- MetadataRequest ----------------------------------------------------------

/// A request for the known versions of a group:artifact pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct MetadataRequest {
    group_id: String,
    artifact_id: String,
}

impl MetadataRequest {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
    ) -> Result<Self, CoordinateError> {
        let group_id = group_id.into();
        let artifact_id = artifact_id.into();
        if group_id.is_empty() {
            return Err(CoordinateError::Empty("groupId"));
        }
        if artifact_id.is_empty() {
            return Err(CoordinateError::Empty("artifactId"));
        }
        check_group(&group_id)?;
        check_directory("artifactId", &artifact_id)?;
        Ok(Self {
            group_id,
            artifact_id,
        })
    }

    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    pub fn artifact_id(&self) -> &str {
        &self.artifact_id
    }

    /// Key into the known plugin versions table.
    pub fn plugin_key(&self) -> String {
        plugin_key(&self.group_id, &self.artifact_id)
    }

    /// Repository-relative path of the metadata document.
    pub fn repository_path(&self) -> String {
        format!(
            "{}/{}/{}",
            group_path(&self.group_id),
            self.artifact_id,
            METADATA_FILE_NAME
        )
    }
}

impl fmt::Display for MetadataRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group_id, self.artifact_id)
    }
}

/// Convert a dotted group id to its directory form.
pub fn group_path(group_id: &str) -> String {
    group_id.replace('.', "/")
}

fn invalid(field: &'static str, value: &str) -> CoordinateError {
    CoordinateError::InvalidSegment {
        field,
        value: value.to_string(),
    }
}

fn has_separator(value: &str) -> bool {
    value.contains(['/', '\\'])
}

/// Every dotted component must become a plain directory name.
fn check_group(group_id: &str) -> Result<(), CoordinateError> {
    if group_id
        .split('.')
        .any(|part| part.is_empty() || has_separator(part))
    {
        return Err(invalid("groupId", group_id));
    }
    Ok(())
}

fn check_directory(field: &'static str, value: &str) -> Result<(), CoordinateError> {
    if value == "." || value == ".." || has_separator(value) {
        return Err(invalid(field, value));
    }
    Ok(())
}

fn check_file_part(field: &'static str, value: &str) -> Result<(), CoordinateError> {
    if has_separator(value) {
        return Err(invalid(field, value));
    }
    Ok(())
}
