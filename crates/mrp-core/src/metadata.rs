//! # Metadata Synthesizer
//!
//! Produces `maven-metadata.xml` for a group:artifact pair that has no
//! static metadata. Versions come from, in order:
//!
//! 1. The [`KnownPluginVersions`] table (build configuration). A hit yields
//!    exactly that one version.
//! 2. The [`VersionRangeResolver`], asked for every version of the pair's
//!    POM. An empty answer is a not-found outcome.
//!
//! The document shape is fixed:
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <metadata>
//!   <groupId>…</groupId>
//!   <artifactId>…</artifactId>
//!   <versioning>
//!     <latest>…</latest>
//!     <versions><version>…</version>…</versions>
//!   </versioning>
//! </metadata>
//! ```
//!
//! No `release`, no `lastUpdated`.

use std::collections::BTreeMap;
use std::io::Write;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use thiserror::Error;

use crate::coordinate::{plugin_key, MetadataRequest};
use crate::resolver::{RangeResolutionError, VersionRangeRequest, VersionRangeResolver};

/// Errors while producing a metadata document.
#[derive(Error, Debug)]
pub enum MetadataError {
    /// Neither the plugin table nor the range resolver knows any version.
    #[error("no versions known for {0}")]
    NoVersions(String),

    /// The range resolver failed outright.
    #[error(transparent)]
    RangeResolution(#[from] RangeResolutionError),

    /// Writing the XML document failed.
    #[error("failed to serialize metadata document: {0}")]
    Serialization(String),
}

// -- KnownPluginVersions ------------------------------------------------------

/// Immutable `groupId:artifactId → version` table from build configuration.
///
/// Loaded once at startup and shared read-only across requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnownPluginVersions {
    versions: BTreeMap<String, String>,
}

impl KnownPluginVersions {
    pub fn new(versions: BTreeMap<String, String>) -> Self {
        Self { versions }
    }

    pub fn get(&self, group_id: &str, artifact_id: &str) -> Option<&str> {
        self.versions
            .get(&plugin_key(group_id, artifact_id))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.versions.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for KnownPluginVersions {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

// -- VersionSet ---------------------------------------------------------------

/// The versions a metadata document advertises.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionSet {
    latest: String,
    versions: Vec<String>,
}

impl VersionSet {
    /// A set holding exactly one version.
    pub fn single(version: impl Into<String>) -> Self {
        let version = version.into();
        Self {
            latest: version.clone(),
            versions: vec![version],
        }
    }

    /// A set with an explicit latest. Returns `None` when `versions` is empty.
    pub fn new(latest: impl Into<String>, versions: Vec<String>) -> Option<Self> {
        if versions.is_empty() {
            return None;
        }
        Some(Self {
            latest: latest.into(),
            versions,
        })
    }

    pub fn latest(&self) -> &str {
        &self.latest
    }

    pub fn versions(&self) -> &[String] {
        &self.versions
    }
}

// -- Synthesis ----------------------------------------------------------------

/// Determine the versions to advertise for `request`.
pub fn synthesize(
    request: &MetadataRequest,
    plugins: &KnownPluginVersions,
    ranges: &dyn VersionRangeResolver,
) -> Result<VersionSet, MetadataError> {
    if let Some(version) = plugins.get(request.group_id(), request.artifact_id()) {
        tracing::debug!(
            key = %request.plugin_key(),
            version,
            "generating metadata from known plugin version"
        );
        return Ok(VersionSet::single(version));
    }

    let range_request =
        VersionRangeRequest::all_pom_versions(request.group_id(), request.artifact_id());
    let result = ranges.resolve_range(&range_request)?;
    let Some(latest) = result.highest().map(str::to_string) else {
        return Err(MetadataError::NoVersions(request.to_string()));
    };
    tracing::debug!(
        %request,
        %latest,
        count = result.versions.len(),
        "generating metadata from version range"
    );
    VersionSet::new(latest, result.versions)
        .ok_or_else(|| MetadataError::NoVersions(request.to_string()))
}

/// Write the metadata document for `request` to `out`.
pub fn write_metadata<W: Write>(
    out: W,
    request: &MetadataRequest,
    versions: &VersionSet,
) -> Result<(), MetadataError> {
    let mut writer = Writer::new(out);
    emit(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    start(&mut writer, "metadata")?;
    text_element(&mut writer, "groupId", request.group_id())?;
    text_element(&mut writer, "artifactId", request.artifact_id())?;
    start(&mut writer, "versioning")?;
    text_element(&mut writer, "latest", versions.latest())?;
    start(&mut writer, "versions")?;
    for version in versions.versions() {
        text_element(&mut writer, "version", version)?;
    }
    end(&mut writer, "versions")?;
    end(&mut writer, "versioning")?;
    end(&mut writer, "metadata")?;
    writer
        .into_inner()
        .flush()
        .map_err(|e| MetadataError::Serialization(e.to_string()))
}

/// Render the metadata document into a buffer.
pub fn render_metadata(
    request: &MetadataRequest,
    versions: &VersionSet,
) -> Result<Vec<u8>, MetadataError> {
    let mut buf = Vec::new();
    write_metadata(&mut buf, request, versions)?;
    Ok(buf)
}

fn emit<W: Write>(writer: &mut Writer<W>, event: Event<'_>) -> Result<(), MetadataError> {
    writer
        .write_event(event)
        .map_err(|e| MetadataError::Serialization(e.to_string()))
}

fn start<W: Write>(writer: &mut Writer<W>, name: &str) -> Result<(), MetadataError> {
    emit(writer, Event::Start(BytesStart::new(name)))
}

fn end<W: Write>(writer: &mut Writer<W>, name: &str) -> Result<(), MetadataError> {
    emit(writer, Event::End(BytesEnd::new(name)))
}

fn text_element<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    text: &str,
) -> Result<(), MetadataError> {
    start(writer, name)?;
    emit(writer, Event::Text(BytesText::new(text)))?;
    end(writer, name)
}
