//! # Local Repository Resolver
//!
//! Directory-backed implementation of both resolver capabilities, for
//! running the proxy without a build tool attached. Each root is laid out
//! like a Maven repository (`~/.m2/repository`, a staged reactor output,
//! an unpacked distribution). Roots are searched in order; the first match
//! wins.
//!
//! Lookups never leave a root: every relative path is checked to consist
//! of plain names only before it is joined.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::coordinate::{group_path, ArtifactCoordinate};
use crate::resolver::{
    ArtifactResolver, RangeResolutionError, ResolutionError, ResolvedFile, VersionRangeRequest,
    VersionRangeResolver, VersionRangeResult,
};
use crate::version::MavenVersion;

/// Resolves artifacts and version ranges from directories in repository layout.
#[derive(Debug, Clone, Default)]
pub struct LocalRepository {
    roots: Vec<PathBuf>,
}

impl LocalRepository {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }
}

/// Join `relative` under `root`, refusing anything but plain names.
fn confined(root: &Path, relative: impl AsRef<Path>) -> Option<PathBuf> {
    let relative = relative.as_ref();
    let plain = relative
        .components()
        .all(|component| matches!(component, Component::Normal(_)));
    if !plain {
        return None;
    }
    let joined = root.join(relative);
    joined.starts_with(root).then_some(joined)
}

impl ArtifactResolver for LocalRepository {
    fn resolve(&self, coordinate: &ArtifactCoordinate) -> Result<ResolvedFile, ResolutionError> {
        let relative = coordinate.repository_path();
        for root in &self.roots {
            let Some(candidate) = confined(root, &relative) else {
                tracing::warn!(
                    %coordinate,
                    root = %root.display(),
                    "refusing path outside repository root"
                );
                break;
            };
            if !candidate.is_file() {
                continue;
            }
            return ResolvedFile::from_path(&candidate).map_err(|e| ResolutionError::Failed {
                coordinate: coordinate.to_string(),
                reason: format!("{}: {e}", candidate.display()),
            });
        }
        Err(ResolutionError::NotFound {
            coordinate: coordinate.to_string(),
        })
    }
}

impl VersionRangeResolver for LocalRepository {
    fn resolve_range(
        &self,
        request: &VersionRangeRequest,
    ) -> Result<VersionRangeResult, RangeResolutionError> {
        let range = LowerBound::parse(&request.range)?;

        let relative = format!("{}/{}", group_path(&request.group_id), request.artifact_id);
        let mut found: BTreeSet<String> = BTreeSet::new();
        for root in &self.roots {
            let Some(dir) = confined(root, &relative) else {
                tracing::warn!(
                    request = %request.describe(),
                    root = %root.display(),
                    "refusing path outside repository root"
                );
                break;
            };
            let entries = match fs::read_dir(&dir) {
                Ok(entries) => entries,
                Err(_) => continue,
            };
            for entry in entries.flatten() {
                let Ok(version) = entry.file_name().into_string() else {
                    continue;
                };
                if has_file(&entry.path(), request, &version) && range.contains(&version) {
                    found.insert(version);
                }
            }
        }

        let mut versions: Vec<MavenVersion> = found.iter().map(|v| MavenVersion::new(v)).collect();
        versions.sort();
        Ok(VersionRangeResult::new(
            versions.iter().map(|v| v.as_str().to_string()).collect(),
        ))
    }
}

fn has_file(version_dir: &Path, request: &VersionRangeRequest, version: &str) -> bool {
    let file_name = if request.classifier.is_empty() {
        format!("{}-{}.{}", request.artifact_id, version, request.extension)
    } else {
        format!(
            "{}-{}-{}.{}",
            request.artifact_id, version, request.classifier, request.extension
        )
    };
    confined(version_dir, file_name).is_some_and(|path| path.is_file())
}

/// An open-ended range: `[lower,)` (inclusive) or `(lower,)` (exclusive).
#[derive(Debug)]
struct LowerBound {
    version: MavenVersion,
    inclusive: bool,
}

impl LowerBound {
    fn parse(range: &str) -> Result<Self, RangeResolutionError> {
        let unsupported = || RangeResolutionError::UnsupportedRange(range.to_string());
        let inner = range.trim().strip_suffix(",)").ok_or_else(unsupported)?;
        let (inclusive, lower) = if let Some(lower) = inner.strip_prefix('[') {
            (true, lower)
        } else if let Some(lower) = inner.strip_prefix('(') {
            (false, lower)
        } else {
            return Err(unsupported());
        };
        if lower.is_empty() || lower.contains(',') {
            return Err(unsupported());
        }
        Ok(Self {
            version: MavenVersion::new(lower),
            inclusive,
        })
    }

    fn contains(&self, version: &str) -> bool {
        let version = MavenVersion::new(version);
        if self.inclusive {
            version >= self.version
        } else {
            version > self.version
        }
    }
}
