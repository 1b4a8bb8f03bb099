//! # Checksum Adapter
//!
//! Recognises checksum requests (`<file>.md5`, `<file>.sha1`) and satisfies
//! them without asking the artifact resolver for files it was never meant
//! to produce.
//!
//! ## Resolution Order
//!
//! 1. A sidecar file `<resolvedFileName>.<algorithm>` next to the resolved
//!    artifact is served verbatim.
//! 2. Otherwise the resolved bytes are streamed through the hash and the
//!    digest is returned as lowercase hex with no trailing newline.
//!
//! All hashing, for files and for generated metadata alike, goes through
//! [`DigestWriter`]: a `Write` sink that feeds the hash and discards the
//! bytes.

use std::fmt;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use md5::Md5;
use serde::Serialize;
use sha1::{Digest, Sha1};
use thiserror::Error;

use crate::resolver::ResolvedFile;

/// Errors from checksum computation. Always internal: the request was
/// well-formed but the server could not produce the digest.
#[derive(Error, Debug)]
pub enum DigestError {
    /// Reading the bytes to hash failed.
    #[error("failed to read {path} for hashing: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

// -- ChecksumAlgorithm --------------------------------------------------------

/// Checksum algorithms served as `.md5` / `.sha1` sidecars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChecksumAlgorithm {
    /// MD5, 128-bit.
    Md5,
    /// SHA-1, 160-bit.
    Sha1,
}

impl ChecksumAlgorithm {
    pub const ALL: [ChecksumAlgorithm; 2] = [Self::Md5, Self::Sha1];

    /// The file suffix, which doubles as the algorithm name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
        }
    }

    /// Match a file suffix exactly (case-sensitive, as in repository layout).
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|alg| alg.as_str() == suffix)
    }

    /// Split a trailing `.md5` / `.sha1` off a path.
    ///
    /// Only the text after the last `.` is inspected. Returns the path
    /// unchanged and `None` when there is no checksum suffix.
    pub fn strip_suffix(path: &str) -> (&str, Option<Self>) {
        match path.rsplit_once('.') {
            Some((rest, suffix)) => match Self::from_suffix(suffix) {
                Some(alg) => (rest, Some(alg)),
                None => (path, None),
            },
            None => (path, None),
        }
    }

    fn hasher(&self) -> Hasher {
        match self {
            Self::Md5 => Hasher::Md5(Md5::new()),
            Self::Sha1 => Hasher::Sha1(Sha1::new()),
        }
    }
}

impl fmt::Display for ChecksumAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// -- DigestWriter -------------------------------------------------------------

enum Hasher {
    Md5(Md5),
    Sha1(Sha1),
}

impl Hasher {
    fn update(&mut self, data: &[u8]) {
        match self {
            Self::Md5(h) => h.update(data),
            Self::Sha1(h) => h.update(data),
        }
    }

    fn finalize(self) -> Vec<u8> {
        match self {
            Self::Md5(h) => h.finalize().to_vec(),
            Self::Sha1(h) => h.finalize().to_vec(),
        }
    }
}

/// A discarding `Write` sink that hashes everything written to it.
pub struct DigestWriter {
    algorithm: ChecksumAlgorithm,
    hasher: Hasher,
}

impl DigestWriter {
    pub fn new(algorithm: ChecksumAlgorithm) -> Self {
        Self {
            algorithm,
            hasher: algorithm.hasher(),
        }
    }

    /// Consume the sink and return the digest as lowercase hex.
    pub fn finish(self) -> String {
        self.hasher
            .finalize()
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect()
    }
}

impl Write for DigestWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.hasher.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl fmt::Debug for DigestWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DigestWriter")
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}

/// Hash an arbitrary byte slice.
pub fn digest_bytes(algorithm: ChecksumAlgorithm, data: &[u8]) -> String {
    let mut sink = DigestWriter::new(algorithm);
    sink.hasher.update(data);
    sink.finish()
}

/// Stream a reader to its end through the hash.
pub fn digest_reader<R: Read>(algorithm: ChecksumAlgorithm, reader: &mut R) -> io::Result<String> {
    let mut sink = DigestWriter::new(algorithm);
    io::copy(reader, &mut sink)?;
    Ok(sink.finish())
}

/// Stream a file's full contents through the hash.
pub fn digest_file(algorithm: ChecksumAlgorithm, path: &Path) -> Result<String, DigestError> {
    let io_err = |source| DigestError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut file = File::open(path).map_err(io_err)?;
    digest_reader(algorithm, &mut file).map_err(io_err)
}

// -- Sidecar-or-compute -------------------------------------------------------

/// What to send for an artifact checksum request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChecksumBody {
    /// An existing sidecar file, served byte-for-byte.
    Sidecar(ResolvedFile),
    /// A digest computed from the artifact bytes, as lowercase hex.
    Computed(String),
}

/// Produce the checksum of a resolved artifact, preferring a sidecar file.
pub fn artifact_checksum(
    file: &ResolvedFile,
    algorithm: ChecksumAlgorithm,
) -> Result<ChecksumBody, DigestError> {
    let sidecar = file.sidecar_path(algorithm);
    if sidecar.is_file() {
        let resolved = ResolvedFile::from_path(&sidecar).map_err(|source| DigestError::Io {
            path: sidecar.clone(),
            source,
        })?;
        tracing::debug!(sidecar = %sidecar.display(), "serving existing checksum file");
        return Ok(ChecksumBody::Sidecar(resolved));
    }
    let checksum = digest_file(algorithm, file.path())?;
    tracing::debug!(
        file = %file.path().display(),
        %algorithm,
        %checksum,
        "computed checksum"
    );
    Ok(ChecksumBody::Computed(checksum))
}
