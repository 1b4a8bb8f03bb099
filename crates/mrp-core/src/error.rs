//! # Error Taxonomy
//!
//! Every way a single request can fail, and which outcome class it
//! belongs to.
//!
//! | Failure                   | Source                      | Class    |
//! |---------------------------|-----------------------------|----------|
//! | Malformed path            | [`PathError`]               | NotFound |
//! | Artifact not resolvable   | [`ResolutionError`]         | NotFound |
//! | Empty version set         | [`MetadataError::NoVersions`] | NotFound |
//! | Range resolver failure    | [`RangeResolutionError`]    | Internal |
//! | Reading bytes to hash     | [`DigestError`]             | Internal |
//! | Metadata serialization    | [`MetadataError::Serialization`] | Internal |
//! | Reading the resolved file | [`ProxyError::Io`]          | Internal |
//!
//! Not-found outcomes are routine: clients probe for optional files all the
//! time. Internal outcomes indicate an environment or configuration defect.

use std::path::PathBuf;

use thiserror::Error;

use crate::checksum::DigestError;
use crate::metadata::MetadataError;
use crate::path::PathError;
use crate::resolver::{RangeResolutionError, ResolutionError};

/// Outcome class of a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The requested file does not exist in this repository view.
    NotFound,
    /// The server could not produce a response it should have been able to.
    Internal,
}

/// Top-level error for one proxied request.
#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("malformed repository path: {0}")]
    MalformedPath(#[from] PathError),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error(transparent)]
    Digest(#[from] DigestError),

    /// The resolved file could not be opened or read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A blocking task panicked or was cancelled.
    #[error("request task failed: {0}")]
    Task(String),
}

impl ProxyError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::MalformedPath(_) | Self::Resolution(_) => ErrorClass::NotFound,
            Self::Metadata(MetadataError::NoVersions(_)) => ErrorClass::NotFound,
            Self::Metadata(_) | Self::Digest(_) | Self::Io { .. } | Self::Task(_) => {
                ErrorClass::Internal
            }
        }
    }
}

impl From<RangeResolutionError> for ProxyError {
    fn from(err: RangeResolutionError) -> Self {
        Self::Metadata(MetadataError::RangeResolution(err))
    }
}
