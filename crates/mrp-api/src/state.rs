//! # Application State
//!
//! Shared state for the Axum application, passed to the repository handler
//! via the `State` extractor.
//!
//! ## Architecture
//!
//! AppState holds only read-only collaborators:
//! - **Artifact resolver**: coordinate → local file
//! - **Version range resolver**: group:artifact → known versions
//! - **Known plugin versions**: build configuration, fixed at startup
//!
//! Nothing here is mutated after construction.

use std::collections::BTreeMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use mrp_core::{ArtifactResolver, KnownPluginVersions, LocalRepository, VersionRangeResolver};
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProxyConfig {
    /// Address to bind. Loopback unless explicitly widened.
    pub bind: IpAddr,
    /// Port to bind; `0` lets the OS pick an ephemeral port.
    pub port: u16,
    /// Directory roots in Maven repository layout, searched in order.
    pub repositories: Vec<PathBuf>,
    /// Known plugin versions, keyed by `groupId:artifactId`.
    pub plugins: BTreeMap<String, String>,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            bind: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 0,
            repositories: Vec::new(),
            plugins: BTreeMap::new(),
        }
    }
}

impl ProxyConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<dyn ArtifactResolver>,
    pub ranges: Arc<dyn VersionRangeResolver>,
    pub plugins: Arc<KnownPluginVersions>,
}

impl AppState {
    /// Build state from explicit collaborators.
    pub fn new(
        resolver: Arc<dyn ArtifactResolver>,
        ranges: Arc<dyn VersionRangeResolver>,
        plugins: KnownPluginVersions,
    ) -> Self {
        Self {
            resolver,
            ranges,
            plugins: Arc::new(plugins),
        }
    }

    /// Build state backed by a [`LocalRepository`] over the configured roots.
    pub fn from_config(config: &ProxyConfig) -> Self {
        let local = Arc::new(LocalRepository::new(config.repositories.clone()));
        Self::new(
            local.clone(),
            local,
            KnownPluginVersions::new(config.plugins.clone()),
        )
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("resolver", &"[dyn ArtifactResolver]")
            .field("ranges", &"[dyn VersionRangeResolver]")
            .field("plugins", &self.plugins.len())
            .finish()
    }
}
