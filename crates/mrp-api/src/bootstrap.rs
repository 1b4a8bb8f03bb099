//! # Proxy Bootstrap
//!
//! Turns configuration into the immutable [`AppState`] the router serves
//! from.
//!
//! ## Bootstrap Sequence
//!
//! 1. **Load Config**: Parse the YAML file, if one was given.
//! 2. **Validate**: Plugin keys must be `groupId:artifactId`; missing
//!    repository roots are reported but tolerated (an empty local
//!    repository is a normal state on a fresh machine).
//! 3. **Build State**: Directory resolver over the roots, plugin table.
//! 4. **Log Banner**: Structured startup summary.

use std::path::{Path, PathBuf};

use crate::state::{AppState, ProxyConfig};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors during proxy bootstrap.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    /// Config file not found at the given path.
    #[error("config file not found: {path}")]
    ConfigNotFound { path: String },

    /// Config file is not valid YAML or has unknown fields.
    #[error("invalid config file {path}: {reason}")]
    InvalidConfig { path: String, reason: String },

    /// A plugin table key is not `groupId:artifactId`.
    #[error("invalid plugin key `{0}`: expected groupId:artifactId")]
    InvalidPluginKey(String),

    /// A plugin table entry has an empty version.
    #[error("plugin `{0}` has an empty version")]
    EmptyPluginVersion(String),

    /// IO error during bootstrap.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// Load a [`ProxyConfig`] from a YAML file. Absent fields take defaults.
pub fn load_config(path: &Path) -> Result<ProxyConfig, BootstrapError> {
    if !path.exists() {
        return Err(BootstrapError::ConfigNotFound {
            path: path.display().to_string(),
        });
    }
    let raw = std::fs::read_to_string(path)?;
    if raw.trim().is_empty() {
        return Ok(ProxyConfig::default());
    }
    serde_yaml::from_str(&raw).map_err(|e| BootstrapError::InvalidConfig {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Validate `config` and build the application state from it.
pub fn bootstrap(config: &ProxyConfig) -> Result<AppState, BootstrapError> {
    validate_plugins(config)?;
    let missing = missing_roots(&config.repositories);
    for root in &missing {
        tracing::warn!(root = %root.display(), "repository root does not exist");
    }
    log_banner(config, missing.len());
    Ok(AppState::from_config(config))
}

// ---------------------------------------------------------------------------
// Phases
// ---------------------------------------------------------------------------

fn validate_plugins(config: &ProxyConfig) -> Result<(), BootstrapError> {
    for (key, version) in &config.plugins {
        match key.split_once(':') {
            Some((group, artifact))
                if !group.is_empty() && !artifact.is_empty() && !artifact.contains(':') => {}
            _ => return Err(BootstrapError::InvalidPluginKey(key.clone())),
        }
        if version.trim().is_empty() {
            return Err(BootstrapError::EmptyPluginVersion(key.clone()));
        }
    }
    Ok(())
}

fn missing_roots(roots: &[PathBuf]) -> Vec<PathBuf> {
    roots.iter().filter(|r| !r.is_dir()).cloned().collect()
}

fn log_banner(config: &ProxyConfig, missing: usize) {
    tracing::info!(
        bind = %config.bind,
        port = config.port,
        repositories = config.repositories.len(),
        missing_repositories = missing,
        plugins = config.plugins.len(),
        "resolver proxy configured"
    );
    for (key, version) in &config.plugins {
        tracing::debug!(plugin = %key, %version, "known plugin version");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
