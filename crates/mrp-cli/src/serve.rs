//! # Serve Subcommand
//!
//! Starts the proxy and blocks until Ctrl-C. Settings come from, lowest
//! precedence first: built-in defaults, the `--config` YAML file, the
//! `MRP_PORT` environment variable, command-line flags.

use std::net::IpAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use mrp_api::bootstrap::{bootstrap, load_config};
use mrp_api::state::ProxyConfig;
use mrp_api::ProxyServer;

/// Arguments for the `mrp serve` subcommand.
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// YAML configuration file.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Address to bind (default 127.0.0.1).
    #[arg(long)]
    pub bind: Option<IpAddr>,

    /// Port to bind; 0 picks an ephemeral port.
    #[arg(long, env = "MRP_PORT")]
    pub port: Option<u16>,

    /// Repository root in Maven layout. Repeatable; searched in order after
    /// any roots from the config file.
    #[arg(long = "repository", value_name = "DIR")]
    pub repositories: Vec<PathBuf>,

    /// Known plugin version. Repeatable; overrides the same key from the
    /// config file.
    #[arg(long = "plugin", value_name = "GROUP:ARTIFACT=VERSION", value_parser = parse_plugin)]
    pub plugins: Vec<(String, String)>,
}

/// Execute the serve subcommand.
pub async fn run_serve(args: &ServeArgs) -> Result<u8> {
    let config = resolve_config(args)?;
    let state = bootstrap(&config).context("bootstrap failed")?;

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl-C: {e}");
        }
    };
    ProxyServer::run_until(state, config.socket_addr(), shutdown)
        .await
        .context("resolver proxy failed")?;
    Ok(0)
}

/// Merge the config file (if any) with command-line overrides.
pub fn resolve_config(args: &ServeArgs) -> Result<ProxyConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)
            .with_context(|| format!("failed to load config: {}", path.display()))?,
        None => ProxyConfig::default(),
    };

    if let Some(bind) = args.bind {
        config.bind = bind;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    config.repositories.extend(args.repositories.iter().cloned());
    for (key, version) in &args.plugins {
        config.plugins.insert(key.clone(), version.clone());
    }
    Ok(config)
}

/// Parse `groupId:artifactId=version`.
fn parse_plugin(raw: &str) -> Result<(String, String), String> {
    let (key, version) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected GROUP:ARTIFACT=VERSION, got `{raw}`"))?;
    if !key.contains(':') || version.is_empty() {
        return Err(format!("expected GROUP:ARTIFACT=VERSION, got `{raw}`"));
    }
    Ok((key.to_string(), version.to_string()))
}
