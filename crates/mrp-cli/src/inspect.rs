//! # Inspect Subcommand
//!
//! Runs the path grammar over one repository path and reports what the
//! proxy would do with it, without resolving anything.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use mrp_core::{RepositoryRequest, RequestTarget};

/// Arguments for the `mrp inspect` subcommand.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Repository-relative path, with or without a leading `/`.
    #[arg(value_name = "PATH")]
    pub path: String,

    /// Print the result as JSON.
    #[arg(long)]
    pub json: bool,
}

/// How a path was classified.
#[derive(Debug, Serialize)]
pub struct Inspection {
    pub path: String,
    pub classification: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<RepositoryRequest>,
    /// Canonical path of the underlying file (checksum suffix removed).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolves: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Inspection {
    pub fn is_malformed(&self) -> bool {
        self.request.is_none()
    }
}

/// Classify `path`.
pub fn inspect(path: &str) -> Inspection {
    let relative = path.strip_prefix('/').unwrap_or(path);
    match RepositoryRequest::parse(relative) {
        Ok(request) => {
            let (classification, resolves) = match &request.target {
                RequestTarget::Artifact(c) => ("artifact", c.repository_path()),
                RequestTarget::Metadata(m) => ("metadata", m.repository_path()),
            };
            Inspection {
                path: path.to_string(),
                classification,
                request: Some(request),
                resolves: Some(resolves),
                reason: None,
            }
        }
        Err(err) => Inspection {
            path: path.to_string(),
            classification: "malformed",
            request: None,
            resolves: None,
            reason: Some(err.to_string()),
        },
    }
}

/// Execute the inspect subcommand. Exits 1 for malformed paths.
pub fn run_inspect(args: &InspectArgs) -> Result<u8> {
    let inspection = inspect(&args.path);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&inspection)?);
    } else {
        print!("{}", render_text(&inspection));
    }
    Ok(if inspection.is_malformed() { 1 } else { 0 })
}

fn render_text(inspection: &Inspection) -> String {
    let mut out = String::new();
    match (&inspection.request, &inspection.reason) {
        (Some(request), _) => {
            out.push_str(&format!("{request}\n"));
            if let Some(resolves) = &inspection.resolves {
                out.push_str(&format!("  file: {resolves}\n"));
            }
        }
        (None, reason) => {
            out.push_str(&format!(
                "malformed: {}\n",
                reason.as_deref().unwrap_or("unknown reason")
            ));
        }
    }
    out
}
