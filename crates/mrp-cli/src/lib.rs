//! # mrp-cli: CLI Tool for the Maven Resolver Proxy
//!
//! Provides the `mrp` command-line interface.
//!
//! ## Subcommands
//!
//! - `mrp serve`: Serve one or more local repository directories over
//!   HTTP until interrupted.
//! - `mrp inspect`: Show how a repository path is classified.
//!
//! ```bash
//! mrp serve --repository ~/.m2/repository --plugin com.example:foo-plugin=1.2.0
//! mrp inspect com/example/foo/1.0/foo-1.0-sources.jar.sha1 --json
//! ```

pub mod inspect;
pub mod serve;
