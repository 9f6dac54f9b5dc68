//! Product configuration trait for CLI binaries
//!
//! A binary implements this trait to describe the project it generates and
//! where its templates live.

use crate::config::ProjectConfig;
use crate::runtime::PackageManager;
use crate::templates::catalog::{Catalog, STARTER};
use std::path::Path;

/// Configuration trait for a scaffolding product
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Internal product name (used for CLI command, env vars)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Directory (and zip stem) of the template bundle
    fn bundle_name(&self) -> &'static str;

    /// Environment variable holding a base URL to fetch the bundle zip from
    /// instead of using the copy compiled into the binary
    fn template_url_env(&self) -> &'static str;

    /// Where to send users who have no package manager installed
    fn docs_url(&self) -> &'static str;

    /// CLI description shown in help text
    fn cli_description(&self) -> &'static str;

    /// Upgrade/install command shown in version warnings
    fn upgrade_command(&self) -> &'static str;

    /// "Next steps" printed after generation
    fn next_steps(
        &self,
        dir: &Path,
        project: &ProjectConfig,
        installed_with: Option<PackageManager>,
    ) -> Vec<String>;

    /// Entries rendered into every project
    fn catalog(&self) -> &'static Catalog {
        &STARTER
    }

    /// User agent string for HTTP requests
    fn user_agent(&self) -> &'static str {
        self.name()
    }
}
