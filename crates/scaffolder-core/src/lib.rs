//! Scaffolder Core - project generation from conditional templates
//!
//! Collects a small set of answers (project name, feature toggles) into an
//! immutable [`ProjectConfig`], then renders a fixed catalog of templates into a
//! project directory. Entries whose predicate does not hold are skipped
//! entirely. After the files are written the project is handed to a
//! JavaScript package manager for `install`.
//!
//! # Architecture
//!
//! - **Layer 1: Core Operations** - configuration record, template catalog,
//!   placeholder rendering, bundle fetching, copying, installer hand-off
//! - **Layer 2: Product** - the `ProductConfig` trait each binary implements
//! - **Layer 3: CLI/TUI Interface** - Optional cliclack-based prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based TUI prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use scaffolder_core::{templates, Feature, Features, ProjectConfig};
//!
//! let project = ProjectConfig::new("My App", Features::default().without(Feature::Jquery))?;
//! let mut fetcher = templates::TemplateFetcher::from_local("templates".into(), "vue-starter", "me");
//! let bundle = fetcher.bundle().await?;
//! templates::render_project(bundle, &templates::STARTER, &project, "my-app".as_ref()).await?;
//! ```

pub mod config;
pub mod error;
pub mod product;
pub mod runtime;
pub mod templates;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use config::{Feature, FeatureGroup, Features, ProjectConfig};
pub use error::ScaffoldError;
pub use product::ProductConfig;
pub use runtime::{install_dependencies, InstallOutcome, PackageManager};
pub use templates::{
    render_project, Catalog, TemplateBundle, TemplateEntry, TemplateFetcher, TemplateSource,
};

#[cfg(feature = "tui")]
pub use tui::run;

/// CLI version - used for template compatibility checking
/// Each binary should define its own version, but this provides a fallback
pub const DEFAULT_CLI_VERSION: &str = "0.1.0";
