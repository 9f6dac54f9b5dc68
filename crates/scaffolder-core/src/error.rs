//! Error types for project generation

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using the scaffolder's error type
pub type Result<T> = std::result::Result<T, ScaffoldError>;

/// Fatal generation errors
///
/// Every variant names the offending path or value so the CLI can surface it
/// to the user unchanged.
#[derive(Error, Debug)]
pub enum ScaffoldError {
    /// A template listed in the catalog is absent from the bundle
    #[error("Template not found in bundle: {path}")]
    MissingTemplate { path: String },

    /// A template exists but is not valid UTF-8 text
    #[error("Template is not valid UTF-8: {path}")]
    InvalidTemplateEncoding { path: String },

    /// A template could not be rendered
    #[error("Failed to render template {path}: {source}")]
    Render {
        path: String,
        #[source]
        source: tera::Error,
    },

    /// A bundle path is absolute or climbs out of its directory
    #[error("Template path escapes the project directory: {path}")]
    UnsafePath { path: String },

    /// A destination directory could not be created
    #[error("Failed to create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A destination file could not be written
    #[error("Failed to write file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Project name was empty after trimming
    #[error("Project name must not be empty")]
    InvalidProjectName,

    /// A feature name given on the command line is not recognised
    #[error("Unknown feature: {name}. Available features: {available}")]
    UnknownFeature { name: String, available: String },
}
