//! Project configuration: the record of user answers

pub mod project;

pub use project::{Feature, FeatureGroup, Features, ProjectConfig, DEFAULT_PROJECT_NAME};
