//! Template bundle manifest (`template.yaml` at the bundle root)

use serde::{Deserialize, Serialize};

/// File name of the manifest inside a bundle
pub const MANIFEST_FILE: &str = "template.yaml";

/// Describes a template bundle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateManifest {
    /// Display name of the bundle
    pub name: String,

    /// Description of what the generated project provides
    pub description: String,

    /// Semver version for CLI compatibility checking
    pub version: String,

    /// Template grammar the files are written against; absent means the
    /// original `{{#if}}` grammar
    #[serde(default = "default_syntax")]
    pub syntax: u32,
}

fn default_syntax() -> u32 {
    1
}

impl TemplateManifest {
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }
}
