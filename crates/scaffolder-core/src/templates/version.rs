//! Version comparison between the CLI and a template bundle

use crate::templates::manifest::TemplateManifest;
use crate::templates::render::SYNTAX_VERSION;
use anyhow::Result;
use semver::Version;
use std::fmt;

/// Why a bundle may not render the way its author intended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompatibilityWarning {
    /// Bundle was published for a newer CLI
    CliTooOld {
        cli: String,
        template: String,
        upgrade_command: String,
    },
    /// Bundle is written against a different template grammar
    SyntaxMismatch { supported: u32, template: u32 },
}

impl fmt::Display for CompatibilityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompatibilityWarning::CliTooOld {
                cli,
                template,
                upgrade_command,
            } => write!(
                f,
                "This template was designed for CLI version {} or newer.\n\
                 You are running version {}.\n\
                 Consider updating: {}",
                template, cli, upgrade_command
            ),
            CompatibilityWarning::SyntaxMismatch {
                supported,
                template,
            } => write!(
                f,
                "This template uses template syntax v{}, this CLI renders v{}.",
                template, supported
            ),
        }
    }
}

/// Compare the running CLI against a bundle's manifest
///
/// Unparsable versions are skipped rather than reported.
pub fn check_compatibility(
    cli_version: &str,
    manifest: &TemplateManifest,
    upgrade_command: &str,
) -> Option<CompatibilityWarning> {
    if manifest.syntax != SYNTAX_VERSION {
        return Some(CompatibilityWarning::SyntaxMismatch {
            supported: SYNTAX_VERSION,
            template: manifest.syntax,
        });
    }

    let cli_ver = parse_version(cli_version).ok()?;
    let template_ver = parse_version(&manifest.version).ok()?;

    (cli_ver < template_ver).then(|| CompatibilityWarning::CliTooOld {
        cli: cli_version.to_string(),
        template: manifest.version.clone(),
        upgrade_command: upgrade_command.to_string(),
    })
}

/// Parse version string, tolerating a leading `v`
pub fn parse_version(version_str: &str) -> Result<Version> {
    let cleaned = version_str.strip_prefix('v').unwrap_or(version_str);
    Version::parse(cleaned).map_err(|e| anyhow::anyhow!("Invalid version '{}': {}", version_str, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    const UPGRADE: &str = "cargo install vue-starter --force";

    fn manifest(version: &str) -> TemplateManifest {
        TemplateManifest {
            name: "t".to_string(),
            description: "d".to_string(),
            version: version.to_string(),
            syntax: SYNTAX_VERSION,
        }
    }

    #[test]
    fn test_cli_older_than_template() {
        let warning = check_compatibility("0.1.0", &manifest("0.2.0"), UPGRADE).unwrap();
        assert!(warning.to_string().contains("0.2.0"));
        assert!(warning.to_string().contains(UPGRADE));
    }

    #[test]
    fn test_cli_same_or_newer() {
        assert!(check_compatibility("0.1.0", &manifest("0.1.0"), UPGRADE).is_none());
        assert!(check_compatibility("0.2.0", &manifest("v0.1.0"), UPGRADE).is_none());
    }

    #[test]
    fn test_invalid_versions_are_ignored() {
        assert!(check_compatibility("invalid", &manifest("0.1.0"), UPGRADE).is_none());
        assert!(check_compatibility("0.1.0", &manifest("latest"), UPGRADE).is_none());
    }

    #[test]
    fn test_other_syntax_reported() {
        for syntax in [SYNTAX_VERSION - 1, SYNTAX_VERSION + 1] {
            let mut m = manifest("0.1.0");
            m.syntax = syntax;
            assert_eq!(
                check_compatibility("0.1.0", &m, UPGRADE),
                Some(CompatibilityWarning::SyntaxMismatch {
                    supported: SYNTAX_VERSION,
                    template: syntax,
                })
            );
        }
    }

    #[test]
    fn test_parse_version_strips_prefix() {
        assert_eq!(parse_version("v1.2.3").unwrap(), Version::new(1, 2, 3));
        assert!(parse_version("one").is_err());
    }
}
