//! Detection of Node.js and JavaScript package managers

use std::fmt;
use std::process::Command;

/// Package managers able to install a generated project, in order of preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageManager {
    Npm,
    Yarn,
    Pnpm,
}

impl PackageManager {
    pub const PREFERENCE: [PackageManager; 3] =
        [PackageManager::Npm, PackageManager::Yarn, PackageManager::Pnpm];

    /// Executable name
    pub fn binary(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Yarn => "yarn",
            PackageManager::Pnpm => "pnpm",
        }
    }

    pub fn install_args(&self) -> &'static [&'static str] {
        &["install"]
    }

    /// Command line that runs a package.json script
    pub fn run_script(&self, script: &str) -> String {
        match self {
            PackageManager::Npm => format!("npm run {}", script),
            other => format!("{} {}", other.binary(), script),
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.binary())
    }
}

/// Runtime detection result
#[derive(Debug, Clone)]
pub struct RuntimeInfo {
    pub name: &'static str,
    pub version: Option<String>,
    pub available: bool,
}

/// Run `<binary> --version` and report what came back
pub fn check_tool(binary: &str, name: &'static str) -> RuntimeInfo {
    match Command::new(binary).arg("--version").output() {
        Ok(out) if out.status.success() => RuntimeInfo {
            name,
            version: Some(String::from_utf8_lossy(&out.stdout).trim().to_string()),
            available: true,
        },
        _ => RuntimeInfo {
            name,
            version: None,
            available: false,
        },
    }
}

/// Check if Node.js is available
pub fn check_node() -> RuntimeInfo {
    check_tool("node", "Node.js")
}

pub fn check_package_manager(manager: PackageManager) -> RuntimeInfo {
    check_tool(manager.binary(), manager.binary())
}

/// First available package manager, by [`PackageManager::PREFERENCE`]
pub fn detect_package_manager() -> Option<PackageManager> {
    first_available(&PackageManager::PREFERENCE, |pm| {
        check_package_manager(pm).available
    })
}

fn first_available(
    candidates: &[PackageManager],
    is_available: impl Fn(PackageManager) -> bool,
) -> Option<PackageManager> {
    candidates.iter().copied().find(|pm| is_available(*pm))
}
