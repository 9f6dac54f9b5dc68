//! Runtime detection and dependency installation
//!
//! This module provides:
//! - Node.js and package manager detection
//! - The post-generation `install` hand-off

pub mod check;
pub mod installer;

pub use check::{
    check_node, check_package_manager, detect_package_manager, PackageManager, RuntimeInfo,
};
pub use installer::{install_dependencies, open_docs, DependencyInstaller, InstallOutcome};
