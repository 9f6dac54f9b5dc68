//! Hand-off to the JavaScript package manager after generation
//!
//! Installation never fails generation: every problem comes back as an
//! [`InstallOutcome`] for the caller to report as a warning.

use super::check::{detect_package_manager, PackageManager};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::process::Command as TokioCommand;
use tokio::time::timeout;

/// Upper bound for a dependency install
const INSTALL_TIMEOUT: Duration = Duration::from_secs(600);

/// What happened when dependencies were installed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    Installed(PackageManager),
    NoPackageManager,
    Failed {
        manager: PackageManager,
        reason: String,
    },
}

impl InstallOutcome {
    /// Manager that completed the install, if any
    pub fn installed_with(&self) -> Option<PackageManager> {
        match self {
            InstallOutcome::Installed(pm) => Some(*pm),
            _ => None,
        }
    }
}

/// Runs `<manager> install` inside a project directory
pub struct DependencyInstaller {
    manager: PackageManager,
    project_dir: PathBuf,
}

impl DependencyInstaller {
    pub fn new(manager: PackageManager, project_dir: &Path) -> Self {
        Self {
            manager,
            project_dir: project_dir.to_path_buf(),
        }
    }

    /// Installer for the first package manager found on PATH
    pub fn detect(project_dir: &Path) -> Option<Self> {
        detect_package_manager().map(|pm| Self::new(pm, project_dir))
    }

    pub fn manager(&self) -> PackageManager {
        self.manager
    }

    /// The command as shown to the user
    pub fn install_command(&self) -> String {
        format!(
            "{} {}",
            self.manager.binary(),
            self.manager.install_args().join(" ")
        )
    }

    /// Run the install, streaming its output
    pub async fn install(&self) -> InstallOutcome {
        match self.run().await {
            Ok(()) => InstallOutcome::Installed(self.manager),
            Err(reason) => InstallOutcome::Failed {
                manager: self.manager,
                reason,
            },
        }
    }

    async fn run(&self) -> Result<(), String> {
        let cmd = self.install_command();
        println!();
        println!("{} {}", "Running:".dimmed(), cmd.yellow());
        println!();

        let mut child = TokioCommand::new(self.manager.binary())
            .args(self.manager.install_args())
            .current_dir(&self.project_dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| format!("Failed to start {}: {}", cmd, e))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| "Failed to capture stdout".to_string())?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| "Failed to capture stderr".to_string())?;

        let output_task = forward_output(
            BufReader::new(stdout),
            BufReader::new(stderr),
            |stream, line| match stream {
                Stream::Stdout => println!("  {}", line),
                Stream::Stderr => eprintln!("  {}", line.yellow()),
            },
        );

        if timeout(INSTALL_TIMEOUT, output_task).await.is_err() {
            let _ = child.kill().await;
            println!();
            return Err(format!(
                "{} did not finish within {} seconds",
                cmd,
                INSTALL_TIMEOUT.as_secs()
            ));
        }

        match timeout(Duration::from_secs(5), child.wait()).await {
            Ok(Ok(status)) if status.success() => {
                println!();
                Ok(())
            }
            Ok(Ok(status)) => Err(format!(
                "{} exited with code {}",
                cmd,
                status.code().unwrap_or(-1)
            )),
            Ok(Err(e)) => Err(format!("Failed to wait for {}: {}", cmd, e)),
            Err(_) => {
                let _ = child.kill().await;
                Err(format!("{} hung after closing its output", cmd))
            }
        }
    }
}

/// Pipe a line of installer output came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stream {
    Stdout,
    Stderr,
}

/// Hand every line from both pipes to `emit` until both have closed
async fn forward_output<O, E, F>(stdout: O, stderr: E, mut emit: F)
where
    O: AsyncBufRead + Unpin,
    E: AsyncBufRead + Unpin,
    F: FnMut(Stream, String),
{
    let mut stdout_lines = stdout.lines();
    let mut stderr_lines = stderr.lines();
    let mut stdout_open = true;
    let mut stderr_open = true;

    while stdout_open || stderr_open {
        tokio::select! {
            line = stdout_lines.next_line(), if stdout_open => {
                match line {
                    Ok(Some(line)) => emit(Stream::Stdout, line),
                    Ok(None) => stdout_open = false,
                    Err(e) => {
                        eprintln!("{} {}", "Error reading stdout:".red(), e);
                        stdout_open = false;
                    }
                }
            }
            line = stderr_lines.next_line(), if stderr_open => {
                match line {
                    Ok(Some(line)) => emit(Stream::Stderr, line),
                    Ok(None) => stderr_open = false,
                    Err(e) => {
                        eprintln!("{} {}", "Error reading stderr:".red(), e);
                        stderr_open = false;
                    }
                }
            }
        }
    }
}

/// Install dependencies with whatever package manager is available
pub async fn install_dependencies(project_dir: &Path) -> InstallOutcome {
    match DependencyInstaller::detect(project_dir) {
        Some(installer) => installer.install().await,
        None => InstallOutcome::NoPackageManager,
    }
}

/// Open a documentation page in the default browser
pub fn open_docs(url: &str) -> anyhow::Result<()> {
    println!("{}", format!("Opening {} in your browser...", url).cyan());
    open::that(url)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn collect(stdout: &'static [u8], stderr: &'static [u8]) -> Vec<(Stream, String)> {
        let mut lines = Vec::new();
        forward_output(BufReader::new(stdout), BufReader::new(stderr), |stream, line| {
            lines.push((stream, line))
        })
        .await;
        lines
    }

    #[tokio::test]
    async fn test_stderr_drained_after_stdout_closes() {
        let lines = collect(b"done\n", b"warn 1\nwarn 2\nwarn 3\n").await;
        let stderr: Vec<&str> = lines
            .iter()
            .filter(|(stream, _)| *stream == Stream::Stderr)
            .map(|(_, line)| line.as_str())
            .collect();
        assert_eq!(stderr, vec!["warn 1", "warn 2", "warn 3"]);
        assert!(lines.contains(&(Stream::Stdout, "done".to_string())));
    }

    #[tokio::test]
    async fn test_stdout_drained_after_stderr_closes() {
        let lines = collect(b"a\nb\nc\nd\n", b"").await;
        assert_eq!(
            lines,
            ["a", "b", "c", "d"]
                .iter()
                .map(|l| (Stream::Stdout, l.to_string()))
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_install_command() {
        let installer = DependencyInstaller::new(PackageManager::Yarn, Path::new("/tmp/x"));
        assert_eq!(installer.install_command(), "yarn install");
        assert_eq!(installer.manager(), PackageManager::Yarn);
    }

    #[test]
    fn test_outcome_installed_with() {
        assert_eq!(
            InstallOutcome::Installed(PackageManager::Npm).installed_with(),
            Some(PackageManager::Npm)
        );
        assert_eq!(InstallOutcome::NoPackageManager.installed_with(), None);
        let failed = InstallOutcome::Failed {
            manager: PackageManager::Npm,
            reason: "boom".to_string(),
        };
        assert_eq!(failed.installed_with(), None);
    }

    #[tokio::test]
    async fn test_missing_project_dir_reports_failure() {
        let installer =
            DependencyInstaller::new(PackageManager::Npm, Path::new("/definitely/not/here/4821"));
        assert!(matches!(
            installer.install().await,
            InstallOutcome::Failed { .. }
        ));
    }
}
