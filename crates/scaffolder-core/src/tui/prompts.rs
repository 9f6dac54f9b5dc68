//! Charm-style CLI prompts using cliclack

use crate::config::{Feature, FeatureGroup, Features, ProjectConfig, DEFAULT_PROJECT_NAME};
use crate::product::ProductConfig;
use crate::runtime::{self, DependencyInstaller, InstallOutcome, PackageManager};
use crate::templates::{copier, version, TemplateFetcher, TemplateSource};
use anyhow::Result;
use std::path::{Path, PathBuf};

/// CLI arguments for the create command
#[derive(Debug, Clone, Default)]
pub struct CreateArgs {
    /// Local directory to use instead of the bundled templates
    pub template_dir: Option<PathBuf>,

    /// Project directory to generate into (defaults to the current directory)
    pub directory: Option<PathBuf>,

    /// Project name, skipping the name prompt
    pub name: Option<String>,

    /// Features to leave out, skipping the feature prompts
    pub without: Option<Vec<String>>,

    /// Do not run the package manager after generation
    pub skip_install: bool,

    /// Auto-confirm all prompts (non-interactive mode)
    pub yes: bool,
}

/// Run the CLI with interactive prompts
pub async fn run<C: ProductConfig>(config: &C, args: CreateArgs, cli_version: &str) -> Result<()> {
    cliclack::intro(config.display_name())?;

    // Step 1: Load the template bundle
    let mut fetcher = setup_fetcher(config, &args.template_dir)?;
    load_bundle(config, &mut fetcher, cli_version).await?;

    // Step 2: Select directory
    let project_dir = select_directory(&args)?;

    // Step 3: Collect answers
    let project = collect_answers(&args)?;

    // Step 4: Render the project
    create_project(config, &mut fetcher, &project, &project_dir).await?;

    // Step 5: Hand off to the package manager
    let installed_with = if args.skip_install {
        cliclack::log::info("Skipping dependency installation")?;
        None
    } else {
        install(config, &project_dir, &args).await?
    };

    // Step 6: Show next steps
    print_next_steps(config, &project_dir, &project, installed_with)?;

    Ok(())
}

fn setup_fetcher<C: ProductConfig>(
    config: &C,
    template_dir: &Option<PathBuf>,
) -> Result<TemplateFetcher> {
    let fetcher = match template_dir {
        Some(path) => {
            cliclack::log::info(format!("Using local templates from {}", path.display()))?;
            TemplateFetcher::from_local(path.clone(), config.bundle_name(), config.user_agent())
        }
        None => {
            let fetcher = TemplateFetcher::from_config(config)?;
            match fetcher.source() {
                TemplateSource::Remote(url) => {
                    cliclack::log::info(format!("Using remote templates from {}", url))?
                }
                _ => cliclack::log::info("Using bundled templates")?,
            }
            fetcher
        }
    };

    Ok(fetcher)
}

async fn load_bundle<C: ProductConfig>(
    config: &C,
    fetcher: &mut TemplateFetcher,
    cli_version: &str,
) -> Result<()> {
    let spinner = cliclack::spinner();
    spinner.start("Loading templates...");

    let manifest = match fetcher.bundle().await {
        Ok(bundle) => bundle.manifest().clone(),
        Err(e) => {
            spinner.stop("Failed to load templates");
            return Err(e);
        }
    };
    spinner.stop(format!(
        "Template: {} - {}",
        manifest.name, manifest.description
    ));

    if let Some(warning) =
        version::check_compatibility(cli_version, &manifest, config.upgrade_command())
    {
        let text = warning.to_string();
        cliclack::log::warning(format!(
            "Version warning: {}",
            text.lines().next().unwrap_or(&text)
        ))?;
    }

    Ok(())
}

fn select_directory(args: &CreateArgs) -> Result<PathBuf> {
    let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    let path = match &args.directory {
        Some(dir) if dir.is_absolute() => dir.clone(),
        Some(dir) => current_dir.join(dir),
        None => current_dir,
    };
    cliclack::log::info(format!("Using directory: {}", path.display()))?;

    // Validate parent directory exists
    if let Some(parent) = path.parent() {
        if !parent.exists() && parent != Path::new("") {
            anyhow::bail!("Parent directory does not exist: {}", parent.display());
        }
    }

    // Warn if directory exists and has files; generated paths are overwritten
    if path.is_dir() {
        if let Ok(entries) = std::fs::read_dir(&path) {
            let count = entries.count();
            if count > 0 {
                cliclack::log::warning(format!(
                    "Directory has {} existing items; generated files will be overwritten",
                    count
                ))?;

                let confirm = if args.yes {
                    true
                } else {
                    cliclack::confirm("Continue anyway?")
                        .initial_value(true)
                        .interact()?
                };

                if !confirm {
                    anyhow::bail!("Setup cancelled.");
                }
            }
        }
    }

    Ok(path)
}

/// Resolve the configuration record from flags and prompts
fn collect_answers(args: &CreateArgs) -> Result<ProjectConfig> {
    let name = match &args.name {
        Some(name) => name.clone(),
        None if args.yes => DEFAULT_PROJECT_NAME.to_string(),
        None => cliclack::input("What would you like to name your project?")
            .placeholder(DEFAULT_PROJECT_NAME)
            .default_input(DEFAULT_PROJECT_NAME)
            .validate(|input: &String| {
                if input.trim().is_empty() {
                    Err("Project name must not be empty")
                } else {
                    Ok(())
                }
            })
            .interact()?,
    };

    let features = match &args.without {
        Some(excluded) => features_without(excluded)?,
        None if args.yes => Features::default(),
        None => {
            let mut selected = select_group(
                "Which additional features would you like to include?",
                FeatureGroup::Additional,
            )?;
            selected.extend(select_group(
                "Would you like to install these utility libraries?",
                FeatureGroup::Utility,
            )?);
            Features::from_selected(&selected)
        }
    };

    let project = ProjectConfig::new(name, features)?;

    let enabled: Vec<&str> = project
        .features()
        .enabled()
        .iter()
        .map(|f| f.display_name())
        .collect();
    cliclack::log::success(format!(
        "Project: {} ({})",
        project.name(),
        if enabled.is_empty() {
            "no optional features".to_string()
        } else {
            enabled.join(", ")
        }
    ))?;

    Ok(project)
}

/// Defaults minus the named features
fn features_without(excluded: &[String]) -> Result<Features> {
    let mut features = Features::default();
    for name in excluded.iter().filter(|n| !n.trim().is_empty()) {
        features.set(Feature::parse(name)?, false);
    }
    Ok(features)
}

fn select_group(prompt: &str, group: FeatureGroup) -> Result<Vec<Feature>> {
    let mut multi = cliclack::multiselect(prompt);
    for feature in Feature::in_group(group) {
        multi = multi.item(feature, feature.display_name(), "");
    }
    let initial: Vec<Feature> = Feature::in_group(group)
        .filter(|f| f.default_enabled())
        .collect();

    let selected: Vec<Feature> = multi.initial_values(initial).required(false).interact()?;
    Ok(selected)
}

async fn create_project<C: ProductConfig>(
    config: &C,
    fetcher: &mut TemplateFetcher,
    project: &ProjectConfig,
    project_dir: &Path,
) -> Result<()> {
    let spinner = cliclack::spinner();
    spinner.start("Creating project...");

    let bundle = fetcher.bundle().await?;
    match copier::render_project(bundle, config.catalog(), project, project_dir).await {
        Ok(written) => {
            spinner.stop(format!(
                "Created {} files in {}",
                written.len(),
                project_dir.display()
            ));
            Ok(())
        }
        Err(e) => {
            spinner.stop("Failed to create project");
            Err(e.into())
        }
    }
}

async fn install<C: ProductConfig>(
    config: &C,
    project_dir: &Path,
    args: &CreateArgs,
) -> Result<Option<PackageManager>> {
    let Some(installer) = DependencyInstaller::detect(project_dir) else {
        handle_missing_package_manager(config, args)?;
        return Ok(None);
    };

    let node = runtime::check_node();
    if !node.available {
        cliclack::log::warning("Node.js was not found; the install will probably fail")?;
    }

    cliclack::log::info(format!("Installing dependencies with {}", installer.manager()))?;
    let outcome = installer.install().await;
    match &outcome {
        InstallOutcome::Installed(pm) => {
            cliclack::log::success(format!("Dependencies installed with {}", pm))?;
        }
        InstallOutcome::Failed { manager, reason } => {
            cliclack::log::warning(format!(
                "Dependency installation failed: {}\nThe project files were kept. Run `{} install` yourself.",
                reason, manager
            ))?;
        }
        InstallOutcome::NoPackageManager => handle_missing_package_manager(config, args)?,
    }

    Ok(outcome.installed_with())
}

fn handle_missing_package_manager<C: ProductConfig>(config: &C, args: &CreateArgs) -> Result<()> {
    cliclack::log::warning("No package manager (npm, yarn or pnpm) was found")?;

    if args.yes {
        cliclack::log::info("Skipping dependency installation (--yes mode)")?;
        return Ok(());
    }

    let action: &str = cliclack::select("What would you like to do?")
        .item(
            "docs",
            format!("Open installation docs ({})", config.docs_url()),
            "",
        )
        .item("skip", "Skip and install dependencies later", "")
        .interact()?;

    if action == "docs" {
        runtime::open_docs(config.docs_url())?;
    }

    Ok(())
}

fn print_next_steps<C: ProductConfig>(
    config: &C,
    project_dir: &Path,
    project: &ProjectConfig,
    installed_with: Option<PackageManager>,
) -> Result<()> {
    let steps = config.next_steps(project_dir, project, installed_with);

    println!();
    println!("  Next steps");
    println!();

    for (i, step) in steps.iter().enumerate() {
        println!("  {}.  {}", i + 1, step);
    }

    cliclack::outro("Happy coding!")?;

    Ok(())
}
