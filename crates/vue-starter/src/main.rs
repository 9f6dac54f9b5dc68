//! Vue Starter CLI - Project scaffolding for Vue 2 single-page apps

use anyhow::Result;
use clap::{Parser, Subcommand};
use scaffolder_core::tui::CreateArgs;
use scaffolder_core::{Feature, PackageManager, ProductConfig, ProjectConfig};
use std::path::{Path, PathBuf};

/// CLI version
pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Vue starter product configuration
#[derive(Clone)]
pub struct VueStarterConfig;

impl ProductConfig for VueStarterConfig {
    fn name(&self) -> &'static str {
        "vue-starter"
    }

    fn display_name(&self) -> &'static str {
        "Vue Starter"
    }

    fn bundle_name(&self) -> &'static str {
        "vue-starter"
    }

    fn template_url_env(&self) -> &'static str {
        "VUE_STARTER_TEMPLATE_URL"
    }

    fn docs_url(&self) -> &'static str {
        "https://nodejs.org/en/download"
    }

    fn cli_description(&self) -> &'static str {
        "CLI for scaffolding Vue 2 starter projects"
    }

    fn upgrade_command(&self) -> &'static str {
        "cargo install vue-starter --force"
    }

    fn next_steps(
        &self,
        dir: &Path,
        project: &ProjectConfig,
        installed_with: Option<PackageManager>,
    ) -> Vec<String> {
        let mut steps = Vec::new();
        let current = std::env::current_dir().ok();
        let pm = installed_with.unwrap_or(PackageManager::Npm);

        // Step 1: cd to directory if not current
        if current.as_deref() != Some(dir) {
            steps.push(format!("cd {}", dir.display()));
        }

        // Step 2: Install dependencies if the hand-off did not
        if installed_with.is_none() {
            steps.push(format!("{} install", pm));
        }

        // Step 3: Start dev server
        steps.push(pm.run_script("dev"));

        if project.includes(Feature::VueRouter) {
            steps.push("Add routes in src/router.js".to_string());
        }
        if project.includes(Feature::Vuex) {
            steps.push("Add store modules under src/store".to_string());
        }

        steps.push(pm.run_script("build"));

        steps
    }
}

#[derive(Parser, Debug)]
#[command(name = "vue-starter")]
#[command(about = "CLI for scaffolding Vue 2 starter projects")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new Vue starter project
    Create(CliCreateArgs),
    /// Build the template bundle zip from the template directory (for development use)
    BuildZips(BuildZipsArgs),
}

#[derive(Parser, Debug)]
pub struct CliCreateArgs {
    /// Local directory to use instead of the bundled templates (for development use)
    #[arg(long = "template-dir")]
    pub template_dir: Option<PathBuf>,

    /// Project directory to generate into (defaults to the current directory)
    #[arg(short, long)]
    pub directory: Option<PathBuf>,

    /// Project name
    #[arg(short, long)]
    pub name: Option<String>,

    /// Features to leave out (comma-separated: vuex,router,axios,moment,jquery,animate,fontawesome)
    #[arg(short, long, value_delimiter = ',')]
    pub without: Option<Vec<String>>,

    /// Do not install dependencies after generating
    #[arg(long = "skip-install")]
    pub skip_install: bool,

    /// Auto-confirm all prompts (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,
}

impl From<CliCreateArgs> for CreateArgs {
    fn from(args: CliCreateArgs) -> Self {
        CreateArgs {
            template_dir: args.template_dir,
            directory: args.directory,
            name: args.name,
            without: args.without,
            skip_install: args.skip_install,
            yes: args.yes,
        }
    }
}

#[derive(Parser, Debug)]
pub struct BuildZipsArgs {
    /// Local directory containing the template bundle (for development use)
    #[arg(long = "template-dir")]
    pub template_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    let config = VueStarterConfig;

    match args.command {
        Some(Command::BuildZips(build_args)) => {
            scaffolder_core::templates::build_zip(&config, &build_args.template_dir).await
        }
        command => {
            // No subcommand provided, default to create behavior (interactive mode)
            let create_args: CreateArgs = match command {
                Some(Command::Create(create_args)) => create_args.into(),
                _ => CreateArgs::default(),
            };
            let result = scaffolder_core::run(&config, create_args, CLI_VERSION).await;

            // Ensure cursor is visible on normal exit
            let _ = console::Term::stderr().show_cursor();

            result
        }
    }
}
