//! CLI interface for the forge.
//!
//! Each subcommand is non-interactive: arguments in, text out. Stage
//! commands (`generate`, `refine`, `deliver`, `package`) call the configured
//! gateway once and exit; `review` opens the terminal review screen.
//!
//! Project references take a full id or an unambiguous prefix. `refine`
//! saves its result to every project with the resolved project's name, so
//! same-named projects share refinements.

mod form;
mod format;
mod project;
mod settings;
mod stage;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::gateway;
use crate::model::Project;
use crate::storage::{ProjectRecords, Storage};
use crate::tui;
use crate::workflow::Engine;

use form::FormArgs;
use project::ProjectCommand;
use settings::SettingsCommand;

/// Forge: generate, refine, and ship World of Warcraft addons.
#[derive(Debug, Parser)]
#[command(name = "forge", after_long_help = WORKFLOW_HELP)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

const WORKFLOW_HELP: &str = r#"Workflow: from idea to installable addon
  1. forge generate --name DPSMeter --type combat --features "Track DPS per player"
     → prints a project ID (e.g. 3f2a91c0)
  2. forge project show 3f2 --file Core.lua
  3. forge refine --project 3f2 "Add a minimap button"
  4. forge package --project 3f2
  5. forge deliver --project 3f2 --repo me/dps-meter

Interactive:
  forge review 3f2
  forge review --sample"#;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a new addon from a description. Prints the project ID.
    Generate {
        #[command(flatten)]
        form: FormArgs,

        /// Use the built-in demo form instead. The result is not saved.
        #[arg(long)]
        sample: bool,
    },

    /// Show the specification the generate stage would send, without calling it.
    Preview {
        #[command(flatten)]
        form: FormArgs,
    },

    /// Apply developer feedback to a saved project.
    ///
    /// Other saved projects with the same name receive the update too.
    Refine {
        /// Project ID: full id or unambiguous prefix.
        #[arg(long)]
        project: String,

        /// What should change.
        feedback: String,
    },

    /// Commit a project's files to a repository.
    Deliver {
        /// Project ID: full id or unambiguous prefix.
        #[arg(long)]
        project: String,

        /// Repository name (e.g. `me/dps-meter`).
        #[arg(long)]
        repo: String,

        /// Target branch. Defaults to `main`.
        #[arg(long, default_value = "")]
        branch: String,

        /// Commit message. Defaults to "Initial addon commit".
        #[arg(long, default_value = "")]
        message: String,
    },

    /// Package a project into an installable archive.
    Package {
        /// Project ID: full id or unambiguous prefix.
        #[arg(long)]
        project: String,

        /// Archive name (without `.zip`). Defaults to the project name.
        #[arg(long)]
        name: Option<String>,
    },

    /// Inspect and manage saved projects.
    Project {
        #[command(subcommand)]
        command: ProjectCommand,
    },

    /// Show or change the defaults used to pre-fill generation.
    Settings {
        #[command(subcommand)]
        command: SettingsCommand,
    },

    /// Open the interactive review screen for a project.
    Review {
        /// Project ID: full id or unambiguous prefix.
        project: Option<String>,

        /// Review the built-in demo addon instead.
        #[arg(long, conflicts_with = "project")]
        sample: bool,
    },
}

/// Run the CLI, returning an error message on failure.
pub fn run(config: &Config, storage: &Storage) -> Result<(), String> {
    let cli = Cli::parse();

    match cli.command {
        Command::Generate { form, sample } => stage::cmd_generate(config, storage, form, sample),
        Command::Preview { form } => form::cmd_preview(storage, form),
        Command::Refine { project, feedback } => {
            let project = resolve_project(storage, &project)?;
            stage::cmd_refine(config, storage, &project, &feedback)
        }
        Command::Deliver {
            project,
            repo,
            branch,
            message,
        } => {
            let project = resolve_project(storage, &project)?;
            stage::cmd_deliver(config, storage, &project, &repo, &branch, &message)
        }
        Command::Package { project, name } => {
            let project = resolve_project(storage, &project)?;
            stage::cmd_package(config, storage, &project, name.as_deref())
        }
        Command::Project { command } => project::run(storage, command),
        Command::Settings { command } => settings::run(storage, command),
        Command::Review { project, sample } => cmd_review(config, storage, project.as_deref(), sample),
    }
}

fn cmd_review(
    config: &Config,
    storage: &Storage,
    project: Option<&str>,
    sample: bool,
) -> Result<(), String> {
    let mut engine = Engine::new(config.capabilities.clone());
    match (project, sample) {
        (_, true) => engine.load_sample().map_err(|e| e.to_string())?,
        (Some(reference), false) => {
            let project = resolve_project(storage, reference)?;
            engine.resume(&project).map_err(|e| e.to_string())?;
        }
        (None, false) => return Err("specify a project or --sample".to_string()),
    }

    // Browsing works without a gateway; stages report the problem on screen.
    let gateway = gateway::from_config(&config.gateway)
        .inspect_err(|e| tracing::info!(error = %e, "review without a gateway"))
        .ok();

    tui::run(engine, gateway.as_deref(), storage).map_err(|e| format!("terminal error: {e}"))
}

/// Resolve a project reference (full id or unambiguous prefix).
fn resolve_project(storage: &Storage, reference: &str) -> Result<Project, String> {
    let projects = storage
        .list_all()
        .map_err(|e| format!("failed to list projects: {e}"))?;
    find_project(projects, reference)
}

fn find_project(projects: Vec<Project>, reference: &str) -> Result<Project, String> {
    let reference = reference.trim();
    if reference.is_empty() {
        return Err("project reference is empty".to_string());
    }

    let mut matches: Vec<Project> = projects
        .into_iter()
        .filter(|p| p.id.starts_with(reference))
        .collect();

    // A full id wins even if it happens to prefix another.
    if let Some(exact) = matches.iter().position(|p| p.id == reference) {
        return Ok(matches.swap_remove(exact));
    }

    match matches.len() {
        0 => Err(format!("no project matching '{reference}'")),
        1 => Ok(matches.remove(0)),
        n => {
            let ids: Vec<&str> = matches.iter().map(Project::short_id).collect();
            Err(format!(
                "'{reference}' is ambiguous: matches {n} projects: {}",
                ids.join(", ")
            ))
        }
    }
}
