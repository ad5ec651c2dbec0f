//! Saved project commands: list, show, delete.

use clap::Subcommand;

use crate::model::Project;
use crate::notes;
use crate::storage::{ProjectRecords, Storage};

use super::format::{format_file, format_file_list, format_project_row, use_color};
use super::resolve_project;

#[derive(Debug, Subcommand)]
pub enum ProjectCommand {
    /// List saved projects, most recent first.
    List {
        /// Only projects whose name contains this text (case-insensitive).
        #[arg(long)]
        search: Option<String>,
    },

    /// Show a project's summary, or one of its files.
    Show {
        /// Project ID: full id or unambiguous prefix.
        project: String,

        /// Print this file with syntax highlighting.
        #[arg(long)]
        file: Option<String>,

        /// Never emit colour.
        #[arg(long)]
        plain: bool,
    },

    /// Delete a saved project.
    Delete {
        /// Project ID: full id or unambiguous prefix.
        project: String,
    },
}

pub(super) fn run(storage: &Storage, command: ProjectCommand) -> Result<(), String> {
    match command {
        ProjectCommand::List { search } => cmd_list(storage, search.as_deref()),
        ProjectCommand::Show {
            project,
            file,
            plain,
        } => {
            let project = resolve_project(storage, &project)?;
            cmd_show(&project, file.as_deref(), plain)
        }
        ProjectCommand::Delete { project } => {
            let project = resolve_project(storage, &project)?;
            cmd_delete(storage, &project)
        }
    }
}

fn cmd_list(storage: &Storage, search: Option<&str>) -> Result<(), String> {
    let projects = storage
        .list_all()
        .map_err(|e| format!("failed to list projects: {e}"))?;
    let projects = filter_by_name(projects, search);

    if projects.is_empty() {
        println!("No projects");
        return Ok(());
    }

    for project in &projects {
        println!("{}", format_project_row(project));
    }
    Ok(())
}

fn filter_by_name(projects: Vec<Project>, search: Option<&str>) -> Vec<Project> {
    let Some(needle) = search.map(str::trim).filter(|s| !s.is_empty()) else {
        return projects;
    };
    let needle = needle.to_lowercase();
    projects
        .into_iter()
        .filter(|p| p.name.to_lowercase().contains(&needle))
        .collect()
}

fn cmd_show(project: &Project, file: Option<&str>, plain: bool) -> Result<(), String> {
    if let Some(name) = file {
        let file = project
            .files
            .iter()
            .find(|f| f.filename == name)
            .or_else(|| {
                project
                    .files
                    .iter()
                    .find(|f| f.filename.eq_ignore_ascii_case(name))
            })
            .ok_or_else(|| format!("no file '{name}' in {}", project.name))?;
        println!("{}", format_file(file, use_color(plain)));
        return Ok(());
    }

    println!("{}", format_project_row(project));
    println!("{}", project.id);
    if !project.spec_summary.is_empty() {
        println!();
        println!("{}", notes::to_plain(&project.spec_summary));
    }
    if !project.file_tree_text.is_empty() {
        println!();
        println!("{}", project.file_tree_text);
    }
    println!();
    println!("Files:");
    println!("{}", format_file_list(&project.files));
    Ok(())
}

fn cmd_delete(storage: &Storage, project: &Project) -> Result<(), String> {
    let removed = storage
        .delete_by_id(&project.id)
        .map_err(|e| format!("failed to delete project: {e}"))?;
    if !removed {
        return Err(format!("project {} no longer exists", project.short_id()));
    }
    eprintln!("Deleted {} ({})", project.short_id(), project.name);
    Ok(())
}
