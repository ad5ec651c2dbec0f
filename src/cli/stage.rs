//! Stage commands: generate, refine, deliver, package.
//!
//! Each runs exactly one gateway call through a fresh engine. Stage failures
//! become the command's error; the workflow has already settled by then.

use crate::config::Config;
use crate::gateway::{self, AgentGateway};
use crate::model::{FeedbackEntry, Project, Role};
use crate::notes;
use crate::storage::Storage;
use crate::workflow::{Engine, StageReport};

use super::FormArgs;
use super::form::warn_unconventional;
use super::format::{format_delivery, format_file_list, format_package};

fn connect(config: &Config) -> Result<Box<dyn AgentGateway>, String> {
    gateway::from_config(&config.gateway)
}

/// An engine with `project` loaded and ready for a stage.
fn resumed(config: &Config, project: &Project) -> Result<Engine, String> {
    let mut engine = Engine::new(config.capabilities.clone());
    engine.resume(project).map_err(|e| e.to_string())?;
    Ok(engine)
}

pub(super) fn cmd_generate(
    config: &Config,
    storage: &Storage,
    form: FormArgs,
    sample: bool,
) -> Result<(), String> {
    let gateway = connect(config)?;
    let form = form.into_config();
    if !sample {
        warn_unconventional(&form);
    }

    let mut engine = Engine::new(config.capabilities.clone());
    let settings = storage.load_settings();
    eprintln!("Generating your addon...");
    let report = engine
        .run_generate(gateway.as_ref(), storage, form, &settings, sample)
        .map_err(|e| e.to_string())?;

    let project_id = match report {
        StageReport::Generated { project_id, .. } => project_id,
        other => return Err(failure(other)),
    };

    let session = engine.session();
    match project_id {
        Some(id) => println!("{id}"),
        None if session.demo => eprintln!("Sample run: the result is not saved"),
        None => eprintln!("Warning: the project could not be saved"),
    }
    eprintln!("{} ({} files)", session.addon_name, session.files.len());
    eprintln!("{}", format_file_list(&session.files));
    if !session.generation_summary.is_empty() {
        eprintln!();
        eprintln!("{}", notes::to_plain(&session.generation_summary));
    }
    Ok(())
}

pub(super) fn cmd_refine(
    config: &Config,
    storage: &Storage,
    project: &Project,
    feedback: &str,
) -> Result<(), String> {
    let gateway = connect(config)?;
    let mut engine = resumed(config, project)?;

    eprintln!("Applying your feedback...");
    let report = engine
        .run_refine(gateway.as_ref(), storage, feedback)
        .map_err(|e| e.to_string())?;

    let (iteration, files_replaced) = match report {
        StageReport::Refined {
            iteration,
            files_replaced,
        } => (iteration, files_replaced),
        other => return Err(failure(other)),
    };

    if let Some(reply) = last_agent_entry(&engine.session().feedback) {
        println!("{}", notes::to_plain(&reply.message));
    }
    eprintln!();
    eprintln!("Iteration {iteration}");
    if !files_replaced {
        eprintln!("No file changes");
    }
    Ok(())
}

pub(super) fn cmd_deliver(
    config: &Config,
    storage: &Storage,
    project: &Project,
    repo: &str,
    branch: &str,
    message: &str,
) -> Result<(), String> {
    let gateway = connect(config)?;
    let mut engine = resumed(config, project)?;

    eprintln!("Committing to GitHub...");
    match engine
        .run_deliver(gateway.as_ref(), storage, repo, branch, message)
        .map_err(|e| e.to_string())?
    {
        StageReport::Delivered(receipt) => {
            println!("{}", format_delivery(&receipt));
            Ok(())
        }
        other => Err(failure(other)),
    }
}

pub(super) fn cmd_package(
    config: &Config,
    storage: &Storage,
    project: &Project,
    name: Option<&str>,
) -> Result<(), String> {
    let gateway = connect(config)?;
    let mut engine = resumed(config, project)?;

    eprintln!("Packaging addon...");
    match engine
        .run_package(gateway.as_ref(), storage, name)
        .map_err(|e| e.to_string())?
    {
        StageReport::Packaged(receipt) => {
            println!("{}", format_package(&receipt));
            Ok(())
        }
        other => Err(failure(other)),
    }
}

fn last_agent_entry(feedback: &[FeedbackEntry]) -> Option<&FeedbackEntry> {
    feedback.iter().rev().find(|e| e.role == Role::Agent)
}

fn failure(report: StageReport) -> String {
    match report {
        StageReport::Failed { stage, error } => format!("{stage} failed: {error}"),
        other => format!("unexpected stage result: {other:?}"),
    }
}
