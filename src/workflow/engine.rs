//! The stage state machine.
//!
//! Each stage is split in two so callers control when the gateway call
//! happens:
//!
//! ```text
//! begin_<stage>(..) -> PendingStage        validate, enter the busy phase
//! gateway.call(prompt, capability)         caller's side
//! finish(pending, outcome, records)        apply the reply, leave the busy phase
//! ```
//!
//! `run_<stage>` does all three in one go.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::config::Capabilities;
use crate::gateway::{AgentGateway, GatewayResponse, TransportFault};
use crate::model::{AddonConfig, AddonType, FeedbackEntry, Project, Settings};
use crate::sample;
use crate::storage::ProjectRecords;

use super::prompt;
use super::reply::{DeliverReply, GenerateReply, PackageReply, RefineReply};
use super::state::{
    DeliveryReceipt, PackageReceipt, Phase, Session, Stage, WorkflowError, WorkflowState,
};

const DEFAULT_ADDON_NAME: &str = "MyAddon";
const DEFAULT_INSTALL_PATH: &str = "World of Warcraft/_retail_/Interface/AddOns/";

static NEXT_ENGINE_ID: AtomicU64 = AtomicU64::new(1);

/// A stage that has been entered and is waiting for its gateway outcome.
///
/// Only [`Engine`]'s `begin_*` methods create one. The engine stays busy
/// until it is handed back through [`Engine::finish`], or through
/// [`Engine::abandon`] when the gateway was never called.
#[derive(Debug)]
#[must_use = "the engine stays busy until the stage is finished or abandoned"]
pub struct PendingStage {
    engine: u64,
    token: u64,
    stage: Stage,
    capability: String,
    prompt: String,
    payload: Payload,
}

impl PendingStage {
    pub fn capability(&self) -> &str {
        &self.capability
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }
}

/// Stage input that `finish` needs back.
#[derive(Debug)]
enum Payload {
    Generate { config: AddonConfig, demo: bool },
    Refine { feedback: String },
    Deliver,
    Package { addon_name: String },
}

/// How a finished stage went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageReport {
    Generated {
        /// `None` for demo sessions or when saving failed.
        project_id: Option<String>,
        files: usize,
    },
    Refined {
        iteration: u32,
        files_replaced: bool,
    },
    Delivered(DeliveryReceipt),
    Packaged(PackageReceipt),
    Failed {
        stage: Stage,
        error: String,
    },
}

/// Why a gateway call did not produce a usable reply.
enum Failure {
    /// The gateway answered with `success = false`.
    Rejected(Option<String>),
    Fault(TransportFault),
}

fn accepted(outcome: Result<GatewayResponse, TransportFault>) -> Result<GatewayResponse, Failure> {
    match outcome {
        Ok(response) if response.success => Ok(response),
        Ok(response) => Err(Failure::Rejected(response.error)),
        Err(fault) => Err(Failure::Fault(fault)),
    }
}

/// Owns the workflow state and the session, and is the only thing that
/// changes either.
pub struct Engine {
    id: u64,
    capabilities: Capabilities,
    state: WorkflowState,
    session: Session,
    in_flight: Option<u64>,
    next_token: u64,
}

impl Engine {
    pub fn new(capabilities: Capabilities) -> Self {
        Self {
            id: NEXT_ENGINE_ID.fetch_add(1, Ordering::Relaxed),
            capabilities,
            state: WorkflowState::default(),
            session: Session::default(),
            in_flight: None,
            next_token: 1,
        }
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Dismisses the current error message.
    pub fn clear_error(&mut self) {
        self.state.error_message.clear();
    }

    // ---- stage entry ----

    /// Enters the generate stage.
    ///
    /// With `sample` set, the canned demo form replaces `config` and the
    /// resulting session is never saved.
    pub fn begin_generate(
        &mut self,
        config: AddonConfig,
        settings: &Settings,
        sample: bool,
    ) -> Result<PendingStage, WorkflowError> {
        self.ensure_not_busy()?;

        let config = if sample {
            sample::config()
        } else {
            if config.addon_name.trim().is_empty() {
                return Err(WorkflowError::Validation("addon name is required".into()));
            }
            if config.features.trim().is_empty() {
                return Err(WorkflowError::Validation("feature requirements are required".into()));
            }
            config.with_defaults(settings)
        };

        self.session.delivery = None;
        self.session.package = None;

        let prompt = prompt::generate(&config);
        Ok(self.enter(Stage::Generate, prompt, Payload::Generate { config, demo: sample }))
    }

    /// Enters the refine stage with the developer's feedback.
    pub fn begin_refine(&mut self, feedback: &str) -> Result<PendingStage, WorkflowError> {
        self.ensure_ready()?;

        let feedback = feedback.trim();
        if feedback.is_empty() {
            return Err(WorkflowError::Validation("feedback is required".into()));
        }

        let prompt = prompt::refine(&self.session.addon_name, &self.session.files, feedback);
        Ok(self.enter(
            Stage::Refine,
            prompt,
            Payload::Refine {
                feedback: feedback.to_string(),
            },
        ))
    }

    /// Enters the deliver stage. Empty `branch` and `message` take their defaults.
    pub fn begin_deliver(
        &mut self,
        repo: &str,
        branch: &str,
        message: &str,
    ) -> Result<PendingStage, WorkflowError> {
        self.ensure_ready()?;

        let repo = repo.trim();
        if repo.is_empty() {
            return Err(WorkflowError::Validation("repository name is required".into()));
        }
        self.ensure_files()?;

        let branch = or_default(branch, prompt::DEFAULT_BRANCH);
        let message = or_default(message, prompt::DEFAULT_COMMIT_MESSAGE);

        self.session.delivery = None;

        let prompt = prompt::deliver(
            &self.session.addon_name,
            &self.session.files,
            repo,
            branch,
            message,
        );
        Ok(self.enter(Stage::Deliver, prompt, Payload::Deliver))
    }

    /// Enters the package stage. `addon_name` overrides the session's name.
    pub fn begin_package(&mut self, addon_name: Option<&str>) -> Result<PendingStage, WorkflowError> {
        self.ensure_ready()?;
        self.ensure_files()?;

        let addon_name = addon_name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(self.session.addon_name.as_str());
        let addon_name = or_default(addon_name, "Addon").to_string();

        self.session.package = None;

        let prompt = prompt::package(&addon_name, &self.session.files);
        Ok(self.enter(Stage::Package, prompt, Payload::Package { addon_name }))
    }

    fn enter(&mut self, stage: Stage, prompt: String, payload: Payload) -> PendingStage {
        let capability = self.capabilities.for_stage(stage).to_string();
        let token = self.next_token;
        self.next_token += 1;
        self.in_flight = Some(token);

        self.state.phase = stage.busy_phase();
        self.state.active_capability = Some(capability.clone());
        self.state.status_message = busy_message(stage).to_string();
        self.state.error_message.clear();

        tracing::info!(%stage, %capability, "stage started");
        tracing::debug!(%stage, prompt = %prompt, "stage prompt");

        PendingStage {
            engine: self.id,
            token,
            stage,
            capability,
            prompt,
            payload,
        }
    }

    fn ensure_not_busy(&self) -> Result<(), WorkflowError> {
        if self.state.phase.is_busy() {
            return Err(WorkflowError::Busy {
                phase: self.state.phase,
            });
        }
        Ok(())
    }

    fn ensure_ready(&self) -> Result<(), WorkflowError> {
        self.ensure_not_busy()?;
        if self.state.phase != Phase::Ready {
            return Err(WorkflowError::NotReady {
                phase: self.state.phase,
            });
        }
        Ok(())
    }

    fn ensure_files(&self) -> Result<(), WorkflowError> {
        if self.session.files.is_empty() {
            return Err(WorkflowError::Validation("the addon has no files".into()));
        }
        Ok(())
    }

    // ---- stage completion ----

    /// Applies a gateway outcome to the stage in flight.
    ///
    /// Always leaves the busy phase. Gateway errors and transport faults come
    /// back as [`StageReport::Failed`]; the only `Err` is a `pending` that
    /// does not belong to the stage in flight, which changes nothing.
    pub fn finish(
        &mut self,
        pending: PendingStage,
        outcome: Result<GatewayResponse, TransportFault>,
        records: &dyn ProjectRecords,
    ) -> Result<StageReport, WorkflowError> {
        if pending.engine != self.id || self.in_flight != Some(pending.token) {
            return Err(WorkflowError::StaleCompletion);
        }
        self.in_flight = None;
        self.state.active_capability = None;

        let outcome = accepted(outcome);
        let report = match pending.payload {
            Payload::Generate { config, demo } => self.finish_generate(&config, demo, outcome, records),
            Payload::Refine { feedback } => self.finish_refine(feedback, outcome, records),
            Payload::Deliver => self.finish_deliver(outcome),
            Payload::Package { addon_name } => self.finish_package(&addon_name, outcome),
        };

        debug_assert!(!self.state.phase.is_busy());
        tracing::info!(stage = %pending.stage, phase = %self.state.phase, "stage finished");
        Ok(report)
    }

    /// Gives up on a stage whose gateway call never happened.
    ///
    /// Returns to the phase a failed attempt would leave, with no error
    /// recorded. A `pending` that is not in flight changes nothing.
    pub fn abandon(&mut self, pending: PendingStage) -> Result<(), WorkflowError> {
        if pending.engine != self.id || self.in_flight != Some(pending.token) {
            return Err(WorkflowError::StaleCompletion);
        }
        self.in_flight = None;
        self.state.active_capability = None;
        self.state.status_message.clear();
        self.state.phase = match pending.stage {
            Stage::Generate if self.session.files.is_empty() => Phase::Idle,
            _ => Phase::Ready,
        };
        tracing::info!(stage = %pending.stage, "stage abandoned");
        Ok(())
    }

    fn finish_generate(
        &mut self,
        config: &AddonConfig,
        demo: bool,
        outcome: Result<GatewayResponse, Failure>,
        records: &dyn ProjectRecords,
    ) -> StageReport {
        // A failed generate keeps whatever artifact was already loaded.
        let fallback = if self.session.files.is_empty() {
            Phase::Idle
        } else {
            Phase::Ready
        };

        let response = match outcome {
            Ok(response) => response,
            Err(Failure::Rejected(error)) => {
                let error = error.unwrap_or_else(|| "Failed to generate addon".into());
                return self.fail(Stage::Generate, error, fallback);
            }
            Err(Failure::Fault(fault)) => {
                let error = format!("An unexpected error occurred: {fault}");
                return self.fail(Stage::Generate, error, fallback);
            }
        };

        let reply = GenerateReply::from_result(response.result.as_ref());
        if reply.files.is_empty() {
            return self.fail(Stage::Generate, "Generation returned no files".into(), fallback);
        }

        let addon_name = [reply.addon_name.trim(), config.addon_name.trim()]
            .into_iter()
            .find(|n| !n.is_empty())
            .unwrap_or(DEFAULT_ADDON_NAME)
            .to_string();
        let files = reply.files.len();

        self.session = Session {
            addon_name,
            addon_type: config.addon_type,
            files: reply.files,
            file_tree: reply.file_tree,
            spec_summary: reply.specification_summary,
            generation_summary: reply.generation_summary,
            iteration_count: 1,
            demo,
            ..Session::default()
        };
        self.state.phase = Phase::Ready;
        self.state.status_message = "Addon generated successfully!".into();

        if !demo {
            self.session.project_id = self.save_new_project(records);
        }

        StageReport::Generated {
            project_id: self.session.project_id.clone(),
            files,
        }
    }

    fn save_new_project(&self, records: &dyn ProjectRecords) -> Option<String> {
        let mut project = Project::new(
            self.session.addon_name.clone(),
            self.session.addon_type,
            self.session.files.clone(),
        );
        project.file_tree_text.clone_from(&self.session.file_tree);
        project.spec_summary.clone_from(&self.session.spec_summary);

        match records.create(&project) {
            Ok(()) => Some(project.id),
            Err(e) => {
                tracing::warn!(error = %e, name = %project.name, "failed to save project");
                None
            }
        }
    }

    fn finish_refine(
        &mut self,
        feedback: String,
        outcome: Result<GatewayResponse, Failure>,
        records: &dyn ProjectRecords,
    ) -> StageReport {
        let response = match outcome {
            Ok(response) => response,
            Err(failure) => {
                let (error, agent) = match failure {
                    Failure::Rejected(error) => (
                        error.clone().unwrap_or_else(|| "Failed to refine addon".into()),
                        error.unwrap_or_else(|| "Failed to process feedback".into()),
                    ),
                    Failure::Fault(fault) => (
                        format!("An unexpected error occurred during refinement: {fault}"),
                        fault.to_string(),
                    ),
                };
                self.session.feedback.push(FeedbackEntry::user(feedback));
                self.session
                    .feedback
                    .push(FeedbackEntry::agent(format!("Error: {agent}")));
                return self.fail(Stage::Refine, error, Phase::Ready);
            }
        };

        let reply = RefineReply::from_result(response.result.as_ref());
        let files_replaced = !reply.updated_files.is_empty();
        let agent_message = reply.agent_message();
        if files_replaced {
            self.session.files = reply.updated_files;
        }
        self.session.iteration_count += 1;
        self.session.feedback.push(FeedbackEntry::user(feedback));
        self.session.feedback.push(FeedbackEntry::agent(agent_message));

        self.state.phase = Phase::Ready;
        self.state.status_message = "Refinement complete!".into();

        if !self.session.demo {
            let files = files_replaced.then(|| self.session.files.clone());
            let name = &self.session.addon_name;
            let updated = records.update_by_name(name, &mut |project: &mut Project| {
                if let Some(files) = &files {
                    project.files.clone_from(files);
                }
                project.iteration_count += 1;
            });
            match updated {
                Ok(0) => tracing::debug!(%name, "no saved project to update"),
                Ok(_) => {}
                Err(e) => tracing::warn!(error = %e, %name, "failed to update project"),
            }
        }

        StageReport::Refined {
            iteration: self.session.iteration_count,
            files_replaced,
        }
    }

    fn finish_deliver(&mut self, outcome: Result<GatewayResponse, Failure>) -> StageReport {
        let response = match outcome {
            Ok(response) => response,
            Err(Failure::Rejected(error)) => {
                let error = error.unwrap_or_else(|| "Failed to commit to GitHub".into());
                return self.fail(Stage::Deliver, error, Phase::Ready);
            }
            Err(Failure::Fault(fault)) => {
                let error = format!("GitHub commit failed: {fault}");
                return self.fail(Stage::Deliver, error, Phase::Ready);
            }
        };

        let reply = DeliverReply::from_result(response.result.as_ref());
        let receipt = DeliveryReceipt {
            repository_url: reply.repository_url,
            gist_url: reply.gist_url,
            message: reply.message,
        };
        self.session.delivery = Some(receipt.clone());
        self.state.phase = Phase::Ready;
        self.state.status_message = "Committed to GitHub!".into();

        StageReport::Delivered(receipt)
    }

    fn finish_package(
        &mut self,
        addon_name: &str,
        outcome: Result<GatewayResponse, Failure>,
    ) -> StageReport {
        let response = match outcome {
            Ok(response) => response,
            Err(Failure::Rejected(error)) => {
                let error = error.unwrap_or_else(|| "Failed to package addon".into());
                return self.fail(Stage::Package, error, Phase::Ready);
            }
            Err(Failure::Fault(fault)) => {
                let error = format!("Packaging failed: {fault}");
                return self.fail(Stage::Package, error, Phase::Ready);
            }
        };

        let reply = PackageReply::from_result(response.result.as_ref());
        let receipt = PackageReceipt {
            package_name: reply
                .package_name
                .unwrap_or_else(|| format!("{addon_name}.zip")),
            installation_path: reply
                .installation_path
                .unwrap_or_else(|| DEFAULT_INSTALL_PATH.to_string()),
            message: reply.message,
            download_url: response.primary_artifact_url().to_string(),
        };
        self.session.package = Some(receipt.clone());
        self.state.phase = Phase::Ready;
        self.state.status_message = "Package ready for download!".into();

        StageReport::Packaged(receipt)
    }

    fn fail(&mut self, stage: Stage, error: String, phase: Phase) -> StageReport {
        tracing::warn!(%stage, %error, "stage failed");
        self.state.phase = phase;
        self.state.status_message.clear();
        self.state.error_message.clone_from(&error);
        StageReport::Failed { stage, error }
    }

    // ---- loading ----

    /// Loads a saved project as the working copy, ready for further stages.
    ///
    /// Conversation history and receipts are not restored.
    pub fn resume(&mut self, project: &Project) -> Result<(), WorkflowError> {
        self.ensure_not_busy()?;

        self.session = Session {
            addon_name: project.name.clone(),
            addon_type: project.addon_type,
            files: project.files.clone(),
            file_tree: project.file_tree_text.clone(),
            spec_summary: project.spec_summary.clone(),
            iteration_count: project.iteration_count,
            project_id: Some(project.id.clone()),
            ..Session::default()
        };
        self.state = WorkflowState {
            phase: Phase::Ready,
            ..WorkflowState::default()
        };
        tracing::info!(project = %project.id, name = %project.name, "project resumed");
        Ok(())
    }

    /// Loads the canned demo addon. Demo sessions are never saved.
    pub fn load_sample(&mut self) -> Result<(), WorkflowError> {
        self.ensure_not_busy()?;

        let files = sample::files();
        self.session = Session {
            addon_name: sample::ADDON_NAME.to_string(),
            addon_type: AddonType::Combat,
            file_tree: sample::file_tree(&files),
            files,
            feedback: sample::feedback(),
            iteration_count: 1,
            demo: true,
            ..Session::default()
        };
        self.state = WorkflowState {
            phase: Phase::Ready,
            ..WorkflowState::default()
        };
        Ok(())
    }

    // ---- one-shot helpers ----

    /// Sends a pending stage through `gateway` and finishes it.
    pub fn run(
        &mut self,
        pending: PendingStage,
        gateway: &dyn AgentGateway,
        records: &dyn ProjectRecords,
    ) -> Result<StageReport, WorkflowError> {
        let outcome = gateway.call(pending.prompt(), pending.capability());
        self.finish(pending, outcome, records)
    }

    pub fn run_generate(
        &mut self,
        gateway: &dyn AgentGateway,
        records: &dyn ProjectRecords,
        config: AddonConfig,
        settings: &Settings,
        sample: bool,
    ) -> Result<StageReport, WorkflowError> {
        let pending = self.begin_generate(config, settings, sample)?;
        self.run(pending, gateway, records)
    }

    pub fn run_refine(
        &mut self,
        gateway: &dyn AgentGateway,
        records: &dyn ProjectRecords,
        feedback: &str,
    ) -> Result<StageReport, WorkflowError> {
        let pending = self.begin_refine(feedback)?;
        self.run(pending, gateway, records)
    }

    pub fn run_deliver(
        &mut self,
        gateway: &dyn AgentGateway,
        records: &dyn ProjectRecords,
        repo: &str,
        branch: &str,
        message: &str,
    ) -> Result<StageReport, WorkflowError> {
        let pending = self.begin_deliver(repo, branch, message)?;
        self.run(pending, gateway, records)
    }

    pub fn run_package(
        &mut self,
        gateway: &dyn AgentGateway,
        records: &dyn ProjectRecords,
        addon_name: Option<&str>,
    ) -> Result<StageReport, WorkflowError> {
        let pending = self.begin_package(addon_name)?;
        self.run(pending, gateway, records)
    }
}

fn busy_message(stage: Stage) -> &'static str {
    match stage {
        Stage::Generate => "Generating your addon...",
        Stage::Refine => "Applying your feedback...",
        Stage::Deliver => "Committing to GitHub...",
        Stage::Package => "Packaging addon...",
    }
}

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    let value = value.trim();
    if value.is_empty() { default } else { value }
}
