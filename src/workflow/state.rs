//! Workflow phases, the session working copy, and stage receipts.

use std::fmt;

use crate::model::{AddonFile, AddonType, FeedbackEntry};

/// One of the four pipeline operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Generate,
    Refine,
    Deliver,
    Package,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Generate => "generate",
            Self::Refine => "refine",
            Self::Deliver => "deliver",
            Self::Package => "package",
        }
    }

    /// The busy phase the engine sits in while this stage is in flight.
    pub fn busy_phase(self) -> Phase {
        match self {
            Self::Generate => Phase::Generating,
            Self::Refine => Phase::Refining,
            Self::Deliver => Phase::Committing,
            Self::Package => Phase::Packaging,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the engine stands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Nothing generated yet.
    #[default]
    Idle,
    Generating,
    /// An artifact is loaded and stages may run.
    Ready,
    Refining,
    Committing,
    Packaging,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Generating => "generating",
            Self::Ready => "ready",
            Self::Refining => "refining",
            Self::Committing => "committing",
            Self::Packaging => "packaging",
        }
    }

    /// Whether a stage is in flight.
    pub fn is_busy(self) -> bool {
        !matches!(self, Self::Idle | Self::Ready)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Process-local workflow status. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkflowState {
    pub phase: Phase,
    /// Capability of the stage in flight, if any.
    pub active_capability: Option<String>,
    pub status_message: String,
    pub error_message: String,
}

/// The engine's working copy of one project.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub addon_name: String,
    pub addon_type: AddonType,
    pub files: Vec<AddonFile>,
    pub file_tree: String,
    pub spec_summary: String,
    pub generation_summary: String,
    pub iteration_count: u32,
    pub feedback: Vec<FeedbackEntry>,
    pub delivery: Option<DeliveryReceipt>,
    pub package: Option<PackageReceipt>,
    /// Id of the saved project this session writes back to.
    pub project_id: Option<String>,
    /// Demo sessions never touch the project store.
    pub demo: bool,
}

/// What a successful deliver stage reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReceipt {
    pub repository_url: String,
    pub gist_url: String,
    pub message: String,
}

/// What a successful package stage reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageReceipt {
    pub package_name: String,
    pub installation_path: String,
    pub message: String,
    /// May be empty when the packager produced no artifact.
    pub download_url: String,
}

/// Why a stage request was refused. Refusals never change engine state.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("{0}")]
    Validation(String),

    #[error("another stage is in progress ({phase})")]
    Busy { phase: Phase },

    #[error("no addon is loaded ({phase})")]
    NotReady { phase: Phase },

    #[error("stage completion does not belong to the stage in flight")]
    StaleCompletion,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_idle_and_ready_are_at_rest() {
        let busy: Vec<_> = [
            Phase::Idle,
            Phase::Generating,
            Phase::Ready,
            Phase::Refining,
            Phase::Committing,
            Phase::Packaging,
        ]
        .into_iter()
        .filter(|p| p.is_busy())
        .collect();

        assert_eq!(
            busy,
            [Phase::Generating, Phase::Refining, Phase::Committing, Phase::Packaging]
        );
    }

    #[test]
    fn every_stage_has_a_busy_phase() {
        for stage in [Stage::Generate, Stage::Refine, Stage::Deliver, Stage::Package] {
            assert!(stage.busy_phase().is_busy(), "{stage}");
        }
    }
}
