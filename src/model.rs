//! Core data model for the forge.
//!
//! These types describe what a session works on: addon files, the projects
//! they are saved into, the refine conversation, and the generation form.

mod addon;
mod addon_config;
mod feedback;
mod project;
mod settings;

pub use addon::{AddonFile, AddonType, FileType};
pub use addon_config::AddonConfig;
pub use feedback::{FeedbackEntry, Role};
pub use project::Project;
pub use settings::Settings;
