//! The iterative generation workflow.
//!
//! [`Engine`] owns the [`WorkflowState`] and the [`Session`] working copy and
//! moves them through the stage pipeline:
//!
//! ```text
//! idle -> generating -> ready <-> refining
//!                       ready <-> committing
//!                       ready <-> packaging
//! ```
//!
//! Only one stage is in flight at a time. Gateway replies are validated into
//! typed replies in [`reply`] before they touch the session.

mod engine;
mod prompt;
mod reply;
mod state;

pub use engine::{Engine, PendingStage, StageReport};
pub use state::{
    DeliveryReceipt, PackageReceipt, Phase, Session, Stage, WorkflowError, WorkflowState,
};
