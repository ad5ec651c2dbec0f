//! Terminal review screen.
//!
//! The screen is a projection of the workflow engine plus a little local
//! state (selected file, scroll, text being typed). Each frame is computed by
//! [`view::project`]; when that fails the screen shows a fallback with a
//! reset key instead of drawing inconsistent state.

mod app;
mod review;
mod view;

pub use app::run;
