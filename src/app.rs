//! Application module: the navigation state machine and its render model.
//!
//! `NavigationController` lives in `app::model`; `app::render` turns its
//! state into a `RenderModel` for the TUI.

mod model;
mod render;

pub use model::*;
pub use render::{RenderModel, Row};

#[cfg(test)]
mod tests;
