//! Runs a `interface::game::Game` in a window.

mod assets;
mod window;

pub use crate::window::start;
