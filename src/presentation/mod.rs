//! Presentation layer handling terminal UI and user input.
//!
//! This module manages the terminal user interface using ratatui,
//! handles keyboard and mouse input, and renders the builder surface.

pub mod confirm;
pub mod input;
pub mod terminal;
pub mod ui;

pub use confirm::*;
pub use input::*;
pub use terminal::*;
pub use ui::*;
