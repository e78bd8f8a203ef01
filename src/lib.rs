//! dndbuilder - Terminal Layout Builder Library
//!
//! Drag UI component tokens into a layout, save and load layouts by name
//! from a document store, and publish a layout as a static HTML page.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
pub use application::*;
