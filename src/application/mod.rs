//! Application layer managing session state and the command bar.
//!
//! This module coordinates between the domain layer and presentation layer:
//! the session's state container and the commands that read and write the
//! layout store.

pub mod commands;
pub mod state;

pub use commands::*;
pub use state::*;
