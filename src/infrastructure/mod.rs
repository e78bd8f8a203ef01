//! Infrastructure layer providing external service integrations.
//!
//! Layout stores (local files, memory, Firestore), configuration loading,
//! file logging, and the publish output.

pub mod config;
pub mod firestore;
pub mod logging;
pub mod persistence;
pub mod publish;

pub use persistence::*;
pub use publish::*;
