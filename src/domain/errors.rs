use std::path::PathBuf;
use thiserror::Error;

/// Failures raised by a layout store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),

    /// The store answered with an unexpected HTTP status.
    #[error("store responded with status {0}")]
    Status(u16),

    /// Reading or writing a local document failed.
    #[error("I/O error on {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A stored document could not be decoded or encoded.
    #[error("malformed layout document: {0}")]
    Malformed(String),
}

/// Failures raised while producing the published output.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("failed to write published page to {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("clipboard unavailable: {0}")]
    Clipboard(String),
}

/// Outcome taxonomy of the command bar, worded for the user.
///
/// Store and publish details stay in the source chain; only the generic
/// message is shown in the dialog.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Please enter a layout name.")]
    EmptyName,

    #[error("No layout found with that name.")]
    NotFound(String),

    #[error("Failed to {action} layout.")]
    Store {
        action: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("Failed to list saved layouts.")]
    Browse(#[source] StoreError),

    #[error("Failed to publish layout.")]
    Publish(#[from] PublishError),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_user_messages() {
        assert_eq!(CommandError::EmptyName.to_string(), "Please enter a layout name.");
        assert_eq!(
            CommandError::NotFound("x".into()).to_string(),
            "No layout found with that name."
        );
        let err = CommandError::Store {
            action: "save",
            source: StoreError::Status(503),
        };
        assert_eq!(err.to_string(), "Failed to save layout.");
    }

    #[test]
    fn test_store_detail_is_kept_as_source() {
        let err = CommandError::Store {
            action: "load",
            source: StoreError::Network("connection refused".into()),
        };
        let source = err.source().map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("network error: connection refused"));
    }
}
