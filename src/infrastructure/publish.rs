use crate::domain::{Layout, PageRenderer, PublishError};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// A rendered page together with where it was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedPage {
    pub markup: String,
    pub path: PathBuf,
}

/// Writes published pages into a directory, one new file per publish.
#[derive(Debug, Clone)]
pub struct PageOutput {
    directory: PathBuf,
}

impl PageOutput {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn publish(&self, layout: &Layout) -> Result<PublishedPage, PublishError> {
        let markup = PageRenderer::render(layout);
        fs::create_dir_all(&self.directory).map_err(|source| PublishError::Io {
            path: self.directory.clone(),
            source,
        })?;
        let path = self.next_path();
        fs::write(&path, &markup).map_err(|source| PublishError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(PublishedPage { markup, path })
    }

    fn next_path(&self) -> PathBuf {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        let mut path = self.directory.join(format!("published-{}.html", millis));
        let mut suffix = 1;
        while path.exists() {
            path = self
                .directory
                .join(format!("published-{}-{}.html", millis, suffix));
            suffix += 1;
        }
        path
    }
}

/// Puts text on the system clipboard.
pub fn copy_to_clipboard(text: &str) -> Result<(), PublishError> {
    let mut clipboard =
        arboard::Clipboard::new().map_err(|e| PublishError::Clipboard(e.to_string()))?;
    clipboard
        .set_text(text.to_string())
        .map_err(|e| PublishError::Clipboard(e.to_string()))
}
