use crate::domain::{Layout, LayoutDocument, NamedLayout, StoreError, StoreResult};
use crate::infrastructure::config::StoreConfig;
use crate::infrastructure::firestore::FirestoreStore;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// A collection of named layouts keyed by name.
///
/// Writes replace the whole document; there is no versioning, so the last
/// writer wins.
pub trait LayoutStore {
    /// Fetches one layout. `Ok(None)` means no document has that name.
    fn get(&self, name: &str) -> StoreResult<Option<Layout>>;

    /// Creates or overwrites the document stored under `name`.
    fn set(&self, name: &str, layout: &Layout) -> StoreResult<()>;

    /// Fetches every stored layout, sorted by name.
    fn list_all(&self) -> StoreResult<Vec<NamedLayout>>;
}

/// Opens the store selected by the configuration.
pub fn open_store(config: &StoreConfig) -> StoreResult<Box<dyn LayoutStore>> {
    match config {
        StoreConfig::File { directory } => {
            let directory = directory
                .clone()
                .unwrap_or_else(crate::infrastructure::config::default_layout_dir);
            tracing::info!(directory = %directory.display(), "using file layout store");
            Ok(Box::new(FileStore::new(directory)))
        }
        StoreConfig::Firestore(firestore) => {
            tracing::info!(
                project = %firestore.project_id,
                collection = %firestore.collection,
                "using firestore layout store"
            );
            Ok(Box::new(FirestoreStore::new(firestore.clone())?))
        }
        StoreConfig::Memory => {
            tracing::info!("using in-memory layout store");
            Ok(Box::new(MemoryStore::default()))
        }
    }
}

/// Process-local store; contents vanish when the session ends.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RefCell<BTreeMap<String, Layout>>,
}

impl LayoutStore for MemoryStore {
    fn get(&self, name: &str) -> StoreResult<Option<Layout>> {
        Ok(self.documents.borrow().get(name).cloned())
    }

    fn set(&self, name: &str, layout: &Layout) -> StoreResult<()> {
        self.documents
            .borrow_mut()
            .insert(name.to_string(), layout.clone());
        Ok(())
    }

    fn list_all(&self) -> StoreResult<Vec<NamedLayout>> {
        Ok(self
            .documents
            .borrow()
            .iter()
            .map(|(name, layout)| NamedLayout {
                name: name.clone(),
                layout: layout.clone(),
            })
            .collect())
    }
}

/// Stores each layout as one pretty-printed JSON document in a directory.
///
/// The file name is the percent-encoded layout name. Names whose encoding
/// would not fit in a file name are cut short, suffixed with a hash, and the
/// full name is kept inside the document.
#[derive(Debug, Clone)]
pub struct FileStore {
    directory: PathBuf,
}

impl FileStore {
    const EXTENSION: &'static str = "json";
    /// Longest file stem written, leaving room for the extension under the
    /// usual 255-byte limit.
    const MAX_STEM_LEN: usize = 200;

    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn document_path(&self, name: &str) -> PathBuf {
        self.directory
            .join(format!("{}.{}", file_stem(name), Self::EXTENSION))
    }

    /// Reads one document. `Ok(None)` only when the file does not exist.
    fn read_document(path: &Path) -> StoreResult<Option<LayoutDocument>> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        serde_json::from_str::<LayoutDocument>(&content)
            .map(Some)
            .map_err(|e| StoreError::Malformed(format!("{}: {}", path.display(), e)))
    }
}

impl LayoutStore for FileStore {
    fn get(&self, name: &str) -> StoreResult<Option<Layout>> {
        let path = self.document_path(name);
        match Self::read_document(&path)? {
            // A hashed file name shared by another long name.
            Some(doc) if doc.name.as_deref().is_some_and(|stored| stored != name) => Ok(None),
            Some(doc) => Ok(Some(doc.layout)),
            None => Ok(None),
        }
    }

    fn set(&self, name: &str, layout: &Layout) -> StoreResult<()> {
        fs::create_dir_all(&self.directory).map_err(|source| StoreError::Io {
            path: self.directory.clone(),
            source,
        })?;
        let path = self.document_path(name);
        let document = if encode_key(name).len() > Self::MAX_STEM_LEN {
            LayoutDocument::named(name, layout.clone())
        } else {
            LayoutDocument::from(layout.clone())
        };
        let json = serde_json::to_string_pretty(&document)
            .map_err(|e| StoreError::Malformed(e.to_string()))?;
        fs::write(&path, json).map_err(|source| StoreError::Io { path, source })
    }

    fn list_all(&self) -> StoreResult<Vec<NamedLayout>> {
        let entries = match fs::read_dir(&self.directory) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.directory.clone(),
                    source,
                });
            }
        };

        let mut layouts = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|source| StoreError::Io {
                    path: self.directory.clone(),
                    source,
                })?
                .path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(Self::EXTENSION) {
                continue;
            }
            let document = match Self::read_document(&path) {
                Ok(Some(document)) => document,
                // Removed between read_dir and the read.
                Ok(None) => continue,
                Err(StoreError::Malformed(detail)) => {
                    tracing::warn!(%detail, "skipping malformed layout document");
                    continue;
                }
                Err(e) => return Err(e),
            };
            let Some(name) = document.name.or_else(|| {
                path.file_stem()
                    .and_then(|stem| stem.to_str())
                    .and_then(decode_key)
            }) else {
                tracing::warn!(path = %path.display(), "skipping file with undecodable name");
                continue;
            };
            layouts.push(NamedLayout {
                name,
                layout: document.layout,
            });
        }
        layouts.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(layouts)
    }
}

/// File stem for `name`: its percent-encoding, or a prefix of it plus a
/// 64-bit FNV-1a hash of the name when the encoding is too long.
fn file_stem(name: &str) -> String {
    let encoded = encode_key(name);
    if encoded.len() <= FileStore::MAX_STEM_LEN {
        return encoded;
    }
    let mut cut = FileStore::MAX_STEM_LEN - 17;
    // Never split a `%XX` escape.
    if let Some(offset) = encoded[cut - 2..cut].find('%') {
        cut = cut - 2 + offset;
    }
    format!("{}~{:016x}", &encoded[..cut], fnv1a(name.as_bytes()))
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0xcbf2_9ce4_8422_2325, |hash, &byte| {
        (hash ^ u64::from(byte)).wrapping_mul(0x0100_0000_01b3)
    })
}

/// Percent-encodes every byte outside `[A-Za-z0-9_-]`.
///
/// The result is safe as a single file name and as a single URL path segment.
pub fn encode_key(key: &str) -> String {
    let mut encoded = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("%{:02X}", byte));
        }
    }
    encoded
}

/// Reverses percent-encoding. Returns `None` for malformed escapes or
/// non-UTF-8 output.
pub fn decode_key(encoded: &str) -> Option<String> {
    let bytes = encoded.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = encoded.get(i + 1..i + 3)?;
            decoded.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            decoded.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(decoded).ok()
}
