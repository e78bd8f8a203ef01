//! The save, load, browse and publish commands.
//!
//! Commands take the session's layout by reference and return a result; the
//! caller applies it to the session state. Store failures are logged here with
//! their detail and handed back as the generic [`CommandError`] the user sees.

use crate::domain::{
    CommandError, Layout, LayoutName, NamedLayout, SaveDecision, StoreError, decide_save,
};
use crate::infrastructure::{LayoutStore, PageOutput, PublishedPage};

pub const OVERWRITE_QUESTION: &str =
    "A layout with this name already exists. Do you want to overwrite it?";

/// Asks the user whether an existing layout may be overwritten.
///
/// Provided by the surrounding environment: a modal dialog in the terminal,
/// a scripted answer in tests.
pub trait OverwritePrompt {
    fn confirm_overwrite(&mut self, name: &LayoutName) -> bool;
}

impl<F> OverwritePrompt for F
where
    F: FnMut(&LayoutName) -> bool,
{
    fn confirm_overwrite(&mut self, name: &LayoutName) -> bool {
        self(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(LayoutName),
    /// The name existed and the user declined to overwrite it.
    Declined(LayoutName),
}

pub struct CommandBar<'a> {
    store: &'a dyn LayoutStore,
    output: &'a PageOutput,
}

impl<'a> CommandBar<'a> {
    pub fn new(store: &'a dyn LayoutStore, output: &'a PageOutput) -> Self {
        Self { store, output }
    }

    /// Saves `layout` under `raw_name`, asking before overwriting.
    ///
    /// The prompt is only consulted when a layout with that name exists.
    pub fn save(
        &self,
        raw_name: &str,
        layout: &Layout,
        prompt: &mut dyn OverwritePrompt,
    ) -> Result<SaveOutcome, CommandError> {
        let name = LayoutName::parse(raw_name)?;
        let existing = self
            .store
            .get(name.as_str())
            .map_err(|e| store_failure("save", &name, e))?
            .is_some();
        let confirmed = existing && prompt.confirm_overwrite(&name);

        match decide_save(existing, confirmed) {
            SaveDecision::Abort => {
                tracing::info!(%name, "overwrite declined");
                Ok(SaveOutcome::Declined(name))
            }
            SaveDecision::Proceed => {
                self.store
                    .set(name.as_str(), layout)
                    .map_err(|e| store_failure("save", &name, e))?;
                tracing::info!(%name, items = layout.len(), overwrite = existing, "layout saved");
                Ok(SaveOutcome::Saved(name))
            }
        }
    }

    /// Fetches the layout stored under `raw_name`.
    pub fn load(&self, raw_name: &str) -> Result<(LayoutName, Layout), CommandError> {
        let name = LayoutName::parse(raw_name)?;
        match self.store.get(name.as_str()) {
            Ok(Some(layout)) => {
                tracing::info!(%name, items = layout.len(), "layout loaded");
                Ok((name, layout))
            }
            Ok(None) => {
                tracing::info!(%name, "layout not found");
                Err(CommandError::NotFound(name.to_string()))
            }
            Err(e) => Err(store_failure("load", &name, e)),
        }
    }

    /// Lists every saved layout. Never touches the session's layout.
    pub fn browse(&self) -> Result<Vec<NamedLayout>, CommandError> {
        self.store
            .list_all()
            .inspect(|layouts| tracing::info!(count = layouts.len(), "saved layouts listed"))
            .map_err(|e| {
                tracing::error!(error = %e, "listing layouts failed");
                CommandError::Browse(e)
            })
    }

    pub fn publish(&self, layout: &Layout) -> Result<PublishedPage, CommandError> {
        let page = self.output.publish(layout).map_err(|e| {
            tracing::error!(error = %e, "publish failed");
            CommandError::from(e)
        })?;
        tracing::info!(path = %page.path.display(), items = layout.len(), "layout published");
        Ok(page)
    }
}

fn store_failure(action: &'static str, name: &LayoutName, source: StoreError) -> CommandError {
    tracing::error!(%name, error = %source, "failed to {} layout", action);
    CommandError::Store { action, source }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ComponentToken, PlacedItem, StoreResult};
    use crate::infrastructure::MemoryStore;
    use std::cell::Cell;
    use tempfile::TempDir;

    /// Wraps a memory store and counts every call.
    #[derive(Default)]
    struct CountingStore {
        inner: MemoryStore,
        calls: Cell<usize>,
    }

    impl LayoutStore for CountingStore {
        fn get(&self, name: &str) -> StoreResult<Option<Layout>> {
            self.calls.set(self.calls.get() + 1);
            self.inner.get(name)
        }

        fn set(&self, name: &str, layout: &Layout) -> StoreResult<()> {
            self.calls.set(self.calls.get() + 1);
            self.inner.set(name, layout)
        }

        fn list_all(&self) -> StoreResult<Vec<NamedLayout>> {
            self.calls.set(self.calls.get() + 1);
            self.inner.list_all()
        }
    }

    struct FailingStore;

    impl LayoutStore for FailingStore {
        fn get(&self, _name: &str) -> StoreResult<Option<Layout>> {
            Err(StoreError::Network("connection refused".into()))
        }

        fn set(&self, _name: &str, _layout: &Layout) -> StoreResult<()> {
            Err(StoreError::Status(500))
        }

        fn list_all(&self) -> StoreResult<Vec<NamedLayout>> {
            Err(StoreError::Status(503))
        }
    }

    fn layout(tokens: &[ComponentToken]) -> Layout {
        tokens.iter().copied().map(PlacedItem::from).collect()
    }

    fn never_asked(_: &LayoutName) -> bool {
        panic!("overwrite prompt must not be consulted");
    }

    #[test]
    fn test_save_blank_name_never_calls_store() {
        let dir = TempDir::new().unwrap();
        let output = PageOutput::new(dir.path());
        let store = CountingStore::default();
        let bar = CommandBar::new(&store, &output);

        for name in ["", "   ", "\t\n"] {
            let result = bar.save(name, &layout(&[ComponentToken::Label]), &mut never_asked);
            assert!(matches!(result, Err(CommandError::EmptyName)));
        }
        assert!(matches!(bar.load("  "), Err(CommandError::EmptyName)));
        assert_eq!(store.calls.get(), 0);
    }

    #[test]
    fn test_save_new_name_does_not_prompt() {
        let dir = TempDir::new().unwrap();
        let output = PageOutput::new(dir.path());
        let store = MemoryStore::default();
        let bar = CommandBar::new(&store, &output);
        let current = layout(&[ComponentToken::Label, ComponentToken::Button]);

        let outcome = bar.save("demo1", &current, &mut never_asked).unwrap();
        assert_eq!(outcome, SaveOutcome::Saved(LayoutName::parse("demo1").unwrap()));
        assert_eq!(store.get("demo1").unwrap(), Some(current));
    }

    #[test]
    fn test_save_uses_trimmed_name_as_key() {
        let dir = TempDir::new().unwrap();
        let output = PageOutput::new(dir.path());
        let store = MemoryStore::default();
        let bar = CommandBar::new(&store, &output);

        bar.save("  demo1 ", &Layout::new(), &mut never_asked).unwrap();
        assert!(store.get("demo1").unwrap().is_some());
        assert!(bar.load("demo1 ").is_ok());
    }

    #[test]
    fn test_save_existing_declined_keeps_stored_layout() {
        let dir = TempDir::new().unwrap();
        let output = PageOutput::new(dir.path());
        let store = MemoryStore::default();
        let original = layout(&[ComponentToken::Table]);
        store.set("demo1", &original).unwrap();
        let bar = CommandBar::new(&store, &output);

        let mut asked = Vec::new();
        let mut decline = |name: &LayoutName| {
            asked.push(name.to_string());
            false
        };
        let outcome = bar
            .save("demo1", &layout(&[ComponentToken::Input]), &mut decline)
            .unwrap();

        assert!(matches!(outcome, SaveOutcome::Declined(_)));
        assert_eq!(asked, vec!["demo1"]);
        assert_eq!(store.get("demo1").unwrap(), Some(original));
    }

    #[test]
    fn test_save_existing_confirmed_overwrites() {
        let dir = TempDir::new().unwrap();
        let output = PageOutput::new(dir.path());
        let store = MemoryStore::default();
        store.set("demo1", &layout(&[ComponentToken::Table])).unwrap();
        let bar = CommandBar::new(&store, &output);
        let replacement = layout(&[ComponentToken::Input, ComponentToken::Input]);

        let outcome = bar
            .save("demo1", &replacement, &mut |_: &LayoutName| true)
            .unwrap();

        assert!(matches!(outcome, SaveOutcome::Saved(_)));
        assert_eq!(store.get("demo1").unwrap(), Some(replacement));
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let output = PageOutput::new(dir.path());
        let store = MemoryStore::default();
        let bar = CommandBar::new(&store, &output);
        let current = layout(&[
            ComponentToken::Checkbox,
            ComponentToken::Label,
            ComponentToken::Checkbox,
        ]);

        bar.save("form", &current, &mut never_asked).unwrap();
        let (name, loaded) = bar.load("form").unwrap();
        assert_eq!(name.as_str(), "form");
        assert_eq!(loaded, current);
    }

    #[test]
    fn test_load_missing_name_is_not_found() {
        let dir = TempDir::new().unwrap();
        let output = PageOutput::new(dir.path());
        let store = MemoryStore::default();
        let bar = CommandBar::new(&store, &output);

        match bar.load("ghost") {
            Err(CommandError::NotFound(name)) => assert_eq!(name, "ghost"),
            other => panic!("expected not found, got {:?}", other),
        }
    }

    #[test]
    fn test_store_failures_map_to_generic_errors() {
        let dir = TempDir::new().unwrap();
        let output = PageOutput::new(dir.path());
        let bar = CommandBar::new(&FailingStore, &output);

        let save = bar.save("demo1", &Layout::new(), &mut never_asked);
        assert_eq!(save.unwrap_err().to_string(), "Failed to save layout.");

        let load = bar.load("demo1");
        assert!(matches!(
            load,
            Err(CommandError::Store { action: "load", source: StoreError::Network(_) })
        ));

        let browse = bar.browse();
        assert_eq!(browse.unwrap_err().to_string(), "Failed to list saved layouts.");
    }

    #[test]
    fn test_browse_lists_without_touching_layout() {
        let dir = TempDir::new().unwrap();
        let output = PageOutput::new(dir.path());
        let store = MemoryStore::default();
        store.set("b", &layout(&[ComponentToken::Label])).unwrap();
        store.set("a", &Layout::new()).unwrap();
        let bar = CommandBar::new(&store, &output);

        let names: Vec<String> = bar.browse().unwrap().into_iter().map(|l| l.name).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_publish_renders_in_layout_order() {
        let dir = TempDir::new().unwrap();
        let output = PageOutput::new(dir.path());
        let store = MemoryStore::default();
        let bar = CommandBar::new(&store, &output);

        let page = bar
            .publish(&layout(&[ComponentToken::Label, ComponentToken::Button]))
            .unwrap();
        let label = page.markup.find("<div>Label</div>").unwrap();
        let button = page.markup.find("<div>Button</div>").unwrap();
        assert!(label < button);
    }
}
