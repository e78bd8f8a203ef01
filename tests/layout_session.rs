use dndbuilder::application::{App, CommandBar, DropTarget, SaveOutcome};
use dndbuilder::domain::{CommandError, ComponentToken, LayoutName};
use dndbuilder::infrastructure::{FileStore, LayoutStore, PageOutput};
use tempfile::TempDir;

fn ids(app: &App) -> Vec<String> {
    app.layout.iter().map(|item| item.id.clone()).collect()
}

fn decline(_: &LayoutName) -> bool {
    false
}

#[test]
fn drop_save_reload_and_publish() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::new(dir.path().join("layouts"));
    let output = PageOutput::new(dir.path().join("published"));
    let commands = CommandBar::new(&store, &output);

    let mut first = App::default();
    first.handle_drop(ComponentToken::Label, DropTarget::DropZone);
    first.handle_drop(ComponentToken::Button, DropTarget::DropZone);
    assert_eq!(ids(&first), vec!["Label", "Button"]);

    first.layout_name = "demo1".to_string();
    let saved = commands.save(&first.layout_name, &first.layout, &mut decline);
    assert!(matches!(saved, Ok(SaveOutcome::Saved(_))));
    first.set_save_result(saved);

    let mut second = App::default();
    assert!(second.layout.is_empty());
    second.layout_name = "demo1".to_string();
    second.set_load_result(commands.load(&second.layout_name));
    assert_eq!(ids(&second), vec!["Label", "Button"]);

    let page = commands.publish(&second.layout).unwrap();
    let label = page.markup.find("Label").unwrap();
    let button = page.markup.find("Button").unwrap();
    assert!(label < button);
    assert_eq!(std::fs::read_to_string(&page.path).unwrap(), page.markup);
}

#[test]
fn blank_name_and_unknown_name_leave_state_alone() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::new(dir.path());
    let output = PageOutput::new(dir.path().join("published"));
    let commands = CommandBar::new(&store, &output);

    let mut app = App::default();
    app.handle_drop(ComponentToken::Table, DropTarget::DropZone);
    let before = app.layout.clone();

    app.layout_name = "   ".to_string();
    let saved = commands.save(&app.layout_name, &app.layout, &mut decline);
    assert!(matches!(saved, Err(CommandError::EmptyName)));
    assert!(store.list_all().unwrap().is_empty());

    app.layout_name = "never-written".to_string();
    app.set_load_result(commands.load(&app.layout_name));
    assert_eq!(app.layout, before);
    assert_eq!(
        app.alert.as_ref().map(|a| a.message.as_str()),
        Some("No layout found with that name.")
    );
}

#[test]
fn declined_overwrite_keeps_first_save() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::new(dir.path());
    let output = PageOutput::new(dir.path().join("published"));
    let commands = CommandBar::new(&store, &output);

    let mut app = App::default();
    app.handle_drop(ComponentToken::Input, DropTarget::DropZone);
    commands.save("form", &app.layout, &mut decline).unwrap();
    let first = app.layout.clone();

    app.handle_drop(ComponentToken::Checkbox, DropTarget::DropZone);
    let outcome = commands.save("form", &app.layout, &mut decline).unwrap();
    assert!(matches!(outcome, SaveOutcome::Declined(_)));
    assert_eq!(store.get("form").unwrap(), Some(first));
}

#[test]
fn unreadable_document_is_a_load_failure_not_a_missing_layout() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::new(dir.path());
    let output = PageOutput::new(dir.path().join("published"));
    let commands = CommandBar::new(&store, &output);
    std::fs::create_dir(dir.path().join("demo1.json")).unwrap();

    let mut app = App::default();
    app.handle_drop(ComponentToken::Label, DropTarget::DropZone);
    app.layout_name = "demo1".to_string();
    let result = commands.load(&app.layout_name);
    assert!(matches!(result, Err(CommandError::Store { action: "load", .. })));

    app.set_load_result(result);
    assert_eq!(ids(&app), vec!["Label"]);
    assert_eq!(
        app.alert.as_ref().map(|a| a.message.as_str()),
        Some("Failed to load layout.")
    );
}

#[test]
fn long_non_ascii_name_saves_and_loads() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::new(dir.path());
    let output = PageOutput::new(dir.path().join("published"));
    let commands = CommandBar::new(&store, &output);
    let name = "é".repeat(60);

    let mut app = App::default();
    app.handle_drop(ComponentToken::Checkbox, DropTarget::DropZone);
    let saved = commands.save(&name, &app.layout, &mut decline);
    assert!(matches!(saved, Ok(SaveOutcome::Saved(_))));

    let (loaded_name, layout) = commands.load(&name).unwrap();
    assert_eq!(loaded_name.as_str(), name);
    assert_eq!(layout, app.layout);
}
