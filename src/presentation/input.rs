use crate::application::{App, AppMode};
use crate::presentation::ui::ScreenAreas;
use crossterm::event::{KeyCode, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

/// A command-bar action requested by the user; the main loop executes it
/// against the layout store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Save,
    Load,
    Publish,
    Browse,
    CopyPublished,
}

pub struct InputHandler;

impl InputHandler {
    pub fn handle_key_event(
        app: &mut App,
        key: KeyCode,
        modifiers: KeyModifiers,
    ) -> Option<Command> {
        if app.alert.is_some() {
            app.dismiss_alert();
            return None;
        }

        if modifiers.contains(KeyModifiers::CONTROL)
            && matches!(app.mode, AppMode::Normal | AppMode::EditingName)
        {
            let command = match key {
                KeyCode::Char('s') => Some(Command::Save),
                KeyCode::Char('o') => Some(Command::Load),
                KeyCode::Char('p') => Some(Command::Publish),
                KeyCode::Char('b') => Some(Command::Browse),
                _ => None,
            };
            if command.is_some() {
                app.finish_name_input();
                app.cancel_drag();
                return command;
            }
        }

        let command = match app.mode {
            AppMode::Normal => Self::handle_normal_mode(app, key),
            AppMode::EditingName => Self::handle_name_input_mode(app, key),
            AppMode::Browse => Self::handle_browse_mode(app, key),
            AppMode::Published => Self::handle_published_mode(app, key),
            AppMode::Help => Self::handle_help_mode(app, key),
        };
        if !Self::accepts_pointer(app) {
            app.cancel_drag();
        }
        command
    }

    /// The builder surface only takes pointer input with no dialog open.
    fn accepts_pointer(app: &App) -> bool {
        app.alert.is_none() && matches!(app.mode, AppMode::Normal | AppMode::EditingName)
    }

    /// Mouse drag and drop, button clicks and name field focus.
    pub fn handle_mouse_event(
        app: &mut App,
        event: MouseEvent,
        areas: &ScreenAreas,
    ) -> Option<Command> {
        if !Self::accepts_pointer(app) {
            // A release behind a dialog ends the drag without a drop.
            if let MouseEventKind::Up(_) = event.kind {
                app.cancel_drag();
            }
            return None;
        }

        let (column, row) = (event.column, event.row);
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(token) = areas.token_at(column, row) {
                    app.finish_name_input();
                    app.begin_drag(token, column, row);
                } else if let Some(command) = areas.button_at(column, row) {
                    app.finish_name_input();
                    return Some(command);
                } else if areas.name_field.contains((column, row).into()) {
                    app.start_name_input();
                } else {
                    app.finish_name_input();
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                app.drag_to(column, row);
            }
            MouseEventKind::Up(MouseButton::Left) => {
                app.end_drag(areas.drop_target(column, row));
            }
            _ => {}
        }
        None
    }

    fn handle_normal_mode(app: &mut App, key: KeyCode) -> Option<Command> {
        app.status_message = None;

        match key {
            KeyCode::Up | KeyCode::Char('k') => app.select_previous_token(),
            KeyCode::Down | KeyCode::Char('j') => app.select_next_token(),
            KeyCode::Enter | KeyCode::Char(' ') => app.drop_selected_token(),
            KeyCode::Tab | KeyCode::Char('n') => app.start_name_input(),
            KeyCode::F(1) | KeyCode::Char('?') => app.show_help(),
            // 'q' is handled by the main loop
            _ => {}
        }
        None
    }

    fn handle_name_input_mode(app: &mut App, key: KeyCode) -> Option<Command> {
        match key {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Tab => app.finish_name_input(),
            KeyCode::Backspace => app.delete_char_before_cursor(),
            KeyCode::Delete => app.delete_char_at_cursor(),
            KeyCode::Left => app.move_cursor_left(),
            KeyCode::Right => app.move_cursor_right(),
            KeyCode::Home => app.move_cursor_home(),
            KeyCode::End => app.move_cursor_end(),
            KeyCode::Char(c) => app.insert_char(c),
            _ => {}
        }
        None
    }

    fn handle_browse_mode(app: &mut App, key: KeyCode) -> Option<Command> {
        match key {
            KeyCode::Up | KeyCode::Char('k') => app.browse_previous(),
            KeyCode::Down | KeyCode::Char('j') => app.browse_next(),
            KeyCode::Enter => {
                if app.choose_browse_selection() {
                    return Some(Command::Load);
                }
            }
            KeyCode::Esc | KeyCode::Char('q') => app.close_browse(),
            _ => {}
        }
        None
    }

    fn handle_published_mode(app: &mut App, key: KeyCode) -> Option<Command> {
        match key {
            KeyCode::Char('c') => return Some(Command::CopyPublished),
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => app.close_published(),
            _ => {}
        }
        None
    }

    fn handle_help_mode(app: &mut App, key: KeyCode) -> Option<Command> {
        if matches!(
            key,
            KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Char('q')
        ) {
            app.close_help();
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::Alert;
    use crate::domain::{ComponentToken, Layout, NamedLayout};
    use ratatui::layout::Rect;

    fn areas() -> ScreenAreas {
        ScreenAreas::compute(Rect::new(0, 0, 100, 30))
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn press(app: &mut App, key: KeyCode) -> Option<Command> {
        InputHandler::handle_key_event(app, key, KeyModifiers::NONE)
    }

    fn ctrl(app: &mut App, c: char) -> Option<Command> {
        InputHandler::handle_key_event(app, KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn left(
        app: &mut App,
        areas: &ScreenAreas,
        kind: fn(MouseButton) -> MouseEventKind,
        column: u16,
        row: u16,
    ) -> Option<Command> {
        InputHandler::handle_mouse_event(app, mouse(kind(MouseButton::Left), column, row), areas)
    }

    #[test]
    fn test_command_shortcuts() {
        let mut app = App::default();
        for (c, expected) in [
            ('s', Command::Save),
            ('o', Command::Load),
            ('p', Command::Publish),
            ('b', Command::Browse),
        ] {
            assert_eq!(ctrl(&mut app, c), Some(expected));
        }
    }

    #[test]
    fn test_shortcut_while_editing_name_leaves_edit_mode() {
        let mut app = App::default();
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.mode, AppMode::EditingName);
        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('q'));

        assert_eq!(ctrl(&mut app, 's'), Some(Command::Save));
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.layout_name, "dq");
    }

    #[test]
    fn test_keyboard_drop() {
        let mut app = App::default();
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char(' '));
        let ids: Vec<&str> = app.layout.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["Input", "Checkbox"]);
    }

    #[test]
    fn test_any_key_dismisses_alert_first() {
        let mut app = App::default();
        app.alert = Some(Alert::info("Layout saved!"));
        assert_eq!(ctrl(&mut app, 's'), None);
        assert!(app.alert.is_none());
    }

    #[test]
    fn test_mouse_drag_into_drop_zone_appends() {
        let mut app = App::default();
        let areas = areas();
        let source = areas.palette_row(3).unwrap();
        let zone = areas.drop_zone;

        left(&mut app, &areas, MouseEventKind::Down, source.x + 2, source.y);
        assert_eq!(app.drag.map(|d| d.token), Some(ComponentToken::Button));
        left(&mut app, &areas, MouseEventKind::Drag, zone.x + 3, zone.y + 2);
        left(&mut app, &areas, MouseEventKind::Up, zone.x + 3, zone.y + 2);

        assert!(app.drag.is_none());
        let ids: Vec<&str> = app.layout.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["Button"]);
    }

    #[test]
    fn test_mouse_release_outside_drop_zone_cancels() {
        let mut app = App::default();
        let areas = areas();
        let source = areas.palette_row(0).unwrap();

        left(&mut app, &areas, MouseEventKind::Down, source.x + 2, source.y);
        left(&mut app, &areas, MouseEventKind::Up, source.x + 2, source.y + 3);

        assert!(app.drag.is_none());
        assert!(app.layout.is_empty());
    }

    #[test]
    fn test_release_behind_help_cancels_drag() {
        let mut app = App::default();
        let areas = areas();
        let source = areas.palette_row(0).unwrap();
        let zone = areas.drop_zone;

        left(&mut app, &areas, MouseEventKind::Down, source.x + 2, source.y);
        press(&mut app, KeyCode::Char('?'));
        left(&mut app, &areas, MouseEventKind::Up, source.x + 2, source.y);
        press(&mut app, KeyCode::Esc);
        assert!(app.drag.is_none());

        left(&mut app, &areas, MouseEventKind::Down, zone.x + 3, zone.y + 2);
        left(&mut app, &areas, MouseEventKind::Up, zone.x + 3, zone.y + 2);
        assert!(app.layout.is_empty());
    }

    #[test]
    fn test_mode_change_cancels_drag() {
        let mut app = App::default();
        let areas = areas();
        let source = areas.palette_row(1).unwrap();

        left(&mut app, &areas, MouseEventKind::Down, source.x + 2, source.y);
        press(&mut app, KeyCode::F(1));
        assert_eq!(app.mode, AppMode::Help);
        assert!(app.drag.is_none());

        press(&mut app, KeyCode::Esc);
        left(&mut app, &areas, MouseEventKind::Down, source.x + 2, source.y);
        assert_eq!(ctrl(&mut app, 'b'), Some(Command::Browse));
        assert!(app.drag.is_none());
    }

    #[test]
    fn test_release_behind_alert_cancels_drag() {
        let mut app = App::default();
        let areas = areas();
        let source = areas.palette_row(2).unwrap();
        let zone = areas.drop_zone;

        left(&mut app, &areas, MouseEventKind::Down, source.x + 2, source.y);
        app.alert = Some(Alert::error("Please enter a layout name."));
        left(&mut app, &areas, MouseEventKind::Up, zone.x + 3, zone.y + 2);

        assert!(app.drag.is_none());
        assert!(app.layout.is_empty());
    }

    #[test]
    fn test_mouse_button_click_issues_command() {
        let mut app = App::default();
        let areas = areas();
        let publish = areas.buttons[2];
        let command = left(&mut app, &areas, MouseEventKind::Down, publish.x + 1, publish.y + 1);
        assert_eq!(command, Some(Command::Publish));
    }

    #[test]
    fn test_mouse_click_on_name_field_starts_editing() {
        let mut app = App::default();
        let areas = areas();
        let field = areas.name_field;
        left(&mut app, &areas, MouseEventKind::Down, field.x + 2, field.y + 1);
        assert_eq!(app.mode, AppMode::EditingName);
    }

    #[test]
    fn test_browse_enter_requests_load() {
        let mut app = App::default();
        app.set_browse_result(Ok(vec![NamedLayout {
            name: "demo1".into(),
            layout: Layout::new(),
        }]));
        assert_eq!(press(&mut app, KeyCode::Enter), Some(Command::Load));
        assert_eq!(app.layout_name, "demo1");
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn test_help_and_published_modes() {
        let mut app = App::default();
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.mode, AppMode::Help);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, AppMode::Normal);

        app.mode = AppMode::Published;
        assert_eq!(press(&mut app, KeyCode::Char('c')), Some(Command::CopyPublished));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, AppMode::Normal);
    }
}
