//! Session state for the layout builder.
//!
//! One [`App`] value holds everything a session edits or displays: the
//! layout, the name field, the palette selection, an in-flight drag and the
//! dialogs. It is owned by the main loop and lent to the renderer, the input
//! handler and the command results.

use crate::application::commands::SaveOutcome;
use crate::domain::{
    CommandError, ComponentToken, Layout, LayoutName, NamedLayout, PlacedItem, PublishError,
};
use crate::infrastructure::PublishedPage;

/// Represents the current mode of the application.
///
/// The mode determines how keyboard input is interpreted and which popup is
/// drawn over the builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Palette navigation, drops and command shortcuts
    Normal,
    /// Typing into the layout name field
    EditingName,
    /// Saved layouts list is open
    Browse,
    /// Published page preview is open
    Published,
    /// Help screen is displayed
    Help,
}

/// Where a drag ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    DropZone,
    Outside,
}

/// A palette token currently being dragged, with the pointer position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragState {
    pub token: ComponentToken,
    pub column: u16,
    pub row: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Info,
    Error,
}

/// A modal message; any key dismisses it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub kind: AlertKind,
    pub message: String,
}

impl Alert {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Error,
            message: message.into(),
        }
    }
}

/// Main application state.
///
/// # Examples
///
/// ```
/// use dndbuilder::application::{App, DropTarget};
/// use dndbuilder::domain::ComponentToken;
///
/// let mut app = App::default();
/// assert!(app.layout.is_empty());
/// app.handle_drop(ComponentToken::Label, DropTarget::DropZone);
/// assert_eq!(app.layout.len(), 1);
/// ```
#[derive(Debug)]
pub struct App {
    /// The layout being edited; empty at startup
    pub layout: Layout,
    /// Contents of the layout name field
    pub layout_name: String,
    /// Cursor position within the name field, in characters
    pub cursor_position: usize,
    pub mode: AppMode,
    /// Index into `ComponentToken::ALL` of the highlighted palette row
    pub selected_token: usize,
    pub drag: Option<DragState>,
    pub alert: Option<Alert>,
    /// Transient one-line message in the status bar
    pub status_message: Option<String>,
    /// Result of the last browse
    pub saved_layouts: Vec<NamedLayout>,
    pub browse_index: usize,
    /// Last published page, shown while in `AppMode::Published`
    pub published: Option<PublishedPage>,
}

impl Default for App {
    fn default() -> Self {
        Self {
            layout: Layout::new(),
            layout_name: String::new(),
            cursor_position: 0,
            mode: AppMode::Normal,
            selected_token: 0,
            drag: None,
            alert: None,
            status_message: None,
            saved_layouts: Vec::new(),
            browse_index: 0,
            published: None,
        }
    }
}

impl App {
    pub fn selected_token(&self) -> ComponentToken {
        ComponentToken::ALL[self.selected_token.min(ComponentToken::ALL.len() - 1)]
    }

    pub fn select_previous_token(&mut self) {
        self.selected_token = self.selected_token.saturating_sub(1);
    }

    pub fn select_next_token(&mut self) {
        if self.selected_token + 1 < ComponentToken::ALL.len() {
            self.selected_token += 1;
        }
    }

    /// Keyboard equivalent of dragging the highlighted token onto the drop zone.
    pub fn drop_selected_token(&mut self) {
        self.handle_drop(self.selected_token(), DropTarget::DropZone);
    }

    /// Completes a drop. Only drops on the drop zone change the layout.
    ///
    /// Returns whether an item was placed.
    pub fn handle_drop(&mut self, token: ComponentToken, target: DropTarget) -> bool {
        match target {
            DropTarget::DropZone => {
                self.layout.push(PlacedItem::from(token));
                self.status_message = Some(format!("Placed {}", token));
                true
            }
            DropTarget::Outside => false,
        }
    }

    pub fn begin_drag(&mut self, token: ComponentToken, column: u16, row: u16) {
        if let Some(index) = ComponentToken::ALL.iter().position(|t| *t == token) {
            self.selected_token = index;
        }
        self.drag = Some(DragState { token, column, row });
    }

    pub fn drag_to(&mut self, column: u16, row: u16) {
        if let Some(drag) = self.drag.as_mut() {
            drag.column = column;
            drag.row = row;
        }
    }

    /// Releases the current drag, if any, onto `target`.
    pub fn end_drag(&mut self, target: DropTarget) -> bool {
        match self.drag.take() {
            Some(drag) => self.handle_drop(drag.token, target),
            None => false,
        }
    }

    /// Drops the in-flight drag without placing anything.
    pub fn cancel_drag(&mut self) {
        if let Some(drag) = self.drag.take() {
            tracing::debug!(token = %drag.token, "drag cancelled");
        }
    }

    pub fn start_name_input(&mut self) {
        self.mode = AppMode::EditingName;
        self.cursor_position = self.layout_name.chars().count();
        self.status_message = None;
    }

    pub fn finish_name_input(&mut self) {
        self.mode = AppMode::Normal;
    }

    pub fn insert_char(&mut self, c: char) {
        let offset = self.byte_offset(self.cursor_position);
        self.layout_name.insert(offset, c);
        self.cursor_position += 1;
    }

    pub fn delete_char_before_cursor(&mut self) {
        if self.cursor_position > 0 {
            let offset = self.byte_offset(self.cursor_position - 1);
            self.layout_name.remove(offset);
            self.cursor_position -= 1;
        }
    }

    pub fn delete_char_at_cursor(&mut self) {
        if self.cursor_position < self.layout_name.chars().count() {
            let offset = self.byte_offset(self.cursor_position);
            self.layout_name.remove(offset);
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.layout_name.chars().count() {
            self.cursor_position += 1;
        }
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor_position = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor_position = self.layout_name.chars().count();
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        self.layout_name
            .char_indices()
            .nth(char_index)
            .map(|(offset, _)| offset)
            .unwrap_or(self.layout_name.len())
    }

    /// Applies the outcome of a save.
    ///
    /// A declined overwrite is not an error; it only leaves a status line.
    pub fn set_save_result(&mut self, result: Result<SaveOutcome, CommandError>) {
        match result {
            Ok(SaveOutcome::Saved(_)) => {
                self.alert = Some(Alert::info("Layout saved!"));
            }
            Ok(SaveOutcome::Declined(name)) => {
                self.status_message = Some(format!("Kept existing layout \"{}\"", name));
            }
            Err(error) => {
                self.alert = Some(Alert::error(error.to_string()));
            }
        }
        self.mode = AppMode::Normal;
    }

    /// Applies the outcome of a load. A hit replaces the whole layout; any
    /// failure leaves it untouched.
    pub fn set_load_result(&mut self, result: Result<(LayoutName, Layout), CommandError>) {
        match result {
            Ok((name, layout)) => {
                self.layout = layout;
                self.layout_name = name.to_string();
                self.cursor_position = self.layout_name.chars().count();
                self.alert = Some(Alert::info("Layout loaded!"));
            }
            Err(error) => {
                self.alert = Some(Alert::error(error.to_string()));
            }
        }
        self.mode = AppMode::Normal;
    }

    pub fn set_browse_result(&mut self, result: Result<Vec<NamedLayout>, CommandError>) {
        self.mode = AppMode::Normal;
        match result {
            Ok(layouts) if layouts.is_empty() => {
                self.saved_layouts.clear();
                self.alert = Some(Alert::info("No saved layouts yet."));
            }
            Ok(layouts) => {
                self.saved_layouts = layouts;
                self.browse_index = 0;
                self.mode = AppMode::Browse;
            }
            Err(error) => {
                self.alert = Some(Alert::error(error.to_string()));
            }
        }
    }

    pub fn browse_previous(&mut self) {
        self.browse_index = self.browse_index.saturating_sub(1);
    }

    pub fn browse_next(&mut self) {
        if self.browse_index + 1 < self.saved_layouts.len() {
            self.browse_index += 1;
        }
    }

    /// Puts the highlighted saved layout's name into the name field and
    /// closes the list. Returns whether a name was chosen; the caller then
    /// loads it.
    pub fn choose_browse_selection(&mut self) -> bool {
        let chosen = self
            .saved_layouts
            .get(self.browse_index)
            .map(|saved| saved.name.clone());
        self.mode = AppMode::Normal;
        match chosen {
            Some(name) => {
                self.layout_name = name;
                self.cursor_position = self.layout_name.chars().count();
                true
            }
            None => false,
        }
    }

    pub fn close_browse(&mut self) {
        self.mode = AppMode::Normal;
    }

    pub fn set_publish_result(&mut self, result: Result<PublishedPage, CommandError>) {
        match result {
            Ok(page) => {
                self.published = Some(page);
                self.mode = AppMode::Published;
            }
            Err(error) => {
                self.alert = Some(Alert::error(error.to_string()));
                self.mode = AppMode::Normal;
            }
        }
    }

    pub fn close_published(&mut self) {
        self.mode = AppMode::Normal;
    }

    pub fn set_copy_result(&mut self, result: Result<(), PublishError>) {
        match result {
            Ok(()) => {
                self.status_message = Some("Published markup copied to clipboard".to_string());
            }
            Err(_) => {
                self.alert = Some(Alert::error("Failed to copy published markup."));
            }
        }
    }

    pub fn show_help(&mut self) {
        self.mode = AppMode::Help;
    }

    pub fn close_help(&mut self) {
        self.mode = AppMode::Normal;
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }
}
