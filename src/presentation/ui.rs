use crate::application::{AlertKind, App, AppMode, DropTarget};
use crate::domain::ComponentToken;
use crate::presentation::input::Command;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};

/// Screen regions of the builder, shared by the renderer and mouse hit tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenAreas {
    pub header: Rect,
    pub palette: Rect,
    pub name_field: Rect,
    pub buttons: [Rect; 3],
    pub drop_zone: Rect,
    pub status: Rect,
}

const BUTTONS: [(&str, Command); 3] = [
    ("Save Layout", Command::Save),
    ("Load Layout", Command::Load),
    ("Publish", Command::Publish),
];

impl ScreenAreas {
    pub fn compute(area: Rect) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(area);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[1]);

        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(0),
            ])
            .split(columns[1]);

        let buttons = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
            ])
            .split(right[1]);

        Self {
            header: rows[0],
            palette: columns[0],
            name_field: right[0],
            buttons: [buttons[0], buttons[1], buttons[2]],
            drop_zone: right[2],
            status: rows[2],
        }
    }

    /// The single-line row of a palette token inside the palette border.
    pub fn palette_row(&self, index: usize) -> Option<Rect> {
        let inner = inner(self.palette);
        let offset = u16::try_from(index).ok()?;
        if offset >= inner.height {
            return None;
        }
        Some(Rect {
            x: inner.x,
            y: inner.y + offset,
            width: inner.width,
            height: 1,
        })
    }

    pub fn token_at(&self, column: u16, row: u16) -> Option<ComponentToken> {
        let position = Position::new(column, row);
        ComponentToken::ALL
            .into_iter()
            .enumerate()
            .find(|(index, _)| {
                self.palette_row(*index)
                    .is_some_and(|rect| rect.contains(position))
            })
            .map(|(_, token)| token)
    }

    pub fn button_at(&self, column: u16, row: u16) -> Option<Command> {
        let position = Position::new(column, row);
        self.buttons
            .iter()
            .zip(BUTTONS)
            .find(|(rect, _)| rect.contains(position))
            .map(|(_, (_, command))| command)
    }

    pub fn drop_target(&self, column: u16, row: u16) -> DropTarget {
        if self.drop_zone.contains(Position::new(column, row)) {
            DropTarget::DropZone
        } else {
            DropTarget::Outside
        }
    }
}

fn inner(area: Rect) -> Rect {
    Rect {
        x: area.x.saturating_add(1),
        y: area.y.saturating_add(1),
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(2),
    }
}

pub fn render_ui(f: &mut Frame, app: &App) {
    let areas = ScreenAreas::compute(f.area());

    render_header(f, app, areas.header);
    render_palette(f, app, &areas);
    render_name_field(f, app, areas.name_field);
    render_buttons(f, &areas);
    render_drop_zone(f, app, areas.drop_zone);
    render_status_bar(f, app, areas.status);

    match app.mode {
        AppMode::Browse => render_browse_popup(f, app),
        AppMode::Published => render_published_popup(f, app),
        AppMode::Help => render_help_popup(f),
        AppMode::Normal | AppMode::EditingName => {}
    }

    if let Some(drag) = app.drag {
        render_drag_ghost(f, drag.token, drag.column, drag.row);
    }

    if let Some(alert) = &app.alert {
        let (title, color) = match alert.kind {
            AlertKind::Info => ("Notice", Color::Cyan),
            AlertKind::Error => ("Error", Color::Red),
        };
        render_message_popup(f, title, &alert.message, "Press any key", color);
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let name = if app.layout_name.trim().is_empty() {
        "untitled"
    } else {
        app.layout_name.trim()
    };
    let header = Paragraph::new(format!(
        "dndbuilder - Layout Builder | Layout: {} | Items: {}",
        name,
        app.layout.len()
    ))
    .style(Style::default().fg(Color::Cyan));
    f.render_widget(header, area);
}

fn render_palette(f: &mut Frame, app: &App, areas: &ScreenAreas) {
    f.render_widget(
        Block::default()
            .borders(Borders::ALL)
            .title("Drag & Drop Controls"),
        areas.palette,
    );

    for (index, token) in ComponentToken::ALL.into_iter().enumerate() {
        let Some(row) = areas.palette_row(index) else {
            break;
        };
        let dragging = app.drag.is_some_and(|drag| drag.token == token);
        let style = if dragging {
            Style::default().fg(Color::DarkGray)
        } else if index == app.selected_token && app.mode == AppMode::Normal {
            Style::default().bg(Color::LightBlue).fg(Color::Black)
        } else {
            Style::default()
        };
        f.render_widget(
            Paragraph::new(format!(" ≡ {}", token.caption())).style(style),
            row,
        );
    }
}

fn render_name_field(f: &mut Frame, app: &App, area: Rect) {
    let editing = app.mode == AppMode::EditingName;
    let style = if editing {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let field = Paragraph::new(app.layout_name.as_str())
        .style(style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Enter Layout Name"),
        );
    f.render_widget(field, area);

    if editing && app.alert.is_none() {
        let offset = u16::try_from(app.cursor_position).unwrap_or(u16::MAX);
        let x = area
            .x
            .saturating_add(1)
            .saturating_add(offset)
            .min(area.right().saturating_sub(2));
        f.set_cursor_position(Position::new(x, area.y + 1));
    }
}

fn render_buttons(f: &mut Frame, areas: &ScreenAreas) {
    let colors = [Color::Blue, Color::Magenta, Color::Green];
    for ((rect, (label, _)), color) in areas.buttons.iter().zip(BUTTONS).zip(colors) {
        let button = Paragraph::new(label)
            .alignment(Alignment::Center)
            .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(button, *rect);
    }
}

fn render_drop_zone(f: &mut Frame, app: &App, area: Rect) {
    let dragging = app.drag.is_some();
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Drop Zone")
        .border_style(if dragging {
            Style::default().fg(Color::Green)
        } else {
            Style::default()
        });

    if app.layout.is_empty() {
        let hint = Paragraph::new("Drag components here")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(hint, area);
        return;
    }

    // Keep the newest items visible once the list outgrows the zone.
    let visible = area.height.saturating_sub(2) as usize;
    let skip = app.layout.len().saturating_sub(visible);
    let items: Vec<ListItem> = app
        .layout
        .iter()
        .enumerate()
        .skip(skip)
        .map(|(index, item)| {
            let style = if item.token().is_some() {
                Style::default()
            } else {
                Style::default().fg(Color::Yellow)
            };
            ListItem::new(format!("{:>3}. {}", index + 1, item.id)).style(style)
        })
        .collect();
    f.render_widget(List::new(items).block(block), area);
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let text = match app.mode {
        AppMode::Normal => match &app.status_message {
            Some(status) => status.clone(),
            None => concat!(
                "↑↓: select | Enter: drop | Tab: name | Ctrl+S: save | Ctrl+O: load | ",
                "Ctrl+P: publish | Ctrl+B: browse | F1/?: help | q: quit"
            )
            .to_string(),
        },
        AppMode::EditingName => {
            "Editing name (Enter/Esc to finish, Ctrl+S: save, Ctrl+O: load)".to_string()
        }
        AppMode::Browse => "↑↓: select | Enter: load | Esc: close".to_string(),
        AppMode::Published => "c: copy markup | Esc: close".to_string(),
        AppMode::Help => "Esc/q: close help".to_string(),
    };

    let style = match app.mode {
        AppMode::Normal => Style::default(),
        AppMode::EditingName => Style::default().fg(Color::Yellow),
        AppMode::Browse => Style::default().fg(Color::Magenta),
        AppMode::Published => Style::default().fg(Color::Green),
        AppMode::Help => Style::default().fg(Color::Cyan),
    };

    let status = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(style);
    f.render_widget(status, area);
}

fn render_drag_ghost(f: &mut Frame, token: ComponentToken, column: u16, row: u16) {
    let area = f.area();
    let text = format!(" {} ", token.caption());
    let width = u16::try_from(text.chars().count())
        .unwrap_or(u16::MAX)
        .min(area.width);
    if width == 0 || area.height == 0 {
        return;
    }
    let ghost = Rect {
        x: column.min(area.right().saturating_sub(width)),
        y: row.min(area.bottom().saturating_sub(1)),
        width,
        height: 1,
    };
    f.render_widget(Clear, ghost);
    f.render_widget(
        Paragraph::new(text).style(Style::default().bg(Color::Gray).fg(Color::Black)),
        ghost,
    );
}

/// A centered rectangle of at most `width` x `height` inside `area`.
fn popup_area(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_message_popup(f: &mut Frame, title: &str, message: &str, footer: &str, color: Color) {
    let popup = popup_area(f.area(), 60, 7);
    f.render_widget(Clear, popup);
    let body = Paragraph::new(vec![
        Line::from(message.to_string()),
        Line::from(""),
        Line::from(footer.to_string()).style(Style::default().fg(Color::DarkGray)),
    ])
    .wrap(Wrap { trim: true })
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(title.to_string())
            .style(Style::default().fg(color)),
    );
    f.render_widget(body, popup);
}

/// Draws the overwrite confirmation dialog over the current screen.
pub fn render_confirm_popup(f: &mut Frame, name: &str, question: &str) {
    render_message_popup(
        f,
        &format!("Overwrite \"{}\"?", name),
        question,
        "y: overwrite | n/Esc: keep existing",
        Color::Yellow,
    );
}

fn render_browse_popup(f: &mut Frame, app: &App) {
    let area = f.area();
    let popup = popup_area(area, area.width * 3 / 5, area.height * 3 / 5);
    f.render_widget(Clear, popup);

    let items: Vec<ListItem> = app
        .saved_layouts
        .iter()
        .map(|saved| {
            let count = saved.layout.len();
            ListItem::new(format!(
                "{} ({} item{})",
                saved.name,
                count,
                if count == 1 { "" } else { "s" }
            ))
        })
        .collect();
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Saved Layouts")
                .style(Style::default().fg(Color::Magenta)),
        )
        .highlight_style(Style::default().bg(Color::Magenta).fg(Color::Black))
        .highlight_symbol("> ");
    let mut state = ListState::default().with_selected(Some(app.browse_index));
    f.render_stateful_widget(list, popup, &mut state);
}

fn render_published_popup(f: &mut Frame, app: &App) {
    let Some(page) = &app.published else {
        return;
    };
    let area = f.area();
    let popup = Rect {
        x: area.width / 10,
        y: area.height / 10,
        width: area.width * 4 / 5,
        height: area.height * 4 / 5,
    };
    f.render_widget(Clear, popup);

    let mut lines: Vec<Line> = page
        .markup
        .lines()
        .map(|line| Line::from(line.to_string()))
        .collect();
    lines.push(Line::from(""));
    lines.push(
        Line::from(format!("Written to {}", page.path.display()))
            .style(Style::default().fg(Color::DarkGray)),
    );

    let preview = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Published Page")
                .style(Style::default().fg(Color::Green)),
        )
        .style(Style::default().fg(Color::White));
    f.render_widget(preview, popup);
}

fn render_help_popup(f: &mut Frame) {
    let area = f.area();
    let popup = Rect {
        x: area.width / 10,
        y: area.height / 10,
        width: area.width * 4 / 5,
        height: area.height * 4 / 5,
    };
    f.render_widget(Clear, popup);
    let help = Paragraph::new(HELP_TEXT)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("dndbuilder Help")
                .style(Style::default().fg(Color::Cyan)),
        )
        .style(Style::default().fg(Color::White));
    f.render_widget(help, popup);
}

const HELP_TEXT: &str = "\
=== BUILDING ===
Mouse drag      Drag a component from the palette into the Drop Zone
↑↓ or k/j       Select a palette component
Enter/Space     Drop the selected component into the Drop Zone

=== LAYOUTS ===
Tab or n        Edit the layout name
Ctrl+S          Save the layout under the name (asks before overwriting)
Ctrl+O          Load the layout with that name
Ctrl+B          Browse saved layouts (Enter loads the highlighted one)
Ctrl+P          Publish the layout as a static HTML page
                Buttons can also be clicked with the mouse

=== PUBLISHED PAGE ===
c               Copy the page markup to the clipboard
Esc             Close the preview

q               Quit";
