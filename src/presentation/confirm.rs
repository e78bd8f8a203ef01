use crate::application::{App, OVERWRITE_QUESTION, OverwritePrompt};
use crate::domain::LayoutName;
use crate::presentation::ui::{render_confirm_popup, render_ui};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{Terminal, backend::Backend};
use std::io;

/// Overwrite confirmation as a modal dialog on the terminal.
///
/// Runs its own small event loop until the user answers. Terminal failures
/// count as "no", so nothing is overwritten without an explicit yes.
pub struct TerminalPrompt<'a, B: Backend> {
    terminal: &'a mut Terminal<B>,
    app: &'a App,
}

impl<'a, B: Backend> TerminalPrompt<'a, B> {
    pub fn new(terminal: &'a mut Terminal<B>, app: &'a App) -> Self {
        Self { terminal, app }
    }

    fn ask(&mut self, name: &LayoutName) -> io::Result<bool> {
        let app = self.app;
        loop {
            self.terminal.draw(|f| {
                render_ui(f, app);
                render_confirm_popup(f, name.as_str(), OVERWRITE_QUESTION);
            })?;

            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => return Ok(true),
                    KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => return Ok(false),
                    _ => {}
                }
            }
        }
    }
}

impl<B: Backend> OverwritePrompt for TerminalPrompt<'_, B> {
    fn confirm_overwrite(&mut self, name: &LayoutName) -> bool {
        match self.ask(name) {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!(%name, error = %e, "overwrite prompt failed");
                false
            }
        }
    }
}
