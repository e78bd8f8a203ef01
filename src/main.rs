//! dndbuilder - Terminal Layout Builder
//!
//! Drag component tokens (Label, Input, Checkbox, Button, Table) into a drop
//! zone, save and load the resulting layout by name, and publish it as a
//! static HTML page.

use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
    layout::Rect,
};
use std::io;
use std::path::PathBuf;

use dndbuilder::application::{App, AppMode, CommandBar};
use dndbuilder::infrastructure::config::{Config, ConfigLoader};
use dndbuilder::infrastructure::{PageOutput, copy_to_clipboard, logging, open_store};
use dndbuilder::presentation::{
    Command, InputHandler, ScreenAreas, TerminalGuard, TerminalPrompt, render_ui,
};

#[derive(Parser, Debug)]
#[command(name = "dndbuilder", version, about = "Drag-and-drop UI layout builder")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

/// Entry point for the layout builder.
///
/// Loads configuration, opens the layout store, sets up the terminal and
/// runs the event loop until the user quits.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the store cannot be
/// opened, or terminal setup fails.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config: Config = match &cli.config {
        Some(path) => ConfigLoader::load_from_path(path)?,
        None => ConfigLoader::load_default()?,
    };
    let _log_guard = logging::init(&config.logging);

    let store = open_store(&config.store)?;
    let output = PageOutput::new(config.publish.directory());
    let commands = CommandBar::new(&*store, &output);

    let guard = TerminalGuard::new()?;
    guard.install_panic_hook();
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    let mut app = App::default();
    let res = run_app(&mut terminal, &mut app, &commands);

    drop(guard);

    if let Err(err) = res {
        tracing::error!(error = %err, "terminal failure");
        println!("{err:?}");
    }

    Ok(())
}

/// Main application event loop.
///
/// Draws the builder, waits for one terminal event and handles it. Continues
/// until the user presses 'q' in normal mode.
fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    commands: &CommandBar,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| render_ui(f, app))?;

        let command = match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if key.code == KeyCode::Char('q')
                    && app.mode == AppMode::Normal
                    && app.alert.is_none()
                {
                    return Ok(());
                }
                InputHandler::handle_key_event(app, key.code, key.modifiers)
            }
            Event::Mouse(mouse) => {
                let size = terminal.size()?;
                let areas = ScreenAreas::compute(Rect::new(0, 0, size.width, size.height));
                InputHandler::handle_mouse_event(app, mouse, &areas)
            }
            _ => None,
        };

        if let Some(command) = command {
            execute_command(terminal, app, commands, command);
        }
    }
}

fn execute_command<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    commands: &CommandBar,
    command: Command,
) {
    match command {
        Command::Save => {
            let result = {
                let mut prompt = TerminalPrompt::new(terminal, app);
                commands.save(&app.layout_name, &app.layout, &mut prompt)
            };
            app.set_save_result(result);
        }
        Command::Load => {
            let result = commands.load(&app.layout_name);
            app.set_load_result(result);
        }
        Command::Browse => {
            let result = commands.browse();
            app.set_browse_result(result);
        }
        Command::Publish => {
            let result = commands.publish(&app.layout);
            app.set_publish_result(result);
        }
        Command::CopyPublished => {
            if let Some(page) = &app.published {
                let result = copy_to_clipboard(&page.markup);
                if let Err(e) = &result {
                    tracing::warn!(error = %e, "clipboard copy failed");
                }
                app.set_copy_result(result);
            }
        }
    }
}
