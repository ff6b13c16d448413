//! Terminal setup and the async event loop

use crate::backend::AdminBackend;
use crate::notify::Notification;
use crate::ui::app_component::AppComponent;
use crate::ui::core::{actions::Action, Component, EventHandler, EventType};
use crate::views::ViewKind;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::io;
use std::sync::Arc;
use tokio::sync::mpsc;

/// What the UI needs from the configuration
#[derive(Debug, Clone, Copy)]
pub struct UiOptions {
    pub initial_view: ViewKind,
    pub page_size: u32,
    pub sidebar_width: u16,
}

/// Run the console until the user quits
pub async fn run_app(
    backend: Arc<dyn AdminBackend>,
    notifications: mpsc::UnboundedReceiver<Notification>,
    options: UiOptions,
) -> anyhow::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let terminal_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(terminal_backend)?;

    let mut app = AppComponent::new(
        backend,
        notifications,
        options.initial_view,
        options.page_size,
        options.sidebar_width,
    );
    let mut event_handler = EventHandler::new();

    app.start();

    let result = run_app_loop(&mut terminal, &mut app, &mut event_handler).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_app_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppComponent,
    event_handler: &mut EventHandler,
) -> anyhow::Result<()> {
    let mut needs_render = true;

    loop {
        if needs_render {
            terminal.draw(|f| app.render(f, f.area()))?;
            needs_render = false;
        }

        let event = event_handler.next_event().await?;

        match event {
            EventType::Key(_) | EventType::Resize(_, _) => {
                app.handle_event(event).await?;
                needs_render = true;
            }
            EventType::Tick => {
                for action in app.process_background_actions() {
                    let action = app.update(action);
                    if let Action::Quit = app.handle_app_action(action).await {
                        return Ok(());
                    }
                }
                // Status bar messages expire and the busy marker changes between ticks
                needs_render = true;
            }
            EventType::Other => {}
        }

        if app.should_quit() {
            break;
        }
    }

    Ok(())
}
