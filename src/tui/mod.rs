// TUI module - Terminal User Interface
//
// This module manages the terminal UI using ratatui. It handles:
// - Terminal initialization and cleanup
// - Event loop (keyboard input, timer ticks, background results)
// - Rendering the resolved view

pub mod app;
pub mod components;
pub mod theme;
pub mod views;

use crate::app::Storefront;
use crate::logging::LogBuffer;
use anyhow::{Context, Result};
use app::{App, AppEvent};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;
use tokio::sync::mpsc;

/// Run the TUI until the user quits
pub async fn run_tui(storefront: Storefront, log_buffer: LogBuffer) -> Result<()> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to setup terminal")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let mut app = App::new(storefront, log_buffer, events_tx);

    let result = run_event_loop(&mut terminal, &mut app, &mut events_rx).await;

    // Restore terminal even when the loop failed
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to restore terminal")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    result
}

/// Main event loop
///
/// Wakes on whichever comes first: keyboard input, a redraw tick, an auth
/// response from a background request, or the notification changing.
async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events_rx: &mut mpsc::UnboundedReceiver<AppEvent>,
) -> Result<()> {
    let mut tick_interval = tokio::time::interval(Duration::from_millis(200));
    let mut notifications = app.storefront.notifications().subscribe();

    loop {
        terminal
            .draw(|f| views::draw(f, app))
            .context("Failed to draw terminal")?;

        tokio::select! {
            _ = async {
                if event::poll(Duration::from_millis(10)).unwrap_or(false) {
                    if let Ok(Event::Key(key_event)) = event::read() {
                        app.handle_key(key_event);
                    }
                }
            } => {}

            _ = tick_interval.tick() => {}

            Some(event) = events_rx.recv() => {
                app.handle_app_event(event);
            }

            // Redraw as soon as a toast appears or its timer clears it
            Ok(()) = notifications.changed() => {}
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
