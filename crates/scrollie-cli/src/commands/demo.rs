use std::io::{self, Stdout};

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use scrollie_core::AppConfig;
use scrollie_tui::{
    app::App,
    event::{AppEvent, EventHandler},
    input::handle_key_event,
    widgets::{DocumentWidget, StatusBarWidget},
};

pub fn run(config: AppConfig) -> Result<()> {
    let event_handler = EventHandler::new(config.ui.tick_rate_ms);
    let mut app = App::new(config);
    tracing::info!(backend = %app.backend_label(), "Demo started");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, SetTitle("scrollie"))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = main_loop(&mut terminal, &mut app, &event_handler);

    // Restore terminal even when the loop failed
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tracing::info!(
        completed = app.completed,
        cancelled = app.cancelled,
        "Demo finished"
    );
    result
}

fn main_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| {
            let main_layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(1), Constraint::Length(1)])
                .split(frame.area());

            DocumentWidget::render(frame, main_layout[0], app);
            StatusBarWidget::render(frame, main_layout[1], app);
        })?;

        if let Some(event) = events.next()? {
            match event {
                AppEvent::Key(key) => app.apply(handle_key_event(key)),
                // The next draw re-measures the pane
                AppEvent::Resize(_, _) => {}
                AppEvent::Frame(timestamp_ms) => app.on_frame(timestamp_ms),
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
