use anyhow::{anyhow, Result};
use bd_climate_map::app::{App, Message};
use bd_climate_map::climate::Variable;
use bd_climate_map::config::Cli;
use bd_climate_map::data::{self, ClimateDataStore};
use bd_climate_map::{summary, ui};
use clap::Parser;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
    MouseEvent, MouseEventKind,
};
use crossterm::execute;
use log::info;
use ratatui::DefaultTerminal;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.init_logging()?;

    if cli.summary {
        let store = data::load_store(&cli.data_paths(), cli.missing)?;
        let stdout = std::io::stdout();
        return summary::write_summary(&store, cli.variable, cli.scenario, &mut stdout.lock());
    }

    // Initialize terminal
    let mut terminal = ratatui::init();
    terminal.clear()?;

    // Enable mouse capture
    execute!(std::io::stdout(), EnableMouseCapture)?;

    // Run the app
    let result = run(&mut terminal, &cli);

    // Disable mouse capture and restore terminal
    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();

    result
}

/// Load the three resources off the UI thread
fn spawn_loader(cli: &Cli) -> Receiver<anyhow::Result<ClimateDataStore>> {
    let (tx, rx) = mpsc::channel();
    let paths = cli.data_paths();
    let policy = cli.missing;
    thread::spawn(move || {
        info!("loading {:?}", paths);
        // The receiver only disappears when the UI has already quit
        let _ = tx.send(data::load_store(&paths, policy));
    });
    rx
}

/// Check for a finished load. A loader that hung up without sending
/// (it panicked) counts as a failed load.
fn poll_loader(
    loaded: &Receiver<anyhow::Result<ClimateDataStore>>,
) -> Option<anyhow::Result<ClimateDataStore>> {
    match loaded.try_recv() {
        Ok(result) => Some(result),
        Err(TryRecvError::Empty) => None,
        Err(TryRecvError::Disconnected) => Some(Err(anyhow!("loader thread exited without a result"))),
    }
}

/// Translate mouse events into messages
fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let (col, row) = (mouse.column, mouse.row);

    match mouse.kind {
        MouseEventKind::Moved => app.update(Message::PointerMove { col, row }),
        // Scroll wheel for zooming towards mouse position
        MouseEventKind::ScrollUp => app.update(Message::Scroll { col, row, up: true }),
        MouseEventKind::ScrollDown => app.update(Message::Scroll { col, row, up: false }),
        // Horizontal scroll for panning (trackpad two-finger swipe)
        MouseEventKind::ScrollLeft => app.update(Message::Pan(-15, 0)),
        MouseEventKind::ScrollRight => app.update(Message::Pan(15, 0)),
        // Click selects a district, click and drag pans
        MouseEventKind::Down(MouseButton::Left) => app.update(Message::PointerDown { col, row }),
        MouseEventKind::Drag(MouseButton::Left) => app.update(Message::PointerDrag { col, row }),
        MouseEventKind::Up(MouseButton::Left) => {
            app.update(Message::PointerUp { col, row });
            app.update(Message::PointerMove { col, row });
        }
        _ => {}
    }
}

/// Translate a key press into a message
fn key_message(code: KeyCode) -> Option<Message> {
    let message = match code {
        KeyCode::Char('q') => Message::Quit,
        KeyCode::Esc => Message::CloseDetail,

        // Variable selector
        KeyCode::Char(c @ '1'..='3') => {
            let index = c as usize - '1' as usize;
            Message::SelectVariable(Variable::ALL[index])
        }
        KeyCode::Tab => Message::CycleVariable(1),
        KeyCode::BackTab => Message::CycleVariable(-1),
        KeyCode::Char('t') | KeyCode::Char('T') => Message::ToggleScenario,

        // Pan with hjkl or arrow keys
        KeyCode::Left | KeyCode::Char('h') => Message::Pan(-10, 0),
        KeyCode::Right | KeyCode::Char('l') => Message::Pan(10, 0),
        KeyCode::Up | KeyCode::Char('k') => Message::Pan(0, -6),
        KeyCode::Down | KeyCode::Char('j') => Message::Pan(0, 6),

        // Zoom
        KeyCode::Char('+') | KeyCode::Char('=') => Message::ZoomIn,
        KeyCode::Char('-') | KeyCode::Char('_') => Message::ZoomOut,

        // Reset view
        KeyCode::Char('r') | KeyCode::Char('0') => Message::ResetView,

        _ => return None,
    };
    Some(message)
}

fn run(terminal: &mut DefaultTerminal, cli: &Cli) -> Result<()> {
    let size = terminal.size()?;
    let mut app = App::new(size.width, size.height, cli.variable, cli.scenario);
    let loaded = spawn_loader(cli);

    // Main loop
    loop {
        if let Some(result) = poll_loader(&loaded) {
            app.on_loaded(result);
        }

        // Draw
        terminal.draw(|frame| ui::render(frame, &app))?;

        // Handle events with ~60fps target
        if event::poll(Duration::from_millis(16))? {
            match event::read()? {
                Event::Key(key) => {
                    // Only handle key press events (not release)
                    if key.kind == KeyEventKind::Press {
                        if let Some(message) = key_message(key.code) {
                            app.update(message);
                        }
                    }
                }
                Event::Mouse(mouse) => {
                    handle_mouse(&mut app, mouse);
                }
                Event::Resize(width, height) => {
                    app.update(Message::Resize { width, height });
                }
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loader_hangup_is_a_failure() {
        let (tx, rx) = mpsc::channel::<anyhow::Result<ClimateDataStore>>();
        assert!(poll_loader(&rx).is_none());

        drop(tx);
        let err = poll_loader(&rx).unwrap().err().unwrap();
        assert!(err.to_string().contains("loader thread exited"));

        let mut app = App::new(100, 30, Variable::Temperature, Default::default());
        app.on_loaded(Err(err));
        assert!(matches!(app.load, bd_climate_map::app::LoadState::Failed(_)));
    }

    #[test]
    fn test_key_bindings() {
        assert_eq!(key_message(KeyCode::Char('2')), Some(Message::SelectVariable(Variable::CoolingDegreeDays)));
        assert_eq!(key_message(KeyCode::Char('3')), Some(Message::SelectVariable(Variable::HotDays)));
        assert_eq!(key_message(KeyCode::BackTab), Some(Message::CycleVariable(-1)));
        assert_eq!(key_message(KeyCode::Esc), Some(Message::CloseDetail));
        assert_eq!(key_message(KeyCode::Char('4')), None);
    }
}
