//! Terminal lifecycle and the draw/commit cycle

use crossterm::{
    event::{DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Frame, Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::time::Duration;

/// Something that can be drawn by [`App`]
pub trait AppState {
    /// Render the UI
    fn render(&mut self, frame: &mut Frame);

    /// Called after the frame has been flushed to the terminal.
    /// Return true to draw again immediately.
    fn after_draw(&mut self) -> bool {
        false
    }
}

/// Owns the terminal while the UI is running
pub struct App {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    tick_rate: Duration,
}

impl App {
    /// Enter raw mode and the alternate screen
    pub fn new() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(
            stdout,
            EnterAlternateScreen,
            EnableMouseCapture,
            EnableBracketedPaste
        )?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            terminal,
            tick_rate: Duration::from_millis(80),
        })
    }

    /// Set the tick rate for animations
    pub fn with_tick_rate(mut self, rate: Duration) -> Self {
        self.tick_rate = rate;
        self
    }

    pub fn tick_rate(&self) -> Duration {
        self.tick_rate
    }

    /// Draw a frame, then let the state react to the committed layout
    pub fn draw<S: AppState>(&mut self, state: &mut S) -> io::Result<()> {
        self.terminal.draw(|frame| state.render(frame))?;
        if state.after_draw() {
            self.terminal.draw(|frame| state.render(frame))?;
        }
        Ok(())
    }

    /// Current terminal width
    pub fn width(&self) -> io::Result<u16> {
        Ok(self.terminal.size()?.width)
    }
}

impl Drop for App {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture,
            DisableBracketedPaste
        );
        let _ = self.terminal.show_cursor();
    }
}
