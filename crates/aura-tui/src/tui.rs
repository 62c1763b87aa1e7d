//! Terminal lifecycle: alternate screen, raw mode, window title, and
//! restoring all of it on drop or panic.

use std::io::{Stdout, stdout};

use color_eyre::eyre::Result;
use crossterm::{
    ExecutableCommand, cursor,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{Frame, Terminal, backend::CrosstermBackend};

use crate::screen::ScreenId;

pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    title: String,
}

impl Tui {
    /// Take over the terminal.
    pub fn start() -> Result<Self> {
        let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
        terminal::enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;
        stdout().execute(cursor::Hide)?;
        terminal.clear()?;
        Ok(Self {
            terminal,
            title: String::new(),
        })
    }

    pub fn draw(&mut self, render: impl FnOnce(&mut Frame)) -> Result<()> {
        self.terminal.draw(render)?;
        Ok(())
    }

    /// Name the visible tab and its item count in the window title. Only
    /// writes when the text changes.
    pub fn set_title(&mut self, screen: ScreenId, count: Option<usize>) -> Result<()> {
        let title = window_title(screen, count);
        if title != self.title {
            stdout().execute(SetTitle(&title))?;
            self.title = title;
        }
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        restore();
    }
}

fn window_title(screen: ScreenId, count: Option<usize>) -> String {
    match count {
        Some(n) => format!("aura: {} ({n})", screen.label()),
        None => format!("aura: {}", screen.label()),
    }
}

/// Best-effort; partial failures are ignored.
fn restore() {
    let _ = stdout().execute(cursor::Show);
    let _ = stdout().execute(LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
}

/// Panic and error hooks that give the terminal back before printing.
/// Install before [`Tui::start`].
pub fn install_hooks() -> Result<()> {
    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default()
        .display_env_section(false)
        .into_hooks();

    eyre_hook.install()?;

    let panic_hook = panic_hook.into_panic_hook();
    std::panic::set_hook(Box::new(move |info| {
        restore();
        panic_hook(info);
    }));

    Ok(())
}
