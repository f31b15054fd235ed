use std::io;
use std::panic::{self, PanicHookInfo};
use std::thread::{self, ThreadId};

use anyhow::{Context, Result};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

pub type Tui = Terminal<CrosstermBackend<io::Stdout>>;

/// Owns the terminal while the UI runs; the terminal is restored on drop
pub struct TerminalManager {
    terminal: Tui,
}

impl TerminalManager {
    pub fn new() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e).context("Failed to enter alternate screen");
        }
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }

    pub fn terminal_mut(&mut self) -> &mut Tui {
        &mut self.terminal
    }

    pub fn restore(mut self) -> Result<()> {
        restore_terminal()?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for TerminalManager {
    fn drop(&mut self) {
        // Already restored, or unwinding; nothing useful to do with errors here
        let _ = restore_terminal();
        let _ = self.terminal.show_cursor();
    }
}

fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)
}

/// Restore the terminal before the default panic message is printed, and record the
/// panic in the log since stderr may be unreadable while the UI was up.
///
/// Only panics on the calling (UI) thread take the terminal down. Request tasks
/// run on runtime workers and have their panics caught by the dispatcher, so those
/// are logged and otherwise left alone.
pub fn install_panic_hook() {
    let previous = panic::take_hook();
    let hook = ui_thread_panic_hook(thread::current().id(), move |info| {
        let _ = restore_terminal();
        tracing::error!(panic = %info, "application panicked");
        previous(info);
    });
    panic::set_hook(Box::new(hook));
}

/// Panic hook running `on_ui_panic` for panics on `ui_thread` only
pub fn ui_thread_panic_hook<F>(
    ui_thread: ThreadId,
    on_ui_panic: F,
) -> impl Fn(&PanicHookInfo<'_>) + Send + Sync + 'static
where
    F: Fn(&PanicHookInfo<'_>) + Send + Sync + 'static,
{
    move |info| {
        if thread::current().id() == ui_thread {
            on_ui_panic(info);
        } else {
            tracing::error!(panic = %info, "background task panicked");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_manager_without_tty() {
        // Fails in CI without a TTY; only check restore when setup worked
        if let Ok(manager) = TerminalManager::new() {
            assert!(manager.restore().is_ok());
        }
    }
}
